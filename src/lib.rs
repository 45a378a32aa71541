//! linkgate - rule-driven redirect front-end for a URL shortener
//!
//! For each request on a short code, linkgate fetches the access rules
//! attached to that code, evaluates them against what it knows about the
//! visitor (country, city, device, browser, OS, local hour) and turns the
//! single resulting decision into a redirect, a block page, an arithmetic
//! challenge, a message or a landing page.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `context`: request context collection (user agent, geo, clock)
//! - `client`: rules service and link service clients
//! - `rules`: rule model, normalisation and evaluation
//! - `services`: challenge verifier, dispatcher, resolver, GeoIP, session
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI commands
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod errors;
pub mod interfaces;
pub mod rules;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
