//! HTTP surface: redirect/challenge routes, health probes and middleware

pub mod middleware;
pub mod services;
