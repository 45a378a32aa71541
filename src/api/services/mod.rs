pub mod health;
pub mod pages;
pub mod redirect;

pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{ChallengeForm, RedirectService, redirect_routes};
