//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod metrics;
pub mod redirect;
pub mod shorten;

pub use auth::{login_handler, register_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use redirect::{missing_key_handler, redirect_handler};
pub use shorten::shorten_handler;
