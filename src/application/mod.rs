//! Application layer: services and the admission gate.
//!
//! Services orchestrate repository calls and business rules and give HTTP
//! handlers a narrow API.
//!
//! - [`services::AuthService`] - Registration, login and identity resolution
//! - [`services::TokenService`] - Bearer token signing and verification
//! - [`services::LinkService`] - Short link creation and resolution
//! - [`admission::AdmissionController`] - Global request-rate gate

pub mod admission;
pub mod services;
