//! Infrastructure layer implementing the domain's repository traits.
//!
//! - [`persistence`] - PostgreSQL repository implementations

pub mod persistence;
