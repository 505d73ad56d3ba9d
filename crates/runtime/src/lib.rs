//! Runtime utilities shared by the fee analytics services.

pub mod health;
pub mod rate_limiter;
pub mod shutdown;
