//! Utility and helper functions needed for:
//! - Error handling
//! - Fixed point and basis points arithmetic
//! - Type casting
//! - Time

pub mod clock;
pub mod common;
pub mod error;
