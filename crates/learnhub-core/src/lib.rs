//! # LearnHub Core
//!
//! Core types, errors, and utilities for the LearnHub API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`search`]: Escaped `ILIKE` substring patterns
//! - [`serde`]: Query-string friendly deserialization helpers

pub mod errors;
pub mod pagination;
pub mod password;
pub mod search;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use search::contains_pattern;
