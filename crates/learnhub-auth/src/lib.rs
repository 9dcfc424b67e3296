//! # LearnHub Auth
//!
//! Authentication and authorization primitives for the LearnHub API.
//!
//! - [`roles`]: the [`Role`] enum and [`RoleSet`] allow-lists
//! - [`claims`]: token payloads and the verified [`Principal`]
//! - [`jwt`]: [`TokenService`] for issuing and verifying tokens
//! - [`gate`]: [`RoleGate`], the per-endpoint authorization check
//!
//! ```ignore
//! let tokens = Arc::new(TokenService::new(&jwt_config));
//! let token = tokens.issue_access_token(user.id, user.role)?;
//!
//! let gate = RoleGate::new(tokens.clone(), RoleSet::staff());
//! let principal = gate.authorize(request.headers())?;
//! ```

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod roles;

pub use claims::{Claims, Principal, TokenKind};
pub use gate::{GateError, RoleGate, bearer_token};
pub use jwt::{Clock, FixedClock, SystemClock, TokenError, TokenPair, TokenService};
pub use roles::{Role, RoleParseError, RoleSet};
