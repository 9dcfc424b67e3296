//! Request middleware and extractors.
//!
//! - [`role`]: the role gate middleware and the [`role::Gated`] router extension
//! - [`auth`]: the [`auth::AuthUser`] extractor for handlers behind a gate
//!
//! # Authorization flow
//!
//! 1. A route is registered with `.gated(&state, RoleSet::...)`
//! 2. The gate verifies `Authorization: Bearer <token>` and checks the role
//! 3. The admitted [`learnhub_auth::Principal`] is stored in request extensions
//! 4. Handlers take `AuthUser` to read it
//!
//! ```ignore
//! Router::new()
//!     .route("/", get(list_regions).merge(post(create_region).gated(&state, RoleSet::staff())))
//! ```

pub mod auth;
pub mod role;
