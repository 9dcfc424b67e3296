//! Feature modules. Each one is a `controller`/`service`/`model`/`router`
//! quartet mounted under `/api` by [`crate::router::init_router`].

pub mod auth;
pub mod branches;
pub mod centers;
pub mod comments;
pub mod likes;
pub mod professions;
pub mod regions;
pub mod registrations;
pub mod resources;
pub mod subjects;
pub mod users;
