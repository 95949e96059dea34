//! JWT bearer authentication for an axum request pipeline.
//!
//! Requests carrying `Authorization: Bearer <jwt>` are verified against keys
//! loaded once at startup (RS256 from an X.509 certificate, or HMAC secrets).
//! Success puts an [`AuthenticatedIdentity`] in the request extensions;
//! any failure becomes a bare 401 challenge.
//!
//! [`AuthenticatedIdentity`]: services::auth::AuthenticatedIdentity

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
