//! # locpack-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API under `/api` for collections, places and users
//! - Resolve the caller from the `x-user-id` header forwarded by the
//!   identity proxy in front of the service
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `locpack-app` (for port traits and services) and `locpack-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod caller;
pub mod error;
pub mod router;
pub mod state;
