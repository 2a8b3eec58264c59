//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! The caller's public id is passed explicitly to every operation; `None`
//! stands for an anonymous caller on read paths.

pub mod collection_service;
pub mod place_service;
pub mod user_service;

mod guard;
