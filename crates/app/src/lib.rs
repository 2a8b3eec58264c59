//! # locpack-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`: identity records keyed by public id
//!   - `PlaceRepository`: places and their visitor sets
//!   - `CollectionRepository`: collections, followers and member places
//! - Define **driving/inbound ports** as use-case structs:
//!   - `CollectionService`: read, create, follow/unfollow, rename, resync members
//!   - `PlaceService`: read, create, edit (author only), toggle visited (anyone)
//!   - `UserService`: register, look up, rename
//! - Thread the caller's identity explicitly through every call
//!
//! ## Dependency rule
//! Depends on `locpack-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
