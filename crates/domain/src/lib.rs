//! # locpack-domain
//!
//! Pure domain model for locpack, a catalogue of places grouped into
//! followable collections.
//!
//! ## Responsibilities
//! - Foundational types: internal and public identifiers, error taxonomy, timestamps
//! - Define **Users**, **Places** and **Collections** with their relation sets
//! - Resolve a caller's **status** towards a collection (author / follower / none)
//! - Resolve whether a caller has **visited** a place
//! - Project records into caller-facing **views**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod collection;
pub mod place;
pub mod status;
pub mod user;
pub mod view;
pub mod visitation;
