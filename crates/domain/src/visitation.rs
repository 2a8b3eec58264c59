//! Caller-relative "visited" flag for places.

use crate::id::PublicId;
use crate::place::Place;

/// Whether `caller` has visited `place`.
///
/// Authorship plays no part: an author who never marked their own place
/// visited gets `false`. Anonymous callers always get `false`.
#[must_use]
pub fn visited(place: &Place, caller: Option<&PublicId>) -> bool {
    caller.is_some_and(|caller| place.visitors.iter().any(|v| v.is(caller)))
}
