//! Caller-relative collection status.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::id::PublicId;

/// A user's relationship to a collection. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Author,
    Follower,
    None,
}

/// Compute `caller`'s status for `collection`.
///
/// The author check runs first, so an author who also appears in the follower
/// set still resolves to [`CollectionStatus::Author`]. An anonymous caller
/// (`None`) always resolves to [`CollectionStatus::None`].
#[must_use]
pub fn resolve(collection: &Collection, caller: Option<&PublicId>) -> CollectionStatus {
    let Some(caller) = caller else {
        return CollectionStatus::None;
    };
    if collection.author.is(caller) {
        return CollectionStatus::Author;
    }
    if collection.followers.iter().any(|f| f.is(caller)) {
        return CollectionStatus::Follower;
    }
    CollectionStatus::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    fn setup() -> (User, User, Collection) {
        let alice = User::register("alice").unwrap();
        let bob = User::register("bob").unwrap();
        let collection = Collection::new(alice.to_ref(), "Hiking").unwrap();
        (alice, bob, collection)
    }

    #[test]
    fn should_resolve_author_regardless_of_followers() {
        let (alice, bob, mut collection) = setup();
        collection.followers.push(bob.to_ref());
        // Corrupted data: author also listed as follower.
        collection.followers.push(alice.to_ref());

        assert_eq!(
            resolve(&collection, Some(&alice.public_id)),
            CollectionStatus::Author
        );
    }

    #[test]
    fn should_resolve_follower_when_caller_in_follower_set() {
        let (_, bob, mut collection) = setup();
        collection.add_follower(bob.to_ref());
        assert_eq!(
            resolve(&collection, Some(&bob.public_id)),
            CollectionStatus::Follower
        );
    }

    #[test]
    fn should_resolve_none_for_stranger() {
        let (_, bob, collection) = setup();
        assert_eq!(
            resolve(&collection, Some(&bob.public_id)),
            CollectionStatus::None
        );
    }

    #[test]
    fn should_resolve_none_for_anonymous_caller() {
        let (_, _, collection) = setup();
        assert_eq!(resolve(&collection, None), CollectionStatus::None);
    }

    #[test]
    fn should_serialize_in_screaming_case() {
        let json = serde_json::to_string(&CollectionStatus::Follower).unwrap();
        assert_eq!(json, "\"FOLLOWER\"");
        let parsed: CollectionStatus = serde_json::from_str("\"AUTHOR\"").unwrap();
        assert_eq!(parsed, CollectionStatus::Author);
    }
}
