//! Column decoding shared by the repositories.

use std::error::Error;
use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use locpack_domain::id::PublicId;
use locpack_domain::time::Timestamp;
use locpack_domain::user::UserRef;

fn decode_err(err: impl Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Read a text column and parse it with [`FromStr`].
pub(crate) fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;
    value.parse().map_err(decode_err)
}

pub(crate) fn public_id(row: &SqliteRow, column: &str) -> Result<PublicId, sqlx::Error> {
    parsed(row, column)
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let value: String = row.try_get(column)?;
    chrono::DateTime::parse_from_rfc3339(&value)
        .map(|ts| ts.to_utc())
        .map_err(decode_err)
}

/// Lowercase form stored next to searchable text. `SQLite`'s `lower()` only
/// folds ASCII, so folding happens here for both columns and queries.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Fixed-width encoding so that text ordering matches time ordering.
pub(crate) fn encode_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a user reference from columns sharing `prefix`
/// (`{prefix}id`, `{prefix}public_id`, `{prefix}username`).
pub(crate) fn user_ref(row: &SqliteRow, prefix: &str) -> Result<UserRef, sqlx::Error> {
    Ok(UserRef {
        id: parsed(row, &format!("{prefix}id"))?,
        public_id: public_id(row, &format!("{prefix}public_id"))?,
        username: row.try_get(format!("{prefix}username").as_str())?,
    })
}

/// A row of `users` projected as a [`UserRef`].
pub(crate) struct UserRefRow(pub(crate) UserRef);

impl<'r> FromRow<'r, SqliteRow> for UserRefRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        user_ref(row, "").map(Self)
    }
}
