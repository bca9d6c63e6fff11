//! Generic create / get-or-create helpers

use super::models::Entity;
use super::session::Session;
use super::value::Fields;
use crate::{Error, Result};
use tracing::debug;

/// Add a new `E` row with `fields` and return it.
///
/// Commits the session when `should_commit` is set, otherwise flushes so the
/// row is visible to the rest of the session's transaction.
pub async fn create<E: Entity>(
    session: &mut Session,
    should_commit: bool,
    fields: Fields,
) -> Result<E> {
    session.add::<E>(fields)?;

    let ids = if should_commit {
        session.commit().await?
    } else {
        session.flush().await?
    };
    let id = ids
        .last()
        .copied()
        .ok_or_else(|| Error::Internal(format!("No row id returned for {}", E::TABLE)))?;

    let record = session
        .get::<E>(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("{} row {}", E::TABLE, id)))?;

    debug!(table = E::TABLE, id, committed = should_commit, "Created record");
    Ok(record)
}

/// Find the first `E` whose fields equal `fields`, creating it when absent.
///
/// Returns `(record, true)` when an existing row matched and
/// `(record, false)` when a new one was created.
pub async fn get_or_create<E: Entity>(
    session: &mut Session,
    should_commit: bool,
    fields: Fields,
) -> Result<(E, bool)> {
    if let Some(existing) = session.find_first::<E>(&fields).await? {
        debug!(table = E::TABLE, id = existing.id(), "Reusing existing record");
        return Ok((existing, true));
    }

    let record = create::<E>(session, should_commit, fields).await?;
    Ok((record, false))
}
