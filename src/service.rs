//! Ship operations on top of a [`Db`].
//!
//! Mutations validate first, rate second and only then touch storage,
//! so a failed request never leaves a partial write behind.

use crate::db::Db;
use crate::errors::ShipError;
use crate::filter::{Page, ShipFilter};
use crate::ship::{Ship, ShipId, ShipPatch};
use crate::validation;

type DynDb = dyn Db + Send + Sync;

/// Returns the ships on `page`, without paging metadata.
pub async fn list(db: &DynDb, filter: &ShipFilter, page: Page) -> Result<Vec<Ship>, ShipError> {
    db.find_matching(filter, page).await
}

/// Counts the ships matching `filter` by fetching all of them, so the
/// result always agrees with paging through `list`.
pub async fn count(db: &DynDb, filter: &ShipFilter) -> Result<usize, ShipError> {
    let ships = db.find_all_matching(filter).await?;

    Ok(ships.len())
}

pub async fn create(db: &DynDb, patch: ShipPatch) -> Result<Ship, ShipError> {
    let problems = validation::validate_for_create(&patch);

    if !problems.is_empty() {
        return Err(ShipError::Validation(problems));
    }

    let record = patch.into_record()?;

    db.save(None, record).await
}

pub async fn retrieve(db: &DynDb, id: ShipId) -> Result<Ship, ShipError> {
    db.find_by_id(id).await?.ok_or(ShipError::NonExistentId(id))
}

/// Overlays the fields present in `patch` on the stored ship and
/// re-rates it.
pub async fn update(db: &DynDb, id: ShipId, patch: ShipPatch) -> Result<Ship, ShipError> {
    let problems = validation::validate_for_update(&patch);

    if !problems.is_empty() {
        return Err(ShipError::Validation(problems));
    }

    let Ship { id, mut record } = retrieve(db, id).await?;

    patch.apply_to(&mut record);
    record.refresh_rating()?;

    db.save(Some(id), record).await
}

pub async fn delete(db: &DynDb, id: ShipId) -> Result<(), ShipError> {
    db.delete_by_id(id).await
}

/// Only positive IDs are well formed. This says nothing about whether a
/// ship with that ID exists.
pub fn id_is_well_formed(id: ShipId) -> bool {
    id > 0
}

pub async fn id_exists(db: &DynDb, id: ShipId) -> Result<bool, ShipError> {
    db.exists_by_id(id).await
}

/// Parses a path segment into a well-formed ID.
pub fn parse_id(raw: &str) -> Result<ShipId, ShipError> {
    raw.parse::<ShipId>()
        .ok()
        .filter(|id| id_is_well_formed(*id))
        .ok_or_else(|| ShipError::InvalidId(raw.to_owned()))
}
