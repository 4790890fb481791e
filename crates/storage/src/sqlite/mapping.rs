use sqlx::Row;
use studypath_core::model::{PlanId, ProgressMap};

use crate::repository::{PlanRecord, PlanSummary, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn plan_id_from_i64(v: i64) -> Result<PlanId, StorageError> {
    u64::try_from(v)
        .map(PlanId::new)
        .map_err(|_| StorageError::Serialization("plan_id sign overflow".into()))
}

pub(crate) fn plan_id_to_i64(id: PlanId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("plan_id overflow".into()))
}

pub(crate) fn map_plan_row(row: &sqlx::sqlite::SqliteRow) -> Result<PlanRecord, StorageError> {
    Ok(PlanRecord {
        subject: row.try_get("subject").map_err(ser)?,
        current_level: row.try_get("current_level").map_err(ser)?,
        target_level: row.try_get("target_level").map_err(ser)?,
        hours_per_week: row.try_get("hours_per_week").map_err(ser)?,
        weeks_json: row.try_get("weeks").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_summary_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<PlanSummary, StorageError> {
    let current_level: String = row.try_get("current_level").map_err(ser)?;
    let target_level: String = row.try_get("target_level").map_err(ser)?;
    let hours: i64 = row.try_get("hours_per_week").map_err(ser)?;

    Ok(PlanSummary {
        id: plan_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        subject: row.try_get("subject").map_err(ser)?,
        current_level: current_level.parse().map_err(ser)?,
        target_level: target_level.parse().map_err(ser)?,
        hours_per_week: u8::try_from(hours)
            .map_err(|_| StorageError::Serialization(format!("invalid hours_per_week: {hours}")))?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_rows(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<ProgressMap, StorageError> {
    rows.iter()
        .map(|row| {
            let topic: String = row.try_get("topic").map_err(ser)?;
            let completed: i64 = row.try_get("completed").map_err(ser)?;
            Ok((topic, completed != 0))
        })
        .collect()
}
