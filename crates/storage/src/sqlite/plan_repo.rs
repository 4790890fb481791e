use chrono::Utc;
use studypath_core::model::{PlanId, StudyPlan};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{
    map_plan_row, map_progress_rows, map_summary_row, plan_id_from_i64, plan_id_to_i64,
};
use crate::repository::{PlanRecord, PlanRepository, PlanSummary, StorageError};

#[async_trait::async_trait]
impl PlanRepository for SqliteRepository {
    async fn insert_plan(&self, plan: &StudyPlan) -> Result<PlanId, StorageError> {
        let record = PlanRecord::from_plan(plan)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let res = sqlx::query(
            r"
            INSERT INTO plans (subject, current_level, target_level, hours_per_week, weeks, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(record.subject)
        .bind(record.current_level)
        .bind(record.target_level)
        .bind(record.hours_per_week)
        .bind(record.weeks_json)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let raw_id = res.last_insert_rowid();
        let now = Utc::now();
        for (topic, completed) in plan.progress().iter() {
            sqlx::query(
                r"
                INSERT INTO plan_progress (plan_id, topic, completed, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(raw_id)
            .bind(topic)
            .bind(i64::from(completed))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let id = plan_id_from_i64(raw_id)?;
        debug!(plan_id = %id, subject = plan.subject(), "plan inserted");
        Ok(id)
    }

    async fn set_topic_progress(
        &self,
        plan_id: PlanId,
        topic: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        // The WHERE clause keeps updates to unknown plans a silent no-op.
        let res = sqlx::query(
            r"
            INSERT INTO plan_progress (plan_id, topic, completed, updated_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE EXISTS (SELECT 1 FROM plans WHERE id = ?1)
            ON CONFLICT(plan_id, topic) DO UPDATE SET
                completed = excluded.completed,
                updated_at = excluded.updated_at
            ",
        )
        .bind(plan_id_to_i64(plan_id)?)
        .bind(topic)
        .bind(i64::from(completed))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        debug!(
            plan_id = %plan_id,
            topic,
            completed,
            rows = res.rows_affected(),
            "topic progress written"
        );
        Ok(())
    }

    async fn get_plan(&self, plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError> {
        let raw_id = plan_id_to_i64(plan_id)?;
        let row = sqlx::query(
            r"
            SELECT id, subject, current_level, target_level, hours_per_week, weeks, created_at
            FROM plans WHERE id = ?1
            ",
        )
        .bind(raw_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record = map_plan_row(&row)?;

        let progress_rows = sqlx::query(
            r"
            SELECT topic, completed
            FROM plan_progress
            WHERE plan_id = ?1
            ",
        )
        .bind(raw_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        let progress = map_progress_rows(&progress_rows)?;

        record.into_plan(plan_id, progress).map(Some)
    }

    async fn list_plans(&self, limit: u32) -> Result<Vec<PlanSummary>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject, current_level, target_level, hours_per_week, created_at
            FROM plans
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut plans = Vec::with_capacity(rows.len());
        for row in rows {
            plans.push(map_summary_row(&row)?);
        }
        Ok(plans)
    }
}
