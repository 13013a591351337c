use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use super::types::{NewRequest, Request};
use super::{SqliteStore, StoreError, StoreResult};
use crate::core::status::{RequestStatus, StatusValue};

const REQUEST_COLUMNS: &str = "id, user_id, title, description, callback_number, \
     number_to_call, preferred_time, status, summary, created_at, updated_at";

fn row_to_request(row: &Row<'_>) -> rusqlite::Result<Request> {
    let status: String = row.get(7)?;
    Ok(Request {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        callback_number: row.get(4)?,
        number_to_call: row.get(5)?,
        preferred_time: row.get(6)?,
        status: StatusValue::from_wire(&status),
        summary: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl SqliteStore {
    pub(super) async fn get_request_row(&self, id: &str, owner_id: &str) -> StoreResult<Request> {
        let db = self.db.lock().await;
        let request = db
            .query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1 AND user_id = ?2"
                ),
                params![id, owner_id],
                row_to_request,
            )
            .optional()?;
        request.ok_or(StoreError::NotFound)
    }

    pub(super) async fn list_request_rows(&self, owner_id: &str) -> StoreResult<Vec<Request>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE user_id = ?1 \
             ORDER BY updated_at DESC, rowid DESC"
        ))?;

        let rows = stmt.query_map(params![owner_id], row_to_request)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub(super) async fn insert_request(
        &self,
        owner_id: &str,
        fields: NewRequest,
    ) -> StoreResult<Request> {
        let id = Uuid::new_v4().to_string();
        {
            let db = self.db.lock().await;
            // Status is forced to `queued` here; NewRequest carries no status
            // field, so a caller cannot smuggle one in.
            db.execute(
                "INSERT INTO requests (id, user_id, title, description, callback_number, \
                 number_to_call, preferred_time, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    owner_id,
                    fields.title,
                    fields.description,
                    fields.callback_number,
                    fields.number_to_call,
                    fields.preferred_time,
                    RequestStatus::Queued.as_str(),
                ],
            )?;
        }
        self.get_request_row(&id, owner_id).await
    }

    pub(super) async fn delete_request_row(&self, id: &str, owner_id: &str) -> StoreResult<()> {
        let db = self.db.lock().await;
        let deleted = db.execute(
            "DELETE FROM requests WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
        )?;
        if deleted == 0 {
            // Reads hide other owners' rows entirely, but a refused mutation
            // is allowed to distinguish "not there" from "not yours".
            let exists: bool = db.query_row(
                "SELECT EXISTS(SELECT 1 FROM requests WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            return Err(if exists {
                StoreError::Forbidden
            } else {
                StoreError::NotFound
            });
        }
        db.execute("DELETE FROM events WHERE request_id = ?1", params![id])?;
        Ok(())
    }

    pub(super) async fn update_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        summary: Option<&str>,
    ) -> StoreResult<()> {
        let db = self.db.lock().await;
        let updated = db.execute(
            "UPDATE requests SET status = ?2, summary = COALESCE(?3, summary), \
             updated_at = datetime('now') WHERE id = ?1",
            params![request_id, status.as_str(), summary],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
