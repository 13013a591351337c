use rusqlite::{OptionalExtension, params};

use super::types::Profile;
use super::{SqliteStore, StoreResult};

impl SqliteStore {
    pub(super) async fn get_profile_row(&self, user_id: &str) -> StoreResult<Option<Profile>> {
        let db = self.db.lock().await;
        let profile = db
            .query_row(
                "SELECT user_id, username, default_callback_number, street, house_number, \
                 postal_code, city, country, calendar_connected \
                 FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Profile {
                        user_id: row.get(0)?,
                        username: row.get(1)?,
                        default_callback_number: row.get(2)?,
                        street: row.get(3)?,
                        house_number: row.get(4)?,
                        postal_code: row.get(5)?,
                        city: row.get(6)?,
                        country: row.get(7)?,
                        calendar_connected: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    pub(super) async fn upsert_profile_row(&self, profile: &Profile) -> StoreResult<()> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO profiles (user_id, username, default_callback_number, \
             street, house_number, postal_code, city, country, calendar_connected) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                profile.user_id,
                profile.username,
                profile.default_callback_number,
                profile.street,
                profile.house_number,
                profile.postal_code,
                profile.city,
                profile.country,
                profile.calendar_connected,
            ],
        )?;
        Ok(())
    }
}
