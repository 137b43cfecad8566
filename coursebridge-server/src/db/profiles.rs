//! Learner profile database operations

use coursebridge_common::db::models::Profile;
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::Result;
use sqlx::{Row, SqlitePool};

/// Contact fields captured alongside an enrollment
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub special_needs: Option<String>,
}

/// Create or refresh a learner profile. Absent fields keep their stored
/// values; admin status is never touched from this path.
pub async fn upsert_profile(pool: &SqlitePool, user_id: &str, update: &ProfileUpdate) -> Result<()> {
    let now = now_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO profiles (
            user_id, full_name, phone, emergency_contact, special_needs,
            is_admin, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            full_name = COALESCE(excluded.full_name, full_name),
            phone = COALESCE(excluded.phone, phone),
            emergency_contact = COALESCE(excluded.emergency_contact, emergency_contact),
            special_needs = COALESCE(excluded.special_needs, special_needs),
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(&update.full_name)
    .bind(&update.phone)
    .bind(&update.emergency_contact)
    .bind(&update.special_needs)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch one profile by user id
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, full_name, phone, emergency_contact, special_needs,
               is_admin, created_at, updated_at
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Profile {
        user_id: row.get("user_id"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        emergency_contact: row.get("emergency_contact"),
        special_needs: row.get("special_needs"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

/// True when the user's profile carries the admin flag
pub async fn is_admin(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let flag: Option<i64> =
        sqlx::query_scalar("SELECT is_admin FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(flag.unwrap_or(0) != 0)
}
