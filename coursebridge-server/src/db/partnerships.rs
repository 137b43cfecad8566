//! Partner institution database operations

use coursebridge_common::db::models::{Partnership, PartnershipStatus};
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Fields accepted on a public partnership application
#[derive(Debug, Clone)]
pub struct NewPartnership {
    pub organization_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub selected_courses: Vec<i64>,
    pub notes: Option<String>,
}

const PARTNERSHIP_COLUMNS: &str = "id, organization_name, contact_name, contact_email, \
     contact_phone, selected_courses, notes, status, approved_by, approved_at, created_at";

fn partnership_from_row(row: &SqliteRow) -> Result<Partnership> {
    let status: String = row.get("status");
    let status = PartnershipStatus::from_str(&status)
        .ok_or_else(|| Error::Internal(format!("Unknown partnership status '{}'", status)))?;

    let selected_raw: String = row.get("selected_courses");

    Ok(Partnership {
        id: row.get("id"),
        organization_name: row.get("organization_name"),
        contact_name: row.get("contact_name"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
        selected_courses: Partnership::decode_selected_courses(&selected_raw),
        notes: row.get("notes"),
        status,
        approved_by: row.get("approved_by"),
        approved_at: row.get("approved_at"),
        created_at: row.get("created_at"),
    })
}

/// Insert a pending application
pub async fn insert_partnership(pool: &SqlitePool, new: &NewPartnership) -> Result<Partnership> {
    let now = now_rfc3339();
    let selected = Partnership::encode_selected_courses(&new.selected_courses);

    let result = sqlx::query(
        r#"
        INSERT INTO partner_institutions (
            organization_name, contact_name, contact_email, contact_phone,
            selected_courses, notes, status, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(&new.organization_name)
    .bind(&new.contact_name)
    .bind(&new.contact_email)
    .bind(&new.contact_phone)
    .bind(&selected)
    .bind(&new.notes)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(Partnership {
        id: result.last_insert_rowid(),
        organization_name: new.organization_name.clone(),
        contact_name: new.contact_name.clone(),
        contact_email: new.contact_email.clone(),
        contact_phone: new.contact_phone.clone(),
        selected_courses: new.selected_courses.clone(),
        notes: new.notes.clone(),
        status: PartnershipStatus::Pending,
        approved_by: None,
        approved_at: None,
        created_at: now,
    })
}

/// List applications, optionally filtered by status, newest first
pub async fn list_partnerships(
    pool: &SqlitePool,
    status: Option<PartnershipStatus>,
) -> Result<Vec<Partnership>> {
    let rows = match status {
        Some(status) => {
            sqlx::query(&format!(
                "SELECT {} FROM partner_institutions WHERE status = ? ORDER BY id DESC",
                PARTNERSHIP_COLUMNS
            ))
            .bind(status.to_db_string())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM partner_institutions ORDER BY id DESC",
                PARTNERSHIP_COLUMNS
            ))
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(partnership_from_row).collect()
}

/// Record an admin decision on an application. Returns the updated row,
/// or None when the application does not exist.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: PartnershipStatus,
    decided_by: &str,
) -> Result<Option<Partnership>> {
    let now = now_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE partner_institutions
        SET status = ?, approved_by = ?, approved_at = ?
        WHERE id = ?
        "#,
    )
    .bind(status.to_db_string())
    .bind(decided_by)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let row = sqlx::query(&format!(
        "SELECT {} FROM partner_institutions WHERE id = ?",
        PARTNERSHIP_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| partnership_from_row(&row)).transpose()
}

/// Physically delete an application
pub async fn delete_partnership(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM partner_institutions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
