use crate::Database;
use crate::models::{SubmissionRow, TagRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

/// Insert parameters for a new submission. Status and priority take their
/// schema defaults ('new'/'medium').
pub struct NewSubmission<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub referrer: Option<&'a str>,
    pub created_at: &'a str,
}

impl Database {
    // -- Submissions --

    pub fn insert_submission(&self, new: &NewSubmission<'_>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO submissions
                    (id, name, email, subject, message, ip_address, user_agent, referrer, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                rusqlite::params![
                    new.id,
                    new.name,
                    new.email,
                    new.subject,
                    new.message,
                    new.ip_address,
                    new.user_agent,
                    new.referrer,
                    new.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_submission(&self, id: &str) -> Result<Option<SubmissionRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM submissions WHERE id = ?1", SUBMISSION_COLS),
                [id],
                submission_from_row,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Newest first, the order the admin inbox shows them.
    pub fn list_submissions(&self, limit: u32) -> Result<Vec<SubmissionRow>> {
        self.with_conn(|conn| query_submissions(conn, limit))
    }

    /// Selectively update status/priority/replied-at; absent fields keep
    /// their current value. Returns false when the id does not exist.
    pub fn update_submission(
        &self,
        id: &str,
        status: Option<&str>,
        priority: Option<&str>,
        replied_at: Option<&str>,
        updated_at: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE submissions SET
                    status     = COALESCE(?2, status),
                    priority   = COALESCE(?3, priority),
                    replied_at = COALESCE(?4, replied_at),
                    updated_at = ?5
                 WHERE id = ?1",
                rusqlite::params![id, status, priority, replied_at, updated_at],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Tags --

    /// Tags with at least one use, in insertion order. Callers sort.
    pub fn list_tags(&self) -> Result<Vec<TagRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, usage_count FROM tags WHERE usage_count > 0 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TagRow {
                        name: row.get(0)?,
                        usage_count: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Insert a tag or overwrite its usage count. The count itself is
    /// maintained by the blog publishing pipeline; this side only reads.
    pub fn upsert_tag(&self, name: &str, usage_count: u64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO tags (name, usage_count) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET usage_count = excluded.usage_count",
                rusqlite::params![name, usage_count],
            )?;
            Ok(())
        })
    }
}

const SUBMISSION_COLS: &str = "id, name, email, subject, message, status, priority, replied_at, ip_address, user_agent, referrer, created_at, updated_at";

fn submission_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubmissionRow> {
    Ok(SubmissionRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        status: row.get(5)?,
        priority: row.get(6)?,
        replied_at: row.get(7)?,
        ip_address: row.get(8)?,
        user_agent: row.get(9)?,
        referrer: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn query_submissions(conn: &Connection, limit: u32) -> Result<Vec<SubmissionRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM submissions ORDER BY created_at DESC LIMIT ?1",
        SUBMISSION_COLS
    ))?;
    let rows = stmt
        .query_map([limit], submission_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
