use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS submissions (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            subject     TEXT NOT NULL,
            message     TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'new',
            priority    TEXT NOT NULL DEFAULT 'medium',
            replied_at  TEXT,
            ip_address  TEXT,
            user_agent  TEXT,
            referrer    TEXT,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_submissions_created
            ON submissions(created_at DESC);

        CREATE TABLE IF NOT EXISTS tags (
            name         TEXT PRIMARY KEY,
            usage_count  INTEGER NOT NULL DEFAULT 0
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
