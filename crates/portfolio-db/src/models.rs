/// Database row types — these map directly to SQLite rows.
/// Distinct from portfolio-types API models to keep the DB layer
/// independent; timestamps stay RFC 3339 strings until the API layer
/// parses them.

pub struct SubmissionRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub replied_at: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct TagRow {
    pub name: String,
    pub usage_count: u64,
}
