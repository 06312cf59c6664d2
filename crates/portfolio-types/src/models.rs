use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Contact submissions --

/// Lifecycle of a submission in the admin inbox. Visitors create
/// submissions as `New`; only the admin workflow moves them forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "read" => Some(Self::Read),
            "replied" => Some(Self::Replied),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl SubmissionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// A persisted contact submission. Tracking fields come from the request
/// that carried the form, never from the submitter's own input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: SubmissionStatus,
    pub priority: SubmissionPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

// -- Tags --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagSortKey {
    #[default]
    Count,
    Name,
}

impl TagSortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "count" => Some(Self::Count),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Sort tags in place. Count comparison is numeric; name comparison is
/// case-insensitive. `sort_by` is stable, so equal keys keep their input
/// order in both directions.
pub fn sort_tags(tags: &mut [Tag], key: TagSortKey, order: SortOrder) {
    tags.sort_by(|a, b| {
        let cmp = match key {
            TagSortKey::Count => a.count.cmp(&b.count),
            TagSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match order {
            SortOrder::Asc => cmp,
            SortOrder::Desc => cmp.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, count: u64) -> Tag {
        Tag {
            name: name.into(),
            count,
        }
    }

    #[test]
    fn sort_by_count_desc() {
        let mut tags = vec![tag("a", 2), tag("b", 5)];
        sort_tags(&mut tags, TagSortKey::Count, SortOrder::Desc);
        assert_eq!(tags, vec![tag("b", 5), tag("a", 2)]);
    }

    #[test]
    fn sort_by_name_asc() {
        let mut tags = vec![tag("zeta", 1), tag("alpha", 9)];
        sort_tags(&mut tags, TagSortKey::Name, SortOrder::Asc);
        assert_eq!(tags, vec![tag("alpha", 9), tag("zeta", 1)]);
    }

    #[test]
    fn name_comparison_ignores_case() {
        let mut tags = vec![tag("Rust", 3), tag("async", 1), tag("Testing", 2)];
        sort_tags(&mut tags, TagSortKey::Name, SortOrder::Asc);
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["async", "Rust", "Testing"]);
    }

    #[test]
    fn equal_counts_keep_input_order() {
        let mut tags = vec![tag("first", 4), tag("second", 4), tag("third", 4)];
        sort_tags(&mut tags, TagSortKey::Count, SortOrder::Desc);
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn status_roundtrips_through_str() {
        for status in [
            SubmissionStatus::New,
            SubmissionStatus::Read,
            SubmissionStatus::Replied,
            SubmissionStatus::Archived,
        ] {
            assert_eq!(SubmissionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubmissionStatus::parse("junk"), None);
    }
}
