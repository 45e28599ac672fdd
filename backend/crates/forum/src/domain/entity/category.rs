//! Category Entity
//!
//! Categories are seeded by operators; the API only reads them.

use chrono::{DateTime, Utc};
use kernel::id::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description,
            created_at: Utc::now(),
        }
    }
}
