//! Tag Entity

use chrono::{DateTime, Utc};
use kernel::id::TagId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
