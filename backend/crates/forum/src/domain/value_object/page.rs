//! Page Index Value Object
//!
//! Zero-based page number for category listings.

use std::str::FromStr;

use crate::error::ForumError;

/// Posts returned per category page
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageIndex(i64);

impl PageIndex {
    pub fn new(index: i64) -> Result<Self, ForumError> {
        if index < 0 || index.checked_mul(PAGE_SIZE).is_none() {
            return Err(ForumError::validation("Invalid page index"));
        }
        Ok(Self(index))
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn limit(self) -> i64 {
        PAGE_SIZE
    }

    /// Rows to skip; never overflows by construction
    pub fn offset(self) -> i64 {
        self.0 * PAGE_SIZE
    }
}

impl FromStr for PageIndex {
    type Err = ForumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ForumError::validation("Invalid page index"))?;
        Self::new(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!("0".parse::<PageIndex>().unwrap().offset(), 0);
        assert_eq!("3".parse::<PageIndex>().unwrap().offset(), 30);
    }

    #[test]
    fn test_invalid_indexes() {
        let max = i64::MAX.to_string();
        for bad in ["-1", "abc", "", "1.5", max.as_str()] {
            let err = bad.parse::<PageIndex>().unwrap_err();
            assert_eq!(err.to_string(), "Invalid page index", "{bad}");
        }
    }
}
