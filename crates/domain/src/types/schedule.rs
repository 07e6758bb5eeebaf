//! Academic schedule records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde::lenient_datetime;

/// Academic block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub block_id: String,
    pub name: String,
    #[serde(default)]
    pub school_level: String,
}

/// One free occurrence of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBlock {
    pub block: Block,
    #[serde(with = "lenient_datetime")]
    pub start: DateTime<Utc>,
    #[serde(with = "lenient_datetime")]
    pub end: DateTime<Utc>,
}

impl FreeBlock {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Free blocks found within a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBlockCollection {
    #[serde(default)]
    pub free_blocks: Vec<FreeBlock>,
    pub in_range: NaiveDate,
}
