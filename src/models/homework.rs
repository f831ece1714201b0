//! Homework data structures.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Review status reported for a homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl FromStr for HomeworkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }
}

/// A single homework entry from the review API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    /// Homework identifier (`homework_name` on the wire)
    pub name: String,

    pub status: HomeworkStatus,
}

/// Wire form of a homework entry; unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawHomework {
    homework_name: Option<String>,
    status: Option<String>,
}

impl HomeworkRecord {
    /// Decode a raw homework object.
    ///
    /// Both fields must be present strings; the status must be a known value.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(AppError::incomplete("homework record is not an object"));
        }
        let raw = RawHomework::deserialize(value)
            .map_err(|e| AppError::incomplete(format!("malformed homework record: {e}")))?;

        let name = raw
            .homework_name
            .ok_or_else(|| AppError::incomplete("homework_name"))?;
        let status = raw.status.ok_or_else(|| AppError::incomplete("status"))?;

        Ok(Self {
            name,
            status: status.parse()?,
        })
    }
}

/// Validated API reply: homeworks newest first plus the optional cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeworkBatch {
    pub homeworks: Vec<Value>,

    /// Server cursor for the next window (`current_date` on the wire)
    pub current_date: Option<i64>,
}

impl HomeworkBatch {
    /// Most recent homework, if any.
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}
