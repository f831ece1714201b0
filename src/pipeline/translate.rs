// src/pipeline/translate.rs

//! Status message rendering.

use serde_json::Value;

use crate::error::Result;
use crate::models::{HomeworkRecord, Messages};

/// Turn the latest homework record into a status-change sentence.
pub fn parse_status(record: &Value, messages: &Messages) -> Result<String> {
    let record = HomeworkRecord::from_value(record)?;
    Ok(messages.status_changed(&record.name, record.status))
}
