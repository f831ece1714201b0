// src/pipeline/validate.rs

//! Response shape validation.

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::models::HomeworkBatch;

/// Check a raw API reply and split it into homeworks and cursor.
///
/// The homework list may be empty. A `current_date` that is not an
/// integer is ignored rather than rejected.
pub fn check_response(body: Value) -> Result<HomeworkBatch> {
    let Value::Object(mut object) = body else {
        return Err(SchemaError::NotAnObject.into());
    };

    let homeworks = match object.remove("homeworks") {
        None => return Err(SchemaError::MissingHomeworks.into()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(SchemaError::HomeworksNotArray.into()),
    };

    let current_date = match object.get("current_date") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let cursor = value.as_i64();
            if cursor.is_none() {
                log::warn!("Ignoring non-integer current_date: {}", value);
            }
            cursor
        }
    };

    Ok(HomeworkBatch {
        homeworks,
        current_date,
    })
}
