//! Shape checks for status responses.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ApiError, Result};

/// Key holding the list of homework records.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Key holding the server-side timestamp to poll from next.
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Check that a response matches the documented shape and return its records.
///
/// Only the first record is shape-checked. Records are returned in server
/// order, which is assumed to be most recent first.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    info!("checking API response shape");

    let Some(homeworks) = response.get(HOMEWORKS_KEY) else {
        debug!("response has no homeworks key");
        return Err(ApiError::Schema);
    };

    let Some(homeworks) = homeworks.as_array() else {
        debug!("homeworks is not an array");
        return Err(ApiError::Schema);
    };

    match homeworks.first() {
        Some(first) if first.is_object() => Ok(homeworks.as_slice()),
        Some(_) => {
            debug!("first homework is not an object");
            Err(ApiError::Schema)
        }
        None => {
            debug!("homeworks is empty");
            Err(ApiError::Schema)
        }
    }
}

/// Server timestamp to use as the next cursor, if the response carries one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}
