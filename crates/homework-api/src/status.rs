//! Mapping from homework status codes to verdict messages.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

/// Key holding the homework name inside a record.
pub const HOMEWORK_NAME_KEY: &str = "homework_name";

/// Key holding the status code inside a record.
pub const STATUS_KEY: &str = "status";

/// Review status of a homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// Accepted by the reviewer.
    Approved,
    /// Taken for review.
    Reviewing,
    /// Returned with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Status code as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

/// Build the notification text for a homework record.
///
/// The record must carry a non-null `homework_name` and a `status` from the
/// known set; unknown codes are rejected rather than passed through.
pub fn parse_status(homework: &Value) -> Result<String> {
    let name = match homework.get(HOMEWORK_NAME_KEY) {
        None | Some(Value::Null) => return Err(ApiError::MissingHomework),
        Some(Value::String(name)) => name.clone(),
        // Non-string names are shown in their JSON form.
        Some(other) => other.to_string(),
    };

    let raw_status = homework.get(STATUS_KEY).and_then(Value::as_str);
    let status = raw_status
        .and_then(|s| s.parse::<HomeworkStatus>().ok())
        .ok_or_else(|| ApiError::UnknownStatus {
            name: name.clone(),
            status: raw_status.unwrap_or_default().to_string(),
        })?;

    debug!(homework = %name, status = %status, "parsed homework status");

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_approved_message() {
        let homework = json!({"homework_name": "lab1", "status": "approved"});
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Изменился статус проверки работы \"lab1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_every_known_status_mentions_name() {
        for status in HomeworkStatus::ALL {
            let homework = json!({"homework_name": "final_project", "status": status.as_str()});
            let message = parse_status(&homework).unwrap();
            assert!(message.contains("final_project"));
            assert!(message.ends_with(status.verdict()));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let homework = json!({"homework_name": "lab1", "status": "unknown"});
        match parse_status(&homework) {
            Err(ApiError::UnknownStatus { name, status }) => {
                assert_eq!(name, "lab1");
                assert_eq!(status, "unknown");
            }
            other => panic!("expected UnknownStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_status_rejected() {
        let homework = json!({"homework_name": "lab1"});
        assert!(matches!(
            parse_status(&homework),
            Err(ApiError::UnknownStatus { .. })
        ));
    }

    #[test]
    fn test_missing_name_rejected() {
        let homework = json!({"status": "approved"});
        assert!(matches!(parse_status(&homework), Err(ApiError::MissingHomework)));
    }

    #[test]
    fn test_null_name_rejected() {
        let homework = json!({"homework_name": null, "status": "approved"});
        assert!(matches!(parse_status(&homework), Err(ApiError::MissingHomework)));
    }

    #[test]
    fn test_numeric_name_accepted() {
        let homework = json!({"homework_name": 123, "status": "rejected"});
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Изменился статус проверки работы \"123\". Работа проверена: у ревьюера есть замечания."
        );
    }

    #[test]
    fn test_status_round_trip_through_str() {
        assert_eq!("reviewing".parse::<HomeworkStatus>(), Ok(HomeworkStatus::Reviewing));
        assert!("Approved".parse::<HomeworkStatus>().is_err());
        assert_eq!(HomeworkStatus::Rejected.to_string(), "rejected");
    }
}
