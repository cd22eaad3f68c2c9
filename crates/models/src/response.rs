use crate::{error::EngineError, records::GradeStatus};
use serde::Serialize;
use uuid::Uuid;

/// Successful body: `{"success": true, ...payload}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

/// Failed body: `{"error": "..."}`, plus the conflicting course codes for a schedule warning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
}

/// What every named operation hands back to its caller. Never both a success and an error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse<T> {
    Success(Success<T>),
    Failure(Failure),
}

impl<T> ActionResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self::Success(Success {
            success: true,
            payload,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Failure(Failure {
            error: message.into(),
            conflicts: Vec::new(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(&failure.error),
        }
    }
}

impl<T> From<EngineError> for ActionResponse<T> {
    fn from(err: EngineError) -> Self {
        let conflicts = match &err {
            EngineError::ScheduleConflict { conflicts } => conflicts
                .iter()
                .map(|course| course.course_code.clone())
                .collect(),
            _ => Vec::new(),
        };

        Self::Failure(Failure {
            error: err.to_string(),
            conflicts,
        })
    }
}

impl<T> From<Result<T, EngineError>> for ActionResponse<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(err) => err.into(),
        }
    }
}

/// Success with nothing else to report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ack {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOutcome {
    pub grade_id: Uuid,
    pub status: GradeStatus,
}

/// What a save did to the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SaveOutcome {
    Created {
        #[serde(rename = "gradeId")]
        grade_id: Uuid,
    },
    Updated {
        #[serde(rename = "gradeId")]
        grade_id: Uuid,
    },
    /// An empty grade cleared an existing record
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub is_in_progress: bool,
}

/// Which step of the delete fallback chain succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    Scoped,
    Unscoped,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub method: DeleteMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    /// Grade records removed
    pub deleted: u64,
}

/// Wraps payloads that are not JSON objects, such as lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> From<T> for Data<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollOutcome {
    pub enrollment_id: Uuid,
    /// Courses the student chose to overlap with
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden_conflicts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Course;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let response = ActionResponse::ok(ToggleOutcome {
            is_in_progress: true,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "isInProgress": true})
        );

        let response: ActionResponse<Ack> = Ok(Ack {}).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true})
        );
    }

    #[test]
    fn test_tagged_payload_shape() {
        let id = Uuid::nil();
        let response = ActionResponse::ok(SaveOutcome::Created { grade_id: id });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "action": "created", "gradeId": id})
        );

        let response = ActionResponse::ok(SaveOutcome::Deleted);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "action": "deleted"})
        );
    }

    #[test]
    fn test_list_payload_is_wrapped() {
        let response = ActionResponse::ok(Data::from(vec!["Work Term 1", "Work Term 2"]));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "data": ["Work Term 1", "Work Term 2"]})
        );
    }

    #[test]
    fn test_error_shape() {
        let response: ActionResponse<Ack> = Err(EngineError::AlreadyEnrolled).into();
        assert!(!response.is_success());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "You are already enrolled in this course."})
        );
    }

    #[test]
    fn test_conflict_warning_lists_courses() {
        let course = Course {
            id: Uuid::nil(),
            course_code: "MATH 1P66".to_string(),
            course_days: Some("MW".to_string()),
            class_time: Some("9:00-10:00".to_string()),
            course_duration: None,
            instructor: None,
            class_type: None,
        };
        let response: ActionResponse<EnrollOutcome> = EngineError::ScheduleConflict {
            conflicts: vec![course],
        }
        .into();

        assert_eq!(response.error_message(), Some("Schedule conflict with MATH 1P66"));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "Schedule conflict with MATH 1P66", "conflicts": ["MATH 1P66"]})
        );
    }
}
