use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::Position,
    error::{ErrorBody, ReplyError},
};

/// POST body of the grading call: item texts in displayed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitAnswerRequest(pub Vec<String>);

impl SubmitAnswerRequest {
    pub fn new(order: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(order.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub correct: bool,
    pub message: String,
    #[serde(deserialize_with = "attempts_display")]
    pub attempts: String,
    pub remaining_attempts: i64,
    /// `state[i]` is the slot the item currently at slot `i` belongs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
}

impl SubmissionResult {
    pub fn expected_positions(&self) -> Option<&[Position]> {
        if self.correct {
            return None;
        }
        self.state.as_deref()
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.remaining_attempts == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttemptsField {
    Text(String),
    Count(i64),
}

fn attempts_display<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AttemptsField::deserialize(deserializer)? {
        AttemptsField::Text(text) => text,
        AttemptsField::Count(count) => count.to_string(),
    })
}

/// Decoded outcome of one grading call.
#[derive(Debug, Clone, PartialEq)]
pub enum GradingReply {
    Graded(SubmissionResult),
    Failed { status: u16, body: ErrorBody },
}

impl GradingReply {
    pub fn decode(status: u16, body: &[u8]) -> Result<Self, ReplyError> {
        if (200..300).contains(&status) {
            let result = serde_json::from_slice::<SubmissionResult>(body)
                .map_err(|source| ReplyError::Malformed { status, source })?;
            return Ok(Self::Graded(result));
        }

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(body) => Ok(Self::Failed { status, body }),
            Err(_) => Err(ReplyError::MissingErrorBody { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_bare_array() {
        let request = SubmitAnswerRequest::new(["Apple", "Banana", "Cherry"]);
        assert_eq!(
            serde_json::to_string(&request).expect("json"),
            r#"["Apple","Banana","Cherry"]"#
        );
    }

    #[test]
    fn accepts_integer_attempts_and_missing_state() {
        let result: SubmissionResult = serde_json::from_str(
            r#"{"correct":true,"message":"Correct (1.0/1.0)","attempts":2,"remaining_attempts":1}"#,
        )
        .expect("json");
        assert_eq!(result.attempts, "2");
        assert!(result.state.is_none());
        assert!(result.expected_positions().is_none());
    }

    #[test]
    fn correct_reply_ignores_state_for_marking() {
        let result: SubmissionResult = serde_json::from_str(
            r#"{"correct":true,"message":"ok","attempts":"1/3","remaining_attempts":2,"state":[0,1,2]}"#,
        )
        .expect("json");
        assert!(result.expected_positions().is_none());
    }

    #[test]
    fn decodes_failure_body_for_non_success_status() {
        let reply = GradingReply::decode(409, br#"{"error":"Max number of attempts reached"}"#)
            .expect("decode");
        assert_eq!(
            reply,
            GradingReply::Failed {
                status: 409,
                body: ErrorBody::new("Max number of attempts reached"),
            }
        );
    }

    #[test]
    fn failure_without_error_field_is_reported() {
        let err = GradingReply::decode(502, b"<html>bad gateway</html>").expect_err("must fail");
        assert!(matches!(err, ReplyError::MissingErrorBody { status: 502 }));
    }

    #[test]
    fn malformed_success_body_keeps_status() {
        let err = GradingReply::decode(200, b"{}").expect_err("must fail");
        assert_eq!(err.status(), 200);
    }
}
