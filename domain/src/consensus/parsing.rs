//! Evaluation response parsing.
//!
//! Extracts a structured [`Score`] and feedback from the free-form text an
//! evaluator model returns. Pure domain logic: no I/O, just locating and
//! validating the JSON object.
//!
//! Malformed output is an expected outcome, so [`parse_evaluation`] returns a
//! tagged [`Result`] and the caller decides what to substitute.

use super::evaluation::{Evaluation, MAX_SCORE, MIN_SCORE, Score};
use crate::core::agent::AgentId;
use serde::Deserialize;
use thiserror::Error;

/// Why an evaluator's output could not be turned into a score
#[derive(Error, Debug)]
pub enum EvaluationParseError {
    #[error("no JSON object found in evaluation output")]
    NoJsonObject,

    #[error("invalid evaluation JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{criterion} score {value} is outside the range 1-10")]
    ScoreOutOfRange { criterion: &'static str, value: f64 },
}

/// A validated critique, not yet bound to evaluator/target identities.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvaluation {
    pub scores: Score,
    pub feedback: String,
}

impl ParsedEvaluation {
    /// Bind the critique to the evaluator and the evaluated agent.
    pub fn into_evaluation(self, evaluator_id: AgentId, target_id: AgentId) -> Evaluation {
        Evaluation::new(evaluator_id, target_id, self.scores, self.feedback)
    }
}

#[derive(Deserialize)]
struct RawEvaluation {
    scores: RawScores,
    feedback: String,
}

#[derive(Deserialize)]
struct RawScores {
    accuracy: f64,
    relevance: f64,
    completeness: f64,
    clarity: f64,
}

/// Parse an evaluator's raw output.
///
/// Takes the substring from the first `{` to the last `}` so that prose or
/// markdown code fences around the object are tolerated. Any total the model
/// supplies is ignored; the total is always recomputed from the subscores.
///
/// # Examples
///
/// ```
/// use consensus_domain::parse_evaluation;
///
/// let raw = r#"Sure! {"scores": {"accuracy": 8, "relevance": 9,
///     "completeness": 7, "clarity": 8}, "feedback": "Solid", "totalScore": 99}"#;
/// let parsed = parse_evaluation(raw).unwrap();
/// assert_eq!(parsed.scores.total(), 32);
///
/// assert!(parse_evaluation("I like it").is_err());
/// ```
pub fn parse_evaluation(raw: &str) -> Result<ParsedEvaluation, EvaluationParseError> {
    let json = extract_json_object(raw).ok_or(EvaluationParseError::NoJsonObject)?;
    let parsed: RawEvaluation = serde_json::from_str(json)?;

    let scores = Score {
        accuracy: validate_score("accuracy", parsed.scores.accuracy)?,
        relevance: validate_score("relevance", parsed.scores.relevance)?,
        completeness: validate_score("completeness", parsed.scores.completeness)?,
        clarity: validate_score("clarity", parsed.scores.clarity)?,
    };

    Ok(ParsedEvaluation {
        scores,
        feedback: parsed.feedback,
    })
}

/// First `{` through last `}` of the text, if both exist in that order.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn validate_score(criterion: &'static str, value: f64) -> Result<u8, EvaluationParseError> {
    if !value.is_finite() || value < f64::from(MIN_SCORE) || value > f64::from(MAX_SCORE) {
        return Err(EvaluationParseError::ScoreOutOfRange { criterion, value });
    }
    // Fractional scores are accepted and rounded; the range check above keeps
    // the result within [1, 10].
    Ok(value.round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"scores": {"accuracy": 8, "relevance": 9, "completeness": 7, "clarity": 10}, "feedback": "Good"}"#;
        let parsed = parse_evaluation(raw).unwrap();
        assert_eq!(parsed.scores, Score::new(8, 9, 7, 10));
        assert_eq!(parsed.feedback, "Good");
    }

    #[test]
    fn test_parse_with_code_fence_and_prose() {
        let raw = r#"
Here is my evaluation:
```json
{"scores": {"accuracy": 6, "relevance": 6, "completeness": 5, "clarity": 7}, "feedback": "Needs examples"}
```
Hope this helps.
"#;
        let parsed = parse_evaluation(raw).unwrap();
        assert_eq!(parsed.scores.total(), 24);
        assert_eq!(parsed.feedback, "Needs examples");
    }

    #[test]
    fn test_supplied_total_is_ignored() {
        let raw = r#"{"scores": {"accuracy": 1, "relevance": 1, "completeness": 1, "clarity": 1}, "feedback": "x", "totalScore": 40}"#;
        let eval = parse_evaluation(raw)
            .unwrap()
            .into_evaluation("a".into(), "b".into());
        assert_eq!(eval.total_score, 4);
    }

    #[test]
    fn test_fractional_scores_are_rounded() {
        let raw = r#"{"scores": {"accuracy": 7.5, "relevance": 8.2, "completeness": 1.0, "clarity": 9.9}, "feedback": "ok"}"#;
        let parsed = parse_evaluation(raw).unwrap();
        assert_eq!(parsed.scores, Score::new(8, 8, 1, 10));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let raw = r#"{"scores": {"accuracy": 11, "relevance": 9, "completeness": 7, "clarity": 8}, "feedback": "x"}"#;
        let err = parse_evaluation(raw).unwrap_err();
        assert!(matches!(
            err,
            EvaluationParseError::ScoreOutOfRange { criterion: "accuracy", .. }
        ));

        let raw = r#"{"scores": {"accuracy": 5, "relevance": 0, "completeness": 7, "clarity": 8}, "feedback": "x"}"#;
        assert!(parse_evaluation(raw).is_err());
    }

    #[test]
    fn test_missing_or_mistyped_fields_rejected() {
        // feedback missing
        let raw = r#"{"scores": {"accuracy": 5, "relevance": 5, "completeness": 5, "clarity": 5}}"#;
        assert!(matches!(
            parse_evaluation(raw),
            Err(EvaluationParseError::InvalidJson(_))
        ));

        // score as string
        let raw = r#"{"scores": {"accuracy": "high", "relevance": 5, "completeness": 5, "clarity": 5}, "feedback": "x"}"#;
        assert!(parse_evaluation(raw).is_err());

        // feedback not text
        let raw = r#"{"scores": {"accuracy": 5, "relevance": 5, "completeness": 5, "clarity": 5}, "feedback": 3}"#;
        assert!(parse_evaluation(raw).is_err());
    }

    #[test]
    fn test_no_json_object() {
        assert!(matches!(
            parse_evaluation("Great answer, 9/10"),
            Err(EvaluationParseError::NoJsonObject)
        ));
        assert!(matches!(
            parse_evaluation("} backwards {"),
            Err(EvaluationParseError::NoJsonObject)
        ));
        assert!(parse_evaluation("").is_err());
    }

    #[test]
    fn test_broken_json_rejected() {
        let raw = r#"{"scores": {"accuracy": 5, "relevance": 5,, }"#;
        assert!(matches!(
            parse_evaluation(raw),
            Err(EvaluationParseError::InvalidJson(_))
        ));
    }
}
