//! Parse model output into a reasoned verdict

use crate::error::ParseError;
use serde_json::Value;
use verity_domain::{ReasonedVerdict, Verdict};

/// Parse a model response into a verdict
///
/// Accepts the JSON object bare, wrapped in a markdown code fence, or
/// surrounded by prose: everything from the first `{` to the last `}` is
/// parsed. `verdict`, `confidence` and `explanation` are required;
/// `red_flags` is optional.
pub fn parse_reasoner_response(response: &str, model: &str) -> Result<ReasonedVerdict, ParseError> {
    let json_str = extract_json(response)?;
    let json: Value =
        serde_json::from_str(json_str).map_err(|e| ParseError::Json(e.to_string()))?;
    let obj = json.as_object().ok_or(ParseError::Field("verdict"))?;

    let verdict_str = obj
        .get("verdict")
        .and_then(|v| v.as_str())
        .ok_or(ParseError::Field("verdict"))?;
    let verdict = Verdict::parse(verdict_str)
        .ok_or_else(|| ParseError::UnknownVerdict(verdict_str.to_string()))?;

    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_f64())
        .ok_or(ParseError::Field("confidence"))?;
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(ParseError::ConfidenceOutOfRange(confidence.to_string()));
    }

    let explanation = obj
        .get("explanation")
        .and_then(|v| v.as_str())
        .ok_or(ParseError::Field("explanation"))?
        .trim()
        .to_string();

    let red_flags = match obj.get("red_flags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(_) => return Err(ParseError::Field("red_flags")),
    };

    Ok(ReasonedVerdict {
        verdict,
        confidence,
        explanation,
        red_flags,
        model_used: model.to_string(),
    })
}

/// Locate the JSON object inside a response
fn extract_json(response: &str) -> Result<&str, ParseError> {
    let start = response.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = response.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end <= start {
        return Err(ParseError::NoJsonObject);
    }
    Ok(&response[start..=end])
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: arbitrary model output never panics the parser
        #[test]
        fn test_arbitrary_text_never_panics(text in ".*") {
            let _ = parse_reasoner_response(&text, "m");
        }

        /// Property: confidence outside [0, 1] is always a structural failure
        #[test]
        fn test_out_of_range_confidence_rejected(
            confidence in prop_oneof![-1000.0f64..-0.0001, 1.0001f64..1000.0],
        ) {
            let response = format!(
                r#"{{"verdict": "false", "confidence": {}, "explanation": "x"}}"#,
                confidence
            );
            prop_assert!(matches!(
                parse_reasoner_response(&response, "m"),
                Err(ParseError::ConfidenceOutOfRange(_))
            ));
        }
    }
}
