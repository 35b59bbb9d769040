use serde_json::{Map, Value};

use crate::corpus::ResponseRecord;
use pjeval_types::MetricResult;

/// One evaluation metric over the shared response set.
///
/// Implementations filter to their own `metric_name`, compare a fixed field
/// set and emit a [`MetricResult`]. They hold no state across calls.
pub trait Evaluator: Send + Sync {
    fn metric_name(&self) -> &'static str;
    fn agent_id(&self) -> &'static str;
    fn evaluate(&self, responses: &[ResponseRecord]) -> MetricResult;
}

static NULL: Value = Value::Null;

/// Field lookup with missing-key = null semantics: a key absent on both
/// sides compares equal.
pub(crate) fn field<'a>(output: &'a Map<String, Value>, key: &str) -> &'a Value {
    output.get(key).unwrap_or(&NULL)
}

/// Render a field value for a diagnostic string: strings bare, everything
/// else as JSON.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-field match rate, guarding the empty selection.
pub(crate) fn rate(correct: f64, total: usize) -> f64 {
    if total > 0 {
        correct / total as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_compare_equal() {
        let a = json!({}).as_object().unwrap().clone();
        let b = json!({"other": 1}).as_object().unwrap().clone();
        assert_eq!(field(&a, "tipo"), field(&b, "tipo"));
    }

    #[test]
    fn display_renders_strings_bare() {
        assert_eq!(display(&json!("Sentença")), "Sentença");
        assert_eq!(display(&json!(15)), "15");
        assert_eq!(display(&json!(true)), "true");
        assert_eq!(display(&Value::Null), "null");
    }

    #[test]
    fn rate_guards_division_by_zero() {
        assert_eq!(rate(3.0, 4), 0.75);
        assert_eq!(rate(0.0, 0), 0.0);
    }
}
