use indexmap::IndexMap;

use crate::corpus::ResponseRecord;
use crate::evaluator::{display, field, rate, Evaluator};
use pjeval_types::MetricResult;

/// Scores the intimation-analysis agent: document type, deadline, limit
/// date, urgency and whether a manifestation is required, each by strict
/// equality against the expected output.
pub struct IntimationEvaluator;

const METRIC_NAME: &str = "Precisão de Análise de Intimações";
const AGENT_ID: &str = "justine";

impl Evaluator for IntimationEvaluator {
	fn metric_name(&self) -> &'static str {
		METRIC_NAME
	}

	fn agent_id(&self) -> &'static str {
		AGENT_ID
	}

	fn evaluate(&self, responses: &[ResponseRecord]) -> MetricResult {
		let relevant: Vec<&ResponseRecord> =
			responses.iter().filter(|r| r.metric == METRIC_NAME).collect();
		let total = relevant.len();

		let mut correct_tipo = 0.0;
		let mut correct_prazo = 0.0;
		let mut correct_data_limite = 0.0;
		let mut correct_urgencia = 0.0;
		let mut correct_manifestacao = 0.0;
		let mut errors = Vec::new();

		for resp in &relevant {
			let expected = &resp.expected_output;
			let actual = &resp.response.output;

			if field(expected, "tipo") == field(actual, "tipo") {
				correct_tipo += 1.0;
			} else {
				errors.push(format!(
					"{}: Tipo incorreto - esperado '{}', obtido '{}'",
					resp.query_id,
					display(field(expected, "tipo")),
					display(field(actual, "tipo"))
				));
			}

			if field(expected, "prazo") == field(actual, "prazo") {
				correct_prazo += 1.0;
			} else {
				errors.push(format!(
					"{}: Prazo incorreto - esperado '{}', obtido '{}'",
					resp.query_id,
					display(field(expected, "prazo")),
					display(field(actual, "prazo"))
				));
			}

			// null-equals-null counts as a match
			if field(expected, "dataLimite") == field(actual, "dataLimite") {
				correct_data_limite += 1.0;
			} else {
				errors.push(format!(
					"{}: Data limite incorreta - esperado '{}', obtido '{}'",
					resp.query_id,
					display(field(expected, "dataLimite")),
					display(field(actual, "dataLimite"))
				));
			}

			if field(expected, "urgencia") == field(actual, "urgencia") {
				correct_urgencia += 1.0;
			} else {
				errors.push(format!(
					"{}: Urgência incorreta - esperado '{}', obtido '{}'",
					resp.query_id,
					display(field(expected, "urgencia")),
					display(field(actual, "urgencia"))
				));
			}

			// mismatches here are counted but never logged
			if field(expected, "requerManifestacao") == field(actual, "requerManifestacao") {
				correct_manifestacao += 1.0;
			}
		}

		let mut detailed = IndexMap::new();
		detailed.insert("accuracy_tipo".to_string(), rate(correct_tipo, total));
		detailed.insert("accuracy_prazo".to_string(), rate(correct_prazo, total));
		detailed.insert(
			"accuracy_dataLimite".to_string(),
			rate(correct_data_limite, total),
		);
		detailed.insert("accuracy_urgencia".to_string(), rate(correct_urgencia, total));
		detailed.insert(
			"accuracy_manifestacao".to_string(),
			rate(correct_manifestacao, total),
		);

		MetricResult::from_field_rates(METRIC_NAME, AGENT_ID, total, detailed, errors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn record(expected: serde_json::Value, output: serde_json::Value) -> ResponseRecord {
		serde_json::from_value(json!({
			"queryId": "int-001",
			"metric": METRIC_NAME,
			"expectedOutput": expected,
			"response": {"output": output}
		}))
		.unwrap()
	}

	#[test]
	fn perfect_match_scores_one_everywhere() {
		let responses = vec![record(
			json!({
				"tipo": "Contestação",
				"prazo": 15,
				"dataLimite": "2025-02-10",
				"urgencia": "alta",
				"requerManifestacao": true
			}),
			json!({
				"tipo": "Contestação",
				"prazo": 15,
				"dataLimite": "2025-02-10",
				"urgencia": "alta",
				"requerManifestacao": true
			}),
		)];

		let result = IntimationEvaluator.evaluate(&responses);
		assert_eq!(result.total_queries, 1);
		assert_eq!(result.accuracy, 1.0);
		assert!(result.errors.is_empty());
	}

	#[test]
	fn null_data_limite_matches_null() {
		let responses = vec![record(
			json!({"tipo": "Sentença", "dataLimite": null}),
			json!({"tipo": "Sentença", "dataLimite": null}),
		)];

		let result = IntimationEvaluator.evaluate(&responses);
		assert_eq!(result.detailed_scores["accuracy_dataLimite"], 1.0);
	}

	#[test]
	fn mismatches_are_logged_except_manifestacao() {
		let responses = vec![record(
			json!({
				"tipo": "Sentença",
				"prazo": 10,
				"dataLimite": "2025-02-10",
				"urgencia": "alta",
				"requerManifestacao": true
			}),
			json!({
				"tipo": "Contestação",
				"prazo": 10,
				"dataLimite": "2025-02-10",
				"urgencia": "alta",
				"requerManifestacao": false
			}),
		)];

		let result = IntimationEvaluator.evaluate(&responses);
		assert_eq!(result.detailed_scores["accuracy_tipo"], 0.0);
		assert_eq!(result.detailed_scores["accuracy_manifestacao"], 0.0);
		assert_eq!(result.errors.len(), 1);
		assert_eq!(
			result.errors[0],
			"int-001: Tipo incorreto - esperado 'Sentença', obtido 'Contestação'"
		);
	}

	#[test]
	fn no_relevant_responses_yields_zero_rates() {
		let other: ResponseRecord = serde_json::from_value(json!({
			"queryId": "q",
			"metric": "Outra Métrica",
			"expectedOutput": {},
			"response": {"output": {}}
		}))
		.unwrap();

		let result = IntimationEvaluator.evaluate(&[other]);
		assert_eq!(result.total_queries, 0);
		assert_eq!(result.accuracy, 0.0);
		assert_eq!(result.f1_score, 0.0);
		assert!(result.errors.is_empty());
	}
}
