use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::corpus::ResponseRecord;
use crate::evaluator::{display, field, rate, Evaluator};
use pjeval_types::MetricResult;

/// Scores the deadline-management agent: limit date, calendar days and
/// business days by strict equality, holidays through a count-or-list
/// comparison, and alerts as sets with partial credit on overlap.
pub struct DeadlineEvaluator;

const METRIC_NAME: &str = "Precisão de Cálculo de Prazos";
const AGENT_ID: &str = "gestao-prazos";

/// The holiday field travels in two historical wire shapes: a bare count or
/// the list of holiday names.
enum Holidays<'a> {
	Count(i64),
	List(&'a [Value]),
	Other(&'a Value),
}

fn classify(value: &Value) -> Holidays<'_> {
	if let Some(n) = value.as_i64() {
		Holidays::Count(n)
	} else if let Some(items) = value.as_array() {
		Holidays::List(items)
	} else {
		Holidays::Other(value)
	}
}

/// List/list compares as sets; count/list matches when the count equals the
/// list length, in either direction; any other pairing falls back to raw
/// equality.
fn holidays_match(expected: &Value, actual: &Value) -> bool {
	match (classify(expected), classify(actual)) {
		(Holidays::List(e), Holidays::List(a)) => value_set(e) == value_set(a),
		(Holidays::Count(n), Holidays::List(items)) => n >= 0 && n as usize == items.len(),
		(Holidays::List(items), Holidays::Count(n)) => n >= 0 && items.len() == n as usize,
		_ => expected == actual,
	}
}

/// Exact set equality earns full credit, a non-empty intersection earns
/// half, disjoint sets earn nothing.
fn alert_credit(expected: &Value, actual: &Value) -> f64 {
	let empty = Vec::new();
	let e = value_set(expected.as_array().unwrap_or(&empty));
	let a = value_set(actual.as_array().unwrap_or(&empty));
	if e == a {
		1.0
	} else if e.intersection(&a).next().is_some() {
		0.5
	} else {
		0.0
	}
}

fn value_set(items: &[Value]) -> BTreeSet<String> {
	items.iter().map(display).collect()
}

impl Evaluator for DeadlineEvaluator {
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

		let mut correct_data_limite = 0.0;
		let mut correct_dias_corridos = 0.0;
		let mut correct_dias_uteis = 0.0;
		let mut correct_feriados = 0.0;
		let mut correct_alertas = 0.0;
		let mut errors = Vec::new();

		let empty_list = Value::Array(Vec::new());

		for resp in &relevant {
			let expected = &resp.expected_output;
			let actual = &resp.response.output;

			if field(expected, "dataLimite") == field(actual, "dataLimite") {
				correct_data_limite += 1.0;
			} else {
				errors.push(format!(
					"{}: Data limite - esperado '{}', obtido '{}'",
					resp.query_id,
					display(field(expected, "dataLimite")),
					display(field(actual, "dataLimite"))
				));
			}

			if field(expected, "diasCorridos") == field(actual, "diasCorridos") {
				correct_dias_corridos += 1.0;
			}

			// null-equals-null counts as a match
			if field(expected, "diasUteis") == field(actual, "diasUteis") {
				correct_dias_uteis += 1.0;
			}

			let expected_feriados = expected.get("feriadosNoIntervalo").unwrap_or(&empty_list);
			let actual_feriados = actual.get("feriadosNoIntervalo").unwrap_or(&empty_list);
			if holidays_match(expected_feriados, actual_feriados) {
				correct_feriados += 1.0;
			}

			let expected_alertas = expected.get("alertas").unwrap_or(&empty_list);
			let actual_alertas = actual.get("alertas").unwrap_or(&empty_list);
			correct_alertas += alert_credit(expected_alertas, actual_alertas);
		}

		let mut detailed = IndexMap::new();
		detailed.insert(
			"accuracy_dataLimite".to_string(),
			rate(correct_data_limite, total),
		);
		detailed.insert(
			"accuracy_diasCorridos".to_string(),
			rate(correct_dias_corridos, total),
		);
		detailed.insert(
			"accuracy_diasUteis".to_string(),
			rate(correct_dias_uteis, total),
		);
		detailed.insert("accuracy_feriados".to_string(), rate(correct_feriados, total));
		detailed.insert("accuracy_alertas".to_string(), rate(correct_alertas, total));

		MetricResult::from_field_rates(METRIC_NAME, AGENT_ID, total, detailed, errors)
	}
}
