use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Scoring outcome of a single evaluation metric.
///
/// The evaluators compute symmetric per-field match rates; precision and
/// recall are copies of the accuracy (no confusion matrix is modeled), so
/// construct through [`MetricResult::from_field_rates`] to keep the
/// `accuracy == mean(detailed_scores)` invariant intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
	pub metric_name: String,
	pub agent_id: String,
	pub total_queries: usize,
	pub successful_evaluations: usize,
	pub accuracy: f64,
	pub precision: f64,
	pub recall: f64,
	pub f1_score: f64,
	pub detailed_scores: IndexMap<String, f64>,
	pub errors: Vec<String>,
}

impl MetricResult {
	/// Build a result from per-field match rates.
	///
	/// Accuracy is the unweighted mean of `detailed_scores`; precision and
	/// recall mirror it, and F1 degenerates to 0 when both are 0.
	pub fn from_field_rates(
		metric_name: impl Into<String>,
		agent_id: impl Into<String>,
		total_queries: usize,
		detailed_scores: IndexMap<String, f64>,
		errors: Vec<String>,
	) -> Self {
		let accuracy = if detailed_scores.is_empty() {
			0.0
		} else {
			detailed_scores.values().sum::<f64>() / detailed_scores.len() as f64
		};
		let precision = accuracy;
		let recall = accuracy;
		let f1_score = if precision + recall > 0.0 {
			2.0 * precision * recall / (precision + recall)
		} else {
			0.0
		};

		Self {
			metric_name: metric_name.into(),
			agent_id: agent_id.into(),
			total_queries,
			successful_evaluations: total_queries,
			accuracy,
			precision,
			recall,
			f1_score,
			detailed_scores,
			errors,
		}
	}

	/// Fields whose match rate sits below `threshold`, in declaration order.
	pub fn fields_below(&self, threshold: f64) -> Vec<&str> {
		self.detailed_scores
			.iter()
			.filter(|(_, score)| **score < threshold)
			.map(|(field, _)| field.as_str())
			.collect()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
	pub best_performing_agent: String,
	pub worst_performing_agent: String,
	pub average_accuracy: f64,
	pub total_errors: usize,
}

/// Aggregated outcome of one evaluation run over all metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
	pub timestamp: String,
	pub total_queries: usize,
	pub metrics_evaluated: usize,
	pub overall_accuracy: f64,
	pub metric_results: Vec<MetricResult>,
	pub summary: ReportSummary,
	pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
struct MetricRow {
	metric: String,
	agent: String,
	queries: usize,
	accuracy: String,
	precision: String,
	recall: String,
	f1: String,
}

impl EvaluationReport {
	/// Copy of the report with each metric's error list cut to `max_errors`.
	/// Numeric fields are untouched.
	pub fn with_errors_truncated(&self, max_errors: usize) -> Self {
		let mut report = self.clone();
		for result in &mut report.metric_results {
			result.errors.truncate(max_errors);
		}
		report
	}

	/// Render the per-metric rates as a console table.
	pub fn metric_table(&self) -> String {
		use tabled::Table;
		let rows: Vec<MetricRow> = self
			.metric_results
			.iter()
			.map(|r| MetricRow {
				metric: r.metric_name.clone(),
				agent: r.agent_id.clone(),
				queries: r.total_queries,
				accuracy: percent(r.accuracy),
				precision: percent(r.precision),
				recall: percent(r.recall),
				f1: percent(r.f1_score),
			})
			.collect();

		Table::new(rows).to_string()
	}
}

/// Format a fraction as a percentage with two decimals, e.g. `85.00%`.
pub fn percent(value: f64) -> String {
	format!("{:.2}%", value * 100.0)
}
