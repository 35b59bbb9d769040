use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::corpus::CorpusSource;
use crate::evaluator::Evaluator;
use crate::evaluators::{
	deadline::DeadlineEvaluator, intimation::IntimationEvaluator,
	petition::PetitionQualityEvaluator,
};
use pjeval_types::{percent, EvaluationReport, MetricResult, ReportSummary};

/// Detailed scores below this rate trigger a field-focused recommendation.
const FIELD_ATTENTION_THRESHOLD: f64 = 0.8;

pub struct EvaluationBuilder {
	source: Option<Arc<dyn CorpusSource>>,
	evaluators: Vec<Box<dyn Evaluator>>,
}

impl EvaluationBuilder {
	pub fn new() -> Self {
		Self {
			source: None,
			evaluators: default_evaluators(),
		}
	}

	pub fn corpus(mut self, source: Arc<dyn CorpusSource>) -> Self {
		self.source = Some(source);
		self
	}

	/// Replace the default evaluator sequence. Declaration order drives the
	/// report ordering and summary tie-breaks.
	pub fn evaluators<I>(mut self, evaluators: I) -> Self
	where
		I: IntoIterator<Item = Box<dyn Evaluator>>,
	{
		self.evaluators = evaluators.into_iter().collect();
		self
	}

	pub fn build(self) -> Result<Evaluation> {
		Ok(Evaluation {
			source: self.source.ok_or_else(|| anyhow::anyhow!("corpus must be set"))?,
			evaluators: self.evaluators,
		})
	}
}

impl Default for EvaluationBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Drives the evaluators over a loaded corpus and aggregates one report.
pub struct Evaluation {
	source: Arc<dyn CorpusSource>,
	evaluators: Vec<Box<dyn Evaluator>>,
}

impl Evaluation {
	pub fn builder() -> EvaluationBuilder {
		EvaluationBuilder::new()
	}

	pub async fn run(&self) -> Result<EvaluationReport> {
		let corpus = self.source.load().await?;
		tracing::info!(
			queries = corpus.queries.len(),
			responses = corpus.responses.len(),
			"corpus loaded"
		);

		let mut metric_results = Vec::with_capacity(self.evaluators.len());
		for evaluator in &self.evaluators {
			tracing::info!(metric = evaluator.metric_name(), "evaluating");
			let result = evaluator.evaluate(&corpus.responses);
			tracing::info!(
				metric = evaluator.metric_name(),
				accuracy = result.accuracy,
				errors = result.errors.len(),
				"evaluated"
			);
			metric_results.push(result);
		}

		let overall_accuracy = if metric_results.is_empty() {
			0.0
		} else {
			metric_results.iter().map(|r| r.accuracy).sum::<f64>() / metric_results.len() as f64
		};

		Ok(EvaluationReport {
			timestamp: Utc::now().to_rfc3339(),
			total_queries: corpus.responses.len(),
			metrics_evaluated: metric_results.len(),
			overall_accuracy,
			summary: summarize(&metric_results, overall_accuracy),
			recommendations: generate_recommendations(&metric_results),
			metric_results,
		})
	}
}

fn default_evaluators() -> Vec<Box<dyn Evaluator>> {
	vec![
		Box::new(IntimationEvaluator),
		Box::new(PetitionQualityEvaluator),
		Box::new(DeadlineEvaluator),
	]
}

/// Best/worst agents by accuracy; ties resolve to the first metric in
/// declaration order.
fn summarize(results: &[MetricResult], overall_accuracy: f64) -> ReportSummary {
	let mut best: Option<&MetricResult> = None;
	let mut worst: Option<&MetricResult> = None;
	for result in results {
		if best.map_or(true, |b| result.accuracy > b.accuracy) {
			best = Some(result);
		}
		if worst.map_or(true, |w| result.accuracy < w.accuracy) {
			worst = Some(result);
		}
	}

	ReportSummary {
		best_performing_agent: best.map(|r| r.agent_id.clone()).unwrap_or_default(),
		worst_performing_agent: worst.map(|r| r.agent_id.clone()).unwrap_or_default(),
		average_accuracy: overall_accuracy,
		total_errors: results.iter().map(|r| r.errors.len()).sum(),
	}
}

fn generate_recommendations(results: &[MetricResult]) -> Vec<String> {
	let mut recommendations = Vec::new();

	for result in results {
		if result.accuracy < 0.7 {
			recommendations.push(format!(
				"⚠️  {}: Accuracy baixa ({}). Revisar lógica de {}.",
				result.agent_id,
				percent(result.accuracy),
				result.metric_name.to_lowercase()
			));
		} else if result.accuracy < 0.9 {
			recommendations.push(format!(
				"📈 {}: Boa performance ({}), mas há espaço para melhoria.",
				result.agent_id,
				percent(result.accuracy)
			));
		} else {
			recommendations.push(format!(
				"✅ {}: Excelente performance ({})!",
				result.agent_id,
				percent(result.accuracy)
			));
		}

		let low_fields = result.fields_below(FIELD_ATTENTION_THRESHOLD);
		if !low_fields.is_empty() {
			recommendations.push(format!(
				"🔍 {}: Focar em melhorar: {}",
				result.agent_id,
				low_fields.join(", ")
			));
		}
	}

	recommendations
}
