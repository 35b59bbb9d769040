use indexmap::IndexMap;

use crate::corpus::ResponseRecord;
use crate::evaluator::{display, field, rate, Evaluator};
use pjeval_types::MetricResult;

/// Scores the petition-drafting agent. The `estrutura` section list is
/// judged by structural sufficiency (at least [`MIN_STRUCTURE_SECTIONS`]
/// entries, content not inspected); the five boolean quality flags are
/// compared by strict equality.
pub struct PetitionQualityEvaluator;

const METRIC_NAME: &str = "Qualidade de Redação de Petições";
const AGENT_ID: &str = "redacao-peticoes";

/// Minimum number of sections a petition draft must carry to count as
/// structurally complete.
const MIN_STRUCTURE_SECTIONS: usize = 4;

const BOOLEAN_FIELDS: [&str; 5] = [
    "fundamentacaoJuridica",
    "citacaoLegislacao",
    "jurisprudencia",
    "petitosClaros",
    "linguagemFormal",
];

impl Evaluator for PetitionQualityEvaluator {
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

        let mut correct_estrutura = 0.0;
        let mut correct_booleans = [0.0f64; BOOLEAN_FIELDS.len()];
        let mut errors = Vec::new();

        for resp in &relevant {
            let expected = &resp.expected_output;
            let actual = &resp.response.output;

            let sections = field(actual, "estrutura")
                .as_array()
                .map_or(0, |a| a.len());
            if sections >= MIN_STRUCTURE_SECTIONS {
                correct_estrutura += 1.0;
            }

            for (i, name) in BOOLEAN_FIELDS.iter().enumerate() {
                if field(expected, name) == field(actual, name) {
                    correct_booleans[i] += 1.0;
                } else {
                    errors.push(format!(
                        "{}: {} - esperado {}, obtido {}",
                        resp.query_id,
                        name,
                        display(field(expected, name)),
                        display(field(actual, name))
                    ));
                }
            }
        }

        let mut detailed = IndexMap::new();
        detailed.insert("estrutura".to_string(), rate(correct_estrutura, total));
        for (i, name) in BOOLEAN_FIELDS.iter().enumerate() {
            detailed.insert(name.to_string(), rate(correct_booleans[i], total));
        }

        MetricResult::from_field_rates(METRIC_NAME, AGENT_ID, total, detailed, errors)
    }
}
