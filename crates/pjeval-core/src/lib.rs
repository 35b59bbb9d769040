//! pjeval-core: batch evaluation of recorded PJe agent responses.
//! Load a corpus of expected/actual output pairs, score it with the three
//! domain evaluators, render and persist the accuracy report.

pub mod config;
pub mod corpus;
pub mod evaluator;
pub mod report;
pub mod runner;
pub mod testing;

pub mod evaluators {
    pub mod deadline;
    pub mod intimation;
    pub mod petition;
}

pub use config::EvalConfig;
pub use corpus::{
    CorpusError, CorpusSource, EvaluationCorpus, JsonCorpusSource, QueryRecord, ResponsePayload,
    ResponseRecord, VecCorpusSource,
};
pub use evaluator::Evaluator;
pub use evaluators::{
    deadline::DeadlineEvaluator, intimation::IntimationEvaluator,
    petition::PetitionQualityEvaluator,
};
pub use report::{print_report, render_report, save_report, MAX_PERSISTED_ERRORS};
pub use runner::{Evaluation, EvaluationBuilder};

pub use pjeval_types::{EvaluationReport, MetricResult, ReportSummary};
