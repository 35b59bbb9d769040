use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors raised while loading the evaluation corpus. Both variants are
/// fatal: a run never starts on a partial corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One test case from the queries document. The framework only counts these;
/// any further keys in the document are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
}

/// One recorded agent answer paired with its expected output.
///
/// Extra keys produced by the upstream harness (status, executionTime,
/// conversation history, ...) are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub query_id: String,
    pub metric: String,
    pub expected_output: Map<String, Value>,
    pub response: ResponsePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// The agent's structured output; an errored run may omit it entirely.
    #[serde(default)]
    pub output: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryDocument {
    queries: Vec<QueryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseDocument {
    responses: Vec<ResponseRecord>,
}

/// The two input documents, loaded and validated.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCorpus {
    pub queries: Vec<QueryRecord>,
    pub responses: Vec<ResponseRecord>,
}

#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn load(&self) -> Result<EvaluationCorpus, CorpusError>;
}

/// In-memory corpus, for library callers and tests.
pub struct VecCorpusSource {
    corpus: EvaluationCorpus,
}

impl VecCorpusSource {
    pub fn new(queries: Vec<QueryRecord>, responses: Vec<ResponseRecord>) -> Self {
        Self {
            corpus: EvaluationCorpus { queries, responses },
        }
    }
}

#[async_trait]
impl CorpusSource for VecCorpusSource {
    async fn load(&self) -> Result<EvaluationCorpus, CorpusError> {
        Ok(self.corpus.clone())
    }
}

/// Reads the queries document (`{ "queries": [...] }`) and the responses
/// document (`{ "responses": [...] }`) from disk.
pub struct JsonCorpusSource {
    queries_path: PathBuf,
    responses_path: PathBuf,
}

impl JsonCorpusSource {
    pub fn new(queries_path: impl Into<PathBuf>, responses_path: impl Into<PathBuf>) -> Self {
        Self {
            queries_path: queries_path.into(),
            responses_path: responses_path.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for JsonCorpusSource {
    async fn load(&self) -> Result<EvaluationCorpus, CorpusError> {
        let queries: QueryDocument = read_json(&self.queries_path).await?;
        let responses: ResponseDocument = read_json(&self.responses_path).await?;
        Ok(EvaluationCorpus {
            queries: queries.queries,
            responses: responses.responses,
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CorpusError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| CorpusError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_record_parses_harness_output() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "queryId": "intimation-001",
            "metric": "Precisão de Análise de Intimações",
            "input": {"texto": "Intimação..."},
            "expectedOutput": {"tipo": "Contestação", "prazo": 15},
            "response": {
                "status": "success",
                "output": {"tipo": "Contestação", "prazo": 15},
                "executionTime": 812,
                "timestamp": "2025-01-01T00:00:00Z",
                "agentId": "justine"
            }
        }))
        .unwrap();

        assert_eq!(record.query_id, "intimation-001");
        assert_eq!(record.expected_output["prazo"], json!(15));
        assert_eq!(record.response.output["tipo"], json!("Contestação"));
    }

    #[test]
    fn missing_output_defaults_to_empty_map() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "queryId": "q1",
            "metric": "m",
            "expectedOutput": {"tipo": "Sentença"},
            "response": {"status": "error", "error": "timeout"}
        }))
        .unwrap();

        assert!(record.response.output.is_empty());
    }

    #[test]
    fn missing_expected_output_is_a_parse_error() {
        let result: Result<ResponseRecord, _> = serde_json::from_value(json!({
            "queryId": "q1",
            "metric": "m",
            "response": {"output": {}}
        }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = JsonCorpusSource::new("/nonexistent/queries.json", "/nonexistent/responses.json");
        match source.load().await {
            Err(CorpusError::Io { path, .. }) => {
                assert!(path.ends_with("queries.json"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn vec_source_round_trips() {
        let source = VecCorpusSource::new(vec![], vec![]);
        let corpus = source.load().await.unwrap();
        assert!(corpus.queries.is_empty());
        assert!(corpus.responses.is_empty());
    }
}
