use std::path::Path;

use anyhow::{Context, Result};

use pjeval_types::{percent, EvaluationReport};

/// Errors kept per metric in the persisted report.
pub const MAX_PERSISTED_ERRORS: usize = 10;

/// Render the report for the console: banner, run facts, per-metric table,
/// detailed-score breakdown and numbered recommendations, in that order.
pub fn render_report(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);
    let thin_rule = "-".repeat(70);

    out.push_str(&format!("{rule}\n"));
    out.push_str("📊 RELATÓRIO DE AVALIAÇÃO - ASSISTENTE JURÍDICO PJE\n");
    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("🕒 Timestamp: {}\n", report.timestamp));
    out.push_str(&format!("📊 Total de Queries: {}\n", report.total_queries));
    out.push_str(&format!(
        "📈 Accuracy Geral: {}\n",
        percent(report.overall_accuracy)
    ));
    out.push_str(&format!(
        "🏆 Melhor Agente: {}\n",
        report.summary.best_performing_agent
    ));
    out.push_str(&format!(
        "⚠️  Total de Erros: {}\n",
        report.summary.total_errors
    ));

    out.push_str(&format!("\n{thin_rule}\n"));
    out.push_str("📋 RESULTADOS POR MÉTRICA:\n");
    out.push_str(&format!("{thin_rule}\n"));
    out.push_str(&report.metric_table());
    out.push('\n');

    for result in &report.metric_results {
        out.push_str(&format!("\n🔹 {} ({})\n", result.metric_name, result.agent_id));
        out.push_str("   Scores Detalhados:\n");
        for (field, score) in &result.detailed_scores {
            out.push_str(&format!("      - {}: {}\n", field, percent(*score)));
        }
    }

    out.push_str(&format!("\n{thin_rule}\n"));
    out.push_str("💡 RECOMENDAÇÕES:\n");
    out.push_str(&format!("{thin_rule}\n"));
    for (i, rec) in report.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rec));
    }

    out.push_str(&format!("\n{rule}\n"));
    out
}

pub fn print_report(report: &EvaluationReport) {
    println!("{}", render_report(report));
}

/// Persist the report as pretty JSON, truncating each metric's errors to
/// [`MAX_PERSISTED_ERRORS`]. Parent directories are created as needed.
pub async fn save_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let persisted = report.with_errors_truncated(MAX_PERSISTED_ERRORS);
    let json = serde_json::to_string_pretty(&persisted)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "report saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pjeval_types::{MetricResult, ReportSummary};

    fn sample_report() -> EvaluationReport {
        let mut detailed = IndexMap::new();
        detailed.insert("accuracy_tipo".to_string(), 0.75);
        detailed.insert("accuracy_prazo".to_string(), 1.0);
        let result = MetricResult::from_field_rates(
            "Precisão de Análise de Intimações",
            "justine",
            4,
            detailed,
            vec!["q1: Tipo incorreto - esperado 'a', obtido 'b'".to_string()],
        );

        EvaluationReport {
            timestamp: "2025-06-01T12:00:00+00:00".to_string(),
            total_queries: 4,
            metrics_evaluated: 1,
            overall_accuracy: result.accuracy,
            summary: ReportSummary {
                best_performing_agent: "justine".to_string(),
                worst_performing_agent: "justine".to_string(),
                average_accuracy: result.accuracy,
                total_errors: 1,
            },
            recommendations: vec!["📈 justine: Boa performance (87.50%), mas há espaço para melhoria.".to_string()],
            metric_results: vec![result],
        }
    }

    #[test]
    fn rendering_orders_sections_deterministically() {
        let text = render_report(&sample_report());

        let header = text.find("RELATÓRIO DE AVALIAÇÃO").unwrap();
        let metrics = text.find("RESULTADOS POR MÉTRICA").unwrap();
        let details = text.find("Scores Detalhados").unwrap();
        let recs = text.find("RECOMENDAÇÕES").unwrap();
        assert!(header < metrics && metrics < details && details < recs);

        assert!(text.contains("📈 Accuracy Geral: 87.50%"));
        assert!(text.contains("- accuracy_tipo: 75.00%"));
        assert!(text.contains("1. 📈 justine"));
    }

    #[tokio::test]
    async fn saved_report_is_reloadable_and_truncated() {
        let mut report = sample_report();
        report.metric_results[0].errors =
            (0..25).map(|i| format!("q{i}: Tipo incorreto")).collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/evaluation-report.json");
        save_report(&report, &path).await.unwrap();

        let reloaded: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.overall_accuracy, report.overall_accuracy);
        assert_eq!(reloaded.metric_results[0].accuracy, report.metric_results[0].accuracy);
        assert_eq!(reloaded.metric_results[0].errors.len(), MAX_PERSISTED_ERRORS);
        // in-memory report keeps the full error list
        assert_eq!(report.metric_results[0].errors.len(), 25);
    }
}
