use anyhow::Result;

use crate::report::render_report;
use pjeval_types::EvaluationReport;

/// Helper to assert the overall accuracy meets a threshold.
///
/// Use this in your `#[tokio::test]` functions.
///
/// # Example
/// ```ignore
/// #[tokio::test]
/// async fn agents_stay_above_threshold() -> Result<()> {
///     let evaluation = Evaluation::builder().corpus(source).build()?;
///     let report = evaluation.run().await?;
///     assert_min_overall_accuracy(&report, 0.7)?;
///     Ok(())
/// }
/// ```
pub fn assert_min_overall_accuracy(report: &EvaluationReport, min_accuracy: f64) -> Result<()> {
    if report.overall_accuracy < min_accuracy {
        anyhow::bail!(
            "Evaluation failed: overall accuracy {:.1}% is below threshold {:.1}%\n{}",
            report.overall_accuracy * 100.0,
            min_accuracy * 100.0,
            render_report(report)
        );
    }
    Ok(())
}

/// Helper to assert a single metric's accuracy meets a threshold.
pub fn assert_min_metric_accuracy(
    report: &EvaluationReport,
    metric_name: &str,
    min_accuracy: f64,
) -> Result<()> {
    let result = report
        .metric_results
        .iter()
        .find(|r| r.metric_name == metric_name)
        .ok_or_else(|| anyhow::anyhow!("metric '{metric_name}' not present in report"))?;

    if result.accuracy < min_accuracy {
        anyhow::bail!(
            "Evaluation failed: {} accuracy {:.1}% is below threshold {:.1}%\n{}",
            metric_name,
            result.accuracy * 100.0,
            min_accuracy * 100.0,
            render_report(report)
        );
    }
    Ok(())
}
