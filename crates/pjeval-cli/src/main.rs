use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pjeval_core::{print_report, save_report, EvalConfig, Evaluation, JsonCorpusSource};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pjeval", about = "Score recorded PJe agent responses against expected outputs")]
struct Cli {
	/// Queries document: { "queries": [...] }
	#[arg(long)]
	queries: Option<PathBuf>,

	/// Responses document: { "responses": [...] }
	#[arg(long)]
	responses: Option<PathBuf>,

	/// Where to persist the JSON report
	#[arg(long)]
	output: Option<PathBuf>,

	/// YAML config file supplying any of the three paths; explicit flags win
	#[arg(long)]
	config: Option<PathBuf>,

	/// Enable verbose output
	#[arg(short, long)]
	verbose: bool,
}

struct Verdict {
	code: u8,
	message: &'static str,
}

/// Exit signaling: accuracy below 70% fails the run; the 70-90% band passes
/// with a caveat.
fn verdict(overall_accuracy: f64) -> Verdict {
	if overall_accuracy < 0.7 {
		Verdict {
			code: 1,
			message: "❌ Avaliação falhou: Accuracy abaixo de 70%",
		}
	} else if overall_accuracy < 0.9 {
		Verdict {
			code: 0,
			message: "⚠️  Avaliação passou com ressalvas: Accuracy entre 70-90%",
		}
	} else {
		Verdict {
			code: 0,
			message: "✅ Avaliação passou: Accuracy acima de 90%",
		}
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	let filter = if cli.verbose {
		EnvFilter::new("pjeval_core=debug,info")
	} else {
		EnvFilter::new("pjeval_core=info,warn")
	};
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let mut config = match &cli.config {
		Some(path) => EvalConfig::from_yaml_file(path)?,
		None => EvalConfig::default(),
	};
	if let Some(queries) = cli.queries {
		config.queries = queries;
	}
	if let Some(responses) = cli.responses {
		config.responses = responses;
	}
	if let Some(output) = cli.output {
		config.output = output;
	}

	let source = Arc::new(JsonCorpusSource::new(&config.queries, &config.responses));
	let evaluation = Evaluation::builder().corpus(source).build()?;
	let report = evaluation.run().await?;

	// console first: the rendering must survive a failed write
	print_report(&report);
	save_report(&report, &config.output).await?;

	let verdict = verdict(report.overall_accuracy);
	println!("{}", verdict.message);
	Ok(ExitCode::from(verdict.code))
}
