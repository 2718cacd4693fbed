//! Command-line runner for finsight evaluations
//!
//! # Usage
//!
//! ```bash
//! # Score every case in an eval set against the running web service
//! finsight-eval --api-base http://localhost:8080 batch --eval-set eval_set.csv
//!
//! # One company through an OpenAI-compatible endpoint
//! export OPENAI_API_KEY="sk-..."
//! finsight-eval --generator openai evaluate "Apple Inc." --ticker AAPL --sector Technology
//!
//! # Re-score a saved report without generating anything
//! finsight-eval score reports/apple.md --ticker AAPL --low 164.08 --high 199.62
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use finsight_core::{GeneratedReport, ReportGenerator};
use finsight_eval::{
    EvalConfig, EvalRequest, EvaluationRun, EvaluationSession, Evaluator, load_eval_set, render_run,
    render_summary, run_batch,
};
use finsight_generators::{
    FixtureGenerator, JobApiConfig, JobApiGenerator, OpenAiConfig, OpenAiReportGenerator,
};
use finsight_utils::{LogFormat, init_tracing_with};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Parser, Debug)]
#[command(name = "finsight-eval")]
#[command(about = "Evaluate generated financial research reports", long_about = None)]
struct Cli {
    /// Where reports come from
    #[arg(long, value_enum, default_value_t = GeneratorKind::JobApi, global = true)]
    generator: GeneratorKind,

    /// Base URL of the job API, or of the OpenAI-compatible endpoint
    #[arg(long, env = "FINSIGHT_API_BASE", global = true)]
    api_base: Option<String>,

    /// Directory of saved reports for the fixtures generator
    #[arg(long, default_value = "reports", global = true)]
    fixtures_dir: PathBuf,

    /// Model used for generation and cost rates
    #[arg(long, global = true)]
    model: Option<String>,

    /// TOML or JSON evaluation config
    #[arg(long, env = "FINSIGHT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GeneratorKind {
    /// FinSight web service job queue
    JobApi,
    /// Single chat completion
    Openai,
    /// Reports saved on disk
    Fixtures,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every case of a CSV eval set
    Batch {
        #[arg(long)]
        eval_set: PathBuf,

        /// Skip response time, cost and content quality metrics
        #[arg(long)]
        basic: bool,

        /// Results CSV [default: enhanced_evaluation_results.csv, or evaluation_results.csv with --basic]
        #[arg(long)]
        results: Option<PathBuf>,

        /// Summary report JSON
        #[arg(long, default_value = "evaluation_report.json")]
        report: PathBuf,
    },
    /// Evaluate a single company
    Evaluate {
        company: String,

        #[command(flatten)]
        refs: References,

        #[arg(long)]
        basic: bool,
    },
    /// Score an existing report file without generating one
    Score {
        report_file: PathBuf,

        /// Company name recorded for the run [default: file stem]
        #[arg(long)]
        company: Option<String>,

        #[command(flatten)]
        refs: References,

        #[arg(long)]
        basic: bool,
    },
}

/// Reference values; each one given enables the matching check
#[derive(Args, Debug, Default)]
struct References {
    #[arg(long)]
    ticker: Option<String>,

    #[arg(long)]
    sector: Option<String>,

    /// 52-week high
    #[arg(long)]
    high: Option<f64>,

    /// 52-week low
    #[arg(long)]
    low: Option<f64>,

    /// Expected current price
    #[arg(long)]
    price: Option<f64>,
}

impl References {
    fn to_request(&self, company: &str) -> EvalRequest {
        let mut request = EvalRequest::new(company);
        request.expected_price = self.price;
        request.expected_ticker.clone_from(&self.ticker);
        request.high = self.high;
        request.low = self.low;
        match &self.sector {
            Some(sector) => request.with_sector(sector),
            None => request,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing_with(format, "warn,finsight_eval=info,finsight_generators=info,finsight_cli=info");

    match &cli.command {
        Commands::Batch {
            eval_set,
            basic,
            results,
            report,
        } => {
            let config = load_config(&cli, *basic)?;
            let results = results.clone().unwrap_or_else(|| default_results_path(*basic));
            run_batch_command(&cli, config, eval_set, &results, report).await
        }
        Commands::Evaluate {
            company,
            refs,
            basic,
        } => {
            let config = load_config(&cli, *basic)?;
            let evaluator = Evaluator::new(build_generator(&cli).await?, config)?;

            let run = evaluator.evaluate(&refs.to_request(company)).await;
            println!("{}", render_run(&run));
            if let Some(error) = run.error() {
                anyhow::bail!("evaluation of {company} failed: {error}");
            }
            Ok(())
        }
        Commands::Score {
            report_file,
            company,
            refs,
            basic,
        } => {
            let config = load_config(&cli, *basic)?;
            let run = score_file(config, report_file, company.as_deref(), refs)?;
            println!("{}", render_run(&run));
            Ok(())
        }
    }
}

fn default_results_path(basic: bool) -> PathBuf {
    if basic {
        PathBuf::from("evaluation_results.csv")
    } else {
        PathBuf::from("enhanced_evaluation_results.csv")
    }
}

/// File config, then `FINSIGHT_*` overrides, then command-line flags
fn load_config(cli: &Cli, basic: bool) -> anyhow::Result<EvalConfig> {
    let config = match &cli.config {
        Some(path) => EvalConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EvalConfig::default(),
    };

    let mut config = config.with_env_overrides();
    if basic {
        config.enhanced_mode = false;
    }
    if let Some(model) = &cli.model {
        config.model.clone_from(model);
    }
    config.validate()?;
    Ok(config)
}

/// Build the selected generator; the job API is probed for liveness first
async fn build_generator(cli: &Cli) -> anyhow::Result<Arc<dyn ReportGenerator>> {
    let generator: Arc<dyn ReportGenerator> = match cli.generator {
        GeneratorKind::JobApi => {
            let base = cli.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
            let generator = JobApiGenerator::new(JobApiConfig::new(base))?;
            match generator.health().await {
                Ok(true) => info!(api_base = base, "Job API is healthy"),
                Ok(false) => warn!(api_base = base, "Job API reports unhealthy status"),
                Err(e) => warn!(api_base = base, error = %e, "Job API health check failed"),
            }
            Arc::new(generator)
        }
        GeneratorKind::Openai => {
            let mut config = OpenAiConfig::from_env()?;
            if let Some(base) = &cli.api_base {
                config = config.with_api_base(base);
            }
            if let Some(model) = &cli.model {
                config = config.with_model(model);
            }
            Arc::new(OpenAiReportGenerator::with_config(config)?)
        }
        GeneratorKind::Fixtures => Arc::new(FixtureGenerator::new(&cli.fixtures_dir)),
    };
    info!(generator = generator.name(), "Report generator ready");
    Ok(generator)
}

async fn run_batch_command(
    cli: &Cli,
    config: EvalConfig,
    eval_set: &Path,
    results: &Path,
    report: &Path,
) -> anyhow::Result<()> {
    let cases = load_eval_set(eval_set)
        .with_context(|| format!("loading eval set from {}", eval_set.display()))?;
    if cases.is_empty() {
        warn!(path = %eval_set.display(), "Eval set has no cases");
    }

    let mut session = EvaluationSession::from_config(&config);
    let evaluator = Evaluator::new(build_generator(cli).await?, config)?;
    let mode = if evaluator.config().enhanced_mode {
        "enhanced"
    } else {
        "basic"
    };
    println!(
        "Running {mode} evaluation of {} cases ({} analyzer)",
        cases.len(),
        evaluator.analyzer_name()
    );

    let total = cases.len();
    run_batch(&evaluator, &mut session, &cases, |position, case, run| {
        println!("\n[{position}/{total}] {}", case.company_name);
        println!("{}", render_run(run));
    })
    .await;

    let rows = session.save_results(results)?;
    if rows > 0 {
        println!("\nResults saved to {}", results.display());
    }

    let summary = session.report();
    summary.save_json(report)?;
    println!("Report saved to {}", report.display());
    println!("{}", render_summary(&summary));
    Ok(())
}

/// Score a saved report with no generation step; response time is zero
fn score_file(
    config: EvalConfig,
    path: &Path,
    company: Option<&str>,
    refs: &References,
) -> anyhow::Result<EvaluationRun> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading report {}", path.display()))?;
    let company = company.map(str::to_string).unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let evaluator = Evaluator::new(Arc::new(FixtureGenerator::new(dir)), config)?;
    let request = refs.to_request(&company);

    let now = Instant::now();
    let evaluations = evaluator.score_report(&request, &GeneratedReport::new(text.as_str()), now, now);
    Ok(EvaluationRun::completed(company, text, evaluations, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use finsight_eval::CheckKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch() {
        let cli = Cli::try_parse_from([
            "finsight-eval",
            "--generator",
            "fixtures",
            "batch",
            "--eval-set",
            "eval_set.csv",
            "--basic",
        ])
        .unwrap();

        assert_eq!(cli.generator, GeneratorKind::Fixtures);
        match cli.command {
            Commands::Batch {
                eval_set,
                basic,
                results,
                report,
            } => {
                assert_eq!(eval_set, PathBuf::from("eval_set.csv"));
                assert!(basic);
                assert!(results.is_none());
                assert_eq!(report, PathBuf::from("evaluation_report.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_evaluate_with_references() {
        let cli = Cli::try_parse_from([
            "finsight-eval",
            "evaluate",
            "Apple Inc.",
            "--ticker",
            "AAPL",
            "--low",
            "164.08",
            "--high",
            "199.62",
            "--model",
            "gpt-3.5-turbo",
        ])
        .unwrap();

        assert_eq!(cli.generator, GeneratorKind::JobApi);
        assert_eq!(cli.model.as_deref(), Some("gpt-3.5-turbo"));
        let Commands::Evaluate { company, refs, basic } = cli.command else {
            panic!("expected evaluate");
        };
        assert!(!basic);
        let request = refs.to_request(&company);
        assert_eq!(request.company_input, "Apple Inc.");
        assert_eq!(request.expected_ticker.as_deref(), Some("AAPL"));
        assert_eq!(request.low, Some(164.08));
        assert_eq!(request.high, Some(199.62));
        assert_eq!(request.expected_price, None);
    }

    #[test]
    fn test_default_results_path() {
        assert_eq!(default_results_path(true), PathBuf::from("evaluation_results.csv"));
        assert_eq!(default_results_path(false), PathBuf::from("enhanced_evaluation_results.csv"));
    }

    #[test]
    fn test_score_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apple.md");
        std::fs::write(
            &path,
            "Apple Inc. (AAPL) trades at $190.00. Recent news: earnings beat.",
        )
        .unwrap();

        let config = EvalConfig::builder().enhanced_mode(false).build().unwrap();
        let refs = References {
            ticker: Some("AAPL".to_string()),
            ..References::default()
        };
        let run = score_file(config, &path, None, &refs).unwrap();

        assert_eq!(run.company, "apple");
        assert_eq!(run.response_time(), 0.0);
        assert!(run.check(CheckKind::TickerAccuracy).unwrap().passed);
        assert!(run.check(CheckKind::ResponseTime).is_none());
    }

    #[test]
    fn test_references_trim_sector() {
        let refs = References {
            sector: Some(" Technology ".to_string()),
            price: Some(190.0),
            ..References::default()
        };
        let request = refs.to_request("Apple Inc.");
        assert_eq!(request.sector.as_deref(), Some("Technology"));
        assert_eq!(request.expected_price, Some(190.0));
    }

    #[tokio::test]
    async fn test_job_api_generator_checks_health() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let cli = Cli::try_parse_from([
            "finsight-eval",
            "--api-base",
            server.uri().as_str(),
            "evaluate",
            "Apple Inc.",
        ])
        .unwrap();

        // An unhealthy service is logged, not fatal
        let generator = build_generator(&cli).await.unwrap();
        assert_eq!(generator.name(), "job-api");
    }
}
