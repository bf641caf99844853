//! BuildGuard CLI - PC parts combination compatibility checks from the command line.

use anyhow::{bail, Context};
use buildguard::{AIRouter, BuildGuardCore, ComboInput, EngineConfig, Verdict};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "buildguard")]
#[command(about = "PC parts compatibility and power-budget checker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single combination (quote text or JSON records)
    Check {
        /// Combination file, or "-" for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Check every candidate in a multi-candidate text or a JSON array
    Batch {
        /// Candidates file, or "-" for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// List available compatibility rules
    Rules {
        /// Show detailed rule descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct RunOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Exit with error code if any verdict has findings at this severity or higher
    #[arg(long, value_enum)]
    fail_on: Option<FailOn>,

    /// Never call an arbiter; ambiguous checks become warnings
    #[arg(long)]
    no_ai: bool,

    /// JSON engine configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Preferred arbiter provider
    #[arg(long, value_enum)]
    provider: Option<ProviderChoice>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOn {
    Issue,
    Warning,
}

#[derive(Clone, ValueEnum)]
enum ProviderChoice {
    Openai,
    Ollama,
}

impl ProviderChoice {
    fn as_str(&self) -> &'static str {
        match self {
            ProviderChoice::Openai => "openai",
            ProviderChoice::Ollama => "ollama",
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check { file, opts } => {
            init_tracing(opts.verbose);
            report(handle_check(&file, &opts).await, &opts)
        }
        Commands::Batch { file, opts } => {
            init_tracing(opts.verbose);
            report(handle_batch(&file, &opts).await, &opts)
        }
        Commands::Rules { verbose } => handle_rules(verbose),
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(result: anyhow::Result<Vec<(String, Verdict)>>, opts: &RunOptions) -> i32 {
    match result {
        Ok(verdicts) => {
            output_results(&verdicts, &opts.format);
            match &opts.fail_on {
                Some(fail_on) if verdicts.iter().any(|(_, v)| should_fail(v, fail_on)) => 1,
                _ => 0,
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn handle_check(file: &Path, opts: &RunOptions) -> anyhow::Result<Vec<(String, Verdict)>> {
    let core = build_core(opts).await?;
    let text = read_input(file)?;

    let verdict = core.evaluate(&ComboInput::detect(&text)).await;
    Ok(vec![(source_name(file), verdict)])
}

async fn handle_batch(file: &Path, opts: &RunOptions) -> anyhow::Result<Vec<(String, Verdict)>> {
    let core = build_core(opts).await?;
    let text = read_input(file)?;

    let verdicts = if text.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&text).context("batch file is not a JSON array")?;
        let inputs = values
            .iter()
            .map(|v| ComboInput::from_json_str(&v.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .context("batch entry is not a JSON object")?;
        core.evaluate_batch(&inputs).await
    } else {
        core.evaluate_text_batch(&text).await
    };

    if verdicts.is_empty() {
        bail!("no candidate combinations found in {}", source_name(file));
    }

    let source = source_name(file);
    Ok(verdicts
        .into_iter()
        .enumerate()
        .map(|(i, v)| (format!("{} #{}", source, i + 1), v))
        .collect())
}

async fn build_core(opts: &RunOptions) -> anyhow::Result<BuildGuardCore> {
    let mut config = match &opts.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(provider) = &opts.provider {
        config.arbiter.preferred_provider = provider.as_str().to_string();
    }
    if opts.no_ai {
        config.arbiter.enabled = false;
    }

    let core = BuildGuardCore::new(config.clone())?;
    if !config.arbiter.enabled {
        return Ok(core);
    }

    let router = AIRouter::from_config(
        &config.arbiter,
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OLLAMA_URL").ok(),
    );
    match router.get_provider().await {
        Some(provider) => Ok(core.with_provider(provider)),
        None => {
            tracing::warn!("No arbiter available; ambiguous checks will be reported as warnings");
            Ok(core)
        }
    }
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn source_name(file: &Path) -> String {
    if file.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        file.display().to_string()
    }
}

fn should_fail(verdict: &Verdict, fail_on: &FailOn) -> bool {
    match fail_on {
        FailOn::Issue => !verdict.compatible,
        FailOn::Warning => !verdict.compatible || verdict.has_warnings(),
    }
}

fn output_results(results: &[(String, Verdict)], format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(results),
        OutputFormat::Json => output_json(results),
    }
}

fn output_human(results: &[(String, Verdict)]) {
    for (source, verdict) in results {
        println!("\nCombination: {}", source);
        println!("{}", "─".repeat(60));

        if verdict.compatible {
            println!("  ✅ Compatible");
        } else {
            println!("  ❌ Incompatible");
        }

        if !verdict.issues.is_empty() {
            println!("\n  ISSUES:");
            for issue in &verdict.issues {
                println!("    - {}", issue);
            }
        }
        if !verdict.warnings.is_empty() {
            println!("\n  WARNINGS:");
            for warning in &verdict.warnings {
                println!("    - {}", warning);
            }
        }

        if let Some(power) = &verdict.power {
            println!("\n  Power:");
            println!("    {}", power.breakdown());
        }
    }

    if results.len() > 1 {
        let compatible = results.iter().filter(|(_, v)| v.compatible).count();
        println!("\nSummary: {} of {} combinations compatible", compatible, results.len());
    }
}

fn output_json(results: &[(String, Verdict)]) {
    let output = serde_json::json!({
        "results": results.iter().map(|(source, verdict)| {
            serde_json::json!({
                "source": source,
                "verdict": verdict,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total": results.len(),
            "compatible": results.iter().filter(|(_, v)| v.compatible).count(),
            "issues": results.iter().map(|(_, v)| v.issues.len()).sum::<usize>(),
            "warnings": results.iter().map(|(_, v)| v.warnings.len()).sum::<usize>(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to serialize results: {}", e),
    }
}

fn handle_rules(verbose: bool) -> i32 {
    let core = match BuildGuardCore::new(EngineConfig::default()) {
        Ok(core) => core,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("Available compatibility rules:\n");
    for rule in core.rules().rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.description());
        }
        println!();
    }
    0
}
