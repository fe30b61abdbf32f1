use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use auditr::config::Config;
use auditr::llm::{OpenAiClient, OpenAiConfig};
use auditr::mall::{MallClient, OrderSource};
use auditr::monitor::Monitor;
use auditr::notify;
use auditr::react::{ReactEngine, StepOutcome};
use auditr::tools::ToolExecutor;
use auditr::verdict::Verdict;

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("auditr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("auditr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Clients and engine wired from a validated config
struct Auditor {
    llm: Arc<OpenAiClient>,
    mall: Arc<MallClient>,
    engine: ReactEngine<OpenAiClient>,
}

fn build_auditor(config: &Config) -> Result<Auditor> {
    config.validate().context("Invalid configuration")?;

    let llm = Arc::new(
        OpenAiClient::new(config.api_key()?, OpenAiConfig::from(&config.llm))
            .context("Failed to create LLM client")?,
    );
    let mall = Arc::new(MallClient::new(&config.mall).context("Failed to create mall client")?);
    if mall.token().is_none() {
        println!("{}", "Warning: mall.token is not set, ledger lookups will fail".yellow());
    }

    let engine = ReactEngine::for_audit(llm.clone(), mall.clone(), config).context("Failed to build audit engine")?;

    Ok(Auditor { llm, mall, engine })
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Watch { once } => handle_watch_command(*once, config).await,
        Commands::Audit { question, trace } => handle_audit_command(question, *trace, config).await,
        Commands::Tools => handle_tools_command(config),
        Commands::CheckConfig => handle_check_config_command(config),
    }
}

async fn handle_watch_command(once: bool, config: &Config) -> Result<()> {
    info!("Handling watch command (once: {})", once);
    let Auditor { llm, mall, engine } = build_auditor(config)?;
    let notifiers = notify::from_config(&config.notify).context("Failed to create notifiers")?;
    let source: Arc<dyn OrderSource> = mall;
    let monitor = Monitor::with_config(engine, source, notifiers, config);

    if once {
        println!("{}", "Scanning latest orders...".cyan());
        let reports = monitor.scan_once().await;
        if reports.is_empty() {
            println!("{}", "No new orders".dimmed());
        }
        let flagged = reports.iter().filter(|r| r.verdict.needs_attention()).count();
        println!("{} audited, {} flagged", reports.len(), flagged);
    } else {
        println!(
            "{} every {:.1} minutes, Ctrl-C to stop",
            "Watching orders".cyan().bold(),
            monitor.interval().as_secs_f64() / 60.0
        );
        let scans = monitor.run().await;
        println!("{} after {} scans", "Stopped".yellow(), scans);
    }

    info!("Token usage: {} total", llm.total_usage().total());
    Ok(())
}

async fn handle_audit_command(question: &str, trace: bool, config: &Config) -> Result<()> {
    info!("Auditing question: {}", question);
    let Auditor { llm, engine, .. } = build_auditor(config)?;

    println!("{}", "Auditing...".cyan());
    let run = engine.run_audit_detailed(question).await;
    let verdict = Verdict::classify(&run.answer);

    if trace {
        for message in run.transcript.messages().iter().skip(2) {
            println!("{} {}", format!("[{:?}]", message.role).dimmed(), message.content);
        }
        for step in &run.steps {
            let outcome = format!("{:?}", step.outcome);
            let outcome = match step.outcome {
                StepOutcome::Error => outcome.red(),
                StepOutcome::RateLimitedRetry => outcome.yellow(),
                _ => outcome.normal(),
            };
            println!("  step {} at {:>4}s: {}", step.index + 1, step.elapsed.as_secs(), outcome);
        }
        let usage = llm.total_usage();
        println!(
            "  tokens: {} in / {} out",
            usage.input_tokens, usage.output_tokens
        );
    }

    println!("{} {:?}", "Termination:".green(), run.termination);
    println!("{} {}", "Verdict:".green(), verdict);
    println!("{}", run.answer);
    Ok(())
}

fn handle_tools_command(config: &Config) -> Result<()> {
    info!("Listing tools");
    let mall = MallClient::new(&config.mall).context("Failed to create mall client")?;
    let tools = ToolExecutor::audit_tools(Arc::new(mall));
    println!("{}", "Registered tools:".green());
    println!("{}", tools.catalogue());
    Ok(())
}

fn handle_check_config_command(config: &Config) -> Result<()> {
    info!("Checking configuration");
    match config.validate() {
        Ok(()) => println!("{}", "Configuration OK".green()),
        Err(e) => println!("{} {}", "Configuration invalid:".red(), e),
    }

    println!("  model:          {}", config.llm.model);
    println!("  base_url:       {}", config.llm.base_url);
    println!(
        "  api_key:        {}",
        if config.api_key().is_ok() { "set" } else { "missing" }
    );
    println!("  max_steps:      {}", config.audit.max_steps);
    println!(
        "  cooldowns:      step {}s, rate limit {}s",
        config.audit.step_cooldown_secs, config.audit.rate_limit_cooldown_secs
    );
    println!(
        "  thresholds:     gold {}, exp {}",
        config.audit.gold_threshold, config.audit.exp_threshold
    );
    println!("  scan:           {} orders every {}s", config.mall.orders_per_scan, config.monitor.check_interval_secs);
    println!(
        "  webhook:        {}",
        if config.notify.webhook_url.is_some() { "set" } else { "none" }
    );

    config.validate().context("Configuration check failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
