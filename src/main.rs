// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Build the process-wide result cache and link scheduler
// 4. Dispatch to the appropriate subcommand handler
// 5. Print results and exit with proper code
//    (0 = all links reachable, 1 = unreachable links, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - link classification, caching, probing, scheduling
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - tunables and their defaults
mod error; // src/error.rs - error types
mod page; // src/page/ - page fetching and HTML analysis

use std::sync::Arc;

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use tracing::debug;
use tracing_subscriber::EnvFilter;

use checker::{HttpTransport, ProbeExecutor, ResultCache, RetryPolicy, ValidationResult, ValidationScheduler};
use cli::{Cli, Commands};
use config::ValidatorConfig;
use page::{AnalysisReport, PageAnalyzer};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Analyze { url, json, probe } => {
            let config = ValidatorConfig::from(probe);
            handle_analyze(&url, json, &config).await
        }
        Commands::Check { urls, json, probe } => {
            let config = ValidatorConfig::from(probe);
            handle_check(&urls, json, &config).await
        }
    }
}

// The cache lives as long as the scheduler that owns a handle to it,
// which is the whole process run.
fn build_scheduler(config: &ValidatorConfig) -> Result<ValidationScheduler<HttpTransport>> {
    config.validate()?;

    let cache = Arc::new(ResultCache::new(config.cache_ttl));
    let executor = ProbeExecutor::new(HttpTransport::new(config)?, RetryPolicy::from_config(config));
    Ok(ValidationScheduler::new(executor, cache, config))
}

// Handles the 'analyze' subcommand
async fn handle_analyze(url: &str, json: bool, config: &ValidatorConfig) -> Result<i32> {
    let scheduler = build_scheduler(config)?;
    let analyzer = PageAnalyzer::new(config, &scheduler)?;

    if !json {
        println!("🔍 Analyzing page: {}", url);
    }

    let report = analyzer.analyze(url).await?;
    debug!(cached = scheduler.cache().len(), "analysis done");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(exit_code(&report.link_validation_results))
}

// Handles the 'check' subcommand
async fn handle_check(urls: &[String], json: bool, config: &ValidatorConfig) -> Result<i32> {
    let scheduler = build_scheduler(config)?;

    if !json {
        println!("🌐 Checking {} link(s)...\n", urls.len());
    }

    let results = scheduler.validate_all(urls).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_table(&results);
    }

    Ok(exit_code(&results))
}

fn exit_code(results: &[ValidationResult]) -> i32 {
    if results.iter().any(|r| !r.reachable) {
        1 // Exit code 1 = unreachable links found
    } else {
        0 // Exit code 0 = all good
    }
}

// Prints the page facts, then the link table
fn print_report(report: &AnalysisReport) {
    let h = &report.headings;

    println!();
    println!("📄 Title:        {}", report.title);
    println!("🏷️  HTML version: {}", report.html_version);
    println!(
        "📑 Headings:     h1={} h2={} h3={} h4={} h5={} h6={}",
        h.h1, h.h2, h.h3, h.h4, h.h5, h.h6
    );
    println!(
        "🔐 Login form:   {}",
        if report.login_form { "yes" } else { "no" }
    );
    println!(
        "🔗 Links:        {} internal, {} external",
        report.internal_links.len(),
        report.external_links.len()
    );
    println!();

    print_table(&report.link_validation_results);
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[ValidationResult]) {
    println!("{:<70} {:<10} {:<12}", "URL", "STATUS", "REACHABLE");
    println!("{}", "=".repeat(94));

    for result in results {
        // Truncate URL if too long for display
        let url_display = if result.link.chars().count() > 67 {
            let cut: String = result.link.chars().take(67).collect();
            format!("{}...", cut)
        } else {
            result.link.clone()
        };
        let reachable = if result.reachable { "✅ yes" } else { "❌ no" };

        println!("{:<70} {:<10} {:<12}", url_display, result.status.to_string(), reachable);
    }

    println!();

    let reachable_count = results.iter().filter(|r| r.reachable).count();

    println!("📊 Summary:");
    println!("   ✅ Reachable: {}", reachable_count);
    println!("   ❌ Unreachable: {}", results.len() - reachable_count);
    println!("   📋 Total: {}", results.len());
}
