use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

use reqtrace::analysis::write_json_report;
use reqtrace::config_file::{extract_config_file_arg, ConfigFile};
use reqtrace::logging::init_logging;
use reqtrace::platform::{exit_code_for_run, last_interrupt, ExitCode, SignalHandler};
use reqtrace::scanner::scan_log_directory;
use reqtrace::{analyze_paths, AnalyzerConfig, AnalyzerError, CancellationToken, Cli};

fn main() {
    let started = Instant::now();
    let cancel = CancellationToken::new();

    // Initialize signal handling early
    let _signal_handler = match SignalHandler::new(cancel.clone()) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("reqtrace: Failed to initialize signal handling: {}", e);
            ExitCode::GeneralError.exit();
        }
    };

    let cli = process_args_with_config();
    let config = AnalyzerConfig::from_cli(&cli);

    init_logging(&config.logging);

    if let Err(e) = config.validate() {
        eprintln!("reqtrace: Error: {}", e);
        ExitCode::InvalidUsage.exit();
    }

    tracing::debug!(
        threads = config.performance.threads,
        cores = num_cpus::get(),
        "configuration validated"
    );

    let exit_code = match run(&config, &cancel, started) {
        Ok(partial) => exit_code_for_run(partial, last_interrupt()),
        Err(e) => {
            eprintln!("reqtrace: Error: {:#}", e);
            exit_code_for_error(&e)
        }
    };

    exit_code.exit();
}

/// Returns whether the written report is partial
fn run(config: &AnalyzerConfig, cancel: &CancellationToken, started: Instant) -> Result<bool> {
    let paths = scan_log_directory(&config.input.dir)?;
    if paths.is_empty() {
        return Err(AnalyzerError::NoInputFiles {
            path: config.input.dir.clone(),
        }
        .into());
    }
    tracing::info!(files = paths.len(), dir = %config.input.dir.display(), "scan complete");

    let output = analyze_paths(&paths, config.parallel_config(), cancel, started)
        .context("Failed to analyze log files")?;

    write_json_report(&output.result, &config.output.target, config.output.pretty)?;

    if config.output.stats {
        eprintln!("{}", output.stats.format_stats());
    }

    if output.is_partial() {
        tracing::warn!(
            output = %config.output.target,
            "partial report written after cancellation"
        );
    }

    Ok(output.is_partial())
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AnalyzerError>() {
        Some(e) if e.is_usage_error() => ExitCode::InvalidUsage,
        _ => ExitCode::GeneralError,
    }
}

/// Process command line arguments with config file support
fn process_args_with_config() -> Cli {
    let raw_args: Vec<String> = std::env::args().collect();

    let config_file_path = extract_config_file_arg(&raw_args);

    // Check for --show-config first, before any other processing
    if raw_args.iter().any(|arg| arg == "--show-config") {
        ConfigFile::show_config();
        ExitCode::Success.exit();
    }

    let processed_args = if raw_args.iter().any(|arg| arg == "--ignore-config") {
        raw_args
    } else {
        match ConfigFile::load_with_custom_path(config_file_path.as_deref())
            .and_then(|config_file| config_file.process_args(raw_args))
        {
            Ok(processed) => processed,
            Err(e) => {
                eprintln!("reqtrace: Config file error: {:#}", e);
                ExitCode::InvalidUsage.exit();
            }
        }
    };

    // clap exits with status 2 on invalid arguments
    Cli::parse_from(processed_args)
}
