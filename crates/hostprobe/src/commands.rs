use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info, warn};

use hostprobe_core::HostprobeConfig;
use hostprobe_core::events;
use hostprobe_core::memory::{MemorySnapshot, query_memory_status};
use hostprobe_core::security::{WriteDecision, can_current_user_write, check_write_access};
use hostprobe_core::window::{WindowTitleQuery, find_window};

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let config = load_config_with_warning();

    match matches.subcommand() {
        Some(("window", sub_matches)) => handle_window_command(sub_matches, &config),
        Some(("writable", sub_matches)) => handle_writable_command(sub_matches, &config),
        Some(("memory", sub_matches)) => handle_memory_command(sub_matches, &config),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load configuration, falling back to defaults with a warning on errors.
fn load_config_with_warning() -> HostprobeConfig {
    match HostprobeConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.hostprobe/config.toml and ./.hostprobe/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            HostprobeConfig::default()
        }
    }
}

fn wants_json(matches: &ArgMatches, config: &HostprobeConfig) -> bool {
    matches.get_flag("json") || config.output.json()
}

fn handle_window_command(
    matches: &ArgMatches,
    config: &HostprobeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = wants_json(matches, config);
    let process = matches
        .get_one::<String>("process")
        .cloned()
        .or_else(|| config.window.process.clone())
        .ok_or("No process given: pass --process or set [window] process in config")?;
    let pattern = matches
        .get_one::<String>("title")
        .ok_or("Title pattern is required")?;
    let buffer_len = matches
        .get_one::<u16>("buffer-len")
        .map(|len| usize::from(*len))
        .unwrap_or_else(|| config.window.title_buffer_len());

    info!(
        event = "cli.window_started",
        process = process.as_str(),
        pattern = pattern.as_str(),
        json_output = json_output
    );

    let query = match WindowTitleQuery::from_pattern(&process, pattern) {
        Ok(query) => query.with_title_buffer_len(buffer_len),
        Err(e) => {
            eprintln!("{}", e);
            error!(event = "cli.window_failed", error = %e);
            return Err(e.into());
        }
    };

    match find_window(&query) {
        Ok(record) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", record.title());
            }
            info!(event = "cli.window_completed", pid = record.pid());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            error!(event = "cli.window_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

#[derive(Serialize)]
struct WritableReport<'a> {
    path: &'a PathBuf,
    writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<&'a WriteDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn handle_writable_command(
    matches: &ArgMatches,
    config: &HostprobeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = wants_json(matches, config);
    let explain = matches.get_flag("explain");
    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or("Path argument is required")?;

    info!(
        event = "cli.writable_started",
        path = %path.display(),
        explain = explain
    );

    if !explain {
        let writable = can_current_user_write(path);
        if json_output {
            let report = WritableReport {
                path,
                writable,
                decision: None,
                error: None,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", writable);
        }
        info!(event = "cli.writable_completed", writable = writable);
        return Ok(());
    }

    let result = check_write_access(path);
    let writable = result.as_ref().is_ok_and(WriteDecision::allows_write);

    if json_output {
        let report = WritableReport {
            path,
            writable,
            decision: result.as_ref().ok(),
            error: result.as_ref().err().map(ToString::to_string),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", writable);
        match &result {
            Ok(decision) => println!("  {}", describe_decision(decision)),
            Err(e) => println!("  could not verify access: {}", e),
        }
    }

    info!(event = "cli.writable_completed", writable = writable);
    Ok(())
}

fn describe_decision(decision: &WriteDecision) -> String {
    match decision {
        WriteDecision::NoAccessControlList => "no access-control list: full access".to_string(),
        WriteDecision::Granted {
            index,
            subject,
            mask,
        } => format!("entry {} allows {} for {}", index, mask, subject),
        WriteDecision::Denied {
            index,
            subject,
            mask,
        } => format!("entry {} denies {} for {}", index, mask, subject),
        WriteDecision::NoGrant { entries_checked } => format!(
            "no entry grants write access ({} entries checked)",
            entries_checked
        ),
    }
}

fn handle_memory_command(
    matches: &ArgMatches,
    config: &HostprobeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = wants_json(matches, config);

    info!(event = "cli.memory_started", json_output = json_output);

    match query_memory_status() {
        Ok(snapshot) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_memory(&snapshot);
            }
            info!(event = "cli.memory_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to query memory status: {}", e);
            error!(event = "cli.memory_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_memory(snapshot: &MemorySnapshot) {
    println!(
        "Physical:  {} used of {} ({}% load)",
        format_bytes(snapshot.used_physical_bytes()),
        format_bytes(snapshot.total_physical_bytes),
        snapshot.load_percentage
    );
    println!(
        "Available: {}",
        format_bytes(snapshot.available_physical_bytes)
    );
    println!(
        "Commit:    {} free of {}",
        format_bytes(snapshot.available_page_file_bytes),
        format_bytes(snapshot.total_page_file_bytes)
    );
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
