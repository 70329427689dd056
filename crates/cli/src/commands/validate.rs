//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::UploaderConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_location: Option<String>,
    sink_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub_sub_sink: Option<String>,
    http_sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    session_location: config.session.location_id.clone(),
                    sink_count: config.sinks.len(),
                    pub_sub_sink: config.pub_sub_sink().map(|s| s.name.clone()),
                    http_sink_count: config.http_sinks().count(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &UploaderConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sinks.is_empty() {
        warnings.push("No sinks configured - assembled batches will be dropped".to_string());
    } else if config.pub_sub_sink().is_none() {
        warnings.push("No pub_sub sink configured - only HTTP endpoints receive orders".to_string());
    }

    let location_known = config
        .session
        .location_id
        .as_deref()
        .is_some_and(|l| !l.trim().is_empty());
    if !location_known {
        warnings.push(
            "session.location_id is not set - responses are discarded until a location_changed event"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!(
                "\n  Session location: {}",
                summary.session_location.as_deref().unwrap_or("(none)")
            );
            println!("  Sinks: {}", summary.sink_count);
            println!(
                "  Pub/sub sink: {}",
                summary.pub_sub_sink.as_deref().unwrap_or("(none)")
            );
            println!("  HTTP sinks: {}", summary.http_sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
