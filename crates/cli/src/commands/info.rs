//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{SinkConfig, SinkTarget, UploaderConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_location: Option<String>,
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: &'static str,
    /// Topic for pub/sub, normalized ingest URL for HTTP
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

impl From<&SinkConfig> for SinkInfo {
    fn from(sink: &SinkConfig) -> Self {
        match &sink.target {
            SinkTarget::PubSub { topic } => Self {
                name: sink.name.clone(),
                sink_type: "pub_sub",
                destination: topic.clone(),
                timeout_secs: None,
            },
            SinkTarget::Http { url, timeout_secs } => Self {
                name: sink.name.clone(),
                sink_type: "http",
                destination: dispatcher::ingest_url(url),
                timeout_secs: Some(*timeout_secs),
            },
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &UploaderConfig) -> ConfigInfo {
    ConfigInfo {
        session_location: config.session.location_id.clone(),
        sinks: config.sinks.iter().map(SinkInfo::from).collect(),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Market Uploader Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Session");
    println!(
        "   └─ Initial location: {}",
        info.session_location.as_deref().unwrap_or("(wait for zone change)")
    );

    println!("\n📤 Sinks ({})", info.sinks.len());
    for (i, sink) in info.sinks.iter().enumerate() {
        let is_last = i == info.sinks.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        match sink.timeout_secs {
            Some(timeout) => println!(
                "   {} {} ({}) → {} [timeout {}s]",
                prefix, sink.name, sink.sink_type, sink.destination, timeout
            ),
            None => println!(
                "   {} {} ({}) → {}",
                prefix, sink.name, sink.sink_type, sink.destination
            ),
        }
    }

    println!();
}
