use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twlog_analyzer::analysis::TwAnalysis;
use twlog_analyzer::api::{build_router, state::AppState};
use twlog_analyzer::calculate::attack_summary;
use twlog_analyzer::config::AppConfig;
use twlog_analyzer::fetch::{refresh_roster, refresh_tw_logs, ApiClient};
use twlog_analyzer::parse_player_names;
use twlog_analyzer::report;
use twlog_analyzer::storage::{
    load_guild_members, load_log_document, roster_names, RefreshMetadata, StorageConfig,
};

#[derive(Parser)]
#[command(name = "twlog-analyzer")]
#[command(about = "Territory War battle-log analyzer")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the configured one)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    /// TW log file to analyze (default: <data-dir>/tw_logs.json)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Write results to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest TW logs from the upstream API
    RefreshLogs {
        /// Ally code whose guild log is fetched (default: guild.ally_code)
        #[arg(long)]
        ally_code: Option<String>,
    },

    /// Fetch the guild roster from the upstream API
    RefreshRoster {
        /// Guild id (default: guild.id)
        #[arg(long)]
        guild_id: Option<String>,
    },

    /// Guild totals and top performers
    Summary,

    /// Leader matchup tables for both sides
    LeaderStats {
        /// Also break down by defending player and leader
        #[arg(long)]
        detail: bool,
    },

    /// Who deployed defense and how it held
    DefenseStats {
        /// Maximum rows shown
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Participation, underperformers and non-participants
    Participation {
        /// Banner threshold for underperformers
        #[arg(long)]
        min_banners: Option<u32>,

        /// Attacks needed to count as having attacked
        #[arg(long)]
        min_attacks: Option<u32>,

        /// Ignore the stored guild roster
        #[arg(long)]
        no_roster: bool,
    },

    /// Detailed statistics for one player
    Player {
        /// Name or part of a name (case-insensitive)
        name: String,
    },

    /// Compare several players side by side
    Compare {
        /// Player names, separately or comma-separated
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Wins and defeats per attacker for both guilds
    AttackSummary,

    /// Markdown context block for the loaded logs
    Context,

    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting twlog-analyzer v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let output = cli.output.as_deref();

    match cli.command {
        Commands::RefreshLogs { ally_code } => {
            let ally_code = ally_code.unwrap_or_else(|| config.guild.ally_code.clone());
            if ally_code.is_empty() {
                bail!("No ally code: pass --ally-code or set guild.ally_code");
            }
            let client = ApiClient::new(&config.api)?;
            let outcome = refresh_tw_logs(&client, &storage, &ally_code).await?;
            let snapshot = outcome
                .snapshot
                .map(|s| s.to_string())
                .unwrap_or_default();
            emit(
                output,
                format!(
                    "Saved {} events to {:?} (snapshot {})\n",
                    outcome.count, outcome.path, snapshot
                ),
            )?;
        }
        Commands::RefreshRoster { guild_id } => {
            let guild_id = guild_id.unwrap_or_else(|| config.guild.id.clone());
            let client = ApiClient::new(&config.api)?;
            let outcome = refresh_roster(&client, &storage, &guild_id).await?;
            emit(
                output,
                format!("Saved {} members to {:?}\n", outcome.count, outcome.path),
            )?;
        }
        Commands::Summary => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), true)?;
            let summary = analysis.summary();
            if cli.json {
                emit(output, serde_json::to_string_pretty(&summary)?)?;
            } else {
                let mut text = report::summary_text(&summary);
                if let Ok(metadata) = RefreshMetadata::load(&storage.metadata_path()) {
                    if let Some(at) = metadata.tw_logs_last_refresh {
                        text.push_str(&format!("\nLogs last refreshed: {}\n", at.to_rfc3339()));
                    }
                }
                emit(output, text)?;
            }
        }
        Commands::LeaderStats { detail } => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), true)?;
            let summary = analysis.summary();
            if cli.json {
                let mut value = json!({
                    "guild_name": summary.guild_name,
                    "total_attacks": summary.stats.total_attacks,
                    "opponent_total_attacks": summary.opponent_stats.total_attacks,
                    "defending_leaders_we_faced": summary.defending_leaders_we_faced,
                    "our_defending_leaders": summary.our_defending_leaders,
                });
                if detail {
                    value["detailed_enemy_squads"] = json!(summary.detailed_enemy_squads);
                    value["detailed_our_squads"] = json!(summary.detailed_our_squads);
                }
                emit(output, serde_json::to_string_pretty(&value)?)?;
            } else {
                let mut text = report::leader_table(
                    "ENEMY DEFENDING LEADERS - WHO WE ATTACKED (by hold rate)",
                    &summary.defending_leaders_we_faced,
                    "Higher hold rate: we struggled more against this leader. \
                     Avg banners count won attacks only.",
                );
                text.push('\n');
                text.push_str(&report::leader_table(
                    "OUR DEFENDING LEADERS - WHO THE OPPONENT ATTACKED (by hold rate)",
                    &summary.our_defending_leaders,
                    "Higher hold rate: our defense held better. \
                     Avg banners is what the opponent earned on wins.",
                ));
                if detail {
                    text.push('\n');
                    text.push_str(&report::squad_table(
                        "DETAILED ENEMY DEFENDING SQUADS - BY PLAYER AND LEADER",
                        &summary.detailed_enemy_squads,
                    ));
                    text.push('\n');
                    text.push_str(&report::squad_table(
                        "DETAILED OUR DEFENDING SQUADS - BY PLAYER AND LEADER",
                        &summary.detailed_our_squads,
                    ));
                }
                emit(output, text)?;
            }
        }
        Commands::DefenseStats { limit } => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), true)?;
            let summary = analysis.summary();
            if cli.json {
                emit(
                    output,
                    serde_json::to_string_pretty(&summary.defense_contributors)?,
                )?;
            } else {
                emit(
                    output,
                    report::defense_table(&summary.defense_contributors, limit),
                )?;
            }
        }
        Commands::Participation {
            min_banners,
            min_attacks,
            no_roster,
        } => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), !no_roster)?;
            let mut options = analysis.participation_options();
            if let Some(min_banners) = min_banners {
                options.min_banners = min_banners;
            }
            if let Some(min_attacks) = min_attacks {
                if min_attacks == 0 {
                    bail!("--min-attacks must be greater than 0");
                }
                options.min_attacks = min_attacks;
            }

            let use_roster = !no_roster;
            let participation = analysis.participation_report(options, use_roster);
            if cli.json {
                emit(output, serde_json::to_string_pretty(&participation)?)?;
            } else {
                let roster_loaded = use_roster && analysis.roster().is_some();
                emit(
                    output,
                    report::participation_text(&participation, roster_loaded),
                )?;
            }
        }
        Commands::Player { name } => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), false)?;
            let Some(details) = analysis.player_details(&name) else {
                bail!("No player matching '{}'", name);
            };
            if cli.json {
                emit(output, serde_json::to_string_pretty(&details)?)?;
            } else {
                emit(output, report::player_details_text(&details))?;
            }
        }
        Commands::Compare { names } => {
            let names = parse_player_names(&names);
            if names.is_empty() {
                bail!("No player names given");
            }
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), false)?;
            let comparison = analysis.compare_players(&names);
            if cli.json {
                emit(output, serde_json::to_string_pretty(&comparison)?)?;
            } else {
                emit(output, report::comparison_text(&comparison))?;
            }
        }
        Commands::AttackSummary => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), false)?;
            let ledger = analysis.ledger();
            let ours = attack_summary(&ledger.ours, &ledger.opponents);
            let theirs = attack_summary(&ledger.opponents, &ledger.ours);
            if cli.json {
                let value = json!({ "ours": ours, "opponent": theirs });
                emit(output, serde_json::to_string_pretty(&value)?)?;
            } else {
                let mut text = report::attack_summary_table(&config.guild.name, &ours);
                text.push('\n');
                text.push_str(&report::attack_summary_table("Opponent", &theirs));
                emit(output, text)?;
            }
        }
        Commands::Context => {
            let analysis = load_analysis(&config, &storage, cli.input.as_deref(), false)?;
            let block = report::context_block(&analysis.summary());
            if cli.json {
                emit(
                    output,
                    serde_json::to_string_pretty(&json!({ "context": block }))?,
                )?;
            } else {
                emit(output, block)?;
            }
        }
        Commands::Serve { host, port } => {
            let log_path = cli.input.clone().unwrap_or_else(|| storage.tw_logs_path());
            let analysis = if log_path.exists() {
                load_analysis(&config, &storage, Some(log_path.as_path()), true)?
            } else {
                tracing::warn!("No TW logs at {:?}; serving empty results", log_path);
                TwAnalysis::new(config.clone())
            };

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let app = build_router(AppState::new(analysis));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Load the log snapshot and, when asked and available, the guild roster.
fn load_analysis(
    config: &AppConfig,
    storage: &StorageConfig,
    input: Option<&Path>,
    with_roster: bool,
) -> Result<TwAnalysis> {
    let log_path = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| storage.tw_logs_path());
    let document = load_log_document(&log_path).with_context(|| {
        format!(
            "Failed to load TW logs from {:?} (run refresh-logs first?)",
            log_path
        )
    })?;

    let mut analysis =
        TwAnalysis::new(config.clone()).with_events(document.events, Some(document.snapshot));

    if with_roster {
        let roster_path = storage.guild_data_path();
        if roster_path.exists() {
            match load_guild_members(&roster_path) {
                Ok(members) => analysis = analysis.with_roster(roster_names(&members)),
                Err(e) => tracing::warn!("Ignoring guild roster: {}", e),
            }
        } else {
            tracing::debug!("No guild roster at {:?}", roster_path);
        }
    }

    Ok(analysis)
}

fn emit(output: Option<&Path>, mut text: String) -> Result<()> {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write output to {:?}", path))?;
            tracing::info!("Wrote output to {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}
