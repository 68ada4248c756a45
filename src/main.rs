//! qlog-dashboard CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use qlog_dashboard::charts::AllContainers;
use qlog_dashboard::config::{ConfigLoader, DashboardConfig};
use qlog_dashboard::format::{format_number, format_timestamp, format_timestamp_str, severity_name};
use qlog_dashboard::live::{DashboardSnapshot, LiveViews, LogsPage};
use qlog_dashboard::logging::init_logging;
use qlog_dashboard::modules::{render_modules, ModuleManager};
use qlog_dashboard::routing::{
    serialize_query, History, LoadOutcome, Location, MemoryHistory, SessionState,
    StateSynchronizer, View, ViewCollaborators,
};
use qlog_dashboard::{ApiClient, AutoRefresh};

use crate::cli::{Cli, Command, ModulesCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::SampleConfig = cli.command {
        print!("{}", DashboardConfig::sample_toml()?);
        return Ok(());
    }

    let config = ConfigLoader::new()
        .load_from_file(cli.config.as_deref().and_then(|p| p.to_str()))
        .load_from_env()
        .with_overrides(cli.base_url.clone(), cli.log_level.clone())
        .build()?;

    // file output stops when the guard is dropped
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        Command::Watch {
            location,
            no_refresh,
        } => watch(&config, &location, !no_refresh && config.refresh.enabled).await,
        Command::Modules(command) => modules(&config, command).await,
        Command::Url(args) => {
            let location = Location {
                path: args.path.clone(),
                query: serialize_query(&args.view(), &args.filters(), args.page),
            };
            println!("{}", location.href());
            Ok(())
        }
        Command::SampleConfig => Ok(()),
    }
}

async fn watch(config: &DashboardConfig, location: &str, refresh: bool) -> Result<()> {
    let client = ApiClient::new(&config.server).context("failed to create API client")?;
    let state = SessionState::with_page_size(config.view.page_size);
    let live = LiveViews::new(client, state.clone(), &AllContainers);
    let history = Arc::new(MemoryHistory::new(location));
    let sync = StateSynchronizer::new(state.clone(), history.clone(), Arc::new(live.clone()));

    let mut dashboard = live.subscribe_dashboard();
    let mut logs = live.subscribe_logs();
    let mut display = live.subscribe_view_display();

    match sync.load_state_from_url() {
        LoadOutcome::SharedPage => {
            info!("shared view page; nothing to watch");
            return Ok(());
        }
        LoadOutcome::Redirected(target) => {
            println!("redirect: {}", target);
            return Ok(());
        }
        LoadOutcome::ViewDisplay(id) => {
            info!(id = %id, "loading saved view");
        }
        LoadOutcome::Loaded { view, .. } => {
            info!(view = %view, url = %history.location().href(), "state loaded");
            if view == View::Dashboard {
                live.fetch_dashboard();
            }
        }
    }

    let driver = AutoRefresh::new(state.clone(), Arc::new(live.clone()))
        .with_interval(Duration::from_millis(config.refresh.interval_ms));
    if refresh {
        driver.start();
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            changed = dashboard.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(snapshot) = dashboard.borrow_and_update().clone() {
                    print_dashboard(&snapshot);
                }
            }
            changed = logs.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(page) = logs.borrow_and_update().clone() {
                    print_logs(&page);
                }
            }
            changed = display.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(view) = display.borrow_and_update().clone() {
                    println!("{}", serde_json::to_string_pretty(view.as_ref())?);
                }
            }
        }
    }

    driver.stop();
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    let stats = &snapshot.stats;
    let status = match &snapshot.server_info {
        Some(info) if info.is_online() => "online",
        Some(_) => "no listeners",
        None => "unknown",
    };
    println!(
        "[{}] server {} | total {} | last hour {} | errors {} | hosts {}",
        format_timestamp(&snapshot.fetched_at),
        status,
        format_number(stats.total),
        format_number(stats.recent_hour),
        format_number(stats.error_count()),
        stats.host_count(),
    );
    for entry in &snapshot.recent_logs {
        println!(
            "  {} {:<9} {} {}",
            format_timestamp_str(&entry.timestamp),
            severity_name(entry.severity),
            entry.hostname,
            entry.message
        );
    }
}

fn print_logs(page: &LogsPage) {
    println!(
        "page {} (offset {}): {} entries",
        page.page + 1,
        page.offset,
        page.entries.len()
    );
    for entry in &page.entries {
        println!(
            "  {} {:<9} {} {}",
            format_timestamp_str(&entry.timestamp),
            severity_name(entry.severity),
            entry.hostname,
            entry.message
        );
    }
}

async fn modules(config: &DashboardConfig, command: ModulesCommand) -> Result<()> {
    let client = ApiClient::new(&config.server).context("failed to create API client")?;
    let manager = ModuleManager::new(client);

    let modules = match command {
        ModulesCommand::List { html: true } => {
            println!("{}", render_modules(&manager.fetch_modules().await?));
            return Ok(());
        }
        ModulesCommand::List { html: false } => manager.fetch_modules().await?,
        ModulesCommand::Toggle {
            device_type,
            enable,
            disable,
        } => {
            manager
                .toggle_module(&device_type, enable && !disable)
                .await
                .with_context(|| format!("failed to update module {}", device_type))?
        }
    };

    for module in &modules {
        println!(
            "{:<20} {:<8} {:>3} event types  {}",
            module.metadata.device_type,
            if module.enabled { "enabled" } else { "disabled" },
            module.metadata.event_types.len(),
            module.title()
        );
    }
    Ok(())
}
