use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig, RotationStrategy};

/// ログファイル名（ローテーション時は日付が付与される）
pub const LOG_FILE_NAME: &str = "qlog-dashboard.log";

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

/// ログシステムを初期化
///
/// ファイル出力が有効な場合は `WorkerGuard` を返す。プロセス終了まで保持すること。
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = build_filter(&config.level);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.console {
        layers.push(console_layer(config.format));
    }

    if let Some(dir) = &config.directory {
        ensure_log_dir(dir)?;
        let appender = match config.rotation.unwrap_or(RotationStrategy::Daily) {
            RotationStrategy::Daily => rolling::daily(dir, LOG_FILE_NAME),
            RotationStrategy::Hourly => rolling::hourly(dir, LOG_FILE_NAME),
            RotationStrategy::Never => rolling::never(dir, LOG_FILE_NAME),
        };
        let (writer, worker_guard) = non_blocking(appender);
        guard = Some(worker_guard);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        );
    }

    if layers.is_empty() {
        // 最低限のコンソール出力
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))?;
        return Ok(None);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::debug!(
        level = %config.level,
        console = config.console,
        directory = ?config.directory,
        "logging initialized"
    );

    Ok(guard)
}

/// 不正なディレクティブは info にフォールバック
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// ログディレクトリを確保
fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
