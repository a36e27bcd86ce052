// # tagdnsd - tag-driven DDNS daemon
//
// This is a THIN integration layer. All reconciliation logic lives in
// tagdns-core; this binary only:
// 1. Reads configuration from environment variables
// 2. Installs the tracing subscriber
// 3. Builds the resolver, provider and reconciler
// 4. Runs the schedule until SIGINT/SIGTERM (Ctrl-C off unix)
//
// ## Configuration
//
// ### Required
// - `CLOUDFLARE_TOKEN`: API token with Zone:DNS:Edit permission
// - `ZONE_ID`: Zone whose tagged records follow this host
//
// ### Optional
// - `DDNS_MANAGEMENT_TAG`: Comment marker of managed records (default `[update]`)
// - `DDNS_INTERVAL_SECS`: Seconds between checks (default 60)
// - `DDNS_IP_SOURCE_URL`: IP-echo service (default https://api.ipify.org)
// - `DDNS_HTTP_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `DDNS_MODE`: `dry-run` to log patches instead of sending them
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_TOKEN=your_token
// export ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export DDNS_MANAGEMENT_TAG='[update]'
//
// tagdnsd
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tagdns_cloudflare::CloudflareProvider;
use tagdns_core::{DdnsConfig, Reconciler, TracingLogger};
use tagdns_ip_http::HttpAddressResolver;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Settings read from the environment
#[derive(Debug)]
struct Settings {
    config: DdnsConfig,
    log_level: Level,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("CLOUDFLARE_TOKEN").context(
            "CLOUDFLARE_TOKEN is required. Set it via: export CLOUDFLARE_TOKEN=your_token",
        )?;
        let zone_id = lookup("ZONE_ID")
            .context("ZONE_ID is required. Set it via: export ZONE_ID=your_zone_id")?;

        let mut config = DdnsConfig::new(api_token, zone_id);

        if let Some(tag) = lookup("DDNS_MANAGEMENT_TAG") {
            config.engine.management_tag = tag;
        }
        if let Some(value) = lookup("DDNS_INTERVAL_SECS") {
            config.engine.interval_secs = parse_secs("DDNS_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = lookup("DDNS_HTTP_TIMEOUT_SECS") {
            config.engine.http_timeout_secs = parse_secs("DDNS_HTTP_TIMEOUT_SECS", &value)?;
        }
        if let Some(url) = lookup("DDNS_IP_SOURCE_URL") {
            config.resolver.url = url;
        }
        if let Some(mode) = lookup("DDNS_MODE") {
            config.provider.dry_run = match mode.to_lowercase().as_str() {
                "dry-run" => true,
                "live" | "" => false,
                _ => anyhow::bail!("DDNS_MODE '{}' is not valid. Valid modes: live, dry-run", mode),
            };
        }

        let log_level = match lookup("DDNS_LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        };

        config
            .validate()
            .context("Make sure the environment variables were changed from their placeholders")?;

        Ok(Self { config, log_level })
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds. Got: {}", name, value))
}

fn main() -> ExitCode {
    // Load and validate configuration from environment
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting tagdnsd daemon");
    info!(
        "Managing records tagged {:?} in zone {}",
        settings.config.engine.management_tag, settings.config.provider.zone_id
    );

    // The loop is single-threaded and cooperative
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run_daemon(settings.config)).into()
}

/// Run the daemon
async fn run_daemon(config: DdnsConfig) -> DdnsExitCode {
    let timeout = config.engine.http_timeout();

    let resolver = match HttpAddressResolver::from_config(&config.resolver, timeout) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Failed to create address resolver: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };
    info!("Resolving the public address via {}", resolver.url());

    let provider = match CloudflareProvider::from_config(&config.provider, timeout) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create Cloudflare provider: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let mut reconciler = match Reconciler::initialize(
        Box::new(resolver),
        Arc::new(provider),
        Arc::new(TracingLogger),
        &config,
    )
    .await
    {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("{}: {}", e.kind(), e);
            return DdnsExitCode::ConfigError;
        }
    };

    #[cfg(unix)]
    let result = {
        let shutdown = async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown error: {}", e),
            }
        };
        reconciler.run_until(config.engine.interval(), shutdown).await
    };

    // Only Ctrl-C is available off unix
    #[cfg(not(unix))]
    let result = reconciler.run(config.engine.interval()).await;

    match result {
        Ok(()) => DdnsExitCode::CleanShutdown,
        Err(e) => {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}
