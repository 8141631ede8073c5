// # ddns-sync - One-Shot Dynamic DNS Synchronizer
//
// Thin integration layer. It:
// 1. Loads `.env` (if present) and reads configuration from the environment
// 2. Builds the log sink
// 3. Wires the HTTP IP resolver and the Cloudflare provider into a Runner
// 4. Runs one pass and exits with its status
//
// No DNS logic lives here; the decision of what to write is in ddns-core.
// Scheduling is external (cron, systemd timer).
//
// ## Configuration
//
// ### Provider
// - `CLOUDFLARE_API_TOKEN`: API token with Zone:DNS:Edit permission
// - `CLOUDFLARE_API_EMAIL` / `CLOUDFLARE_API_KEY`: Legacy global key pair
// - `ZONE_ID`: Zone identifier
// - `CLOUDFLARE_API_BASE`: API base URL (optional)
//
// ### Record
// - `RECORD_NAME`: Fully-qualified record name
// - `RECORD_TYPE`: A or AAAA (default: A)
// - `RECORD_TTL`: TTL in seconds, 1 = automatic (default: 120)
// - `RECORD_PROXIED`: Proxied through Cloudflare (default: true)
//
// ### IP Detection
// - `IP_DETECTION_SERVICES`: Comma-separated echo service URLs
// - `DDNS_HTTP_TIMEOUT_SECS`: Per-request timeout, at most 10 (default: 10)
//
// ### Logging
// - `LOGGER_NAME`: Job identity; also enables `<name>.log`
// - `DDNS_LOG_DIR`: Directory for the named log file (default: .)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ### Mode
// - `DDNS_MODE`: live or dry-run (default: live)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=...
// export ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export RECORD_NAME=home.example.com
// export LOGGER_NAME=home-ddns
//
// ddns-sync
// ```

mod logging;

use anyhow::{Context, Result};
use ddns_core::config::SyncConfig;
use ddns_core::{ExitStatus, Runner};
use ddns_ip_http::HttpIpResolver;
use ddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Instrument;
use tracing::error;
use tracing::instrument::WithSubscriber;

fn main() -> ExitCode {
    // A missing .env is not an error
    dotenvy::dotenv().ok();

    let config = match SyncConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return exit(ExitStatus::ConfigError);
        }
    };

    if let Err(e) = config.logging.validate() {
        eprintln!("Configuration error: {}", e);
        return exit(ExitStatus::ConfigError);
    }

    let dispatch = match logging::build_dispatch(&config.logging) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return exit(ExitStatus::RuntimeError);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return exit(ExitStatus::RuntimeError);
        }
    };

    let status = rt.block_on(
        async move {
            let identity = config
                .logging
                .logger_name
                .clone()
                .unwrap_or_else(|| config.record.name.clone());
            let span = tracing::info_span!("job", identity = %identity);

            async move {
                match build_runner(config) {
                    Ok(runner) => ExitStatus::from_outcome(&runner.run().await),
                    Err(e) => {
                        error!("Failed to initialize: {:#}", e);
                        ExitStatus::RuntimeError
                    }
                }
            }
            .instrument(span)
            .await
        }
        .with_subscriber(dispatch),
    );

    exit(status)
}

/// Wire the concrete clients into a runner
///
/// Client construction performs no network I/O; validation happens inside
/// [`Runner::run`].
fn build_runner(config: SyncConfig) -> Result<Runner> {
    let resolver = HttpIpResolver::from_config(&config.ip_detection)
        .context("Failed to build IP resolver")?;

    let provider = CloudflareProvider::from_config(
        &config.provider,
        config.mode,
        Duration::from_secs(config.ip_detection.timeout_secs),
    )
    .context("Failed to build Cloudflare provider")?;

    Ok(Runner::new(config, Box::new(resolver), Box::new(provider)))
}

fn exit(status: ExitStatus) -> ExitCode {
    ExitCode::from(status.code())
}
