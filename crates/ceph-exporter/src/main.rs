//! ceph-exporter - Prometheus exporter for Ceph cluster and OSD usage.
//!
//! Runs `ceph -f json df` and `ceph -f json osd df` on every scrape and serves
//! the figures as gauges.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod access_log;
mod handlers;
mod state;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use ceph_exporter_core::collector::{CephCli, Collector};
use ceph_exporter_core::descriptors::DescriptorRegistry;
use ceph_exporter_core::exporter::CephExporter;

use access_log::AccessLogLayer;
use state::AppState;

// ============================================================
// CLI
// ============================================================

#[derive(Parser, Debug)]
#[command(
    name = "ceph-exporter",
    about = "Prometheus exporter for Ceph cluster usage",
    version = ceph_exporter_core::VERSION
)]
struct Args {
    /// Address to listen on for web interface and telemetry.
    /// A bare ":port" listens on all interfaces.
    #[arg(
        long = "web.listen-address",
        default_value = ":9128",
        env = "CEPH_EXPORTER_LISTEN",
        value_parser = parse_listen_address
    )]
    listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(
        long = "web.telemetry-path",
        default_value = "/metrics",
        env = "CEPH_EXPORTER_METRICS_PATH",
        value_parser = parse_metrics_path
    )]
    metrics_path: String,

    /// Path to the ceph command line tool.
    #[arg(
        long = "ceph.bin",
        default_value = "/usr/bin/ceph",
        env = "CEPH_EXPORTER_CEPH_BIN"
    )]
    ceph_bin: PathBuf,

    /// Kill a ceph invocation after this many seconds. 0 or unset waits forever.
    #[arg(long = "ceph.timeout", env = "CEPH_EXPORTER_CEPH_TIMEOUT", value_name = "SECONDS")]
    ceph_timeout: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Parses a listen address; `:9128` means `0.0.0.0:9128`.
fn parse_listen_address(s: &str) -> Result<SocketAddr, String> {
    let s = s.trim();
    let full = if s.starts_with(':') {
        format!("0.0.0.0{}", s)
    } else {
        s.to_string()
    };
    if let Ok(addr) = full.parse::<SocketAddr>() {
        return Ok(addr);
    }
    full.to_socket_addrs()
        .map_err(|e| format!("invalid listen address '{}': {}", s, e))?
        .next()
        .ok_or_else(|| format!("listen address '{}' resolved to nothing", s))
}

/// Accepts absolute request paths other than the ones the server uses itself.
fn parse_metrics_path(s: &str) -> Result<String, String> {
    if !s.starts_with('/') {
        return Err(format!("metrics path '{}' must start with '/'", s));
    }
    if s == "/" || s == "/health" {
        return Err(format!("metrics path '{}' is reserved", s));
    }
    if s.chars().any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '*' | ':')) {
        return Err(format!("metrics path '{}' contains invalid characters", s));
    }
    Ok(s.to_string())
}

// ============================================================
// Logging
// ============================================================

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["ceph_exporter", "ceph_exporter_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ============================================================
// Server
// ============================================================

pub(crate) fn router(state: AppState) -> Router {
    let metrics_path = state.metrics_path.clone();
    Router::new()
        .route("/", get(handlers::handle_landing))
        .route("/health", get(handlers::handle_health))
        .route(&metrics_path, get(handlers::handle_metrics))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    info!(version = ceph_exporter_core::VERSION, "ceph-exporter starting");
    let ceph = CephCli::new(&args.ceph_bin).with_timeout(args.ceph_timeout.map(Duration::from_secs));
    info!(
        ceph = %args.ceph_bin.display(),
        metrics_path = %args.metrics_path,
        timeout_s = ceph.timeout().map_or(0, |t| t.as_secs()),
        "config"
    );

    let descriptors = Arc::new(DescriptorRegistry::new());
    let exporter = match CephExporter::new(Collector::new(ceph, descriptors)) {
        Ok(exporter) => exporter,
        Err(e) => {
            error!(error = %e, "invalid metric descriptors");
            process::exit(1);
        }
    };

    let registry = prometheus::Registry::new();
    if let Err(e) = registry.register(Box::new(exporter)) {
        error!(error = %e, "failed to register ceph collector");
        process::exit(1);
    }

    let app = router(AppState::new(registry, &args.metrics_path))
        .layer(AccessLogLayer)
        .layer(CompressionLayer::new())
        .into_make_service_with_connect_info::<SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(args.listen_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %args.listen_address, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(addr = %args.listen_address, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_address_bare_port() {
        let addr = parse_listen_address(":9128").unwrap();
        assert_eq!(addr, "0.0.0.0:9128".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_parse_listen_address_full() {
        let addr = parse_listen_address("127.0.0.1:8080").unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
        assert!(parse_listen_address("[::1]:9128").is_ok());
    }

    #[test]
    fn test_parse_listen_address_invalid() {
        assert!(parse_listen_address("9128").is_err());
        assert!(parse_listen_address(":notaport").is_err());
    }

    #[test]
    fn test_parse_metrics_path() {
        assert_eq!(parse_metrics_path("/metrics").unwrap(), "/metrics");
        assert_eq!(parse_metrics_path("/ceph/metrics").unwrap(), "/ceph/metrics");
        assert!(parse_metrics_path("metrics").is_err());
        assert!(parse_metrics_path("/").is_err());
        assert!(parse_metrics_path("/health").is_err());
        assert!(parse_metrics_path("/{id}").is_err());
        assert!(parse_metrics_path("/a b").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["ceph-exporter"]).unwrap();
        assert_eq!(args.listen_address.port(), 9128);
        assert_eq!(args.metrics_path, "/metrics");
        assert_eq!(args.ceph_bin, PathBuf::from("/usr/bin/ceph"));
        assert_eq!(args.ceph_timeout, None);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "ceph-exporter",
            "--web.listen-address",
            "127.0.0.1:9999",
            "--web.telemetry-path",
            "/probe",
            "--ceph.bin",
            "/opt/ceph/bin/ceph",
            "--ceph.timeout",
            "30",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.listen_address.port(), 9999);
        assert_eq!(args.metrics_path, "/probe");
        assert_eq!(args.ceph_bin, PathBuf::from("/opt/ceph/bin/ceph"));
        assert_eq!(args.ceph_timeout, Some(30));
        assert_eq!(args.verbose, 2);
    }
}
