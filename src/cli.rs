//! Command Line Interface (CLI) arguments.

use clap::Parser;

/// Scan report server command line interface
#[derive(Clone, Debug, Parser)]
#[command(name = "scan-reports", about = "Filtered HTTP query service for scan reports")]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "SCAN_REPORTS_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8080, env = "SCAN_REPORTS_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "SCAN_REPORTS_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/scan-reports/certs/cert.pem",
        env = "SCAN_REPORTS_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/scan-reports/certs/key.pem",
        env = "SCAN_REPORTS_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "SCAN_REPORTS_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Whether to enable sending traces to Jaeger.
    #[arg(long, default_value_t = false, env = "SCAN_REPORTS_ENABLE_JAEGER")]
    pub enable_jaeger: bool,
    /// Shared secret expected in the X-API-KEY header of API requests
    #[arg(
        long,
        default_value = "changeme",
        env = "SCAN_REPORTS_API_KEY",
        hide_env_values = true
    )]
    pub api_key: String,
    /// JSON file of algorithms, widgets and scans loaded at startup
    #[arg(long, env = "SCAN_REPORTS_DATA_FILE")]
    pub data_file: Option<String>,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
