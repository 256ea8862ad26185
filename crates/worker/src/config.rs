/// Worker configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Seconds between sweep passes (default: `30`).
    pub sweep_interval_secs: u64,
    /// Age in seconds after which an in-flight task is logged as
    /// long-running (default: `3600`). The task is never failed on age;
    /// the provider's answer stays authoritative.
    pub sweep_expiry_secs: i64,
    /// Root directory for downloaded artifacts (default: `./artifacts`).
    pub artifacts_dir: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default       |
    /// |-----------------------|---------------|
    /// | `SWEEP_INTERVAL_SECS` | `30`          |
    /// | `SWEEP_EXPIRY_SECS`   | `3600`        |
    /// | `ARTIFACTS_DIR`       | `./artifacts` |
    pub fn from_env() -> Self {
        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let sweep_expiry_secs: i64 = std::env::var("SWEEP_EXPIRY_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SWEEP_EXPIRY_SECS must be a valid i64");

        let artifacts_dir =
            std::env::var("ARTIFACTS_DIR").unwrap_or_else(|_| "./artifacts".into());

        Self {
            sweep_interval_secs,
            sweep_expiry_secs,
            artifacts_dir,
        }
    }
}
