use clap::Parser;

/// Process Console - live process table with filter, sort and actions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 9999)]
    pub port: u16,

    /// Listen address
    #[arg(short = 'a', long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// Sampling interval in milliseconds (clamped to 200..=10000)
    #[arg(short = 'i', long, env = "REFRESH_INTERVAL_MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Start with sampling paused
    #[arg(long, env = "START_PAUSED", default_value_t = false)]
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CommandArgs::parse_from(["process-console"]);
        assert_eq!(args.address, "0.0.0.0");
        assert_eq!(args.interval_ms, 1000);
        assert!(!args.paused);
    }

    #[test]
    fn test_overrides() {
        let args = CommandArgs::parse_from([
            "process-console",
            "--port",
            "8080",
            "-i",
            "250",
            "--paused",
        ]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.interval_ms, 250);
        assert!(args.paused);
    }
}
