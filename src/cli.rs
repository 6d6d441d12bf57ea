//! Command-line arguments

use clap::Parser;

/// A terminal code-learning dashboard with a sandboxed script runner.
#[derive(Parser, Debug)]
#[command(name = "codemaster", version, about)]
pub struct Args {
    /// Script file to open in the editor (or to run with `--run`).
    pub script: Option<String>,

    /// Run the script without the dashboard, print its result and exit.
    ///
    /// Exits with status 0 when the script produced output and 1 on failure.
    #[arg(long, short = 'r', action, requires = "script")]
    pub run: bool,

    /// Path to the config file YAML.
    ///
    /// If not provided, defaults to `~/.codemaster/config.yml`.
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Write logs to this file while the dashboard is open.
    #[arg(long)]
    pub log_file: Option<String>,

    /// Wall-clock budget per run, overriding the config file.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Step budget per run, overriding the config file.
    #[arg(long)]
    pub max_steps: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["codemaster"]);
        assert!(args.script.is_none());
        assert!(!args.run);
        assert!(args.config.is_none());
        assert!(args.log_file.is_none());
        assert!(args.timeout_ms.is_none());
        assert!(args.max_steps.is_none());
    }

    #[test]
    fn test_args_headless_run() {
        let args = Args::parse_from([
            "codemaster",
            "--run",
            "demo.js",
            "--timeout-ms",
            "500",
            "--max-steps",
            "1000",
        ]);
        assert!(args.run);
        assert_eq!(args.script, Some("demo.js".to_string()));
        assert_eq!(args.timeout_ms, Some(500));
        assert_eq!(args.max_steps, Some(1000));
    }

    #[test]
    fn test_run_requires_script() {
        assert!(Args::try_parse_from(["codemaster", "--run"]).is_err());
    }
}
