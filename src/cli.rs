use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codecombiner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Combine source files from a directory tree into a single file")]
#[command(
    long_about = "CodeCombiner walks a directory, concatenates every source file with a \
                  matching extension into one text file, and writes a full folder tree \
                  (extracted files marked) plus a tree of only the extracted files."
)]
#[command(after_help = "EXAMPLES:\n  \
    codecombiner ./my-project\n  \
    codecombiner ./my-project --formats py,rs --exclude tests,migrations\n  \
    BASE_PATH=./site codecombiner --output-dir out --report\n  \
    codecombiner --config codecombiner.toml")]
pub struct Cli {
    /// Directory to combine
    #[arg(env = "BASE_PATH")]
    pub root: Option<PathBuf>,

    /// Directory receiving the output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File extensions to extract (comma-separated)
    #[arg(short, long, help = "File extensions to extract (e.g., py,js,html)")]
    pub formats: Option<String>,

    /// Newline-separated exclusions file
    #[arg(long)]
    pub exclusions_file: Option<PathBuf>,

    /// Extra exclusion tokens, merged with the exclusions file
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Marker appended to extracted files in the full tree
    #[arg(long)]
    pub marker: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Also write a JSON run report
    #[arg(long)]
    pub report: bool,

    /// Log to the console only
    #[arg(long)]
    pub no_log_file: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show the configuration and plan without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_root(self.root.clone())
            .with_formats(self.formats.clone())
            .with_exclusions_file(self.exclusions_file.clone())
            .with_exclude(self.exclude.clone())
            .with_output_dir(self.output_dir.clone())
            .with_marker(self.marker.clone())
            .with_generate_report(self.report.then_some(true))
            .with_log_level(self.log_level.clone().or_else(|| self.implied_log_level()))
            .with_log_to_file(self.no_log_file.then_some(false))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// `-vv` turns on trace output when no level is given explicitly.
    fn implied_log_level(&self) -> Option<String> {
        (self.verbosity_level() >= 2).then(|| "trace".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["codecombiner", "project"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("project")));
        assert!(!cli.dry_run);
        assert!(matches!(cli.output_format, OutputFormat::Human));
    }

    #[test]
    fn test_exclude_is_comma_delimited() {
        let cli =
            Cli::try_parse_from(["codecombiner", "project", "--exclude", "venv,build"]).unwrap();
        assert_eq!(
            cli.exclude,
            Some(vec!["venv".to_string(), "build".to_string()])
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["codecombiner", "project", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides_only_set_given_flags() {
        let cli = Cli::try_parse_from([
            "codecombiner",
            "project",
            "--formats",
            "rs",
            "--report",
            "--no-log-file",
        ])
        .unwrap();
        let overrides = cli.create_cli_overrides();

        assert_eq!(overrides.root, Some(PathBuf::from("project")));
        assert_eq!(overrides.formats.as_deref(), Some("rs"));
        assert_eq!(overrides.generate_report, Some(true));
        assert_eq!(overrides.log_to_file, Some(false));
        assert!(overrides.marker.is_none());
        assert!(overrides.output_dir.is_none());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["codecombiner", "project", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["codecombiner", "project", "-q"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_double_verbose_implies_trace() {
        let cli = Cli::try_parse_from(["codecombiner", "project", "-vv"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.log_level.as_deref(), Some("trace"));

        let cli =
            Cli::try_parse_from(["codecombiner", "project", "-vv", "--log-level", "info"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.log_level.as_deref(), Some("info"));

        let cli = Cli::try_parse_from(["codecombiner", "project", "-v"]).unwrap();
        assert!(cli.create_cli_overrides().log_level.is_none());
    }
}
