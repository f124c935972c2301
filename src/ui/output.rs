use crate::cli::OutputFormat;
use crate::error::{CombinerError, UserFriendlyError};
use crate::extractor::RunReport;
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn label(self) -> &'static str {
        match self {
            MessageType::Success => "success",
            MessageType::Error => "error",
            MessageType::Warning => "warning",
            MessageType::Info => "info",
        }
    }

    fn plain_prefix(self) -> &'static str {
        match self {
            MessageType::Success => "✓",
            MessageType::Error => "✗",
            MessageType::Warning => "!",
            MessageType::Info => "i",
        }
    }
}

/// User-facing terminal output. Diagnostics go through the log sink; this is
/// only for messages addressed to whoever ran the command.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, quiet: bool) -> Self {
        let use_colors = mode == OutputMode::Human
            && !quiet
            && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        self.emit(MessageType::Success, message);
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        self.emit(MessageType::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(MessageType::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(MessageType::Info, message);
    }

    pub fn print_user_friendly_error(&self, error: &CombinerError) {
        self.error(&error.user_message());

        let Some(suggestion) = error.suggestion() else {
            return;
        };
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "suggestion",
                "message": suggestion
            })),
            OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            OutputMode::Human if self.use_colors => eprintln!(
                "{}{}",
                INFO,
                style(format!("Suggestion: {}", suggestion)).cyan()
            ),
            OutputMode::Human => eprintln!("Suggestion: {}", suggestion),
        }
    }

    /// JSON mode always prints the report, quiet or not, so scripts can
    /// consume it.
    pub fn print_run_summary(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Json => println!(
                "{}",
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            ),
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }
        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn emit(&self, msg_type: MessageType, message: &str) {
        let is_error = matches!(msg_type, MessageType::Error);
        if self.quiet && !is_error {
            return;
        }

        let line = match self.mode {
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "message",
                    "level": msg_type.label(),
                    "message": message,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
                return;
            }
            OutputMode::Plain => {
                format!("{}: {}", msg_type.label().to_uppercase(), message)
            }
            OutputMode::Human if self.use_colors => {
                let (emoji, styled) = match msg_type {
                    MessageType::Success => (CHECKMARK, style(message).green().bold()),
                    MessageType::Error => (CROSS, style(message).red().bold()),
                    MessageType::Warning => (WARNING, style(message).yellow().bold()),
                    MessageType::Info => (INFO, style(message).cyan()),
                };
                format!("{}{}", emoji, styled)
            }
            OutputMode::Human => format!("{} {}", msg_type.plain_prefix(), message),
        };

        if is_error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &RunReport) {
        let summary = &report.summary;
        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!();
        self.print_separator();
        if self.use_colors {
            println!("{} {}", style("Code combined!").green().bold(), CHECKMARK);
        } else {
            println!("✓ Code combined!");
        }
        println!();
        println!("  Root:            {}", report.root);
        println!(
            "  Files extracted: {}",
            highlight(summary.files_extracted.to_string())
        );
        println!(
            "  Bytes read:      {}",
            highlight(format_bytes(summary.bytes_read))
        );
        println!(
            "  Time taken:      {}",
            highlight(format_duration(summary.duration))
        );
        if summary.files_failed > 0 {
            println!("  Unreadable:      {}", summary.files_failed);
        }
        println!("  Combined code:   {}", report.artifacts.combined.display());
        println!(
            "  Full tree:       {}",
            report.artifacts.structure.display()
        );
        println!(
            "  Extracted tree:  {}",
            report.artifacts.extracted_structure.display()
        );
        if let Some(ref path) = report.artifacts.report {
            println!("  Report:          {}", path.display());
        }
        self.print_separator();
    }

    fn print_plain_summary(&self, report: &RunReport) {
        let summary = &report.summary;
        println!("COMPLETED: Code combination");
        println!("Files extracted: {}", summary.files_extracted);
        println!("Bytes read: {}", summary.bytes_read);
        println!("Duration: {}", format_duration(summary.duration));
        if summary.files_failed > 0 {
            println!("Unreadable: {}", summary.files_failed);
        }
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_from_cli_format() {
        assert_eq!(OutputMode::from(&OutputFormat::Human), OutputMode::Human);
        assert_eq!(OutputMode::from(&OutputFormat::Json), OutputMode::Json);
        assert_eq!(OutputMode::from(&OutputFormat::Plain), OutputMode::Plain);
    }

    #[test]
    fn test_quiet_mode_disables_colors() {
        let formatter = OutputFormatter::new(OutputMode::Human, true);
        assert!(formatter.quiet);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_message_labels() {
        assert_eq!(MessageType::Warning.label(), "warning");
        assert_eq!(MessageType::Error.plain_prefix(), "✗");
    }

    #[test]
    fn test_non_human_modes_have_no_colors() {
        assert!(!OutputFormatter::new(OutputMode::Json, false).use_colors);
        assert!(!OutputFormatter::new(OutputMode::Plain, false).use_colors);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }
}
