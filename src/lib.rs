pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod render;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, LoggingConfig, OutputConfig, SourceConfig};
pub use error::{CombinerError, Result, UserFriendlyError};
pub use logging::{LogLevel, LogSink, MemorySink, TracingSink};

// Core functionality re-exports
pub use extractor::{
    CodeExtraction, CodeExtractor, ExtractedFileSet, ExtractionProgress, OutputManager,
    ReadFailure, RunReport,
};
pub use render::{build_extracted_files_tree, build_folder_tree};
pub use scanner::{DirectoryWalker, ExclusionSet, WalkStep};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use extractor::output_manager::REPORT_FILE_NAME;
use extractor::ConfigSnapshot;
use std::cell::RefCell;
use std::path::Path;

/// One combine run: exclusions, extraction, the three artifacts and an
/// optional JSON report.
pub struct CodeCombiner<'a> {
    config: Config,
    log: &'a dyn LogSink,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl<'a> CodeCombiner<'a> {
    pub fn new(config: Config, log: &'a dyn LogSink, output_mode: OutputMode, quiet: bool) -> Self {
        Self {
            config,
            log,
            output_formatter: OutputFormatter::new(output_mode, quiet),
            progress_manager: ProgressManager::new(!quiet && output_mode == OutputMode::Human),
        }
    }

    pub fn from_cli(cli_args: &Cli, log: &'a dyn LogSink) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = OutputMode::from(&cli_args.output_format);

        Ok(Self::new(config, log, output_mode, cli_args.quiet))
    }

    pub fn run(&self) -> Result<RunReport> {
        let root = self
            .config
            .source
            .root
            .as_deref()
            .ok_or(CombinerError::MissingRoot)?;

        let exclusions = self.load_exclusions()?;

        let output_manager = OutputManager::new(&self.config.output);
        output_manager.initialize()?;

        self.log.info("Combining code from files...");
        let (extraction, progress) = self.extract(root, &exclusions);
        let combined_path = output_manager.write_combined(&extraction.combined_text())?;
        self.log.info(&format!(
            "Combined code saved to '{}'.",
            combined_path.display()
        ));

        self.log
            .info("Writing folder structure with extraction indicators.");
        let structure = render::build_folder_tree_with_marker(
            root,
            &extraction.extracted_files,
            &self.config.output.marker,
        );
        let structure_path = output_manager.write_structure(&structure)?;
        self.log.info(&format!(
            "Folder structure saved to '{}'.",
            structure_path.display()
        ));

        self.log.info("Writing extracted files structure.");
        let extracted_structure = build_extracted_files_tree(&extraction.extracted_files);
        let extracted_path = output_manager.write_extracted_structure(&extracted_structure)?;
        self.log.info(&format!(
            "Extracted files structure saved to '{}'.",
            extracted_path.display()
        ));

        let mut artifacts = output_manager.artifact_paths();
        if self.config.output.generate_report {
            let report_path = output_manager.get_output_directory().join(REPORT_FILE_NAME);
            artifacts.report = Some(report_path);
        }

        let report = RunReport::new(
            root,
            &extraction,
            &progress,
            artifacts,
            self.create_config_snapshot(&exclusions),
        );

        if self.config.output.generate_report {
            let report_path = output_manager.write_report(&report)?;
            self.log
                .info(&format!("Run report saved to '{}'.", report_path.display()));
        }

        self.log.info("Process completed successfully.");
        Ok(report)
    }

    /// The exclusions file merged with configured extra tokens.
    pub fn load_exclusions(&self) -> Result<ExclusionSet> {
        let mut exclusions = ExclusionSet::load(&self.config.source.exclusions_file, self.log)?;
        exclusions.extend(self.config.source.extra_exclusions.iter().cloned());
        Ok(exclusions)
    }

    fn extract(
        &self,
        root: &Path,
        exclusions: &ExclusionSet,
    ) -> (CodeExtraction, ExtractionProgress) {
        let extensions = self.config.source.normalized_extensions();
        let extractor = CodeExtractor::new(&extensions, self.log);

        let spinner = self.progress_manager.create_spinner("Combining code files");
        let last_progress = RefCell::new(ExtractionProgress::new());
        let progress_callback = |progress: &ExtractionProgress| {
            ui::progress::update_extraction_progress(&spinner, progress);
            *last_progress.borrow_mut() = progress.clone();
        };

        let extraction = extractor.extract(root, exclusions, Some(&progress_callback));
        let progress = last_progress.into_inner();

        ui::progress::finish_progress_with_summary(
            &spinner,
            &format!("Extracted {} files", extraction.records.len()),
            progress.elapsed(),
        );

        (extraction, progress)
    }

    fn create_config_snapshot(&self, exclusions: &ExclusionSet) -> ConfigSnapshot {
        ConfigSnapshot {
            extensions: self.config.source.normalized_extensions(),
            exclusions: exclusions.tokens().map(str::to_string).collect(),
            marker: self.config.output.marker.clone(),
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &dyn LogSink {
        self.log
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        out: PathBuf,
        exclusions_file: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/x.py"), "print(1)").unwrap();
        fs::write(root.join("a/b/y.txt"), "notes").unwrap();

        Fixture {
            out: temp.path().join("out"),
            exclusions_file: temp.path().join("exclusions.txt"),
            root,
            _temp: temp,
        }
    }

    fn config_for(fixture: &Fixture) -> Config {
        let mut config = Config::default();
        config.source.root = Some(fixture.root.clone());
        config.source.exclusions_file = fixture.exclusions_file.clone();
        config.output.directory = fixture.out.clone();
        config
    }

    fn combiner<'a>(config: Config, sink: &'a MemorySink) -> CodeCombiner<'a> {
        CodeCombiner::new(config, sink, OutputMode::Plain, true)
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_run_writes_three_artifacts() {
        let fixture = fixture();
        let sink = MemorySink::new();
        let report = combiner(config_for(&fixture), &sink).run().unwrap();

        let header = format!("--- a{}x.py ---", extractor::SEPARATOR);
        assert_eq!(
            read(fixture.out.join("combined_code_output.txt")),
            format!("{}\nprint(1)\n\n", header)
        );
        assert_eq!(
            read(fixture.out.join("folder_structure_tree.txt")),
            "project/\n    a/\n        x.py*\n        b/\n            y.txt\n"
        );

        // Paths keep the root prefix, so every root component gets a line.
        let expected_set: ExtractedFileSet =
            [fixture.root.join("a").join("x.py")].into_iter().collect();
        let extracted_tree = read(fixture.out.join("extracted_files_structure.txt"));
        assert_eq!(extracted_tree, build_extracted_files_tree(&expected_set));
        assert!(extracted_tree.contains("project/\n"));
        let lines: Vec<&str> = extracted_tree.lines().collect();
        let indent = |l: &str| l.len() - l.trim_start().len();
        let (folder, file) = (lines[lines.len() - 2], lines[lines.len() - 1]);
        assert_eq!(folder.trim_start(), "a/");
        assert_eq!(file.trim_start(), "x.py");
        assert_eq!(indent(file), indent(folder) + 4);

        assert_eq!(report.summary.files_extracted, 1);
        assert!(report.artifacts.report.is_none());
        assert!(!fixture.out.join(REPORT_FILE_NAME).exists());
    }

    #[test]
    fn test_missing_exclusions_file_is_a_warning() {
        let fixture = fixture();
        let sink = MemorySink::new();
        combiner(config_for(&fixture), &sink).run().unwrap();

        let warnings = sink.messages_at(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exclusions.txt"));
        assert!(sink
            .messages_at(LogLevel::Info)
            .iter()
            .any(|m| m == "Process completed successfully."));
    }

    #[test]
    fn test_excluded_directory_still_in_full_tree() {
        let fixture = fixture();
        fs::write(&fixture.exclusions_file, "b\n").unwrap();
        fs::write(fixture.root.join("a/b/z.py"), "hidden").unwrap();

        let sink = MemorySink::new();
        let report = combiner(config_for(&fixture), &sink).run().unwrap();

        assert_eq!(report.summary.files_extracted, 1);
        let combined = read(fixture.out.join("combined_code_output.txt"));
        assert!(!combined.contains("hidden"));

        let tree = read(fixture.out.join("folder_structure_tree.txt"));
        assert!(tree.contains("        b/\n"));
        assert!(tree.contains("y.txt\n"));
        assert!(tree.contains("z.py\n"));
        assert!(!tree.contains("z.py*"));
    }

    #[test]
    fn test_extra_exclusions_merge_with_file() {
        let fixture = fixture();
        fs::write(&fixture.exclusions_file, "nothing_matches\n").unwrap();
        let mut config = config_for(&fixture);
        config.source.extra_exclusions = vec!["x.py".to_string()];

        let sink = MemorySink::new();
        let report = combiner(config, &sink).run().unwrap();

        assert_eq!(report.summary.files_extracted, 0);
        assert_eq!(
            report.config_used.exclusions,
            vec!["nothing_matches", "x.py"]
        );
    }

    #[test]
    fn test_blank_extra_exclusion_prunes_nothing() {
        let fixture = fixture();
        let mut config = config_for(&fixture);
        config.source.extra_exclusions = vec!["venv".to_string(), String::new(), " ".to_string()];

        let sink = MemorySink::new();
        let report = combiner(config, &sink).run().unwrap();

        assert_eq!(report.summary.files_extracted, 1);
        assert_eq!(report.config_used.exclusions, vec!["venv"]);
        assert!(read(fixture.out.join("folder_structure_tree.txt")).contains("x.py*"));
    }

    #[test]
    fn test_missing_root_produces_empty_artifacts() {
        let fixture = fixture();
        let mut config = config_for(&fixture);
        config.source.root = Some(fixture.root.join("does-not-exist"));

        let sink = MemorySink::new();
        let report = combiner(config, &sink).run().unwrap();

        assert_eq!(report.summary.files_extracted, 0);
        assert!(read(fixture.out.join("combined_code_output.txt")).is_empty());
        assert!(read(fixture.out.join("folder_structure_tree.txt")).is_empty());
        assert!(read(fixture.out.join("extracted_files_structure.txt")).is_empty());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let fixture = fixture();
        fs::write(fixture.root.join("a/z.js"), "let z;").unwrap();
        fs::write(fixture.root.join("top.css"), "p {}").unwrap();
        let sink = MemorySink::new();

        combiner(config_for(&fixture), &sink).run().unwrap();
        let first_combined = read(fixture.out.join("combined_code_output.txt"));
        let first_tree = read(fixture.out.join("folder_structure_tree.txt"));

        combiner(config_for(&fixture), &sink).run().unwrap();
        let second_combined = read(fixture.out.join("combined_code_output.txt"));
        let second_tree = read(fixture.out.join("folder_structure_tree.txt"));
        assert_eq!(second_combined, first_combined);
        assert_eq!(second_tree, first_tree);
    }

    #[test]
    fn test_report_generation() {
        let fixture = fixture();
        let mut config = config_for(&fixture);
        config.output.generate_report = true;

        let sink = MemorySink::new();
        let report = combiner(config, &sink).run().unwrap();

        let report_path = fixture.out.join(REPORT_FILE_NAME);
        assert_eq!(report.artifacts.report, Some(report_path.clone()));
        let json: serde_json::Value = serde_json::from_str(&read(report_path)).unwrap();
        assert_eq!(json["summary"]["files_extracted"], 1);
    }

    #[test]
    fn test_unwritable_output_is_an_error() {
        let fixture = fixture();
        fs::write(&fixture.out, "a file, not a directory").unwrap();

        let sink = MemorySink::new();
        let result = combiner(config_for(&fixture), &sink).run();
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        CodeCombiner::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[source]"));
        assert!(content.contains("[output]"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
