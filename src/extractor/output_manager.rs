use crate::config::OutputConfig;
use crate::error::{CombinerError, Result};
use crate::extractor::{CodeExtraction, ExtractionProgress, ReadFailure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const REPORT_FILE_NAME: &str = "codecombiner_report.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub root: String,
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub extracted_files: Vec<String>,
    pub failures: Vec<ReadFailure>,
    pub artifacts: ArtifactPaths,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_extracted: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub bytes_read: u64,
    pub duration: Duration,
    pub files_by_extension: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub combined: PathBuf,
    pub structure: PathBuf,
    pub extracted_structure: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub extensions: Vec<String>,
    pub exclusions: Vec<String>,
    pub marker: String,
}

impl RunReport {
    pub fn new(
        root: &Path,
        extraction: &CodeExtraction,
        progress: &ExtractionProgress,
        artifacts: ArtifactPaths,
        config_used: ConfigSnapshot,
    ) -> Self {
        let mut files_by_extension = BTreeMap::new();
        for record in &extraction.records {
            let ext = record
                .relative_path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "no_extension".to_string());
            *files_by_extension.entry(ext).or_insert(0) += 1;
        }

        Self {
            root: root.display().to_string(),
            generated_at: Utc::now(),
            summary: RunSummary {
                files_extracted: extraction.records.len(),
                files_skipped: progress.files_skipped,
                files_failed: extraction.failures.len(),
                bytes_read: extraction.bytes_read(),
                duration: progress.elapsed(),
                files_by_extension,
            },
            extracted_files: extraction
                .records
                .iter()
                .map(|r| r.relative_path.display().to_string())
                .collect(),
            failures: extraction.failures.clone(),
            artifacts,
            config_used,
        }
    }
}

/// Writes run artifacts into one output directory.
pub struct OutputManager {
    output_directory: PathBuf,
    combined_file: String,
    structure_file: String,
    extracted_structure_file: String,
}

impl OutputManager {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            output_directory: config.directory.clone(),
            combined_file: config.combined_file.clone(),
            structure_file: config.structure_file.clone(),
            extracted_structure_file: config.extracted_structure_file.clone(),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        if !self.output_directory.exists() {
            fs::create_dir_all(&self.output_directory).map_err(|e| {
                CombinerError::WriteArtifact {
                    path: self.output_directory.clone(),
                    source: e,
                }
            })?;
        }

        if !self.output_directory.is_dir() {
            return Err(CombinerError::InvalidPath {
                path: format!("{} is not a directory", self.output_directory.display()),
            });
        }

        Ok(())
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            combined: self.output_directory.join(&self.combined_file),
            structure: self.output_directory.join(&self.structure_file),
            extracted_structure: self.output_directory.join(&self.extracted_structure_file),
            report: None,
        }
    }

    pub fn write_combined(&self, content: &str) -> Result<PathBuf> {
        self.write_artifact(&self.combined_file, content)
    }

    pub fn write_structure(&self, content: &str) -> Result<PathBuf> {
        self.write_artifact(&self.structure_file, content)
    }

    pub fn write_extracted_structure(&self, content: &str) -> Result<PathBuf> {
        self.write_artifact(&self.extracted_structure_file, content)
    }

    pub fn write_report(&self, report: &RunReport) -> Result<PathBuf> {
        let json_content = serde_json::to_string_pretty(report).map_err(|e| CombinerError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })?;

        self.write_artifact(REPORT_FILE_NAME, &json_content)
    }

    fn write_artifact(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_directory.join(file_name);
        fs::write(&path, content).map_err(|e| CombinerError::WriteArtifact {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
