use crate::logging::LogSink;
use crate::scanner::{DirectoryWalker, ExclusionSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::{Duration, Instant};

/// Platform separator, as it appears in headers and tree splitting.
pub const SEPARATOR: char = MAIN_SEPARATOR;

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_extracted: usize,
    pub files_skipped: usize,
    pub bytes_read: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub failures: usize,
}

impl ExtractionProgress {
    pub fn new() -> Self {
        Self {
            files_extracted: 0,
            files_skipped: 0,
            bytes_read: 0,
            current_file: None,
            start_time: Instant::now(),
            failures: 0,
        }
    }

    pub fn record_extracted(&mut self, relative_path: String, bytes: u64) {
        self.files_extracted += 1;
        self.bytes_read += bytes;
        self.current_file = Some(relative_path);
    }

    pub fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn record_failure(&mut self, relative_path: String) {
        self.failures += 1;
        self.current_file = Some(relative_path);
    }

    pub fn files_seen(&self) -> usize {
        self.files_extracted + self.files_skipped + self.failures
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ExtractionProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailureKind {
    Io,
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub kind: ReadFailureKind,
    pub message: String,
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to read file '{}': {}",
            self.path.display(),
            self.message
        )
    }
}

/// Reads a source file as UTF-8 text.
pub fn read_source_file(path: &Path) -> Result<String, ReadFailure> {
    std::fs::read_to_string(path).map_err(|e| ReadFailure {
        path: path.to_path_buf(),
        kind: if e.kind() == ErrorKind::InvalidData {
            ReadFailureKind::Decode
        } else {
            ReadFailureKind::Io
        },
        message: e.to_string(),
    })
}

/// One file's contribution to the combined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRecord {
    pub relative_path: PathBuf,
    pub content: String,
}

impl CombinedRecord {
    pub fn header(&self) -> String {
        format!("--- {} ---", self.relative_path.display())
    }

    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.header());
        out.push('\n');
        out.push_str(&self.content);
        out.push_str("\n\n");
    }
}

/// Paths of the files whose content made it into the combined output, as
/// the walker produced them (root joined with the relative path).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFileSet {
    paths: HashSet<PathBuf>,
}

impl ExtractedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, path: P) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Path strings in plain lexicographic string order.
    pub fn sorted_strings(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        paths.sort();
        paths
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ExtractedFileSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeExtraction {
    pub records: Vec<CombinedRecord>,
    pub extracted_files: ExtractedFileSet,
    pub failures: Vec<ReadFailure>,
}

impl CodeExtraction {
    pub fn combined_text(&self) -> String {
        let mut combined = String::new();
        for record in &self.records {
            record.render_into(&mut combined);
        }
        combined
    }

    pub fn bytes_read(&self) -> u64 {
        self.records.iter().map(|r| r.content.len() as u64).sum()
    }
}

pub struct CodeExtractor<'a> {
    extensions: Vec<String>,
    log: &'a dyn LogSink,
}

impl<'a> CodeExtractor<'a> {
    pub fn new<S: AsRef<str>>(extensions: &[S], log: &'a dyn LogSink) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .collect(),
            log,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Extension test on the bare file name. Case-sensitive; a name whose
    /// only dot is the leading one (`.bashrc`) has no extension.
    pub fn has_allowed_extension(&self, file_name: &str) -> bool {
        match file_extension(file_name) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed == ext),
            None => false,
        }
    }

    /// Returns the combined text and the set of extracted paths.
    pub fn combine_code_files(
        &self,
        root: &Path,
        exclusions: &ExclusionSet,
    ) -> (String, ExtractedFileSet) {
        let extraction = self.extract(root, exclusions, None);
        (extraction.combined_text(), extraction.extracted_files)
    }

    pub fn extract(
        &self,
        root: &Path,
        exclusions: &ExclusionSet,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> CodeExtraction {
        let mut extraction = CodeExtraction::default();
        let mut progress = ExtractionProgress::new();

        DirectoryWalker::new(root).walk(|step| {
            let dir = step.dir.clone();
            step.subdirs
                .retain(|name| !exclusions.is_path_excluded(&dir.join(name)));

            for name in &step.files {
                let file_name = name.to_string_lossy();
                if exclusions.contains_name(&file_name) || !self.has_allowed_extension(&file_name)
                {
                    progress.record_skipped();
                    continue;
                }

                let file_path = step.file_path(name);
                let relative_path = relative_to(&file_path, root);

                match read_source_file(&file_path) {
                    Ok(content) => {
                        self.log.debug(&format!(
                            "Extracted code from file: {}",
                            relative_path.display()
                        ));
                        progress.record_extracted(
                            relative_path.display().to_string(),
                            content.len() as u64,
                        );
                        extraction.records.push(CombinedRecord {
                            relative_path,
                            content,
                        });
                        extraction.extracted_files.insert(file_path);
                    }
                    Err(failure) => {
                        self.log.error(&failure.to_string());
                        progress.record_failure(relative_path.display().to_string());
                        extraction.failures.push(failure);
                    }
                }

                if let Some(callback) = progress_callback {
                    callback(&progress);
                }
            }
        });

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        extraction
    }
}

fn file_extension(file_name: &str) -> Option<&str> {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let rest = &file_name[stem_start..];
    rest.rfind('.').map(|dot| &rest[dot + 1..])
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}
