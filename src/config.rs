use crate::error::{CombinerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "js", "html", "css", "jsx"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub exclusions_file: PathBuf,
    pub extra_exclusions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub combined_file: String,
    pub structure_file: String,
    pub extracted_structure_file: String,
    pub marker: String,
    pub generate_report: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_to_file: bool,
    pub log_dir: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclusions_file: PathBuf::from("exclusions.txt"),
            extra_exclusions: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            combined_file: "combined_code_output.txt".to_string(),
            structure_file: "folder_structure_tree.txt".to_string(),
            extracted_structure_file: "extracted_files_structure.txt".to_string(),
            marker: "*".to_string(),
            generate_report: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            log_to_file: true,
            log_dir: PathBuf::from("."),
        }
    }
}

impl SourceConfig {
    /// Extensions without their leading dot, as compared against file names.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

impl OutputConfig {
    pub fn combined_path(&self) -> PathBuf {
        self.directory.join(&self.combined_file)
    }

    pub fn structure_path(&self) -> PathBuf {
        self.directory.join(&self.structure_file)
    }

    pub fn extracted_structure_path(&self) -> PathBuf {
        self.directory.join(&self.extracted_structure_file)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CombinerError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CombinerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| CombinerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["codecombiner.toml", ".codecombiner.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref root) = cli_args.root {
            self.source.root = Some(root.clone());
        }

        if let Some(ref formats) = cli_args.formats {
            self.source.extensions = formats
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(ref exclusions_file) = cli_args.exclusions_file {
            self.source.exclusions_file = exclusions_file.clone();
        }

        if let Some(ref exclude) = cli_args.exclude {
            let tokens = exclude
                .iter()
                .map(|token| token.trim())
                .filter(|token| !token.is_empty())
                .map(str::to_string);
            self.source.extra_exclusions.extend(tokens);
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(ref marker) = cli_args.marker {
            self.output.marker = marker.clone();
        }

        if let Some(generate_report) = cli_args.generate_report {
            self.output.generate_report = generate_report;
        }

        if let Some(ref level) = cli_args.log_level {
            self.logging.level = level.to_lowercase();
        }

        if let Some(log_to_file) = cli_args.log_to_file {
            self.logging.log_to_file = log_to_file;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CombinerError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| CombinerError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.root.is_none() {
            return Err(CombinerError::MissingRoot);
        }

        if self.source.normalized_extensions().is_empty() {
            return Err(CombinerError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        let output = &self.output;
        let file_names = [
            ("combined_file", &output.combined_file),
            ("structure_file", &output.structure_file),
            ("extracted_structure_file", &output.extracted_structure_file),
        ];
        for (key, name) in file_names {
            if name.trim().is_empty() {
                return Err(CombinerError::Config {
                    message: format!("Output file name `{}` must not be empty", key),
                });
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(CombinerError::Config {
                message: format!(
                    "Unknown log level `{}` (expected one of: {})",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.source.root = Some(PathBuf::from("path/to/project"));
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub formats: Option<String>,
    pub exclusions_file: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub marker: Option<String>,
    pub generate_report: Option<bool>,
    pub log_level: Option<String>,
    pub log_to_file: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    pub fn with_formats(mut self, formats: Option<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_exclusions_file(mut self, path: Option<PathBuf>) -> Self {
        self.exclusions_file = path;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_marker(mut self, marker: Option<String>) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_generate_report(mut self, generate_report: Option<bool>) -> Self {
        self.generate_report = generate_report;
        self
    }

    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_to_file(mut self, log_to_file: Option<bool>) -> Self {
        self.log_to_file = log_to_file;
        self
    }
}
