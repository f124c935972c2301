use crate::error::{CombinerError, Result};
use crate::logging::LogSink;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

/// Literal tokens; a path containing any of them as a substring is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    tokens: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One token per non-blank line, surrounding whitespace trimmed.
    pub fn parse(content: &str) -> Self {
        content.lines().collect()
    }

    /// A missing file is not an error: the run proceeds with an empty set.
    pub fn load<P: AsRef<Path>>(path: P, log: &dyn LogSink) -> Result<Self> {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let exclusions = Self::parse(&content);
                log.info(&format!("Loaded exclusions from '{}'.", path.display()));
                Ok(exclusions)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log.warning(&format!(
                    "No exclusions file found at '{}'. Proceeding without exclusions.",
                    path.display()
                ));
                Ok(Self::new())
            }
            Err(e) => Err(CombinerError::Exclusions {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Trims the token; a blank token would match every path and is dropped.
    pub fn insert<S: Into<String>>(&mut self, token: S) -> bool {
        match normalize_token(token.into()) {
            Some(token) => self.tokens.insert(token),
            None => false,
        }
    }

    /// True iff some token occurs anywhere in `path`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| path.contains(token.as_str()))
    }

    pub fn is_path_excluded(&self, path: &Path) -> bool {
        self.is_excluded(&path.to_string_lossy())
    }

    /// Verbatim membership, used for bare file names.
    pub fn contains_name(&self, name: &str) -> bool {
        self.tokens.contains(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

fn normalize_token(token: String) -> Option<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == token.len() {
        Some(token)
    } else {
        Some(trimmed.to_string())
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut exclusions = Self::new();
        exclusions.extend(iter);
        exclusions
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemorySink};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_substring_matching() {
        let exclusions: ExclusionSet = ["test"].into_iter().collect();

        assert!(exclusions.is_excluded("/src/test_runner.py"));
        assert!(exclusions.is_excluded("contest"));
        assert!(!exclusions.is_excluded("/src/Test_runner.py"));
        assert!(!exclusions.is_excluded("/src/main.py"));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        let exclusions = ExclusionSet::new();
        assert!(!exclusions.is_excluded(""));
        assert!(!exclusions.is_excluded("/anything/at/all"));
    }

    #[test]
    fn test_no_glob_semantics() {
        let exclusions: ExclusionSet = ["*.py"].into_iter().collect();
        assert!(!exclusions.is_excluded("main.py"));
        assert!(exclusions.is_excluded("weird*.py"));
    }

    #[test]
    fn test_contains_name_is_verbatim() {
        let exclusions: ExclusionSet = ["setup.py"].into_iter().collect();
        assert!(exclusions.contains_name("setup.py"));
        assert!(!exclusions.contains_name("my_setup.py"));
    }

    #[test]
    fn test_parse_trims_and_collapses() {
        let exclusions = ExclusionSet::parse("node_modules\n\n  build  \r\nnode_modules\n   \n");
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains_name("build"));
        assert!(exclusions.contains_name("node_modules"));
    }

    #[test]
    fn test_load_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exclusions.txt");
        fs::write(&path, "venv\n__pycache__\n").unwrap();

        let sink = MemorySink::new();
        let exclusions = ExclusionSet::load(&path, &sink).unwrap();

        assert_eq!(exclusions.len(), 2);
        assert_eq!(sink.messages_at(LogLevel::Info).len(), 1);
        assert!(sink.messages_at(LogLevel::Warning).is_empty());
    }

    #[test]
    fn test_load_missing_file_warns_and_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let sink = MemorySink::new();

        let exclusions = ExclusionSet::load(temp_dir.path().join("missing.txt"), &sink).unwrap();

        assert!(exclusions.is_empty());
        let warnings = sink.messages_at(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Proceeding without exclusions"));
    }

    #[test]
    fn test_load_unreadable_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let sink = MemorySink::new();

        // A directory cannot be read as a text file.
        let result = ExclusionSet::load(temp_dir.path(), &sink);
        assert!(matches!(result, Err(CombinerError::Exclusions { .. })));
    }

    #[test]
    fn test_blank_tokens_are_dropped() {
        let mut exclusions = ExclusionSet::new();
        assert!(!exclusions.insert(""));
        assert!(!exclusions.insert("   "));
        exclusions.extend(vec!["venv".to_string(), String::new()]);

        assert_eq!(exclusions.tokens().collect::<Vec<_>>(), vec!["venv"]);
        assert!(!exclusions.is_excluded("/proj/a"));
    }

    #[test]
    fn test_inserted_tokens_are_trimmed() {
        let exclusions: ExclusionSet = ["venv", " build"].into_iter().collect();
        assert!(exclusions.contains_name("build"));
        assert!(exclusions.is_excluded("/proj/build/out.js"));
    }

    #[test]
    fn test_extend_merges_tokens() {
        let mut exclusions = ExclusionSet::parse("dist\n");
        exclusions.extend(vec!["dist".to_string(), "coverage".to_string()]);
        let tokens: Vec<&str> = exclusions.tokens().collect();
        assert_eq!(tokens, vec!["coverage", "dist"]);
    }
}
