use crate::extractor::{ExtractedFileSet, SEPARATOR};
use crate::scanner::DirectoryWalker;
use std::path::Path;

pub const DEFAULT_MARKER: &str = "*";
const INDENT: &str = "    ";

/// Full directory tree under `root`, extracted files marked with `*`.
pub fn build_folder_tree(root: &Path, extracted_files: &ExtractedFileSet) -> String {
    build_folder_tree_with_marker(root, extracted_files, DEFAULT_MARKER)
}

/// Visits every directory and file, excluded ones included. A directory at
/// depth `d` below root is indented `d` levels and its files `d + 1`.
pub fn build_folder_tree_with_marker(
    root: &Path,
    extracted_files: &ExtractedFileSet,
    marker: &str,
) -> String {
    let mut structure = String::new();

    DirectoryWalker::new(root).walk(|step| {
        let level = depth_below(&step.dir, root);
        let name = if level == 0 {
            root_label(root)
        } else {
            step.dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        structure.push_str(&INDENT.repeat(level));
        structure.push_str(&name);
        structure.push_str("/\n");

        let subindent = INDENT.repeat(level + 1);
        for file in &step.files {
            structure.push_str(&subindent);
            structure.push_str(&file.to_string_lossy());
            if extracted_files.contains(&step.file_path(file)) {
                structure.push_str(marker);
            }
            structure.push('\n');
        }
    });

    structure
}

fn depth_below(dir: &Path, root: &Path) -> usize {
    dir.strip_prefix(root)
        .map(|relative| relative.components().count())
        .unwrap_or(0)
}

fn root_label(root: &Path) -> String {
    match root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root
            .to_string_lossy()
            .trim_end_matches(SEPARATOR)
            .to_string(),
    }
}
