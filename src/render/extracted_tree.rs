use crate::extractor::{ExtractedFileSet, SEPARATOR};

const INDENT: &str = "    ";

/// Tree of the extracted files only, sorted by path string.
///
/// Ancestor folders are written again for every file beneath them rather
/// than merged, so `a/x.py` and `a/y.py` produce two `a/` lines.
pub fn build_extracted_files_tree(extracted_files: &ExtractedFileSet) -> String {
    render_sorted_paths(&extracted_files.sorted_strings())
}

/// Renders already sorted path strings.
pub fn render_sorted_paths<S: AsRef<str>>(paths: &[S]) -> String {
    let mut structure = String::new();

    for file_path in paths {
        let segments: Vec<&str> = file_path.as_ref().split(SEPARATOR).collect();
        let Some((file_name, folders)) = segments.split_last() else {
            continue;
        };

        for (level, folder) in folders.iter().enumerate() {
            // Empty segments (leading separator) keep their level but no line.
            if !folder.is_empty() {
                structure.push_str(&INDENT.repeat(level));
                structure.push_str(folder);
                structure.push_str("/\n");
            }
        }

        structure.push_str(&INDENT.repeat(folders.len()));
        structure.push_str(file_name);
        structure.push('\n');
    }

    structure
}
