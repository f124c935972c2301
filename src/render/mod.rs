pub mod extracted_tree;
pub mod full_tree;

pub use extracted_tree::build_extracted_files_tree;
pub use full_tree::{build_folder_tree, build_folder_tree_with_marker, DEFAULT_MARKER};
