pub mod exclusions;
pub mod walker;

pub use exclusions::ExclusionSet;
pub use walker::{DirectoryWalker, WalkStep};
