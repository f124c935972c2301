use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One directory visited by [`DirectoryWalker::walk`].
///
/// `subdirs` may be edited by the visitor; only the names left in it are
/// descended into, in the order they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkStep {
    pub dir: PathBuf,
    pub subdirs: Vec<OsString>,
    pub files: Vec<OsString>,
}

impl WalkStep {
    pub fn file_path(&self, name: &OsString) -> PathBuf {
        self.dir.join(name)
    }
}

struct Listing {
    subdirs: Vec<OsString>,
    files: Vec<OsString>,
    linked_dirs: HashSet<OsString>,
}

/// Top-down, depth-first traversal in filesystem enumeration order.
///
/// A root that is missing or not a directory produces no steps. Directories
/// that cannot be listed are skipped silently. Symlinked directories show up
/// in `subdirs` but are never entered.
pub struct DirectoryWalker {
    root: PathBuf,
}

impl DirectoryWalker {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&mut WalkStep),
    {
        if !self.root.is_dir() {
            return;
        }

        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let Some(listing) = list_directory(&dir) else {
                continue;
            };

            let mut step = WalkStep {
                dir,
                subdirs: listing.subdirs,
                files: listing.files,
            };
            visit(&mut step);

            // Reversed so the first remaining subdir is walked next.
            for name in step.subdirs.iter().rev() {
                if !listing.linked_dirs.contains(name) {
                    pending.push(step.dir.join(name));
                }
            }
        }
    }

    /// Every step of an unpruned walk.
    pub fn steps(&self) -> Vec<WalkStep> {
        let mut steps = Vec::new();
        self.walk(|step| steps.push(step.clone()));
        steps
    }
}

fn list_directory(dir: &Path) -> Option<Listing> {
    let mut listing = Listing {
        subdirs: Vec::new(),
        files: Vec::new(),
        linked_dirs: HashSet::new(),
    };

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.path() == Some(dir) {
                    return None;
                }
                continue;
            }
        };

        let name = entry.file_name().to_os_string();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            listing.subdirs.push(name);
        } else if file_type.is_symlink() && entry.path().is_dir() {
            listing.linked_dirs.insert(name.clone());
            listing.subdirs.push(name);
        } else {
            listing.files.push(name);
        }
    }

    Some(listing)
}
