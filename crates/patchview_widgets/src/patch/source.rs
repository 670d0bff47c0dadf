//! Where patch text comes from

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Read access to patch files by path
pub trait PatchSource: Send + Sync {
    fn read_patch(&self, path: &Path) -> io::Result<String>;
}

/// Shared source handle
pub type SharedSource = Arc<dyn PatchSource>;

/// Patch files on disk, relative paths resolved against `root`
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve relative to the working directory
    pub fn cwd() -> Self {
        Self::new(PathBuf::new())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PatchSource for FsSource {
    fn read_patch(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(path))
    }
}

/// In-memory patch files
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: FxHashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), text.into());
    }
}

impl PatchSource for MemorySource {
    fn read_patch(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no patch named {}", path.display()),
                )
            })
    }
}

/// Lexically normalize a path: drop `.` and fold `..` where possible
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
