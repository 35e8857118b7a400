use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::foundation::error::{ReelError, ReelResult};

/// Where frame bytes come from.
///
/// Implementations are shared with loader workers, so they must be `Send + Sync`. A fetch may
/// block; it always runs off the event context.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes for the resource `name` (e.g. `frame_0001.webp`).
    fn fetch(&self, name: &str) -> ReelResult<Vec<u8>>;
}

/// Reads frames from files under a root directory.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return root directory used when resolving resource names.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for DirSource {
    fn fetch(&self, name: &str) -> ReelResult<Vec<u8>> {
        let rel = normalize_rel_path(name)?;
        let path = self.root.join(Path::new(&rel));
        std::fs::read(&path).map_err(|e| {
            ReelError::load(format!("read frame bytes from '{}': {e}", path.display()))
        })
    }
}

/// Serves frames from memory. Unknown names fail like a missing file would.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    frames: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.frames.insert(name.into(), bytes);
    }

    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemorySource {
    fn fetch(&self, name: &str) -> ReelResult<Vec<u8>> {
        self.frames
            .get(name)
            .cloned()
            .ok_or_else(|| ReelError::load(format!("no frame named '{name}'")))
    }
}

/// Normalize and validate a root-relative resource path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("frame paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("frame path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("frame path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
