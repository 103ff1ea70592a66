//! File discovery for bulletin batches
//!
//! Walks an input directory and collects files whose names match the
//! configured pattern (e.g. `*.buf`), in a stable order.

use crate::config::BufkitConfig;
use crate::error::{BufkitError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for bulletin directories
#[derive(Debug)]
pub struct FileDiscovery {
    input_dir: PathBuf,
    pattern: glob::Pattern,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_dir: PathBuf, config: &BufkitConfig) -> Result<Self> {
        let pattern = glob::Pattern::new(&config.file_pattern).map_err(|e| {
            BufkitError::configuration(format!(
                "invalid file pattern {:?}: {}",
                config.file_pattern, e
            ))
        })?;

        Ok(Self {
            input_dir,
            pattern,
            recursive: config.recursive,
        })
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Discover all matching bulletin files, sorted by path
    ///
    /// Archive layouts nest bulletins by date and run:
    /// ```text
    /// input/
    ///   2023/01/15/bufkit/12/
    ///     nam/
    ///       nam_kbuf.buf
    ///     gfs/
    ///       gfs_kbuf.buf
    /// ```
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(BufkitError::InputNotFound {
                path: self.input_dir.clone(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_dir)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} bulletin files in {}",
            files.len(),
            self.input_dir.display()
        );

        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.pattern.matches(name))
    }
}
