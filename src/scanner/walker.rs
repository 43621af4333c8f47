//! Input expansion: arguments to candidate sources.
//!
//! Each command-line argument is a root: a single file, or a directory walked
//! recursively. The resulting source list is deterministic — roots keep their
//! argument order and directory entries are visited in lexical order — which
//! fixes both the progress-marker order and the pair-generation order
//! downstream.
//!
//! Discovery does not try to guess which files are audio; every regular file
//! becomes a candidate and non-audio files fail softly at decode time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{AudioSource, DiscoveryError, DiscoverySet};

/// Expand `roots` into a [`DiscoverySet`].
///
/// # Errors
///
/// [`DiscoveryError::Unreadable`] when a root itself does not exist or its
/// metadata cannot be read. This is the run's only fatal condition: a bad
/// root means the user asked for something we cannot deliver at all, whereas
/// a bad file *inside* a directory is logged and skipped.
pub fn discover(roots: &[PathBuf]) -> Result<DiscoverySet, DiscoveryError> {
    let mut sources = Vec::new();

    for (root_idx, root) in roots.iter().enumerate() {
        let meta = fs::symlink_metadata(root)
            .map_err(|_| DiscoveryError::Unreadable(root.clone()))?;

        if meta.is_dir() {
            walk_directory(root, root_idx, &mut sources);
        } else {
            sources.push(source_from(root.clone(), root_idx, meta.len(), &meta));
        }
    }

    log::debug!("discovered {} source(s) under {} root(s)", sources.len(), roots.len());

    Ok(DiscoverySet {
        roots: roots.to_vec(),
        sources,
    })
}

fn walk_directory(root: &Path, root_idx: usize, sources: &mut Vec<AudioSource>) {
    let walk = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walk {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => {
                sources.push(source_from(
                    entry.path().to_path_buf(),
                    root_idx,
                    meta.len(),
                    &meta,
                ));
            }
            Err(e) => {
                log::warn!("skipping {}: {}", entry.path().display(), e);
            }
        }
    }
}

fn source_from(
    path: PathBuf,
    root: usize,
    size: u64,
    meta: &std::fs::Metadata,
) -> AudioSource {
    AudioSource {
        path,
        size,
        modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        root,
    }
}
