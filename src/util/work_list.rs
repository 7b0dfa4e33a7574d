//! Work-list construction with recursive directory expansion.
//!
//! Given an input path and an output root, [`collect_work_items`] returns a
//! flat `Vec<WorkItem>` of (source, destination) pairs covering every regular
//! file under the input, with each destination mirroring the source's
//! relative position under the output root. Mirror directories are created
//! eagerly during the walk so workers can open their destinations without
//! racing on `mkdir`.
//!
//! **Symlink handling**: symlinks are never followed during directory
//! traversal. [`walkdir`] runs with its default `follow_links(false)`
//! setting, so symlink entries report a symlink `file_type()` rather than the
//! target's type and are excluded from the result. This prevents infinite
//! loops from cyclic symlinks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// An immutable (source, destination) pair consumed by the work executor.
///
/// Both paths refer to regular files; for directory inputs the destination
/// mirrors the source's relative position under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Regular file to read.
    pub src: PathBuf,
    /// File to produce. Parent directory exists by the time the item is emitted.
    pub dst: PathBuf,
}

/// Creates `path` and every missing ancestor directory.
///
/// Succeeds if the path already exists as a directory; fails with an
/// `io::Error` if a non-directory occupies the path or any ancestor.
pub fn ensure_directory_exists(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: exists and is not a directory", path.display()),
        ));
    }
    Ok(())
}

/// Expands `input` into a flat list of work items targeting `output`.
///
/// - When `input` is a regular file, `output` is taken as the destination
///   file path; its parent directory is created and a single item is
///   returned.
/// - When `input` is a directory, the tree is walked recursively; each
///   regular file yields one item whose destination is
///   `output/<relative path>`. Mirror directories (including `output`
///   itself) are created on the way. Symlinks are excluded regardless of
///   target type.
///
/// If any directory entry cannot be read, the walk is aborted and an
/// `io::Error` is returned. Returns an empty `Vec` for a directory that
/// contains no regular files.
pub fn collect_work_items(input: &Path, output: &Path) -> io::Result<Vec<WorkItem>> {
    let mut items = Vec::new();

    if !input.is_dir() {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory_exists(parent)?;
            }
        }
        items.push(WorkItem {
            src: input.to_path_buf(),
            dst: output.to_path_buf(),
        });
        return Ok(items);
    }

    for entry in WalkDir::new(input) {
        let entry = entry.map_err(|e| {
            e.io_error()
                .map(|io| io::Error::new(io.kind(), io.to_string()))
                .unwrap_or_else(|| io::Error::other(e.to_string()))
        })?;
        let rel = entry
            .path()
            .strip_prefix(input)
            .expect("walkdir yields paths under its root");
        let mirrored = output.join(rel);
        if entry.file_type().is_dir() {
            ensure_directory_exists(&mirrored)?;
        } else if entry.file_type().is_file() {
            items.push(WorkItem {
                src: entry.into_path(),
                dst: mirrored,
            });
        }
        // Symlinks and special files fall through: not walked, not emitted.
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::create_dir(root.join("sub/deep")).unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();
        fs::write(root.join("sub/b.txt"), b"b").unwrap();
        fs::write(root.join("sub/deep/c.txt"), b"c").unwrap();
        dir
    }

    #[test]
    fn single_file_input_yields_one_item() {
        let dir = make_tree();
        let out = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dst = out.path().join("nested/out.bin");
        let items = collect_work_items(&src, &dst).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].src, src);
        assert_eq!(items[0].dst, dst);
        // Parent of the destination was created.
        assert!(out.path().join("nested").is_dir());
    }

    #[test]
    fn directory_input_mirrors_structure() {
        let dir = make_tree();
        let out = TempDir::new().unwrap();
        let out_root = out.path().join("mirror");
        let mut items = collect_work_items(dir.path(), &out_root).unwrap();
        items.sort_by(|a, b| a.src.cmp(&b.src));
        assert_eq!(items.len(), 3);
        assert!(out_root.join("sub/deep").is_dir());
        let dsts: Vec<_> = items.iter().map(|i| i.dst.clone()).collect();
        assert!(dsts.contains(&out_root.join("a.txt")));
        assert!(dsts.contains(&out_root.join("sub/b.txt")));
        assert!(dsts.contains(&out_root.join("sub/deep/c.txt")));
    }

    #[test]
    fn empty_directory_yields_no_items() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let items = collect_work_items(dir.path(), &out.path().join("o")).unwrap();
        assert!(items.is_empty());
        // The output root itself is still mirrored.
        assert!(out.path().join("o").is_dir());
    }

    #[test]
    fn ensure_directory_exists_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("x/y/z");
        ensure_directory_exists(&p).unwrap();
        ensure_directory_exists(&p).unwrap();
        assert!(p.is_dir());
    }

    #[test]
    fn ensure_directory_exists_rejects_file_at_path() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("occupied");
        fs::write(&p, b"not a dir").unwrap();
        assert!(ensure_directory_exists(&p).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_directory_is_excluded() {
        use std::os::unix::fs::symlink;
        let dir = make_tree();
        symlink(dir.path().join("a.txt"), dir.path().join("link_to_a")).unwrap();
        let out = TempDir::new().unwrap();
        let items = collect_work_items(dir.path(), out.path()).unwrap();
        // a.txt, sub/b.txt, sub/deep/c.txt — the symlink is not counted.
        assert_eq!(items.len(), 3);
    }
}
