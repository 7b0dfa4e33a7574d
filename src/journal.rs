//! Append-only per-run journal.
//!
//! A [`Journal`] is opened at the start of a run and released at the end. It
//! owns one log file under a dedicated subdirectory whose name combines the
//! operation string, a sanitised target name, and a run timestamp:
//!
//! ```text
//! journal/journal_<OP>_<TARGET>_<YYYYMMDD_HHMMSS>.log
//! ```
//!
//! Every mutating method takes the journal's internal mutex, and workers
//! flush their per-file output through [`Journal::log_block`] as one
//! pre-formatted string, so lines belonging to different files never
//! interleave in the log.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use chrono::Local;

use crate::config::{JOURNAL_DIR, JOURNAL_NAME_MAX};
use crate::util::ensure_directory_exists;

/// Scoped per-run journal file.
pub struct Journal {
    path: PathBuf,
    file: Mutex<File>,
    start: Instant,
}

impl Journal {
    /// Creates the journal directory under the current working directory and
    /// opens a run-stamped log file inside it.
    pub fn create(operation: &str, target_name: &str) -> io::Result<Journal> {
        Journal::create_in(Path::new(JOURNAL_DIR), operation, target_name)
    }

    /// Like [`Journal::create`] but with an explicit journal directory.
    pub fn create_in(dir: &Path, operation: &str, target_name: &str) -> io::Result<Journal> {
        ensure_directory_exists(dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!(
            "journal_{}_{}_{}.log",
            operation,
            sanitize_name(target_name),
            stamp
        ));
        let file = File::create(&path)?;
        Ok(Journal {
            path,
            file: Mutex::new(file),
            start: Instant::now(),
        })
    }

    /// Path of the journal file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the fixed-format preamble identifying the run.
    pub fn write_header(
        &self,
        operation: &str,
        target_name: &str,
        source_path: &str,
        dest_path: &str,
        total_files: usize,
        total_size: u64,
    ) -> io::Result<()> {
        let mut file = self.file.lock().unwrap();
        writeln!(file, "========================================")?;
        if total_files > 1 {
            writeln!(file, "OPERATION JOURNAL - DIRECTORY")?;
        } else {
            writeln!(file, "OPERATION JOURNAL - FILE")?;
        }
        writeln!(file, "========================================")?;
        writeln!(file, "Operation: {}", operation)?;
        writeln!(file, "Target: {}", target_name)?;
        writeln!(file, "Source: {}", source_path)?;
        writeln!(file, "Destination: {}", dest_path)?;
        writeln!(file, "Total files: {}", total_files)?;
        writeln!(file, "Total size: {} bytes", total_size)?;
        writeln!(file, "Started: {}", timestamp())?;
        writeln!(file, "========================================")?;
        writeln!(file)?;
        file.flush()
    }

    /// Writes one timestamped line.
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut file = self.file.lock().unwrap();
        writeln!(file, "[{}] {}", Local::now().format("%H:%M:%S"), message)?;
        file.flush()
    }

    /// Appends a pre-formatted multi-line block atomically.
    ///
    /// Workers buffer their per-file lines and flush them here in one call so
    /// concurrent files never interleave inside the log.
    pub fn log_block(&self, block: &str) -> io::Result<()> {
        let mut file = self.file.lock().unwrap();
        file.write_all(block.as_bytes())?;
        file.flush()
    }

    /// Writes the terminal block with the run status and total elapsed time.
    pub fn write_summary(
        &self,
        status: &str,
        files_processed: usize,
        bytes_processed: u64,
    ) -> io::Result<()> {
        let elapsed_ms = self.start.elapsed().as_millis();
        let mut file = self.file.lock().unwrap();
        writeln!(file)?;
        writeln!(file, "========================================")?;
        writeln!(file, "[{}] Run completed: {}", timestamp(), status)?;
        writeln!(
            file,
            "Total processed: {} files ({} bytes)",
            files_processed, bytes_processed
        )?;
        writeln!(file, "Total time: {} ms", elapsed_ms)?;
        writeln!(file, "========================================")?;
        file.flush()
    }
}

/// Renders the separator that opens one file's block inside a directory run.
pub fn file_separator(file_num: usize, total_files: usize, filename: &str) -> String {
    format!(
        "\n----------------------------------------\n\
         File {}/{}: {}\n\
         ----------------------------------------\n",
        file_num, total_files, filename
    )
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Reduces `name` to its final path component and replaces characters that
/// are unsafe in filenames (`/ \ space : * ? " < > |`) with `_`, truncating
/// to [`JOURNAL_NAME_MAX`] characters.
fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let base = trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(name);
    base.chars()
        .map(|c| match c {
            '/' | '\\' | ' ' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .take(JOURNAL_NAME_MAX)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_name("my file:v2?.txt"), "my_file_v2_.txt");
        assert_eq!(sanitize_name("a<b>c|d\"e"), "a_b_c_d_e");
    }

    #[test]
    fn sanitize_takes_basename() {
        assert_eq!(sanitize_name("/data/in/tree"), "tree");
        assert_eq!(sanitize_name("C:\\data\\tree"), "tree");
        // Trailing separator falls back to the previous component.
        assert_eq!(sanitize_name("tree/"), "tree");
    }

    #[test]
    fn sanitize_truncates_to_limit() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_name(&long).len(), JOURNAL_NAME_MAX);
    }

    #[test]
    fn journal_filename_shape() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::create_in(dir.path(), "ce", "input tree").unwrap();
        let name = journal.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("journal_ce_input_tree_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn header_block_and_summary_appear_in_order() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::create_in(dir.path(), "c", "file.bin").unwrap();
        journal
            .write_header("c", "file.bin", "/in/file.bin", "/out/file.bin", 1, 42)
            .unwrap();
        journal.log("starting stage dispatch").unwrap();
        journal.log_block("block line 1\nblock line 2\n").unwrap();
        journal.write_summary("OK", 1, 42).unwrap();

        let text = fs::read_to_string(journal.path()).unwrap();
        assert!(text.contains("] starting stage dispatch"));
        let header_pos = text.find("OPERATION JOURNAL - FILE").unwrap();
        let block_pos = text.find("block line 1").unwrap();
        let summary_pos = text.find("Run completed: OK").unwrap();
        assert!(header_pos < block_pos && block_pos < summary_pos);
        assert!(text.contains("Total files: 1"));
        assert!(text.contains("Total size: 42 bytes"));
        assert!(text.contains("Total time:"));
    }

    #[test]
    fn concurrent_blocks_never_interleave() {
        let dir = TempDir::new().unwrap();
        let journal = Arc::new(Journal::create_in(dir.path(), "c", "t").unwrap());
        let mut handles = Vec::new();
        for t in 0..8 {
            let journal = Arc::clone(&journal);
            handles.push(std::thread::spawn(move || {
                for i in 0..20 {
                    let block = format!("BEGIN {t}-{i}\nmiddle {t}-{i}\nEND {t}-{i}\n");
                    journal.log_block(&block).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let text = fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // Every BEGIN must be followed immediately by its own middle and END.
        let mut idx = 0;
        let mut blocks = 0;
        while idx < lines.len() {
            let tag = lines[idx].strip_prefix("BEGIN ").expect("block start");
            assert_eq!(lines[idx + 1], format!("middle {tag}"));
            assert_eq!(lines[idx + 2], format!("END {tag}"));
            idx += 3;
            blocks += 1;
        }
        assert_eq!(blocks, 8 * 20);
    }

    #[test]
    fn file_separator_shape() {
        let sep = file_separator(3, 10, "dir/name.bin");
        assert!(sep.contains("File 3/10: dir/name.bin"));
        assert!(sep.starts_with('\n'));
        assert!(sep.ends_with("----------------------------------------\n"));
    }
}
