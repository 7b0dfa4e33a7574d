// tests/batch_concurrency.rs — end-to-end directory runs through the batch
// executor: one record and one output per input file, forward/reverse chain
// recovery, and journal block contiguity under parallel workers.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use codecpipe::batch::{process_batch, BatchOptions};
use codecpipe::codec::{CompressionAlg, EncryptionAlg, OpCode};
use codecpipe::pipeline::ChainSpec;

const KEY: &str = "0123456789abcdef";

fn chain(ops: &str, key: Option<&str>) -> ChainSpec {
    ChainSpec {
        ops: ops.chars().map(|c| OpCode::from_char(c).unwrap()).collect(),
        compression: Some(CompressionAlg::Rle),
        encryption: Some(EncryptionAlg::Aes128),
        key: key.map(str::to_owned),
    }
}

fn opts(dir: &TempDir, workers: usize) -> BatchOptions {
    BatchOptions {
        nb_workers: workers,
        strict: false,
        journal_dir: Some(dir.path().join("journal")),
    }
}

/// Builds a tree of `n` files with distinct, repetitive content.
fn build_tree(root: &Path, n: usize) {
    fs::create_dir_all(root.join("nested/deeper")).unwrap();
    for i in 0..n {
        let rel = match i % 3 {
            0 => format!("file_{i:03}.bin"),
            1 => format!("nested/file_{i:03}.bin"),
            _ => format!("nested/deeper/file_{i:03}.bin"),
        };
        let body = format!("payload {i} ").repeat(20 + i % 50);
        fs::write(root.join(rel), body).unwrap();
    }
}

#[test]
fn hundred_files_compress_encrypt_and_recover() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let packed = dir.path().join("packed");
    let restored = dir.path().join("restored");
    build_tree(&input, 100);

    // Forward: compress then encrypt.
    let summary = process_batch(&input, &packed, &chain("ce", Some(KEY)), &opts(&dir, 8)).unwrap();
    assert_eq!(summary.total_files, 100);
    assert_eq!(summary.files_ok, 100);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.results.len(), 100);

    // Each record corresponds to exactly one input path.
    let names: HashSet<_> = summary.results.iter().map(|r| r.filename.clone()).collect();
    assert_eq!(names.len(), 100);

    // Reverse: decrypt then decompress, into a third tree.
    let summary = process_batch(&packed, &restored, &chain("ud", Some(KEY)), &opts(&dir, 8)).unwrap();
    assert_eq!(summary.files_ok, 100);

    // The restored tree is byte-identical to the input tree.
    for entry in walkdir::WalkDir::new(&input) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(&input).unwrap();
            assert_eq!(
                fs::read(entry.path()).unwrap(),
                fs::read(restored.join(rel)).unwrap(),
                "{}",
                rel.display()
            );
        }
    }
}

#[test]
fn journal_contains_one_contiguous_block_per_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    build_tree(&input, 40);

    let summary = process_batch(&input, &output, &chain("c", None), &opts(&dir, 8)).unwrap();
    let text = fs::read_to_string(&summary.journal_path).unwrap();

    // Exactly one separator per file.
    let separators = text.matches("----------------------------------------\nFile ").count();
    assert_eq!(separators, 40);

    // Between a file's separator and its completion marker there must be no
    // line belonging to another file: "Processing:" opens a block and
    // "Completed:" closes it, so the two must strictly alternate.
    let mut open = false;
    for line in text.lines() {
        let body = line.splitn(2, "] ").nth(1).unwrap_or(line);
        if body.starts_with("Processing: ") {
            assert!(!open, "nested Processing line: {line}");
            open = true;
        } else if body.starts_with("Completed: ") {
            assert!(open, "Completed without Processing: {line}");
            open = false;
        }
    }
    assert!(!open);

    // The summary block closes the journal.
    assert!(text.trim_end().ends_with("========================================"));
    assert!(text.contains("Run completed: OK"));
}

#[test]
fn mixed_failures_leave_siblings_intact() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    // Valid AES containers for some files, garbage for others; decrypting
    // the garbage fails while the valid files succeed.
    for i in 0..6 {
        let src = dir.path().join(format!("plain{i}"));
        fs::write(&src, format!("plaintext number {i}")).unwrap();
        codecpipe::codec::aes_cbc::encrypt(&src, &input.join(format!("good{i}.bin")), KEY).unwrap();
    }
    for i in 0..4 {
        fs::write(input.join(format!("bad{i}.bin")), [0u8; 21]).unwrap();
    }

    let spec = ChainSpec {
        ops: vec![OpCode::Decrypt],
        compression: None,
        encryption: Some(EncryptionAlg::Aes128),
        key: Some(KEY.to_owned()),
    };
    let summary = process_batch(&input, &output, &spec, &opts(&dir, 4)).unwrap();
    assert_eq!(summary.total_files, 10);
    assert_eq!(summary.files_ok, 6);
    assert_eq!(summary.files_failed, 4);

    for i in 0..6 {
        assert_eq!(
            fs::read(output.join(format!("good{i}.bin"))).unwrap(),
            format!("plaintext number {i}").as_bytes()
        );
    }
    let text = fs::read_to_string(&summary.journal_path).unwrap();
    assert!(text.contains("COMPLETED WITH ERRORS"));
    assert_eq!(text.matches("FAILED:").count(), 4);
}

#[test]
fn no_temp_files_survive_a_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    build_tree(&input, 20);

    process_batch(&input, &output, &chain("ce", Some(KEY)), &opts(&dir, 4)).unwrap();

    for entry in walkdir::WalkDir::new(&output) {
        let entry = entry.unwrap();
        assert!(
            !entry.file_name().to_string_lossy().contains(".tmp."),
            "leftover temp file: {}",
            entry.path().display()
        );
    }
}

#[test]
fn single_worker_and_many_workers_agree() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    build_tree(&input, 12);

    let out_serial = dir.path().join("serial");
    let out_parallel = dir.path().join("parallel");
    process_batch(&input, &out_serial, &chain("c", None), &opts(&dir, 1)).unwrap();
    process_batch(&input, &out_parallel, &chain("c", None), &opts(&dir, 8)).unwrap();

    for entry in walkdir::WalkDir::new(&out_serial) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(&out_serial).unwrap();
            assert_eq!(
                fs::read(entry.path()).unwrap(),
                fs::read(out_parallel.join(rel)).unwrap()
            );
        }
    }
}
