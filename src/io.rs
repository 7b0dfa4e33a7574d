//! Byte I/O layer shared by the codec library and the pipeline.
//!
//! This module assembles the I/O sub-modules and re-exports the symbols
//! consumed by the codecs and the driver.

pub mod file_io;

pub use file_io::{create_dst_file, open_src_file, read_to_capacity};
