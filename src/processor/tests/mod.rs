//! Integration tests for the processor module
//!
//! Tests batch scanning using temporary bulletin directories.


use std::fs;
use std::path::Path;

pub const NAM_KBUF: &str = include_str!("../../../tests/data/nam_kbuf.buf");

/// Write a bulletin into `dir/<name>`
pub fn write_bulletin(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}
