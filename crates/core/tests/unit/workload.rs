//! Tests for workload resolution.

use std::path::Path;

use pretty_assertions::assert_eq;

use crate::common::harness::{ALU_WORD, TempWorkload};
use uarchlab_core::error::WorkloadError;
use uarchlab_core::workload::WorkloadBinding;

#[test]
fn test_raw_image_resolves_with_zero_entry() {
    let workload = TempWorkload::from_words(&[ALU_WORD; 8]);
    let binding = WorkloadBinding::resolve(workload.path()).unwrap();
    assert_eq!(binding.entry, 0);
    assert_eq!(binding.text.len(), 32);
    assert_eq!(binding.instruction_words(), 8);
    assert_eq!(binding.path, workload.path());
}

#[test]
fn test_missing_path_is_not_found() {
    let error = WorkloadBinding::resolve(Path::new("/nonexistent/workload.bin")).unwrap_err();
    assert!(matches!(error, WorkloadError::NotFound { .. }));
}

#[test]
fn test_empty_file_has_no_text() {
    let workload = TempWorkload::from_words(&[]);
    let error = WorkloadBinding::resolve(workload.path()).unwrap_err();
    assert!(matches!(error, WorkloadError::EmptyText(_)));
}

#[test]
fn test_trailing_bytes_do_not_count_as_words() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&ALU_WORD.to_le_bytes());
    bytes.extend_from_slice(&[0xff, 0xff]);
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), &bytes).unwrap();
    let binding = WorkloadBinding::resolve(file.path()).unwrap();
    assert_eq!(binding.instruction_words(), 1);
}
