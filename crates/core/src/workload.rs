//! Workload resolution and binding.
//!
//! This module turns a workload path into a binding attachable to every core's
//! execution context. It performs:
//! 1. **Resolution:** Reads the program binary from disk, failing early on bad paths.
//! 2. **ELF inspection:** Extracts the entry point and `.text` section when the file
//!    parses as an ELF image.
//! 3. **Raw fallback:** Treats non-ELF files as a flat instruction image at offset 0.

use std::fs;
use std::path::{Path, PathBuf};

use object::{Object, ObjectSection};
use tracing::debug;

use crate::error::WorkloadError;

/// A resolved workload: the program every core's execution context runs.
///
/// The binding is immutable once resolved; the builder attaches it to each
/// core and the engine derives the instruction stream from `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadBinding {
    /// Short name for report records (file stem of the path).
    pub name: String,
    /// Path the binding was resolved from.
    pub path: PathBuf,
    /// Program entry point; 0 for raw images.
    pub entry: u64,
    /// Executable bytes (`.text` section for ELF, whole file otherwise).
    pub text: Vec<u8>,
}

impl WorkloadBinding {
    /// Resolves a workload path into a binding.
    ///
    /// ELF images contribute their entry point and `.text` section; any other
    /// readable file is taken as a raw instruction image. The distinction is
    /// informational only at this layer; both forms produce a byte stream the
    /// engine classifies.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadError::NotFound`] when the file cannot be read and
    /// [`WorkloadError::EmptyText`] when it carries no executable bytes.
    pub fn resolve(path: &Path) -> Result<Self, WorkloadError> {
        let data = fs::read(path).map_err(|source| WorkloadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match object::File::parse(&*data) {
            Ok(image) => {
                let text = image
                    .section_by_name(".text")
                    .and_then(|section| section.data().ok().map(<[u8]>::to_vec));
                Some((image.entry(), text))
            }
            Err(_) => None,
        };
        let (entry, text) = match parsed {
            Some((entry, Some(text))) => {
                debug!(path = %path.display(), entry, bytes = text.len(), "resolved ELF workload");
                (entry, text)
            }
            // ELF without a .text section: fall back to the whole image.
            Some((entry, None)) => (entry, data),
            None => {
                debug!(path = %path.display(), bytes = data.len(), "resolved raw workload");
                (0, data)
            }
        };

        if text.is_empty() {
            return Err(WorkloadError::EmptyText(path.to_path_buf()));
        }

        let name = path
            .file_stem()
            .map_or_else(|| String::from("workload"), |stem| stem.to_string_lossy().into_owned());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            entry,
            text,
        })
    }

    /// Number of whole 32-bit instruction words in the executable text.
    pub fn instruction_words(&self) -> u64 {
        (self.text.len() / 4) as u64
    }
}
