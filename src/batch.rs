//! Converting many files at once.
//!
//! Each document is independent, so files are read and converted on the
//! rayon pool. Results come back in input order.

use crate::common::{Error, FormatKind, Result, detect_format_from_path};
use crate::convert::{Conversion, ConvertOptions, convert_document};
use crate::ole::HwpMetadata;
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome for one input file.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    /// Format the file was converted as, when one could be chosen
    pub format: Option<FormatKind>,
    pub result: Result<String>,
    /// Summary properties, when requested and present
    pub metadata: Option<HwpMetadata>,
}

/// Choose the format of `path`: the override, then the extension, then the
/// leading signature.
pub fn resolve_format(path: &Path, format: Option<FormatKind>) -> Option<FormatKind> {
    format
        .or_else(|| FormatKind::from_path(path))
        .or_else(|| detect_format_from_path(path))
}

/// Read and convert one file.
///
/// The file is read once; with [`ConvertOptions::include_metadata`] its
/// summary properties come from the same parse.
pub fn convert_path(
    path: &Path,
    format: Option<FormatKind>,
    options: &ConvertOptions,
) -> BatchItem {
    let format = resolve_format(path, format);
    let converted = match format {
        Some(kind) => std::fs::read(path)
            .map_err(Error::from)
            .and_then(|bytes| convert_document(&bytes, kind, options)),
        None => Err(Error::InvalidFormat(
            "cannot tell HWP from HWPX; pass a format explicitly".to_string(),
        )),
    };
    let (result, metadata) = match converted {
        Ok(Conversion { text, metadata }) => (Ok(text), metadata),
        Err(err) => (Err(err), None),
    };
    BatchItem {
        path: path.to_path_buf(),
        format,
        result,
        metadata,
    }
}

/// Convert every path in parallel.
pub fn convert_paths<P: AsRef<Path> + Sync>(
    paths: &[P],
    format: Option<FormatKind>,
    options: &ConvertOptions,
) -> Vec<BatchItem> {
    debug!("converting {} files", paths.len());
    paths
        .par_iter()
        .map(|path| convert_path(path.as_ref(), format, options))
        .collect()
}
