//! Stream decompression.
//!
//! HWP stores `DocInfo` and `BodyText/Section*` as raw deflate streams (no
//! zlib header) when the header's compressed bit is set. Output size is not
//! recorded anywhere, so the output buffer grows on demand up to a ceiling
//! derived from the input size.

use crate::common::{Error, Result};
use flate2::{Decompress, FlushDecompress, Status};
use log::debug;
use std::borrow::Cow;

/// Bounds on decompressed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressLimits {
    /// Maximum output as a multiple of the input size
    pub ratio: usize,
    /// Ceiling used when `ratio * input` is smaller
    pub floor: usize,
}

impl Default for DecompressLimits {
    fn default() -> Self {
        Self {
            ratio: 100,
            floor: 1 << 20,
        }
    }
}

impl DecompressLimits {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_ratio(mut self, ratio: usize) -> Self {
        self.ratio = ratio;
        self
    }

    #[inline]
    pub fn with_floor(mut self, floor: usize) -> Self {
        self.floor = floor;
        self
    }

    /// Largest output allowed for `input_len` compressed bytes.
    #[inline]
    pub fn ceiling(&self, input_len: usize) -> usize {
        input_len.saturating_mul(self.ratio).max(self.floor)
    }
}

/// Decompress one stream.
///
/// Uncompressed streams are returned as-is. `stream` names the stream in
/// errors.
pub fn decompress<'a>(
    stream: &str,
    raw: &'a [u8],
    is_compressed: bool,
    limits: &DecompressLimits,
) -> Result<Cow<'a, [u8]>> {
    if !is_compressed {
        return Ok(Cow::Borrowed(raw));
    }

    let ceiling = limits.ceiling(raw.len());
    match inflate(raw, false, ceiling) {
        Ok(out) => {
            debug!("{}: inflated {} -> {} bytes", stream, raw.len(), out.len());
            Ok(Cow::Owned(out))
        },
        Err(raw_err) if has_zlib_header(raw) && !matches!(raw_err, InflateError::Ceiling(_)) => {
            debug!("{}: raw inflate failed ({}), retrying as zlib", stream, raw_err);
            inflate(raw, true, ceiling)
                .map(Cow::Owned)
                .map_err(|e| decompression_error(stream, e))
        },
        Err(err) => Err(decompression_error(stream, err)),
    }
}

fn decompression_error(stream: &str, err: InflateError) -> Error {
    Error::Decompression {
        stream: stream.to_string(),
        reason: err.to_string(),
    }
}

#[derive(Debug)]
enum InflateError {
    Corrupt(String),
    Truncated,
    Ceiling(usize),
}

impl std::fmt::Display for InflateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InflateError::Corrupt(msg) => write!(f, "corrupt deflate data: {}", msg),
            InflateError::Truncated => write!(f, "unexpected end of deflate stream"),
            InflateError::Ceiling(limit) => {
                write!(f, "decompressed size exceeds limit of {} bytes", limit)
            },
        }
    }
}

/// CMF/FLG pair of a zlib stream using deflate.
fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => cmf & 0x0F == 8 && u16::from_be_bytes([*cmf, *flg]) % 31 == 0,
        _ => false,
    }
}

fn inflate(input: &[u8], zlib_header: bool, ceiling: usize) -> std::result::Result<Vec<u8>, InflateError> {
    let mut inflater = Decompress::new(zlib_header);
    let initial = input.len().saturating_mul(4).clamp(64, ceiling.max(64));
    let mut out: Vec<u8> = Vec::with_capacity(initial);

    loop {
        if out.len() == out.capacity() {
            let room = ceiling.saturating_add(1).saturating_sub(out.len());
            if room == 0 {
                return Err(InflateError::Ceiling(ceiling));
            }
            out.reserve_exact(out.capacity().max(4096).min(room));
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| InflateError::Corrupt(e.to_string()))?;

        if out.len() > ceiling {
            return Err(InflateError::Ceiling(ceiling));
        }

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let stalled = inflater.total_in() as usize == consumed
                    && inflater.total_out() == produced;
                if stalled && out.len() < out.capacity() {
                    return Err(InflateError::Truncated);
                }
            },
        }
    }
}
