//! Top-level conversion entry points.

use crate::common::{Error, FormatKind, Result};
use crate::hwp::{DecompressLimits, HwpPackage};
use crate::ole::HwpMetadata;
use crate::text::{TextOptions, ToPlainText};
use log::debug;

/// Default upper bound on input size (256 MiB).
pub const DEFAULT_MAX_INPUT_SIZE: usize = 256 << 20;

/// Options for [`convert_with_options`].
///
/// # Examples
///
/// ```rust
/// use hwptext::ConvertOptions;
/// use hwptext::text::{TableStyle, TextOptions};
///
/// let options = ConvertOptions::new()
///     .with_text(TextOptions::new().with_table_style(TableStyle::Boxed))
///     .with_strict_structure(true);
/// assert!(options.strict_structure);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Output layout
    pub text: TextOptions,
    /// Bounds on decompressed stream and part sizes
    pub limits: DecompressLimits,
    /// Fail on the first record nesting problem instead of repairing it
    pub strict_structure: bool,
    /// Inputs larger than this are refused
    pub max_input_size: usize,
    /// Use the HWPX preview text when the sections yield nothing
    pub use_preview_fallback: bool,
    /// Read HWP summary properties while converting (see [`convert_document`])
    pub include_metadata: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            text: TextOptions::default(),
            limits: DecompressLimits::default(),
            strict_structure: false,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            use_preview_fallback: true,
            include_metadata: false,
        }
    }
}

impl ConvertOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_text(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    #[inline]
    pub fn with_limits(mut self, limits: DecompressLimits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn with_strict_structure(mut self, strict: bool) -> Self {
        self.strict_structure = strict;
        self
    }

    #[inline]
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    #[inline]
    pub fn with_preview_fallback(mut self, enabled: bool) -> Self {
        self.use_preview_fallback = enabled;
        self
    }

    #[inline]
    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.include_metadata = enabled;
        self
    }
}

/// Text of a document plus what else was read from it on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub text: String,
    /// Summary properties; only HWP documents carry them, and only when
    /// [`ConvertOptions::include_metadata`] is set
    pub metadata: Option<HwpMetadata>,
}

/// Convert a document to plain text with default options.
///
/// The format is never guessed; see [`FormatKind::from_path`] and
/// [`detect_format`](crate::detect_format).
///
/// # Examples
///
/// ```rust,no_run
/// use hwptext::{FormatKind, convert};
///
/// let bytes = std::fs::read("report.hwp")?;
/// let text = convert(&bytes, FormatKind::Hwp)?;
/// println!("{}", text);
/// # Ok::<(), hwptext::ConversionError>(())
/// ```
pub fn convert(input: &[u8], format: FormatKind) -> Result<String> {
    convert_with_options(input, format, &ConvertOptions::default())
}

/// Convert a document to plain text.
pub fn convert_with_options(
    input: &[u8],
    format: FormatKind,
    options: &ConvertOptions,
) -> Result<String> {
    convert_inner(input, format, options, false).map(|c| c.text)
}

/// Convert a document, reading its summary properties from the same parse
/// when [`ConvertOptions::include_metadata`] is set.
///
/// # Examples
///
/// ```rust,no_run
/// use hwptext::{ConvertOptions, FormatKind, convert_document};
///
/// let bytes = std::fs::read("report.hwp")?;
/// let options = ConvertOptions::new().with_metadata(true);
/// let doc = convert_document(&bytes, FormatKind::Hwp, &options)?;
/// if let Some(title) = doc.metadata.and_then(|m| m.title) {
///     println!("{}", title);
/// }
/// # Ok::<(), hwptext::ConversionError>(())
/// ```
pub fn convert_document(
    input: &[u8],
    format: FormatKind,
    options: &ConvertOptions,
) -> Result<Conversion> {
    convert_inner(input, format, options, options.include_metadata)
}

fn convert_inner(
    input: &[u8],
    format: FormatKind,
    options: &ConvertOptions,
    with_metadata: bool,
) -> Result<Conversion> {
    if input.len() > options.max_input_size {
        return Err(Error::InvalidFormat(format!(
            "input of {} bytes exceeds limit of {} bytes",
            input.len(),
            options.max_input_size
        )));
    }
    debug!("converting {} bytes as {}", input.len(), format);

    match format {
        FormatKind::Hwp => {
            let pkg = HwpPackage::parse(input, options.limits)?;
            let doc = pkg.document(options.strict_structure)?;
            let metadata = if with_metadata {
                pkg.metadata().filter(|meta| !meta.is_empty())
            } else {
                None
            };
            Ok(Conversion {
                text: doc.to_plain_text_with_options(&options.text),
                metadata,
            })
        },
        FormatKind::Hwpx => Ok(Conversion {
            text: convert_hwpx(input, options)?,
            metadata: None,
        }),
    }
}

#[cfg(feature = "hwpx")]
fn convert_hwpx(input: &[u8], options: &ConvertOptions) -> Result<String> {
    use crate::hwpx::HwpxPackage;
    use log::warn;

    let pkg = HwpxPackage::parse(input, options.limits)?;
    let text = match pkg.document() {
        Ok(doc) => doc.to_plain_text_with_options(&options.text),
        Err(Error::StreamNotFound(part)) if options.use_preview_fallback => {
            warn!("{} not found, using preview text", part);
            return pkg.preview_text().ok_or(Error::StreamNotFound(part));
        },
        Err(err) => return Err(err),
    };

    if options.use_preview_fallback
        && text.trim().is_empty()
        && let Some(preview) = pkg.preview_text()
        && !preview.trim().is_empty()
    {
        warn!("sections hold no text, using preview text");
        return Ok(preview);
    }
    Ok(text)
}

#[cfg(not(feature = "hwpx"))]
fn convert_hwpx(_input: &[u8], _options: &ConvertOptions) -> Result<String> {
    Err(Error::Unsupported(
        "HWPX support is disabled (enable the `hwpx` feature)".to_string(),
    ))
}
