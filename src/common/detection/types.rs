//! Format kind enumeration.

use std::path::Path;
use std::str::FromStr;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// HWP 5.x binary document (compound file, .hwp)
    Hwp,
    /// HWPX document (zip of XML parts, .hwpx)
    Hwpx,
}

impl FormatKind {
    /// Pick a format from a file extension, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use hwptext::FormatKind;
    /// assert_eq!(FormatKind::from_path("보고서.HWP"), Some(FormatKind::Hwp));
    /// assert_eq!(FormatKind::from_path("a/b.hwpx"), Some(FormatKind::Hwpx));
    /// assert_eq!(FormatKind::from_path("notes.txt"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }

    /// Usual file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::Hwp => "hwp",
            FormatKind::Hwpx => "hwpx",
        }
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hwp" => Ok(FormatKind::Hwp),
            "hwpx" => Ok(FormatKind::Hwpx),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
