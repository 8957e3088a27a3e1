//! The `FileHeader` stream: signature, version and document properties.

use crate::common::binary::read_u32_le;
use crate::common::{Error, Result};
use bitflags::bitflags;

/// Stream name of the file header
pub const FILE_HEADER_STREAM: &str = "FileHeader";

/// Signature at the start of the header, NUL padded to 32 bytes
pub const SIGNATURE: &[u8] = b"HWP Document File";

const SIGNATURE_LEN: usize = 32;

bitflags! {
    /// Document property bits (offset 36 of the header)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeaderFlags: u32 {
        /// Body and DocInfo streams are deflate-compressed
        const COMPRESSED = 1 << 0;
        /// Password protected
        const PASSWORD = 1 << 1;
        /// Distribution document; body lives in encrypted ViewText streams
        const DISTRIBUTION = 1 << 2;
        /// Script stream present
        const SCRIPT = 1 << 3;
        /// DRM protected
        const DRM = 1 << 4;
        /// XML template storage present
        const XML_TEMPLATE = 1 << 5;
        /// Document history present
        const HISTORY = 1 << 6;
        /// Electronic signature present
        const SIGNATURE = 1 << 7;
        /// Encrypted with a public-key certificate
        const CERT_ENCRYPTED = 1 << 8;
        /// Signature kept for later use
        const SIGNATURE_RESERVE = 1 << 9;
        /// Certificate DRM
        const CERT_DRM = 1 << 10;
        /// CCL licensed
        const CCL = 1 << 11;

        /// Properties this crate cannot decode
        const PROTECTED = Self::PASSWORD.bits()
            | Self::DISTRIBUTION.bits()
            | Self::DRM.bits()
            | Self::CERT_ENCRYPTED.bits()
            | Self::CERT_DRM.bits();
    }
}

/// File format version, `major.minor.build.revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HwpVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub revision: u8,
}

impl From<u32> for HwpVersion {
    fn from(raw: u32) -> Self {
        let [major, minor, build, revision] = raw.to_be_bytes();
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl std::fmt::Display for HwpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Parsed `FileHeader` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: HwpVersion,
    pub flags: HeaderFlags,
}

impl FileHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let signature = data.get(..SIGNATURE_LEN).ok_or_else(|| {
            Error::InvalidFormat(format!("FileHeader too short: {} bytes", data.len()))
        })?;
        let text_end = signature
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SIGNATURE_LEN);
        if &signature[..text_end] != SIGNATURE {
            return Err(Error::InvalidFormat(
                "missing HWP document signature".to_string(),
            ));
        }

        let version = HwpVersion::from(read_u32_le(data, 32)?);
        if version.major != 5 {
            return Err(Error::Unsupported(format!(
                "HWP version {} (only 5.x is supported)",
                version
            )));
        }
        let flags = HeaderFlags::from_bits_retain(read_u32_le(data, 36).unwrap_or(0));

        Ok(Self { version, flags })
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.flags.contains(HeaderFlags::COMPRESSED)
    }

    /// Fail for password, DRM, certificate and distribution documents.
    pub fn ensure_readable(&self) -> Result<()> {
        let blocked = self.flags & HeaderFlags::PROTECTED;
        if blocked.is_empty() {
            return Ok(());
        }
        let reason = if blocked.contains(HeaderFlags::PASSWORD) {
            "document is password protected"
        } else if blocked.intersects(HeaderFlags::DRM | HeaderFlags::CERT_DRM) {
            "document is DRM protected"
        } else if blocked.contains(HeaderFlags::CERT_ENCRYPTED) {
            "document is certificate encrypted"
        } else {
            "distribution documents are not supported"
        };
        Err(Error::Unsupported(reason.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn file_header_bytes(version: u32, flags: HeaderFlags) -> Vec<u8> {
    let mut data = vec![0u8; 256];
    data[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
    data[32..36].copy_from_slice(&version.to_le_bytes());
    data[36..40].copy_from_slice(&flags.bits().to_le_bytes());
    data
}
