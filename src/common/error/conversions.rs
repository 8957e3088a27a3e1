//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;
use crate::ole::OleError;

impl From<OleError> for Error {
    fn from(err: OleError) -> Self {
        match err {
            OleError::NotOleFile => Error::ContainerFormat {
                reason: "missing compound file signature".to_string(),
                offset: Some(0),
            },
            OleError::InvalidFormat(reason) => Error::ContainerFormat {
                reason,
                offset: None,
            },
            OleError::CorruptedFile { reason, offset } => Error::ContainerFormat { reason, offset },
            OleError::StreamNotFound(name) => Error::StreamNotFound(name),
        }
    }
}

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}

#[cfg(feature = "hwpx")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(feature = "hwpx")]
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(feature = "hwpx")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}
