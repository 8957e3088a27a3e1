/// Constants for the compound file format
pub mod consts;

/// Sector allocation tables shared by the FAT and the mini FAT
mod chain;

/// Main compound file parsing implementation
mod file;

/// Summary property stream parsing
mod metadata;

#[cfg(test)]
pub(crate) mod fixture;

// Re-export public types for convenient access
pub use file::{CompoundFile, DirectoryEntry, EntryKind, OleError, is_ole_file};
pub use metadata::{
    HWP_SUMMARY_STREAM, HwpMetadata, PropertyValue, filetime_to_datetime,
    parse_summary_information,
};

#[cfg(test)]
pub(crate) use metadata::tests as property_fixture;
