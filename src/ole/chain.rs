//! Sector allocation tables.
//!
//! A compound file carries two allocation tables with the same shape: the
//! FAT, whose sectors live in the file itself, and the mini FAT, whose
//! 64-byte sectors live inside the mini stream. [`AllocationTable`] models
//! both; it only knows its sector size and where sector 0 starts in the
//! backing bytes it is handed.

use super::consts::{ENDOFCHAIN, MAXREGSECT};
use super::file::OleError;
use fixedbitset::FixedBitSet;
use std::ops::Range;

/// One allocation table over a run of equally sized sectors.
#[derive(Debug, Clone, Default)]
pub(crate) struct AllocationTable {
    /// Next-sector links, indexed by sector id
    entries: Vec<u32>,
    /// Size of one sector in bytes
    sector_size: usize,
    /// Byte offset of sector 0 inside the backing data
    base: usize,
    /// Name used in error messages
    label: &'static str,
}

impl AllocationTable {
    pub(crate) fn new(entries: Vec<u32>, sector_size: usize, base: usize, label: &'static str) -> Self {
        Self {
            entries,
            sector_size,
            base,
            label,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn sector_size(&self) -> usize {
        self.sector_size
    }

    /// Sector ids of the chain starting at `start`.
    ///
    /// Fails on a sector id outside the table and on a chain that revisits
    /// a sector.
    pub(crate) fn chain(&self, start: u32) -> Result<Vec<u32>, OleError> {
        let mut visited = FixedBitSet::with_capacity(self.entries.len());
        let mut sectors = Vec::new();
        let mut current = start;

        while current != ENDOFCHAIN {
            let idx = current as usize;
            if current > MAXREGSECT || idx >= self.entries.len() {
                return Err(OleError::CorruptedFile {
                    reason: format!("{} sector {:#x} out of range", self.label, current),
                    offset: None,
                });
            }
            if visited.put(idx) {
                return Err(OleError::CorruptedFile {
                    reason: format!("cyclic sector chain in {} at sector {}", self.label, idx),
                    offset: Some(self.sector_offset(current) as u64),
                });
            }
            sectors.push(current);
            current = self.entries[idx];
        }

        Ok(sectors)
    }

    #[inline]
    fn sector_offset(&self, sector: u32) -> usize {
        self.base + sector as usize * self.sector_size
    }

    /// Byte ranges of `backing` covered by a chain, clipped to `size`.
    ///
    /// With `size == None` the whole chain is returned. The last sector of
    /// the backing data may be short; any other gap is an error.
    pub(crate) fn extents(
        &self,
        backing_len: usize,
        start: u32,
        size: Option<u64>,
    ) -> Result<Vec<Range<usize>>, OleError> {
        if size == Some(0) {
            return Ok(Vec::new());
        }

        let chain = self.chain(start)?;
        let mut remaining = size.map(|s| s as usize).unwrap_or(usize::MAX);
        let mut extents = Vec::with_capacity(chain.len());

        for sector in chain {
            if remaining == 0 {
                break;
            }
            let offset = self.sector_offset(sector);
            if offset >= backing_len {
                return Err(OleError::CorruptedFile {
                    reason: format!("{} sector {} beyond end of data", self.label, sector),
                    offset: Some(offset as u64),
                });
            }
            let available = (backing_len - offset).min(self.sector_size);
            let take = available.min(remaining);
            if take < self.sector_size && take < remaining && size.is_some() {
                return Err(OleError::CorruptedFile {
                    reason: format!("stream truncated in {} sector {}", self.label, sector),
                    offset: Some(offset as u64),
                });
            }
            extents.push(offset..offset + take);
            remaining -= take;
        }

        if size.is_some() && remaining > 0 {
            return Err(OleError::CorruptedFile {
                reason: format!(
                    "stream truncated: {} chain is {} bytes short",
                    self.label, remaining
                ),
                offset: None,
            });
        }

        Ok(extents)
    }

    /// Copy the bytes of a chain out of `backing`.
    pub(crate) fn read(&self, backing: &[u8], start: u32, size: Option<u64>) -> Result<Vec<u8>, OleError> {
        let extents = self.extents(backing.len(), start, size)?;
        let mut data = Vec::with_capacity(extents.iter().map(|r| r.len()).sum());
        for range in extents {
            data.extend_from_slice(&backing[range]);
        }
        Ok(data)
    }
}
