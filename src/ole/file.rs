use super::chain::AllocationTable;
use super::consts::*;
use crate::common::binary::parse_utf16le_string;
use fixedbitset::FixedBitSet;
use log::{debug, warn};
use std::collections::HashSet;
use zerocopy::{FromBytes, LE, U16, U32, U64};
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Raw compound file header (512 bytes)
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawHeader {
    magic: [u8; 8],
    clsid: [u8; 16],
    minor_version: U16<LE>,
    dll_version: U16<LE>,
    byte_order: U16<LE>,
    sector_shift: U16<LE>,
    mini_sector_shift: U16<LE>,
    reserved: [u8; 6],
    /// Number of directory sectors (0 for 512-byte sector files)
    num_dir_sectors: U32<LE>,
    num_fat_sectors: U32<LE>,
    first_dir_sector: U32<LE>,
    transaction_signature: U32<LE>,
    mini_stream_cutoff: U32<LE>,
    first_minifat_sector: U32<LE>,
    num_minifat_sectors: U32<LE>,
    first_difat_sector: U32<LE>,
    num_difat_sectors: U32<LE>,
    /// First 109 FAT sector ids
    difat: [U32<LE>; HEADER_DIFAT_ENTRIES],
}

/// Raw OLE directory entry structure (128 bytes)
///
/// This represents the on-disk format of a directory entry.
/// Based on Microsoft OLE2 specification.
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawDirectoryEntry {
    /// Entry name in UTF-16LE (64 bytes, null-padded)
    name: [u8; 64],
    /// Length of name in bytes (including null terminator)
    name_len: U16<LE>,
    /// Entry type (1 = storage, 2 = stream, 5 = root)
    entry_type: u8,
    /// Node color (0 = red, 1 = black)
    node_color: u8,
    /// Left sibling SID
    sid_left: U32<LE>,
    /// Right sibling SID
    sid_right: U32<LE>,
    /// Child SID
    sid_child: U32<LE>,
    /// CLSID (16 bytes)
    clsid: [u8; 16],
    /// State bits
    state_bits: U32<LE>,
    /// Creation time (FILETIME)
    creation_time: U64<LE>,
    /// Modified time (FILETIME)
    modified_time: U64<LE>,
    /// Starting sector
    start_sector: U32<LE>,
    /// Stream size
    stream_size: U64<LE>,
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Root,
    Storage,
    Stream,
}

/// A reachable directory entry (stream or storage).
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Storage ID (index in directory)
    pub sid: u32,
    /// Entry name (UTF-16 decoded to UTF-8)
    pub name: String,
    /// Full `/`-separated path from the root, e.g. `BodyText/Section0`
    pub path: String,
    pub kind: EntryKind,
    /// First sector of the stream
    pub start_sector: u32,
    /// Size of the stream in bytes
    pub size: u64,
}

/// Error types for compound file parsing
#[derive(Debug)]
pub enum OleError {
    /// The fixed signature is absent
    NotOleFile,
    /// Header fields hold values outside what the format allows
    InvalidFormat(String),
    /// Structure points outside the file, loops, or is inconsistent
    CorruptedFile { reason: String, offset: Option<u64> },
    /// No stream with that path
    StreamNotFound(String),
}

impl From<crate::common::binary::BinaryError> for OleError {
    fn from(err: crate::common::binary::BinaryError) -> Self {
        OleError::InvalidFormat(err.to_string())
    }
}

impl std::fmt::Display for OleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OleError::NotOleFile => write!(f, "Not an OLE file"),
            OleError::InvalidFormat(s) => write!(f, "Invalid format: {}", s),
            OleError::CorruptedFile {
                reason,
                offset: Some(offset),
            } => write!(f, "Corrupted file: {} (offset {:#x})", reason, offset),
            OleError::CorruptedFile { reason, .. } => write!(f, "Corrupted file: {}", reason),
            OleError::StreamNotFound(s) => write!(f, "Stream not found: {}", s),
        }
    }
}

impl std::error::Error for OleError {}

/// Read-only view of a compound file held in memory.
///
/// Parsing validates the whole structure up front: the header, both
/// allocation tables, the directory tree and the chain of every reachable
/// stream. After that, [`open_stream`](Self::open_stream) only copies bytes.
#[derive(Debug)]
pub struct CompoundFile<'data> {
    data: &'data [u8],
    mini_stream_cutoff: u32,
    fat: AllocationTable,
    minifat: AllocationTable,
    /// Contents of the root entry's stream, home of all mini sectors
    ministream: Vec<u8>,
    /// Reachable entries, root first
    entries: Vec<DirectoryEntry>,
}

impl<'data> CompoundFile<'data> {
    /// Parse a compound file from its raw bytes.
    pub fn parse(data: &'data [u8]) -> Result<Self, OleError> {
        if !is_ole_file(data) {
            return Err(OleError::NotOleFile);
        }
        if data.len() < MINIMAL_OLEFILE_SIZE {
            return Err(OleError::InvalidFormat(format!(
                "file too small: {} bytes",
                data.len()
            )));
        }

        let header = RawHeader::read_from_bytes(&data[..HEADER_SIZE])
            .map_err(|_| OleError::InvalidFormat("Failed to parse header".to_string()))?;

        if header.byte_order.get() != 0xFFFE {
            return Err(OleError::InvalidFormat("Invalid byte order".to_string()));
        }

        let sector_shift = header.sector_shift.get();
        if sector_shift != 9 && sector_shift != 12 {
            return Err(OleError::InvalidFormat(format!(
                "unsupported sector shift {}",
                sector_shift
            )));
        }
        let mini_sector_shift = header.mini_sector_shift.get();
        if mini_sector_shift == 0 || mini_sector_shift >= sector_shift {
            return Err(OleError::InvalidFormat(format!(
                "unsupported mini sector shift {}",
                mini_sector_shift
            )));
        }

        let sector_size = 1usize << sector_shift;
        let mini_sector_size = 1usize << mini_sector_shift;
        debug!(
            "compound file: version {}, sector size {}, {} FAT sectors, {} bytes",
            header.dll_version.get(),
            sector_size,
            header.num_fat_sectors.get(),
            data.len()
        );

        let fat = load_fat(data, &header, sector_size)?;

        let dir_data = fat.read(data, header.first_dir_sector.get(), None)?;
        let raw_entries = parse_raw_entries(&dir_data, sector_size)?;
        let root = raw_entries.first().ok_or_else(|| OleError::CorruptedFile {
            reason: "empty directory".to_string(),
            offset: None,
        })?;
        if root.kind != EntryKind::Root {
            return Err(OleError::CorruptedFile {
                reason: "first directory entry is not the root".to_string(),
                offset: None,
            });
        }

        let minifat_entries = if header.num_minifat_sectors.get() > 0 {
            let bytes = fat.read(data, header.first_minifat_sector.get(), None)?;
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        } else {
            Vec::new()
        };
        let minifat = AllocationTable::new(minifat_entries, mini_sector_size, 0, "mini FAT");

        let ministream = if root.size > 0 && minifat.len() > 0 {
            fat.read(data, root.start_sector, Some(root.size))?
        } else {
            Vec::new()
        };

        let mut file = CompoundFile {
            data,
            mini_stream_cutoff: header.mini_stream_cutoff.get(),
            fat,
            minifat,
            ministream,
            entries: Vec::new(),
        };
        file.entries = build_tree(&raw_entries)?;
        for entry in &file.entries {
            if entry.kind == EntryKind::Stream {
                file.stream_extent_check(entry)?;
            }
        }

        Ok(file)
    }

    fn uses_minifat(&self, entry: &DirectoryEntry) -> bool {
        entry.size < self.mini_stream_cutoff as u64
    }

    fn stream_extent_check(&self, entry: &DirectoryEntry) -> Result<(), OleError> {
        let result = if self.uses_minifat(entry) {
            self.minifat
                .extents(self.ministream.len(), entry.start_sector, Some(entry.size))
        } else {
            self.fat
                .extents(self.data.len(), entry.start_sector, Some(entry.size))
        };
        result.map(|_| ()).map_err(|err| match err {
            OleError::CorruptedFile { reason, offset } => OleError::CorruptedFile {
                reason: format!("{}: {}", entry.path, reason),
                offset,
            },
            other => other,
        })
    }

    /// All reachable directory entries, root first.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Sector size of the container (512 or 4096).
    pub fn sector_size(&self) -> usize {
        self.fat.sector_size()
    }

    /// Full paths of all streams, sorted.
    pub fn list_streams(&self) -> Vec<String> {
        let mut streams: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Stream)
            .map(|e| e.path.clone())
            .collect();
        streams.sort();
        streams
    }

    /// Look up an entry by path. Exact matches win over case-insensitive ones.
    pub fn find_entry(&self, path: &str) -> Option<&DirectoryEntry> {
        let path = path.trim_matches('/');
        self.entries
            .iter()
            .find(|e| e.path == path)
            .or_else(|| self.entries.iter().find(|e| e.path.eq_ignore_ascii_case(path)))
    }

    /// Whether a stream or storage exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.find_entry(path).is_some()
    }

    /// Read a whole stream.
    pub fn open_stream(&self, path: &str) -> Result<Vec<u8>, OleError> {
        let entry = self
            .find_entry(path)
            .filter(|e| e.kind == EntryKind::Stream)
            .ok_or_else(|| OleError::StreamNotFound(path.to_string()))?;

        if self.uses_minifat(entry) {
            self.minifat
                .read(&self.ministream, entry.start_sector, Some(entry.size))
        } else {
            self.fat.read(self.data, entry.start_sector, Some(entry.size))
        }
    }
}

/// Collect FAT sector ids from the header and the DIFAT chain, then read
/// the FAT itself.
fn load_fat(data: &[u8], header: &RawHeader, sector_size: usize) -> Result<AllocationTable, OleError> {
    let declared = header.num_fat_sectors.get() as usize;
    let mut fat_sectors: Vec<u32> = header
        .difat
        .iter()
        .map(|v| v.get())
        .take_while(|&s| s != FREESECT && s != ENDOFCHAIN)
        .take(declared)
        .collect();

    let file_sectors = data.len().div_ceil(sector_size);
    let entries_per_sector = sector_size / 4 - 1;
    let mut visited = FixedBitSet::with_capacity(file_sectors);
    let mut difat_sector = header.first_difat_sector.get();

    for _ in 0..header.num_difat_sectors.get() {
        if difat_sector == ENDOFCHAIN || difat_sector == FREESECT {
            break;
        }
        let sector = raw_sector(data, difat_sector, sector_size)?;
        if visited.put(difat_sector as usize) {
            return Err(OleError::CorruptedFile {
                reason: "cyclic DIFAT chain".to_string(),
                offset: Some(sector_offset(difat_sector, sector_size) as u64),
            });
        }
        for chunk in sector.chunks_exact(4).take(entries_per_sector) {
            let id = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if id == FREESECT || id == ENDOFCHAIN || fat_sectors.len() >= declared {
                break;
            }
            fat_sectors.push(id);
        }
        let next = entries_per_sector * 4;
        difat_sector = u32::from_le_bytes([
            sector[next],
            sector[next + 1],
            sector[next + 2],
            sector[next + 3],
        ]);
    }

    if fat_sectors.len() < declared {
        warn!(
            "header declares {} FAT sectors, found {}",
            declared,
            fat_sectors.len()
        );
    }

    let mut entries = Vec::with_capacity(fat_sectors.len() * sector_size / 4);
    for id in fat_sectors {
        let sector = raw_sector(data, id, sector_size)?;
        entries.extend(
            sector
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
    }

    Ok(AllocationTable::new(entries, sector_size, sector_size, "FAT"))
}

#[inline]
fn sector_offset(sector: u32, sector_size: usize) -> usize {
    (sector as usize + 1) * sector_size
}

/// A full sector read straight from the file, bypassing any table.
fn raw_sector(data: &[u8], sector: u32, sector_size: usize) -> Result<&[u8], OleError> {
    let offset = sector_offset(sector, sector_size);
    if sector > MAXREGSECT {
        return Err(OleError::CorruptedFile {
            reason: format!("invalid sector id {:#x}", sector),
            offset: None,
        });
    }
    data.get(offset..offset + sector_size)
        .ok_or_else(|| OleError::CorruptedFile {
            reason: format!("sector {} beyond end of file", sector),
            offset: Some(offset as u64),
        })
}

/// Directory entry as stored, before the tree walk.
#[derive(Debug, Clone)]
struct FlatEntry {
    name: String,
    kind: EntryKind,
    /// False for unused slots and unknown object types
    valid: bool,
    left: u32,
    right: u32,
    child: u32,
    start_sector: u32,
    size: u64,
}

fn parse_raw_entries(dir_data: &[u8], sector_size: usize) -> Result<Vec<FlatEntry>, OleError> {
    dir_data
        .chunks_exact(DIRENTRY_SIZE)
        .map(|chunk| {
            let raw = RawDirectoryEntry::read_from_bytes(chunk).map_err(|_| {
                OleError::InvalidFormat("Failed to parse directory entry".to_string())
            })?;

            let name_len = (raw.name_len.get() as usize).min(64);
            let name = parse_utf16le_string(&raw.name[..name_len.saturating_sub(2)]);

            // 512-byte sector files only use the low 32 bits of the size
            let size = if sector_size == SECTOR_SIZE_V3 {
                raw.stream_size.get() & 0xFFFF_FFFF
            } else {
                raw.stream_size.get()
            };

            let (kind, valid) = match raw.entry_type {
                STGTY_ROOT => (EntryKind::Root, true),
                STGTY_STORAGE => (EntryKind::Storage, true),
                STGTY_STREAM => (EntryKind::Stream, true),
                _ => (EntryKind::Stream, false),
            };

            Ok(FlatEntry {
                name,
                kind,
                valid,
                left: raw.sid_left.get(),
                right: raw.sid_right.get(),
                child: raw.sid_child.get(),
                start_sector: raw.start_sector.get(),
                size,
            })
        })
        .collect()
}

/// Walk the red-black sibling trees from the root and flatten every
/// reachable entry, computing full paths.
fn build_tree(flat: &[FlatEntry]) -> Result<Vec<DirectoryEntry>, OleError> {
    let root = &flat[0];
    let mut out = vec![DirectoryEntry {
        sid: 0,
        name: root.name.clone(),
        path: String::new(),
        kind: EntryKind::Root,
        start_sector: root.start_sector,
        size: root.size,
    }];

    let mut visited = FixedBitSet::with_capacity(flat.len());
    visited.insert(0);
    let mut names: HashSet<(u32, String)> = HashSet::new();

    // (sid, parent sid, parent path)
    let mut stack: Vec<(u32, u32, String)> = Vec::new();
    if root.child != NOSTREAM {
        stack.push((root.child, 0, String::new()));
    }

    while let Some((sid, parent, parent_path)) = stack.pop() {
        let idx = sid as usize;
        if sid > MAXREGSID || idx >= flat.len() {
            return Err(OleError::CorruptedFile {
                reason: format!("directory entry {} out of range", sid),
                offset: None,
            });
        }
        if visited.put(idx) {
            return Err(OleError::CorruptedFile {
                reason: format!("directory entry {} reached twice", sid),
                offset: None,
            });
        }

        let entry = &flat[idx];
        for sibling in [entry.left, entry.right] {
            if sibling != NOSTREAM {
                stack.push((sibling, parent, parent_path.clone()));
            }
        }
        if !entry.valid || entry.kind == EntryKind::Root {
            debug!("skipping directory entry {} of unusable type", sid);
            continue;
        }

        if !names.insert((parent, entry.name.to_lowercase())) {
            return Err(OleError::CorruptedFile {
                reason: format!("duplicate entry name {:?}", entry.name),
                offset: None,
            });
        }

        let path = if parent_path.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", parent_path, entry.name)
        };
        if entry.kind == EntryKind::Storage && entry.child != NOSTREAM {
            stack.push((entry.child, sid, path.clone()));
        }
        out.push(DirectoryEntry {
            sid,
            name: entry.name.clone(),
            path,
            kind: entry.kind,
            start_sector: entry.start_sector,
            size: entry.size,
        });
    }

    Ok(out)
}

/// Check if data starts with the compound file signature.
#[inline]
pub fn is_ole_file(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && &data[..MAGIC.len()] == MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ole::fixture::CompoundBuilder;

    #[test]
    fn test_rejects_missing_signature() {
        let data = vec![0u8; 2048];
        assert!(matches!(CompoundFile::parse(&data), Err(OleError::NotOleFile)));
        assert!(!is_ole_file(b"PK\x03\x04"));
    }

    #[test]
    fn test_small_and_large_streams() {
        let big: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let data = CompoundBuilder::new()
            .stream("FileHeader", b"header bytes")
            .stream("BodyText/Section0", &big)
            .stream("BodyText/Section1", b"tiny")
            .build();

        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(
            file.list_streams(),
            vec!["BodyText/Section0", "BodyText/Section1", "FileHeader"]
        );
        assert_eq!(file.open_stream("FileHeader").unwrap(), b"header bytes");
        assert_eq!(file.open_stream("BodyText/Section0").unwrap(), big);
        assert_eq!(file.open_stream("bodytext/section1").unwrap(), b"tiny");
        assert!(file.exists("BodyText"));
        assert_eq!(file.sector_size(), 512);
    }

    #[test]
    fn test_unknown_stream() {
        let data = CompoundBuilder::new().stream("FileHeader", b"x").build();
        let file = CompoundFile::parse(&data).unwrap();
        match file.open_stream("DocInfo") {
            Err(OleError::StreamNotFound(name)) => assert_eq!(name, "DocInfo"),
            other => panic!("unexpected {other:?}"),
        }
        // Storages are not streams
        let data = CompoundBuilder::new().stream("BodyText/Section0", b"x").build();
        let file = CompoundFile::parse(&data).unwrap();
        assert!(file.open_stream("BodyText").is_err());
    }

    #[test]
    fn test_cyclic_fat_chain_is_rejected() {
        let big = vec![7u8; 5000];
        let mut data = CompoundBuilder::new().stream("Big", &big).build();
        let fat_sector = CompoundBuilder::FAT_SECTOR;
        let start = start_sector_of(&data, "Big");
        // Point the stream's second sector back at its first.
        let second = read_u32(&data, sector_offset(fat_sector, 512) + start as usize * 4);
        let link = sector_offset(fat_sector, 512) + second as usize * 4;
        data[link..link + 4].copy_from_slice(&start.to_le_bytes());

        let err = CompoundFile::parse(&data).unwrap_err();
        assert!(err.to_string().contains("cyclic"), "{err}");
    }

    #[test]
    fn test_sector_out_of_range_is_rejected() {
        let big = vec![1u8; 5000];
        let mut data = CompoundBuilder::new().stream("Big", &big).build();
        let fat_sector = CompoundBuilder::FAT_SECTOR;
        let start = start_sector_of(&data, "Big");
        let link = sector_offset(fat_sector, 512) + start as usize * 4;
        data[link..link + 4].copy_from_slice(&5000u32.to_le_bytes());

        let err = CompoundFile::parse(&data).unwrap_err();
        assert!(matches!(err, OleError::CorruptedFile { .. }), "{err}");
    }

    #[test]
    fn test_bad_byte_order() {
        let mut data = CompoundBuilder::new().stream("A", b"a").build();
        data[0x1C] = 0;
        assert!(matches!(
            CompoundFile::parse(&data),
            Err(OleError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_fat_listed_in_difat_sector() {
        let big: Vec<u8> = (0..20_000u32).map(|i| (i % 241) as u8).collect();
        let data = CompoundBuilder::new()
            .header_difat(0)
            .stream("BodyText/Section0", &big)
            .stream("FileHeader", b"header bytes")
            .build();
        assert_eq!(CompoundBuilder::first_difat_sector(&data), Some(1));
        assert_eq!(read_u32(&data, 0x4C), FREESECT);

        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(file.open_stream("BodyText/Section0").unwrap(), big);
        assert_eq!(file.open_stream("FileHeader").unwrap(), b"header bytes");
    }

    #[test]
    fn test_cyclic_difat_chain_is_rejected() {
        let mut data = CompoundBuilder::new()
            .header_difat(0)
            .stream("FileHeader", b"x")
            .build();
        let difat = CompoundBuilder::first_difat_sector(&data).unwrap();
        // Link the only DIFAT sector to itself and claim a second one.
        let link = sector_offset(difat, 512) + 512 - 4;
        data[link..link + 4].copy_from_slice(&difat.to_le_bytes());
        data[0x48..0x4C].copy_from_slice(&2u32.to_le_bytes());

        match CompoundFile::parse(&data) {
            Err(OleError::CorruptedFile { reason, offset }) => {
                assert!(reason.contains("DIFAT"), "{reason}");
                assert_eq!(offset, Some(sector_offset(difat, 512) as u64));
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_version4_sectors() {
        let big: Vec<u8> = (0..50_000u32).map(|i| (i % 239) as u8).collect();
        let data = CompoundBuilder::new()
            .version4()
            .stream("BodyText/Section0", &big)
            .stream("DocInfo", b"small")
            .build();
        assert_eq!(data.len() % 4096, 0);

        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(file.sector_size(), 4096);
        assert_eq!(file.open_stream("BodyText/Section0").unwrap(), big);
        assert_eq!(file.open_stream("DocInfo").unwrap(), b"small");

        let data = CompoundBuilder::new()
            .version4()
            .header_difat(0)
            .stream("Big", &big)
            .build();
        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(file.open_stream("Big").unwrap(), big);
    }

    #[test]
    fn test_version3_ignores_high_size_bits() {
        let big = vec![3u8; 5000];
        let mut data = CompoundBuilder::new().stream("Big", &big).build();
        let entry = entry_offset(&data, "Big");
        data[entry + 0x7C..entry + 0x80].copy_from_slice(&1u32.to_le_bytes());

        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(file.find_entry("Big").unwrap().size, 5000);
        assert_eq!(file.open_stream("Big").unwrap(), big);
    }

    #[test]
    fn test_non_ascii_entry_names() {
        let data = CompoundBuilder::new()
            .stream("문서/본문", b"text")
            .stream("Scripts", b"s")
            .build();
        let file = CompoundFile::parse(&data).unwrap();
        assert_eq!(file.list_streams(), vec!["Scripts", "문서/본문"]);
        assert_eq!(file.open_stream("문서/본문").unwrap(), b"text");
    }

    /// Byte offset of the directory entry named `name`.
    fn entry_offset(data: &[u8], name: &str) -> usize {
        let mut needle: Vec<u8> = name.encode_utf16().flat_map(u16::to_le_bytes).collect();
        needle.extend([0, 0]);
        let at = data
            .windows(needle.len())
            .position(|w| w == needle.as_slice())
            .unwrap();
        assert_eq!((at - HEADER_SIZE) % DIRENTRY_SIZE, 0);
        at
    }

    fn start_sector_of(data: &[u8], path: &str) -> u32 {
        let file = CompoundFile::parse(data).unwrap();
        file.find_entry(path).unwrap().start_sector
    }

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    }
}
