//! In-memory compound file writer for tests.
//!
//! Lays out a version 3 (512-byte sectors) or version 4 (4096-byte sectors)
//! file in a fixed order: FAT, DIFAT, directory, mini FAT, mini stream, then
//! regular streams. Streams below the mini stream cutoff go into the mini
//! stream. Siblings are linked as a right-leaning chain, which readers must
//! accept like any other tree shape.

use super::consts::*;
use std::collections::BTreeMap;

#[derive(Debug)]
pub(crate) struct CompoundBuilder {
    streams: Vec<(String, Vec<u8>)>,
    sector_shift: u16,
    /// FAT sector ids kept in the header; the rest go to DIFAT sectors
    header_difat: usize,
}

impl Default for CompoundBuilder {
    fn default() -> Self {
        Self {
            streams: Vec::new(),
            sector_shift: 9,
            header_difat: HEADER_DIFAT_ENTRIES,
        }
    }
}

struct Node {
    name: String,
    kind: u8,
    children: Vec<usize>,
    stream: Option<usize>,
    start: u32,
    size: u64,
}

impl CompoundBuilder {
    /// Sector id of the first FAT sector in every built file.
    pub(crate) const FAT_SECTOR: u32 = 0;

    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a stream at a `/`-separated path; missing storages are created.
    pub(crate) fn stream(mut self, path: &str, data: &[u8]) -> Self {
        self.streams.push((path.to_string(), data.to_vec()));
        self
    }

    /// Write a version 4 file with 4096-byte sectors.
    pub(crate) fn version4(mut self) -> Self {
        self.sector_shift = 12;
        self
    }

    /// Keep at most `count` FAT sector ids in the header.
    pub(crate) fn header_difat(mut self, count: usize) -> Self {
        self.header_difat = count.min(HEADER_DIFAT_ENTRIES);
        self
    }

    /// Sector id of the first DIFAT sector, if the file has one.
    pub(crate) fn first_difat_sector(data: &[u8]) -> Option<u32> {
        let id = u32::from_le_bytes([data[0x44], data[0x45], data[0x46], data[0x47]]);
        (id != ENDOFCHAIN).then_some(id)
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let sector = 1usize << self.sector_shift;
        let links = sector / 4;
        // Directory tree
        let mut nodes = vec![Node {
            name: "Root Entry".to_string(),
            kind: STGTY_ROOT,
            children: Vec::new(),
            stream: None,
            start: ENDOFCHAIN,
            size: 0,
        }];
        let mut storages: BTreeMap<String, usize> = BTreeMap::new();
        for (idx, (path, _)) in self.streams.iter().enumerate() {
            let parts: Vec<&str> = path.split('/').collect();
            let mut parent = 0;
            let mut prefix = String::new();
            for storage in &parts[..parts.len() - 1] {
                prefix.push_str(storage);
                prefix.push('/');
                parent = match storages.get(&prefix) {
                    Some(&id) => id,
                    None => {
                        nodes.push(Node {
                            name: storage.to_string(),
                            kind: STGTY_STORAGE,
                            children: Vec::new(),
                            stream: None,
                            start: ENDOFCHAIN,
                            size: 0,
                        });
                        let id = nodes.len() - 1;
                        nodes[parent].children.push(id);
                        storages.insert(prefix.clone(), id);
                        id
                    },
                };
            }
            nodes.push(Node {
                name: parts[parts.len() - 1].to_string(),
                kind: STGTY_STREAM,
                children: Vec::new(),
                stream: Some(idx),
                start: ENDOFCHAIN,
                size: 0,
            });
            let id = nodes.len() - 1;
            nodes[parent].children.push(id);
        }

        // Mini stream and regular stream payloads
        let mut ministream = Vec::new();
        let mut minifat: Vec<u32> = Vec::new();
        let mut big: Vec<(usize, Vec<u8>)> = Vec::new();
        for node_id in 0..nodes.len() {
            let Some(idx) = nodes[node_id].stream else {
                continue;
            };
            let data = &self.streams[idx].1;
            nodes[node_id].size = data.len() as u64;
            if data.is_empty() {
                continue;
            }
            if data.len() < MINI_STREAM_CUTOFF as usize {
                let first = (ministream.len() / MINI_SECTOR_SIZE) as u32;
                let count = data.len().div_ceil(MINI_SECTOR_SIZE);
                nodes[node_id].start = first;
                chain_into(&mut minifat, first, count);
                ministream.extend_from_slice(data);
                ministream.resize(ministream.len().next_multiple_of(MINI_SECTOR_SIZE), 0);
            } else {
                big.push((node_id, data.clone()));
            }
        }

        let dir_sectors = (nodes.len() * DIRENTRY_SIZE).div_ceil(sector);
        let minifat_sectors = (minifat.len() * 4).div_ceil(sector);
        let ministream_sectors = ministream.len().div_ceil(sector);
        let big_sectors: usize = big.iter().map(|(_, d)| d.len().div_ceil(sector)).sum();
        let payload = dir_sectors + minifat_sectors + ministream_sectors + big_sectors;
        let difat_for = |fat_sectors: usize| {
            fat_sectors
                .saturating_sub(self.header_difat)
                .div_ceil(links - 1)
        };
        let mut fat_sectors = 1;
        while fat_sectors * links < fat_sectors + difat_for(fat_sectors) + payload {
            fat_sectors += 1;
        }
        let difat_sectors = difat_for(fat_sectors);
        let in_header = fat_sectors.min(self.header_difat);

        let mut fat: Vec<u32> = vec![FATSECT; fat_sectors];
        let difat_start = fat.len() as u32;
        fat.resize(fat_sectors + difat_sectors, DIFSECT);
        let dir_start = fat.len() as u32;
        chain_into(&mut fat, dir_start, dir_sectors);
        let minifat_start = fat.len() as u32;
        chain_into(&mut fat, minifat_start, minifat_sectors);
        let ministream_start = fat.len() as u32;
        chain_into(&mut fat, ministream_start, ministream_sectors);
        if !ministream.is_empty() {
            nodes[0].start = ministream_start;
            nodes[0].size = ministream.len() as u64;
        }
        for (node_id, data) in &big {
            let start = fat.len() as u32;
            chain_into(&mut fat, start, data.len().div_ceil(sector));
            nodes[*node_id].start = start;
        }
        fat.resize(fat_sectors * links, FREESECT);

        // Header
        let mut out = vec![0u8; HEADER_SIZE];
        out[..8].copy_from_slice(MAGIC);
        put_u16(&mut out, 0x18, 0x003E);
        put_u16(&mut out, 0x1A, if self.sector_shift == 12 { 4 } else { 3 });
        put_u16(&mut out, 0x1C, 0xFFFE);
        put_u16(&mut out, 0x1E, self.sector_shift);
        put_u16(&mut out, 0x20, 6);
        put_u32(&mut out, 0x2C, fat_sectors as u32);
        put_u32(&mut out, 0x30, dir_start);
        put_u32(&mut out, 0x38, MINI_STREAM_CUTOFF);
        let (mf_start, mf_count) = if minifat_sectors > 0 {
            (minifat_start, minifat_sectors as u32)
        } else {
            (ENDOFCHAIN, 0)
        };
        put_u32(&mut out, 0x3C, mf_start);
        put_u32(&mut out, 0x40, mf_count);
        let first_difat = if difat_sectors > 0 { difat_start } else { ENDOFCHAIN };
        put_u32(&mut out, 0x44, first_difat);
        put_u32(&mut out, 0x48, difat_sectors as u32);
        for i in 0..HEADER_DIFAT_ENTRIES {
            let id = if i < in_header { i as u32 } else { FREESECT };
            put_u32(&mut out, 0x4C + i * 4, id);
        }
        out.resize(sector.max(HEADER_SIZE), 0);

        // FAT
        for link in &fat {
            out.extend_from_slice(&link.to_le_bytes());
        }

        // DIFAT: remaining FAT ids, each sector ending in a link to the next
        let mut listed = (in_header..fat_sectors).map(|id| id as u32);
        for i in 0..difat_sectors {
            for _ in 0..links - 1 {
                let id = listed.next().unwrap_or(FREESECT);
                out.extend_from_slice(&id.to_le_bytes());
            }
            let next = if i + 1 == difat_sectors {
                ENDOFCHAIN
            } else {
                difat_start + i as u32 + 1
            };
            out.extend_from_slice(&next.to_le_bytes());
        }

        // Directory
        let mut dir = Vec::with_capacity(dir_sectors * sector);
        for node in &nodes {
            dir.extend_from_slice(&dir_entry(node));
        }
        // Sibling links are filled below, after every entry has its slot.
        for node in &nodes {
            for pair in node.children.windows(2) {
                put_u32(&mut dir, pair[0] * DIRENTRY_SIZE + 0x48, pair[1] as u32);
            }
        }
        dir.resize(dir_sectors * sector, 0);
        out.extend_from_slice(&dir);

        // Mini FAT
        let mut mf = Vec::with_capacity(minifat_sectors * sector);
        for link in &minifat {
            mf.extend_from_slice(&link.to_le_bytes());
        }
        while mf.len() < minifat_sectors * sector {
            mf.extend_from_slice(&FREESECT.to_le_bytes());
        }
        out.extend_from_slice(&mf);

        // Mini stream
        ministream.resize(ministream_sectors * sector, 0);
        out.extend_from_slice(&ministream);

        // Regular streams
        for (_, data) in &big {
            out.extend_from_slice(data);
            out.resize(out.len().next_multiple_of(sector), 0);
        }

        out
    }
}

fn chain_into(table: &mut Vec<u32>, first: u32, count: usize) {
    for i in 0..count {
        let next = if i + 1 == count {
            ENDOFCHAIN
        } else {
            first + i as u32 + 1
        };
        table.push(next);
    }
}

fn dir_entry(node: &Node) -> [u8; DIRENTRY_SIZE] {
    let mut entry = [0u8; DIRENTRY_SIZE];
    let units: Vec<u16> = node.name.encode_utf16().take(31).collect();
    for (i, unit) in units.iter().enumerate() {
        entry[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    put_u16(&mut entry, 0x40, ((units.len() + 1) * 2) as u16);
    entry[0x42] = node.kind;
    entry[0x43] = 1;
    put_u32(&mut entry, 0x44, NOSTREAM);
    put_u32(&mut entry, 0x48, NOSTREAM);
    let child = node.children.first().map_or(NOSTREAM, |&c| c as u32);
    put_u32(&mut entry, 0x4C, child);
    put_u32(&mut entry, 0x74, node.start);
    put_u32(&mut entry, 0x78, node.size as u32);
    entry
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
