//! In-memory compound file builder shared by the integration tests, CLI tests and benches.
//! Produces version 3 files (512-byte sectors). Siblings are linked as a right-leaning
//! chain, which every reader accepts as a valid (if unbalanced) tree.
#![allow(dead_code, clippy::cast_possible_truncation)]

use olelib::consts::{
    ENDOFCHAIN, FATSECT, FREESECT, HEADER_DIFAT_ENTRIES, HEADER_SIZE, MAGIC, NOSTREAM,
    STGTY_ROOT, STGTY_STORAGE, STGTY_STREAM,
};
use std::path::Path;

pub const SECTOR: usize = 512;
const MINI: usize = 64;
const CUTOFF: usize = 4096;
const ENTRIES_PER_FAT_SECTOR: usize = SECTOR / 4;

struct Node {
    name: String,
    kind: u8,
    data: Vec<u8>,
    children: Vec<usize>,
    clsid: [u8; 16],
    left: u32,
    right: u32,
    child: u32,
    start: u32,
    size: u64,
}

impl Node {
    fn new(name: &str, kind: u8) -> Self {
        Self {
            name: name.to_string(),
            kind,
            data: Vec::new(),
            children: Vec::new(),
            clsid: [0; 16],
            left: NOSTREAM,
            right: NOSTREAM,
            child: NOSTREAM,
            start: 0,
            size: 0,
        }
    }
}

pub struct CompoundFileBuilder {
    nodes: Vec<Node>,
}

impl Default for CompoundFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundFileBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("Root Entry", STGTY_ROOT)],
        }
    }

    pub fn root_clsid(mut self, clsid: [u8; 16]) -> Self {
        self.nodes[0].clsid = clsid;
        self
    }

    /// Add an (empty) storage. Intermediate storages are created as needed.
    pub fn storage(mut self, path: &str) -> Self {
        let parts: Vec<&str> = path.split('/').collect();
        self.ensure_storage(&parts);
        self
    }

    /// Add a stream at a `/`-separated path. Intermediate storages are created as needed.
    pub fn stream(mut self, path: &str, data: &[u8]) -> Self {
        let parts: Vec<&str> = path.split('/').collect();
        let Some((name, dirs)) = parts.split_last() else {
            return self;
        };
        let parent = self.ensure_storage(dirs);

        let mut node = Node::new(name, STGTY_STREAM);
        node.data = data.to_vec();
        self.nodes.push(node);
        let index = self.nodes.len() - 1;
        self.nodes[parent].children.push(index);
        self
    }

    fn ensure_storage(&mut self, dirs: &[&str]) -> usize {
        let mut current = 0;
        for dir in dirs {
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].name == *dir);
            current = if let Some(c) = existing {
                c
            } else {
                self.nodes.push(Node::new(dir, STGTY_STORAGE));
                let index = self.nodes.len() - 1;
                self.nodes[current].children.push(index);
                index
            };
        }
        current
    }

    pub fn build(mut self) -> Vec<u8> {
        // Link children: first child hangs off the parent, the rest chain to the right
        for i in 0..self.nodes.len() {
            let children = self.nodes[i].children.clone();
            if let Some(&first) = children.first() {
                self.nodes[i].child = first as u32;
            }
            for pair in children.windows(2) {
                self.nodes[pair[0]].right = pair[1] as u32;
            }
        }

        // Small streams go to the mini stream
        let mut ministream = Vec::new();
        let mut minifat: Vec<u32> = Vec::new();
        let mut big = Vec::new();
        for i in 1..self.nodes.len() {
            if self.nodes[i].kind != STGTY_STREAM {
                continue;
            }
            let len = self.nodes[i].data.len();
            self.nodes[i].size = len as u64;
            if len == 0 {
                self.nodes[i].start = ENDOFCHAIN;
            } else if len < CUTOFF {
                let first = minifat.len();
                let count = len.div_ceil(MINI);
                for k in 0..count {
                    minifat.push(if k + 1 == count {
                        ENDOFCHAIN
                    } else {
                        (first + k + 1) as u32
                    });
                }
                self.nodes[i].start = first as u32;
                ministream.extend_from_slice(&self.nodes[i].data);
                ministream.resize(ministream.len().div_ceil(MINI) * MINI, 0);
            } else {
                big.push(i);
            }
        }

        let dir_sectors = (self.nodes.len() * 128).div_ceil(SECTOR).max(1);
        let minifat_sectors = (minifat.len() * 4).div_ceil(SECTOR);
        let ministream_sectors = ministream.len().div_ceil(SECTOR);
        let big_sectors: usize = big
            .iter()
            .map(|&i| self.nodes[i].data.len().div_ceil(SECTOR))
            .sum();
        let data_sectors = dir_sectors + minifat_sectors + ministream_sectors + big_sectors;

        let mut fat_sectors = 1;
        while fat_sectors * ENTRIES_PER_FAT_SECTOR < data_sectors + fat_sectors {
            fat_sectors += 1;
        }
        assert!(fat_sectors <= HEADER_DIFAT_ENTRIES, "builder does not emit DIFAT sectors");

        let mut fat = vec![FREESECT; fat_sectors * ENTRIES_PER_FAT_SECTOR];
        fat[..fat_sectors].fill(FATSECT);
        let mut next = fat_sectors;

        let dir_start = alloc_chain(&mut fat, &mut next, dir_sectors);
        let minifat_start = alloc_chain(&mut fat, &mut next, minifat_sectors);
        let mini_start = alloc_chain(&mut fat, &mut next, ministream_sectors);
        for &i in &big {
            let count = self.nodes[i].data.len().div_ceil(SECTOR);
            self.nodes[i].start = alloc_chain(&mut fat, &mut next, count);
        }
        self.nodes[0].start = mini_start;
        self.nodes[0].size = ministream.len() as u64;

        // Header
        let mut out = vec![0u8; HEADER_SIZE];
        out[..8].copy_from_slice(MAGIC);
        put_u16(&mut out, 0x18, 0x3E);
        put_u16(&mut out, 0x1A, 3);
        put_u16(&mut out, 0x1C, 0xFFFE);
        put_u16(&mut out, 0x1E, 9);
        put_u16(&mut out, 0x20, 6);
        put_u32(&mut out, 0x2C, fat_sectors as u32);
        put_u32(&mut out, 0x30, dir_start);
        put_u32(&mut out, 0x38, CUTOFF as u32);
        put_u32(&mut out, 0x3C, minifat_start);
        put_u32(&mut out, 0x40, minifat_sectors as u32);
        put_u32(&mut out, 0x44, ENDOFCHAIN);
        put_u32(&mut out, 0x48, 0);
        for i in 0..HEADER_DIFAT_ENTRIES {
            let value = if i < fat_sectors { i as u32 } else { FREESECT };
            put_u32(&mut out, 0x4C + i * 4, value);
        }

        // FAT
        for entry in &fat {
            out.extend_from_slice(&entry.to_le_bytes());
        }

        // Directory
        let mut dir = Vec::with_capacity(dir_sectors * SECTOR);
        for node in &self.nodes {
            dir.extend_from_slice(&encode_entry(node));
        }
        while dir.len() < dir_sectors * SECTOR {
            dir.extend_from_slice(&empty_entry());
        }
        out.extend_from_slice(&dir);

        // MiniFAT
        let mut minifat_bytes: Vec<u8> = minifat.iter().flat_map(|e| e.to_le_bytes()).collect();
        while minifat_bytes.len() < minifat_sectors * SECTOR {
            minifat_bytes.extend_from_slice(&FREESECT.to_le_bytes());
        }
        out.extend_from_slice(&minifat_bytes);

        // Mini stream
        ministream.resize(ministream_sectors * SECTOR, 0);
        out.extend_from_slice(&ministream);

        // Large streams
        for &i in &big {
            let mut data = self.nodes[i].data.clone();
            data.resize(data.len().div_ceil(SECTOR) * SECTOR, 0);
            out.extend_from_slice(&data);
        }

        out
    }

    /// Build and write the file to disk, creating parent directories.
    pub fn write_to<P: AsRef<Path>>(self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.build())
    }
}

fn alloc_chain(fat: &mut [u32], next: &mut usize, count: usize) -> u32 {
    if count == 0 {
        return ENDOFCHAIN;
    }
    let start = *next;
    for k in 0..count {
        fat[start + k] = if k + 1 == count {
            ENDOFCHAIN
        } else {
            (start + k + 1) as u32
        };
    }
    *next += count;
    start as u32
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn encode_entry(node: &Node) -> [u8; 128] {
    let mut raw = [0u8; 128];
    let units: Vec<u16> = node.name.encode_utf16().collect();
    for (i, unit) in units.iter().enumerate() {
        put_u16(&mut raw, i * 2, *unit);
    }
    put_u16(&mut raw, 0x40, ((units.len() + 1) * 2) as u16);
    raw[0x42] = node.kind;
    raw[0x43] = 1; // black
    put_u32(&mut raw, 0x44, node.left);
    put_u32(&mut raw, 0x48, node.right);
    put_u32(&mut raw, 0x4C, node.child);
    raw[0x50..0x60].copy_from_slice(&node.clsid);
    put_u32(&mut raw, 0x74, node.start);
    put_u32(&mut raw, 0x78, node.size as u32);
    raw
}

fn empty_entry() -> [u8; 128] {
    let mut raw = [0u8; 128];
    put_u32(&mut raw, 0x44, NOSTREAM);
    put_u32(&mut raw, 0x48, NOSTREAM);
    put_u32(&mut raw, 0x4C, NOSTREAM);
    raw
}

/// Byte offset of the FAT entry for `sector` in a built file with one FAT sector
pub const fn fat_entry_offset(sector: u32) -> usize {
    HEADER_SIZE + sector as usize * 4
}

/// Byte offset of regular sector `sector`
pub const fn sector_offset(sector: u32) -> usize {
    (sector as usize + 1) * SECTOR
}
