//! The `olefile` module provides the [`OleFile`] struct, a read-only view of an OLE2
//! structured storage (compound) file.
//!
//! Opening a file loads the allocation tables and the whole directory up front.
//! Stream contents are read on demand, following either the FAT (regular sectors)
//! or the MiniFAT (64-byte mini sectors inside the root's mini stream) depending
//! on the stream size.

use crate::consts::{
    DIRENTRY_SIZE, ENDOFCHAIN, FREESECT, HEADER_SIZE, MAGIC, MINI_SECTOR_SIZE,
    MINIMAL_OLEFILE_SIZE, NOSTREAM,
};
use crate::directory::{DirEntry, EntryKind, EntryNode};
use crate::error::{OleError, OleErrorKind};
use crate::header::{Header, le_u32};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Check whether in-memory data starts like a compound file.
///
/// # Examples
/// ```
/// use olelib::is_ole_bytes;
///
/// assert!(!is_ole_bytes(b"PK\x03\x04"));
/// ```
pub fn is_ole_bytes(data: &[u8]) -> bool {
    data.len() >= MINIMAL_OLEFILE_SIZE && data.starts_with(MAGIC)
}

#[derive(Debug)]
pub struct OleFile<R: Read + Seek = BufReader<File>> {
    /// Path of the opened file (empty when parsed from a reader)
    pub filepath: PathBuf,
    /// Underlying reader
    reader: R,
    /// Total file size in bytes
    file_size: u64,
    /// Parsed header
    header: Header,
    /// File Allocation Table: next sector of each sector
    fat: Vec<u32>,
    /// Mini FAT: next mini sector of each mini sector
    minifat: Vec<u32>,
    /// Directory entries reachable from the root, indexed by SID
    entries: Vec<Option<DirEntry>>,
    /// Root's mini stream, loaded on first small-stream read
    ministream: Option<Vec<u8>>,
}

impl OleFile {
    /// Opens and parses the compound file at `filepath`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a compound file,
    /// or its allocation tables or directory are corrupted.
    pub fn open<P: AsRef<Path>>(filepath: P) -> Result<Self, OleError> {
        let file = File::open(&filepath)?;
        let mut ole = Self::from_reader(BufReader::new(file))?;
        ole.filepath = filepath.as_ref().to_path_buf();

        log::info!(
            "Opened compound file '{}' ({} streams)",
            ole.filepath.display(),
            ole.list_streams().len()
        );
        Ok(ole)
    }

    /// Quick signature check: the file must start with the OLE2 magic and be
    /// large enough to hold a header and two sectors. Any I/O error yields `false`.
    pub fn is_ole_file<P: AsRef<Path>>(filepath: P) -> bool {
        let Ok(mut file) = File::open(filepath) else {
            return false;
        };
        let Ok(meta) = file.metadata() else {
            return false;
        };

        let mut magic = [0u8; 8];
        meta.len() >= MINIMAL_OLEFILE_SIZE as u64
            && file.read_exact(&mut magic).is_ok()
            && &magic == MAGIC
    }
}

impl<R: Read + Seek> OleFile<R> {
    /// Parses a compound file from any seekable reader.
    ///
    /// # Errors
    /// Returns an error if the data is not a compound file or is corrupted.
    pub fn from_reader(mut reader: R) -> Result<Self, OleError> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if file_size < HEADER_SIZE as u64 {
            return Err(OleError::NotOleFile);
        }

        let mut raw = [0u8; HEADER_SIZE];
        reader.read_exact(&mut raw)?;
        if !raw.starts_with(MAGIC) {
            return Err(OleError::NotOleFile);
        }
        if file_size < MINIMAL_OLEFILE_SIZE as u64 {
            return Err(OleError::Header(OleErrorKind::FileTooSmall(file_size)));
        }

        let header = Header::parse(&raw)?;

        let mut ole = Self {
            filepath: PathBuf::new(),
            reader,
            file_size,
            header,
            fat: Vec::new(),
            minifat: Vec::new(),
            entries: Vec::new(),
            ministream: None,
        };

        ole.load_fat()?;
        ole.load_directory()?;
        ole.load_minifat()?;

        log::debug!(
            "Parsed compound file v{}: {} FAT entries, {} MiniFAT entries, {} directory slots",
            ole.header.major_version,
            ole.fat.len(),
            ole.minifat.len(),
            ole.entries.len()
        );

        Ok(ole)
    }

    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    pub const fn sector_size(&self) -> usize {
        self.header.sector_size
    }

    pub const fn major_version(&self) -> u16 {
        self.header.major_version
    }

    /// Root directory entry
    pub fn root(&self) -> Option<&DirEntry> {
        self.entries.first().and_then(Option::as_ref)
    }

    /// Entry by SID, if it is reachable from the root
    pub fn entry(&self, sid: u32) -> Option<&DirEntry> {
        self.entries.get(sid as usize).and_then(Option::as_ref)
    }

    /// CLSID of the root storage (identifies the application that wrote the file)
    pub fn root_clsid(&self) -> Option<String> {
        self.root().and_then(DirEntry::clsid_string)
    }

    /// Read one regular sector. A truncated last sector is padded with zeros.
    fn read_sector(&mut self, sector: u32) -> Result<Vec<u8>, OleError> {
        let size = self.header.sector_size;
        let position = (u64::from(sector) + 1) * size as u64;
        if position >= self.file_size {
            return Err(OleError::Stream(OleErrorKind::SectorOutOfRange(sector)));
        }

        self.reader.seek(SeekFrom::Start(position))?;
        let mut buffer = Vec::with_capacity(size);
        (&mut self.reader)
            .take(size as u64)
            .read_to_end(&mut buffer)?;
        buffer.resize(size, 0);
        Ok(buffer)
    }

    /// Read the data of a regular sector chain starting at `start`.
    fn read_chain(&mut self, start: u32) -> Result<Vec<u8>, OleError> {
        let mut data = Vec::new();
        let mut sector = start;
        let mut steps = 0usize;

        while sector != ENDOFCHAIN {
            if sector as usize >= self.fat.len() {
                return Err(OleError::Stream(OleErrorKind::SectorOutOfRange(sector)));
            }
            steps += 1;
            if steps > self.fat.len() {
                return Err(OleError::Stream(OleErrorKind::ChainLoop(sector)));
            }

            data.extend_from_slice(&self.read_sector(sector)?);
            sector = self.fat[sector as usize];
        }

        Ok(data)
    }

    /// Load the FAT. The first 109 FAT sector indexes live in the header,
    /// further ones in the DIFAT sector chain.
    fn load_fat(&mut self) -> Result<(), OleError> {
        let mut fat_sectors = self.header.difat.clone();

        if self.header.num_difat_sectors > 0 {
            let per_sector = self.header.sector_size / 4 - 1; // last slot links to the next DIFAT sector
            let max_sectors = self.file_size / self.header.sector_size as u64;
            let mut difat_sector = self.header.first_difat_sector;

            for _ in 0..self.header.num_difat_sectors {
                if difat_sector == ENDOFCHAIN || difat_sector == FREESECT {
                    break;
                }
                if u64::from(difat_sector) >= max_sectors {
                    return Err(OleError::Header(OleErrorKind::SectorOutOfRange(
                        difat_sector,
                    )));
                }

                let data = self.read_sector(difat_sector)?;
                fat_sectors.extend(
                    (0..per_sector)
                        .map(|i| le_u32(&data, i * 4))
                        .take_while(|&s| s != FREESECT && s != ENDOFCHAIN),
                );
                difat_sector = le_u32(&data, per_sector * 4);
            }
        }

        if fat_sectors.len() != self.header.num_fat_sectors as usize {
            log::warn!(
                "Header declares {} FAT sectors, found {}",
                self.header.num_fat_sectors,
                fat_sectors.len()
            );
        }

        let per_sector = self.header.sector_size / 4;
        self.fat.reserve(fat_sectors.len() * per_sector);
        for sector in fat_sectors {
            let data = self
                .read_sector(sector)
                .map_err(|_| OleError::Header(OleErrorKind::SectorOutOfRange(sector)))?;
            self.fat
                .extend((0..per_sector).map(|i| le_u32(&data, i * 4)));
        }

        Ok(())
    }

    /// Load the MiniFAT, if the file has one.
    fn load_minifat(&mut self) -> Result<(), OleError> {
        if self.header.num_minifat_sectors == 0 || self.header.first_minifat_sector == ENDOFCHAIN {
            return Ok(());
        }

        let data = self.read_chain(self.header.first_minifat_sector)?;
        self.minifat = data
            .chunks_exact(4)
            .map(|chunk| le_u32(chunk, 0))
            .collect();
        Ok(())
    }

    /// Load the directory stream and resolve the sibling trees of every storage
    /// into ordered children lists.
    fn load_directory(&mut self) -> Result<(), OleError> {
        let dir_data = self.read_chain(self.header.first_dir_sector)?;
        let count = dir_data.len() / DIRENTRY_SIZE;
        if count == 0 {
            return Err(OleError::Directory(OleErrorKind::MissingRootEntry, 0));
        }

        self.entries = vec![None; count];

        let root = DirEntry::parse(&dir_data[..DIRENTRY_SIZE], 0, self.header.sector_size)?;
        if root.kind != EntryKind::Root {
            return Err(OleError::Directory(OleErrorKind::MissingRootEntry, 0));
        }
        self.entries[0] = Some(root);

        let mut visited = vec![false; count];
        visited[0] = true;

        // Storages whose children still need to be resolved
        let mut pending = vec![0u32];
        while let Some(parent) = pending.pop() {
            let Some(first_child) = self.entry(parent).map(|e| e.child) else {
                continue;
            };

            let children = self.collect_siblings(first_child, &dir_data, &mut visited)?;
            for &sid in &children {
                if self.entry(sid).is_some_and(|e| e.kind.is_container()) {
                    pending.push(sid);
                }
            }

            if let Some(Some(entry)) = self.entries.get_mut(parent as usize) {
                entry.children = children;
            }
        }

        Ok(())
    }

    /// In-order walk of one red-black sibling tree. Parses every visited entry.
    fn collect_siblings(
        &mut self,
        top: u32,
        dir_data: &[u8],
        visited: &mut [bool],
    ) -> Result<Vec<u32>, OleError> {
        let mut ordered = Vec::new();
        let mut stack = Vec::new();
        let mut current = top;

        loop {
            // Descend left as far as possible
            while current != NOSTREAM {
                let entry = self.parse_entry(current, dir_data, visited)?;
                stack.push(current);
                current = entry.left;
            }

            let Some(sid) = stack.pop() else {
                break;
            };
            ordered.push(sid);
            current = self.entry(sid).map_or(NOSTREAM, |e| e.right);
        }

        Ok(ordered)
    }

    fn parse_entry(
        &mut self,
        sid: u32,
        dir_data: &[u8],
        visited: &mut [bool],
    ) -> Result<&DirEntry, OleError> {
        let index = sid as usize;
        if index >= self.entries.len() {
            return Err(OleError::Directory(OleErrorKind::InvalidSid(sid), sid));
        }
        if visited[index] {
            return Err(OleError::Directory(OleErrorKind::DirectoryCycle(sid), sid));
        }
        visited[index] = true;

        let offset = index * DIRENTRY_SIZE;
        let entry = DirEntry::parse(
            &dir_data[offset..offset + DIRENTRY_SIZE],
            sid,
            self.header.sector_size,
        )?;

        Ok(self.entries[index].insert(entry))
    }

    /// Find an entry by its path of names (case-insensitive). Empty path is the root.
    fn find(&self, path: &[&str]) -> Option<&DirEntry> {
        let mut current = self.root()?;
        for name in path {
            current = current
                .children
                .iter()
                .filter_map(|&sid| self.entry(sid))
                .find(|e| e.name.to_lowercase() == name.to_lowercase())?;
        }
        Some(current)
    }

    /// Check whether a storage or stream exists at `path`
    pub fn exists(&self, path: &[&str]) -> bool {
        self.find(path).is_some()
    }

    /// Size of the stream at `path`, `None` if there is no such stream
    pub fn stream_size(&self, path: &[&str]) -> Option<u64> {
        self.find(path).filter(|e| e.is_stream()).map(|e| e.size)
    }

    /// List every stream as a path of names, in directory-tree order.
    /// Storages themselves are not listed.
    pub fn list_streams(&self) -> Vec<Vec<String>> {
        let mut streams = Vec::new();
        if let Some(root) = self.root() {
            self.collect_streams(root, &mut Vec::new(), &mut streams);
        }
        streams
    }

    fn collect_streams(
        &self,
        storage: &DirEntry,
        prefix: &mut Vec<String>,
        streams: &mut Vec<Vec<String>>,
    ) {
        for entry in storage.children.iter().filter_map(|&sid| self.entry(sid)) {
            prefix.push(entry.name.clone());
            match entry.kind {
                EntryKind::Stream => streams.push(prefix.clone()),
                EntryKind::Storage => self.collect_streams(entry, prefix, streams),
                _ => {}
            }
            prefix.pop();
        }
    }

    /// Build the storage hierarchy. Children are sorted by name (case-insensitive).
    pub fn tree(&self) -> Option<EntryNode> {
        self.root().map(|root| self.build_node(root, Vec::new()))
    }

    fn build_node(&self, entry: &DirEntry, path: Vec<String>) -> EntryNode {
        let mut children: Vec<EntryNode> = entry
            .children
            .iter()
            .filter_map(|&sid| self.entry(sid))
            .filter(|e| matches!(e.kind, EntryKind::Storage | EntryKind::Stream))
            .map(|child| {
                let mut child_path = path.clone();
                child_path.push(child.name.clone());
                self.build_node(child, child_path)
            })
            .collect();
        children.sort_by_key(|node| node.name.to_lowercase());

        EntryNode {
            name: entry.name.clone(),
            kind: entry.kind,
            size: if entry.is_stream() { entry.size } else { 0 },
            path,
            children,
        }
    }

    /// Read the full contents of the stream at `path`.
    ///
    /// # Errors
    /// Returns an error if the path does not name a stream or the sector chain is corrupted.
    ///
    /// # Example
    /// ```no_run
    /// use olelib::OleFile;
    ///
    /// let mut ole = OleFile::open("document.doc").unwrap();
    /// let data = ole.read_stream(&["WordDocument"]).unwrap();
    /// println!("{} bytes", data.len());
    /// ```
    pub fn read_stream(&mut self, path: &[&str]) -> Result<Vec<u8>, OleError> {
        let entry = self
            .find(path)
            .ok_or_else(|| OleError::NotFound(path.join("/")))?;
        if !entry.is_stream() {
            return Err(OleError::NotAStream(path.join("/")));
        }

        let (start, size) = (entry.start_sector, entry.size);
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut data = if size < u64::from(self.header.mini_stream_cutoff) {
            self.read_mini_chain(start)?
        } else {
            self.read_chain(start)?
        };

        let len = usize::try_from(size)
            .map_err(|_| OleError::Stream(OleErrorKind::IncompleteStream(size, data.len())))?;
        if data.len() < len {
            return Err(OleError::Stream(OleErrorKind::IncompleteStream(
                size,
                data.len(),
            )));
        }
        data.truncate(len);

        log::debug!("Read stream '{}' ({len} bytes)", path.join("/"));
        Ok(data)
    }

    /// Read a mini sector chain out of the root's mini stream.
    fn read_mini_chain(&mut self, start: u32) -> Result<Vec<u8>, OleError> {
        if self.ministream.is_none() {
            let (root_start, root_size) = self
                .root()
                .map(|r| (r.start_sector, r.size))
                .ok_or(OleError::Directory(OleErrorKind::MissingRootEntry, 0))?;
            let mut stream = self.read_chain(root_start)?;
            stream.truncate(usize::try_from(root_size).unwrap_or(usize::MAX));
            self.ministream = Some(stream);
        }

        let ministream = self.ministream.as_deref().unwrap_or_default();
        let mut data = Vec::new();
        let mut sector = start;
        let mut steps = 0usize;

        while sector != ENDOFCHAIN {
            if sector as usize >= self.minifat.len() {
                return Err(OleError::Stream(OleErrorKind::SectorOutOfRange(sector)));
            }
            steps += 1;
            if steps > self.minifat.len() {
                return Err(OleError::Stream(OleErrorKind::ChainLoop(sector)));
            }

            // The mini stream may end inside its last mini sector
            let position = sector as usize * MINI_SECTOR_SIZE;
            let end = (position + MINI_SECTOR_SIZE).min(ministream.len());
            let chunk = ministream
                .get(position..end)
                .filter(|chunk| !chunk.is_empty())
                .ok_or(OleError::Stream(OleErrorKind::MiniSectorOutOfRange(sector)))?;
            data.extend_from_slice(chunk);
            sector = self.minifat[sector as usize];
        }

        Ok(data)
    }
}
