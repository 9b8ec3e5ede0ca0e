//! Index file: header I/O, node I/O at computed offsets, and create/open with
//! the bounded-retry dance (`spec.md` §4.4.3, §6.2).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::ffi::OsString;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use error::{ErrorKind, Result};
use index::node::{IndexIdType, Node};
use retry;

/// `{directory}/index/{set_name_bytes}_{record_key_bytes}.faciledb_index`,
/// per `spec.md` §6.2.
pub fn index_path(directory: &Path, set_name: &[u8], record_key: &[u8]) -> PathBuf {
	let mut stem = Vec::with_capacity(set_name.len() + 1 + record_key.len());
	stem.extend_from_slice(set_name);
	stem.push(b'_');
	stem.extend_from_slice(record_key);

	#[cfg(unix)]
	let name = OsString::from(::std::ffi::OsStr::from_bytes(&stem).to_os_string());
	#[cfg(not(unix))]
	let name = OsString::from(String::from_utf8_lossy(&stem).into_owned());

	let mut path = directory.join("index");
	let mut file_name = name;
	file_name.push(".faciledb_index");
	path.push(file_name);
	path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
	pub tag_num: u32,
	pub root_tag: u32,
	pub index_id_type: u32,
	pub key_bytes: Vec<u8>,
}

impl IndexHeader {
	fn size(key_size: usize) -> u64 {
		(4 * 4 + key_size) as u64
	}

	fn write<W: Write>(&self, w: &mut W) -> ::std::io::Result<()> {
		w.write_u32::<LittleEndian>(self.tag_num)?;
		w.write_u32::<LittleEndian>(self.root_tag)?;
		w.write_u32::<LittleEndian>(self.index_id_type)?;
		w.write_u32::<LittleEndian>(self.key_bytes.len() as u32)?;
		w.write_all(&self.key_bytes)?;
		Ok(())
	}

	fn read<R: Read>(r: &mut R) -> ::std::io::Result<IndexHeader> {
		let tag_num = r.read_u32::<LittleEndian>()?;
		let root_tag = r.read_u32::<LittleEndian>()?;
		let index_id_type = r.read_u32::<LittleEndian>()?;
		let key_size = r.read_u32::<LittleEndian>()?;
		let mut key_bytes = vec![0u8; key_size as usize];
		r.read_exact(&mut key_bytes)?;
		Ok(IndexHeader { tag_num, root_tag, index_id_type, key_bytes })
	}
}

/// A live handle on an index file: header kept in memory, nodes read/written
/// at `header_size + (tag - 1) * node_size`.
pub struct IndexFile {
	pub(crate) file: File,
	pub(crate) header: IndexHeader,
	pub(crate) order: usize,
	pub(crate) id_size: usize,
}

impl IndexFile {
	fn node_size(&self) -> u64 {
		Node::node_size(self.order, self.id_size) as u64
	}

	fn header_size(&self) -> u64 {
		IndexHeader::size(self.header.key_bytes.len())
	}

	fn node_offset(&self, tag: u32) -> u64 {
		assert!(tag >= 1, "node tags are 1-based");
		self.header_size() + (u64::from(tag) - 1) * self.node_size()
	}

	/// Loads the index for `(set_name, record_key)` if the file exists, else
	/// `None` — used when an operation must only *consult* an existing index,
	/// never create one (`spec.md` §4.3.1 step 7).
	pub fn open_existing(directory: &Path, set_name: &[u8], record_key: &[u8], order: usize, id_type: IndexIdType) -> Result<Option<IndexFile>> {
		let path = index_path(directory, set_name, record_key);
		if !path.exists() {
			return Ok(None);
		}
		let mut file = OpenOptions::new().write(true).read(true).open(&path)?;
		file.seek(SeekFrom::Start(0))?;
		let header = IndexHeader::read(&mut file)?;
		if header.key_bytes != record_key {
			bail!(ErrorKind::Corrupt(format!("index at {} has unexpected key bytes", path.display())));
		}
		Ok(Some(IndexFile { file, header, order, id_size: id_type.size() }))
	}

	/// Loads the index for `(set_name, record_key)`, creating it (one empty
	/// root leaf, `tag_num = 1`) if it does not exist yet.
	pub fn load_or_create(directory: &Path, set_name: &[u8], record_key: &[u8], order: usize, id_type: IndexIdType) -> Result<IndexFile> {
		let dir = directory.join("index");
		fs::create_dir_all(&dir)?;
		let path = index_path(directory, set_name, record_key);
		let id_size = id_type.size();
		let key_bytes = record_key.to_vec();

		let expected_key = key_bytes.clone();
		let file = retry::create_or_open(
			&path,
			|| -> ::std::io::Result<File> {
				let mut f = OpenOptions::new().write(true).read(true).create_new(true).open(&path)?;
				let header = IndexHeader { tag_num: 1, root_tag: 1, index_id_type: id_type.as_u32(), key_bytes: key_bytes.clone() };
				header.write(&mut f)?;
				let root = Node::empty_leaf(1);
				root.write(&mut f, order, id_size)?;
				Ok(f)
			},
			|| OpenOptions::new().write(true).read(true).open(&path),
			|f: &File| -> bool {
				let mut f = f.try_clone().expect("fd clone");
				f.seek(SeekFrom::Start(0)).is_ok() && IndexHeader::read(&mut f).map(|h| h.key_bytes == expected_key).unwrap_or(false)
			},
		)?;

		let mut file = file;
		file.seek(SeekFrom::Start(0))?;
		let header = IndexHeader::read(&mut file)?;
		if header.key_bytes != record_key {
			bail!(ErrorKind::Corrupt(format!("index at {} has unexpected key bytes", path.display())));
		}
		Ok(IndexFile { file, header, order, id_size })
	}

	pub fn write_header(&mut self) -> Result<()> {
		self.file.seek(SeekFrom::Start(0))?;
		self.header.write(&mut self.file)?;
		Ok(())
	}

	pub fn allocate_tag(&mut self) -> Result<u32> {
		self.header.tag_num += 1;
		Ok(self.header.tag_num)
	}

	pub fn root_tag(&self) -> u32 {
		self.header.root_tag
	}

	pub fn set_root_tag(&mut self, tag: u32) {
		self.header.root_tag = tag;
	}

	pub fn read_node(&mut self, tag: u32) -> Result<Node> {
		let offset = self.node_offset(tag);
		self.file.seek(SeekFrom::Start(offset))?;
		Ok(Node::read(&mut self.file, self.order, self.id_size)?)
	}

	pub fn write_node(&mut self, node: &Node) -> Result<()> {
		let offset = self.node_offset(node.tag);
		self.file.seek(SeekFrom::Start(offset))?;
		node.write(&mut self.file, self.order, self.id_size)?;
		Ok(())
	}

	pub fn raw_file(&self) -> &File {
		&self.file
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use index::node::IndexIdType;
	use tempdir::TempDir;

	#[test]
	fn create_then_reopen_preserves_key() {
		let dir = TempDir::new("faciledb-index").unwrap();
		{
			let mut idx = IndexFile::load_or_create(dir.path(), b"myset", b"a", 4, IndexIdType::Uint32).unwrap();
			assert_eq!(idx.root_tag(), 1);
			let root = idx.read_node(1).unwrap();
			assert!(root.is_leaf());
		}
		let idx = IndexFile::load_or_create(dir.path(), b"myset", b"a", 4, IndexIdType::Uint32).unwrap();
		assert_eq!(idx.header.key_bytes, b"a".to_vec());
	}

	#[test]
	fn open_existing_returns_none_when_absent() {
		let dir = TempDir::new("faciledb-index").unwrap();
		let found = IndexFile::open_existing(dir.path(), b"myset", b"a", 4, IndexIdType::Uint32).unwrap();
		assert!(found.is_none());
	}
}
