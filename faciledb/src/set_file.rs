//! Set File Layer (`spec.md` §4.3): the set-file header, the block-chain
//! encoding of a data item, and insert/reconstruct/search/delete over it.
//! `SetHandle` layers the Concurrency Gate and the advisory file lock on top,
//! in the order `spec.md` §9 requires (file lock taken after in-process
//! admission, released before admission release signals peers).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use fs2::FileExt;
use itertools::Itertools;
use std::ffi::OsString;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use block::{Block, BlockAttributes};
use error::{ErrorKind, Result};
use gate::Gate;
use record::{self, DataItem, Header, Record};
use retry;
use value_type::ValueType;

/// Seconds since the epoch. `spec.md` §1 places timestamp sourcing out of
/// scope ("treated as external collaborators"); this is the one ambient
/// source the rest of the layer calls through.
pub fn now() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// `{directory}/{set_name}.faciledb`, per `spec.md` §6.1.
pub fn set_path(directory: &Path, set_name: &[u8]) -> PathBuf {
	#[cfg(unix)]
	let name = OsString::from(::std::ffi::OsStr::from_bytes(set_name).to_os_string());
	#[cfg(not(unix))]
	let name = OsString::from(String::from_utf8_lossy(set_name).into_owned());

	let mut file_name = name;
	file_name.push(".faciledb");
	directory.join(file_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetProperties {
	pub block_num: u64,
	pub created_time: u64,
	pub modified_time: u64,
	pub valid_record_num: u64,
	pub set_name: Vec<u8>,
}

impl SetProperties {
	fn size(name_len: usize) -> u64 {
		(8 * 4 + 4 + name_len) as u64
	}

	fn write<W: Write>(&self, w: &mut W) -> ::std::io::Result<()> {
		w.write_u64::<LittleEndian>(self.block_num)?;
		w.write_u64::<LittleEndian>(self.created_time)?;
		w.write_u64::<LittleEndian>(self.modified_time)?;
		w.write_u64::<LittleEndian>(self.valid_record_num)?;
		w.write_u32::<LittleEndian>(self.set_name.len() as u32)?;
		w.write_all(&self.set_name)?;
		Ok(())
	}

	fn read<R: Read>(r: &mut R) -> ::std::io::Result<SetProperties> {
		let block_num = r.read_u64::<LittleEndian>()?;
		let created_time = r.read_u64::<LittleEndian>()?;
		let modified_time = r.read_u64::<LittleEndian>()?;
		let valid_record_num = r.read_u64::<LittleEndian>()?;
		let name_len = r.read_u32::<LittleEndian>()? as usize;
		let mut set_name = vec![0u8; name_len];
		r.read_exact(&mut set_name)?;
		Ok(SetProperties { block_num, created_time, modified_time, valid_record_num, set_name })
	}
}

/// Whether a probe must match a record's value exactly, or any record sharing
/// `(key, value_type)` satisfies the search (`spec.md` §4.3.3 / §4.4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
	Equal,
	Any,
}

/// Chain-level metadata gathered while walking a data item's blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMeta {
	pub first_block_tag: u64,
	pub data_tag: u64,
	pub created_time: u64,
	pub modified_time: u64,
	pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
	pub meta: ChainMeta,
	pub records: Vec<Record>,
}

/// The chain-location a freshly inserted data item ends up at — what the
/// Index Engine stores as its payload (`spec.md` §3.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedChain {
	pub data_tag: u64,
	pub first_block_tag: u64,
}

/// A live handle on a set file: header kept in memory, blocks read/written at
/// `header_size + (tag - 1) * block_size`.
pub struct SetFile {
	file: File,
	properties: SetProperties,
	block_payload_size: usize,
}

impl SetFile {
	fn block_size(&self) -> u64 {
		Block::block_size(self.block_payload_size) as u64
	}

	fn header_size(&self) -> u64 {
		SetProperties::size(self.properties.set_name.len())
	}

	fn offset(&self, block_tag: u64) -> u64 {
		Block::offset(self.header_size(), block_tag, self.block_size())
	}

	pub fn set_name(&self) -> &[u8] {
		&self.properties.set_name
	}

	pub fn raw_file(&self) -> &File {
		&self.file
	}

	/// Loads the set named `set_name`, creating it (empty header,
	/// `block_num = 0`) if it does not exist yet (`spec.md` §4.3.5).
	pub fn load_or_create(directory: &Path, set_name: &[u8], block_payload_size: usize) -> Result<SetFile> {
		::std::fs::create_dir_all(directory)?;
		let path = set_path(directory, set_name);
		let expected_name = set_name.to_vec();
		let now_ts = now();

		let file = retry::create_or_open(
			&path,
			|| -> ::std::io::Result<File> {
				let mut f = OpenOptions::new().write(true).read(true).create_new(true).open(&path)?;
				let properties = SetProperties {
					block_num: 0,
					created_time: now_ts,
					modified_time: now_ts,
					valid_record_num: 0,
					set_name: set_name.to_vec(),
				};
				properties.write(&mut f)?;
				Ok(f)
			},
			|| OpenOptions::new().write(true).read(true).open(&path),
			|f: &File| -> bool {
				let mut f = f.try_clone().expect("fd clone");
				f.seek(SeekFrom::Start(0)).is_ok() && SetProperties::read(&mut f).map(|p| p.set_name == expected_name).unwrap_or(false)
			},
		)?;

		let mut file = file;
		file.seek(SeekFrom::Start(0))?;
		let properties = SetProperties::read(&mut file)?;
		if properties.set_name != set_name {
			bail!(ErrorKind::Corrupt(format!("set file at {} has unexpected name", path.display())));
		}
		Ok(SetFile { file, properties, block_payload_size })
	}

	fn write_properties(&mut self) -> Result<()> {
		self.file.seek(SeekFrom::Start(0))?;
		self.properties.write(&mut self.file)?;
		Ok(())
	}

	fn read_block_attributes(&mut self, block_tag: u64) -> Result<BlockAttributes> {
		let offset = self.offset(block_tag);
		self.file.seek(SeekFrom::Start(offset))?;
		Ok(BlockAttributes::read(&mut self.file)?)
	}

	fn read_block(&mut self, block_tag: u64) -> Result<Block> {
		let offset = self.offset(block_tag);
		self.file.seek(SeekFrom::Start(offset))?;
		Ok(Block::read(&mut self.file, self.block_payload_size)?)
	}

	fn write_block(&mut self, block: &Block) -> Result<()> {
		let offset = self.offset(block.block_tag);
		self.file.seek(SeekFrom::Start(offset))?;
		block.write(&mut self.file)?;
		Ok(())
	}

	/// Sets `deleted` and `modified_time` on one block, in place, without
	/// touching the rest of its fields (`spec.md` §4.3.4: "block-local field
	/// writes only; no relocation"). The two fields are adjacent on disk
	/// (`modified_time` then `deleted`), so one seek covers both.
	fn mark_block_deleted(&mut self, block_tag: u64, now_ts: u64) -> Result<()> {
		let offset = self.offset(block_tag) + 5 * 8;
		self.file.seek(SeekFrom::Start(offset))?;
		self.file.write_u64::<LittleEndian>(now_ts)?;
		self.file.write_u32::<LittleEndian>(1)?;
		Ok(())
	}

	/// Serializes `data_item` into a chain of blocks and appends it
	/// (`spec.md` §4.3.1). Records are packed back to back as
	/// `header || key || value`; a header never straddles a block boundary,
	/// key and value bytes may.
	pub fn insert(&mut self, data_item: &DataItem) -> Result<InsertedChain> {
		if data_item.records.is_empty() {
			bail!(ErrorKind::InvalidInput("a data item must contain at least one record".into()));
		}
		for record in &data_item.records {
			if !record.value_type.size_valid(record.value.len()) {
				bail!(ErrorKind::InvalidInput(format!(
					"value of size {} is invalid for {:?}", record.value.len(), record.value_type
				)));
			}
		}
		if self.block_payload_size < record::HEADER_SIZE {
			bail!(ErrorKind::InvalidOptions("block_payload_size", "smaller than a record header".into()));
		}

		let now_ts = now();
		let total_records = data_item.records.len() as u32;
		let payload_size = self.block_payload_size;

		let mut blocks: Vec<Block> = Vec::new();
		let mut cursor: Vec<u8> = Vec::with_capacity(payload_size);
		let mut props_num: u32 = 0;

		fn flush(cursor: &mut Vec<u8>, payload_size: usize, props_num: &mut u32, total_records: u32, now_ts: u64, blocks: &mut Vec<Block>) {
			let mut payload = ::std::mem::replace(cursor, Vec::with_capacity(payload_size));
			payload.resize(payload_size, 0);
			blocks.push(Block {
				block_tag: 0,
				data_tag: 0,
				prev_block_tag: 0,
				next_block_tag: 0,
				created_time: now_ts,
				modified_time: now_ts,
				deleted: false,
				valid_record_num: total_records,
				record_properties_num: *props_num,
				payload,
			});
			*props_num = 0;
		}

		fn append(mut bytes: &[u8], cursor: &mut Vec<u8>, payload_size: usize, props_num: &mut u32, total_records: u32, now_ts: u64, blocks: &mut Vec<Block>) {
			while !bytes.is_empty() {
				let space = payload_size - cursor.len();
				let take = space.min(bytes.len());
				cursor.extend_from_slice(&bytes[..take]);
				bytes = &bytes[take..];
				if cursor.len() == payload_size {
					flush(cursor, payload_size, props_num, total_records, now_ts, blocks);
				}
			}
		}

		for record in &data_item.records {
			let header = Header {
				deleted: false,
				key_size: record.key.len() as u32,
				value_size: record.value.len() as u32,
				value_type: record.value_type.as_u32(),
			};

			if cursor.len() + record::HEADER_SIZE > payload_size {
				flush(&mut cursor, payload_size, &mut props_num, total_records, now_ts, &mut blocks);
			}

			let mut header_buf = Vec::with_capacity(record::HEADER_SIZE);
			header.write(&mut header_buf)?;
			cursor.extend_from_slice(&header_buf);
			props_num += 1;

			append(&record.key, &mut cursor, payload_size, &mut props_num, total_records, now_ts, &mut blocks);
			append(&record.value, &mut cursor, payload_size, &mut props_num, total_records, now_ts, &mut blocks);
		}

		if !cursor.is_empty() {
			flush(&mut cursor, payload_size, &mut props_num, total_records, now_ts, &mut blocks);
		}

		let start_tag = self.properties.block_num + 1;
		for (i, block) in blocks.iter_mut().enumerate() {
			block.block_tag = start_tag + i as u64;
			block.prev_block_tag = if i == 0 { 0 } else { start_tag + i as u64 - 1 };
		}
		// Back-patch next_block_tag by walking consecutive pairs (spec.md §9's
		// recursion-to-iteration note, applied to the chain-linking pass).
		for (cur, next) in (0..blocks.len()).tuple_windows() {
			let next_tag = blocks[next].block_tag;
			blocks[cur].next_block_tag = next_tag;
		}
		if let Some(last) = blocks.last_mut() {
			last.next_block_tag = 0;
		}

		for block in &blocks {
			self.write_block(block)?;
		}

		self.properties.block_num += blocks.len() as u64;
		self.properties.valid_record_num += 1;
		self.properties.modified_time = now_ts;
		self.write_properties()?;

		Ok(InsertedChain { data_tag: self.properties.valid_record_num, first_block_tag: start_tag })
	}

	/// Walks a chain from `start_tag`, emitting its live records
	/// (`spec.md` §4.3.2).
	pub fn reconstruct(&mut self, start_tag: u64) -> Result<(ChainMeta, Vec<Record>)> {
		let mut tag = start_tag;
		let mut payload = Vec::new();
		let mut created_time = u64::max_value();
		let mut modified_time = 0u64;
		let mut deleted = false;
		let mut valid_record_num = 0u32;
		let mut data_tag = 0u64;

		loop {
			let block = self.read_block(tag)?;
			created_time = created_time.min(block.created_time);
			modified_time = modified_time.max(block.modified_time);
			deleted |= block.deleted;
			valid_record_num = block.valid_record_num;
			data_tag = block.data_tag;
			payload.extend_from_slice(&block.payload);
			if block.next_block_tag == 0 {
				break;
			}
			tag = block.next_block_tag;
		}

		let mut records = Vec::new();
		let mut cursor = 0usize;
		let mut emitted = 0u32;
		while emitted < valid_record_num && cursor + record::HEADER_SIZE <= payload.len() {
			let header = Header::read(&mut &payload[cursor..cursor + record::HEADER_SIZE])?;
			cursor += record::HEADER_SIZE;
			let key_size = header.key_size as usize;
			let value_size = header.value_size as usize;
			if cursor + key_size + value_size > payload.len() {
				break;
			}
			let key = payload[cursor..cursor + key_size].to_vec();
			cursor += key_size;
			let value = payload[cursor..cursor + value_size].to_vec();
			cursor += value_size;
			if header.deleted {
				continue;
			}
			let value_type = ValueType::from_u32(header.value_type)
				.ok_or_else(|| ErrorKind::Corrupt(format!("unknown value type tag {}", header.value_type)))?;
			records.push(Record::new(key, value, value_type));
			emitted += 1;
		}

		Ok((ChainMeta { first_block_tag: start_tag, data_tag, created_time, modified_time, deleted }, records))
	}

	/// Chain-start block tags: those not deleted and with `prev_block_tag ==
	/// 0` (`spec.md` §4.3.3).
	pub fn chain_start_tags(&mut self) -> Result<Vec<u64>> {
		let mut starts = Vec::new();
		for tag in 1..=self.properties.block_num {
			let attrs = self.read_block_attributes(tag)?;
			if attrs.deleted || attrs.prev_block_tag != 0 {
				continue;
			}
			starts.push(tag);
		}
		Ok(starts)
	}

	fn chain_matches(records: &[Record], probe: &Record, mode: CompareMode) -> bool {
		records.iter().any(|r| {
			r.key == probe.key && r.value_type == probe.value_type && match mode {
				CompareMode::Any => true,
				CompareMode::Equal => r.value_type.compare(&r.value, &probe.value) == ::std::cmp::Ordering::Equal,
			}
		})
	}

	/// Full-scan equality search (`spec.md` §4.3.3's scan path).
	pub fn scan_search(&mut self, probe: &Record, mode: CompareMode) -> Result<Vec<SearchHit>> {
		let mut hits = Vec::new();
		for start_tag in self.chain_start_tags()? {
			let (meta, records) = self.reconstruct(start_tag)?;
			if Self::chain_matches(&records, probe, mode) {
				hits.push(SearchHit { meta, records });
			}
		}
		Ok(hits)
	}

	/// Marks every block of the chain starting at `start_tag` deleted
	/// (`spec.md` §4.3.4).
	pub fn delete_chain(&mut self, start_tag: u64) -> Result<()> {
		let now_ts = now();
		let mut tag = start_tag;
		loop {
			let attrs = self.read_block_attributes(tag)?;
			self.mark_block_deleted(tag, now_ts)?;
			if attrs.next_block_tag == 0 {
				break;
			}
			tag = attrs.next_block_tag;
		}
		Ok(())
	}

	/// Full-scan equality delete: finds matching chains then tombstones each
	/// (`spec.md` §4.3.4's scan path).
	pub fn scan_delete(&mut self, probe: &Record, mode: CompareMode) -> Result<u32> {
		let hits = self.scan_search(probe, mode)?;
		let count = hits.len() as u32;
		for hit in hits {
			self.delete_chain(hit.meta.first_block_tag)?;
		}
		Ok(count)
	}
}

/// Pairs a `SetFile` with its Concurrency Gate, sequencing the advisory file
/// lock strictly inside the gate's admission window.
pub struct SetHandle {
	file: SetFile,
	gate: Gate,
}

impl SetHandle {
	pub fn load_or_create(directory: &Path, set_name: &[u8], block_payload_size: usize) -> Result<SetHandle> {
		let file = SetFile::load_or_create(directory, set_name, block_payload_size)?;
		Ok(SetHandle { file, gate: Gate::new() })
	}

	pub fn set_name(&self) -> &[u8] {
		self.file.set_name()
	}

	pub fn gate(&self) -> &Gate {
		&self.gate
	}

	pub fn insert(&mut self, data_item: &DataItem) -> Result<InsertedChain> {
		{
			let file = self.file.raw_file();
			self.gate.write_wait_with(|| file.lock_exclusive())?;
		}
		let result = self.file.insert(data_item);
		{
			let file = self.file.raw_file();
			self.gate.write_unblock_with(|| file.unlock())?;
		}
		result
	}

	pub fn search_equal(&mut self, probe: &Record, mode: CompareMode) -> Result<Vec<SearchHit>> {
		{
			let file = self.file.raw_file();
			self.gate.read_wait_with(|| file.lock_shared())?;
		}
		let result = self.file.scan_search(probe, mode);
		{
			let file = self.file.raw_file();
			self.gate.read_unblock_with(|| file.unlock())?;
		}
		result
	}

	pub fn delete_equal(&mut self, probe: &Record, mode: CompareMode) -> Result<u32> {
		{
			let file = self.file.raw_file();
			self.gate.write_wait_with(|| file.lock_exclusive())?;
		}
		let result = self.file.scan_delete(probe, mode);
		{
			let file = self.file.raw_file();
			self.gate.write_unblock_with(|| file.unlock())?;
		}
		result
	}

	/// Read-gated chain walk, used by `make_record_index`'s bulk populate and
	/// by indexed search's scan-validation step.
	pub fn reconstruct(&mut self, start_tag: u64) -> Result<(ChainMeta, Vec<Record>)> {
		{
			let file = self.file.raw_file();
			self.gate.read_wait_with(|| file.lock_shared())?;
		}
		let result = self.file.reconstruct(start_tag);
		{
			let file = self.file.raw_file();
			self.gate.read_unblock_with(|| file.unlock())?;
		}
		result
	}

	pub fn chain_start_tags(&mut self) -> Result<Vec<u64>> {
		{
			let file = self.file.raw_file();
			self.gate.read_wait_with(|| file.lock_shared())?;
		}
		let result = self.file.chain_start_tags();
		{
			let file = self.file.raw_file();
			self.gate.read_unblock_with(|| file.unlock())?;
		}
		result
	}

	/// Write-gated delete of a chain already located (by an index lookup),
	/// bypassing a second scan.
	pub fn delete_chain(&mut self, start_tag: u64) -> Result<()> {
		{
			let file = self.file.raw_file();
			self.gate.write_wait_with(|| file.lock_exclusive())?;
		}
		let result = self.file.delete_chain(start_tag);
		{
			let file = self.file.raw_file();
			self.gate.write_unblock_with(|| file.unlock())?;
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempdir::TempDir;

	fn item(pairs: &[(&[u8], u32)]) -> DataItem {
		DataItem::new(pairs.iter().map(|&(k, v)| Record::new(k.to_vec(), v.to_le_bytes().to_vec(), ValueType::Uint32)).collect())
	}

	#[test]
	fn scenario_a_single_block() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		let inserted = set.insert(&item(&[(b"a\0", 1)])).unwrap();
		assert_eq!(inserted.data_tag, 1);
		assert_eq!(set.properties.block_num, 1);
		let block = set.read_block(1).unwrap();
		assert_eq!(block.data_tag, 1);
		assert_eq!(block.prev_block_tag, 0);
		assert_eq!(block.next_block_tag, 0);
		assert_eq!(block.valid_record_num, 1);
		assert_eq!(block.record_properties_num, 1);
	}

	#[test]
	fn scenario_b_spans_two_blocks() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		let mut value = Vec::new();
		for _ in 0..3 {
			value.extend_from_slice(b"abcdefghijklmnopqrstuvwxyz");
		}
		value.push(0);
		assert_eq!(value.len(), 79);
		let data_item = DataItem::new(vec![Record::new(b"a\0".to_vec(), value, ValueType::String)]);
		set.insert(&data_item).unwrap();
		assert_eq!(set.properties.block_num, 2);

		let b1 = set.read_block(1).unwrap();
		assert_eq!(b1.prev_block_tag, 0);
		assert_eq!(b1.next_block_tag, 2);
		assert_eq!(b1.record_properties_num, 1);
		assert_eq!(b1.valid_record_num, 1);

		let b2 = set.read_block(2).unwrap();
		assert_eq!(b2.prev_block_tag, 1);
		assert_eq!(b2.next_block_tag, 0);
		assert_eq!(b2.record_properties_num, 0);
		assert_eq!(b2.valid_record_num, 1);
	}

	#[test]
	fn scenario_c_two_independent_chains() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		let a = set.insert(&item(&[(b"a\0", 1)])).unwrap();
		let b = set.insert(&item(&[(b"a\0", 1), (b"b\0", 2)])).unwrap();
		assert_eq!(set.properties.block_num, 2);
		assert_eq!(a.data_tag, 1);
		assert_eq!(b.data_tag, 2);
	}

	#[test]
	fn scenario_d_search_matches_by_block_tag_order() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		set.insert(&item(&[(b"a\0", 1)])).unwrap();
		set.insert(&item(&[(b"a\0", 2), (b"b\0", 3)])).unwrap();
		set.insert(&item(&[(b"a\0", 1), (b"b\0", 2), (b"c\0", 3)])).unwrap();
		set.insert(&item(&[(b"a\0", 1)])).unwrap();

		let probe = Record::new(b"a\0".to_vec(), 1u32.to_le_bytes().to_vec(), ValueType::Uint32);
		let hits = set.scan_search(&probe, CompareMode::Equal).unwrap();
		assert_eq!(hits.len(), 3);
		assert_eq!(hits.iter().map(|h| h.meta.data_tag).collect::<Vec<_>>(), vec![1, 3, 4]);
	}

	#[test]
	fn scenario_e_delete_by_probe_then_unaffected_search_still_finds_matches() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		set.insert(&item(&[(b"a\0", 1)])).unwrap();
		set.insert(&item(&[(b"b\0", 3)])).unwrap();
		set.insert(&item(&[(b"a\0", 1), (b"b\0", 3)])).unwrap();
		set.insert(&item(&[(b"c\0", 9)])).unwrap();

		let probe_b = Record::new(b"b\0".to_vec(), 3u32.to_le_bytes().to_vec(), ValueType::Uint32);
		let deleted = set.scan_delete(&probe_b, CompareMode::Equal).unwrap();
		assert_eq!(deleted, 2);

		let probe_a = Record::new(b"a\0".to_vec(), 1u32.to_le_bytes().to_vec(), ValueType::Uint32);
		let hits = set.scan_search(&probe_a, CompareMode::Equal).unwrap();
		assert_eq!(hits.len(), 1, "the a=1,b=3 chain was deleted but the standalone a=1 chain was not");
	}

	#[test]
	fn reconstruct_roundtrips_multi_record_item() {
		let dir = TempDir::new("faciledb-set").unwrap();
		let mut set = SetFile::load_or_create(dir.path(), b"s", 50).unwrap();
		let inserted = set.insert(&item(&[(b"a\0", 1), (b"b\0", 2)])).unwrap();
		let (meta, records) = set.reconstruct(inserted.first_block_tag).unwrap();
		assert!(!meta.deleted);
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].key, b"a\0");
		assert_eq!(records[1].key, b"b\0");
	}
}
