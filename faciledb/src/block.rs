//! Block Layer (`spec.md` §4.2): fixed-size blocks inside a set file,
//! addressed by a 1-based `block_tag`, read and written field by field so the
//! on-disk layout never depends on host padding or alignment.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Bytes occupied by the fixed portion of a block, ahead of its payload:
/// six `u64`s and three `u32`s.
pub const HEADER_SIZE: usize = 6 * 8 + 3 * 4;

/// One block of a set file's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
	pub block_tag: u64,
	pub data_tag: u64,
	pub prev_block_tag: u64,
	pub next_block_tag: u64,
	pub created_time: u64,
	pub modified_time: u64,
	pub deleted: bool,
	/// The data item's total record count; identical on every block of a chain.
	pub valid_record_num: u32,
	/// Count of record headers that begin inside this block's payload.
	pub record_properties_num: u32,
	pub payload: Vec<u8>,
}

impl Block {
	/// The fixed wire size of a block: header plus `block_payload_size`.
	pub fn block_size(block_payload_size: usize) -> usize {
		HEADER_SIZE + block_payload_size
	}

	/// Byte offset of `block_tag` inside the set file, given the set header's
	/// size and the configured block size. `spec.md` §4.2:
	/// `offset(block_tag) = header_size + (block_tag - 1) * block_size`.
	pub fn offset(set_header_size: u64, block_tag: u64, block_size: u64) -> u64 {
		assert!(block_tag >= 1, "block_tag is 1-based");
		set_header_size + (block_tag - 1) * block_size
	}

	pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
		w.write_u64::<LittleEndian>(self.block_tag)?;
		w.write_u64::<LittleEndian>(self.data_tag)?;
		w.write_u64::<LittleEndian>(self.prev_block_tag)?;
		w.write_u64::<LittleEndian>(self.next_block_tag)?;
		w.write_u64::<LittleEndian>(self.created_time)?;
		w.write_u64::<LittleEndian>(self.modified_time)?;
		w.write_u32::<LittleEndian>(if self.deleted { 1 } else { 0 })?;
		w.write_u32::<LittleEndian>(self.valid_record_num)?;
		w.write_u32::<LittleEndian>(self.record_properties_num)?;
		w.write_all(&self.payload)?;
		Ok(())
	}

	pub fn read<R: Read>(r: &mut R, block_payload_size: usize) -> io::Result<Block> {
		let attrs = BlockAttributes::read(r)?;
		let mut payload = vec![0u8; block_payload_size];
		r.read_exact(&mut payload)?;
		Ok(Block {
			block_tag: attrs.block_tag,
			data_tag: attrs.data_tag,
			prev_block_tag: attrs.prev_block_tag,
			next_block_tag: attrs.next_block_tag,
			created_time: attrs.created_time,
			modified_time: attrs.modified_time,
			deleted: attrs.deleted,
			valid_record_num: attrs.valid_record_num,
			record_properties_num: attrs.record_properties_num,
			payload,
		})
	}
}

/// The fixed-size fields of a block without its payload — enough to walk a
/// chain or check a tombstone without reading the (possibly large) payload.
/// Mirrors `read_db_block_attributes` in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAttributes {
	pub block_tag: u64,
	pub data_tag: u64,
	pub prev_block_tag: u64,
	pub next_block_tag: u64,
	pub created_time: u64,
	pub modified_time: u64,
	pub deleted: bool,
	pub valid_record_num: u32,
	pub record_properties_num: u32,
}

impl BlockAttributes {
	pub fn read<R: Read>(r: &mut R) -> io::Result<BlockAttributes> {
		let block_tag = r.read_u64::<LittleEndian>()?;
		let data_tag = r.read_u64::<LittleEndian>()?;
		let prev_block_tag = r.read_u64::<LittleEndian>()?;
		let next_block_tag = r.read_u64::<LittleEndian>()?;
		let created_time = r.read_u64::<LittleEndian>()?;
		let modified_time = r.read_u64::<LittleEndian>()?;
		let deleted = r.read_u32::<LittleEndian>()? != 0;
		let valid_record_num = r.read_u32::<LittleEndian>()?;
		let record_properties_num = r.read_u32::<LittleEndian>()?;
		Ok(BlockAttributes {
			block_tag, data_tag, prev_block_tag, next_block_tag,
			created_time, modified_time, deleted, valid_record_num, record_properties_num,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_block(payload_size: usize) -> Block {
		Block {
			block_tag: 1,
			data_tag: 1,
			prev_block_tag: 0,
			next_block_tag: 0,
			created_time: 10,
			modified_time: 10,
			deleted: false,
			valid_record_num: 1,
			record_properties_num: 1,
			payload: vec![0xAB; payload_size],
		}
	}

	#[test]
	fn round_trips_through_write_and_read() {
		let block = sample_block(50);
		let mut buf = Vec::new();
		block.write(&mut buf).unwrap();
		assert_eq!(buf.len(), Block::block_size(50));
		let back = Block::read(&mut &buf[..], 50).unwrap();
		assert_eq!(block, back);
	}

	#[test]
	fn attributes_read_without_payload() {
		let block = sample_block(50);
		let mut buf = Vec::new();
		block.write(&mut buf).unwrap();
		let attrs = BlockAttributes::read(&mut &buf[..HEADER_SIZE]).unwrap();
		assert_eq!(attrs.block_tag, block.block_tag);
		assert_eq!(attrs.valid_record_num, block.valid_record_num);
	}

	#[test]
	fn offset_is_1_based() {
		let header = 37u64;
		let block_size = Block::block_size(50) as u64;
		assert_eq!(Block::offset(header, 1, block_size), header);
		assert_eq!(Block::offset(header, 2, block_size), header + block_size);
	}
}
