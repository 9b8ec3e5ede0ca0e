//! The record wire format: a fixed header followed by `key_size` then
//! `value_size` bytes. Independent of how that byte stream gets chunked into
//! blocks — `set_file` owns the chunking.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use value_type::ValueType;

/// `deleted: u32, key_size: u32, value_size: u32, value_type: u32` — 16 bytes,
/// per `spec.md` §6.1.
pub const HEADER_SIZE: usize = 16;

/// A decoded record header, without its key/value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	pub deleted: bool,
	pub key_size: u32,
	pub value_size: u32,
	pub value_type: u32,
}

impl Header {
	pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
		w.write_u32::<LittleEndian>(if self.deleted { 1 } else { 0 })?;
		w.write_u32::<LittleEndian>(self.key_size)?;
		w.write_u32::<LittleEndian>(self.value_size)?;
		w.write_u32::<LittleEndian>(self.value_type)?;
		Ok(())
	}

	pub fn read<R: Read>(r: &mut R) -> io::Result<Header> {
		let deleted = r.read_u32::<LittleEndian>()? != 0;
		let key_size = r.read_u32::<LittleEndian>()?;
		let value_size = r.read_u32::<LittleEndian>()?;
		let value_type = r.read_u32::<LittleEndian>()?;
		Ok(Header { deleted, key_size, value_size, value_type })
	}
}

/// An owned, decoded record: the unit a client inserts or receives back from
/// a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	pub key: Vec<u8>,
	pub value: Vec<u8>,
	pub value_type: ValueType,
}

impl Record {
	pub fn new(key: Vec<u8>, value: Vec<u8>, value_type: ValueType) -> Record {
		Record { key, value, value_type }
	}

	/// Total serialized size of this record: header + key + value.
	pub fn encoded_len(&self) -> usize {
		HEADER_SIZE + self.key.len() + self.value.len()
	}
}

/// A data item: an ordered, non-empty list of records inserted atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
	pub records: Vec<Record>,
}

impl DataItem {
	pub fn new(records: Vec<Record>) -> DataItem {
		DataItem { records }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_round_trips() {
		let h = Header { deleted: false, key_size: 3, value_size: 7, value_type: 2 };
		let mut buf = Vec::new();
		h.write(&mut buf).unwrap();
		assert_eq!(buf.len(), HEADER_SIZE);
		let back = Header::read(&mut &buf[..]).unwrap();
		assert_eq!(h, back);
	}

	#[test]
	fn encoded_len_matches_scenario_a() {
		let r = Record::new(b"a\0".to_vec(), 1u32.to_le_bytes().to_vec(), ValueType::Uint32);
		// header(16) + key(2) + value(4) = 22, well within a 50-byte payload.
		assert_eq!(r.encoded_len(), 22);
	}
}
