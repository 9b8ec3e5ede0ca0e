//! On-disk node format for the Index Engine's leaf-linked B+-tree
//! (`spec.md` §3.6/§6.2).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use value_type::ValueType;

/// The type an index keys its elements on — mirrors the value-type registry
/// but scoped to what can serve as an index id (`spec.md` §3.1.b in
/// SPEC_FULL.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum IndexIdType {
	Hash = 0,
	Uint32 = 1,
	Int32 = 2,
	Uint64 = 3,
	Int64 = 4,
	Float = 5,
	Double = 6,
}

impl IndexIdType {
	pub fn from_u32(tag: u32) -> Option<IndexIdType> {
		Some(match tag {
			0 => IndexIdType::Hash,
			1 => IndexIdType::Uint32,
			2 => IndexIdType::Int32,
			3 => IndexIdType::Uint64,
			4 => IndexIdType::Int64,
			5 => IndexIdType::Float,
			6 => IndexIdType::Double,
			_ => return None,
		})
	}

	pub fn as_u32(self) -> u32 {
		self as u32
	}

	/// Byte width of an index id of this type: 4 for the 32-bit types and the
	/// hash, 8 for the 64-bit types.
	pub fn size(self) -> usize {
		match self {
			IndexIdType::Hash | IndexIdType::Uint32 | IndexIdType::Int32 | IndexIdType::Float => 4,
			IndexIdType::Uint64 | IndexIdType::Int64 | IndexIdType::Double => 8,
		}
	}

	/// The index id type a record value type is indexed under. Fixed-size
	/// types keep their own byte representation; the variable-size `String`
	/// type is hashed down to a 32-bit id.
	pub fn for_value_type(vt: ValueType) -> IndexIdType {
		match vt {
			ValueType::Uint32 => IndexIdType::Uint32,
			ValueType::Int32 => IndexIdType::Int32,
			ValueType::Uint64 => IndexIdType::Uint64,
			ValueType::Int64 => IndexIdType::Int64,
			ValueType::Float => IndexIdType::Float,
			ValueType::Double => IndexIdType::Double,
			ValueType::Hash | ValueType::String => IndexIdType::Hash,
		}
	}
}

/// A 32-bit non-cryptographic-enough hash of arbitrary bytes, used to derive
/// an index id for variable-size values. `spec.md` explicitly places the
/// choice of hash function out of scope ("any 32-bit non-cryptographic hash
/// suffices"); we reuse the crate's existing `tiny_keccak` dependency rather
/// than hand-roll one, truncating its digest.
pub fn hash32(bytes: &[u8]) -> u32 {
	let digest = ::tiny_keccak::sha3_256(bytes);
	u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Computes `(index_id_type, index_id_bytes)` for a record value of the given
/// type.
pub fn index_id_for_value(value: &[u8], value_type: ValueType) -> (IndexIdType, Vec<u8>) {
	match value_type {
		ValueType::String => (IndexIdType::Hash, hash32(value).to_le_bytes().to_vec()),
		_ => (IndexIdType::for_value_type(value_type), value.to_vec()),
	}
}

/// The payload carried by each index element: enough to locate the data item
/// it was derived from. 16 bytes, per `spec.md` §3.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexPayload {
	pub data_tag: u64,
	pub start_block_tag: u64,
}

impl IndexPayload {
	pub const SIZE: usize = 16;

	pub fn zero() -> IndexPayload {
		IndexPayload { data_tag: 0, start_block_tag: 0 }
	}

	pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
		w.write_u64::<LittleEndian>(self.data_tag)?;
		w.write_u64::<LittleEndian>(self.start_block_tag)?;
		Ok(())
	}

	pub fn read<R: Read>(r: &mut R) -> io::Result<IndexPayload> {
		let data_tag = r.read_u64::<LittleEndian>()?;
		let start_block_tag = r.read_u64::<LittleEndian>()?;
		Ok(IndexPayload { data_tag, start_block_tag })
	}
}

/// One element of a node: an index id paired with its payload. Internal-node
/// elements carry a zeroed payload (only leaves route to real data items).
pub type Element = (Vec<u8>, IndexPayload);

/// A B+-tree node. `child_tag`/`elements` are kept as growable `Vec`s in
/// memory (briefly exceeding `order` while a split is in progress) and are
/// padded/truncated to their fixed on-disk width only at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	pub tag: u32,
	/// 0 = leaf.
	pub level: u32,
	pub parent_tag: u32,
	/// Sibling link at the same level; meaningful for leaves. Internal nodes
	/// leave this 0.
	pub next_tag: u32,
	pub child_tag: Vec<u32>,
	pub elements: Vec<Element>,
}

impl Node {
	pub fn empty_leaf(tag: u32) -> Node {
		Node { tag, level: 0, parent_tag: 0, next_tag: 0, child_tag: Vec::new(), elements: Vec::new() }
	}

	pub fn empty(tag: u32, level: u32) -> Node {
		Node { tag, level, parent_tag: 0, next_tag: 0, child_tag: Vec::new(), elements: Vec::new() }
	}

	pub fn is_leaf(&self) -> bool {
		self.level == 0
	}

	/// Fixed wire size of a node for the given tree `order` and `id_size`.
	pub fn node_size(order: usize, id_size: usize) -> usize {
		5 * 4 + (order + 1) * 4 + order * (id_size + IndexPayload::SIZE)
	}

	pub fn write<W: Write>(&self, w: &mut W, order: usize, id_size: usize) -> io::Result<()> {
		assert!(self.elements.len() <= order, "node element overflow must be split before writing");
		assert!(self.child_tag.len() <= order + 1, "node child overflow must be split before writing");

		w.write_u32::<LittleEndian>(self.tag)?;
		w.write_u32::<LittleEndian>(self.level)?;
		w.write_u32::<LittleEndian>(self.elements.len() as u32)?;
		w.write_u32::<LittleEndian>(self.parent_tag)?;
		w.write_u32::<LittleEndian>(self.next_tag)?;

		for i in 0..(order + 1) {
			w.write_u32::<LittleEndian>(*self.child_tag.get(i).unwrap_or(&0))?;
		}

		for i in 0..order {
			match self.elements.get(i) {
				Some((id, payload)) => {
					assert_eq!(id.len(), id_size, "index id length mismatch");
					w.write_all(id)?;
					payload.write(w)?;
				}
				None => {
					w.write_all(&vec![0u8; id_size])?;
					IndexPayload::zero().write(w)?;
				}
			}
		}
		Ok(())
	}

	pub fn read<R: Read>(r: &mut R, order: usize, id_size: usize) -> io::Result<Node> {
		let tag = r.read_u32::<LittleEndian>()?;
		let level = r.read_u32::<LittleEndian>()?;
		let length = r.read_u32::<LittleEndian>()? as usize;
		let parent_tag = r.read_u32::<LittleEndian>()?;
		let next_tag = r.read_u32::<LittleEndian>()?;

		let mut child_tag = Vec::with_capacity(order + 1);
		for _ in 0..(order + 1) {
			child_tag.push(r.read_u32::<LittleEndian>()?);
		}
		// Only internal nodes use child tags; the invariant is length+1
		// non-zero children, the rest is zero padding.
		if level == 0 {
			child_tag.clear();
		} else {
			child_tag.truncate(length + 1);
		}

		let mut elements = Vec::with_capacity(order);
		for i in 0..order {
			let mut id = vec![0u8; id_size];
			r.read_exact(&mut id)?;
			let payload = IndexPayload::read(r)?;
			if i < length {
				elements.push((id, payload));
			}
		}

		Ok(Node { tag, level, parent_tag, next_tag, child_tag, elements })
	}
}
