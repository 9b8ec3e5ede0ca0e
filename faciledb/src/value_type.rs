//! Value-Type Registry: the closed set of record value types, their declared
//! sizes and comparators.

use std::cmp::Ordering;

/// The type tag carried by every record. Mirrors
/// `FACILEDB_RECORD_VALUE_TYPE_E` in the original C headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ValueType {
	Uint32 = 0,
	String = 1,
	Int32 = 2,
	Uint64 = 3,
	Int64 = 4,
	Float = 5,
	Double = 6,
	/// A prior 32-bit hash of some underlying bytes.
	Hash = 7,
}

impl ValueType {
	/// Reconstructs a `ValueType` from its on-disk tag, or `None` if the tag
	/// is not one of the known variants.
	pub fn from_u32(tag: u32) -> Option<ValueType> {
		Some(match tag {
			0 => ValueType::Uint32,
			1 => ValueType::String,
			2 => ValueType::Int32,
			3 => ValueType::Uint64,
			4 => ValueType::Int64,
			5 => ValueType::Float,
			6 => ValueType::Double,
			7 => ValueType::Hash,
			_ => return None,
		})
	}

	pub fn as_u32(self) -> u32 {
		self as u32
	}

	/// Declared byte size, or `None` for a dynamically sized type (`String`).
	pub fn size_of(self) -> Option<usize> {
		match self {
			ValueType::Uint32 => Some(4),
			ValueType::String => None,
			ValueType::Int32 => Some(4),
			ValueType::Uint64 => Some(8),
			ValueType::Int64 => Some(8),
			ValueType::Float => Some(4),
			ValueType::Double => Some(8),
			ValueType::Hash => Some(4),
		}
	}

	/// Whether `size` is an acceptable byte length for a value of this type.
	/// Dynamically sized types accept any size.
	pub fn size_valid(self, size: usize) -> bool {
		match self.size_of() {
			Some(expected) => size == expected,
			None => true,
		}
	}

	/// Total comparator over two values already validated against this type's
	/// declared size. Panics if the slices are not of a size this type
	/// accepts; callers must validate with `size_valid` first.
	pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
		assert!(self.size_valid(a.len()) && self.size_valid(b.len()), "value size mismatch for {:?}", self);
		match self {
			ValueType::Uint32 | ValueType::Hash => u32::from_le_bytes(arr4(a)).cmp(&u32::from_le_bytes(arr4(b))),
			ValueType::Int32 => i32::from_le_bytes(arr4(a)).cmp(&i32::from_le_bytes(arr4(b))),
			ValueType::Uint64 => u64::from_le_bytes(arr8(a)).cmp(&u64::from_le_bytes(arr8(b))),
			ValueType::Int64 => i64::from_le_bytes(arr8(a)).cmp(&i64::from_le_bytes(arr8(b))),
			ValueType::Float => f32::from_le_bytes(arr4(a)).partial_cmp(&f32::from_le_bytes(arr4(b))).unwrap_or(Ordering::Equal),
			ValueType::Double => f64::from_le_bytes(arr8(a)).partial_cmp(&f64::from_le_bytes(arr8(b))).unwrap_or(Ordering::Equal),
			ValueType::String => a.cmp(b),
		}
	}
}

fn arr4(s: &[u8]) -> [u8; 4] {
	let mut out = [0u8; 4];
	out.copy_from_slice(&s[..4]);
	out
}

fn arr8(s: &[u8]) -> [u8; 8] {
	let mut out = [0u8; 8];
	out.copy_from_slice(&s[..8]);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_sizes() {
		assert_eq!(ValueType::Uint32.size_of(), Some(4));
		assert_eq!(ValueType::Uint64.size_of(), Some(8));
		assert_eq!(ValueType::String.size_of(), None);
	}

	#[test]
	fn size_valid_accepts_any_for_dynamic() {
		assert!(ValueType::String.size_valid(0));
		assert!(ValueType::String.size_valid(123));
		assert!(!ValueType::Uint32.size_valid(3));
	}

	#[test]
	fn compare_uint32_is_unsigned() {
		let a = 1u32.to_le_bytes();
		let b = 0xffff_fffeu32.to_le_bytes();
		assert_eq!(ValueType::Uint32.compare(&a, &b), Ordering::Less);
	}

	#[test]
	fn compare_int32_is_twos_complement() {
		let neg = (-1i32).to_le_bytes();
		let pos = 1i32.to_le_bytes();
		assert_eq!(ValueType::Int32.compare(&neg, &pos), Ordering::Less);
	}

	#[test]
	fn compare_string_is_lexicographic() {
		assert_eq!(ValueType::String.compare(b"abc", b"abd"), Ordering::Less);
	}

	#[test]
	fn round_trip_tag() {
		for t in &[
			ValueType::Uint32, ValueType::String, ValueType::Int32, ValueType::Uint64,
			ValueType::Int64, ValueType::Float, ValueType::Double, ValueType::Hash,
		] {
			assert_eq!(ValueType::from_u32(t.as_u32()), Some(*t));
		}
		assert_eq!(ValueType::from_u32(99), None);
	}
}
