//! Per-set and per-index configuration, split into the user-facing `Options`
//! and the validated, derived `InternalOptions` the rest of the crate works
//! with — mirrors the teacher's `Options`/`InternalOptions` split.

use error::{ErrorKind, Result};

/// User-facing set configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
	/// Bytes of record payload available per block. The test scenarios in
	/// `spec.md` use 50; production sets default to the original build's 1028.
	pub block_payload_size: usize,
	/// B+-tree branching factor (`order`, at least 3) used by indices created
	/// for this set.
	pub index_order: usize,
}

impl Default for Options {
	fn default() -> Self {
		Options {
			block_payload_size: 1028,
			index_order: 5,
		}
	}
}

/// Validated options, plus values derived once so hot paths don't recompute
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalOptions {
	pub external: Options,
}

impl InternalOptions {
	pub fn from_external(external: Options) -> Result<Self> {
		if external.block_payload_size < ::record::HEADER_SIZE {
			bail!(ErrorKind::InvalidOptions(
				"block_payload_size",
				format!(
					"{} is smaller than the record header size ({})",
					external.block_payload_size,
					::record::HEADER_SIZE,
				)
			));
		}

		if external.index_order < 3 {
			bail!(ErrorKind::InvalidOptions(
				"index_order",
				format!("{} is below the minimum branching factor of 3", external.index_order)
			));
		}

		Ok(InternalOptions { external })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_tiny_payload() {
		let opts = Options { block_payload_size: 4, index_order: 5 };
		assert!(InternalOptions::from_external(opts).is_err());
	}

	#[test]
	fn rejects_small_order() {
		let opts = Options { block_payload_size: 1028, index_order: 2 };
		assert!(InternalOptions::from_external(opts).is_err());
	}

	#[test]
	fn accepts_defaults() {
		assert!(InternalOptions::from_external(Options::default()).is_ok());
	}
}
