//! The public operations (`spec.md` §6.3): `insert`, `search_equal`,
//! `delete_equal`, `make_record_index`. Each dispatches through the
//! `Context`'s caches to the Set File Layer, consulting the Index Engine when
//! an index exists for the probed/inserted key.

use context::Context;
use error::{ErrorKind, Result};
use index::node::{index_id_for_value, IndexIdType, IndexPayload};
use record::{DataItem, Record};
use set_file::{CompareMode, SearchHit};
use value_type::ValueType;

fn validate_probe(probe: &Record) -> Result<()> {
	if !probe.value_type.size_valid(probe.value.len()) {
		bail!(ErrorKind::InvalidInput(format!(
			"probe value of size {} is invalid for {:?}", probe.value.len(), probe.value_type
		)));
	}
	Ok(())
}

/// Inserts `data_item` into `set_name`, updating any index that already
/// exists for each record's key (`spec.md` §4.3.1 step 7). Returns the
/// number of data items accepted — always 1 on success, since this design
/// (unlike a batch API) either accepts the whole item or rejects it.
pub fn insert(ctx: &Context, set_name: &[u8], data_item: &DataItem) -> Result<u32> {
	let inserted = ctx.with_set(set_name, |set| set.insert(data_item))?;

	for record in &data_item.records {
		let id_type = IndexIdType::for_value_type(record.value_type);
		let (_, id_bytes) = index_id_for_value(&record.value, record.value_type);
		let payload = IndexPayload { data_tag: inserted.data_tag, start_block_tag: inserted.first_block_tag };
		ctx.with_index_if_exists(set_name, &record.key, id_type, |idx| idx.insert(id_bytes, payload))?;
	}

	Ok(1)
}

/// Equality search (`spec.md` §4.3.3): goes through the index for
/// `(set_name, probe.key)` when one exists, else falls back to a full scan.
/// Indexed hits are re-validated against the chain's live tombstone — the
/// "scan-validation step" `spec.md` §9 names for stale index entries left by
/// a prior delete.
pub fn search_equal(ctx: &Context, set_name: &[u8], probe: &Record) -> Result<Vec<SearchHit>> {
	validate_probe(probe)?;
	let id_type = IndexIdType::for_value_type(probe.value_type);
	let (_, id_bytes) = index_id_for_value(&probe.value, probe.value_type);

	let indexed = ctx.with_index_if_exists(set_name, &probe.key, id_type, |idx| idx.search_equal(&id_bytes))?;

	match indexed {
		Some(payloads) => {
			let mut hits = Vec::new();
			ctx.with_set(set_name, |set| {
				for payload in &payloads {
					let (meta, records) = set.reconstruct(payload.start_block_tag)?;
					if meta.deleted {
						continue;
					}
					hits.push(SearchHit { meta, records });
				}
				Ok(())
			})?;
			Ok(hits)
		}
		None => ctx.with_set(set_name, |set| set.search_equal(probe, CompareMode::Equal)),
	}
}

/// Equality delete (`spec.md` §4.3.4): same lookup as `search_equal`, then
/// tombstones each matching chain.
pub fn delete_equal(ctx: &Context, set_name: &[u8], probe: &Record) -> Result<u32> {
	validate_probe(probe)?;
	let id_type = IndexIdType::for_value_type(probe.value_type);
	let (_, id_bytes) = index_id_for_value(&probe.value, probe.value_type);

	let indexed = ctx.with_index_if_exists(set_name, &probe.key, id_type, |idx| idx.search_equal(&id_bytes))?;

	match indexed {
		Some(payloads) => {
			let mut count = 0u32;
			ctx.with_set(set_name, |set| {
				for payload in &payloads {
					let (meta, _) = set.reconstruct(payload.start_block_tag)?;
					if meta.deleted {
						continue;
					}
					set.delete_chain(payload.start_block_tag)?;
					count += 1;
				}
				Ok(())
			})?;
			Ok(count)
		}
		None => ctx.with_set(set_name, |set| set.delete_equal(probe, CompareMode::Equal)),
	}
}

/// Builds a secondary index over `(set_name, record_key)` for `value_type`,
/// bulk-populating it from a full scan if it doesn't exist yet
/// (`spec.md` §4.4.4). A no-op returning `true` if the index is already
/// present — this call is how an index starts existing, not how it's kept in
/// sync afterward (`insert` does that).
pub fn make_record_index(ctx: &Context, set_name: &[u8], record_key: &[u8], value_type: ValueType) -> Result<bool> {
	let id_type = IndexIdType::for_value_type(value_type);

	let already_exists = ctx.with_index_if_exists(set_name, record_key, id_type, |_| Ok(()))?.is_some();
	if already_exists {
		return Ok(true);
	}

	// Probe mode `Any`: only key and value_type need to match, the value
	// itself is a placeholder (`spec.md` §4.4.4's bulk population scan).
	let probe = Record::new(record_key.to_vec(), Vec::new(), value_type);
	let hits = ctx.with_set(set_name, |set| set.scan_search(&probe, CompareMode::Any))?;

	ctx.with_index_create(set_name, record_key, id_type, |idx| {
		for hit in &hits {
			for record in &hit.records {
				if record.key == record_key && record.value_type == value_type {
					let (_, id_bytes) = index_id_for_value(&record.value, record.value_type);
					let payload = IndexPayload { data_tag: hit.meta.data_tag, start_block_tag: hit.meta.first_block_tag };
					idx.insert(id_bytes, payload)?;
				}
			}
		}
		Ok(())
	})?;

	Ok(true)
}
