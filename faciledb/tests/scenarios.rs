//! End-to-end scenarios driven entirely through the public `Context`/`api`
//! surface, as opposed to the `set_file`/`index` unit tests that exercise the
//! block- and node-level internals directly.

extern crate faciledb;
extern crate tempdir;

use faciledb::{Context, DataItem, Options, Record, ValueType};
use tempdir::TempDir;

fn uint32(key: &[u8], v: u32) -> Record {
	Record::new(key.to_vec(), v.to_le_bytes().to_vec(), ValueType::Uint32)
}

fn string(key: &[u8], v: &[u8]) -> Record {
	Record::new(key.to_vec(), v.to_vec(), ValueType::String)
}

#[test]
fn scenario_d_search_after_three_inserts() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();

	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 2), uint32(b"b", 3)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1), uint32(b"b", 2), uint32(b"c", 3)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1)])).unwrap();

	let hits = faciledb::search_equal(&ctx, b"accounts", &uint32(b"a", 1)).unwrap();
	let mut tags: Vec<_> = hits.iter().map(|h| h.meta.data_tag).collect();
	tags.sort();
	assert_eq!(tags, vec![1, 3, 4]);
}

#[test]
fn scenario_e_delete_by_probe_leaves_other_chains_intact() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();

	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"b", 3)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1), uint32(b"b", 3)])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"c", 9)])).unwrap();

	let deleted = faciledb::delete_equal(&ctx, b"accounts", &uint32(b"b", 3)).unwrap();
	assert_eq!(deleted, 2);

	let hits = faciledb::search_equal(&ctx, b"accounts", &uint32(b"a", 1)).unwrap();
	assert_eq!(hits.len(), 1, "the a=1,b=3 chain was deleted but the standalone a=1 chain was not");
}

#[test]
fn scenario_f_index_accelerated_search_covers_pre_and_post_index_inserts() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();

	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1), string(b"b", b"bb")])).unwrap();
	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1), string(b"b", b"bb")])).unwrap();

	assert!(faciledb::make_record_index(&ctx, b"accounts", b"a", ValueType::Uint32).unwrap());

	faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 2)])).unwrap();

	let hits = faciledb::search_equal(&ctx, b"accounts", &uint32(b"a", 2)).unwrap();
	assert_eq!(hits.len(), 1);

	// The two pre-existing a=1 data items are untouched by indexing a.
	let hits_a1 = faciledb::search_equal(&ctx, b"accounts", &uint32(b"a", 1)).unwrap();
	assert_eq!(hits_a1.len(), 2);
}

#[test]
fn a_set_persists_across_close_and_reopen() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	{
		let ctx = Context::init(dir.path(), Options::default()).unwrap();
		faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 42)])).unwrap();
		ctx.close().unwrap();
	}

	let ctx = Context::init(dir.path(), Options::default()).unwrap();
	assert!(ctx.set_exists(b"accounts"));
	let hits = faciledb::search_equal(&ctx, b"accounts", &uint32(b"a", 42)).unwrap();
	assert_eq!(hits.len(), 1);
}

#[test]
fn switching_between_two_sets_evicts_and_reloads_the_cached_handle() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();

	faciledb::insert(&ctx, b"first", &DataItem::new(vec![uint32(b"a", 1)])).unwrap();
	faciledb::insert(&ctx, b"second", &DataItem::new(vec![uint32(b"a", 2)])).unwrap();
	faciledb::insert(&ctx, b"first", &DataItem::new(vec![uint32(b"a", 1)])).unwrap();

	let hits = faciledb::search_equal(&ctx, b"first", &uint32(b"a", 1)).unwrap();
	assert_eq!(hits.len(), 2);
	let hits = faciledb::search_equal(&ctx, b"second", &uint32(b"a", 2)).unwrap();
	assert_eq!(hits.len(), 1);
}

#[test]
fn search_on_a_set_that_was_never_created_returns_empty() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();
	assert!(!ctx.set_exists(b"nope"));
	let hits = faciledb::search_equal(&ctx, b"nope", &uint32(b"a", 1)).unwrap();
	assert!(hits.is_empty());
}

#[test]
fn operations_after_close_return_not_ready() {
	let dir = TempDir::new("faciledb-scenarios").unwrap();
	let ctx = Context::init(dir.path(), Options::default()).unwrap();
	ctx.close().unwrap();
	let result = faciledb::insert(&ctx, b"accounts", &DataItem::new(vec![uint32(b"a", 1)]));
	assert!(result.is_err());
}
