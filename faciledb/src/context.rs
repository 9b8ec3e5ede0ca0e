//! Context Layer (`spec.md` §4.6 in `SPEC_FULL.md`, §9): process-wide
//! initialization/teardown plus the one-slot set and index caches.
//!
//! `spec.md` §9 licenses either a global singleton with the §5 state machine,
//! or a single explicit object threaded through the API. The teacher never
//! reaches for a process-global static anywhere (`Database` is a plain struct
//! the caller owns), so `Context` follows that precedent: an explicit,
//! interior-mutable object rather than a `static`/`OnceLock` singleton. Its
//! `status` mutex still implements the `unused -> initializing -> ready ->
//! closing -> unused` machine, since a `Context` can be shared across threads
//! (typically via `Arc`) and `close` can race with in-flight operations.

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

use error::{ErrorKind, Result};
use index::node::IndexIdType;
use index::IndexHandle;
use options::{InternalOptions, Options};
use set_file::{self, SetHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
	Ready,
	Closing,
	Unused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexKey {
	set_name: Vec<u8>,
	record_key: Vec<u8>,
	index_id_type: IndexIdType,
}

/// The process-wide handle: one open set, one open index, both evicted and
/// reopened on a name/key mismatch (`spec.md` §3.7).
pub struct Context {
	status: Mutex<Status>,
	directory: PathBuf,
	options: InternalOptions,
	set_slot: Mutex<Option<SetHandle>>,
	index_slot: Mutex<Option<(IndexKey, IndexHandle)>>,
}

fn evict_set(slot: &mut Option<SetHandle>) {
	if let Some(handle) = slot.take() {
		handle.gate().close_wait();
		handle.gate().mark_released();
	}
}

fn evict_index(slot: &mut Option<(IndexKey, IndexHandle)>) {
	if let Some((_, handle)) = slot.take() {
		handle.gate().close_wait();
		handle.gate().mark_released();
	}
}

impl Context {
	/// Creates (or re-enters) the process-wide context rooted at `directory`.
	pub fn init<P: AsRef<Path>>(directory: P, options: Options) -> Result<Context> {
		let options = InternalOptions::from_external(options)?;
		let directory = directory.as_ref().to_path_buf();
		fs::create_dir_all(&directory)?;
		Ok(Context {
			status: Mutex::new(Status::Ready),
			directory,
			options,
			set_slot: Mutex::new(None),
			index_slot: Mutex::new(None),
		})
	}

	/// Drains and evicts both cache slots and marks the context `Unused`.
	/// Idempotent: closing an already-closed or already-closing context is a
	/// no-op (`spec.md` §6.3: "double-init is ignored" applies symmetrically
	/// to close).
	pub fn close(&self) -> Result<()> {
		let mut status = self.status.lock();
		if *status != Status::Ready {
			return Ok(());
		}
		*status = Status::Closing;
		evict_set(&mut self.set_slot.lock());
		evict_index(&mut self.index_slot.lock());
		*status = Status::Unused;
		Ok(())
	}

	fn ensure_ready(&self) -> Result<()> {
		if *self.status.lock() != Status::Ready {
			bail!(ErrorKind::NotReady);
		}
		Ok(())
	}

	pub fn options(&self) -> &InternalOptions {
		&self.options
	}

	/// `spec.md` §4.3.5 doesn't require opening the file to answer this —
	/// existence alone is enough, and failing `ensure_ready` degrades to
	/// `false` per §7's "return empty/zero from all API entry points".
	pub fn set_exists(&self, set_name: &[u8]) -> bool {
		if self.ensure_ready().is_err() {
			return false;
		}
		set_file::set_path(&self.directory, set_name).exists()
	}

	/// Runs `f` against the cached handle for `set_name`, loading or
	/// creating it first and evicting a differently-named occupant.
	pub fn with_set<F, R>(&self, set_name: &[u8], f: F) -> Result<R>
		where F: FnOnce(&mut SetHandle) -> Result<R> {
		self.ensure_ready()?;
		let mut slot = self.set_slot.lock();
		let stale = match slot.as_ref() {
			Some(handle) => handle.set_name() != set_name,
			None => true,
		};
		if stale {
			evict_set(&mut slot);
			let handle = SetHandle::load_or_create(&self.directory, set_name, self.options.external.block_payload_size)?;
			*slot = Some(handle);
		}
		f(slot.as_mut().expect("just inserted or already present"))
	}

	/// Runs `f` against the cached index handle for `(set_name, record_key)`
	/// if one already exists on disk; `Ok(None)` if it doesn't — callers
	/// must not create one implicitly here (`spec.md` §4.3.1 step 7).
	pub fn with_index_if_exists<F, R>(&self, set_name: &[u8], record_key: &[u8], id_type: IndexIdType, f: F) -> Result<Option<R>>
		where F: FnOnce(&mut IndexHandle) -> Result<R> {
		self.ensure_ready()?;
		let key = IndexKey { set_name: set_name.to_vec(), record_key: record_key.to_vec(), index_id_type: id_type };
		let mut slot = self.index_slot.lock();
		let stale = match slot.as_ref() {
			Some((k, _)) => *k != key,
			None => true,
		};
		if stale {
			evict_index(&mut slot);
			match IndexHandle::open_existing(&self.directory, set_name, record_key, self.options.external.index_order, id_type)? {
				Some(handle) => *slot = Some((key, handle)),
				None => return Ok(None),
			}
		}
		let (_, handle) = slot.as_mut().expect("just inserted or already present");
		Ok(Some(f(handle)?))
	}

	/// Runs `f` against the cached index handle for `(set_name, record_key)`,
	/// creating it (one empty root leaf) if it does not exist yet — used by
	/// `make_record_index` (`spec.md` §4.4.4).
	pub fn with_index_create<F, R>(&self, set_name: &[u8], record_key: &[u8], id_type: IndexIdType, f: F) -> Result<R>
		where F: FnOnce(&mut IndexHandle) -> Result<R> {
		self.ensure_ready()?;
		let key = IndexKey { set_name: set_name.to_vec(), record_key: record_key.to_vec(), index_id_type: id_type };
		let mut slot = self.index_slot.lock();
		let stale = match slot.as_ref() {
			Some((k, _)) => *k != key,
			None => true,
		};
		if stale {
			evict_index(&mut slot);
			let handle = IndexHandle::load_or_create(&self.directory, set_name, record_key, self.options.external.index_order, id_type)?;
			*slot = Some((key, handle));
		}
		let (_, handle) = slot.as_mut().expect("just inserted or already present");
		f(handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempdir::TempDir;

	#[test]
	fn set_exists_false_before_first_touch() {
		let dir = TempDir::new("faciledb-ctx").unwrap();
		let ctx = Context::init(dir.path(), Options::default()).unwrap();
		assert!(!ctx.set_exists(b"s"));
	}

	#[test]
	fn operations_short_circuit_after_close() {
		let dir = TempDir::new("faciledb-ctx").unwrap();
		let ctx = Context::init(dir.path(), Options::default()).unwrap();
		ctx.close().unwrap();
		assert!(!ctx.set_exists(b"s"));
		assert!(ctx.with_set(b"s", |_| Ok(())).is_err());
	}

	#[test]
	fn double_close_is_a_no_op() {
		let dir = TempDir::new("faciledb-ctx").unwrap();
		let ctx = Context::init(dir.path(), Options::default()).unwrap();
		ctx.close().unwrap();
		ctx.close().unwrap();
	}
}
