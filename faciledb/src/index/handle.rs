//! Pairs an `IndexFile` with its Concurrency Gate, the same way `set_file`
//! pairs `SetFile` with one (`spec.md` §4.5 applies identically to index
//! handles).

use fs2::FileExt;
use std::path::Path;

use error::Result;
use gate::Gate;
use index::file::IndexFile;
use index::node::{IndexIdType, IndexPayload};
use index::tree;

pub struct IndexHandle {
	file: IndexFile,
	gate: Gate,
}

impl IndexHandle {
	pub fn load_or_create(directory: &Path, set_name: &[u8], record_key: &[u8], order: usize, id_type: IndexIdType) -> Result<IndexHandle> {
		let file = IndexFile::load_or_create(directory, set_name, record_key, order, id_type)?;
		Ok(IndexHandle { file, gate: Gate::new() })
	}

	/// `None` when no index exists yet for this key — callers must not
	/// create one implicitly (`spec.md` §4.3.1 step 7, §4.4.4).
	pub fn open_existing(directory: &Path, set_name: &[u8], record_key: &[u8], order: usize, id_type: IndexIdType) -> Result<Option<IndexHandle>> {
		Ok(IndexFile::open_existing(directory, set_name, record_key, order, id_type)?.map(|file| IndexHandle { file, gate: Gate::new() }))
	}

	pub fn gate(&self) -> &Gate {
		&self.gate
	}

	pub fn insert(&mut self, id: Vec<u8>, payload: IndexPayload) -> Result<()> {
		{
			let file = self.file.raw_file();
			self.gate.write_wait_with(|| file.lock_exclusive())?;
		}
		let result = tree::insert(&mut self.file, id, payload);
		{
			let file = self.file.raw_file();
			self.gate.write_unblock_with(|| file.unlock())?;
		}
		result
	}

	pub fn search_equal(&mut self, id: &[u8]) -> Result<Vec<IndexPayload>> {
		{
			let file = self.file.raw_file();
			self.gate.read_wait_with(|| file.lock_shared())?;
		}
		let result = tree::search_equal(&mut self.file, id);
		{
			let file = self.file.raw_file();
			self.gate.read_unblock_with(|| file.unlock())?;
		}
		result
	}
}
