//! Concurrency Gate (`spec.md` §4.5): the single-writer / multi-reader
//! admission state machine shared by set handles and index handles, plus the
//! in-process bookkeeping needed to layer an advisory cross-process file lock
//! underneath it correctly (file lock taken after the in-process admission
//! decision, released before the admission release signals peers).

use parking_lot::{Condvar, Mutex};
use std::io;

/// The gate's state machine. `Starting` and `Released` bracket a handle's
/// life before it is admitted into the cache and after it is evicted; the
/// gate itself only transitions among the other four once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Starting,
	Ready,
	Reading,
	Writing,
	Closing,
	Released,
}

struct Inner {
	status: Status,
	reader_count: u32,
	reader_waiting: u32,
	writer_waiting: u32,
}

/// A per-handle admission gate: one mutex, three condition variables.
pub struct Gate {
	inner: Mutex<Inner>,
	read_cond: Condvar,
	write_cond: Condvar,
	close_cond: Condvar,
}

impl Gate {
	/// A gate for a handle that has just finished loading and is about to be
	/// admitted into a cache slot.
	pub fn new() -> Gate {
		Gate {
			inner: Mutex::new(Inner { status: Status::Ready, reader_count: 0, reader_waiting: 0, writer_waiting: 0 }),
			read_cond: Condvar::new(),
			write_cond: Condvar::new(),
			close_cond: Condvar::new(),
		}
	}

	pub fn status(&self) -> Status {
		self.inner.lock().status
	}

	/// Blocks until write admission is granted, then runs `lock_file` while
	/// still holding the gate — guaranteeing no other in-process thread can
	/// observe `Writing` status before the file lock is actually held.
	pub fn write_wait_with<F: FnOnce() -> io::Result<()>>(&self, lock_file: F) -> io::Result<()> {
		let mut g = self.inner.lock();
		g.writer_waiting += 1;
		while g.status != Status::Ready {
			self.write_cond.wait(&mut g);
		}
		g.writer_waiting -= 1;
		g.status = Status::Writing;
		lock_file()
	}

	/// Runs `unlock_file` while still holding the gate, then releases write
	/// admission and wakes the next waiter (writers, then readers, then a
	/// closer, in that priority order).
	pub fn write_unblock_with<F: FnOnce() -> io::Result<()>>(&self, unlock_file: F) -> io::Result<()> {
		let mut g = self.inner.lock();
		let result = unlock_file();
		g.status = Status::Ready;
		if g.writer_waiting > 0 {
			self.write_cond.notify_one();
		} else if g.reader_waiting > 0 {
			self.read_cond.notify_all();
		} else {
			self.close_cond.notify_one();
		}
		result
	}

	/// Blocks until read admission is granted. `lock_shared` runs only when
	/// this caller is the first concurrent reader (the one responsible for
	/// taking the shared file lock).
	pub fn read_wait_with<F: FnOnce() -> io::Result<()>>(&self, lock_shared: F) -> io::Result<()> {
		let mut g = self.inner.lock();
		g.reader_waiting += 1;
		while !(g.status == Status::Reading || (g.status == Status::Ready && g.writer_waiting == 0)) {
			self.read_cond.wait(&mut g);
		}
		g.reader_waiting -= 1;
		g.reader_count += 1;
		g.status = Status::Reading;
		if g.reader_count == 1 {
			lock_shared()
		} else {
			Ok(())
		}
	}

	/// Releases read admission. `unlock_shared` runs only when this caller is
	/// the last concurrent reader, before any waiter is woken.
	pub fn read_unblock_with<F: FnOnce() -> io::Result<()>>(&self, unlock_shared: F) -> io::Result<()> {
		let mut g = self.inner.lock();
		g.reader_count -= 1;
		let result = if g.reader_count == 0 {
			g.status = Status::Ready;
			unlock_shared()
		} else {
			Ok(())
		};
		if g.writer_waiting > 0 {
			self.write_cond.notify_one();
		} else if g.reader_waiting == 0 {
			self.close_cond.notify_one();
		}
		result
	}

	/// Blocks until the handle is quiescent (ready, no readers, no waiters),
	/// then marks it closing. Used when evicting a handle from the one-slot
	/// cache.
	pub fn close_wait(&self) {
		let mut g = self.inner.lock();
		while !(g.status == Status::Ready && g.reader_count == 0 && g.reader_waiting == 0 && g.writer_waiting == 0) {
			self.close_cond.wait(&mut g);
		}
		g.status = Status::Closing;
	}

	/// Marks the handle fully released. No further admission calls are valid
	/// on a gate in this state; the handle is about to be dropped.
	pub fn mark_released(&self) {
		self.inner.lock().status = Status::Released;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::thread;

	#[test]
	fn single_writer_excludes_concurrent_writer() {
		let gate = Arc::new(Gate::new());
		let counter = Arc::new(AtomicUsize::new(0));

		let mut handles = Vec::new();
		for _ in 0..8 {
			let gate = gate.clone();
			let counter = counter.clone();
			handles.push(thread::spawn(move || {
				gate.write_wait_with(|| Ok(())).unwrap();
				let before = counter.fetch_add(1, Ordering::SeqCst);
				assert_eq!(before, 0, "overlapping writers observed");
				thread::yield_now();
				counter.fetch_sub(1, Ordering::SeqCst);
				gate.write_unblock_with(|| Ok(())).unwrap();
			}));
		}
		for h in handles {
			h.join().unwrap();
		}
	}

	#[test]
	fn first_and_last_reader_flags() {
		let gate = Gate::new();
		let mut first_calls = 0;
		gate.read_wait_with(|| { first_calls += 1; Ok(()) }).unwrap();
		gate.read_wait_with(|| { first_calls += 1; Ok(()) }).unwrap();
		assert_eq!(first_calls, 1);

		let mut last_calls = 0;
		gate.read_unblock_with(|| Ok(())).unwrap();
		gate.read_unblock_with(|| { last_calls += 1; Ok(()) }).unwrap();
		assert_eq!(last_calls, 1);
		assert_eq!(gate.status(), Status::Ready);
	}

	#[test]
	fn close_wait_only_proceeds_when_quiescent() {
		let gate = Gate::new();
		gate.write_wait_with(|| Ok(())).unwrap();
		gate.write_unblock_with(|| Ok(())).unwrap();
		gate.close_wait();
		assert_eq!(gate.status(), Status::Closing);
	}
}
