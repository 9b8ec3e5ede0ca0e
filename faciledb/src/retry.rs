//! The create-or-open-with-bounded-retry dance shared by the Set File Layer
//! (`spec.md` §4.3.5) and the Index Engine's node file (`spec.md` §4.4.3):
//! attempt an exclusive create; on `EEXIST`, a concurrent creator may still be
//! writing its header, so open and re-read until the header settles, bounded
//! by a small number of attempts.

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use error::Result;

const MAX_ATTEMPTS: u32 = 50;
const RETRY_DELAY: Duration = Duration::from_millis(20);

/// Tries `create` first; if that fails because the file already exists,
/// repeatedly calls `open` (re-reading the header each time) until `validate`
/// accepts it. Any other I/O error from either step is propagated. A header
/// that never settles within `MAX_ATTEMPTS` means the peer that created the
/// file is stuck or crashed mid-write — `spec.md`'s error table classifies
/// this as fatal (a bug or crashed peer), not a recoverable condition, so we
/// panic rather than return an `Err` a caller could paper over.
pub fn create_or_open<T, C, O, V>(path: &Path, mut create: C, mut open: O, validate: V) -> Result<T>
	where C: FnMut() -> io::Result<T>, O: FnMut() -> io::Result<T>, V: Fn(&T) -> bool {

	match create() {
		Ok(v) => return Ok(v),
		Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists => {}
		Err(e) => return Err(e.into()),
	}

	for _ in 0..MAX_ATTEMPTS {
		match open() {
			Ok(v) => {
				if validate(&v) {
					return Ok(v);
				}
			}
			Err(e) => return Err(e.into()),
		}
		thread::sleep(RETRY_DELAY);
	}

	panic!("header at {} did not settle after {} attempts; peer creator is stuck or crashed", path.display(), MAX_ATTEMPTS)
}
