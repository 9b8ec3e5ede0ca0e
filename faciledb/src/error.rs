#![allow(unknown_lints)]
#![allow(missing_docs)]

use std::io;
use std::path::PathBuf;

error_chain! {
	foreign_links {
		Io(io::Error);
	}

	errors {
		/// A public API entry point was called while the process-wide context
		/// was not in the `Ready` state.
		NotReady {
			description("FacileDB context is not ready")
			display("FacileDB context is not ready"),
		}
		/// A supplied value did not satisfy the declared size of its value type,
		/// or a structural argument (empty data item, unknown value type) was invalid.
		InvalidInput(msg: String) {
			description("Invalid input")
			display("Invalid input: {}", msg),
		}
		/// An on-disk structure failed a basic structural check while being read.
		Corrupt(msg: String) {
			description("Corrupt on-disk structure")
			display("Corrupt on-disk structure: {}", msg),
		}
		/// A feature or parameter combination this build does not implement.
		Unsupported(msg: String) {
			description("Unsupported operation")
			display("Unsupported: {}", msg),
		}
		InvalidOptions(field: &'static str, reason: String) {
			description("Invalid options were provided")
			display("Invalid value of `{}`: {}", field, reason),
		}
		SetLocked(path: PathBuf) {
			description("Set file lock is currently held")
			display("Could not acquire set file lock: {}.", path.display()),
		}
		IndexLocked(path: PathBuf) {
			description("Index file lock is currently held")
			display("Could not acquire index file lock: {}.", path.display()),
		}
	}
}

impl PartialEq for ErrorKind {
	fn eq(&self, other: &Self) -> bool {
		use self::ErrorKind::*;

		match (self, other) {
			(&NotReady, &NotReady) => true,
			(&InvalidInput(ref a), &InvalidInput(ref b)) if a == b => true,
			(&Corrupt(ref a), &Corrupt(ref b)) if a == b => true,
			(&Unsupported(ref a), &Unsupported(ref b)) if a == b => true,
			(&InvalidOptions(f1, ref a), &InvalidOptions(f2, ref b)) if f1 == f2 && a == b => true,
			(&SetLocked(ref a), &SetLocked(ref b)) if a == b => true,
			(&IndexLocked(ref a), &IndexLocked(ref b)) if a == b => true,
			_ => false,
		}
	}
}
