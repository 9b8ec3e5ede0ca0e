//! The Index Engine (`spec.md` §4.4): a leaf-linked B+-tree keyed on a
//! record's index id, one file per `(set, record key)` pair.

pub mod file;
pub mod handle;
pub mod node;
pub mod tree;

pub use self::file::{index_path, IndexFile, IndexHeader};
pub use self::handle::IndexHandle;
pub use self::node::{hash32, index_id_for_value, Element, IndexIdType, IndexPayload, Node};
pub use self::tree::{insert, search_equal};
