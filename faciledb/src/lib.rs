//! FacileDB: an embedded, file-backed record store.
//!
//! A **set** is a named collection persisted as one file. Into a set a
//! client inserts **data items** — ordered lists of **records**, each a
//! typed key/value pair — and later finds or deletes every data item that
//! contains a record matching a given `(key, value)` probe.
//!
//! ```text
//! set file: header | block 1 | block 2 | block 3 | ...
//!                     \________________/
//!                      one data item's chain
//! ```
//!
//! A data item occupies a chain of fixed-size blocks; records are packed
//! back to back inside a chain and may straddle a block boundary. Deleting a
//! data item tombstones every block of its chain rather than reclaiming the
//! space.
//!
//! A secondary index — a leaf-linked B+-tree, one file per
//! `(set name, record key)` pair — can accelerate equality search once built
//! with [`make_record_index`]; `insert` keeps an existing index up to date.
//!
//! All of this is mediated by [`Context`], which owns the one-slot set and
//! index caches and the single-writer/multi-reader admission gate each
//! cached handle carries.

#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate error_chain;
extern crate fs2;
extern crate itertools;
extern crate parking_lot;
extern crate tiny_keccak;
#[cfg(test)]
#[macro_use]
extern crate matches;
#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate tempdir;

mod api;
mod block;
mod context;
mod error;
mod gate;
mod index;
mod options;
mod record;
mod retry;
mod set_file;
mod value_type;

pub use api::{delete_equal, insert, make_record_index, search_equal};
pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use index::node::IndexIdType;
pub use options::Options;
pub use record::{DataItem, Header as RecordHeader, Record};
pub use set_file::{ChainMeta, CompareMode, SearchHit};
pub use value_type::ValueType;
