//! B+-tree search and insertion over an `IndexFile` (`spec.md` §4.4.1-§4.4.2).
//! Both are iterative: split propagation and leaf-chain search walk parent/
//! sibling links rather than recursing, per `spec.md` §9's explicit
//! recursion-to-iteration note.

use error::Result;
use index::file::IndexFile;
use index::node::{IndexPayload, Node};

/// Descends from the root to the leaf that would contain `id`, routing at
/// each internal node to the child covering the smallest element `>= id`.
fn descend_to_leaf(idx: &mut IndexFile, id: &[u8]) -> Result<Node> {
	let mut node = idx.read_node(idx.root_tag())?;
	while !node.is_leaf() {
		let pos = node.elements.iter().position(|(eid, _)| eid.as_slice() >= id).unwrap_or(node.elements.len());
		let child_tag = node.child_tag[pos];
		node = idx.read_node(child_tag)?;
	}
	Ok(node)
}

/// Equality search: all payloads whose index id equals `id`, in the order
/// the leaf chain presents them. Matching elements may straddle adjacent
/// leaves; the walk follows `next_tag` until the run of equal ids ends.
pub fn search_equal(idx: &mut IndexFile, id: &[u8]) -> Result<Vec<IndexPayload>> {
	let mut node = descend_to_leaf(idx, id)?;
	let mut pos = node.elements.iter().position(|(eid, _)| eid.as_slice() >= id).unwrap_or(node.elements.len());
	let mut results = Vec::new();

	loop {
		if pos >= node.elements.len() {
			if node.next_tag == 0 {
				break;
			}
			node = idx.read_node(node.next_tag)?;
			pos = 0;
			continue;
		}
		let (ref eid, payload) = node.elements[pos];
		if eid.as_slice() != id {
			break;
		}
		results.push(payload);
		pos += 1;
	}

	Ok(results)
}

/// Inserts `(id, payload)`, splitting nodes bottom-up as needed
/// (`spec.md` §4.4.2).
pub fn insert(idx: &mut IndexFile, id: Vec<u8>, payload: IndexPayload) -> Result<()> {
	let mut current = descend_to_leaf(idx, &id)?;
	let pos = current.elements.iter().position(|(eid, _)| eid.as_slice() > id.as_slice()).unwrap_or(current.elements.len());
	current.elements.insert(pos, (id, payload));

	loop {
		if current.elements.len() <= idx.order {
			idx.write_node(&current)?;
			return Ok(());
		}

		let is_leaf = current.is_leaf();
		let first_half_size = (idx.order + 1) / 2;
		let mut all_elements = ::std::mem::replace(&mut current.elements, Vec::new());
		let second_half = all_elements.split_off(first_half_size);

		let (promoted_id, sibling_elements) = if is_leaf {
			(second_half[0].0.clone(), second_half)
		} else {
			let mut second_half = second_half;
			let promoted = second_half.remove(0);
			(promoted.0, second_half)
		};

		let sibling_tag = idx.allocate_tag()?;
		let mut sibling = Node::empty(sibling_tag, current.level);
		sibling.elements = sibling_elements;
		sibling.parent_tag = current.parent_tag;

		current.elements = all_elements;

		if is_leaf {
			sibling.next_tag = current.next_tag;
			current.next_tag = sibling_tag;
		} else {
			let split_children_at = first_half_size + 1;
			let mut all_children = ::std::mem::replace(&mut current.child_tag, Vec::new());
			let sibling_children = all_children.split_off(split_children_at);
			current.child_tag = all_children;
			for &child_tag in &sibling_children {
				let mut child = idx.read_node(child_tag)?;
				child.parent_tag = sibling_tag;
				idx.write_node(&child)?;
			}
			sibling.child_tag = sibling_children;
		}

		idx.write_node(&current)?;
		idx.write_node(&sibling)?;

		if current.parent_tag == 0 {
			let new_root_tag = idx.allocate_tag()?;
			let mut root = Node::empty(new_root_tag, current.level + 1);
			root.child_tag = vec![current.tag, sibling.tag];
			root.elements.push((promoted_id, IndexPayload::zero()));

			current.parent_tag = new_root_tag;
			sibling.parent_tag = new_root_tag;
			idx.write_node(&current)?;
			idx.write_node(&sibling)?;
			idx.write_node(&root)?;
			idx.set_root_tag(new_root_tag);
			idx.write_header()?;
			return Ok(());
		}

		let mut parent = idx.read_node(current.parent_tag)?;
		let ppos = parent.elements.iter().position(|(eid, _)| eid.as_slice() > promoted_id.as_slice()).unwrap_or(parent.elements.len());
		parent.elements.insert(ppos, (promoted_id, IndexPayload::zero()));
		parent.child_tag.insert(ppos + 1, sibling.tag);
		current = parent;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use index::node::IndexIdType;
	use tempdir::TempDir;

	fn payload(n: u64) -> IndexPayload {
		IndexPayload { data_tag: n, start_block_tag: n }
	}

	#[test]
	fn search_on_empty_tree_is_empty() {
		let dir = TempDir::new("faciledb-tree").unwrap();
		let mut idx = IndexFile::load_or_create(dir.path(), b"s", b"k", 3, IndexIdType::Uint32).unwrap();
		let id = 5u32.to_le_bytes().to_vec();
		assert!(search_equal(&mut idx, &id).unwrap().is_empty());
	}

	#[test]
	fn insert_then_search_round_trips() {
		let dir = TempDir::new("faciledb-tree").unwrap();
		let mut idx = IndexFile::load_or_create(dir.path(), b"s", b"k", 3, IndexIdType::Uint32).unwrap();
		let id = 42u32.to_le_bytes().to_vec();
		insert(&mut idx, id.clone(), payload(1)).unwrap();
		let found = search_equal(&mut idx, &id).unwrap();
		assert_eq!(found, vec![payload(1)]);
	}

	#[test]
	fn many_inserts_force_splits_and_stay_searchable() {
		let dir = TempDir::new("faciledb-tree").unwrap();
		// order 3 forces splits quickly.
		let mut idx = IndexFile::load_or_create(dir.path(), b"s", b"k", 3, IndexIdType::Uint32).unwrap();
		for i in 0..40u32 {
			insert(&mut idx, i.to_le_bytes().to_vec(), payload(u64::from(i))).unwrap();
		}
		for i in 0..40u32 {
			let found = search_equal(&mut idx, &i.to_le_bytes()).unwrap();
			assert_eq!(found, vec![payload(u64::from(i))], "missing key {}", i);
		}
	}

	#[test]
	fn duplicate_ids_all_returned() {
		let dir = TempDir::new("faciledb-tree").unwrap();
		let mut idx = IndexFile::load_or_create(dir.path(), b"s", b"k", 3, IndexIdType::Uint32).unwrap();
		let id = 7u32.to_le_bytes().to_vec();
		for i in 0..10u64 {
			insert(&mut idx, id.clone(), payload(i)).unwrap();
		}
		let mut found = search_equal(&mut idx, &id).unwrap();
		found.sort_by_key(|p| p.data_tag);
		let expected: Vec<_> = (0..10).map(payload).collect();
		assert_eq!(found, expected);
	}
}
