//! Ordered bucket tree: a binary search tree of file records keyed by name.
//!
//! Nodes live in a flat arena and link to each other by index, so inserting,
//! traversing and dropping never recurse, even when sorted input degenerates
//! the tree into a list.

use crate::record::FileRecord;

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    record: FileRecord,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Binary search tree over [`FileRecord`]s ordered by filename.
///
/// Names strictly less than a node's name go left; equal or greater names go
/// right. Records with the same name therefore all end up in the right
/// subtree, in insertion order, and in-order traversal yields every one of
/// them.
#[derive(Debug, Clone, Default)]
pub struct BucketTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl BucketTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, comparing names byte-lexicographically.
    pub fn insert(&mut self, record: FileRecord) {
        let id = NodeId(self.nodes.len());

        match self.root {
            None => self.root = Some(id),
            Some(mut current) => loop {
                let node = &mut self.nodes[current.0];
                let child = if record.name() < node.record.name() {
                    &mut node.left
                } else {
                    &mut node.right
                };

                match *child {
                    Some(next) => current = next,
                    None => {
                        *child = Some(id);
                        break;
                    }
                }
            },
        }

        self.nodes.push(Node {
            record,
            left: None,
            right: None,
        });
    }

    /// Iterate records in ascending name order.
    ///
    /// Each call starts a fresh walk from the root.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            cursor: self.root,
            remaining: self.nodes.len(),
        }
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of the sizes of all records.
    pub fn total_size(&self) -> u64 {
        self.nodes.iter().map(|n| n.record.size()).sum()
    }

    /// Check whether a record with this name is present.
    pub fn contains_name(&self, name: &str) -> bool {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            match name.cmp(node.record.name()) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => cursor = node.left,
                std::cmp::Ordering::Greater => cursor = node.right,
            }
        }
        false
    }
}

impl<'a> IntoIterator for &'a BucketTree {
    type Item = &'a FileRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`BucketTree`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    nodes: &'a [Node],
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FileRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.nodes[id.0].left;
        }

        let nodes = self.nodes;
        let id = self.stack.pop()?;
        let node = &nodes[id.0];
        self.cursor = node.right;
        self.remaining -= 1;
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
