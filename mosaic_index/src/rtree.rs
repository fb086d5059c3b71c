// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed R-tree with quadratic splits and condensing deletes.
//!
//! Nodes live in a slot vector and refer to each other by [`NodeId`]; a node's
//! parent is a plain index, so the child → parent → child cycle never turns into
//! an ownership cycle. Leaves sit at height 1 and hold [`Record`]s; every other
//! node holds child node ids one level below it.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::error::IndexError;
use crate::types::{Bounds, Scalar};

/// Default maximum number of children per node.
pub const DEFAULT_MAX_CAPACITY: usize = 9;

/// A leaf entry: a bounding box and an opaque payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record<T, P> {
    /// The indexed box.
    pub bounds: Bounds<T>,
    /// The caller's handle for whatever occupies `bounds`.
    pub payload: P,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Clone, Debug)]
enum Children<T, P> {
    Records(SmallVec<[Record<T, P>; 10]>),
    Nodes(SmallVec<[NodeId; 10]>),
}

impl<T, P> Children<T, P> {
    fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Nodes(nodes) => nodes.len(),
        }
    }
}

#[derive(Clone, Debug)]
struct Node<T, P> {
    /// `None` only while the node has no children.
    bounds: Option<Bounds<T>>,
    height: usize,
    parent: Option<NodeId>,
    children: Children<T, P>,
}

impl<T, P> Node<T, P> {
    fn leaf(parent: Option<NodeId>) -> Self {
        Self {
            bounds: None,
            height: 1,
            parent,
            children: Children::Records(SmallVec::new()),
        }
    }
}

/// Entries left behind by an underfilled node during condensing.
enum Orphan<T, P> {
    Record(Record<T, P>),
    Node(NodeId),
}

/// An R-tree over [`Bounds`] with payloads of type `P`.
///
/// ## Example
///
/// ```
/// use mosaic_index::{Bounds, RTree};
///
/// let mut tree: RTree<i64, u32> = RTree::new();
/// tree.insert(Bounds::new(0, 10, 0, 10), 1);
/// tree.insert(Bounds::new(20, 30, 0, 10), 2);
///
/// let hits = tree.search(Bounds::point(5, 5));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].payload, 1);
///
/// assert_eq!(tree.delete(Bounds::new(0, 10, 0, 10)), Some(1));
/// assert!(tree.search(Bounds::point(5, 5)).is_empty());
/// ```
pub struct RTree<T, P> {
    nodes: Vec<Option<Node<T, P>>>,
    free_list: Vec<usize>,
    root: NodeId,
    len: usize,
    max_capacity: usize,
    min_capacity: usize,
}

impl<T: Debug, P> Debug for RTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        let root = self.nodes[self.root.0].as_ref();
        f.debug_struct("RTree")
            .field("len", &self.len)
            .field("height", &root.map(|n| n.height))
            .field("root_bounds", &root.and_then(|n| n.bounds.as_ref()))
            .field("live_nodes", &live)
            .field("max_capacity", &self.max_capacity)
            .field("min_capacity", &self.min_capacity)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P: Copy> Default for RTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Copy> RTree<T, P> {
    /// Create an empty tree holding at most [`DEFAULT_MAX_CAPACITY`] children per node.
    pub fn new() -> Self {
        Self::build(DEFAULT_MAX_CAPACITY)
    }

    /// Create an empty tree holding at most `max_capacity` children per node.
    ///
    /// Non-root nodes hold at least `ceil(max_capacity / 2)` children.
    /// A capacity below 2 cannot split and is rejected.
    pub fn with_capacity(max_capacity: usize) -> Result<Self, IndexError> {
        if max_capacity < 2 {
            return Err(IndexError::CapacityTooSmall {
                capacity: max_capacity,
            });
        }
        Ok(Self::build(max_capacity))
    }

    fn build(max_capacity: usize) -> Self {
        Self {
            nodes: alloc::vec![Some(Node::leaf(None))],
            free_list: Vec::new(),
            root: NodeId(0),
            len: 0,
            max_capacity,
            min_capacity: max_capacity.div_ceil(2),
        }
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; a tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        self.node(self.root).height
    }

    /// Maximum number of children per node.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Minimum number of children per non-root node.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// The box covering every record, or `None` for an empty tree.
    pub fn root_bounds(&self) -> Option<Bounds<T>> {
        self.node(self.root).bounds
    }

    /// Reset to an empty root, dropping every record.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.nodes.push(Some(Node::leaf(None)));
        self.root = NodeId(0);
        self.len = 0;
    }

    /// Insert a record. Zero-area boxes are allowed.
    pub fn insert(&mut self, bounds: Bounds<T>, payload: P) {
        self.insert_record(Record { bounds, payload });
        self.len += 1;
    }

    /// Remove the first record whose bounds equal `bounds` exactly.
    ///
    /// Returns the removed payload, or `None` (and leaves the tree untouched)
    /// when no record matches.
    pub fn delete(&mut self, bounds: Bounds<T>) -> Option<P> {
        self.delete_matching(bounds, |_| true)
    }

    /// Remove the record with exactly these bounds and an equal payload.
    ///
    /// Use this when several records may share the same bounds.
    pub fn delete_entry(&mut self, bounds: Bounds<T>, payload: &P) -> Option<P>
    where
        P: PartialEq,
    {
        self.delete_matching(bounds, |p| p == payload)
    }

    /// Collect every record whose bounds intersect or contain `query`.
    ///
    /// The order of the results is unspecified.
    pub fn search(&self, query: Bounds<T>) -> Vec<Record<T, P>> {
        let mut out = Vec::new();
        self.visit(query, |r| out.push(*r));
        out
    }

    /// Visit every record whose bounds intersect or contain `query` without
    /// allocating result storage.
    pub fn visit<F: FnMut(&Record<T, P>)>(&self, query: Bounds<T>, mut f: F) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            match &self.node(id).children {
                Children::Records(records) => records
                    .iter()
                    .filter(|r| r.bounds.intersects(&query))
                    .for_each(&mut f),
                Children::Nodes(children) => stack.extend(
                    children
                        .iter()
                        .copied()
                        .filter(|c| self.bounds_of(*c).intersects(&query)),
                ),
            }
        }
    }

    /// Iterate over every record in the tree.
    pub fn records(&self) -> impl Iterator<Item = &Record<T, P>> + '_ {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.node(id).children {
                Children::Records(records) => out.extend(records.iter()),
                Children::Nodes(children) => stack.extend(children.iter().copied()),
            }
        }
        out.into_iter()
    }

    /// Check every structural invariant of the tree.
    ///
    /// - each node's bounds are the minimal box covering its children,
    /// - every node holds at most `max_capacity` children and every non-root
    ///   node at least `min_capacity`,
    /// - leaves sit at height 1 and each child sits one level below its parent,
    /// - parent links point back at the holding node,
    /// - the leaves hold exactly [`len`](Self::len) records.
    pub fn validate(&self) -> Result<(), IndexError> {
        let root = self.node(self.root);
        if root.parent.is_some() {
            return Err(IndexError::ParentLink {
                height: root.height,
            });
        }
        let mut found = 0;
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            let count = node.children.len();
            let under = id != self.root && count < self.min_capacity;
            if count > self.max_capacity || under {
                return Err(IndexError::Fill {
                    height: node.height,
                    count,
                    min: self.min_capacity,
                    max: self.max_capacity,
                });
            }
            if node.bounds != self.cover(&node.children) {
                return Err(IndexError::StaleBounds {
                    height: node.height,
                });
            }
            match &node.children {
                Children::Records(records) => {
                    if node.height != 1 {
                        return Err(IndexError::Height {
                            parent: node.height,
                            child: 0,
                        });
                    }
                    found += records.len();
                }
                Children::Nodes(children) => {
                    for &child in children {
                        let c = self.node(child);
                        if c.height + 1 != node.height {
                            return Err(IndexError::Height {
                                parent: node.height,
                                child: c.height,
                            });
                        }
                        if c.parent != Some(id) {
                            return Err(IndexError::ParentLink {
                                height: node.height,
                            });
                        }
                        stack.push(child);
                    }
                }
            }
        }
        if found != self.len {
            return Err(IndexError::RecordCount {
                expected: self.len,
                found,
            });
        }
        Ok(())
    }

    // --- arena ---

    fn node(&self, id: NodeId) -> &Node<T, P> {
        self.nodes[id.0]
            .as_ref()
            .expect("r-tree invariant violated: reference to a freed node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T, P> {
        self.nodes[id.0]
            .as_mut()
            .expect("r-tree invariant violated: reference to a freed node")
    }

    fn alloc(&mut self, node: Node<T, P>) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            NodeId(idx)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    fn free(&mut self, id: NodeId) -> Node<T, P> {
        let node = self.nodes[id.0]
            .take()
            .expect("r-tree invariant violated: double free");
        self.free_list.push(id.0);
        node
    }

    fn bounds_of(&self, id: NodeId) -> Bounds<T> {
        self.node(id)
            .bounds
            .expect("r-tree invariant violated: non-root node without children")
    }

    fn cover(&self, children: &Children<T, P>) -> Option<Bounds<T>> {
        match children {
            Children::Records(records) => Bounds::union_all(records.iter().map(|r| r.bounds)),
            Children::Nodes(nodes) => Bounds::union_all(nodes.iter().map(|&c| self.bounds_of(c))),
        }
    }

    fn recompute(&mut self, id: NodeId) {
        let bounds = self.cover(&self.node(id).children);
        self.node_mut(id).bounds = bounds;
    }

    /// Grow `id` and its ancestors so they cover `bounds`.
    fn extend_upward(&mut self, mut id: NodeId, bounds: Bounds<T>) {
        loop {
            let node = self.node_mut(id);
            node.bounds = Some(node.bounds.map_or(bounds, |b| b.union(&bounds)));
            match node.parent {
                Some(parent) => id = parent,
                None => return,
            }
        }
    }

    // --- insertion ---

    fn insert_record(&mut self, record: Record<T, P>) {
        let leaf = self.choose_node(&record.bounds, 1);
        match &mut self.node_mut(leaf).children {
            Children::Records(records) => records.push(record),
            Children::Nodes(_) => unreachable!("choose_node(.., 1) always lands on a leaf"),
        }
        self.extend_upward(leaf, record.bounds);
        self.split_upward(leaf);
    }

    /// Hang an orphaned subtree back under a node one level above it.
    fn reinsert_subtree(&mut self, child: NodeId) {
        let bounds = self.bounds_of(child);
        let height = self.node(child).height;
        let target = self.choose_node(&bounds, height + 1);
        match &mut self.node_mut(target).children {
            Children::Nodes(nodes) => nodes.push(child),
            Children::Records(_) => unreachable!("subtrees never hang under a leaf"),
        }
        self.node_mut(child).parent = Some(target);
        self.extend_upward(target, bounds);
        self.split_upward(target);
    }

    /// Walk down from the root to the best node at `height`.
    ///
    /// At each level the child needing the least enlargement wins; ties go to the
    /// smaller area, then to the child with fewer children.
    fn choose_node(&self, bounds: &Bounds<T>, height: usize) -> NodeId {
        let mut id = self.root;
        loop {
            let node = self.node(id);
            if node.height <= height {
                return id;
            }
            let Children::Nodes(children) = &node.children else {
                return id;
            };
            let best = children.iter().copied().min_by(|&a, &b| {
                let (ba, bb) = (self.bounds_of(a), self.bounds_of(b));
                partial(ba.enlargement(bounds), bb.enlargement(bounds))
                    .then_with(|| partial(ba.area(), bb.area()))
                    .then_with(|| {
                        let (na, nb) = (self.node(a), self.node(b));
                        na.children.len().cmp(&nb.children.len())
                    })
            });
            match best {
                Some(next) => id = next,
                None => return id,
            }
        }
    }

    /// Split overflowing nodes from `id` up to the root, growing the tree when the root splits.
    fn split_upward(&mut self, mut id: NodeId) {
        while self.node(id).children.len() > self.max_capacity {
            let sibling = self.split(id);
            match self.node(id).parent {
                Some(parent) => {
                    match &mut self.node_mut(parent).children {
                        Children::Nodes(nodes) => nodes.push(sibling),
                        Children::Records(_) => unreachable!("a leaf never parents a node"),
                    }
                    self.recompute(parent);
                    id = parent;
                }
                None => {
                    let height = self.node(id).height + 1;
                    let mut children = SmallVec::new();
                    children.push(id);
                    children.push(sibling);
                    let root = self.alloc(Node {
                        bounds: None,
                        height,
                        parent: None,
                        children: Children::Nodes(children),
                    });
                    self.node_mut(id).parent = Some(root);
                    self.node_mut(sibling).parent = Some(root);
                    self.recompute(root);
                    self.root = root;
                    tracing::trace!(height, "r-tree root split");
                    return;
                }
            }
        }
    }

    /// Quadratic split: `id` keeps one group, a new sibling at the same height takes the other.
    fn split(&mut self, id: NodeId) -> NodeId {
        let node = self.node_mut(id);
        let height = node.height;
        let parent = node.parent;
        let children = core::mem::replace(&mut node.children, Children::Nodes(SmallVec::new()));
        let (keep, moved) = match children {
            Children::Records(records) => {
                let boxes: Vec<_> = records.iter().map(|r| r.bounds).collect();
                let (a, b) = quadratic_partition(&boxes, self.min_capacity);
                (
                    Children::Records(a.iter().map(|&i| records[i]).collect()),
                    Children::Records(b.iter().map(|&i| records[i]).collect()),
                )
            }
            Children::Nodes(nodes) => {
                let boxes: Vec<_> = nodes.iter().map(|&c| self.bounds_of(c)).collect();
                let (a, b) = quadratic_partition(&boxes, self.min_capacity);
                (
                    Children::Nodes(a.iter().map(|&i| nodes[i]).collect()),
                    Children::Nodes(b.iter().map(|&i| nodes[i]).collect()),
                )
            }
        };
        self.node_mut(id).children = keep;
        let sibling = self.alloc(Node {
            bounds: None,
            height,
            parent,
            children: moved,
        });
        let adopted: SmallVec<[NodeId; 10]> = match &self.node(sibling).children {
            Children::Nodes(nodes) => nodes.clone(),
            Children::Records(_) => SmallVec::new(),
        };
        for child in adopted {
            self.node_mut(child).parent = Some(sibling);
        }
        self.recompute(id);
        self.recompute(sibling);
        sibling
    }

    // --- deletion ---

    fn delete_matching(&mut self, bounds: Bounds<T>, mut accept: impl FnMut(&P) -> bool) -> Option<P> {
        let (leaf, pos) = self.find_record(&bounds, &mut accept)?;
        let removed = match &mut self.node_mut(leaf).children {
            Children::Records(records) => records.remove(pos),
            Children::Nodes(_) => unreachable!("find_record only returns leaves"),
        };
        self.len -= 1;
        self.condense(leaf);
        Some(removed.payload)
    }

    /// Depth-first search for a record with exactly `bounds`, descending only
    /// into nodes that contain it.
    fn find_record(
        &self,
        bounds: &Bounds<T>,
        accept: &mut impl FnMut(&P) -> bool,
    ) -> Option<(NodeId, usize)> {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            match &self.node(id).children {
                Children::Records(records) => {
                    if let Some(pos) = records
                        .iter()
                        .position(|r| r.bounds == *bounds && accept(&r.payload))
                    {
                        return Some((id, pos));
                    }
                }
                Children::Nodes(children) => stack.extend(
                    children
                        .iter()
                        .copied()
                        .filter(|&c| self.bounds_of(c).contains(bounds)),
                ),
            }
        }
        None
    }

    /// Remove underfilled nodes from `leaf` up to the root and reinsert what they held.
    fn condense(&mut self, leaf: NodeId) {
        let mut orphans: Vec<Orphan<T, P>> = Vec::new();
        let mut id = leaf;
        while let Some(parent) = self.node(id).parent {
            if self.node(id).children.len() < self.min_capacity {
                if let Children::Nodes(nodes) = &mut self.node_mut(parent).children {
                    nodes.retain(|c| *c != id);
                }
                match self.free(id).children {
                    Children::Records(records) => {
                        orphans.extend(records.into_iter().map(Orphan::Record));
                    }
                    Children::Nodes(nodes) => orphans.extend(nodes.into_iter().map(Orphan::Node)),
                }
            } else {
                self.recompute(id);
            }
            id = parent;
        }
        self.recompute(id);

        if !orphans.is_empty() {
            tracing::trace!(count = orphans.len(), "r-tree reinserting orphans");
        }
        for orphan in orphans {
            match orphan {
                Orphan::Record(record) => self.insert_record(record),
                Orphan::Node(child) => self.reinsert_subtree(child),
            }
        }
        self.shrink_root();
    }

    /// Drop internal roots with a single child; an emptied tree gets a fresh leaf root.
    fn shrink_root(&mut self) {
        if self.len == 0 {
            self.clear();
            return;
        }
        loop {
            let only_child = match &self.node(self.root).children {
                Children::Nodes(nodes) if nodes.len() == 1 => nodes[0],
                _ => return,
            };
            self.free(self.root);
            self.node_mut(only_child).parent = None;
            self.root = only_child;
            tracing::trace!(height = self.height(), "r-tree root shrunk");
        }
    }
}

/// Quadratic split of `boxes` into two groups of indices.
///
/// The two entries that would waste the most area together seed the groups.
/// Each remaining entry joins the group needing the least enlargement, ties
/// going to the smaller group area and then to the group with fewer members.
/// A group that needs every remaining entry to reach `min` gets them all.
fn quadratic_partition<T: Scalar>(boxes: &[Bounds<T>], min: usize) -> (Vec<usize>, Vec<usize>) {
    debug_assert!(boxes.len() >= 2, "cannot split fewer than two entries");
    let (s1, s2) = pick_seeds(boxes);
    let mut a = alloc::vec![s1];
    let mut b = alloc::vec![s2];
    let mut a_box = boxes[s1];
    let mut b_box = boxes[s2];

    let rest: Vec<usize> = (0..boxes.len()).filter(|&i| i != s1 && i != s2).collect();
    let mut remaining = rest.len();
    for i in rest {
        let entry = &boxes[i];
        let to_a = if a.len() + remaining <= min {
            true
        } else if b.len() + remaining <= min {
            false
        } else {
            match partial(a_box.enlargement(entry), b_box.enlargement(entry)) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => match partial(a_box.area(), b_box.area()) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => a.len() <= b.len(),
                },
            }
        };
        if to_a {
            a.push(i);
            a_box = a_box.union(entry);
        } else {
            b.push(i);
            b_box = b_box.union(entry);
        }
        remaining -= 1;
    }
    (a, b)
}

/// The pair of entries wasting the most area when covered together. First maximum wins.
fn pick_seeds<T: Scalar>(boxes: &[Bounds<T>]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut worst = boxes[0].waste(&boxes[1]);
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            let waste = boxes[i].waste(&boxes[j]);
            if waste > worst {
                worst = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

fn partial<A: PartialOrd>(a: A, b: A) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(i: i64) -> Bounds<i64> {
        // Disjoint 10x10 cells on a 7-wide grid with 5 units of gap.
        let (x, y) = ((i % 7) * 15, (i / 7) * 15);
        Bounds::from_xywh(x, y, 10, 10)
    }

    #[test]
    fn capacity_below_two_is_rejected() {
        let err = RTree::<i64, u32>::with_capacity(1).unwrap_err();
        assert_eq!(err, IndexError::CapacityTooSmall { capacity: 1 });
        assert!(RTree::<i64, u32>::with_capacity(2).is_ok());
    }

    #[test]
    fn min_capacity_rounds_up() {
        let tree = RTree::<i64, u32>::with_capacity(9).unwrap();
        assert_eq!(tree.min_capacity(), 5);
        let tree = RTree::<i64, u32>::with_capacity(4).unwrap();
        assert_eq!(tree.min_capacity(), 2);
    }

    #[test]
    fn root_splits_and_grows() {
        let mut tree = RTree::<i64, u32>::with_capacity(4).unwrap();
        for i in 0..5 {
            tree.insert(cell(i), i as u32);
        }
        assert_eq!(tree.height(), 2);
        tree.validate().unwrap();
        for i in 5..60 {
            tree.insert(cell(i), i as u32);
            tree.validate().unwrap();
        }
        assert!(tree.height() >= 3);
        assert_eq!(tree.len(), 60);
        assert_eq!(tree.records().count(), 60);
    }

    #[test]
    fn search_finds_touching_and_containing_records() {
        let mut tree = RTree::<i64, u32>::with_capacity(4).unwrap();
        for i in 0..30 {
            tree.insert(cell(i), i as u32);
        }
        // A point inside cell 8 (x 15..25, y 15..25).
        let hits = tree.search(Bounds::point(20, 20));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload, 8);

        // The right edge of cell 0 touches x = 10.
        let hits = tree.search(Bounds::point(10, 0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload, 0);

        // A window spanning cells 0, 1, 7, 8.
        let mut hits: Vec<u32> = tree
            .search(Bounds::new(5, 20, 5, 20))
            .iter()
            .map(|r| r.payload)
            .collect();
        hits.sort_unstable();
        assert_eq!(hits, [0, 1, 7, 8]);

        assert!(tree.search(Bounds::point(12, 12)).is_empty());
    }

    #[test]
    fn zero_area_records_are_indexed() {
        let mut tree = RTree::<f64, u8>::new();
        tree.insert(Bounds::point(3.0, 4.0), 7);
        assert_eq!(tree.search(Bounds::point(3.0, 4.0))[0].payload, 7);
        assert_eq!(tree.delete(Bounds::point(3.0, 4.0)), Some(7));
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_requires_exact_bounds() {
        let mut tree = RTree::<i64, u32>::new();
        tree.insert(Bounds::new(0, 10, 0, 10), 1);
        assert_eq!(tree.delete(Bounds::new(0, 9, 0, 10)), None);
        assert_eq!(tree.delete(Bounds::new(2, 3, 2, 3)), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.delete(Bounds::new(0, 10, 0, 10)), Some(1));
    }

    #[test]
    fn delete_entry_picks_the_matching_payload() {
        let mut tree = RTree::<i64, u32>::new();
        let b = Bounds::new(0, 10, 0, 10);
        tree.insert(b, 1);
        tree.insert(b, 2);
        assert_eq!(tree.delete_entry(b, &2), Some(2));
        let left: Vec<u32> = tree.records().map(|r| r.payload).collect();
        assert_eq!(left, [1]);
        assert_eq!(tree.delete_entry(b, &2), None);
    }

    #[test]
    fn condense_keeps_invariants_and_shrinks() {
        let mut tree = RTree::<i64, u32>::with_capacity(4).unwrap();
        for i in 0..40 {
            tree.insert(cell(i), i as u32);
        }
        for i in (0..40).rev().step_by(3) {
            assert_eq!(tree.delete(cell(i)), Some(i as u32));
            tree.validate().unwrap();
        }
        for i in 0..40 {
            tree.delete(cell(i));
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.root_bounds(), None);
    }

    #[test]
    fn emptied_tree_matches_a_fresh_one() {
        let mut tree = RTree::<i64, u32>::with_capacity(3).unwrap();
        for i in 0..25 {
            tree.insert(cell(i), i as u32);
        }
        for i in 0..25 {
            tree.delete(cell(i));
        }
        let fresh = RTree::<i64, u32>::with_capacity(3).unwrap();
        assert_eq!(tree.len(), fresh.len());
        assert_eq!(tree.height(), fresh.height());
        assert_eq!(tree.root_bounds(), fresh.root_bounds());
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn clear_resets_root() {
        let mut tree = RTree::<i64, u32>::with_capacity(2).unwrap();
        for i in 0..10 {
            tree.insert(cell(i), i as u32);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.search(Bounds::new(-100, 1000, -100, 1000)).is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn seeds_are_the_most_wasteful_pair() {
        let boxes = [
            Bounds::new(0, 1, 0, 1),
            Bounds::new(1, 2, 0, 1),
            Bounds::new(50, 51, 50, 51),
        ];
        assert_eq!(pick_seeds(&boxes), (0, 2));
    }

    #[test]
    fn partition_respects_minimum_fill() {
        // Four clustered boxes and one outlier: the outlier's group must still reach min.
        let boxes = [
            Bounds::new(0, 1, 0, 1),
            Bounds::new(1, 2, 0, 1),
            Bounds::new(0, 1, 1, 2),
            Bounds::new(1, 2, 1, 2),
            Bounds::new(90, 91, 90, 91),
        ];
        let (a, b) = quadratic_partition(&boxes, 2);
        assert!(a.len() >= 2 && b.len() >= 2, "{a:?} / {b:?}");
        assert_eq!(a.len() + b.len(), boxes.len());
    }
}
