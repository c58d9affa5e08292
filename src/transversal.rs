//! Incremental minimal transversals of a hypergraph (Demetrovics–Thi).
//!
//! Edges arrive one at a time. For each new edge `E` the current family `Tr` is split into the
//! members that hit `E` (kept) and those that miss it (`Bi`). Every `X ∈ Bi` is extended by each
//! `e ∈ E`, and the extension survives unless it contains a kept member. Before any edge the
//! family is `{∅}`.

use std::mem;

use crate::trie::{ItemsetTrie, Node};
use crate::types::{ItemId, Itemset};

/// Size limit that never discards anything.
pub const UNBOUNDED: usize = usize::MAX;

/// Largest admissible transversal length is `limit - 1` where `limit = universe - reach`:
/// a longer transversal complements to fewer than `reach + 1` items.
pub fn size_limit(universe: usize, reach: usize) -> usize {
    universe.saturating_sub(reach)
}

#[derive(Debug, Clone)]
pub struct MinimalTransversals {
    universe: usize,
    family: ItemsetTrie,
    /// The empty transversal of the empty hypergraph.
    holds_empty: bool,
    /// Transversals whose complement has already been classified. Extensions containing one of
    /// them are never generated again.
    retired: ItemsetTrie,
    retired_empty: bool,
    edges: usize,
}

impl MinimalTransversals {
    pub fn new(universe: usize) -> Self {
        MinimalTransversals {
            universe,
            family: ItemsetTrie::new(),
            holds_empty: true,
            retired: ItemsetTrie::new(),
            retired_empty: false,
            edges: 0,
        }
    }

    /// Minimal transversals of `edges`, with no size limit.
    pub fn of_hypergraph(edges: &ItemsetTrie, universe: usize) -> Self {
        Self::dualize(edges, universe, UNBOUNDED)
    }

    /// Minimal transversals of `edges` shorter than `limit`.
    pub fn dualize(edges: &ItemsetTrie, universe: usize, limit: usize) -> Self {
        let mut transversals = Self::new(universe);
        transversals.enforce_limit(limit);
        for (edge, _) in edges {
            transversals.add_edge_bounded(&edge, limit);
        }
        transversals
    }

    pub fn edges(&self) -> usize {
        self.edges
    }

    pub fn len(&self) -> usize {
        self.family.len() + self.holds_empty as usize
    }

    pub fn is_empty(&self) -> bool {
        !self.holds_empty && self.family.is_empty()
    }

    pub fn family(&self) -> &ItemsetTrie {
        &self.family
    }

    pub fn to_vec(&self) -> Vec<Itemset> {
        let mut transversals = Vec::with_capacity(self.len());
        if self.holds_empty {
            transversals.push(Vec::new());
        }
        transversals.extend(self.family.iter().map(|(itemset, _)| itemset));
        transversals
    }

    pub fn add_edge(&mut self, edge: &[ItemId]) {
        self.add_edge_bounded(edge, UNBOUNDED);
    }

    /// Adds one edge, discarding transversals of `limit` items or more.
    pub fn add_edge_bounded(&mut self, edge: &[ItemId], limit: usize) {
        self.edges += 1;

        let mut disjoint = Vec::new();
        let mut path = Vec::new();
        let removed = split_disjoint(
            &mut self.family.root,
            edge,
            false,
            &mut path,
            limit,
            &mut disjoint,
        );
        self.family.adjust(-(removed as isize));
        if mem::take(&mut self.holds_empty) && 1 < limit {
            disjoint.push(Vec::new());
        }

        let mut extended = ItemsetTrie::new();
        for base in &disjoint {
            for &item in edge {
                let candidate = with_item(base, item);
                if self.family.any_subset_of(&candidate) || self.is_retired(&candidate) {
                    continue;
                }
                extended.insert(&candidate, 0);
            }
        }
        self.family.merge(extended);
    }

    /// Drops transversals that reach `limit`, then adds every edge of `edges`.
    pub fn absorb(&mut self, edges: ItemsetTrie, limit: usize) {
        self.enforce_limit(limit);
        for (edge, _) in &edges {
            self.add_edge_bounded(&edge, limit);
        }
    }

    pub fn enforce_limit(&mut self, limit: usize) {
        if limit == 0 {
            self.family = ItemsetTrie::new();
            self.holds_empty = false;
        } else {
            self.family.drop_longer_than(limit - 1);
        }
    }

    /// Moves `transversal` out of the family so it is neither complemented nor regenerated.
    pub fn retire(&mut self, transversal: &[ItemId]) -> bool {
        if transversal.is_empty() {
            let held = mem::take(&mut self.holds_empty);
            self.retired_empty |= held;
            return held;
        }
        let removed = self.family.remove(transversal);
        if removed {
            self.retired.insert(transversal, 0);
        }
        removed
    }

    fn is_retired(&self, candidate: &[ItemId]) -> bool {
        self.retired_empty || self.retired.any_subset_of(candidate)
    }

    /// Complement of every transversal. The empty transversal yields the whole universe.
    pub fn candidates(&self) -> ItemsetTrie {
        let mut candidates = self.family.complement(self.universe);
        if self.holds_empty && self.universe > 0 {
            let everything: Itemset = (0..self.universe).collect();
            candidates.insert(&everything, 0);
        }
        candidates
    }
}

fn with_item(base: &[ItemId], item: ItemId) -> Itemset {
    let mut itemset = Vec::with_capacity(base.len() + 1);
    let at = base.partition_point(|&x| x < item);
    itemset.extend_from_slice(&base[..at]);
    itemset.push(item);
    itemset.extend_from_slice(&base[at..]);
    itemset
}

/// Removes members that miss `edge` (or reach `limit`) from the subtree, collecting the
/// extendable ones into `disjoint`. Returns the number of members removed.
fn split_disjoint(
    node: &mut Node,
    edge: &[ItemId],
    hit: bool,
    path: &mut Itemset,
    limit: usize,
    disjoint: &mut Vec<Itemset>,
) -> usize {
    let mut removed = 0;
    node.children.retain(|&id, child| {
        path.push(id);
        let rest = &edge[edge.partition_point(|&item| item < id)..];
        let hit = hit || rest.first() == Some(&id);

        if path.len() >= limit {
            removed += child.clear_below();
            if child.unmark() {
                removed += 1;
            }
        } else {
            if !hit && child.unmark() {
                if path.len() + 1 < limit {
                    disjoint.push(path.clone());
                }
                removed += 1;
            }
            if !(hit && limit == UNBOUNDED) {
                removed += split_disjoint(child, rest, hit, path, limit, disjoint);
            }
        }

        path.pop();
        child.stored || !child.is_leaf()
    });
    node.refresh_height();
    removed
}
