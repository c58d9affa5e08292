//! Subset generation and pruning.
//!
//! All of these recurse into a child first and decide afterwards whether it must go: a node
//! survives while it is stored or still has children.

use super::{ItemsetTrie, Node};
use crate::types::{ItemId, Itemset};

impl ItemsetTrie {
    /// Keeps only the itemsets of exactly `level` items. Returns the remaining cardinality.
    pub fn prune_nodes(&mut self, level: usize) -> usize {
        let removed = keep_level(&mut self.root, 0, level);
        self.len -= removed;
        self.len
    }

    /// Inserts every `size`-combination of `itemset` with support 0.
    pub fn gen_subsets(&mut self, itemset: &[ItemId], size: usize) {
        if size == 0 || size > itemset.len() {
            return;
        }
        let gained = insert_combinations(&mut self.root, itemset, size);
        self.adjust(gained);
    }

    /// Removes every stored subset of `itemset` that has exactly `size` items.
    pub fn del_subsets(&mut self, itemset: &[ItemId], size: usize) -> usize {
        if size == 0 || size > itemset.len() {
            return 0;
        }
        let removed = remove_combinations(&mut self.root, itemset, size);
        self.len -= removed;
        removed
    }

    /// All `size`-subsets of the stored itemsets.
    pub fn subsets_of_size(&self, size: usize) -> ItemsetTrie {
        let mut subsets = ItemsetTrie::new();
        for (itemset, _) in self.iter() {
            subsets.gen_subsets(&itemset, size);
        }
        subsets
    }

    /// Removes every stored subset of `itemset`, whatever its size, and returns them.
    pub fn remove_subsets_of(&mut self, itemset: &[ItemId]) -> Vec<Itemset> {
        let mut evicted = Vec::new();
        let mut path = Vec::with_capacity(itemset.len());
        evict_subsets(&mut self.root, itemset, &mut path, &mut evicted);
        self.len -= evicted.len();
        evicted
    }

    /// Removes every stored itemset contained in some itemset of `cover`.
    pub fn prune_covered_by(&mut self, cover: &ItemsetTrie) -> usize {
        if cover.is_empty() {
            return 0;
        }
        let mut path = Vec::new();
        let removed = prune_covered(&mut self.root, &mut path, cover);
        self.len -= removed;
        removed
    }
}

fn keep_level(node: &mut Node, depth: usize, level: usize) -> usize {
    let mut removed = 0;
    node.children.retain(|_, child| {
        let depth = depth + 1;
        if depth >= level {
            removed += child.clear_below();
            if depth > level && child.unmark() {
                removed += 1;
            }
        } else {
            if child.unmark() {
                removed += 1;
            }
            removed += keep_level(child, depth, level);
        }
        child.stored || !child.is_leaf()
    });
    node.refresh_height();
    removed
}

fn insert_combinations(node: &mut Node, items: &[ItemId], size: usize) -> isize {
    let mut gained = 0;
    for pos in (0..=items.len() - size).rev() {
        let child = node.children.entry(items[pos]).or_default();
        if size == 1 {
            if !child.stored {
                child.stored = true;
                child.support = 0;
                gained += 1;
            }
        } else {
            gained += insert_combinations(child, &items[pos + 1..], size - 1);
        }
    }
    node.refresh_height();
    gained
}

fn remove_combinations(node: &mut Node, items: &[ItemId], size: usize) -> usize {
    let mut removed = 0;
    for pos in (0..=items.len() - size).rev() {
        let id = items[pos];
        let child = match node.children.get_mut(&id) {
            Some(child) => child,
            None => continue,
        };
        if size == 1 {
            if child.unmark() {
                removed += 1;
            }
        } else {
            removed += remove_combinations(child, &items[pos + 1..], size - 1);
        }
        if !child.stored && child.is_leaf() {
            node.children.remove(&id);
        }
    }
    node.refresh_height();
    removed
}

fn evict_subsets(node: &mut Node, items: &[ItemId], path: &mut Itemset, evicted: &mut Vec<Itemset>) {
    let mut cursor = 0;
    node.children.retain(|&id, child| {
        while cursor < items.len() && items[cursor] < id {
            cursor += 1;
        }
        if cursor == items.len() || items[cursor] != id {
            return true;
        }
        path.push(id);
        if child.unmark() {
            evicted.push(path.clone());
        }
        if !child.is_leaf() {
            evict_subsets(child, &items[cursor + 1..], path, evicted);
        }
        path.pop();
        !child.is_leaf()
    });
    node.refresh_height();
}

fn prune_covered(node: &mut Node, path: &mut Itemset, cover: &ItemsetTrie) -> usize {
    let mut removed = 0;
    node.children.retain(|&id, child| {
        path.push(id);
        // no extension of an uncovered path is covered
        if cover.any_superset_of(path) {
            if child.unmark() {
                removed += 1;
            }
            removed += prune_covered(child, path, cover);
        }
        path.pop();
        child.stored || !child.is_leaf()
    });
    node.refresh_height();
    removed
}
