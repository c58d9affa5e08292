use super::{ItemsetTrie, Node};
use crate::types::ItemId;

impl ItemsetTrie {
    /// True if some stored itemset is a subset of `itemset`.
    pub fn any_subset_of(&self, itemset: &[ItemId]) -> bool {
        !self.is_empty() && subset_below(&self.root, itemset)
    }

    /// True if `itemset` is a subset of some stored itemset.
    pub fn any_superset_of(&self, itemset: &[ItemId]) -> bool {
        !self.is_empty() && superset_below(&self.root, itemset)
    }
}

// Children and `items` are both ascending, so one forward cursor suffices per node.
fn subset_below(node: &Node, items: &[ItemId]) -> bool {
    let mut cursor = 0;
    for (&id, child) in &node.children {
        while cursor < items.len() && items[cursor] < id {
            cursor += 1;
        }
        if cursor == items.len() {
            return false;
        }
        if items[cursor] == id && (child.stored || subset_below(child, &items[cursor + 1..])) {
            return true;
        }
    }
    false
}

// Every node lies on a stored path, so running out of items is a match.
fn superset_below(node: &Node, items: &[ItemId]) -> bool {
    let (&first, rest) = match items.split_first() {
        Some(split) => split,
        None => return true,
    };
    node.children.range(..=first).any(|(&id, child)| {
        if child.height() + 1 < items.len() {
            false
        } else if id == first {
            superset_below(child, rest)
        } else {
            superset_below(child, items)
        }
    })
}
