//! Ordered prefix tree holding a family of itemsets.
//!
//! Every stored itemset is spelled by a root-to-node path in ascending item order, and the last
//! node of that path is marked as stored. Children are kept in a `BTreeMap`, so all traversals
//! can rely on sorted ids and stop early instead of backtracking. The trie owns its nodes
//! outright, so merging moves subtrees and cloning deep-copies them.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;

use crate::types::{complement_of, ItemId, Itemset, Support};

mod inclusion;
mod subsets;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Node {
    /// Database support of the itemset ending here. Only meaningful when `stored`.
    pub(crate) support: Support,
    /// The path to this node is a member of the family. Always set on leaves below the root.
    pub(crate) stored: bool,
    /// Number of items on the longest path below this node.
    height: usize,
    pub(crate) children: BTreeMap<ItemId, Node>,
}

impl Node {
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Stored itemsets ending at this node or below it.
    pub(crate) fn stored_count(&self) -> usize {
        self.stored as usize + self.children.values().map(Node::stored_count).sum::<usize>()
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Recomputes the height from the children. Every mutation of `children` ends with this.
    pub(crate) fn refresh_height(&mut self) {
        self.height = self
            .children
            .values()
            .map(|child| child.height + 1)
            .max()
            .unwrap_or(0);
    }

    /// Takes the itemset ending here out of the family. Returns whether it was stored.
    pub(crate) fn unmark(&mut self) -> bool {
        let was_stored = self.stored;
        self.stored = false;
        self.support = 0;
        was_stored
    }

    /// Drops every stored itemset strictly below this node.
    pub(crate) fn clear_below(&mut self) -> usize {
        let dropped = self.stored_count() - self.stored as usize;
        self.children.clear();
        self.height = 0;
        dropped
    }
}

/// A family of itemsets stored as an ordered prefix tree.
///
/// `len` is the cardinality of the family and always equals the number of stored nodes. An
/// itemset may be a prefix of another one; both stay members. The support stored with an
/// itemset is its frequency, or a live counter while the trie is used as a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsetTrie {
    pub(crate) root: Node,
    len: usize,
}

impl ItemsetTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the longest stored itemset.
    pub fn max_len(&self) -> usize {
        self.root.height()
    }

    /// Inserts `itemset` with the given support.
    ///
    /// Existing nodes are followed as far as they match; the remainder of the path is created.
    /// Returns `false` when the itemset was already a member, in which case its support is
    /// left as it was. The empty itemset is never stored.
    pub fn insert(&mut self, itemset: &[ItemId], support: Support) -> bool {
        if itemset.is_empty() {
            return false;
        }
        let inserted = insert_path(&mut self.root, itemset, support);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes `itemset` if it is stored, pruning every node left without a purpose.
    pub fn remove(&mut self, itemset: &[ItemId]) -> bool {
        let removed = remove_path(&mut self.root, itemset);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn contains(&self, itemset: &[ItemId]) -> bool {
        self.find(itemset).is_some()
    }

    pub fn support(&self, itemset: &[ItemId]) -> Option<Support> {
        self.find(itemset).map(|node| node.support)
    }

    fn find(&self, itemset: &[ItemId]) -> Option<&Node> {
        let mut node = &self.root;
        for item in itemset {
            node = node.children.get(item)?;
        }
        if node.stored {
            Some(node)
        } else {
            None
        }
    }

    /// Destructive union. `other` is consumed: its subtrees are spliced in where `self` has no
    /// matching id and merged recursively where it does. Itemsets stored in both keep the
    /// support they had in `self`.
    pub fn merge(&mut self, other: ItemsetTrie) {
        let gained = splice(&mut self.root.children, other.root.children);
        self.root.refresh_height();
        self.len += gained;
    }

    /// Trie holding, for every stored itemset `I`, the gap sequence `[0, universe) \ I`.
    /// Empty complements are skipped.
    pub fn complement(&self, universe: usize) -> ItemsetTrie {
        let mut complemented = ItemsetTrie::new();
        for (itemset, _) in self.iter() {
            let gaps = complement_of(&itemset, universe);
            if !gaps.is_empty() {
                complemented.insert(&gaps, 0);
            }
        }
        complemented
    }

    /// Removes every itemset longer than `max_len`. Returns how many were removed.
    pub fn drop_longer_than(&mut self, max_len: usize) -> usize {
        let removed = cut_below(&mut self.root, 0, max_len);
        self.len -= removed;
        removed
    }

    /// Depth-first iterator over `(itemset, support)` in lexicographic order. A prefix comes
    /// before its extensions.
    pub fn iter(&self) -> Itemsets<'_> {
        Itemsets {
            stack: vec![self.root.children.iter()],
            path: Vec::new(),
        }
    }

    pub fn into_itemsets(self) -> Vec<(Itemset, Support)> {
        self.iter().collect()
    }

    pub(crate) fn adjust(&mut self, delta: isize) {
        self.len = (self.len as isize + delta) as usize;
    }
}

fn insert_path(node: &mut Node, rest: &[ItemId], support: Support) -> bool {
    let (&first, tail) = match rest.split_first() {
        Some(split) => split,
        None => {
            if node.stored {
                return false;
            }
            node.stored = true;
            node.support = support;
            return true;
        }
    };
    let inserted = insert_path(node.children.entry(first).or_default(), tail, support);
    node.refresh_height();
    inserted
}

fn remove_path(node: &mut Node, rest: &[ItemId]) -> bool {
    let (first, tail) = match rest.split_first() {
        Some(split) => split,
        None => return false,
    };
    let child = match node.children.get_mut(first) {
        Some(child) => child,
        None => return false,
    };

    let removed = if tail.is_empty() {
        child.unmark()
    } else {
        remove_path(child, tail)
    };
    if removed {
        if !child.stored && child.is_leaf() {
            node.children.remove(first);
        }
        node.refresh_height();
    }
    removed
}

/// Moves `from` into `into`, returning the number of itemsets gained.
fn splice(into: &mut BTreeMap<ItemId, Node>, from: BTreeMap<ItemId, Node>) -> usize {
    let mut gained = 0;
    for (id, child) in from {
        match into.entry(id) {
            Entry::Vacant(slot) => {
                gained += child.stored_count();
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => gained += absorb(slot.get_mut(), child),
        }
    }
    gained
}

fn absorb(into: &mut Node, from: Node) -> usize {
    let mut gained = 0;
    if from.stored && !into.stored {
        into.stored = true;
        into.support = from.support;
        gained += 1;
    }
    gained += splice(&mut into.children, from.children);
    into.refresh_height();
    gained
}

fn cut_below(node: &mut Node, depth: usize, max_len: usize) -> usize {
    let mut removed = 0;
    if depth >= max_len {
        removed = node.clear_below();
    } else {
        node.children.retain(|_, child| {
            removed += cut_below(child, depth + 1, max_len);
            child.stored || !child.is_leaf()
        });
        node.refresh_height();
    }
    removed
}

pub struct Itemsets<'a> {
    stack: Vec<btree_map::Iter<'a, ItemId, Node>>,
    path: Itemset,
}

impl<'a> Iterator for Itemsets<'a> {
    type Item = (Itemset, Support);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some((&id, node)) => {
                    self.path.push(id);
                    let found = if node.stored {
                        Some((self.path.clone(), node.support))
                    } else {
                        None
                    };
                    if node.is_leaf() {
                        self.path.pop();
                    } else {
                        self.stack.push(node.children.iter());
                    }
                    if found.is_some() {
                        return found;
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a ItemsetTrie {
    type Item = (Itemset, Support);
    type IntoIter = Itemsets<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Itemset> for ItemsetTrie {
    fn from_iter<T: IntoIterator<Item = Itemset>>(iter: T) -> Self {
        let mut trie = ItemsetTrie::new();
        for itemset in iter {
            trie.insert(&itemset, 0);
        }
        trie
    }
}

impl Extend<(Itemset, Support)> for ItemsetTrie {
    fn extend<T: IntoIterator<Item = (Itemset, Support)>>(&mut self, iter: T) {
        for (itemset, support) in iter {
            self.insert(&itemset, support);
        }
    }
}

/// One `a b c (support)` line per stored itemset, using internal ids.
impl fmt::Display for ItemsetTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (itemset, support) in self.iter() {
            for item in &itemset {
                write!(f, "{} ", item)?;
            }
            writeln!(f, "({})", support)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! trie {
        ($([$($x:expr),*]),* $(,)?) => {
            {
                let mut trie = ItemsetTrie::new();
                $(trie.insert(&[$($x),*], 0);)*
                trie
            }
        };
    }

    fn itemsets(trie: &ItemsetTrie) -> Vec<Itemset> {
        trie.iter().map(|(itemset, _)| itemset).collect()
    }

    #[test]
    fn insert_counts_new_itemsets_only() {
        let mut trie = ItemsetTrie::new();
        assert!(trie.insert(&[1, 2, 3], 7));
        assert!(trie.insert(&[1, 4], 2));
        assert!(!trie.insert(&[1, 2, 3], 9));

        assert_eq!(trie.len(), 2);
        assert_eq!(trie.support(&[1, 2, 3]), Some(7));
        assert_eq!(trie.support(&[1, 2]), None);
        assert_eq!(itemsets(&trie), vec![vec![1, 2, 3], vec![1, 4]]);
    }

    #[test]
    fn prefixes_and_extensions_are_both_kept() {
        let mut trie = ItemsetTrie::new();
        assert!(trie.insert(&[0, 1], 5));
        assert!(trie.insert(&[0, 1, 2], 3));
        assert!(trie.insert(&[0], 8));
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.support(&[0, 1]), Some(5));
        assert_eq!(
            trie.iter().collect::<Vec<_>>(),
            vec![(vec![0], 8), (vec![0, 1], 5), (vec![0, 1, 2], 3)]
        );
        assert_eq!(trie.max_len(), 3);
    }

    #[test]
    fn removing_an_extension_keeps_the_prefix() {
        let mut trie = ItemsetTrie::new();
        trie.insert(&[0, 1], 5);
        let before = trie.clone();

        trie.insert(&[0, 1, 2], 3);
        assert_eq!(trie.len(), 2);
        assert!(trie.contains(&[0, 1]));

        assert!(trie.remove(&[0, 1, 2]));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.support(&[0, 1]), Some(5));
        assert_eq!(trie, before);
    }

    #[test]
    fn removing_a_prefix_keeps_the_extension() {
        let mut trie = trie![[2, 3, 4]];
        let before = trie.clone();

        assert!(trie.insert(&[2, 3], 1));
        assert_eq!(trie.len(), 2);
        assert!(trie.remove(&[2, 3]));
        assert!(!trie.remove(&[2, 3]));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie, before);
    }

    #[test]
    fn empty_itemset_is_never_stored() {
        let mut trie = ItemsetTrie::new();
        assert!(!trie.insert(&[], 3));
        assert!(!trie.remove(&[]));
        assert!(trie.is_empty());
        assert!(!trie.contains(&[]));
    }

    #[test]
    fn insert_then_remove_restores_the_trie() {
        let base = trie![[0, 1, 4], [0, 2], [3, 5], [3]];
        let probes = [
            vec![0, 1, 3],
            vec![2],
            vec![0, 3, 4, 5],
            vec![1, 5],
            vec![0, 1],
            vec![0, 2, 7],
            vec![3, 5, 6],
            vec![0],
        ];
        for itemset in probes {
            let mut trie = base.clone();
            assert!(trie.insert(&itemset, 4), "{:?}", itemset);
            assert_eq!(trie.len(), base.len() + 1);
            assert!(trie.remove(&itemset));
            assert_eq!(trie, base, "{:?}", itemset);
        }
    }

    #[test]
    fn remove_prunes_childless_ancestors() {
        let mut trie = trie![[1, 2, 3], [1, 4]];
        assert!(!trie.remove(&[1, 2]));
        assert!(trie.remove(&[1, 2, 3]));
        assert_eq!(trie.len(), 1);
        assert!(!trie.root.children[&1].children.contains_key(&2));
        assert!(trie.remove(&[1, 4]));
        assert!(trie.root.is_leaf());
        assert!(!trie.remove(&[1, 4]));
    }

    #[test]
    fn merge_splices_and_recurses() {
        let mut trie = trie![[0, 1], [2, 3]];
        trie.merge(trie![[0, 2], [2, 3], [4]]);
        assert_eq!(trie.len(), 4);
        assert_eq!(
            itemsets(&trie),
            vec![vec![0, 1], vec![0, 2], vec![2, 3], vec![4]]
        );
    }

    #[test]
    fn merge_keeps_prefixes_from_both_sides() {
        let mut trie = ItemsetTrie::new();
        trie.insert(&[1, 2], 6);
        let mut other = ItemsetTrie::new();
        other.insert(&[1], 4);
        other.insert(&[1, 2], 9);
        other.insert(&[1, 2, 3], 2);
        trie.merge(other);
        assert_eq!(
            trie.iter().collect::<Vec<_>>(),
            vec![(vec![1], 4), (vec![1, 2], 6), (vec![1, 2, 3], 2)]
        );
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.max_len(), 3);
    }

    #[test]
    fn merge_into_empty_trie() {
        let mut trie = ItemsetTrie::new();
        trie.merge(trie![[1], [2, 3]]);
        assert_eq!(trie.len(), 2);
        trie.merge(ItemsetTrie::new());
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn complement_flips_every_itemset() {
        let trie = trie![[0, 2], [1]];
        let complemented = trie.complement(4);
        assert_eq!(itemsets(&complemented), vec![vec![0, 2, 3], vec![1, 3]]);
    }

    #[test]
    fn complement_round_trip() {
        for itemset in [vec![0], vec![1, 3], vec![0, 2, 4], vec![4]] {
            let mut trie = ItemsetTrie::new();
            trie.insert(&itemset, 0);
            assert_eq!(trie.complement(5).complement(5), trie);
        }
    }

    #[test]
    fn complement_skips_the_universe() {
        let trie = trie![[0, 1, 2]];
        assert!(trie.complement(3).is_empty());
    }

    #[test]
    fn drop_longer_than_cuts_deep_paths() {
        let mut trie = trie![[0, 1, 2], [0, 3], [4], [5, 6, 7, 8]];
        assert_eq!(trie.drop_longer_than(2), 2);
        assert_eq!(itemsets(&trie), vec![vec![0, 3], vec![4]]);
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.max_len(), 2);
    }

    #[test]
    fn drop_longer_than_keeps_short_prefixes() {
        let mut trie = trie![[0, 1, 2], [0, 1], [0]];
        assert_eq!(trie.drop_longer_than(2), 1);
        assert_eq!(itemsets(&trie), vec![vec![0], vec![0, 1]]);
        assert_eq!(trie.max_len(), 2);
        assert_eq!(trie.drop_longer_than(0), 2);
        assert!(trie.is_empty());
        assert_eq!(trie, ItemsetTrie::new());
    }

    #[test]
    fn display_writes_one_line_per_itemset() {
        let mut trie = ItemsetTrie::new();
        trie.insert(&[3, 7, 12], 42);
        trie.insert(&[5], 9);
        assert_eq!(trie.to_string(), "3 7 12 (42)\n5 (9)\n");
    }

    #[test]
    fn collect_and_extend() {
        let mut trie: ItemsetTrie = vec![vec![2, 3], vec![1]].into_iter().collect();
        trie.extend(vec![(vec![4, 5], 6)]);
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.support(&[4, 5]), Some(6));
        assert_eq!(trie.support(&[1]), Some(0));
    }
}
