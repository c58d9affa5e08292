use rayon::prelude::*;

use super::SupportOracle;
use crate::trie::{ItemsetTrie, Node};
use crate::types::{ItemId, Support, Transaction};

/// Transactions stored as a prefix tree. A node counts the transactions whose sorted item list
/// passes through it, so shared prefixes are counted once.
#[derive(Debug, Clone, Default)]
pub struct TransactionTree {
    root: TreeNode,
}

#[derive(Debug, Clone, Default)]
struct TreeNode {
    count: Support,
    /// Longest path below this node, in items.
    height: usize,
    /// Sorted by item id.
    children: Vec<(ItemId, TreeNode)>,
}

impl TransactionTree {
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut root = TreeNode::default();
        for transaction in transactions {
            root.add(transaction);
        }
        TransactionTree { root }
    }
}

impl TreeNode {
    fn add(&mut self, items: &[ItemId]) {
        self.count += 1;
        self.height = self.height.max(items.len());
        let (&first, rest) = match items.split_first() {
            Some(split) => split,
            None => return,
        };
        let at = match self.children.binary_search_by_key(&first, |(id, _)| *id) {
            Ok(at) => at,
            Err(at) => {
                self.children.insert(at, (first, TreeNode::default()));
                at
            }
        };
        self.children[at].1.add(rest);
    }
}

impl SupportOracle for TransactionTree {
    fn count_candidates(&self, candidates: &mut ItemsetTrie, min_len: usize) {
        let root = &self.root;
        candidates
            .root
            .children
            .par_iter_mut()
            .for_each(|(&id, node)| count_from(id, node, 1, root, min_len));
    }

    fn transaction_count(&self) -> usize {
        self.root.count as usize
    }

    fn max_transaction_len(&self) -> usize {
        self.root.height
    }
}

/// Counts the candidates through `node`, which holds item `id` at `depth`, against the
/// transactions below `tree`.
fn count_from(id: ItemId, node: &mut Node, depth: usize, tree: &TreeNode, min_len: usize) {
    // items still required from `id` onwards
    let needed = min_len.saturating_sub(depth - 1).max(1);
    for (item, below) in &tree.children {
        if *item > id {
            break;
        }
        if below.height + 1 < needed {
            continue;
        }
        if *item < id {
            count_from(id, node, depth, below, min_len);
        } else {
            if node.stored && depth >= min_len {
                node.support += below.count;
            }
            for (&next, child) in node.children.iter_mut() {
                count_from(next, child, depth + 1, below, min_len);
            }
        }
    }
}
