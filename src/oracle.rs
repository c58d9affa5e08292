//! Support counting against an index of the recoded transactions.

use crate::trie::ItemsetTrie;
use crate::types::Transaction;

mod flat;
mod tree;

pub use flat::FlatTransactions;
pub use tree::TransactionTree;

pub trait SupportOracle {
    /// Adds to the support of every candidate with at least `min_len` items the number of
    /// transactions containing it. Shorter candidates are left untouched.
    fn count_candidates(&self, candidates: &mut ItemsetTrie, min_len: usize);

    fn transaction_count(&self) -> usize;

    fn max_transaction_len(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Prefix-shared transaction tree.
    Tree,
    /// Distinct transactions with multiplicities.
    Flat,
}

impl Default for IndexKind {
    fn default() -> Self {
        IndexKind::Tree
    }
}

#[derive(Debug, Clone)]
pub enum TransactionIndex {
    Tree(TransactionTree),
    Flat(FlatTransactions),
}

impl TransactionIndex {
    /// `transactions` must be recoded and sorted ascending.
    pub fn build(kind: IndexKind, transactions: &[Transaction]) -> Self {
        match kind {
            IndexKind::Tree => TransactionIndex::Tree(TransactionTree::new(transactions)),
            IndexKind::Flat => TransactionIndex::Flat(FlatTransactions::new(transactions)),
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            TransactionIndex::Tree(_) => IndexKind::Tree,
            TransactionIndex::Flat(_) => IndexKind::Flat,
        }
    }
}

impl SupportOracle for TransactionIndex {
    fn count_candidates(&self, candidates: &mut ItemsetTrie, min_len: usize) {
        match self {
            TransactionIndex::Tree(tree) => tree.count_candidates(candidates, min_len),
            TransactionIndex::Flat(flat) => flat.count_candidates(candidates, min_len),
        }
    }

    fn transaction_count(&self) -> usize {
        match self {
            TransactionIndex::Tree(tree) => tree.transaction_count(),
            TransactionIndex::Flat(flat) => flat.transaction_count(),
        }
    }

    fn max_transaction_len(&self) -> usize {
        match self {
            TransactionIndex::Tree(tree) => tree.max_transaction_len(),
            TransactionIndex::Flat(flat) => flat.max_transaction_len(),
        }
    }
}
