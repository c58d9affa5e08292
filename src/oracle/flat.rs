use itertools::Itertools;
use rayon::prelude::*;

use super::SupportOracle;
use crate::trie::{ItemsetTrie, Node};
use crate::types::{ItemId, Support, Transaction};

/// Distinct sorted transactions, each with the number of times it occurs.
#[derive(Debug, Clone, Default)]
pub struct FlatTransactions {
    transactions: Vec<(Transaction, Support)>,
    total: usize,
    max_len: usize,
}

impl FlatTransactions {
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut sorted = transactions.to_vec();
        sorted.sort_unstable();
        let max_len = sorted.iter().map(Vec::len).max().unwrap_or(0);

        FlatTransactions {
            transactions: sorted
                .into_iter()
                .dedup_with_count()
                .map(|(count, transaction)| (transaction, count as Support))
                .collect(),
            total: transactions.len(),
            max_len,
        }
    }

    pub fn distinct(&self) -> usize {
        self.transactions.len()
    }
}

impl SupportOracle for FlatTransactions {
    fn count_candidates(&self, candidates: &mut ItemsetTrie, min_len: usize) {
        let transactions = &self.transactions;
        candidates
            .root
            .children
            .par_iter_mut()
            .for_each(|(&id, node)| {
                for (transaction, count) in transactions {
                    if transaction.len() < min_len {
                        continue;
                    }
                    if let Ok(at) = transaction.binary_search(&id) {
                        count_in(node, 1, &transaction[at + 1..], *count, min_len);
                    }
                }
            });
    }

    fn transaction_count(&self) -> usize {
        self.total
    }

    fn max_transaction_len(&self) -> usize {
        self.max_len
    }
}

fn count_in(node: &mut Node, depth: usize, rest: &[ItemId], count: Support, min_len: usize) {
    if node.stored && depth >= min_len {
        node.support += count;
    }
    let mut cursor = 0;
    for (&id, child) in node.children.iter_mut() {
        while cursor < rest.len() && rest[cursor] < id {
            cursor += 1;
        }
        if cursor == rest.len() {
            break;
        }
        if rest[cursor] == id {
            count_in(child, depth + 1, &rest[cursor + 1..], count, min_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_folded() {
        let flat = FlatTransactions::new(&[vec![1, 2], vec![0], vec![1, 2], vec![1, 2, 3]]);
        assert_eq!(flat.distinct(), 3);
        assert_eq!(flat.transaction_count(), 4);
        assert_eq!(flat.max_transaction_len(), 3);
        assert_eq!(
            flat.transactions,
            vec![(vec![0], 1), (vec![1, 2], 2), (vec![1, 2, 3], 1)]
        );
    }
}
