use itertools::Itertools;

use crate::trie::ItemsetTrie;
use crate::types::{ItemId, Itemset};

/// Apriori join: pairs of `k`-itemsets sharing their first `k - 1` items yield a
/// `(k + 1)`-candidate. Input itemsets must all have the same length.
///
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step(mut itemsets: Vec<Itemset>) -> Vec<Itemset> {
    itemsets.retain(|itemset| !itemset.is_empty());
    if itemsets.is_empty() {
        return vec![];
    }

    itemsets.sort_unstable();

    let mut final_itemsets: Vec<Itemset> = Vec::with_capacity(1024); // arbitrary
    let mut tail_items: Vec<ItemId> = Vec::with_capacity(itemsets.len());

    let mut i = 0;
    while i < itemsets.len() {
        let (&last, prefix) = match itemsets[i].split_last() {
            Some(split) => split,
            None => break,
        };

        tail_items.clear();
        tail_items.push(last);

        for other in &itemsets[i + 1..] {
            match other.split_last() {
                Some((&other_last, other_prefix)) if other_prefix == prefix => {
                    tail_items.push(other_last)
                }
                _ => break,
            }
        }
        let skip = tail_items.len();

        for (a, b) in tail_items.iter().tuple_combinations() {
            let mut candidate: Itemset = Vec::with_capacity(prefix.len() + 2);
            candidate.extend_from_slice(prefix);
            candidate.push(*a);
            candidate.push(*b);
            final_itemsets.push(candidate);
        }

        i += skip;
    }

    final_itemsets
}

/// Apriori prune: keeps the candidates whose every immediate subset is in `frequent`.
pub fn prune_step(candidates: Vec<Itemset>, frequent: &ItemsetTrie) -> Vec<Itemset> {
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .iter()
                .copied()
                .combinations(candidate.len() - 1)
                .all(|subset| frequent.contains(&subset))
        })
        .collect()
}
