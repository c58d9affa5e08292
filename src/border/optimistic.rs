use std::collections::BTreeMap;
use std::mem;

use tracing::debug;

use super::BorderTracker;
use crate::oracle::SupportOracle;
use crate::trie::ItemsetTrie;
use crate::types::ItemsetLength;

impl BorderTracker {
    /// Resolves the parked near-border candidates top down.
    ///
    /// Starting from the longest near itemsets, each level is replaced by its immediate subsets
    /// (joined with the near itemsets already of that size). Subsets covered by the positive
    /// border are dropped, the rest are counted. Frequent ones join the border; infrequent ones
    /// descend further. Levels at or below the seed level are already settled.
    pub(super) fn optimistic_sweep(&mut self) {
        let floor = self.seed_level;
        let near = mem::take(&mut self.near);
        if near.is_empty() {
            return;
        }

        let mut levels: BTreeMap<ItemsetLength, ItemsetTrie> = BTreeMap::new();
        for (itemset, _) in &near {
            levels
                .entry(itemset.len())
                .or_default()
                .insert(&itemset, 0);
        }

        while let Some((level, current)) = levels.pop_last() {
            if level <= floor {
                break;
            }
            if current.is_empty() {
                continue;
            }

            let below_size = level - 1;
            let mut below = current.subsets_of_size(below_size);
            if let Some(parked) = levels.remove(&below_size) {
                below.merge(parked);
            }
            below.prune_covered_by(&self.bd_p);
            self.oracle.count_candidates(&mut below, below_size);

            let mut infrequent = ItemsetTrie::new();
            let mut promoted = 0;
            for (itemset, support) in below.into_itemsets() {
                if support >= self.min_support {
                    if self.record_frequent(&itemset, support) {
                        promoted += 1;
                    }
                } else {
                    infrequent.insert(&itemset, support);
                }
            }

            debug!(
                level = below_size,
                promoted,
                remaining = infrequent.len(),
                "optimistic sweep level"
            );
            levels.insert(below_size, infrequent);
        }
    }
}
