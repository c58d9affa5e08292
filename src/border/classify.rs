use super::{border_error, BorderTracker};
use crate::transversal::MinimalTransversals;
use crate::trie::ItemsetTrie;
use crate::types::complement_of;

/// Outcome counts of one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Tally {
    pub(super) frequent: usize,
    pub(super) near: usize,
    pub(super) far: usize,
}

impl BorderTracker {
    /// Sorts counted candidates into frequent, near and far.
    ///
    /// Frequent and near candidates retire their generating transversal and cancel the residual
    /// subsets already derived from them. Far candidates are replaced by their `residual_size`
    /// subsets in the returned residual trie.
    pub(super) fn classify(
        &mut self,
        candidates: ItemsetTrie,
        transversals: &mut MinimalTransversals,
        residual_size: usize,
    ) -> (ItemsetTrie, Tally) {
        let mut residual = ItemsetTrie::new();
        let mut tally = Tally::default();

        for (itemset, support) in candidates.into_itemsets() {
            if support >= self.min_support {
                tally.frequent += 1;
                self.record_frequent(&itemset, support);
            } else if border_error(support, self.min_support) <= self.eps {
                tally.near += 1;
                self.near.insert(&itemset, support);
            } else {
                tally.far += 1;
                residual.gen_subsets(&itemset, residual_size);
                continue;
            }
            transversals.retire(&complement_of(&itemset, self.universe));
            residual.del_subsets(&itemset, residual_size);
        }

        (residual, tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinerConfig;
    use crate::itemsets::seed::LevelwiseSeed;
    use crate::types::{Itemset, RawTransaction, Support};

    fn tracker(eps: f64) -> BorderTracker {
        // ids 0..4 by name; {0, 1, 2} has support 3, {0, 1, 2, 3} support 1
        let raw: Vec<RawTransaction> = vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 2],
            vec![0, 1, 2],
            vec![3],
            vec![3],
        ];
        let config = MinerConfig::new(3)
            .with_level_cap(1)
            .with_eps(eps)
            .with_recoding(crate::config::Recoding::ByName);
        let seed = LevelwiseSeed::new(&config).run(&raw);
        BorderTracker::new(&config, seed).unwrap()
    }

    fn counted(itemsets: Vec<(Itemset, Support)>) -> ItemsetTrie {
        let mut trie = ItemsetTrie::new();
        trie.extend(itemsets);
        trie
    }

    #[test]
    fn frequent_candidates_retire_their_transversal() {
        let mut tracker = tracker(0.0);
        let mut transversals = MinimalTransversals::new(4);
        transversals.add_edge(&[3]);
        transversals.add_edge(&[0, 3]);

        let candidates = counted(vec![(vec![0, 1, 2], 3)]);
        let (residual, tally) = tracker.classify(candidates, &mut transversals, 3);

        assert_eq!(
            tally,
            Tally {
                frequent: 1,
                near: 0,
                far: 0
            }
        );
        assert!(residual.is_empty());
        assert!(transversals.is_empty());
        assert!(tracker.bd_p.contains(&[0, 1, 2]));
    }

    #[test]
    fn far_candidates_expand_into_residual_subsets() {
        let mut tracker = tracker(0.0);
        let mut transversals = MinimalTransversals::new(4);

        let candidates = counted(vec![(vec![0, 1, 2, 3], 1)]);
        let (residual, tally) = tracker.classify(candidates, &mut transversals, 3);

        assert_eq!(tally.far, 1);
        assert_eq!(
            residual.iter().map(|(itemset, _)| itemset).collect::<Vec<_>>(),
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]]
        );
        assert!(!transversals.is_empty());
        assert!(tracker.near.is_empty());
    }

    #[test]
    fn near_candidates_are_parked() {
        let mut tracker = tracker(0.7);
        let mut transversals = MinimalTransversals::new(4);

        let candidates = counted(vec![(vec![0, 1, 2, 3], 1)]);
        let (residual, tally) = tracker.classify(candidates, &mut transversals, 3);

        assert_eq!(tally.near, 1);
        assert!(residual.is_empty());
        assert!(transversals.is_empty());
        assert!(tracker.near.contains(&[0, 1, 2, 3]));
    }

    #[test]
    fn later_frequent_candidate_cancels_residual_subsets() {
        let mut tracker = tracker(0.0);
        let mut transversals = MinimalTransversals::new(4);
        transversals.add_edge(&[0, 3]);
        transversals.add_edge(&[3]);

        // [0, 1, 2, 3] sorts first and is far, [1, 2, 3] is frequent afterwards
        let candidates = counted(vec![(vec![0, 1, 2, 3], 1), (vec![1, 2, 3], 3)]);
        let (residual, _) = tracker.classify(candidates, &mut transversals, 3);

        assert_eq!(
            residual.iter().map(|(itemset, _)| itemset).collect::<Vec<_>>(),
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3]]
        );
    }
}
