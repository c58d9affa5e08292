//! Levelwise (Apriori) seeding of the border search.
//!
//! The seed counts itemsets level by level until the candidate sets stop paying off, then hands
//! the tracker its negative border and the maximal itemsets it already proved.

use std::collections::HashMap;
use std::time::Instant;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::combi::{join_step, prune_step};
use crate::config::{MinerConfig, Recoding};
use crate::error::Result;
use crate::itemsets::pcy::PairFilter;
use crate::oracle::{SupportOracle, TransactionIndex};
use crate::trie::ItemsetTrie;
use crate::types::{
    check_itemset, ItemCounts, ItemId, ItemRemap, Itemset, ItemsetLength, RawItem,
    RawTransaction, Support, Transaction,
};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// Levels below this never stop the seed early.
const MIN_STOP_LEVEL: ItemsetLength = 4;
const MIN_INFREQUENT_TOTAL: usize = 100;
const HIGH_INFREQUENT_RATIO: f64 = 0.25;

/// Counting statistics of one seed level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    /// Size of the counted candidates.
    pub level: ItemsetLength,
    pub candidates: usize,
    pub frequent: usize,
}

impl LevelReport {
    pub fn infrequent(&self) -> usize {
        self.candidates - self.frequent
    }

    pub fn infrequent_ratio(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            self.infrequent() as f64 / self.candidates as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedOutcome {
    /// Maximal frequent itemsets proved by the seed.
    pub bd_p: ItemsetTrie,
    /// Counted (or PCY-rejected) infrequent candidates.
    pub bd_n: ItemsetTrie,
    pub remap: ItemRemap,
    /// Last counted level.
    pub level: ItemsetLength,
    /// Whether frequent itemsets longer than `level` may exist.
    pub higher_levels: bool,
    pub disable_near_border: bool,
    pub reports: Vec<LevelReport>,
    pub index: TransactionIndex,
}

impl SeedOutcome {
    /// Number of frequent items.
    pub fn universe(&self) -> usize {
        self.remap.len()
    }

    pub fn validate(&self) -> Result<()> {
        let universe = self.universe();
        for (itemset, _) in self.bd_p.iter().chain(self.bd_n.iter()) {
            check_itemset(&itemset, universe)?;
        }
        Ok(())
    }
}

/// A levelwise counting session over one configuration.
#[derive(Debug, Clone, Copy)]
pub struct LevelwiseSeed<'c> {
    config: &'c MinerConfig,
}

impl<'c> LevelwiseSeed<'c> {
    pub fn new(config: &'c MinerConfig) -> Self {
        LevelwiseSeed { config }
    }

    pub fn run(&self, raw_transactions: &[RawTransaction]) -> SeedOutcome {
        let start = Instant::now();
        let min_support = self.config.min_support;

        // 1-itemset
        let item_counts = generate_frequent_1_itemset_counts(raw_transactions, min_support);
        let ranked = rank_items(&item_counts, self.config.recoding);
        let remap: ItemRemap = ranked.iter().map(|&(item, _)| item).collect();
        let transactions = recode_transactions(raw_transactions, &remap);
        let index = TransactionIndex::build(self.config.index, &transactions);
        let max_len = index.max_transaction_len();

        let mut frequent_1 = ItemsetTrie::new();
        for (id, &(_, support)) in ranked.iter().enumerate() {
            frequent_1.insert(&[id], support);
        }
        debug!(
            items = item_counts.len(),
            transactions = transactions.len(),
            "recoded frequent items"
        );

        let mut levels: Vec<ItemsetTrie> = vec![frequent_1];
        let mut bd_n = ItemsetTrie::new();
        let mut reports = Vec::new();
        let mut stop = StopRule::new(self.config.stop_ratio);
        let mut exhausted = false;
        let mut level: ItemsetLength = 1;

        // k-itemset, k >= 2
        while level < max_len && self.may_continue(level, &stop) {
            let current = &levels[level - 1];
            let joined = join_step(current.iter().map(|(itemset, _)| itemset).collect());
            let candidates = prune_step(joined, current);
            if candidates.is_empty() {
                exhausted = true;
                break;
            }

            let generated = candidates.len();
            let pair_filter = (level == 1).then(|| PairFilter::new(&transactions, min_support));
            let mut counted = ItemsetTrie::new();
            for candidate in candidates {
                match &pair_filter {
                    Some(filter) if !filter.may_be_frequent(candidate[0], candidate[1]) => {
                        bd_n.insert(&candidate, 0);
                    }
                    _ => {
                        counted.insert(&candidate, 0);
                    }
                }
            }
            index.count_candidates(&mut counted, level + 1);

            let mut frequent = ItemsetTrie::new();
            for (itemset, support) in counted.into_itemsets() {
                if support >= min_support {
                    frequent.insert(&itemset, support);
                } else {
                    bd_n.insert(&itemset, support);
                }
            }

            level += 1;
            let report = LevelReport {
                level,
                candidates: generated,
                frequent: frequent.len(),
            };
            debug!(
                level,
                candidates = report.candidates,
                frequent = report.frequent,
                "counted seed level"
            );
            stop.observe(&report);
            reports.push(report);

            let none_frequent = frequent.is_empty();
            levels.push(frequent);
            if none_frequent {
                break;
            }
        }

        let top = levels.len();
        let complete = exhausted || levels[top - 1].len() < level + 1 || level >= max_len;
        let proved = if complete { level } else { level - 1 };

        let mut bd_p = ItemsetTrie::new();
        for size in 1..=proved {
            bd_p.extend(maximal_at(&levels[size - 1], levels.get(size)));
        }

        info!(
            level,
            items = remap.len(),
            maximal = bd_p.len(),
            negative_border = bd_n.len(),
            higher_levels = !complete,
            elapsed = ?start.elapsed(),
            "levelwise seed finished"
        );

        SeedOutcome {
            bd_p,
            bd_n,
            remap,
            level,
            higher_levels: !complete,
            disable_near_border: stop.near_border_off,
            reports,
            index,
        }
    }

    fn may_continue(&self, level: ItemsetLength, stop: &StopRule) -> bool {
        match self.config.level_cap {
            Some(cap) => level < cap,
            None => !stop.fired,
        }
    }
}

/// Tracks the early stopping rule over the counted levels.
#[derive(Debug)]
struct StopRule {
    ratio: f64,
    infrequent_total: usize,
    fired: bool,
    near_border_off: bool,
}

impl StopRule {
    fn new(ratio: f64) -> Self {
        StopRule {
            ratio,
            infrequent_total: 0,
            fired: false,
            near_border_off: false,
        }
    }

    fn observe(&mut self, report: &LevelReport) {
        self.infrequent_total += report.infrequent();
        if report.level < MIN_STOP_LEVEL
            || self.infrequent_total >= 2 * report.candidates
            || self.infrequent_total <= MIN_INFREQUENT_TOTAL
        {
            return;
        }
        let ratio = report.infrequent_ratio();
        if ratio < self.ratio {
            self.fired = true;
            self.near_border_off = true;
        } else if ratio > HIGH_INFREQUENT_RATIO {
            self.fired = true;
        }
    }
}

/// Frequency of every item, keeping only the frequent ones. Repeated items within one
/// transaction count once.
pub fn generate_frequent_1_itemset_counts(
    raw_transactions: &[RawTransaction],
    min_support: Support,
) -> ItemCounts {
    let mut item_counts: ItemCounts = HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS);
    for raw_transaction in raw_transactions {
        for &item in raw_transaction.iter().unique() {
            *item_counts.entry(item).or_insert(0) += 1;
        }
    }
    item_counts.retain(|_, &mut support_count| support_count >= min_support);
    item_counts
}

/// Frequent items in recoding order: position `i` receives id `i`.
fn rank_items(item_counts: &ItemCounts, recoding: Recoding) -> Vec<(RawItem, Support)> {
    let mut ranked: Vec<(RawItem, Support)> = item_counts
        .iter()
        .map(|(&item, &support)| (item, support))
        .collect();
    match recoding {
        Recoding::ByFrequency => ranked.sort_unstable_by_key(|&(item, support)| (support, item)),
        Recoding::ByName => ranked.sort_unstable_by_key(|&(item, _)| item),
    }
    ranked
}

/// Rewrites every transaction with recoded ids, dropping infrequent items, sorted ascending.
pub fn recode_transactions(
    raw_transactions: &[RawTransaction],
    remap: &ItemRemap,
) -> Vec<Transaction> {
    let lookup: HashMap<RawItem, ItemId> = remap
        .iter()
        .enumerate()
        .map(|(id, &item)| (item, id))
        .collect();

    raw_transactions
        .par_iter()
        .map(|raw_transaction| {
            let mut transaction: Transaction = raw_transaction
                .iter()
                .filter_map(|item| lookup.get(item).copied())
                .collect();
            transaction.sort_unstable();
            transaction.dedup();
            transaction
        })
        .collect()
}

/// Members of `current` with no superset in `next`, the level above.
fn maximal_at(current: &ItemsetTrie, next: Option<&ItemsetTrie>) -> Vec<(Itemset, Support)> {
    let itemsets: Vec<(Itemset, Support)> = current.iter().collect();
    match next {
        Some(next) if !next.is_empty() => itemsets
            .into_par_iter()
            .filter(|(itemset, _)| !next.any_superset_of(itemset))
            .collect(),
        _ => itemsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinerError;
    use crate::oracle::IndexKind;
    use maplit::hashmap;

    fn triangle() -> Vec<RawTransaction> {
        vec![vec![1, 2, 3], vec![1, 2], vec![2, 3], vec![1, 3]]
    }

    fn itemsets_of(trie: &ItemsetTrie) -> Vec<(Itemset, Support)> {
        trie.iter().collect()
    }

    #[test]
    fn test_generate_frequent_1_itemset_counts() {
        let raw = vec![vec![5, 9], vec![5], vec![5, 7, 5], vec![7]];
        assert_eq!(
            generate_frequent_1_itemset_counts(&raw, 2),
            hashmap! {5 => 3, 7 => 2}
        );
    }

    #[test]
    fn recoding_orders() {
        let counts = hashmap! {5 => 3, 9 => 1, 7 => 2, 4 => 2};
        assert_eq!(
            rank_items(&counts, Recoding::ByFrequency),
            vec![(9, 1), (4, 2), (7, 2), (5, 3)]
        );
        assert_eq!(
            rank_items(&counts, Recoding::ByName),
            vec![(4, 2), (5, 3), (7, 2), (9, 1)]
        );
    }

    #[test]
    fn transactions_are_recoded_and_sorted() {
        let raw = vec![vec![9, 5, 8], vec![7, 9]];
        let remap = vec![9, 7, 5];
        assert_eq!(
            recode_transactions(&raw, &remap),
            vec![vec![0, 2], vec![0, 1]]
        );
    }

    #[test]
    fn complete_seed_on_triangle() {
        let config = MinerConfig::new(2);
        let outcome = LevelwiseSeed::new(&config).run(&triangle());

        assert_eq!(outcome.remap, vec![1, 2, 3]);
        assert_eq!(outcome.level, 3);
        assert!(!outcome.higher_levels);
        assert_eq!(
            itemsets_of(&outcome.bd_p),
            vec![(vec![0, 1], 2), (vec![0, 2], 2), (vec![1, 2], 2)]
        );
        assert_eq!(itemsets_of(&outcome.bd_n), vec![(vec![0, 1, 2], 1)]);
        assert_eq!(
            outcome.reports,
            vec![
                LevelReport {
                    level: 2,
                    candidates: 3,
                    frequent: 3
                },
                LevelReport {
                    level: 3,
                    candidates: 1,
                    frequent: 0
                },
            ]
        );
        assert!(outcome.validate().is_ok());
    }

    #[test]
    fn capped_seed_leaves_higher_levels() {
        let config = MinerConfig::new(2).with_level_cap(2);
        let outcome = LevelwiseSeed::new(&config).run(&triangle());
        assert_eq!(outcome.level, 2);
        assert!(outcome.higher_levels);
        assert!(outcome.bd_p.is_empty());
        assert!(outcome.bd_n.is_empty());

        let config = MinerConfig::new(2).with_level_cap(1);
        let outcome = LevelwiseSeed::new(&config).run(&triangle());
        assert_eq!(outcome.level, 1);
        assert!(outcome.higher_levels);
        assert!(outcome.reports.is_empty());
    }

    #[test]
    fn infrequent_items_are_dropped() {
        let raw = vec![vec![1, 2, 9], vec![1, 2], vec![1]];
        let config = MinerConfig::new(2);
        let outcome = LevelwiseSeed::new(&config).run(&raw);
        assert_eq!(outcome.remap, vec![2, 1]);
        assert_eq!(itemsets_of(&outcome.bd_p), vec![(vec![0, 1], 2)]);
        assert!(!outcome.higher_levels);
    }

    #[test]
    fn lower_maximal_itemsets_survive() {
        // {1, 2, 3} is frequent, item 4 only on its own
        let raw = vec![vec![1, 2, 3], vec![1, 2, 3], vec![4], vec![4]];
        let config = MinerConfig::new(2).with_recoding(Recoding::ByName);
        let outcome = LevelwiseSeed::new(&config).run(&raw);
        assert_eq!(
            itemsets_of(&outcome.bd_p),
            vec![(vec![0, 1, 2], 2), (vec![3], 2)]
        );
        assert!(!outcome.higher_levels);
    }

    #[test]
    fn unsupported_pairs_reach_the_negative_border() {
        let raw = vec![vec![0, 1], vec![0, 1], vec![2], vec![2]];
        for kind in [IndexKind::Tree, IndexKind::Flat] {
            let config = MinerConfig::new(2)
                .with_recoding(Recoding::ByName)
                .with_index(kind);
            let outcome = LevelwiseSeed::new(&config).run(&raw);
            assert_eq!(
                itemsets_of(&outcome.bd_n),
                vec![(vec![0, 2], 0), (vec![1, 2], 0)]
            );
            assert_eq!(
                itemsets_of(&outcome.bd_p),
                vec![(vec![0, 1], 2), (vec![2], 2)]
            );
            assert_eq!(outcome.index.kind(), kind);
        }
    }

    #[test]
    fn empty_input() {
        let config = MinerConfig::new(1);
        let outcome = LevelwiseSeed::new(&config).run(&[]);
        assert_eq!(outcome.universe(), 0);
        assert!(outcome.bd_p.is_empty());
        assert!(!outcome.higher_levels);
    }

    #[test]
    fn validate_rejects_foreign_items() {
        let config = MinerConfig::new(2);
        let mut outcome = LevelwiseSeed::new(&config).run(&triangle());
        outcome.bd_n.insert(&[1, 7], 0);
        assert!(matches!(
            outcome.validate(),
            Err(MinerError::InvalidItemset { universe: 3, .. })
        ));
    }

    #[test]
    fn stop_rule() {
        let report = |level, candidates, frequent| LevelReport {
            level,
            candidates,
            frequent,
        };

        // too early
        let mut stop = StopRule::new(0.01);
        stop.observe(&report(3, 1000, 500));
        assert!(!stop.fired);

        // mostly infrequent
        let mut stop = StopRule::new(0.01);
        stop.observe(&report(4, 400, 100));
        assert!(stop.fired);
        assert!(!stop.near_border_off);

        // almost everything frequent
        let mut stop = StopRule::new(0.5);
        stop.observe(&report(4, 1000, 800));
        assert!(stop.fired);
        assert!(stop.near_border_off);

        // too few infrequent candidates so far
        let mut stop = StopRule::new(0.01);
        stop.observe(&report(5, 90, 0));
        assert!(!stop.fired);

        // in between
        let mut stop = StopRule::new(0.01);
        stop.observe(&report(4, 2000, 1700));
        assert!(!stop.fired);
    }
}
