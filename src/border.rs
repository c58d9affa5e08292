//! Adaptive border tracking.
//!
//! After the levelwise seed, the tracker alternates between dualizing the negative border into
//! minimal transversals and counting their complements, which are the candidate maximal
//! itemsets. Candidates close to the support threshold are parked and resolved by a final
//! top-down sweep.

use std::fmt;
use std::mem;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::MinerConfig;
use crate::error::Result;
use crate::io::read_transactions;
use crate::itemsets::seed::{LevelReport, LevelwiseSeed, SeedOutcome};
use crate::oracle::{SupportOracle, TransactionIndex};
use crate::transversal::{size_limit, MinimalTransversals};
use crate::trie::ItemsetTrie;
use crate::types::{ItemId, ItemRemap, ItemsetLength, RawItem, RawTransaction, Support};

mod classify;
mod optimistic;

/// Relative distance between a support and the threshold.
pub fn border_error(support: Support, min_support: Support) -> f64 {
    let ratio = support as f64 / min_support as f64;
    if support <= min_support {
        1.0 - ratio
    } else {
        ratio - 1.0
    }
}

/// Size distribution of the positive border.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderStats {
    /// `per_size[s]` is the number of members with `s` items.
    per_size: Vec<usize>,
    total: usize,
    size_sum: usize,
}

impl BorderStats {
    pub fn of(border: &ItemsetTrie) -> Self {
        let mut stats = BorderStats::default();
        for (itemset, _) in border {
            stats.record(itemset.len());
        }
        stats
    }

    pub fn record(&mut self, size: ItemsetLength) {
        if self.per_size.len() <= size {
            self.per_size.resize(size + 1, 0);
        }
        self.per_size[size] += 1;
        self.total += 1;
        self.size_sum += size;
    }

    pub fn forget(&mut self, size: ItemsetLength) {
        if let Some(count) = self.per_size.get_mut(size).filter(|count| **count > 0) {
            *count -= 1;
            self.total -= 1;
            self.size_sum -= size;
        }
        while self.per_size.last() == Some(&0) {
            self.per_size.pop();
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, size: ItemsetLength) -> usize {
        self.per_size.get(size).copied().unwrap_or(0)
    }

    pub fn max_size(&self) -> ItemsetLength {
        self.per_size.iter().rposition(|&count| count > 0).unwrap_or(0)
    }

    pub fn average_size(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.size_sum as f64 / self.total as f64
        }
    }
}

/// A `total` line followed by one `size count` line per size.
impl fmt::Display for BorderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total\t{}", self.total)?;
        for size in 1..=self.max_size() {
            writeln!(f, "{}\t{}", size, self.count(size))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MiningResult {
    /// Maximal frequent itemsets over recoded ids.
    pub border: ItemsetTrie,
    pub remap: ItemRemap,
    pub stats: BorderStats,
    pub seed_level: ItemsetLength,
    /// Dualization rounds run after the seed.
    pub rounds: usize,
    pub reports: Vec<LevelReport>,
}

impl MiningResult {
    /// Maximal itemsets over the original item names, each sorted ascending, in ascending order.
    pub fn itemsets(&self) -> Vec<(Vec<RawItem>, Support)> {
        let mut itemsets: Vec<(Vec<RawItem>, Support)> = self
            .border
            .iter()
            .map(|(itemset, support)| {
                let mut names: Vec<RawItem> = itemset.iter().map(|&id| self.remap[id]).collect();
                names.sort_unstable();
                (names, support)
            })
            .collect();
        itemsets.sort_unstable();
        itemsets
    }
}

/// Maximal frequent itemsets of `raw_transactions`.
pub fn mine(raw_transactions: &[RawTransaction], config: &MinerConfig) -> Result<MiningResult> {
    config.validate()?;
    let seed = LevelwiseSeed::new(config).run(raw_transactions);
    Ok(BorderTracker::new(config, seed)?.run())
}

pub fn mine_file(path: &Path, config: &MinerConfig) -> Result<MiningResult> {
    config.validate()?;
    let raw_transactions = read_transactions(path)?;
    mine(&raw_transactions, config)
}

/// Search state after the seed: the positive border found so far, the pending negative border
/// and the parked near-border candidates.
#[derive(Debug)]
pub struct BorderTracker {
    min_support: Support,
    eps: f64,
    universe: usize,
    seed_level: ItemsetLength,
    higher_levels: bool,
    oracle: TransactionIndex,
    bd_p: ItemsetTrie,
    bd_p_apriori: ItemsetTrie,
    bd_n: ItemsetTrie,
    near: ItemsetTrie,
    stats: BorderStats,
    remap: ItemRemap,
    reports: Vec<LevelReport>,
    rounds: usize,
}

impl BorderTracker {
    pub fn new(config: &MinerConfig, seed: SeedOutcome) -> Result<Self> {
        config.validate()?;
        seed.validate()?;
        let universe = seed.universe();
        let eps = if seed.disable_near_border {
            0.0
        } else {
            config.eps
        };

        Ok(BorderTracker {
            min_support: config.min_support,
            eps,
            universe,
            seed_level: seed.level,
            higher_levels: seed.higher_levels,
            oracle: seed.index,
            bd_p: ItemsetTrie::new(),
            bd_p_apriori: seed.bd_p,
            bd_n: seed.bd_n,
            near: ItemsetTrie::new(),
            stats: BorderStats::default(),
            remap: seed.remap,
            reports: seed.reports,
            rounds: 0,
        })
    }

    pub fn run(mut self) -> MiningResult {
        let start = Instant::now();
        if self.higher_levels {
            self.track();
            self.optimistic_sweep();
        }
        self.finalize();

        info!(
            maximal = self.bd_p.len(),
            max_size = self.stats.max_size(),
            rounds = self.rounds,
            elapsed = ?start.elapsed(),
            "border tracking finished"
        );

        MiningResult {
            border: self.bd_p,
            remap: self.remap,
            stats: self.stats,
            seed_level: self.seed_level,
            rounds: self.rounds,
            reports: self.reports,
        }
    }

    /// Dualize, count and classify until no transversal is left.
    fn track(&mut self) {
        let mut k = self.seed_level;
        let seed_edges = mem::take(&mut self.bd_n);
        let mut transversals = MinimalTransversals::dualize(
            &seed_edges,
            self.universe,
            size_limit(self.universe, k - 1),
        );

        while !transversals.is_empty() {
            self.rounds += 1;
            let mut candidates = transversals.candidates();
            let transversal_count = transversals.len();
            let candidate_count = candidates.len();
            self.oracle.count_candidates(&mut candidates, k - 1);

            let (mut residual, tally) = self.classify(candidates, &mut transversals, k + 1);

            residual.prune_covered_by(&self.bd_p);
            residual.prune_covered_by(&self.near);
            residual.prune_nodes(k + 1);
            self.oracle.count_candidates(&mut residual, k + 1);
            let promoted = self.split_residual(residual);

            info!(
                round = self.rounds,
                k,
                transversals = transversal_count,
                candidates = candidate_count,
                frequent = tally.frequent,
                near = tally.near,
                far = tally.far,
                promoted,
                edges = self.bd_n.len(),
                "tracking round"
            );

            k += 1;
            let edges = mem::take(&mut self.bd_n);
            transversals.absorb(edges, size_limit(self.universe, k - 2));
        }
    }

    /// Frequent residuals join the border, the rest become new edges. Returns how many
    /// joined the border.
    fn split_residual(&mut self, residual: ItemsetTrie) -> usize {
        let mut promoted = 0;
        for (itemset, support) in residual.into_itemsets() {
            if support >= self.min_support {
                if self.record_frequent(&itemset, support) {
                    promoted += 1;
                }
            } else {
                self.bd_n.insert(&itemset, support);
            }
        }
        promoted
    }

    /// Adds `itemset` to the positive border unless a member already contains it. Members it
    /// contains are evicted.
    fn record_frequent(&mut self, itemset: &[ItemId], support: Support) -> bool {
        if self.bd_p.any_superset_of(itemset) {
            return false;
        }
        for evicted in self.bd_p.remove_subsets_of(itemset) {
            debug!(?evicted, "evicted from the positive border");
            self.stats.forget(evicted.len());
        }
        self.bd_p.insert(itemset, support);
        self.stats.record(itemset.len());
        true
    }

    fn finalize(&mut self) {
        let apriori = mem::take(&mut self.bd_p_apriori);
        for (itemset, _) in &apriori {
            self.stats.record(itemset.len());
        }
        self.bd_p.merge(apriori);
    }
}
