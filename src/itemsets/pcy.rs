use bitvec::prelude::*;
use itertools::Itertools;

use crate::types::{ItemId, Support, Transaction};

type BucketId = usize;

const NUM_BUCKETS: usize = 1 << 16;

/// Park-Chen-Yu filter for candidate pairs.
///
/// Every pair of every transaction is hashed into a bucket. A pair whose bucket total is below
/// the minimum support cannot be frequent, so it need not be counted.
#[derive(Debug, Clone)]
pub struct PairFilter {
    heavy: BitVec<Lsb0, usize>,
}

impl PairFilter {
    pub fn new(transactions: &[Transaction], min_support: Support) -> Self {
        let bucket_counts = get_bucket_counts(transactions);
        PairFilter {
            heavy: counts_to_bitvec(&bucket_counts, min_support),
        }
    }

    /// False only for pairs known to be infrequent.
    pub fn may_be_frequent(&self, a: ItemId, b: ItemId) -> bool {
        self.heavy[f(a, b)]
    }

    pub fn heavy_buckets(&self) -> usize {
        self.heavy.count_ones()
    }
}

fn get_bucket_counts(transactions: &[Transaction]) -> Vec<Support> {
    let mut counts = vec![0; NUM_BUCKETS];
    for transaction in transactions {
        for (&a, &b) in transaction.iter().tuple_combinations() {
            counts[f(a, b)] += 1;
        }
    }
    counts
}

fn f(a: ItemId, b: ItemId) -> BucketId {
    a.wrapping_mul(31).wrapping_add(b) % NUM_BUCKETS
}

fn counts_to_bitvec(counts: &[Support], min_support: Support) -> BitVec<Lsb0, usize> {
    let mut heavy = bitvec![Lsb0, usize; 0; NUM_BUCKETS];
    for (count, mut bit) in counts.iter().zip(heavy.iter_mut()) {
        *bit = *count >= min_support;
    }
    heavy
}
