use std::collections::HashMap;

use crate::error::{invalid_itemset, Result};

pub type ItemId = usize;
pub type Itemset = Vec<ItemId>;
pub type Support = u32;

/// Item identifier as it appears in the input file.
pub type RawItem = u32;
pub type RawTransaction = Vec<RawItem>;
pub type Transaction = Vec<ItemId>;

/// `remap[id]` is the original name of recoded item `id`.
pub type ItemRemap = Vec<RawItem>;

pub type ItemsetLength = usize;

/// Frequency of every item, by original name.
pub type ItemCounts = HashMap<RawItem, Support>;

/// Rejects itemsets that are not strictly ascending or that leave `[0, universe)`.
pub fn check_itemset(itemset: &[ItemId], universe: usize) -> Result<()> {
    let ascending = itemset.windows(2).all(|w| w[0] < w[1]);
    let in_range = itemset.last().map_or(true, |&last| last < universe);
    if ascending && in_range {
        Ok(())
    } else {
        Err(invalid_itemset(itemset, universe))
    }
}

/// Sorted gap sequence `[0, universe) \ itemset`.
pub fn complement_of(itemset: &[ItemId], universe: usize) -> Itemset {
    let mut gaps = Vec::with_capacity(universe.saturating_sub(itemset.len()));
    let mut rest = itemset.iter().peekable();
    for item in 0..universe {
        if rest.peek() == Some(&&item) {
            rest.next();
        } else {
            gaps.push(item);
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_skips_members() {
        assert_eq!(complement_of(&[1, 3], 5), vec![0, 2, 4]);
        assert_eq!(complement_of(&[], 3), vec![0, 1, 2]);
        assert_eq!(complement_of(&[0, 1, 2], 3), Vec::<ItemId>::new());
    }

    #[test]
    fn check_itemset_rejects_bad_input() {
        assert!(check_itemset(&[0, 2, 4], 5).is_ok());
        assert!(check_itemset(&[], 0).is_ok());
        assert!(check_itemset(&[2, 1], 5).is_err());
        assert!(check_itemset(&[1, 1], 5).is_err());
        assert!(check_itemset(&[0, 5], 5).is_err());
    }
}
