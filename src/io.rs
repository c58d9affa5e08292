//! Transaction files in, border files out.
//!
//! A transaction file holds one transaction per line as whitespace separated non-negative
//! integers. Blank lines are empty transactions.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::{MinerError, Result};
use crate::trie::ItemsetTrie;
use crate::types::{ItemRemap, RawItem, RawTransaction};

pub fn read_transactions(path: &Path) -> Result<Vec<RawTransaction>> {
    let file = File::open(path).map_err(|source| MinerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let transactions = parse_transactions(BufReader::new(file), path)?;
    if transactions.is_empty() {
        return Err(MinerError::NoTransactions {
            path: path.to_path_buf(),
        });
    }
    Ok(transactions)
}

/// `path` is only used to label errors.
pub fn parse_transactions<R: BufRead>(reader: R, path: &Path) -> Result<Vec<RawTransaction>> {
    let mut transactions = Vec::new();
    let mut seen = HashSet::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MinerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut transaction = RawTransaction::new();
        seen.clear();
        for token in line.split_whitespace() {
            let item: RawItem = token.parse().map_err(|_| MinerError::ItemExpected {
                path: path.to_path_buf(),
                line: index + 1,
                token: token.to_string(),
            })?;
            if !seen.insert(item) {
                return Err(MinerError::DuplicateItem {
                    path: path.to_path_buf(),
                    line: index + 1,
                    item,
                });
            }
            transaction.push(item);
        }
        transactions.push(transaction);
    }
    Ok(transactions)
}

/// Writes one `a b c (support)` line per itemset, in original item names.
pub fn write_border(path: &Path, border: &ItemsetTrie, remap: &ItemRemap) -> Result<()> {
    write_with(path, |out| write_border_to(out, border, remap))
}

/// Writes each itemset as a transaction line, items ascending by original name.
pub fn write_dataset(path: &Path, itemsets: &ItemsetTrie, remap: &ItemRemap) -> Result<()> {
    write_with(path, |out| write_dataset_to(out, itemsets, remap))
}

pub fn write_border_to<W: Write>(
    out: &mut W,
    border: &ItemsetTrie,
    remap: &ItemRemap,
) -> io::Result<()> {
    for (itemset, support) in border {
        for &id in &itemset {
            write!(out, "{} ", remap[id])?;
        }
        writeln!(out, "({})", support)?;
    }
    Ok(())
}

pub fn write_dataset_to<W: Write>(
    out: &mut W,
    itemsets: &ItemsetTrie,
    remap: &ItemRemap,
) -> io::Result<()> {
    for (itemset, _) in itemsets {
        let names = itemset.iter().map(|&id| remap[id]).sorted();
        writeln!(out, "{}", names.format(" "))?;
    }
    Ok(())
}

fn write_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source| MinerError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(to_error)?;
    out.flush().map_err(to_error)
}
