use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::types::{ItemId, Itemset, RawItem};

#[derive(Debug)]
pub enum MinerError {
    Open { path: PathBuf, source: io::Error },
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    ItemExpected { path: PathBuf, line: usize, token: String },
    DuplicateItem { path: PathBuf, line: usize, item: RawItem },
    NoTransactions { path: PathBuf },
    InvalidSupport(String),
    InvalidArgument { name: &'static str, value: String },
    InvalidItemset { itemset: Itemset, universe: usize },
}

impl MinerError {
    /// Process exit status for the command line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            MinerError::Open { .. } => 2,
            MinerError::Read { .. } => 3,
            MinerError::Write { .. } => 4,
            MinerError::InvalidSupport(_) => 8,
            MinerError::NoTransactions { .. } => 9,
            MinerError::InvalidArgument { .. } => 10,
            MinerError::ItemExpected { .. } => 16,
            MinerError::DuplicateItem { .. } => 17,
            MinerError::InvalidItemset { .. } => 18,
        }
    }
}

impl fmt::Display for MinerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerError::Open { path, .. } => write!(f, "cannot open file {}", path.display()),
            MinerError::Read { path, .. } => write!(f, "read error on file {}", path.display()),
            MinerError::Write { path, .. } => write!(f, "write error on file {}", path.display()),
            MinerError::ItemExpected { path, line, token } => write!(
                f,
                "file {}, record {}: item expected, found \"{}\"",
                path.display(),
                line,
                token
            ),
            MinerError::DuplicateItem { path, line, item } => write!(
                f,
                "file {}, record {}: duplicate item {}",
                path.display(),
                line,
                item
            ),
            MinerError::NoTransactions { path } => {
                write!(f, "no items or transactions to work on in {}", path.display())
            }
            MinerError::InvalidSupport(value) => write!(f, "invalid minimal support {}", value),
            MinerError::InvalidArgument { name, value } => {
                write!(f, "invalid value \"{}\" for {}", value, name)
            }
            MinerError::InvalidItemset { itemset, universe } => write!(
                f,
                "itemset {:?} is not strictly ascending within [0, {})",
                itemset, universe
            ),
        }
    }
}

impl std::error::Error for MinerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinerError::Open { source, .. }
            | MinerError::Read { source, .. }
            | MinerError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinerError>;

/// Shorthand used by the boundary checks.
pub(crate) fn invalid_itemset(itemset: &[ItemId], universe: usize) -> MinerError {
    MinerError::InvalidItemset {
        itemset: itemset.to_vec(),
        universe,
    }
}
