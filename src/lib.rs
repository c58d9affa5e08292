//! Maximal frequent itemset mining by adaptive border tracking.
//!
//! A levelwise seed counts the short itemsets, then the search jumps between the positive
//! border (maximal frequent itemsets) and the negative border (minimal infrequent ones) through
//! incremental minimal transversals, instead of climbing one level at a time.

pub mod border;
pub mod combi;
pub mod config;
pub mod error;
pub mod io;
pub mod itemsets;
pub mod oracle;
pub mod transversal;
pub mod trie;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

pub use border::{border_error, mine, mine_file, BorderStats, BorderTracker, MiningResult};
pub use config::{MinerConfig, Recoding};
pub use error::{MinerError, Result};
pub use itemsets::{LevelwiseSeed, SeedOutcome};
pub use oracle::{IndexKind, SupportOracle, TransactionIndex};
pub use transversal::MinimalTransversals;
pub use trie::ItemsetTrie;
