use std::path::PathBuf;

use crate::error::{MinerError, Result};
use crate::oracle::IndexKind;
use crate::types::{ItemsetLength, Support};

pub const DEFAULT_RATIO: f64 = 0.01;
pub const DEFAULT_EPS: f64 = 0.001;

pub const USAGE: &str = "usage: borders datafile minsup [outputfile] [-o ratio eps [-v]] | [-v]
  datafile    transactions, one per line, whitespace separated item ids
  minsup      minimum support (absolute number of transactions)
  outputfile  file to write the maximal itemsets to
  -o ratio    seed stopping ratio (default 0.01); above 1, the number of seed levels
     eps      near border tolerance (default 0.001)
  -v          verbose progress and timing";

/// Order in which frequent items receive their dense ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recoding {
    /// Ascending frequency, ties broken by the original id.
    ByFrequency,
    /// Ascending original id.
    ByName,
}

impl Default for Recoding {
    fn default() -> Self {
        Recoding::ByFrequency
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinerConfig {
    pub min_support: Support,
    /// Infrequent-candidate ratio below which the seed stops early and the near border is
    /// switched off.
    pub stop_ratio: f64,
    /// Fixed number of seed levels. Disables the stopping rule.
    pub level_cap: Option<ItemsetLength>,
    /// Candidates whose distance to the threshold is at most `eps` go to the optimistic sweep.
    pub eps: f64,
    pub recoding: Recoding,
    pub index: IndexKind,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            min_support: 1,
            stop_ratio: DEFAULT_RATIO,
            level_cap: None,
            eps: DEFAULT_EPS,
            recoding: Recoding::default(),
            index: IndexKind::default(),
        }
    }
}

impl MinerConfig {
    pub fn new(min_support: Support) -> Self {
        MinerConfig {
            min_support,
            ..Default::default()
        }
    }

    /// A ratio above 1 is read as a level cap.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        if ratio > 1.0 {
            self.level_cap = Some(ratio as ItemsetLength);
        }
        self.stop_ratio = ratio;
        self
    }

    pub fn with_level_cap(mut self, level_cap: ItemsetLength) -> Self {
        self.level_cap = Some(level_cap);
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_recoding(mut self, recoding: Recoding) -> Self {
        self.recoding = recoding;
        self
    }

    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_support == 0 {
            return Err(MinerError::InvalidSupport(self.min_support.to_string()));
        }
        if !(self.eps >= 0.0) {
            return Err(MinerError::InvalidArgument {
                name: "eps",
                value: self.eps.to_string(),
            });
        }
        if !(self.stop_ratio >= 0.0) {
            return Err(MinerError::InvalidArgument {
                name: "ratio",
                value: self.stop_ratio.to_string(),
            });
        }
        if self.level_cap == Some(0) {
            return Err(MinerError::InvalidArgument {
                name: "level cap",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

/// One command line run.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub data_file: PathBuf,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub config: MinerConfig,
}

impl Invocation {
    /// Parses the arguments following the program name. `Ok(None)` means the arguments do not
    /// follow the grammar and usage should be shown.
    pub fn parse<I, S>(args: I) -> Result<Option<Invocation>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.len() < 2 {
            return Ok(None);
        }

        let data_file = PathBuf::from(&args[0]);
        let min_support = args[1]
            .parse::<Support>()
            .map_err(|_| MinerError::InvalidSupport(args[1].clone()))?;

        let (output, options) = match args.get(2) {
            Some(path) if !path.starts_with('-') => (Some(PathBuf::from(path)), &args[3..]),
            _ => (None, &args[2..]),
        };

        let mut config = MinerConfig::new(min_support);
        let options: Vec<&str> = options.iter().map(String::as_str).collect();
        let verbose = match options.as_slice() {
            [] => false,
            ["-v"] => true,
            ["-o", ratio, eps] => {
                config = with_tuning(config, ratio, eps)?;
                false
            }
            ["-o", ratio, eps, "-v"] => {
                config = with_tuning(config, ratio, eps)?;
                true
            }
            _ => return Ok(None),
        };

        config.validate()?;
        Ok(Some(Invocation {
            data_file,
            output,
            verbose,
            config,
        }))
    }
}

fn with_tuning(config: MinerConfig, ratio: &str, eps: &str) -> Result<MinerConfig> {
    Ok(config
        .with_ratio(parse_number("ratio", ratio)?)
        .with_eps(parse_number("eps", eps)?))
}

fn parse_number(name: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| MinerError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}
