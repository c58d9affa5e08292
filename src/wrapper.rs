use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{IntoPyDict, PyDict, PyFrozenSet};
use pyo3::wrap_pyfunction;

use crate::border::{mine, MiningResult};
use crate::config::MinerConfig;
use crate::types::{RawTransaction, Support};

macro_rules! pyfrozenset {
    ($py:expr,$x:expr) => {{
        let set: Py<PyFrozenSet> = PyFrozenSet::new($py, &$x)?.into();
        set
    }};
}

/// Maximal frequent itemsets of `transactions`, as `{frozenset(items): support}`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, ratio=None, eps=None)")]
fn maximal_itemsets(
    transactions: Vec<RawTransaction>,
    min_support: Support,
    ratio: Option<f64>,
    eps: Option<f64>,
) -> PyResult<Py<PyDict>> {
    let mut config = MinerConfig::new(min_support);
    if let Some(ratio) = ratio {
        config = config.with_ratio(ratio);
    }
    if let Some(eps) = eps {
        config = config.with_eps(eps);
    }

    let result =
        mine(&transactions, &config).map_err(|err| PyValueError::new_err(err.to_string()))?;
    convert_border(&result)
}

pub fn convert_border(result: &MiningResult) -> PyResult<Py<PyDict>> {
    Python::with_gil(|py| {
        let border = result
            .itemsets()
            .into_iter()
            .map(|(itemset, support)| Ok((pyfrozenset![py, itemset], support)))
            .collect::<PyResult<Vec<(Py<PyFrozenSet>, Support)>>>()?;
        Ok(border.into_py_dict(py).into())
    })
}

#[pymodule]
fn borders(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(maximal_itemsets, m)?)?;
    Ok(())
}
