// src/analytics/heatmap.rs
//! Greek surfaces over a spot × volatility grid
//!
//! Row `i` of the returned matrix holds the chosen Greek for `vols[i]` at
//! every spot in `spots`, which is the layout heat-map widgets expect
//! (y axis = volatility, x axis = spot). Rows are evaluated in parallel.

use super::bs_analytic::{OptionKind, OptionParameters};
use super::greeks::{greeks, Greek};
use crate::error::{validation::*, QuantError, QuantResult};
use ndarray::Array2;
use rayon::prelude::*;

pub fn greek_heatmap(
    kind: OptionKind,
    base: &OptionParameters,
    greek: Greek,
    spots: &[f64],
    vols: &[f64],
) -> QuantResult<Array2<f64>> {
    base.validate()?;
    validate_series("spots", spots, 1)?;
    validate_series("vols", vols, 1)?;
    for &s in spots {
        validate_positive("spot", s)?;
    }
    for &v in vols {
        validate_non_negative("volatility", v)?;
    }

    let cells: Vec<f64> = vols
        .par_iter()
        .flat_map_iter(|&vol| {
            spots.iter().map(move |&spot| {
                let point = OptionParameters {
                    spot,
                    volatility: vol,
                    ..*base
                };
                greek.pick(&greeks(kind, &point))
            })
        })
        .collect();

    Array2::from_shape_vec((vols.len(), spots.len()), cells).map_err(|e| {
        QuantError::InvalidConfiguration {
            field: "grid".to_string(),
            reason: e.to_string(),
        }
    })
}
