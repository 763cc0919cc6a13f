//! Loss triangle: premiums per accident year and cumulative losses per cell.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::bail;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Long-format triangle row with 1-based accident and development years.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    pub acc: usize,
    pub dev: usize,
    pub premium: f64,

    /// Cumulative loss, `None` for a cell that has not been observed yet.
    #[serde(default)]
    pub loss: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawTriangle")]
pub struct Triangle {
    premiums: Vec<f64>,

    /// Accident years by development years.
    losses: Vec<Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct RawTriangle {
    premiums: Vec<f64>,
    losses: Vec<Vec<Option<f64>>>,
}

impl TryFrom<RawTriangle> for Triangle {
    type Error = anyhow::Error;

    fn try_from(raw: RawTriangle) -> Result<Self> {
        Self::new(raw.premiums, raw.losses)
    }
}

impl Triangle {
    pub fn new(premiums: Vec<f64>, losses: Vec<Vec<Option<f64>>>) -> Result<Self> {
        if premiums.is_empty() {
            bail!("the triangle has no accident years");
        }
        if premiums.len() != losses.len() {
            bail!(
                "got {} premiums for {} accident years",
                premiums.len(),
                losses.len(),
            );
        }
        let n_development_years = losses[0].len();
        if n_development_years == 0 {
            bail!("the triangle has no development years");
        }
        if let Some((w, row)) = losses
            .iter()
            .find_position(|row| row.len() != n_development_years)
        {
            bail!(
                "accident year #{} has {} development years, expected {}",
                w + 1,
                row.len(),
                n_development_years,
            );
        }
        if let Some((w, premium)) = premiums.iter().find_position(|premium| !is_positive(**premium)) {
            bail!("premium {} of accident year #{} is not positive", premium, w + 1);
        }
        for (w, row) in losses.iter().enumerate() {
            for (d, loss) in row.iter().enumerate() {
                match loss {
                    Some(loss) if !is_positive(*loss) => {
                        bail!("loss {} at ({}, {}) is not positive", loss, w + 1, d + 1);
                    }
                    _ => {}
                }
            }
        }
        Ok(Self { premiums, losses })
    }

    /// Builds the triangle from melted rows, in any order.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self> {
        let mut premiums = BTreeMap::new();
        let mut losses = BTreeMap::new();
        let mut development_years = BTreeSet::new();

        for cell in cells {
            if cell.acc == 0 || cell.dev == 0 {
                bail!("cell ({}, {}) is not 1-based", cell.acc, cell.dev);
            }
            if !is_positive(cell.premium) {
                bail!("premium {} of accident year #{} is not positive", cell.premium, cell.acc);
            }
            match premiums.insert(cell.acc, cell.premium) {
                Some(premium) if premium != cell.premium => {
                    bail!(
                        "accident year #{} has conflicting premiums {} and {}",
                        cell.acc,
                        premium,
                        cell.premium,
                    );
                }
                _ => {}
            }
            if losses.insert((cell.acc, cell.dev), cell.loss).is_some() {
                bail!("duplicate cell ({}, {})", cell.acc, cell.dev);
            }
            development_years.insert(cell.dev);
        }

        let n_development_years = development_years.len();
        if let Some(dev) = (1..=n_development_years).find(|dev| !development_years.contains(dev)) {
            bail!("development year #{} has no cells", dev);
        }

        let n_accident_years = premiums.keys().next_back().copied().unwrap_or_default();
        let premiums = (1..=n_accident_years)
            .map(|acc| {
                premiums
                    .get(&acc)
                    .copied()
                    .ok_or_else(|| anyhow!("accident year #{} has no cells", acc))
            })
            .collect::<Result<Vec<_>>>()?;
        let losses = (1..=n_accident_years)
            .map(|acc| {
                (1..=n_development_years)
                    .map(|dev| losses.get(&(acc, dev)).copied().flatten())
                    .collect()
            })
            .collect();

        Self::new(premiums, losses)
    }

    #[must_use]
    pub fn n_accident_years(&self) -> usize {
        self.premiums.len()
    }

    #[must_use]
    pub fn n_development_years(&self) -> usize {
        self.losses[0].len()
    }

    #[must_use]
    pub fn premiums(&self) -> &[f64] {
        &self.premiums
    }

    pub fn log_premiums(&self) -> impl Iterator<Item = f64> + '_ {
        self.premiums.iter().map(|premium| premium.ln())
    }

    /// Observed cells as `(w, d, loss)` with 0-based indices, row by row.
    pub fn observed(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.losses.iter().enumerate().flat_map(|(w, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(d, loss)| loss.map(|loss| (w, d, loss)))
        })
    }

    #[must_use]
    pub fn n_observed(&self) -> usize {
        self.observed().count()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
