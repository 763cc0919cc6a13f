//! Cross-classified model for stochastic loss reserving.
//!
//! For accident year `w` and development year `d`:
//!
//! - `log_elr ~ Normal(-0.4, sqrt(10))`
//! - `alpha[w] ~ Normal(0, sqrt(10))` for `w > 0`, `alpha[0] = 0`
//! - `beta[d] ~ Normal(0, sqrt(10))` for `d < D - 1`, `beta[D - 1] = 0`
//! - `a[d] ~ Uniform(0, 1)`
//! - `sigma2[d] = a[d] + a[d + 1] + … + a[D - 1]`
//! - `mu[w, d] = ln(premium[w]) + log_elr + alpha[w] + beta[d]`
//! - `loss[w, d] ~ LogNormal(mu[w, d], sqrt(sigma2[d]))`
//!
//! See: Glenn Meyers, «Stochastic Loss Reserving Using Bayesian MCMC Models», 2nd edition.

use std::ops::Add;

use anyhow::{bail, Context};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, LogNormal, Normal, Uniform};

use crate::mu::calculate_mu;
use crate::prelude::*;
use crate::triangle::Triangle;

const LOG_ELR_PRIOR_MEAN: f64 = -0.4;
const EFFECT_PRIOR_VARIANCE: f64 = 10.0;

/// Model parameters, generic over the scalar of the free effects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawCrossClassified<T>")]
pub struct CrossClassified<T> {
    pub log_elr: T,

    /// Accident year effects except the first one, which is fixed at zero.
    pub r_alpha: Vec<T>,

    /// Development year effects except the last one, which is fixed at zero.
    pub r_beta: Vec<T>,

    /// Development year variance components.
    pub a: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCrossClassified<T> {
    log_elr: T,
    r_alpha: Vec<T>,
    r_beta: Vec<T>,
    a: Vec<f64>,
}

impl<T> TryFrom<RawCrossClassified<T>> for CrossClassified<T> {
    type Error = anyhow::Error;

    fn try_from(raw: RawCrossClassified<T>) -> Result<Self> {
        Self::new(raw.log_elr, raw.r_alpha, raw.r_beta, raw.a)
    }
}

impl<T> CrossClassified<T> {
    pub fn new(log_elr: T, r_alpha: Vec<T>, r_beta: Vec<T>, a: Vec<f64>) -> Result<Self> {
        if let Some((d, a)) = a.iter().enumerate().find(|(_, a)| !(a.is_finite() && **a > 0.0)) {
            bail!("variance component #{} is not positive: {}", d + 1, a);
        }
        Ok(Self { log_elr, r_alpha, r_beta, a })
    }

    pub fn check_shape(&self, triangle: &Triangle) -> Result {
        let n_accident_years = triangle.n_accident_years();
        let n_development_years = triangle.n_development_years();
        if self.r_alpha.len() + 1 != n_accident_years {
            bail!(
                "expected {} accident year effects, got {}",
                n_accident_years - 1,
                self.r_alpha.len(),
            );
        }
        if self.r_beta.len() + 1 != n_development_years {
            bail!(
                "expected {} development year effects, got {}",
                n_development_years - 1,
                self.r_beta.len(),
            );
        }
        if self.a.len() != n_development_years {
            bail!(
                "expected {} variance components, got {}",
                n_development_years,
                self.a.len(),
            );
        }
        Ok(())
    }

    /// Reverse cumulative sum of the variance components.
    #[must_use]
    pub fn sigma2(&self) -> Vec<f64> {
        reverse_cumsum(&self.a)
    }
}

impl<T: Copy + Zero> CrossClassified<T> {
    #[must_use]
    pub fn alpha(&self) -> Vec<T> {
        std::iter::once(T::zero())
            .chain(self.r_alpha.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn beta(&self) -> Vec<T> {
        self.r_beta
            .iter()
            .copied()
            .chain(std::iter::once(T::zero()))
            .collect()
    }
}

impl<T: Copy + Zero + Add<Output = T> + From<f64>> CrossClassified<T> {
    /// Linear predictor for every cell of the triangle, observed or not.
    pub fn mu(&self, triangle: &Triangle) -> Result<Vec<Vec<T>>> {
        self.check_shape(triangle)?;
        let beta = self.beta();
        let mu = triangle
            .log_premiums()
            .zip(self.alpha())
            .map(|(log_premium, alpha)| {
                beta.iter()
                    .map(|beta| calculate_mu(T::from(log_premium), alpha, *beta, self.log_elr))
                    .collect()
            })
            .collect();
        Ok(mu)
    }
}

impl CrossClassified<f64> {
    /// Unnormalised log prior density of the parameters.
    pub fn log_prior(&self) -> Result<f64> {
        let effect_std_dev = EFFECT_PRIOR_VARIANCE.sqrt();
        let log_elr_prior = Normal::new(LOG_ELR_PRIOR_MEAN, effect_std_dev)?;
        let effect_prior = Normal::new(0.0, effect_std_dev)?;
        let a_prior = Uniform::new(0.0, 1.0)?;

        let log_prior = log_elr_prior.ln_pdf(self.log_elr)
            + self
                .r_alpha
                .iter()
                .chain(&self.r_beta)
                .map(|effect| effect_prior.ln_pdf(*effect))
                .sum::<f64>()
            + self.a.iter().map(|a| a_prior.ln_pdf(*a)).sum::<f64>();
        Ok(log_prior)
    }

    /// Log-normal log likelihood of the observed cells.
    #[instrument(level = "debug", skip_all, fields(n_observed = triangle.n_observed()))]
    pub fn log_likelihood(&self, triangle: &Triangle) -> Result<f64> {
        let mu = self.mu(triangle)?;
        let sigma = self.sigma2().into_iter().map(f64::sqrt).collect::<Vec<_>>();

        let mut log_likelihood = 0.0;
        for (w, d, loss) in triangle.observed() {
            let distribution = LogNormal::new(mu[w][d], sigma[d])
                .with_context(|| format!("invalid distribution at ({}, {})", w + 1, d + 1))?;
            log_likelihood += distribution.ln_pdf(loss);
        }
        debug!(log_likelihood, "evaluated the log likelihood");
        Ok(log_likelihood)
    }

    /// Unnormalised log posterior density.
    #[instrument(level = "debug", skip_all)]
    pub fn log_density(&self, triangle: &Triangle) -> Result<f64> {
        let log_density = self.log_prior()? + self.log_likelihood(triangle)?;
        debug!(log_density, "evaluated the log density");
        Ok(log_density)
    }
}

fn reverse_cumsum<T: Copy + Zero>(values: &[T]) -> Vec<T> {
    let mut sums = values
        .iter()
        .rev()
        .scan(T::zero(), |sum, value| {
            *sum = *sum + *value;
            Some(*sum)
        })
        .collect::<Vec<_>>();
    sums.reverse();
    sums
}
