//! MCMC run options.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Sampler {
    Metropolis,
    Slice,
    Hamiltonian,

    #[default]
    Nuts,

    Gibbs,
}

impl Sampler {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metropolis => "metropolis",
            Self::Slice => "slice",
            Self::Hamiltonian => "hamiltonian",
            Self::Nuts => "nuts",
            Self::Gibbs => "gibbs",
        }
    }
}

impl Display for Sampler {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Sampler {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "metropolis" => Ok(Self::Metropolis),
            "slice" => Ok(Self::Slice),
            "hamiltonian" => Ok(Self::Hamiltonian),
            "nuts" => Ok(Self::Nuts),
            "gibbs" => Ok(Self::Gibbs),
            _ => Err(anyhow!("unknown sampler: {}", value)),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct McmcOptions {
    pub n_burn_in: u64,
    pub n_samples: u64,
    pub n_chains: u64,
    pub n_cores: u64,
    pub n_thin: u64,
    pub sampler: Sampler,
    pub random_seed: u64,
    pub progress_bar: bool,
}

impl Default for McmcOptions {
    fn default() -> Self {
        Self {
            n_burn_in: 1000,
            n_samples: 10_000,
            n_chains: 4,
            n_cores: 4,
            n_thin: 1,
            sampler: Sampler::default(),
            random_seed: 42,
            progress_bar: true,
        }
    }
}

/// Options which passed the validation, with the sample count split between the chains.
#[derive(Serialize, Copy, Clone, Debug, PartialEq)]
pub struct RunPlan {
    #[serde(flatten)]
    pub options: McmcOptions,

    pub n_samples_per_chain: u64,

    /// Burn-in and sampling iterations per chain.
    pub n_total: u64,
}

impl McmcOptions {
    pub fn validate(self) -> Result<RunPlan> {
        if self.n_chains == 0 {
            bail!("number of chains must be positive");
        }
        if self.n_thin == 0 {
            bail!("thinning interval must be positive");
        }
        let n_samples_per_chain = (self.n_samples / self.n_chains)
            .checked_add(1)
            .ok_or_else(|| anyhow!("number of samples per chain overflows"))?;
        let n_total = self
            .n_burn_in
            .checked_add(n_samples_per_chain)
            .ok_or_else(|| anyhow!("total number of iterations overflows"))?;
        let plan = RunPlan {
            options: self,
            n_samples_per_chain,
            n_total,
        };
        debug!(n_samples_per_chain, n_total = plan.n_total, "validated the options");
        Ok(plan)
    }
}
