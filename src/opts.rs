//! CLI options.

use clap::{Args, Parser};
use loss_model::mcmc::{McmcOptions, Sampler};
use loss_model::{calculate_mu, gradient};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Opts {
    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand)]
pub enum Subcommand {
    Mu(MuOpts),
    Mcmc(McmcOpts),
}

/// Calculates the linear predictor `log_prem + ratio + alpha + beta`
#[derive(Args)]
pub struct MuOpts {
    /// Log premium
    #[arg(allow_negative_numbers = true)]
    pub log_prem: f64,

    /// Accident year effect
    #[arg(allow_negative_numbers = true)]
    pub alpha: f64,

    /// Development year effect
    #[arg(allow_negative_numbers = true)]
    pub beta: f64,

    /// Log expected loss ratio
    #[arg(allow_negative_numbers = true)]
    pub ratio: f64,

    /// Also print the partial derivatives
    #[arg(long)]
    pub gradient: bool,
}

impl MuOpts {
    pub fn run(&self) -> Value {
        if self.gradient {
            json!(gradient(self.log_prem, self.alpha, self.beta, self.ratio))
        } else {
            json!({ "value": calculate_mu(self.log_prem, self.alpha, self.beta, self.ratio) })
        }
    }
}

/// Validates the MCMC options and prints the run plan
#[derive(Args)]
pub struct McmcOpts {
    /// Number of burn-in (tuning) iterations per chain
    #[arg(long, env = "LOSS_MODEL_N_BURN_IN", default_value_t = 1000)]
    pub n_burn_in: u64,

    /// Total number of posterior samples across all the chains
    #[arg(long, env = "LOSS_MODEL_N_SAMPLES", default_value_t = 10_000)]
    pub n_samples: u64,

    #[arg(long, env = "LOSS_MODEL_N_CHAINS", default_value_t = 4)]
    pub n_chains: u64,

    #[arg(long, env = "LOSS_MODEL_N_CORES", default_value_t = 4)]
    pub n_cores: u64,

    /// Thinning interval
    #[arg(long, env = "LOSS_MODEL_N_THIN", default_value_t = 1)]
    pub n_thin: u64,

    #[arg(long, env = "LOSS_MODEL_SAMPLER", default_value_t = Sampler::Nuts)]
    pub sampler: Sampler,

    #[arg(long, env = "LOSS_MODEL_RANDOM_SEED", default_value_t = 42)]
    pub random_seed: u64,

    /// Disables the progress bar
    #[arg(long, env = "LOSS_MODEL_NO_PROGRESS_BAR")]
    pub no_progress_bar: bool,
}

impl From<McmcOpts> for McmcOptions {
    fn from(opts: McmcOpts) -> Self {
        Self {
            n_burn_in: opts.n_burn_in,
            n_samples: opts.n_samples,
            n_chains: opts.n_chains,
            n_cores: opts.n_cores,
            n_thin: opts.n_thin,
            sampler: opts.sampler,
            random_seed: opts.random_seed,
            progress_bar: !opts.no_progress_bar,
        }
    }
}
