use clap::Parser;
use loss_model::helpers::tracing;
use loss_model::mcmc::McmcOptions;
use loss_model::prelude::*;

use crate::opts::{Opts, Subcommand};

mod opts;

fn main() -> Result {
    let opts = Opts::parse();
    tracing::init()?;

    let output = match opts.subcommand {
        Subcommand::Mu(opts) => opts.run(),
        Subcommand::Mcmc(opts) => {
            let plan = McmcOptions::from(opts).validate()?;
            info!(n_total = plan.n_total, sampler = %plan.options.sampler, "run plan is ready");
            serde_json::to_value(plan)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

