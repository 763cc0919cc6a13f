use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::prelude::*;

/// Initialises tracing.
pub fn init() -> Result {
    let format_filter = EnvFilter::try_from_env("LOSS_MODEL_LOG")
        .or_else(|_| EnvFilter::try_new("loss_model=info"))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_filter(format_filter);

    tracing_subscriber::Registry::default()
        .with(format_layer)
        .try_init()?;

    Ok(())
}
