pub use std::result::Result as StdResult;

pub use anyhow::anyhow;
pub use tracing::{debug, info, instrument};

pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
