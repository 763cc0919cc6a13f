pub mod helpers;
pub mod mcmc;
pub mod model;
pub mod mu;
pub mod prelude;
pub mod triangle;

pub use self::mu::{calculate_mu, gradient, Gradient};
