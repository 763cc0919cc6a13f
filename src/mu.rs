//! Linear predictor of the loss model.

use std::ops::Add;

use num_dual::Dual64;
use serde::Serialize;

/// Calculates `mu = log_prem + ratio + alpha + beta`.
///
/// Works for plain `f64` as well as for [`Dual64`], in which case the derivative
/// component of the result is the sum of the operands' derivative components.
///
/// The summation order is fixed and differs from the parameter order.
#[inline]
#[must_use]
pub fn calculate_mu<T: Add<Output = T>>(log_prem: T, alpha: T, beta: T, ratio: T) -> T {
    log_prem + ratio + alpha + beta
}

/// Value of `mu` and its partial derivatives with respect to each of the operands.
#[derive(Serialize, Copy, Clone, Debug, PartialEq)]
pub struct Gradient {
    pub value: f64,
    pub d_log_prem: f64,
    pub d_alpha: f64,
    pub d_beta: f64,
    pub d_ratio: f64,
}

/// Differentiates [`calculate_mu`] at the given point.
///
/// Runs one forward pass per operand, seeding the operand's derivative with `1.0`.
#[must_use]
pub fn gradient(log_prem: f64, alpha: f64, beta: f64, ratio: f64) -> Gradient {
    let operands = [log_prem, alpha, beta, ratio];
    let partial = |seeded: usize| {
        let [log_prem, alpha, beta, ratio] = seed(operands, seeded);
        calculate_mu(log_prem, alpha, beta, ratio)
    };
    let d_log_prem = partial(0);
    Gradient {
        value: d_log_prem.re,
        d_log_prem: d_log_prem.eps,
        d_alpha: partial(1).eps,
        d_beta: partial(2).eps,
        d_ratio: partial(3).eps,
    }
}

fn seed(operands: [f64; 4], seeded: usize) -> [Dual64; 4] {
    let mut duals = operands.map(|operand| Dual64::new(operand, 0.0));
    duals[seeded].eps = 1.0;
    duals
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn positive_inputs_ok() {
        assert!((calculate_mu(2.0_f64, 1.0, 0.5, 0.3) - 3.8).abs() < TOLERANCE);
    }

    #[test]
    fn zero_inputs_ok() {
        assert!(calculate_mu(0.0_f64, 0.0, 0.0, 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn negative_inputs_ok() {
        assert!((calculate_mu(-2.0_f64, -1.0, -0.5, -0.3) + 3.8).abs() < TOLERANCE);
    }

    #[test]
    fn mixed_inputs_ok() {
        assert!((calculate_mu(2.0_f64, -1.0, 0.5, -0.3) - 1.2).abs() < TOLERANCE);
    }

    #[test]
    fn summation_order_ok() {
        // Both ones are absorbed by 1e16 before it cancels out.
        assert_eq!(calculate_mu(1e16, 1.0, -1e16, 1.0), 0.0);
        assert_eq!(1e16 + 1.0 - 1e16 + 1.0, 1.0);
    }

    #[test]
    fn alpha_beta_swap_ok() {
        assert_eq!(calculate_mu(0.75, 0.5, 0.25, -0.125), calculate_mu(0.75, 0.25, 0.5, -0.125));
        let swapped = calculate_mu(0.7_f64, 0.2, 0.1, -0.4);
        assert!((calculate_mu(0.7, 0.1, 0.2, -0.4) - swapped).abs() < TOLERANCE);
    }

    #[test]
    fn additive_identity_ok() {
        for value in [0.0, -3.25, 17.5, 1e-300, f64::MAX] {
            assert_eq!(calculate_mu(value, 0.0, 0.0, 0.0), value);
        }
    }

    #[test]
    fn negation_symmetry_ok() {
        let (a, b, c, d) = (2.0, 1.0, 0.5, 0.3);
        assert_eq!(calculate_mu(-a, -b, -c, -d), -calculate_mu(a, b, c, d));
    }

    #[test]
    fn non_finite_propagates_ok() {
        assert!(calculate_mu(f64::NAN, 1.0, 1.0, 1.0).is_nan());
        assert_eq!(calculate_mu(f64::INFINITY, 1.0, 1.0, 1.0), f64::INFINITY);
        assert!(calculate_mu(f64::INFINITY, f64::NEG_INFINITY, 0.0, 0.0).is_nan());
    }

    #[test]
    fn dual_value_ok() {
        let mu = calculate_mu(
            Dual64::new(2.0, 0.0),
            Dual64::new(1.0, 0.0),
            Dual64::new(0.5, 0.0),
            Dual64::new(0.3, 0.0),
        );
        assert_eq!(mu.re, calculate_mu(2.0, 1.0, 0.5, 0.3));
        assert_eq!(mu.eps, 0.0);
    }

    #[test]
    fn gradient_ok() {
        for (log_prem, alpha, beta, ratio) in [
            (2.0, 1.0, 0.5, 0.3),
            (0.0, 0.0, 0.0, 0.0),
            (-2.0, -1.0, -0.5, -0.3),
            (2.0, -1.0, 0.5, -0.3),
        ] {
            let gradient = gradient(log_prem, alpha, beta, ratio);
            assert_eq!(gradient.value, calculate_mu(log_prem, alpha, beta, ratio));
            assert_eq!(gradient.d_log_prem, 1.0);
            assert_eq!(gradient.d_alpha, 1.0);
            assert_eq!(gradient.d_beta, 1.0);
            assert_eq!(gradient.d_ratio, 1.0);
        }
    }
}
