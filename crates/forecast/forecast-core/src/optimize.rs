//! Derivative-free minimisation
//!
//! Nelder-Mead simplex search, used to minimise the conditional sum of
//! squares of ARMA models. The search is unconstrained.

use serde::{Deserialize, Serialize};

/// Nelder-Mead settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelderMeadConfig {
    /// Iteration budget before the search reports non-convergence
    pub max_iter: usize,
    /// Relative tolerance on the spread of simplex values, and absolute
    /// tolerance on the simplex diameter
    pub tolerance: f64,
    /// Offset used to build the initial simplex around the start point
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a Nelder-Mead search
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    pub optimal_point: Vec<f64>,
    pub optimal_value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `f` starting from `initial`.
///
/// NaN objective values are treated as `+inf`, so the simplex moves away from
/// regions where the objective is undefined.
pub fn nelder_mead<F>(f: F, initial: &[f64], config: NelderMeadConfig) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let eval = |x: &[f64]| {
        let value = f(x);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: Vec::new(),
            optimal_value: eval(initial),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += config.initial_step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v.as_slice())).collect();

    let mut iterations = 0;
    let mut converged = false;

    loop {
        sort_simplex(&mut simplex, &mut values);

        let best = values[0];
        let spread = values[n] - best;
        let diameter = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(simplex[0].iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);

        if (spread.is_finite() && spread <= config.tolerance * (best.abs() + config.tolerance))
            || diameter <= config.tolerance
        {
            converged = true;
            break;
        }
        if iterations >= config.max_iter {
            break;
        }
        iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
            .collect();
        let worst = simplex[n].clone();
        let towards = |scale: f64, target: &[f64]| -> Vec<f64> {
            centroid
                .iter()
                .zip(target.iter())
                .map(|(c, t)| c + scale * (t - c))
                .collect()
        };

        let reflected = towards(-REFLECTION, worst.as_slice());
        let reflected_value = eval(reflected.as_slice());

        if reflected_value < values[0] {
            let expanded = towards(EXPANSION, reflected.as_slice());
            let expanded_value = eval(expanded.as_slice());
            if expanded_value < reflected_value {
                simplex[n] = expanded;
                values[n] = expanded_value;
            } else {
                simplex[n] = reflected;
                values[n] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[n - 1] {
            simplex[n] = reflected;
            values[n] = reflected_value;
            continue;
        }

        let (contracted, accept_below) = if reflected_value < values[n] {
            (towards(CONTRACTION, reflected.as_slice()), reflected_value)
        } else {
            (towards(CONTRACTION, worst.as_slice()), values[n])
        };
        let contracted_value = eval(contracted.as_slice());
        if contracted_value < accept_below {
            simplex[n] = contracted;
            values[n] = contracted_value;
            continue;
        }

        let anchor = simplex[0].clone();
        for i in 1..=n {
            simplex[i] = anchor
                .iter()
                .zip(simplex[i].iter())
                .map(|(a, x)| a + SHRINK * (x - a))
                .collect();
            values[i] = eval(simplex[i].as_slice());
        }
    }

    sort_simplex(&mut simplex, &mut values);
    NelderMeadResult {
        optimal_point: simplex.swap_remove(0),
        optimal_value: values[0],
        iterations,
        converged,
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2) + 2.0,
            &[0.0, 0.0],
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!((result.optimal_point[0] - 3.0).abs() < 1e-4);
        assert!((result.optimal_point[1] + 1.0).abs() < 1e-4);
        assert!((result.optimal_value - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_rosenbrock() {
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.2, 1.0],
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!((result.optimal_point[0] - 1.0).abs() < 1e-3);
        assert!((result.optimal_point[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let config = NelderMeadConfig {
            max_iter: 3,
            ..Default::default()
        };
        let result = nelder_mead(|x| (x[0] - 50.0).powi(2), &[0.0], config);

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn test_nan_objective_is_avoided() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 0.5).powi(2) },
            &[0.2],
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_value.is_finite());
        assert!((result.optimal_point[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_dimensional() {
        let result = nelder_mead(|_| 7.0, &[], NelderMeadConfig::default());
        assert!(result.converged);
        assert_eq!(result.optimal_value, 7.0);
    }
}
