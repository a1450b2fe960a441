//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: Uses past values to predict future values
//! - **I (Integrated)**: Differencing to achieve stationarity
//! - **MA (Moving Average)**: Uses past forecast errors
//!
//! Coefficients are estimated by conditional sum of squares (zero presample
//! values) with Nelder-Mead, starting from Yule-Walker AR estimates and a
//! residual-autocorrelation MA guess. There is no trend constant and no
//! stationarity or invertibility constraint: explosive or non-invertible
//! coefficients are accepted as fitted.
//!
//! ## Example
//!
//! ```rust
//! use forecast_core::{Arima, SeriesModel};
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 1).unwrap();
//! model.fit(&data).unwrap();
//! let interval = model.forecast_interval(3, 0.95).unwrap();
//! assert_eq!(interval.len(), 3);
//! ```

use crate::confidence;
use crate::optimize::{nelder_mead, NelderMeadConfig};
use forecast_spi::{
    ArimaOrder, ConfidenceInterval, FitError, FitResult, Result, SeriesModel,
};
use serde::{Deserialize, Serialize};

/// ARIMA model for yearly series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arima {
    order: ArimaOrder,
    /// AR coefficients
    ar_coeffs: Vec<f64>,
    /// MA coefficients
    ma_coeffs: Vec<f64>,
    /// Innovation variance
    sigma2: f64,
    /// Original data (for integrating forecasts)
    original_data: Vec<f64>,
    /// In-sample residuals on the differenced scale
    residuals: Vec<f64>,
    fitted: bool,
    optimizer: NelderMeadConfig,
}

impl Arima {
    /// Create a new ARIMA model with specified orders
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    pub fn with_order(order: ArimaOrder) -> Result<Self> {
        order.validate()?;

        Ok(Self {
            order,
            ar_coeffs: vec![0.0; order.p],
            ma_coeffs: vec![0.0; order.q],
            sigma2: 0.0,
            original_data: Vec::new(),
            residuals: Vec::new(),
            fitted: false,
            optimizer: NelderMeadConfig::default(),
        })
    }

    /// Replace the optimiser settings
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Apply differencing to make series stationary
    fn difference(data: &[f64], order: usize) -> Vec<f64> {
        let mut result = data.to_vec();
        for _ in 0..order {
            result = result.windows(2).map(|w| w[1] - w[0]).collect();
        }
        result
    }

    /// Estimate AR coefficients using Yule-Walker equations
    fn estimate_ar_coefficients(&self, data: &[f64]) -> Vec<f64> {
        let p = self.order.p;
        let mut coeffs = vec![0.0; p];
        if p == 0 || data.len() <= p {
            return coeffs;
        }

        let n = data.len();
        let mean: f64 = data.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

        // Compute autocovariances
        let autocov: Vec<f64> = (0..=p)
            .map(|k| (k..n).map(|i| centered[i] * centered[i - k]).sum::<f64>() / n as f64)
            .collect();

        if autocov[0].abs() <= 1e-10 {
            return coeffs;
        }

        // Solve Yule-Walker using Levinson-Durbin
        let mut error = autocov[0];
        for k in 0..p {
            let mut acc = autocov[k + 1];
            for j in 0..k {
                acc -= coeffs[j] * autocov[k - j];
            }
            let reflection = acc / error;

            let previous = coeffs.clone();
            coeffs[k] = reflection;
            for j in 0..k {
                coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
            }

            error *= 1.0 - reflection * reflection;
            if error.abs() <= 1e-10 {
                break;
            }
        }

        coeffs
    }

    /// Estimate MA coefficients from residuals
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        let q = self.order.q;
        if q == 0 || residuals.is_empty() {
            return vec![0.0; q];
        }

        let n = residuals.len();
        let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();
        let var: f64 = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

        let mut coeffs = vec![0.0; q];
        if var.abs() > 1e-10 {
            for (k, coeff) in coeffs.iter_mut().enumerate() {
                let sum: f64 = ((k + 1)..n).map(|i| centered[i] * centered[i - k - 1]).sum();
                // Starting values only; the optimiser is unconstrained
                *coeff = ((sum / n as f64) / var).clamp(-0.99, 0.99);
            }
        }

        coeffs
    }

    /// Conditional residuals with zero presample values and shocks
    fn css_residuals(data: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
        let mut residuals = Vec::with_capacity(data.len());
        for t in 0..data.len() {
            let mut prediction = 0.0;
            for (i, phi) in ar.iter().enumerate() {
                if t > i {
                    prediction += phi * data[t - i - 1];
                }
            }
            for (j, theta) in ma.iter().enumerate() {
                if t > j {
                    prediction += theta * residuals[t - j - 1];
                }
            }
            residuals.push(data[t] - prediction);
        }
        residuals
    }

    fn sum_of_squares(data: &[f64], ar: &[f64], ma: &[f64]) -> f64 {
        let ssr: f64 = Self::css_residuals(data, ar, ma).iter().map(|e| e * e).sum();
        if ssr.is_finite() {
            ssr
        } else {
            f64::INFINITY
        }
    }

    /// Coefficients `a_i` of `y_t = Σ a_i y_{t-i} + ...` after folding the
    /// differencing operator into the AR polynomial
    fn integrated_ar(&self) -> Vec<f64> {
        let mut poly: Vec<f64> = std::iter::once(1.0)
            .chain(self.ar_coeffs.iter().map(|phi| -phi))
            .collect();
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        poly[1..].iter().map(|c| -c).collect()
    }

    /// Psi weights of the integrated model's MA(∞) representation
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let ar = self.integrated_ar();
        let mut psi = Vec::with_capacity(horizon);
        for j in 0..horizon {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut weight = self.ma_coeffs.get(j - 1).copied().unwrap_or(0.0);
            for i in 1..=j.min(ar.len()) {
                weight += ar[i - 1] * psi[j - i];
            }
            psi.push(weight);
        }
        psi
    }

    /// Point forecasts on the original scale
    pub fn predict(&self, steps: usize) -> FitResult<Vec<f64>> {
        if !self.fitted {
            return Err(FitError::NotFitted);
        }

        let ar = self.integrated_ar();
        let n = self.original_data.len();
        let mut levels = self.original_data.clone();
        let mut shocks = vec![0.0; n - self.residuals.len()];
        shocks.extend_from_slice(&self.residuals);

        for _ in 0..steps {
            let t = levels.len();
            let mut forecast = 0.0;

            // AR component
            for (i, a) in ar.iter().enumerate() {
                if t > i {
                    forecast += a * levels[t - i - 1];
                }
            }

            // MA component
            for (j, theta) in self.ma_coeffs.iter().enumerate() {
                if t > j {
                    forecast += theta * shocks[t - j - 1];
                }
            }

            levels.push(forecast);
            shocks.push(0.0); // Future shocks are 0
        }

        Ok(levels.split_off(n))
    }

    /// Forecast standard errors for horizons `1..=steps`
    pub fn standard_errors(&self, steps: usize) -> FitResult<Vec<f64>> {
        if !self.fitted {
            return Err(FitError::NotFitted);
        }

        let mut cumulative = 0.0;
        Ok(self
            .psi_weights(steps)
            .iter()
            .map(|psi| {
                cumulative += psi * psi;
                (self.sigma2 * cumulative).sqrt()
            })
            .collect())
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Estimated innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }
}

impl SeriesModel for Arima {
    fn name(&self) -> String {
        self.order.to_string()
    }

    fn fit(&mut self, data: &[f64]) -> FitResult<()> {
        self.fitted = false;

        if data.iter().any(|x| !x.is_finite()) {
            return Err(FitError::NonFinite(
                "data contains NaN or infinite values".to_string(),
            ));
        }

        let ArimaOrder { p, d, .. } = self.order;
        let parameters = self.order.parameter_count();
        let observations = data.len().saturating_sub(d);
        if observations <= parameters {
            return Err(FitError::InsufficientDegreesOfFreedom {
                observations,
                parameters,
            });
        }

        let differenced = Self::difference(data, d);

        // Unit mean square keeps the optimiser tolerances meaningful for
        // metrics ranging from tonnes per capita to GDP in dollars
        let mean_square = differenced.iter().map(|x| x * x).sum::<f64>() / observations as f64;
        let scale = match mean_square.sqrt() {
            s if s.is_finite() && s > 1e-12 => s,
            _ => 1.0,
        };
        let scaled: Vec<f64> = differenced.iter().map(|x| x / scale).collect();

        let ar_start = self.estimate_ar_coefficients(&scaled);
        let ma_start =
            self.estimate_ma_coefficients(&Self::css_residuals(&scaled, &ar_start, &[]));
        let start: Vec<f64> = ar_start.iter().chain(ma_start.iter()).copied().collect();

        let result = nelder_mead(
            |params| {
                let (ar, ma) = params.split_at(p);
                Self::sum_of_squares(&scaled, ar, ma)
            },
            &start,
            self.optimizer,
        );
        if !result.converged {
            return Err(FitError::NonConvergence {
                iterations: result.iterations,
            });
        }
        if !result.optimal_value.is_finite() || result.optimal_point.iter().any(|c| !c.is_finite())
        {
            return Err(FitError::NonFinite(
                "sum of squares diverged for every candidate".to_string(),
            ));
        }

        let (ar, ma) = result.optimal_point.split_at(p);
        let residuals: Vec<f64> = Self::css_residuals(&scaled, ar, ma)
            .into_iter()
            .map(|e| e * scale)
            .collect();
        let sigma2 = residuals.iter().map(|e| e * e).sum::<f64>() / observations as f64;
        if !sigma2.is_finite() {
            return Err(FitError::NonFinite("innovation variance".to_string()));
        }

        self.ar_coeffs = ar.to_vec();
        self.ma_coeffs = ma.to_vec();
        self.sigma2 = sigma2;
        self.residuals = residuals;
        self.original_data = data.to_vec();
        self.fitted = true;
        Ok(())
    }

    fn forecast_interval(
        &self,
        steps: usize,
        confidence_level: f64,
    ) -> FitResult<ConfidenceInterval> {
        let forecast = self.predict(steps)?;
        let std_errors = self.standard_errors(steps)?;
        let interval = confidence::from_standard_errors(forecast, &std_errors, confidence_level)?;

        if interval.steps().any(|(f, l, u)| !(f.is_finite() && l.is_finite() && u.is_finite())) {
            return Err(FitError::NonFinite("forecast interval".to_string()));
        }
        Ok(interval)
    }
}
