//! L2-penalized logistic regression.
//!
//! Objective (inverse regularization strength `C`):
//!
//! ```text
//! f(b0, beta) = C * sum_i [log(1 + exp(eta_i)) - y_i * eta_i] + 0.5 * |beta|^2
//! eta_i = b0 + X_i . beta
//! ```
//!
//! The intercept `b0` is not penalized. Coefficient standard errors come from
//! the inverse of the Hessian of `f` at the optimum.

use hs_core::{Error, Result};
use hs_prob::math::{log1pexp, sigmoid};
use nalgebra::DMatrix;

use crate::optimizer::{LbfgsOptimizer, ObjectiveFunction, OptimizerConfig};

#[inline]
fn validate_xy_dims(n: usize, p: usize, x_len: usize, y_len: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::Validation("X/y must be non-empty".to_string()));
    }
    if p == 0 {
        return Err(Error::Validation("X must have at least 1 feature column".to_string()));
    }
    if x_len != n * p {
        return Err(Error::Validation(format!(
            "X has wrong length: expected n*p={}, got {}",
            n * p,
            x_len
        )));
    }
    if y_len != n {
        return Err(Error::Validation(format!(
            "y has wrong length: expected n={}, got {}",
            n, y_len
        )));
    }
    Ok(())
}

#[inline]
fn row_dot(x_row: &[f64], beta: &[f64]) -> f64 {
    debug_assert_eq!(x_row.len(), beta.len());
    x_row.iter().zip(beta).map(|(&x, &b)| x * b).sum()
}

/// Dense row-major design matrix.
#[derive(Debug, Clone)]
struct DenseX {
    n: usize,
    p: usize,
    data: Vec<f64>,
}

impl DenseX {
    fn from_rows(x: &[Vec<f64>]) -> Result<Self> {
        let n = x.len();
        let p = x.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n * p);
        for (i, row) in x.iter().enumerate() {
            if row.len() != p {
                return Err(Error::Validation(format!(
                    "X must be rectangular: row {} has len {}, expected {}",
                    i,
                    row.len(),
                    p
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(Error::Validation("X must contain only finite values".to_string()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n, p, data })
    }

    #[inline]
    fn row(&self, i: usize) -> &[f64] {
        let start = i * self.p;
        &self.data[start..start + self.p]
    }
}

/// Logistic regression with an unpenalized intercept and ridge penalty on
/// the slopes. Parameters are ordered `[intercept, beta_1, ..., beta_p]`.
#[derive(Debug, Clone)]
pub struct PenalizedLogisticRegression {
    x: DenseX,
    y: Vec<u8>,
    c: f64,
}

/// Fitted parameters and diagnostics.
#[derive(Debug, Clone)]
pub struct LogisticFit {
    /// Intercept on the linear-predictor scale.
    pub intercept: f64,
    /// Slopes, one per feature column.
    pub coefficients: Vec<f64>,
    /// Standard errors aligned with `[intercept, coefficients...]`;
    /// `None` if the Hessian could not be inverted.
    pub std_errors: Option<Vec<f64>>,
    /// Objective value at the optimum.
    pub objective: f64,
    /// Optimizer convergence flag.
    pub converged: bool,
    /// Optimizer iterations.
    pub n_iter: u64,
}

impl PenalizedLogisticRegression {
    /// Build a model from row-wise `x`, binary `y` and inverse penalty `c > 0`.
    pub fn new(x: &[Vec<f64>], y: Vec<u8>, c: f64) -> Result<Self> {
        let x = DenseX::from_rows(x)?;
        validate_xy_dims(x.n, x.p, x.data.len(), y.len())?;
        if y.iter().any(|&v| v > 1) {
            return Err(Error::Validation("y must contain only 0/1 values".to_string()));
        }
        if !c.is_finite() || c <= 0.0 {
            return Err(Error::Validation(format!("C must be finite and > 0, got {c}")));
        }
        Ok(Self { x, y, c })
    }

    /// Number of parameters including the intercept.
    pub fn dim(&self) -> usize {
        self.x.p + 1
    }

    #[inline]
    fn eta(&self, i: usize, params: &[f64]) -> f64 {
        params[0] + row_dot(self.x.row(i), &params[1..])
    }

    fn check_params(&self, params: &[f64]) -> Result<()> {
        if params.len() != self.dim() {
            return Err(Error::Validation(format!(
                "expected {} parameters, got {}",
                self.dim(),
                params.len()
            )));
        }
        if params.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation("params must contain only finite values".to_string()));
        }
        Ok(())
    }

    /// Predicted probability for a feature row.
    pub fn predict_proba(params: &[f64], row: &[f64]) -> f64 {
        sigmoid(params[0] + row_dot(row, &params[1..]))
    }

    /// Hessian of the objective at `params` (dim x dim).
    pub fn hessian(&self, params: &[f64]) -> Result<DMatrix<f64>> {
        self.check_params(params)?;
        let d = self.dim();
        let mut h = DMatrix::<f64>::zeros(d, d);
        let mut z = vec![1.0; d];
        for i in 0..self.x.n {
            let mu = sigmoid(self.eta(i, params));
            let w = self.c * mu * (1.0 - mu);
            z[1..].copy_from_slice(self.x.row(i));
            for a in 0..d {
                let wa = w * z[a];
                for b in a..d {
                    h[(a, b)] += wa * z[b];
                }
            }
        }
        for a in 0..d {
            for b in 0..a {
                h[(a, b)] = h[(b, a)];
            }
        }
        for j in 1..d {
            h[(j, j)] += 1.0;
        }
        Ok(h)
    }

    /// Minimize the objective with L-BFGS starting from zero.
    pub fn fit(&self, config: OptimizerConfig) -> Result<LogisticFit> {
        let res = LbfgsOptimizer::new(config).minimize(self, &vec![0.0; self.dim()])?;
        if !res.converged {
            tracing::warn!(message = %res.message, n_iter = res.n_iter, "logistic fit did not converge");
        }

        let std_errors = self.hessian(&res.parameters)?.try_inverse().and_then(|cov| {
            let se: Vec<f64> = (0..self.dim()).map(|j| cov[(j, j)].sqrt()).collect();
            se.iter().all(|s| s.is_finite()).then_some(se)
        });

        Ok(LogisticFit {
            intercept: res.parameters[0],
            coefficients: res.parameters[1..].to_vec(),
            std_errors,
            objective: res.fval,
            converged: res.converged,
            n_iter: res.n_iter,
        })
    }
}

impl ObjectiveFunction for PenalizedLogisticRegression {
    fn eval(&self, params: &[f64]) -> Result<f64> {
        self.check_params(params)?;
        let mut nll = 0.0;
        for i in 0..self.x.n {
            let eta = self.eta(i, params);
            nll += log1pexp(eta) - f64::from(self.y[i]) * eta;
        }
        let penalty: f64 = params[1..].iter().map(|b| b * b).sum();
        Ok(self.c * nll + 0.5 * penalty)
    }

    fn gradient(&self, params: &[f64]) -> Result<Vec<f64>> {
        self.check_params(params)?;
        let mut grad = vec![0.0; self.dim()];
        for i in 0..self.x.n {
            let eta = self.eta(i, params);
            let err = self.c * (sigmoid(eta) - f64::from(self.y[i]));
            grad[0] += err;
            for (g, &xj) in grad[1..].iter_mut().zip(self.x.row(i)) {
                *g += err * xj;
            }
        }
        for (g, &b) in grad[1..].iter_mut().zip(&params[1..]) {
            *g += b;
        }
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn toy() -> (Vec<Vec<f64>>, Vec<u8>) {
        let x = vec![
            vec![-1.5, 0.2],
            vec![-0.7, -1.0],
            vec![-0.2, 0.8],
            vec![0.1, -0.3],
            vec![0.4, 1.1],
            vec![0.9, -0.6],
            vec![1.3, 0.5],
            vec![1.8, -1.2],
        ];
        let y = vec![1, 1, 0, 1, 0, 0, 1, 0];
        (x, y)
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (x, y) = toy();
        let m = PenalizedLogisticRegression::new(&x, y, 1.0).unwrap();
        let params = [0.3, -0.8, 0.25];
        let analytic = m.gradient(&params).unwrap();
        for j in 0..3 {
            let h = 1e-6;
            let mut up = params;
            up[j] += h;
            let mut dn = params;
            dn[j] -= h;
            let fd = (m.eval(&up).unwrap() - m.eval(&dn).unwrap()) / (2.0 * h);
            assert_relative_eq!(analytic[j], fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_hessian_matches_gradient_differences() {
        let (x, y) = toy();
        let m = PenalizedLogisticRegression::new(&x, y, 1.0).unwrap();
        let params = [-0.1, 0.4, 0.9];
        let h = m.hessian(&params).unwrap();
        for j in 0..3 {
            let step = 1e-6;
            let mut up = params;
            up[j] += step;
            let mut dn = params;
            dn[j] -= step;
            let gu = m.gradient(&up).unwrap();
            let gd = m.gradient(&dn).unwrap();
            for i in 0..3 {
                assert_relative_eq!(h[(i, j)], (gu[i] - gd[i]) / (2.0 * step), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_fit_reaches_stationary_point() {
        let (x, y) = toy();
        let m = PenalizedLogisticRegression::new(&x, y, 1.0).unwrap();
        let fit = m.fit(OptimizerConfig::default()).unwrap();
        assert!(fit.converged);
        let mut params = vec![fit.intercept];
        params.extend(&fit.coefficients);
        let g = m.gradient(&params).unwrap();
        assert!(g.iter().all(|v| v.abs() < 1e-5), "gradient at optimum: {g:?}");
        // the first feature is negatively associated with y in the toy data
        assert!(fit.coefficients[0] < 0.0);
        let se = fit.std_errors.unwrap();
        assert_eq!(se.len(), 3);
        assert!(se.iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_separable_data_stays_finite() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 - 4.5]).collect();
        let y: Vec<u8> = (0..10).map(|i| u8::from(i >= 5)).collect();
        let m = PenalizedLogisticRegression::new(&x, y, 1.0).unwrap();
        let fit = m.fit(OptimizerConfig::default()).unwrap();
        assert!(fit.coefficients[0].is_finite() && fit.coefficients[0] > 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(PenalizedLogisticRegression::new(&[], vec![], 1.0).is_err());
        assert!(PenalizedLogisticRegression::new(&[vec![1.0]], vec![2], 1.0).is_err());
        assert!(PenalizedLogisticRegression::new(&[vec![1.0]], vec![1], 0.0).is_err());
        assert!(PenalizedLogisticRegression::new(&[vec![1.0], vec![]], vec![1, 0], 1.0).is_err());
    }
}
