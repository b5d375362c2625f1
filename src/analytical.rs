use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

use crate::error::RegressionError;

/// Closed-form least-squares solution `theta = (X^T X)^-1 X^T y`.
pub fn normal_equations(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>, RegressionError> {
    if x.nrows() != y.len() {
        return Err(RegressionError::DataShape {
            x_rows: x.nrows(),
            y_rows: y.len(),
        });
    }

    let xm = DMatrix::from_row_iterator(x.nrows(), x.ncols(), x.iter().cloned());
    let yv = DVector::from_iterator(y.len(), y.iter().cloned());

    let inverse = (xm.transpose() * &xm)
        .try_inverse()
        .ok_or(RegressionError::SingularNormalMatrix)?;

    let theta = inverse * xm.transpose() * yv;

    Ok(Array1::from_iter(theta.iter().cloned()))
}
