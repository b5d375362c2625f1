use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("feature and target columns are misaligned: {x_rows} feature rows vs {y_rows} target rows")]
    DataShape { x_rows: usize, y_rows: usize },

    #[error("learning rate must be a positive finite number, got {0}")]
    InvalidLearningRate(f64),

    #[error("gradient descent diverged at iteration {iteration}, loss reached {loss:e}")]
    Divergence { iteration: usize, loss: f64 },

    #[error("normal equations have no solution, X^T X is singular")]
    SingularNormalMatrix,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
