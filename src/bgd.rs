use ndarray::{Array1, Array2, ArrayView1};

use crate::error::RegressionError;

/// Quantity compared against the threshold after each sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoppingCriterion {
    /// Largest per-coordinate move of theta since the previous iteration.
    ChangeInTheta,
    /// Absolute change of the squared-error loss since the previous iteration.
    ChangeInError,
    /// The squared-error loss itself.
    Error,
    /// Largest absolute component of the gradient.
    Gradient,
}

#[derive(Debug, Clone)]
pub struct BgdConfig {
    pub eeta: f64,
    pub max_iter: usize,
    pub threshold: f64,
    pub criterion: StoppingCriterion,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub theta: Array1<f64>,
    pub iterations: usize,
    pub loss: f64,
}

/// Criterion values above this are treated as a runaway step size.
const DIVERGENCE_BOUND: f64 = 1e12;

/// `0.5 * sum((y_i - theta . x_i)^2)` over the whole dataset.
pub fn mean_squared_error(x: &Array2<f64>, y: &Array1<f64>, theta: &Array1<f64>) -> f64 {
    let residuals = y - &x.dot(theta);

    0.5 * residuals.dot(&residuals)
}

fn max_abs(v: ArrayView1<f64>) -> f64 {
    v.iter().fold(0., |acc, &x| acc.max(x.abs()))
}

/// Full-batch gradient descent on the halved squared-error loss.
///
/// Theta starts at zeros and every component is updated from the same theta
/// snapshot within one sweep. `monitor` receives `(iteration, theta, loss)`
/// after every update, before the termination check, where `loss` is the
/// configured criterion value. The loop ends when the criterion value drops
/// below the threshold or `max_iter` sweeps have run, whichever comes first.
pub fn bgd(
    x: &Array2<f64>,
    y: &Array1<f64>,
    config: &BgdConfig,
    mut monitor: impl FnMut(usize, ArrayView1<f64>, f64),
) -> Result<Solution, RegressionError> {
    if x.nrows() != y.len() {
        return Err(RegressionError::DataShape {
            x_rows: x.nrows(),
            y_rows: y.len(),
        });
    }

    if !config.eeta.is_finite() || config.eeta <= 0. {
        return Err(RegressionError::InvalidLearningRate(config.eeta));
    }

    let mut theta = Array1::<f64>::zeros(x.ncols());
    let mut old_theta = theta.clone();

    let mut iter = 0;

    loop {
        iter += 1;

        let gradient = x.t().dot(&(y - &x.dot(&theta)));
        theta = &theta + &(config.eeta * &gradient);

        let loss = match config.criterion {
            StoppingCriterion::ChangeInTheta => max_abs((&theta - &old_theta).view()),
            StoppingCriterion::ChangeInError => {
                (mean_squared_error(x, y, &theta) - mean_squared_error(x, y, &old_theta)).abs()
            }
            StoppingCriterion::Error => mean_squared_error(x, y, &theta),
            StoppingCriterion::Gradient => max_abs(gradient.view()),
        };

        monitor(iter, theta.view(), loss);

        if !loss.is_finite() || loss > DIVERGENCE_BOUND {
            return Err(RegressionError::Divergence {
                iteration: iter,
                loss,
            });
        }

        if loss < config.threshold || iter >= config.max_iter {
            return Ok(Solution {
                theta,
                iterations: iter,
                loss,
            });
        }

        old_theta.assign(&theta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    fn line_through_origin() -> (Array2<f64>, Array1<f64>) {
        (array![[1., 1.], [1., 2.], [1., 3.]], array![2., 4., 6.])
    }

    fn config(criterion: StoppingCriterion) -> BgdConfig {
        BgdConfig {
            eeta: 0.1,
            max_iter: 1000,
            threshold: 1e-9,
            criterion,
        }
    }

    #[test]
    fn loss_at_zero_theta_is_half_sum_of_squared_labels() {
        let (x, y) = line_through_origin();
        let theta = Array1::zeros(2);

        let expected = 0.5 * (4. + 16. + 36.);

        assert!((mean_squared_error(&x, &y, &theta) - expected).abs() < 1e-12);
    }

    #[test]
    fn converges_to_line_y_eq_2x() {
        let (x, y) = line_through_origin();

        let solution = bgd(&x, &y, &config(StoppingCriterion::Error), |_, _, _| {}).unwrap();

        assert!(solution.loss < 1e-9);
        assert!(solution.theta[0].abs() < 1e-4);
        assert!((solution.theta[1] - 2.).abs() < 1e-4);
    }

    #[test]
    fn error_criterion_never_stops_above_threshold() {
        let (x, y) = line_through_origin();

        let threshold = 1e-3;
        let mut losses = Vec::new();

        let solution = bgd(
            &x,
            &y,
            &BgdConfig {
                threshold,
                ..config(StoppingCriterion::Error)
            },
            |_, _, loss| losses.push(loss),
        )
        .unwrap();

        assert_eq!(losses.len(), solution.iterations);

        let (last, earlier) = losses.split_last().unwrap();
        assert!(*last < threshold);
        assert!(earlier.iter().all(|&loss| loss >= threshold));
    }

    #[test]
    fn change_in_theta_stops_immediately_at_the_optimum() {
        // All-zero targets put the optimum exactly at the zero initialization.
        let x = array![[1., 1.], [1., 2.], [1., 3.]];
        let y = array![0., 0., 0.];

        let solution = bgd(&x, &y, &config(StoppingCriterion::ChangeInTheta), |_, _, _| {}).unwrap();

        assert_eq!(solution.iterations, 1);
    }

    #[test]
    fn change_in_error_stops_when_improvement_stalls() {
        let (x, y) = line_through_origin();

        let mut last_improvement = f64::INFINITY;

        let solution = bgd(
            &x,
            &y,
            &config(StoppingCriterion::ChangeInError),
            |_, _, loss| last_improvement = loss,
        )
        .unwrap();

        assert!(solution.iterations < 1000);
        assert!(last_improvement < 1e-9);
        assert!(mean_squared_error(&x, &y, &solution.theta) < 1e-3);
    }

    #[test]
    fn max_iter_is_a_hard_ceiling() {
        let (x, y) = line_through_origin();

        let solution = bgd(
            &x,
            &y,
            &BgdConfig {
                max_iter: 7,
                threshold: 0.,
                ..config(StoppingCriterion::Error)
            },
            |_, _, _| {},
        )
        .unwrap();

        assert_eq!(solution.iterations, 7);
    }

    #[test]
    fn monitor_sees_every_iteration_in_order() {
        let (x, y) = line_through_origin();

        let mut iterations = Vec::new();

        let solution = bgd(&x, &y, &config(StoppingCriterion::Error), |iter, theta, _| {
            assert_eq!(theta.len(), 2);
            iterations.push(iter);
        })
        .unwrap();

        let expected: Vec<usize> = (1..=solution.iterations).collect();
        assert_eq!(iterations, expected);
    }

    #[test]
    fn mismatched_shapes_are_rejected_before_the_loop() {
        let x = array![[1., 1.], [1., 2.], [1., 3.]];
        let y = array![2., 4.];

        let mut called = false;
        let result = bgd(&x, &y, &config(StoppingCriterion::Error), |_, _, _| called = true);

        assert!(matches!(
            result,
            Err(RegressionError::DataShape {
                x_rows: 3,
                y_rows: 2
            })
        ));
        assert!(!called);
    }

    #[test]
    fn oversized_learning_rate_surfaces_as_divergence() {
        let (x, y) = line_through_origin();

        let result = bgd(
            &x,
            &y,
            &BgdConfig {
                eeta: 10.,
                ..config(StoppingCriterion::Error)
            },
            |_, _, _| {},
        );

        assert!(matches!(result, Err(RegressionError::Divergence { .. })));
    }

    #[test]
    fn non_positive_learning_rate_is_rejected() {
        let (x, y) = line_through_origin();

        for eeta in [0., -0.1, f64::NAN] {
            let result = bgd(
                &x,
                &y,
                &BgdConfig {
                    eeta,
                    ..config(StoppingCriterion::Error)
                },
                |_, _, _| {},
            );

            assert!(matches!(result, Err(RegressionError::InvalidLearningRate(_))));
        }
    }

    #[test]
    fn gradient_criterion_reports_flat_gradient() {
        let (x, y) = line_through_origin();

        let solution = bgd(
            &x,
            &y,
            &BgdConfig {
                threshold: 1e-6,
                ..config(StoppingCriterion::Gradient)
            },
            |_, _, _| {},
        )
        .unwrap();

        let gradient = x.t().dot(&(&y - &x.dot(&solution.theta)));
        assert!(max_abs(gradient.view()) < 1e-6);
    }
}
