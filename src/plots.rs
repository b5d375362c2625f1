use plotters::coord::Shift;
use plotters::prelude::*;

use itertools::Itertools;
use ndarray::{Array1, Array2};

use crate::bgd::mean_squared_error;

/// Color of the fitted line and the descent trajectory.
const TRAJECTORY_COLOR: RGBColor = RGBColor(255, 69, 0);

const GRID_STEPS: usize = 60;

fn padded_range(values: impl Iterator<Item = f64> + Clone) -> std::ops::Range<f64> {
    let n = values.clone().count().max(1) as f64;

    let mean = values.clone().sum::<f64>() / n;
    let std = (values.clone().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    let (min, max) = values.minmax().into_option().unwrap_or((0., 1.));
    let pad = std.max(1e-3);

    (min - pad)..(max + pad)
}

/// Scatter of the dataset with the hypothesis lines of both solvers.
pub fn plot_hypothesis<DB>(
    feature: &[f64],
    targets: &[f64],
    bgd_theta: &Array1<f64>,
    analytical_theta: &Array1<f64>,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let x_range = padded_range(feature.iter().cloned());
    let y_range = padded_range(targets.iter().cloned());

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("Hypothesis Function and Scatter Plot", ("Arial", 20))
        .set_all_label_area_size(50)
        .margin(10)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("x")
        .y_labels(10)
        .y_desc("y")
        .draw()?;

    chart_context.draw_series(
        feature
            .iter()
            .zip(targets.iter())
            .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    let (x_start, x_end) = (x_range.start, x_range.end);

    let line_points = move |theta: &Array1<f64>| {
        let step = (x_end - x_start) / 200.;
        let (theta0, theta1) = (theta[0], theta[1]);

        (0..=200).map(move |i| {
            let x = x_start + step * i as f64;
            (x, theta0 + theta1 * x)
        })
    };

    chart_context
        .draw_series(LineSeries::new(line_points(bgd_theta), &TRAJECTORY_COLOR))?
        .label("batch gradient descent")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TRAJECTORY_COLOR));

    chart_context
        .draw_series(LineSeries::new(line_points(analytical_theta), &GREEN))?
        .label("normal equations")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

/// Per-iteration criterion value on a log scale.
pub fn plot_loss_curve<DB>(
    data: &[f64],
    label: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let max_loss = data.iter().cloned().fold(f64::MIN_POSITIVE, f64::max);

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(label, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(30)
        .build_cartesian_2d(0..data.len(), (0f64..max_loss).log_scale())?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("Iteration")
        .y_labels(10)
        .y_desc(label)
        .y_label_formatter(&|y| format!("{:.1e}", y))
        .draw()?;

    chart_context.draw_series(LineSeries::new(
        data.iter().enumerate().map(|(i, &l)| (i, l)),
        BLUE.filled(),
    ))?;

    Ok(())
}

fn theta_plane_ranges(trajectory: &[Array1<f64>]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let theta0_range = padded_range(trajectory.iter().map(|theta| theta[0]));
    let theta1_range = padded_range(trajectory.iter().map(|theta| theta[1]));

    (theta0_range, theta1_range)
}

/// 3D surface of the error function with the descent trajectory on top.
pub fn plot_error_surface<DB>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    trajectory: &[Array1<f64>],
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    assert_eq!(x.ncols(), 2);

    drawing_area.fill(&WHITE)?;

    let (theta0_range, theta1_range) = theta_plane_ranges(trajectory);

    let step0 = (theta0_range.end - theta0_range.start) / GRID_STEPS as f64;
    let step1 = (theta1_range.end - theta1_range.start) / GRID_STEPS as f64;

    let loss_at =
        |theta0: f64, theta1: f64| mean_squared_error(x, y, &ndarray::array![theta0, theta1]);

    let max_loss = (0..=GRID_STEPS)
        .cartesian_product(0..=GRID_STEPS)
        .map(|(i, k)| {
            loss_at(
                theta0_range.start + step0 * i as f64,
                theta1_range.start + step1 * k as f64,
            )
        })
        .fold(f64::MIN_POSITIVE, f64::max);

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("3D surface of Error Function", ("Arial", 20))
        .margin(30)
        .build_cartesian_3d(theta0_range.clone(), 0f64..max_loss, theta1_range.clone())?;

    chart_context.configure_axes().draw()?;

    chart_context.draw_series(
        SurfaceSeries::xoz(
            (0..=GRID_STEPS).map(|i| theta0_range.start + step0 * i as f64),
            (0..=GRID_STEPS).map(|k| theta1_range.start + step1 * k as f64),
            loss_at,
        )
        .style(BLUE.mix(0.2)),
    )?;

    chart_context.draw_series(LineSeries::new(
        trajectory
            .iter()
            .map(|theta| (theta[0], loss_at(theta[0], theta[1]), theta[1])),
        &TRAJECTORY_COLOR,
    ))?;

    Ok(())
}

/// Loss heatmap over the theta plane with the descent trajectory on top.
///
/// The darkest cells mark the basin of the minimum; this pane stands in for
/// the contour plot.
pub fn plot_error_plane<DB>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    trajectory: &[Array1<f64>],
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    assert_eq!(x.ncols(), 2);

    drawing_area.fill(&WHITE)?;

    let (theta0_range, theta1_range) = theta_plane_ranges(trajectory);

    let step0 = (theta0_range.end - theta0_range.start) / GRID_STEPS as f64;
    let step1 = (theta1_range.end - theta1_range.start) / GRID_STEPS as f64;

    let loss_at =
        |theta0: f64, theta1: f64| mean_squared_error(x, y, &ndarray::array![theta0, theta1]);

    let cells: Vec<(f64, f64, f64)> = (0..GRID_STEPS)
        .cartesian_product(0..GRID_STEPS)
        .map(|(i, k)| {
            let theta0 = theta0_range.start + step0 * i as f64;
            let theta1 = theta1_range.start + step1 * k as f64;

            (
                theta0,
                theta1,
                loss_at(theta0 + step0 / 2., theta1 + step1 / 2.),
            )
        })
        .collect();

    let max_loss = cells
        .iter()
        .map(|&(_, _, loss)| loss)
        .fold(f64::MIN_POSITIVE, f64::max);

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("Error Function over the theta plane", ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(30)
        .build_cartesian_2d(theta0_range, theta1_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("theta0")
        .y_labels(10)
        .y_desc("theta1")
        .draw()?;

    chart_context.draw_series(cells.iter().map(|&(theta0, theta1, loss)| {
        Rectangle::new(
            [(theta0, theta1), (theta0 + step0, theta1 + step1)],
            BLUE.mix(1. - loss / max_loss).filled(),
        )
    }))?;

    chart_context.draw_series(LineSeries::new(
        trajectory.iter().map(|theta| (theta[0], theta[1])),
        &TRAJECTORY_COLOR,
    ))?;

    if let Some(last) = trajectory.last() {
        chart_context.draw_series(std::iter::once(Circle::new(
            (last[0], last[1]),
            3,
            TRAJECTORY_COLOR.filled(),
        )))?;
    }

    Ok(())
}
