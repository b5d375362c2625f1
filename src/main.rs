use clap::Parser;
use plotters::prelude::*;

use regresja_liniowa::analytical::normal_equations;
use regresja_liniowa::bgd::{bgd, BgdConfig, StoppingCriterion};
use regresja_liniowa::dataset::{load_column, normalize, Dataset};
use regresja_liniowa::plots;

/// Batch gradient descent for univariate linear regression over two CSV
/// columns, with an SVG dashboard of the run.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "data/linearX.csv")]
    features: String,

    #[arg(long, default_value = "data/linearY.csv")]
    targets: String,

    /// Learning rate.
    #[arg(long, default_value_t = 0.001)]
    eeta: f64,

    #[arg(long, default_value_t = 50000)]
    max_iter: usize,

    #[arg(long, default_value_t = 1e-7)]
    threshold: f64,

    #[arg(long, value_enum, default_value = "gradient")]
    criterion: StoppingCriterion,

    #[arg(long, default_value = "plots/bgd.svg")]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut feature = load_column(&args.features)?;
    let targets = load_column(&args.targets)?;

    normalize(&mut feature);

    let dataset = Dataset::new(&[feature.clone()], targets.clone())?;

    let config = BgdConfig {
        eeta: args.eeta,
        max_iter: args.max_iter,
        threshold: args.threshold,
        criterion: args.criterion,
    };

    let mut trajectory = Vec::new();
    let mut losses = Vec::new();

    let solution = bgd(&dataset.x, &dataset.y, &config, |iteration, theta, loss| {
        println!("{} {} {}", iteration, theta, loss);

        trajectory.push(theta.to_owned());
        losses.push(loss);
    })?;

    println!("GDA solution");
    println!("iteration: {}", solution.iterations);
    println!("eeta: {}", config.eeta);
    println!("theta: {}", solution.theta);
    println!("loss_function: {:?}", config.criterion);
    println!("threshold: {}", config.threshold);
    println!("loss: {}", solution.loss);

    let analytical = normal_equations(&dataset.x, &dataset.y)?;

    println!("Analytical solution is: {}", analytical);

    if let Some(parent) = std::path::Path::new(&args.output).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let backend = SVGBackend::new(&args.output, (1200, 800)).into_drawing_area();

    if let [hypothesis_area, loss_area, surface_area, plane_area] =
        backend.split_evenly((2, 2)).as_slice()
    {
        plots::plot_hypothesis(
            &feature,
            &targets,
            &solution.theta,
            &analytical,
            hypothesis_area,
        )?;
        plots::plot_loss_curve(&losses, "loss", loss_area)?;
        plots::plot_error_surface(&dataset.x, &dataset.y, &trajectory, surface_area)?;
        plots::plot_error_plane(&dataset.x, &dataset.y, &trajectory, plane_area)?;
    } else {
        panic!("Expected 4 areas");
    }

    backend.present()?;

    println!("dashboard written to {}", args.output);

    Ok(())
}
