use plotters::prelude::*;
use rand::rngs::ThreadRng;
use rand_distr::{Distribution, Normal, Uniform};

use regresja_liniowa::analytical::normal_equations;
use regresja_liniowa::bgd::{bgd, BgdConfig, StoppingCriterion};
use regresja_liniowa::dataset::Dataset;
use regresja_liniowa::plots::plot_loss_curve;

const N_POINTS: usize = 200;

const INTERCEPT: f64 = 1.5;
const SLOPE: f64 = 0.5;
const NOISE_STD: f64 = 0.05;

fn generate_dataset(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = ThreadRng::default();

    let uniform = Uniform::new(-1., 1.);
    let noise = Normal::new(0., NOISE_STD).unwrap();

    (0..n)
        .map(|_| {
            let x = uniform.sample(&mut rng);
            let y = INTERCEPT + SLOPE * x + noise.sample(&mut rng);

            (x, y)
        })
        .unzip()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (feature, targets) = generate_dataset(N_POINTS);

    let dataset = Dataset::new(&[feature], targets)?;

    let config = BgdConfig {
        eeta: 0.005,
        max_iter: 20000,
        threshold: 1e-10,
        criterion: StoppingCriterion::ChangeInTheta,
    };

    let mut losses = Vec::new();

    let solution = bgd(&dataset.x, &dataset.y, &config, |_, _, loss| {
        losses.push(loss)
    })?;

    println!(
        "bgd theta: {} after {} iterations",
        solution.theta, solution.iterations
    );

    let analytical = normal_equations(&dataset.x, &dataset.y)?;

    println!("normal equations theta: {}", analytical);

    let max_deviation = solution
        .theta
        .iter()
        .zip(analytical.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0f64, f64::max);

    println!("max deviation: {:.3e}", max_deviation);

    std::fs::create_dir_all("plots")?;

    let backend = SVGBackend::new("plots/synthetic_loss.svg", (800, 600)).into_drawing_area();

    plot_loss_curve(&losses, "change in theta", &backend)?;

    backend.present()?;

    Ok(())
}
