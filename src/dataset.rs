use std::fs::File;
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::error::RegressionError;

#[derive(Debug, serde::Deserialize)]
struct Row(f64);

fn read_column(reader: impl std::io::Read) -> Result<Vec<f64>, RegressionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let column = reader
        .deserialize()
        .map(|row| row.map(|Row(value)| value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(column)
}

/// Reads a headerless single-column CSV file, one value per line.
pub fn load_column(path: impl AsRef<Path>) -> Result<Vec<f64>, RegressionError> {
    read_column(File::open(path)?)
}

#[derive(Debug, Clone, Copy)]
pub struct Normalization {
    pub mean: f64,
    pub std: f64,
}

/// Rescales a column in place to zero mean and unit (population) std.
pub fn normalize(column: &mut [f64]) -> Normalization {
    let n = column.len() as f64;

    let mean = column.iter().sum::<f64>() / n;
    let std = (column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    for x in column.iter_mut() {
        *x = (*x - mean) / std;
    }

    Normalization { mean, std }
}

/// Feature columns with a bias column of ones prepended.
pub fn design_matrix(features: &[Vec<f64>]) -> Array2<f64> {
    let rows = features.first().map_or(0, |column| column.len());

    let mut x = Array2::ones((rows, features.len() + 1));

    for (j, column) in features.iter().enumerate() {
        for (i, &value) in column.iter().enumerate() {
            x[[i, j + 1]] = value;
        }
    }

    x
}

#[derive(Debug)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl Dataset {
    pub fn new(features: &[Vec<f64>], targets: Vec<f64>) -> Result<Self, RegressionError> {
        for column in features {
            if column.len() != targets.len() {
                return Err(RegressionError::DataShape {
                    x_rows: column.len(),
                    y_rows: targets.len(),
                });
            }
        }

        Ok(Self {
            x: design_matrix(features),
            y: Array1::from_vec(targets),
        })
    }
}
