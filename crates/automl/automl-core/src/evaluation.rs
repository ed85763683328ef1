//! Offline evaluation of a trained model.

use automl_spi::{Result, TrainedModel};
use data_spi::{DataError, Dataset};
use serde::Serialize;

use crate::metrics::mse;

/// Error metrics of a model on a labeled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub mse: f64,
    pub rmse: f64,
    pub rows: usize,
}

/// Score `model` on every row of `dataset`.
pub fn evaluate(model: &TrainedModel, dataset: &Dataset) -> Result<Evaluation> {
    if dataset.is_empty() {
        return Err(DataError::Empty.into());
    }

    let predicted = model.predict_dataset(dataset)?;
    let mse = mse(&dataset.targets(), &predicted);

    Ok(Evaluation {
        mse,
        rmse: mse.sqrt(),
        rows: dataset.len(),
    })
}
