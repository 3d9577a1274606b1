// src/predict/mod.rs
//
// Player stat predictor: catalog of valid categories, one-hot encoder, and the
// trained model, bundled into a `Predictor` built once at startup.

pub mod catalog;
pub mod encoder;
pub mod model;

pub use catalog::Catalog;
pub use encoder::{encode, CategoryField, EncodedRow, FeatureRow, Indicator};
pub use model::{LinearModel, PredictionResult, Regressor};

use crate::config::options::PredictOptions;
use crate::error::{Error, Result};

/// Result plus any categories the model had no column for.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub result: PredictionResult,
    pub unknown: Vec<Indicator>,
}

/// Immutable context for every prediction call.
pub struct Predictor {
    model: Box<dyn Regressor>,
    catalog: Catalog,
    strict: bool,
}

impl Predictor {
    pub fn new(model: Box<dyn Regressor>, catalog: Catalog, strict: bool) -> Self {
        Self { model, catalog, strict }
    }

    /// Load the model file and the players dataset named in `opts`.
    pub fn load(opts: &PredictOptions) -> Result<Self> {
        let model = LinearModel::load(&opts.model_path)?;
        let catalog = Catalog::load(&opts.dataset_path, opts.top_colleges)?;
        logf!(
            "Predictor ready: {} model columns, {} teams, {} colleges",
            model.feature_names().len(),
            catalog.teams.len(),
            catalog.colleges.len()
        );
        Ok(Self::new(Box::new(model), catalog, opts.strict_categories))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Collapse the college, encode onto the model's columns and run the model.
    ///
    /// Unknown categories are zero-filled and reported in `Prediction::unknown`,
    /// or rejected with `Error::UnknownCategory` when the predictor is strict.
    pub fn predict(&self, row: &FeatureRow) -> Result<Prediction> {
        let row = FeatureRow {
            college_name: self.catalog.collapse_college(&row.college_name),
            ..row.clone()
        };
        let encoded = encode(&row, self.model.feature_names());

        for miss in &encoded.unknown {
            if let Indicator::Unknown { field, value } = miss {
                if self.strict {
                    return Err(Error::UnknownCategory { field: s!(field.label()), value: value.clone() });
                }
                logw!(field = field.label(), value = %value, "no indicator column; zero-filled");
            }
        }

        let result = self.model.predict(&encoded)?;
        Ok(Prediction { result, unknown: encoded.unknown })
    }
}
