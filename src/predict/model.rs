// src/predict/model.rs
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::encoder::EncodedRow;
use crate::error::{Error, Result};

/// The five season outputs, in model target order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionResult {
    pub games_played: f64,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub net_rating: f64,
}

impl PredictionResult {
    pub const LABELS: [&'static str; 5] = [
        "Games Played (gp)",
        "Points (pts)",
        "Rebounds (reb)",
        "Assists (ast)",
        "Net Rating (net_rating)",
    ];

    pub fn values(&self) -> [f64; 5] {
        [self.games_played, self.points, self.rebounds, self.assists, self.net_rating]
    }

    /// `(label, value)` pairs for display.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::LABELS.into_iter().zip(self.values())
    }
}

/// A trained multi-output regressor, loaded once and only read afterwards.
pub trait Regressor: Send + Sync {
    /// Input columns, in the order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// `row` must carry exactly `feature_names()`, same order.
    fn predict(&self, row: &EncodedRow) -> Result<PredictionResult>;
}

/// Fails with `SchemaMismatch` unless `columns` equals `expected` exactly.
pub fn check_schema(expected: &[String], columns: &[String]) -> Result<()> {
    if expected == columns {
        return Ok(());
    }
    let want: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let have: HashSet<&str> = columns.iter().map(String::as_str).collect();
    Err(Error::SchemaMismatch {
        missing: expected.iter().filter(|c| !have.contains(c.as_str())).cloned().collect(),
        unexpected: columns.iter().filter(|c| !want.contains(c.as_str())).cloned().collect(),
    })
}

/// Multi-output linear model exported from the training side as JSON:
///
/// ```json
/// { "feature_names": ["age", ...],
///   "targets": ["gp", "pts", "reb", "ast", "net_rating"],
///   "intercepts": [..5],
///   "coefficients": [[..F], ..5] }
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct LinearModel {
    feature_names: Vec<String>,
    #[serde(default)]
    targets: Vec<String>,
    intercepts: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
}

impl LinearModel {
    pub fn new(feature_names: Vec<String>, intercepts: Vec<f64>, coefficients: Vec<Vec<f64>>) -> Result<Self> {
        let model = LinearModel { feature_names, targets: Vec::new(), intercepts, coefficients };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Model(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(text).map_err(|e| Error::Model(e.to_string()))?;
        model.validate()?;
        logd!("Model: {} features, targets {:?}", model.feature_names.len(), model.targets);
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let n = PredictionResult::LABELS.len();
        if self.intercepts.len() != n || self.coefficients.len() != n {
            return Err(Error::Model(format!(
                "expected {n} outputs, got {} intercepts and {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        if !self.targets.is_empty() && self.targets.len() != n {
            return Err(Error::Model(format!("expected {n} targets, got {}", self.targets.len())));
        }
        let f = self.feature_names.len();
        if let Some(bad) = self.coefficients.iter().position(|row| row.len() != f) {
            return Err(Error::Model(format!("coefficient row {bad} does not have {f} weights")));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &EncodedRow) -> Result<PredictionResult> {
        check_schema(&self.feature_names, &row.columns)?;

        let out: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + w.iter().zip(&row.values).map(|(w, x)| w * x).sum::<f64>())
            .collect();

        Ok(PredictionResult {
            games_played: out[0],
            points: out[1],
            rebounds: out[2],
            assists: out[3],
            net_rating: out[4],
        })
    }
}
