// src/predict/encoder.rs
//
// FeatureRow → one model input row. Numeric fields are copied, the two
// categorical fields become one-hot indicator columns, and the result is laid
// out on the model's column list exactly (missing columns are 0).

use crate::config::consts::{COLLEGE_PREFIX, TEAM_PREFIX};

pub const AGE: &str = "age";
pub const HEIGHT: &str = "player_height";
pub const WEIGHT: &str = "player_weight";
pub const DRAFT_NUMBER: &str = "draft_number";
pub const YEARS_IN_LEAGUE: &str = "years_in_nba";

/// One player's inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow {
    pub age: i64,
    /// cm
    pub height: f64,
    /// kg
    pub weight: f64,
    pub draft_number: i64,
    pub years_in_league: i64,
    pub team_code: String,
    /// Already collapsed to `"Other"` when outside the top colleges.
    pub college_name: String,
}

impl FeatureRow {
    fn numeric(&self) -> [(&'static str, f64); 5] {
        [
            (AGE, self.age as f64),
            (HEIGHT, self.height),
            (WEIGHT, self.weight),
            (DRAFT_NUMBER, self.draft_number as f64),
            (YEARS_IN_LEAGUE, self.years_in_league as f64),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Team,
    College,
}

impl CategoryField {
    pub fn prefix(self) -> &'static str {
        match self {
            CategoryField::Team => TEAM_PREFIX,
            CategoryField::College => COLLEGE_PREFIX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryField::Team => "team",
            CategoryField::College => "college",
        }
    }
}

/// Outcome of looking a category value up in the model's columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Index of the indicator column to set to 1.
    Column(usize),
    /// No such column; the row gets no active indicator for this field.
    Unknown { field: CategoryField, value: String },
}

/// Total lookup from category value to indicator column.
pub fn indicator(field: CategoryField, value: &str, target: &[String]) -> Indicator {
    let name = join!(field.prefix(), value);
    match target.iter().position(|c| *c == name) {
        Some(i) => Indicator::Column(i),
        None => Indicator::Unknown { field, value: s!(value) },
    }
}

/// A single encoded row. `columns` is a copy of the target list, same order.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedRow {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
    /// Categories that had no indicator column (silently zero-filled).
    pub unknown: Vec<Indicator>,
}

impl EncodedRow {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.iter().position(|c| c == column).map(|i| self.values[i])
    }

    /// Indicator columns of `field` currently set to 1.
    pub fn active(&self, field: CategoryField) -> usize {
        self.columns
            .iter()
            .zip(&self.values)
            .filter(|(c, v)| c.starts_with(field.prefix()) && **v == 1.0)
            .count()
    }
}

pub fn encode(row: &FeatureRow, target: &[String]) -> EncodedRow {
    let mut values = vec![0.0; target.len()];

    for (name, v) in row.numeric() {
        if let Some(i) = target.iter().position(|c| c == name) {
            values[i] = v;
        }
    }

    let mut unknown = Vec::new();
    for (field, value) in [
        (CategoryField::Team, row.team_code.as_str()),
        (CategoryField::College, row.college_name.as_str()),
    ] {
        match indicator(field, value, target) {
            Indicator::Column(i) => values[i] = 1.0,
            miss => unknown.push(miss),
        }
    }

    EncodedRow { columns: target.to_vec(), values, unknown }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Vec<String> {
        row![
            AGE, HEIGHT, WEIGHT, DRAFT_NUMBER, YEARS_IN_LEAGUE,
            "team_abbreviation_BOS", "team_abbreviation_LAL", "team_abbreviation_CHI",
            "college_Duke", "college_Kentucky", "college_Other",
        ]
    }

    fn player(team: &str, college: &str) -> FeatureRow {
        FeatureRow {
            age: 24,
            height: 201.0,
            weight: 98.0,
            draft_number: 12,
            years_in_league: 3,
            team_code: s!(team),
            college_name: s!(college),
        }
    }

    #[test]
    fn known_categories_set_exactly_one_indicator_each() {
        let t = target();
        for team in ["BOS", "LAL", "CHI"] {
            for college in ["Duke", "Kentucky", "Other"] {
                let e = encode(&player(team, college), &t);
                assert_eq!(e.columns, t);
                assert_eq!(e.active(CategoryField::Team), 1);
                assert_eq!(e.active(CategoryField::College), 1);
                assert!(e.unknown.is_empty());
            }
        }
    }

    #[test]
    fn numeric_fields_are_copied() {
        let e = encode(&player("BOS", "Duke"), &target());
        assert_eq!(e.get(AGE), Some(24.0));
        assert_eq!(e.get(HEIGHT), Some(201.0));
        assert_eq!(e.get(YEARS_IN_LEAGUE), Some(3.0));
        assert_eq!(e.get("team_abbreviation_BOS"), Some(1.0));
        assert_eq!(e.get("team_abbreviation_LAL"), Some(0.0));
    }

    #[test]
    fn unknown_team_zero_fills_without_error() {
        let e = encode(&player("SEA", "Duke"), &target());
        assert_eq!(e.columns, target());
        assert_eq!(e.active(CategoryField::Team), 0);
        assert_eq!(e.active(CategoryField::College), 1);
        assert_eq!(e.unknown, vec![Indicator::Unknown { field: CategoryField::Team, value: s!("SEA") }]);
    }

    #[test]
    fn columns_the_model_lacks_are_dropped() {
        let t: Vec<String> = row![AGE, "college_Duke"];
        let e = encode(&player("BOS", "Duke"), &t);
        assert_eq!(e.values, vec![24.0, 1.0]);
        assert_eq!(e.unknown.len(), 1);
    }
}
