// src/predict/catalog.rs
//
// Read-only lookup of the valid team codes and college names, taken from the
// players dataset the model was trained on.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::consts::OTHER_COLLEGE;
use crate::csv::{column_index, parse_rows};
use crate::error::{Error, Result};

const TEAM_COLUMN: &str = "team_abbreviation";
const COLLEGE_COLUMN: &str = "college";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Unique team codes, first-seen order.
    pub teams: Vec<String>,
    /// Unique colleges after collapsing, first-seen order.
    pub colleges: Vec<String>,
    /// The colleges kept by name; everything else is `"Other"`.
    top: Vec<String>,
}

impl Catalog {
    pub fn load(path: &Path, top_n: usize) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Dataset(format!("{}: {e}", path.display())))?;
        Self::from_csv(&text, top_n)
    }

    pub fn from_csv(text: &str, top_n: usize) -> Result<Self> {
        let mut rows = parse_rows(text, ',').into_iter();
        let headers = rows.next().ok_or_else(|| Error::Dataset(s!("empty dataset")))?;
        let team_ix = column_index(&headers, TEAM_COLUMN)
            .ok_or_else(|| Error::Dataset(format!("no {TEAM_COLUMN} column")))?;
        let college_ix = column_index(&headers, COLLEGE_COLUMN)
            .ok_or_else(|| Error::Dataset(format!("no {COLLEGE_COLUMN} column")))?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        for r in rows {
            let team = r.get(team_ix).map(|s| s.trim()).unwrap_or("");
            let college = r.get(college_ix).map(|s| s.trim()).unwrap_or("");
            pairs.push((s!(team), s!(college)));
        }
        Ok(Self::from_pairs(pairs, top_n))
    }

    /// Build from `(team, college)` pairs, one per dataset row.
    pub fn from_pairs(pairs: Vec<(String, String)>, top_n: usize) -> Self {
        let top = top_by_frequency(pairs.iter().map(|(_, c)| c.as_str()), top_n);

        let mut cat = Catalog { top, ..Default::default() };
        for (team, college) in &pairs {
            if !team.is_empty() && !cat.teams.contains(team) {
                cat.teams.push(team.clone());
            }
            let college = cat.collapse_college(college);
            if !cat.colleges.contains(&college) {
                cat.colleges.push(college);
            }
        }
        logd!("Catalog: {} teams, {} colleges", cat.teams.len(), cat.colleges.len());
        cat
    }

    /// Name outside the top-N frequency list → `"Other"`.
    pub fn collapse_college(&self, name: &str) -> String {
        if self.top.iter().any(|c| c == name) { s!(name) } else { s!(OTHER_COLLEGE) }
    }
}

/// The `n` most frequent values. Ties keep first-seen order.
fn top_by_frequency<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new(); // value -> (count, first index)
    for (i, v) in values.enumerate() {
        counts.entry(v).or_insert((0, i)).0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts.into_iter().map(|(v, (c, i))| (v, c, i)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(n).map(|(v, _, _)| s!(v)).collect()
}
