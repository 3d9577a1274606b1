// tests/predict.rs
use statscrape::predict::{Catalog, CategoryField, FeatureRow, Indicator, LinearModel, Predictor};
use statscrape::Error;

fn columns() -> Vec<String> {
    [
        "age",
        "player_height",
        "player_weight",
        "draft_number",
        "years_in_nba",
        "team_abbreviation_BOS",
        "team_abbreviation_LAL",
        "college_Duke",
        "college_Other",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// gp = 50 + age, pts = 2*BOS, reb = Duke, ast = Other, net = years - 1
fn model() -> LinearModel {
    let zero = vec![0.0; 9];
    let mut gp = zero.clone();
    gp[0] = 1.0;
    let mut pts = zero.clone();
    pts[5] = 2.0;
    let mut reb = zero.clone();
    reb[7] = 1.0;
    let mut ast = zero.clone();
    ast[8] = 1.0;
    let mut net = zero;
    net[4] = 1.0;
    LinearModel::new(columns(), vec![50.0, 0.0, 0.0, 0.0, -1.0], vec![gp, pts, reb, ast, net]).unwrap()
}

fn catalog() -> Catalog {
    let pairs = [("BOS", "Duke"), ("LAL", "Duke"), ("BOS", "Kentucky"), ("SEA", "")];
    Catalog::from_pairs(pairs.iter().map(|(t, c)| (t.to_string(), c.to_string())).collect(), 1)
}

fn player(team: &str, college: &str) -> FeatureRow {
    FeatureRow {
        age: 24,
        height: 201.0,
        weight: 98.5,
        draft_number: 12,
        years_in_league: 3,
        team_code: team.to_string(),
        college_name: college.to_string(),
    }
}

#[test]
fn known_categories_drive_the_model() {
    let p = Predictor::new(Box::new(model()), catalog(), false);
    let out = p.predict(&player("BOS", "Duke")).unwrap();
    assert!(out.unknown.is_empty());
    assert_eq!(out.result.values(), [74.0, 2.0, 1.0, 0.0, 2.0]);
}

#[test]
fn rare_college_collapses_to_other() {
    let p = Predictor::new(Box::new(model()), catalog(), false);
    assert_eq!(p.catalog().colleges, vec!["Duke", "Other"]);

    let out = p.predict(&player("LAL", "Kentucky")).unwrap();
    assert!(out.unknown.is_empty());
    assert_eq!(out.result.rebounds, 0.0);
    assert_eq!(out.result.assists, 1.0);
    assert_eq!(out.result.points, 0.0);
}

#[test]
fn unknown_team_is_zero_filled_by_default() {
    let p = Predictor::new(Box::new(model()), catalog(), false);
    let out = p.predict(&player("SEA", "Duke")).unwrap();
    assert_eq!(out.unknown, vec![Indicator::Unknown { field: CategoryField::Team, value: "SEA".to_string() }]);
    assert_eq!(out.result.points, 0.0);
    assert_eq!(out.result.games_played, 74.0);
}

#[test]
fn strict_predictor_rejects_unknown_team() {
    let p = Predictor::new(Box::new(model()), catalog(), true);
    let err = p.predict(&player("SEA", "Duke")).unwrap_err();
    assert!(matches!(err, Error::UnknownCategory { ref field, ref value } if field == "team" && value == "SEA"));
}

#[test]
fn catalog_from_dataset_csv() {
    let data = "\
,player_name,team_abbreviation,age,player_height,college
0,A,BOS,22,200.6,Duke
1,B,\"LAL\",23,190.5,\"Kentucky, Lexington\"
2,C,BOS,24,210.0,Duke
";
    let cat = Catalog::from_csv(data, 20).unwrap();
    assert_eq!(cat.teams, vec!["BOS", "LAL"]);
    assert_eq!(cat.colleges, vec!["Duke", "Kentucky, Lexington"]);
}
