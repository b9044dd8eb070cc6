/// Home-court advantage applied to efficiency ratings (1.4%)
pub const HFA: f64 = 0.014;

/// Pythagorean exponent for basketball efficiency ratings
pub const EXP: f64 = 10.25;

/// Playoff teams per conference in the standard format
pub const PLAYOFF_TEAMS: usize = 8;

/// Default number of simulated seasons
pub const DEFAULT_TRIALS: usize = 1000;

/// Conference -> division layout of the league.
pub const NBA_CONFERENCES: [(&str, [&str; 3]); 2] = [
    ("east", ["southeast", "atlantic", "central"]),
    ("west", ["northwest", "pacific", "southwest"]),
];
