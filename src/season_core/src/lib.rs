//! Season Core - Monte Carlo forecasts for a basketball league's regular season.
//!
//! Simulates the remaining schedule many times from efficiency ratings and
//! reduces each replay to standings and playoff seeds. With the `python`
//! feature the crate builds as a Python extension module.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod constants;
pub mod error;
pub mod game;
pub mod league;
#[cfg(feature = "python")]
pub mod python;
pub mod record;
pub mod season;
pub mod simulation;
pub mod standings;
pub mod team;
pub mod win_prob;

pub use constants::{EXP, HFA, PLAYOFF_TEAMS};
pub use error::{Result, SeasonError};
pub use game::{play_game, Game};
pub use league::{parse_date, ConferenceSpec, GameEntry, League, LeagueStructure, TeamEntry};
pub use record::{TeamRecord, WinLoss};
pub use season::Season;
pub use simulation::{
    expected_standings, SimulationConfig, SimulationResults, Simulator, TeamSummary, TrialOutcome,
};
pub use standings::{ConferenceStandings, DivisionStandings, Standings};
pub use team::{Side, Site, Team, TeamId};
pub use win_prob::{efficiency, homefield_factor, log5, pythagorean, win_probability};

/// Home-court multiplier for a rating side at a site.
///
/// Python-friendly wrapper; unknown side or site names raise `ValueError`.
#[cfg(feature = "python")]
#[pyfunction]
fn py_homefield_factor(side: &str, site: &str) -> PyResult<f64> {
    Ok(homefield_factor(side.parse()?, site.parse()?))
}

/// Head-to-head probability from two independent win rates.
#[cfg(feature = "python")]
#[pyfunction]
fn py_log5(a: f64, b: f64) -> f64 {
    log5(a, b)
}

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn season_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<python::PyLeague>()?;
    m.add_class::<python::PyTeamSummary>()?;

    // Core functions
    m.add_function(wrap_pyfunction!(py_homefield_factor, m)?)?;
    m.add_function(wrap_pyfunction!(py_log5, m)?)?;

    // Constants
    m.add("HFA", HFA)?;
    m.add("EXP", EXP)?;
    m.add("PLAYOFF_TEAMS", PLAYOFF_TEAMS)?;

    Ok(())
}
