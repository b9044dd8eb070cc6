use pyo3::prelude::*;
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_TRIALS, PLAYOFF_TEAMS};
use crate::league::{parse_date, GameEntry, League, LeagueStructure, TeamEntry};
use crate::simulation::{SimulationConfig, Simulator, TeamSummary};

/// Roster and schedule collected from Python, simulated on demand.
#[pyclass(name = "League")]
#[derive(Clone)]
pub struct PyLeague {
    structure: LeagueStructure,
    teams: Vec<TeamEntry>,
    games: Vec<GameEntry>,
}

#[pymethods]
impl PyLeague {
    #[new]
    #[pyo3(signature = (playoff_teams = PLAYOFF_TEAMS))]
    pub fn new(playoff_teams: usize) -> Self {
        let nba = LeagueStructure::nba();
        PyLeague {
            structure: LeagueStructure::new(nba.conferences().to_vec(), playoff_teams),
            teams: Vec::new(),
            games: Vec::new(),
        }
    }

    #[pyo3(signature = (name, abbreviation, conference, division, offeff, defeff, wins = None, losses = None))]
    #[allow(clippy::too_many_arguments)]
    pub fn add_team(
        &mut self,
        name: String,
        abbreviation: String,
        conference: String,
        division: String,
        offeff: f64,
        defeff: f64,
        wins: Option<u32>,
        losses: Option<u32>,
    ) {
        self.teams.push(TeamEntry {
            name,
            abbreviation,
            conference,
            division,
            offensive_efficiency: offeff,
            defensive_efficiency: defeff,
            wins,
            losses,
        });
    }

    /// Add a game; `date` is `YYYY-MM-DD`.
    #[pyo3(signature = (date, home, road, home_score = None, road_score = None))]
    pub fn add_game(
        &mut self,
        date: &str,
        home: String,
        road: String,
        home_score: Option<u32>,
        road_score: Option<u32>,
    ) -> PyResult<()> {
        self.games.push(GameEntry {
            date: parse_date(date)?,
            home,
            road,
            home_score,
            road_score,
        });
        Ok(())
    }

    /// Run `trials` seasons and return one summary per team, best first.
    #[pyo3(signature = (trials = DEFAULT_TRIALS, seed = None, start_date = None))]
    pub fn simulate(
        &self,
        py: Python<'_>,
        trials: usize,
        seed: Option<u64>,
        start_date: Option<&str>,
    ) -> PyResult<Vec<PyTeamSummary>> {
        let league = League::from_entries(self.structure.clone(), self.teams.clone(), self.games.clone())?;
        let config = SimulationConfig {
            trials,
            seed,
            start_date: start_date.map(parse_date).transpose()?,
            parallel: true,
        };
        let sim = Simulator::new(league, config);
        let results = py.allow_threads(|| sim.run())?;
        Ok(results
            .summarize(sim.league())
            .into_iter()
            .map(PyTeamSummary::from)
            .collect())
    }

    fn __len__(&self) -> usize {
        self.teams.len()
    }

    fn __repr__(&self) -> String {
        format!("League({} teams, {} games)", self.teams.len(), self.games.len())
    }
}

/// Forecast for one team, as seen from Python.
#[pyclass(name = "TeamSummary")]
#[derive(Clone, Debug)]
pub struct PyTeamSummary {
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub abbreviation: String,
    #[pyo3(get)]
    pub conference: String,
    #[pyo3(get)]
    pub division: String,
    #[pyo3(get)]
    pub min_wins: u32,
    #[pyo3(get)]
    pub median_wins: f64,
    #[pyo3(get)]
    pub mean_wins: f64,
    #[pyo3(get)]
    pub max_wins: u32,
    #[pyo3(get)]
    pub playoff_rate: f64,
    #[pyo3(get)]
    pub division_title_rate: f64,
    #[pyo3(get)]
    pub mean_seed: f64,
    #[pyo3(get)]
    pub seed_counts: BTreeMap<u32, u32>,
}

#[pymethods]
impl PyTeamSummary {
    fn __repr__(&self) -> String {
        format!(
            "TeamSummary({}, mean_wins={:.1}, playoff_rate={:.3})",
            self.name, self.mean_wins, self.playoff_rate
        )
    }
}

impl From<TeamSummary> for PyTeamSummary {
    fn from(s: TeamSummary) -> Self {
        PyTeamSummary {
            name: s.name,
            abbreviation: s.abbreviation,
            conference: s.conference,
            division: s.division,
            min_wins: s.min_wins,
            median_wins: s.median_wins,
            mean_wins: s.mean_wins,
            max_wins: s.max_wins,
            playoff_rate: s.playoff_rate,
            division_title_rate: s.division_title_rate,
            mean_seed: s.mean_seed,
            seed_counts: s.seed_counts,
        }
    }
}
