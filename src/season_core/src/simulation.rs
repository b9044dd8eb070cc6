use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use crate::constants::DEFAULT_TRIALS;
use crate::error::{Result, SeasonError};
use crate::league::League;
use crate::record::TeamRecord;
use crate::season::Season;
use crate::team::TeamId;

/// How a batch of seasons is run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated seasons
    pub trials: usize,

    /// Master seed; `None` draws one from entropy
    pub seed: Option<u64>,

    /// Only games on or after this date are simulated
    pub start_date: Option<NaiveDate>,

    /// Run trials on the rayon thread pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            seed: None,
            start_date: None,
            parallel: true,
        }
    }
}

/// Final state of every team after one trial, indexed by `TeamId`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub index: usize,
    pub wins: Vec<u32>,
    pub losses: Vec<u32>,
    pub seeds: Vec<u32>,
    pub made_playoffs: Vec<bool>,
    pub division_titles: Vec<bool>,
}

/// One team's results across all trials so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamHistory {
    pub wins: Vec<u32>,
    pub losses: Vec<u32>,
    pub seeds: Vec<u32>,
    pub playoffs: u32,
    pub division_titles: u32,
}

/// Append-only collection of trial outcomes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub trials: usize,
    pub teams: Vec<TeamHistory>,
}

impl SimulationResults {
    pub fn new(team_count: usize) -> Self {
        SimulationResults {
            trials: 0,
            teams: vec![TeamHistory::default(); team_count],
        }
    }

    pub fn push(&mut self, outcome: &TrialOutcome) {
        for (i, history) in self.teams.iter_mut().enumerate() {
            history.wins.push(outcome.wins[i]);
            history.losses.push(outcome.losses[i]);
            history.seeds.push(outcome.seeds[i]);
            history.playoffs += outcome.made_playoffs[i] as u32;
            history.division_titles += outcome.division_titles[i] as u32;
        }
        self.trials += 1;
    }

    /// Fold in results from another batch over the same league.
    pub fn merge(&mut self, other: SimulationResults) {
        if self.teams.is_empty() {
            *self = other;
            return;
        }
        for (mine, theirs) in self.teams.iter_mut().zip(other.teams) {
            mine.wins.extend(theirs.wins);
            mine.losses.extend(theirs.losses);
            mine.seeds.extend(theirs.seeds);
            mine.playoffs += theirs.playoffs;
            mine.division_titles += theirs.division_titles;
        }
        self.trials += other.trials;
    }

    pub fn team(&self, team: TeamId) -> &TeamHistory {
        &self.teams[team.index()]
    }

    /// Per-team summaries, best expected record first.
    pub fn summarize(&self, league: &League) -> Vec<TeamSummary> {
        let mut summaries: Vec<TeamSummary> = league
            .team_ids()
            .map(|id| TeamSummary::from_history(league, id, self.team(id), self.trials))
            .collect();
        summaries.sort_by(|a, b| b.mean_wins.total_cmp(&a.mean_wins));
        summaries
    }
}

/// Aggregate forecast for one team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: String,
    pub min_wins: u32,
    pub median_wins: f64,
    pub mean_wins: f64,
    pub max_wins: u32,
    pub mean_losses: f64,
    pub playoff_rate: f64,
    pub division_title_rate: f64,
    pub mean_seed: f64,
    /// Trials finishing at each seed, including the unseeded sentinel
    pub seed_counts: BTreeMap<u32, u32>,
}

fn as_f64(values: &[u32]) -> Vec<f64> {
    values.iter().map(|&v| v as f64).collect()
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    statrs::statistics::Statistics::mean(as_f64(values).iter())
}

impl TeamSummary {
    fn from_history(league: &League, id: TeamId, history: &TeamHistory, trials: usize) -> Self {
        let team = league.team(id);
        let rate = |count: u32| if trials == 0 { 0.0 } else { count as f64 / trials as f64 };
        let median_wins = if history.wins.is_empty() {
            0.0
        } else {
            Data::new(as_f64(&history.wins)).median()
        };

        let mut seed_counts = BTreeMap::new();
        for &seed in &history.seeds {
            *seed_counts.entry(seed).or_insert(0) += 1;
        }

        TeamSummary {
            team: id,
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
            conference: team.conference.clone(),
            division: team.division.clone(),
            min_wins: history.wins.iter().copied().min().unwrap_or(0),
            median_wins,
            mean_wins: mean(&history.wins),
            max_wins: history.wins.iter().copied().max().unwrap_or(0),
            mean_losses: mean(&history.losses),
            playoff_rate: rate(history.playoffs),
            division_title_rate: rate(history.division_titles),
            mean_seed: mean(&history.seeds),
            seed_counts,
        }
    }
}

/// Summaries for one conference ordered by mean wins.
pub fn expected_standings<'a>(summaries: &'a [TeamSummary], conference: &str) -> Vec<&'a TeamSummary> {
    let mut teams: Vec<&TeamSummary> = summaries
        .iter()
        .filter(|s| s.conference.eq_ignore_ascii_case(conference))
        .collect();
    teams.sort_by(|a, b| b.mean_wins.total_cmp(&a.mean_wins));
    teams
}

/// Runs many independent seasons over one league.
#[derive(Clone, Debug)]
pub struct Simulator {
    league: League,
    config: SimulationConfig,
    baseline: Vec<TeamRecord>,
}

impl Simulator {
    /// Simulator whose seasons start from the league's baseline at the
    /// configured start date.
    pub fn new(league: League, config: SimulationConfig) -> Self {
        let baseline = league.baseline_records(config.start_date);
        Simulator {
            league,
            config,
            baseline,
        }
    }

    /// Simulator with caller-supplied starting records.
    pub fn with_baseline(league: League, config: SimulationConfig, baseline: Vec<TeamRecord>) -> Result<Self> {
        if baseline.len() != league.team_count() {
            return Err(SeasonError::BaselineMismatch {
                expected: league.team_count(),
                got: baseline.len(),
            });
        }
        Ok(Simulator {
            league,
            config,
            baseline,
        })
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate one season with its own random stream.
    pub fn run_trial(&self, index: usize, seed: u64) -> Result<TrialOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut season = Season::with_baseline(&self.league, index, self.baseline.clone())?;
        season.simulate(self.config.start_date, &mut rng);
        let standings = season.rank(&mut rng);

        let ids: Vec<TeamId> = self.league.team_ids().collect();
        Ok(TrialOutcome {
            index,
            wins: ids.iter().map(|&t| season.record(t).wins()).collect(),
            losses: ids.iter().map(|&t| season.record(t).losses()).collect(),
            seeds: ids.iter().map(|&t| standings.seed_of(t)).collect(),
            made_playoffs: ids.iter().map(|&t| standings.made_playoffs(t)).collect(),
            division_titles: ids.iter().map(|&t| standings.is_division_winner(t)).collect(),
        })
    }

    /// Run all configured trials.
    pub fn run(&self) -> Result<SimulationResults> {
        let mut rng = match self.config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_with_rng(&mut rng)
    }

    /// Run all configured trials, drawing one seed per trial from `rng`.
    ///
    /// Results are the same whether or not trials run in parallel.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<SimulationResults> {
        let n_simulations = self.config.trials;
        info!(
            trials = n_simulations,
            teams = self.league.team_count(),
            games = self.league.schedule().len(),
            parallel = self.config.parallel,
            "starting simulation"
        );
        let started = Instant::now();

        let seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();
        let outcomes: Vec<TrialOutcome> = if self.config.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(i, &seed)| self.run_trial(i, seed))
                .collect::<Result<_>>()?
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(i, &seed)| self.run_trial(i, seed))
                .collect::<Result<_>>()?
        };

        let mut results = SimulationResults::new(self.league.team_count());
        for outcome in &outcomes {
            results.push(outcome);
        }

        info!(
            trials = results.trials,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation finished"
        );
        Ok(results)
    }
}
