use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SeasonError};
use crate::game::play_game;
use crate::league::{ConferenceSpec, League};
use crate::record::TeamRecord;
use crate::standings::{
    playoff_order, rank_teams, ConferenceStandings, DivisionStandings, RankingContext, Standings,
};
use crate::team::TeamId;

/// One simulated replay of a league's schedule.
///
/// Owns the only mutable state of a trial: one `TeamRecord` per team.
#[derive(Clone, Debug)]
pub struct Season<'a> {
    league: &'a League,
    index: usize,
    baseline: Vec<TeamRecord>,
    records: Vec<TeamRecord>,
    games_applied: usize,
}

impl<'a> Season<'a> {
    /// Season starting every team from an empty record.
    pub fn new(league: &'a League, index: usize) -> Self {
        let baseline = vec![TeamRecord::new(); league.team_count()];
        Season {
            league,
            index,
            records: baseline.clone(),
            baseline,
            games_applied: 0,
        }
    }

    /// Season starting from already-accumulated records.
    ///
    /// `simulate` resets to `baseline` instead of to empty records, so real
    /// results can be banked and only the remainder simulated.
    pub fn with_baseline(league: &'a League, index: usize, baseline: Vec<TeamRecord>) -> Result<Self> {
        if baseline.len() != league.team_count() {
            return Err(SeasonError::BaselineMismatch {
                expected: league.team_count(),
                got: baseline.len(),
            });
        }
        Ok(Season {
            league,
            index,
            records: baseline.clone(),
            baseline,
            games_applied: 0,
        })
    }

    /// Replay the schedule in date order.
    ///
    /// Games dated before `start_date` are skipped entirely.
    pub fn simulate<R: Rng>(&mut self, start_date: Option<NaiveDate>, rng: &mut R) {
        self.records = self.baseline.clone();
        self.games_applied = 0;

        let mut skipped = 0;
        for game in self.league.schedule() {
            if start_date.map_or(false, |start| game.date < start) {
                skipped += 1;
                continue;
            }
            play_game(game, self.league, &mut self.records, true, rng);
            self.games_applied += 1;
        }

        debug!(
            season = self.index,
            applied = self.games_applied,
            skipped,
            "season simulated"
        );
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn league(&self) -> &'a League {
        self.league
    }

    pub fn record(&self, team: TeamId) -> &TeamRecord {
        &self.records[team.index()]
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    /// Games resolved by the last `simulate` call.
    pub fn games_applied(&self) -> usize {
        self.games_applied
    }

    pub fn total_wins(&self) -> u32 {
        self.records.iter().map(TeamRecord::wins).sum()
    }

    pub fn total_losses(&self) -> u32 {
        self.records.iter().map(TeamRecord::losses).sum()
    }

    fn context(&self) -> RankingContext<'_> {
        RankingContext::new(self.league, &self.records)
    }

    fn ranked<R: Rng>(&self, mut teams: Vec<TeamId>, rng: &mut R) -> Vec<TeamId> {
        rank_teams(&self.context(), &mut teams, rng);
        teams
    }

    /// Conference standings, or one division's standings, best first.
    pub fn standings<R: Rng>(
        &self,
        conference: &str,
        division: Option<&str>,
        rng: &mut R,
    ) -> Result<Vec<TeamId>> {
        let teams = match division {
            Some(division) => self.league.division_teams(conference, division)?,
            None => self.league.conference_teams(conference)?,
        };
        Ok(self.ranked(teams, rng))
    }

    /// Best team in a division; `None` if the division has no teams.
    pub fn division_winner<R: Rng>(
        &self,
        conference: &str,
        division: &str,
        rng: &mut R,
    ) -> Result<Option<TeamId>> {
        Ok(self.standings(conference, Some(division), rng)?.first().copied())
    }

    /// Winner of each division in a conference, in division order.
    pub fn division_winners<R: Rng>(&self, conference: &str, rng: &mut R) -> Result<Vec<TeamId>> {
        let spec = self.league.structure().conference(conference)?;
        let mut winners = Vec::with_capacity(spec.divisions.len());
        for division in &spec.divisions {
            winners.extend(self.division_winner(&spec.name, division, rng)?);
        }
        Ok(winners)
    }

    /// Every team in the conference in seed order (seed 1 first).
    pub fn playoff_seeds<R: Rng>(&self, conference: &str, rng: &mut R) -> Result<Vec<TeamId>> {
        let spec = self.league.structure().conference(conference)?;
        Ok(self.conference_standings(spec, rng).seeds)
    }

    /// Seed of one team within its conference.
    pub fn playoff_seed<R: Rng>(&self, team: TeamId, rng: &mut R) -> Result<u32> {
        let spec = self.league.structure().conference(&self.league.team(team).conference)?;
        let standings = self.conference_standings(spec, rng);
        Ok(standings.seed_of(team).unwrap_or_else(|| standings.unseeded()))
    }

    pub fn made_playoffs<R: Rng>(&self, team: TeamId, rng: &mut R) -> Result<bool> {
        let seed = self.playoff_seed(team, rng)?;
        Ok(seed as usize <= self.league.structure().playoff_teams())
    }

    /// Rank every conference and division and assign seeds.
    ///
    /// Ties settled by coin flip are drawn once here, so all queries on the
    /// returned `Standings` agree with each other.
    pub fn rank<R: Rng>(&self, rng: &mut R) -> Standings {
        let structure = self.league.structure();
        let conferences = structure
            .conferences()
            .iter()
            .map(|spec| self.conference_standings(spec, rng))
            .collect();
        Standings {
            conferences,
            playoff_teams: structure.playoff_teams(),
        }
    }

    fn conference_standings<R: Rng>(&self, spec: &ConferenceSpec, rng: &mut R) -> ConferenceStandings {
        let members = |division: Option<&str>| -> Vec<TeamId> {
            self.league
                .team_ids()
                .filter(|&id| {
                    let team = self.league.team(id);
                    team.conference == spec.name && division.map_or(true, |d| team.division == d)
                })
                .collect()
        };

        let ranked = self.ranked(members(None), rng);
        let divisions: Vec<DivisionStandings> = spec
            .divisions
            .iter()
            .map(|division| DivisionStandings {
                division: division.clone(),
                ranked: self.ranked(members(Some(division.as_str())), rng),
            })
            .collect();
        let winners: Vec<TeamId> = divisions.iter().filter_map(DivisionStandings::winner).collect();
        let seeds = playoff_order(&self.context(), &ranked, &winners, rng);

        ConferenceStandings {
            conference: spec.name.clone(),
            ranked,
            divisions,
            seeds,
        }
    }
}
