use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{NBA_CONFERENCES, PLAYOFF_TEAMS};
use crate::error::{Result, SeasonError};
use crate::game::Game;
use crate::record::{apply_result, TeamRecord};
use crate::team::{Team, TeamId};

/// A conference and the divisions inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceSpec {
    pub name: String,
    pub divisions: Vec<String>,
}

impl ConferenceSpec {
    pub fn new<S: Into<String>>(name: impl Into<String>, divisions: impl IntoIterator<Item = S>) -> Self {
        ConferenceSpec {
            name: name.into(),
            divisions: divisions.into_iter().map(Into::into).collect(),
        }
    }

    fn division(&self, name: &str) -> Option<&str> {
        self.divisions
            .iter()
            .find(|d| d.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

/// Conference/division layout and playoff format.
///
/// Fixed once a league is built; names are matched case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStructure {
    conferences: Vec<ConferenceSpec>,
    playoff_teams: usize,
}

impl LeagueStructure {
    pub fn new(conferences: Vec<ConferenceSpec>, playoff_teams: usize) -> Self {
        LeagueStructure {
            conferences,
            playoff_teams,
        }
    }

    /// Two conferences of three divisions, eight playoff teams each.
    pub fn nba() -> Self {
        let conferences = NBA_CONFERENCES
            .iter()
            .map(|(name, divisions)| ConferenceSpec::new(*name, divisions.iter().copied()))
            .collect();
        LeagueStructure::new(conferences, PLAYOFF_TEAMS)
    }

    pub fn conferences(&self) -> &[ConferenceSpec] {
        &self.conferences
    }

    /// Playoff teams per conference.
    pub fn playoff_teams(&self) -> usize {
        self.playoff_teams
    }

    pub fn conference(&self, name: &str) -> Result<&ConferenceSpec> {
        self.conferences
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SeasonError::UnknownConference(name.to_string()))
    }

    /// Conference that contains `division`.
    pub fn conference_of_division(&self, division: &str) -> Option<&ConferenceSpec> {
        self.conferences
            .iter()
            .find(|c| c.division(division).is_some())
    }

    /// Canonical `(conference, division)` spelling for a team's placement.
    fn placement(&self, conference: &str, division: &str) -> Result<(String, String)> {
        let conf = self.conference(conference)?;
        let div = conf
            .division(division)
            .ok_or_else(|| SeasonError::UnknownDivision {
                conference: conference.to_string(),
                division: division.to_string(),
            })?;
        Ok((conf.name.clone(), div.to_string()))
    }
}

impl Default for LeagueStructure {
    fn default() -> Self {
        Self::nba()
    }
}

/// Roster row supplied by a collaborator (e.g. parsed from CSV).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: String,
    #[serde(alias = "offeff")]
    pub offensive_efficiency: f64,
    #[serde(alias = "defeff")]
    pub defensive_efficiency: f64,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
}

impl From<TeamEntry> for Team {
    fn from(entry: TeamEntry) -> Self {
        Team::new(
            entry.name,
            entry.abbreviation,
            entry.conference,
            entry.division,
            entry.offensive_efficiency,
            entry.defensive_efficiency,
        )
        .with_starting_record(entry.wins.unwrap_or(0), entry.losses.unwrap_or(0))
    }
}

/// Schedule row supplied by a collaborator; teams are named by name or abbreviation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub date: NaiveDate,
    pub home: String,
    pub road: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub road_score: Option<u32>,
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SeasonError::InvalidDate(s.to_string()))
}

/// Teams, their conference/division placement, and the schedule.
///
/// Read-only during simulation; per-season state lives in `Season`.
#[derive(Clone, Debug)]
pub struct League {
    structure: LeagueStructure,
    teams: Vec<Team>,
    schedule: Vec<Game>,
}

impl League {
    pub fn new(structure: LeagueStructure) -> Self {
        League {
            structure,
            teams: Vec::new(),
            schedule: Vec::new(),
        }
    }

    /// Build a league from roster and schedule rows.
    pub fn from_entries<T, G>(structure: LeagueStructure, teams: T, games: G) -> Result<Self>
    where
        T: IntoIterator<Item = TeamEntry>,
        G: IntoIterator<Item = GameEntry>,
    {
        let mut league = League::new(structure);
        for entry in teams {
            league.add_team(entry.into())?;
        }
        for entry in games {
            let home = league.find_team(&entry.home)?;
            let road = league.find_team(&entry.road)?;
            let mut game = Game::new(entry.date, home, road);
            game.home_score = entry.home_score;
            game.road_score = entry.road_score;
            league.add_game(game)?;
        }
        Ok(league)
    }

    /// Add a team, placing it in its conference and division.
    pub fn add_team(&mut self, mut team: Team) -> Result<TeamId> {
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(&team.name)) {
            return Err(SeasonError::DuplicateTeam(team.name));
        }
        let (conference, division) = self.structure.placement(&team.conference, &team.division)?;
        team.conference = conference;
        team.division = division;
        self.teams.push(team);
        Ok(TeamId(self.teams.len() - 1))
    }

    /// Add a game, keeping the schedule in date order.
    ///
    /// Games on the same date keep their insertion order.
    pub fn add_game(&mut self, game: Game) -> Result<()> {
        for id in [game.home, game.road] {
            if id.index() >= self.teams.len() {
                return Err(SeasonError::UnknownTeam(format!("#{}", id.index())));
            }
        }
        if game.home == game.road {
            return Err(SeasonError::SelfMatchup(self.team(game.home).name.clone()));
        }
        let pos = self.schedule.partition_point(|g| g.date <= game.date);
        self.schedule.insert(pos, game);
        Ok(())
    }

    pub fn structure(&self) -> &LeagueStructure {
        &self.structure
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.teams.len()).map(TeamId)
    }

    /// Look up a team by name or abbreviation.
    pub fn find_team(&self, key: &str) -> Result<TeamId> {
        self.teams
            .iter()
            .position(|t| t.matches(key))
            .map(TeamId)
            .ok_or_else(|| SeasonError::UnknownTeam(key.to_string()))
    }

    /// Schedule in date order.
    pub fn schedule(&self) -> &[Game] {
        &self.schedule
    }

    pub fn conference_teams(&self, conference: &str) -> Result<Vec<TeamId>> {
        let conf = self.structure.conference(conference)?;
        Ok(self
            .team_ids()
            .filter(|&id| self.team(id).conference == conf.name)
            .collect())
    }

    pub fn division_teams(&self, conference: &str, division: &str) -> Result<Vec<TeamId>> {
        let (conference, division) = self.structure.placement(conference, division)?;
        Ok(self
            .team_ids()
            .filter(|&id| {
                let team = self.team(id);
                team.conference == conference && team.division == division
            })
            .collect())
    }

    pub fn same_conference(&self, a: TeamId, b: TeamId) -> bool {
        self.team(a).conference == self.team(b).conference
    }

    /// Records every season starts from.
    ///
    /// Each team's starting wins/losses, plus, when `cutoff` is given, every
    /// game dated before it that has a final score. Games on or after the
    /// cutoff are left for the simulation.
    pub fn baseline_records(&self, cutoff: Option<NaiveDate>) -> Vec<TeamRecord> {
        let mut records: Vec<TeamRecord> = self
            .teams
            .iter()
            .map(|t| TeamRecord::with_totals(t.starting_wins, t.starting_losses))
            .collect();

        if let Some(cutoff) = cutoff {
            for game in self.schedule.iter().take_while(|g| g.date < cutoff) {
                if let Some((winner, loser)) = game.final_result() {
                    apply_result(&mut records, winner, loser);
                }
            }
        }
        records
    }
}
