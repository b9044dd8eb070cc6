use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SeasonError;

/// Index of a team within its league.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which half of a team's rating is being evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Offense,
    Defense,
}

impl FromStr for Side {
    type Err = SeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "offense" => Ok(Side::Offense),
            "def" | "defense" => Ok(Side::Defense),
            _ => Err(SeasonError::InvalidSide(s.to_string())),
        }
    }
}

/// Where a game is played, from one team's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    Home,
    Road,
    Neutral,
}

impl Site {
    /// The same game seen from the other bench.
    pub fn opposite(self) -> Self {
        match self {
            Site::Home => Site::Road,
            Site::Road => Site::Home,
            Site::Neutral => Site::Neutral,
        }
    }
}

impl FromStr for Site {
    type Err = SeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Site::Home),
            "road" | "away" => Ok(Site::Road),
            "neutral" => Ok(Site::Neutral),
            _ => Err(SeasonError::InvalidSite(s.to_string())),
        }
    }
}

/// Team with static efficiency ratings.
///
/// Ratings are raw points per 100 possessions (e.g., 112.4 offense, 108.9 defense)
/// and never change during a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: String,

    /// Points scored per 100 possessions
    pub offense: f64,

    /// Points allowed per 100 possessions
    pub defense: f64,

    /// Wins already banked before the simulated part of the schedule
    #[serde(default)]
    pub starting_wins: u32,

    /// Losses already banked before the simulated part of the schedule
    #[serde(default)]
    pub starting_losses: u32,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        conference: impl Into<String>,
        division: impl Into<String>,
        offense: f64,
        defense: f64,
    ) -> Self {
        Team {
            name: name.into(),
            abbreviation: abbreviation.into(),
            conference: conference.into(),
            division: division.into(),
            offense,
            defense,
            starting_wins: 0,
            starting_losses: 0,
        }
    }

    /// Copy of this team carrying an already-accumulated record.
    pub fn with_starting_record(mut self, wins: u32, losses: u32) -> Self {
        self.starting_wins = wins;
        self.starting_losses = losses;
        self
    }

    /// Raw rating for one side of the ball.
    pub fn rating(&self, side: Side) -> f64 {
        match side {
            Side::Offense => self.offense,
            Side::Defense => self.defense,
        }
    }

    /// True if `key` is this team's name or abbreviation, ignoring case.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.name.eq_ignore_ascii_case(key) || self.abbreviation.eq_ignore_ascii_case(key)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} | {}", self.name, self.offense, self.defense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_side_aliases() {
        assert_eq!("off".parse::<Side>().unwrap(), Side::Offense);
        assert_eq!("Defense".parse::<Side>().unwrap(), Side::Defense);
        assert_eq!(
            "rebounding".parse::<Side>(),
            Err(SeasonError::InvalidSide("rebounding".to_string()))
        );
    }

    #[test]
    fn test_parse_site() {
        assert_eq!("HOME".parse::<Site>().unwrap(), Site::Home);
        assert_eq!("road".parse::<Site>().unwrap(), Site::Road);
        assert_eq!("neutral".parse::<Site>().unwrap(), Site::Neutral);
        assert!(matches!("moon".parse::<Site>(), Err(SeasonError::InvalidSite(_))));
    }

    #[test]
    fn test_opposite_site() {
        assert_eq!(Site::Home.opposite(), Site::Road);
        assert_eq!(Site::Road.opposite(), Site::Home);
        assert_eq!(Site::Neutral.opposite(), Site::Neutral);
    }

    #[test]
    fn test_matches_name_or_abbreviation() {
        let team = Team::new("Boston Celtics", "BOS", "east", "atlantic", 118.0, 110.0);
        assert!(team.matches("boston celtics"));
        assert!(team.matches("bos"));
        assert!(!team.matches("BKN"));
    }
}
