use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::league::League;
use crate::record::{apply_result, TeamRecord};
use crate::team::{Site, TeamId};
use crate::win_prob::win_probability;

/// A scheduled game.
///
/// Scores are present only for games already played; a missing or zero
/// score marks the game as one to simulate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub date: NaiveDate,
    pub home: TeamId,
    pub road: TeamId,
    pub home_score: Option<u32>,
    pub road_score: Option<u32>,
}

impl Game {
    pub fn new(date: NaiveDate, home: TeamId, road: TeamId) -> Self {
        Game {
            date,
            home,
            road,
            home_score: None,
            road_score: None,
        }
    }

    /// Copy of this game with its final score filled in.
    pub fn with_score(mut self, home_score: u32, road_score: u32) -> Self {
        self.home_score = Some(home_score);
        self.road_score = Some(road_score);
        self
    }

    /// `(winner, loser)` when the game has a real, decisive final score.
    pub fn final_result(&self) -> Option<(TeamId, TeamId)> {
        match (self.home_score, self.road_score) {
            (Some(home), Some(road)) if home > 0 && road > 0 => {
                if home > road {
                    Some((self.home, self.road))
                } else if road > home {
                    Some((self.road, self.home))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.final_result().is_some()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.road == team
    }
}

/// Decide a game's winner and loser.
///
/// Played games return their real result. Otherwise one uniform draw is
/// taken and the home team wins iff the draw is at most its win probability;
/// an undefined probability is treated as a coin flip.
pub fn decide<R: Rng>(game: &Game, league: &League, rng: &mut R) -> (TeamId, TeamId) {
    if let Some(result) = game.final_result() {
        return result;
    }

    let home = league.team(game.home);
    let road = league.team(game.road);
    let prob = win_probability(home, road, Site::Home).unwrap_or_else(|| {
        warn!(home = %home.name, road = %road.name, "undefined win probability, using coin flip");
        0.5
    });

    if rng.gen::<f64>() <= prob {
        (game.home, game.road)
    } else {
        (game.road, game.home)
    }
}

/// Resolve a game and optionally write the result into `records`.
///
/// # Arguments
/// * `game` - Game to resolve
/// * `league` - League owning both teams
/// * `records` - Per-team records for the current season, indexed by `TeamId`
/// * `update_standings` - Apply the result to both teams' records
/// * `rng` - Random source for simulated games
///
/// # Returns
/// The winning team
pub fn play_game<R: Rng>(
    game: &Game,
    league: &League,
    records: &mut [TeamRecord],
    update_standings: bool,
    rng: &mut R,
) -> TeamId {
    let (winner, loser) = decide(game, league, rng);
    if update_standings {
        apply_result(records, winner, loser);
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::tests::{date, two_team_league};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_final_result_from_scores() {
        let game = Game::new(date(1), TeamId(0), TeamId(1)).with_score(101, 99);
        assert_eq!(game.final_result(), Some((TeamId(0), TeamId(1))));

        let game = Game::new(date(1), TeamId(0), TeamId(1)).with_score(88, 104);
        assert_eq!(game.final_result(), Some((TeamId(1), TeamId(0))));
    }

    #[test]
    fn test_placeholder_scores_are_unplayed() {
        assert_eq!(Game::new(date(1), TeamId(0), TeamId(1)).final_result(), None);
        let zeroed = Game::new(date(1), TeamId(0), TeamId(1)).with_score(0, 0);
        assert!(!zeroed.is_played());
        let half = Game::new(date(1), TeamId(0), TeamId(1)).with_score(95, 0);
        assert!(!half.is_played());
    }

    #[test]
    fn test_played_game_ignores_ratings() {
        // B is far stronger, but the recorded score says A won
        let league = two_team_league(100.0, 115.0, 120.0, 100.0);
        let game = Game::new(date(1), TeamId(0), TeamId(1)).with_score(99, 98);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(decide(&game, &league, &mut rng), (TeamId(0), TeamId(1)));
        }
    }

    #[test]
    fn test_play_game_updates_both_records() {
        let league = two_team_league(110.0, 110.0, 110.0, 110.0);
        let game = Game::new(date(1), TeamId(0), TeamId(1));
        let mut records = vec![TeamRecord::new(); 2];
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let winner = play_game(&game, &league, &mut records, true, &mut rng);
        let loser = if winner == TeamId(0) { TeamId(1) } else { TeamId(0) };

        assert_eq!(records[winner.index()].wins(), 1);
        assert_eq!(records[winner.index()].against(loser).wins, 1);
        assert_eq!(records[loser.index()].losses(), 1);
        assert_eq!(records[loser.index()].against(winner).losses, 1);
    }

    #[test]
    fn test_preview_leaves_records_untouched() {
        let league = two_team_league(110.0, 110.0, 110.0, 110.0);
        let game = Game::new(date(1), TeamId(0), TeamId(1));
        let mut records = vec![TeamRecord::new(); 2];
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        play_game(&game, &league, &mut records, false, &mut rng);
        assert_eq!(records, vec![TeamRecord::new(); 2]);
    }

    #[test]
    fn test_home_win_frequency_matches_probability() {
        let league = two_team_league(114.0, 108.0, 109.0, 111.0);
        let game = Game::new(date(1), TeamId(0), TeamId(1));
        let expected =
            win_probability(league.team(TeamId(0)), league.team(TeamId(1)), Site::Home).unwrap();

        let n = 20_000;
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let home_wins = (0..n)
            .filter(|_| decide(&game, &league, &mut rng).0 == TeamId(0))
            .count();

        let freq = home_wins as f64 / n as f64;
        let z = Normal::new(0.0, 1.0).unwrap().inverse_cdf(0.9995);
        let tolerance = z * (expected * (1.0 - expected) / n as f64).sqrt();
        assert!(
            (freq - expected).abs() < tolerance,
            "observed {} expected {} (tolerance {})",
            freq,
            expected,
            tolerance
        );
    }
}
