use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::team::TeamId;

/// Wins and losses over some subset of games.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn new(wins: u32, losses: u32) -> Self {
        WinLoss { wins, losses }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Winning percentage, or `None` if no games were played.
    pub fn win_pct(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            games => Some(self.wins as f64 / games as f64),
        }
    }
}

impl std::ops::Add for WinLoss {
    type Output = WinLoss;

    fn add(self, other: WinLoss) -> WinLoss {
        WinLoss::new(self.wins + other.wins, self.losses + other.losses)
    }
}

/// One team's record within a single simulated season.
///
/// Totals may include a banked starting record that is not attributed to any
/// opponent; every game applied through [`apply_result`] is attributed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    wins: u32,
    losses: u32,
    opponents: HashMap<TeamId, WinLoss>,
}

impl TeamRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record holding banked totals with no per-opponent breakdown.
    pub fn with_totals(wins: u32, losses: u32) -> Self {
        TeamRecord {
            wins,
            losses,
            opponents: HashMap::new(),
        }
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn total(&self) -> WinLoss {
        WinLoss::new(self.wins, self.losses)
    }

    /// Record against one opponent; zero if they have not met.
    pub fn against(&self, opponent: TeamId) -> WinLoss {
        self.opponents.get(&opponent).copied().unwrap_or_default()
    }

    /// Combined record against every listed opponent.
    pub fn against_all<I>(&self, opponents: I) -> WinLoss
    where
        I: IntoIterator<Item = TeamId>,
    {
        opponents
            .into_iter()
            .map(|opp| self.against(opp))
            .fold(WinLoss::default(), |acc, wl| acc + wl)
    }

    /// Opponents this team has a result against.
    pub fn opponents(&self) -> impl Iterator<Item = (TeamId, WinLoss)> + '_ {
        self.opponents.iter().map(|(&id, &wl)| (id, wl))
    }

    /// Games attributed to a specific opponent.
    pub fn attributed(&self) -> WinLoss {
        self.opponents.values().fold(WinLoss::default(), |acc, &wl| acc + wl)
    }

    fn record_win(&mut self, opponent: TeamId) {
        self.wins += 1;
        self.opponents.entry(opponent).or_default().wins += 1;
    }

    fn record_loss(&mut self, opponent: TeamId) {
        self.losses += 1;
        self.opponents.entry(opponent).or_default().losses += 1;
    }
}

/// Apply one game result to both teams' records.
///
/// Both records are updated within this call so a game is never half-applied.
pub fn apply_result(records: &mut [TeamRecord], winner: TeamId, loser: TeamId) {
    debug_assert_ne!(winner, loser);
    records[winner.index()].record_win(loser);
    records[loser.index()].record_loss(winner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_pct_undefined_without_games() {
        assert_eq!(WinLoss::default().win_pct(), None);
        assert_eq!(WinLoss::new(3, 1).win_pct(), Some(0.75));
    }

    #[test]
    fn test_against_missing_opponent_is_zero() {
        let record = TeamRecord::new();
        assert_eq!(record.against(TeamId(7)), WinLoss::default());
        // reading does not create an entry
        assert_eq!(record.opponents().count(), 0);
    }

    #[test]
    fn test_apply_result_updates_both_teams() {
        let mut records = vec![TeamRecord::new(); 3];
        apply_result(&mut records, TeamId(0), TeamId(1));
        apply_result(&mut records, TeamId(0), TeamId(1));
        apply_result(&mut records, TeamId(2), TeamId(0));

        assert_eq!(records[0].total(), WinLoss::new(2, 1));
        assert_eq!(records[0].against(TeamId(1)), WinLoss::new(2, 0));
        assert_eq!(records[0].against(TeamId(2)), WinLoss::new(0, 1));
        assert_eq!(records[1].against(TeamId(0)), WinLoss::new(0, 2));
        assert_eq!(records[2].total(), WinLoss::new(1, 0));
    }

    #[test]
    fn test_attributed_matches_totals() {
        let mut records = vec![TeamRecord::new(); 4];
        let results = [(0, 1), (2, 3), (1, 2), (3, 0), (0, 2), (1, 3)];
        for (w, l) in results {
            apply_result(&mut records, TeamId(w), TeamId(l));
        }
        for record in &records {
            assert_eq!(record.attributed(), record.total());
        }
    }

    #[test]
    fn test_banked_totals_are_unattributed() {
        let mut records = vec![TeamRecord::with_totals(10, 5), TeamRecord::new()];
        apply_result(&mut records, TeamId(0), TeamId(1));
        assert_eq!(records[0].total(), WinLoss::new(11, 5));
        assert_eq!(records[0].attributed(), WinLoss::new(1, 0));
    }

    #[test]
    fn test_against_all_sums_subset() {
        let mut records = vec![TeamRecord::new(); 4];
        apply_result(&mut records, TeamId(0), TeamId(1));
        apply_result(&mut records, TeamId(2), TeamId(0));
        apply_result(&mut records, TeamId(0), TeamId(3));
        let subset = records[0].against_all([TeamId(1), TeamId(2)]);
        assert_eq!(subset, WinLoss::new(1, 1));
    }
}
