//! Tie-break rules, ranking, and playoff seeding.
//!
//! Every comparator returns `Ordering::Less` when `a` ranks ahead of `b`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::league::League;
use crate::record::{TeamRecord, WinLoss};
use crate::team::{Site, TeamId};
use crate::win_prob::pythagorean;

/// Read-only view used by the tie-break rules.
#[derive(Clone, Copy)]
pub struct RankingContext<'a> {
    pub league: &'a League,
    pub records: &'a [TeamRecord],
}

impl<'a> RankingContext<'a> {
    pub fn new(league: &'a League, records: &'a [TeamRecord]) -> Self {
        RankingContext { league, records }
    }

    pub fn record(&self, team: TeamId) -> &TeamRecord {
        &self.records[team.index()]
    }

    /// Record in games against teams from the same conference.
    pub fn conference_record(&self, team: TeamId) -> WinLoss {
        self.record(team)
            .opponents()
            .filter(|&(opp, _)| self.league.same_conference(team, opp))
            .fold(WinLoss::default(), |acc, (_, wl)| acc + wl)
    }
}

pub type Tiebreaker = fn(&RankingContext<'_>, TeamId, TeamId) -> Ordering;

/// Deterministic rules, in the order they are applied.
pub const TIEBREAKERS: [Tiebreaker; 4] = [
    compare_total_wins,
    compare_head_to_head,
    compare_conference_record,
    compare_pythagorean,
];

// Higher percentage ranks first; an undefined percentage ties.
fn compare_pct(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

pub fn compare_total_wins(ctx: &RankingContext<'_>, a: TeamId, b: TeamId) -> Ordering {
    ctx.record(b).wins().cmp(&ctx.record(a).wins())
}

pub fn compare_head_to_head(ctx: &RankingContext<'_>, a: TeamId, b: TeamId) -> Ordering {
    compare_pct(
        ctx.record(a).against(b).win_pct(),
        ctx.record(b).against(a).win_pct(),
    )
}

/// Only applies to teams in the same conference.
pub fn compare_conference_record(ctx: &RankingContext<'_>, a: TeamId, b: TeamId) -> Ordering {
    if !ctx.league.same_conference(a, b) {
        return Ordering::Equal;
    }
    compare_pct(
        ctx.conference_record(a).win_pct(),
        ctx.conference_record(b).win_pct(),
    )
}

pub fn compare_pythagorean(ctx: &RankingContext<'_>, a: TeamId, b: TeamId) -> Ordering {
    let pa = pythagorean(ctx.league.team(a), Site::Neutral);
    let pb = pythagorean(ctx.league.team(b), Site::Neutral);
    pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
}

/// Last resort for dead ties.
pub fn coin_flip<R: Rng>(rng: &mut R) -> Ordering {
    if rng.gen_bool(0.5) {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Full cascade: first non-equal rule wins, otherwise a coin flip.
pub fn compare_teams<R: Rng>(ctx: &RankingContext<'_>, a: TeamId, b: TeamId, rng: &mut R) -> Ordering {
    TIEBREAKERS
        .iter()
        .map(|rule| rule(ctx, a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| coin_flip(rng))
}

/// Sort `teams` best-first.
///
/// Head-to-head results can be intransitive and the coin flip is random, so
/// this uses an insertion sort, which stays well-defined for any comparator.
pub fn rank_teams<R: Rng>(ctx: &RankingContext<'_>, teams: &mut [TeamId], rng: &mut R) {
    for i in 1..teams.len() {
        let mut j = i;
        while j > 0 && compare_teams(ctx, teams[j - 1], teams[j], rng) == Ordering::Greater {
            teams.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Playoff order for one conference.
///
/// Division winners and the best remaining team are re-ranked among
/// themselves to take the top seeds; everyone else follows in `ranked` order.
pub fn playoff_order<R: Rng>(
    ctx: &RankingContext<'_>,
    ranked: &[TeamId],
    division_winners: &[TeamId],
    rng: &mut R,
) -> Vec<TeamId> {
    let mut seeds: Vec<TeamId> = division_winners.to_vec();
    if let Some(&wildcard) = ranked.iter().find(|t| !division_winners.contains(t)) {
        seeds.push(wildcard);
    }
    rank_teams(ctx, &mut seeds, rng);

    let rest: Vec<TeamId> = ranked.iter().copied().filter(|t| !seeds.contains(t)).collect();
    seeds.extend(rest);
    seeds
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionStandings {
    pub division: String,
    pub ranked: Vec<TeamId>,
}

impl DivisionStandings {
    pub fn winner(&self) -> Option<TeamId> {
        self.ranked.first().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceStandings {
    pub conference: String,
    pub ranked: Vec<TeamId>,
    pub divisions: Vec<DivisionStandings>,
    /// Seed 1 first
    pub seeds: Vec<TeamId>,
}

impl ConferenceStandings {
    pub fn division_winners(&self) -> Vec<TeamId> {
        self.divisions.iter().filter_map(DivisionStandings::winner).collect()
    }

    /// Seed sentinel, worse than any real seed in this conference.
    pub fn unseeded(&self) -> u32 {
        self.ranked.len() as u32 + 1
    }

    pub fn seed_of(&self, team: TeamId) -> Option<u32> {
        self.seeds.iter().position(|&t| t == team).map(|p| p as u32 + 1)
    }
}

/// Ranked standings for one finished season.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub conferences: Vec<ConferenceStandings>,
    pub playoff_teams: usize,
}

impl Standings {
    pub fn conference(&self, name: &str) -> Option<&ConferenceStandings> {
        self.conferences
            .iter()
            .find(|c| c.conference.eq_ignore_ascii_case(name))
    }

    /// Playoff seed, or a sentinel past every conference's last seed.
    pub fn seed_of(&self, team: TeamId) -> u32 {
        self.conferences
            .iter()
            .find_map(|c| c.seed_of(team))
            .unwrap_or_else(|| self.conferences.iter().map(|c| c.unseeded()).max().unwrap_or(1))
    }

    pub fn made_playoffs(&self, team: TeamId) -> bool {
        self.seed_of(team) as usize <= self.playoff_teams
    }

    pub fn is_division_winner(&self, team: TeamId) -> bool {
        self.conferences
            .iter()
            .flat_map(|c| c.divisions.iter())
            .any(|d| d.winner() == Some(team))
    }
}
