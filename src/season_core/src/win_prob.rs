use crate::constants::{EXP, HFA};
use crate::team::{Side, Site, Team};

/// Multiplier applied to a rating for home-court advantage.
///
/// Offense is boosted at home, defense is boosted on the road (a higher
/// defensive rating means more points allowed).
pub fn homefield_factor(side: Side, site: Site) -> f64 {
    match (side, site) {
        (_, Site::Neutral) => 1.0,
        (Side::Offense, Site::Home) | (Side::Defense, Site::Road) => 1.0 + HFA,
        _ => 1.0 - HFA,
    }
}

/// Site-adjusted efficiency for one side of a team's rating.
pub fn efficiency(team: &Team, side: Side, site: Site) -> f64 {
    team.rating(side) * homefield_factor(side, site)
}

/// Pythagorean win expectation from a team's own offense and defense.
pub fn pythagorean(team: &Team, site: Site) -> f64 {
    let off = efficiency(team, Side::Offense, site).powf(EXP);
    let def = efficiency(team, Side::Defense, site).powf(EXP);
    off / (off + def)
}

/// Probability that a team with win rate `a` beats a team with win rate `b`.
///
/// Returns NaN when `a + b == 2ab` (both 0 or both 1).
pub fn log5(a: f64, b: f64) -> f64 {
    (a - a * b) / (a + b - 2.0 * a * b)
}

/// Calculate the probability of `team` beating `opponent`.
///
/// `site` is from `team`'s point of view; the opponent is rated at the
/// opposite site. Returns `None` when log5 is undefined so callers can fall
/// back to a coin flip.
///
/// # Arguments
/// * `team` - Team whose win probability is returned
/// * `opponent` - The other team
/// * `site` - Home, road, or neutral for `team`
pub fn win_probability(team: &Team, opponent: &Team, site: Site) -> Option<f64> {
    let prob = log5(pythagorean(team, site), pythagorean(opponent, site.opposite()));
    if prob.is_finite() {
        Some(prob)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn team(name: &str, offense: f64, defense: f64) -> Team {
        Team::new(name, name, "east", "atlantic", offense, defense)
    }

    #[test]
    fn test_homefield_factor_table() {
        assert!((homefield_factor(Side::Offense, Site::Home) - 1.014).abs() < 1e-12);
        assert!((homefield_factor(Side::Defense, Site::Road) - 1.014).abs() < 1e-12);
        assert!((homefield_factor(Side::Offense, Site::Road) - 0.986).abs() < 1e-12);
        assert!((homefield_factor(Side::Defense, Site::Home) - 0.986).abs() < 1e-12);
        assert_eq!(homefield_factor(Side::Offense, Site::Neutral), 1.0);
        assert_eq!(homefield_factor(Side::Defense, Site::Neutral), 1.0);
    }

    #[test]
    fn test_efficiency_scales_rating() {
        let t = team("A", 110.0, 105.0);
        assert!((efficiency(&t, Side::Offense, Site::Home) - 110.0 * 1.014).abs() < 1e-9);
        assert!((efficiency(&t, Side::Defense, Site::Home) - 105.0 * 0.986).abs() < 1e-9);
        assert_eq!(efficiency(&t, Side::Offense, Site::Neutral), 110.0);
    }

    #[test]
    fn test_pythagorean_even_team() {
        let t = team("A", 108.0, 108.0);
        assert!((pythagorean(&t, Site::Neutral) - 0.5).abs() < 1e-12);
        assert!(pythagorean(&t, Site::Home) > 0.5);
        assert!(pythagorean(&t, Site::Road) < 0.5);
    }

    #[test]
    fn test_log5_reference_value() {
        assert!((log5(0.70, 0.40) - 0.7778).abs() < 1e-3);
        assert!((log5(0.5, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_neutral_matchup_from_ratings() {
        // ratings chosen so the neutral-site pythagoreans are ~0.70 and ~0.40
        let a = team("A", 108.62, 100.0);
        let b = team("B", 96.12, 100.0);
        assert!((pythagorean(&a, Site::Neutral) - 0.70).abs() < 0.002);
        assert!((pythagorean(&b, Site::Neutral) - 0.40).abs() < 0.002);
        let prob = win_probability(&a, &b, Site::Neutral).unwrap();
        assert!((prob - 0.778).abs() < 0.005, "got {}", prob);
    }

    #[test]
    fn test_log5_degenerate_is_nan() {
        assert!(log5(1.0, 1.0).is_nan());
        assert!(log5(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_equal_teams_home_favored() {
        let home = team("A", 110.0, 110.0);
        let road = team("B", 110.0, 110.0);
        let prob = win_probability(&home, &road, Site::Home).unwrap();
        assert!(prob > 0.5, "home team should be favored, got {}", prob);
        let neutral = win_probability(&home, &road, Site::Neutral).unwrap();
        assert!((neutral - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_better_team_favored() {
        let strong = team("Strong", 118.0, 106.0);
        let weak = team("Weak", 106.0, 116.0);
        let prob = win_probability(&strong, &weak, Site::Road).unwrap();
        assert!(prob > 0.8, "strong team should be heavily favored on the road");
        assert!(prob < 1.0);
    }

    #[test]
    fn test_home_and_road_views_agree() {
        let a = team("A", 114.0, 109.0);
        let b = team("B", 111.0, 112.5);
        let home = win_probability(&a, &b, Site::Home).unwrap();
        let road = win_probability(&b, &a, Site::Road).unwrap();
        assert!((home + road - 1.0).abs() < 1e-10, "P(A beats B) + P(B beats A) should equal 1");
    }

    #[test]
    fn test_degenerate_matchup_is_none() {
        let perfect = team("A", 120.0, 0.0);
        let also_perfect = team("B", 120.0, 0.0);
        assert_eq!(win_probability(&perfect, &also_perfect, Site::Neutral), None);
    }

    proptest! {
        #[test]
        fn prop_log5_same_rate_is_even(a in 0.001f64..0.999) {
            prop_assert!((log5(a, a) - 0.5).abs() < 1e-9);
        }

        #[test]
        fn prop_log5_complements(a in 0.001f64..0.999, b in 0.001f64..0.999) {
            prop_assert!((log5(a, b) + log5(b, a) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_win_probability_bounds(
            off_a in 95.0f64..125.0, def_a in 95.0f64..125.0,
            off_b in 95.0f64..125.0, def_b in 95.0f64..125.0,
        ) {
            let a = team("A", off_a, def_a);
            let b = team("B", off_b, def_b);
            for site in [Site::Home, Site::Road, Site::Neutral] {
                let prob = win_probability(&a, &b, site).unwrap();
                prop_assert!((0.0..=1.0).contains(&prob));
            }
        }
    }
}
