//! Pure rating math for the club leaderboard.
//!
//! The score is a Bayesian-smoothed win rate (Laplace +1/+2 correction)
//! multiplied by a confidence factor that grows with games played, so a
//! one-game wonder cannot outrank a high-volume regular.

use serde::{Deserialize, Serialize};

/// Rating for a player with `wins` wins over `games` games.
///
/// `score = ((wins + 1) / (games + 2)) * ln(games + 1) * 100`
///
/// Full precision is used for sorting; round only for display.
/// A player with no recorded games scores 0.
pub fn score(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    let smoothed = (wins as f64 + 1.0) / (games as f64 + 2.0);
    smoothed * ((games as f64) + 1.0).ln() * 100.0
}

/// Competition ("min" method) ranks for a list of scores.
///
/// Every entry gets `1 + count of strictly higher scores`, so tied scores
/// share a rank and the next distinct score continues from the tie group's
/// occupant count (ranks can repeat, rank values after a tie can skip).
pub fn competition_ranks(scores: &[f64]) -> Vec<usize> {
    scores
        .iter()
        .map(|s| 1 + scores.iter().filter(|other| **other > *s).count())
        .collect()
}

/// Percentile tier labels, from the top of the table down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    SClass,
    AClass,
    BClass,
    Rookie,
}

impl Tier {
    /// Tier for a player at `rank` out of `total` ranked players.
    ///
    /// Bands are evaluated in order with inclusive upper bounds:
    /// p <= 0.10 -> S, p <= 0.30 -> A, p <= 0.60 -> B, else Rookie,
    /// where p = rank / total.
    pub fn for_standing(rank: usize, total: usize) -> Self {
        let p = rank as f64 / total as f64;
        if p <= 0.1 {
            Tier::SClass
        } else if p <= 0.3 {
            Tier::AClass
        } else if p <= 0.6 {
            Tier::BClass
        } else {
            Tier::Rookie
        }
    }

    /// Display label as shown on the leaderboard.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::SClass => "💎 S-Class (Top 10%)",
            Tier::AClass => "✨ A-Class (Top 30%)",
            Tier::BClass => "👣 B-Class (Top 60%)",
            Tier::Rookie => "🔰 Rookie",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn score_matches_formula() {
        // (1+1)/(1+2) * ln(2) * 100
        let expected = (2.0 / 3.0) * 2.0_f64.ln() * 100.0;
        assert!((score(1, 1) - expected).abs() < 1e-9);

        // (0+1)/(4+2) * ln(5) * 100
        let expected = (1.0 / 6.0) * 5.0_f64.ln() * 100.0;
        assert!((score(0, 4) - expected).abs() < 1e-9);
    }

    #[test]
    fn score_is_monotonic_in_wins() {
        for games in 1..=30 {
            for wins in 0..games {
                assert!(
                    score(wins + 1, games) > score(wins, games),
                    "score must increase with wins at games={}",
                    games
                );
            }
        }
    }

    #[test]
    fn score_suppresses_single_game_streaks() {
        // A 1/1 player must not outrank a strong high-volume player.
        assert!(score(1, 1) < score(15, 20));
    }

    #[test]
    fn zero_games_scores_zero() {
        assert_eq!(score(0, 0), 0.0);
    }

    #[test]
    fn ties_share_the_min_rank_and_skip_after() {
        let ranks = competition_ranks(&[90.0, 90.0, 70.0]);
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn distinct_scores_rank_densely() {
        let ranks = competition_ranks(&[50.0, 80.0, 20.0]);
        assert_eq!(ranks, vec![2, 1, 3]);
    }

    #[rstest]
    #[case(10, 100, Tier::SClass)]
    #[case(11, 100, Tier::AClass)]
    #[case(30, 100, Tier::AClass)]
    #[case(31, 100, Tier::BClass)]
    #[case(60, 100, Tier::BClass)]
    #[case(61, 100, Tier::Rookie)]
    #[case(100, 100, Tier::Rookie)]
    fn tier_boundaries_for_hundred_players(
        #[case] rank: usize,
        #[case] total: usize,
        #[case] expected: Tier,
    ) {
        assert_eq!(Tier::for_standing(rank, total), expected);
    }

    #[rstest]
    #[case(1, 20, Tier::SClass)]
    #[case(2, 20, Tier::SClass)] // 2/20 = 0.10, inclusive
    #[case(3, 20, Tier::AClass)]
    #[case(6, 20, Tier::AClass)]
    #[case(7, 20, Tier::BClass)]
    #[case(12, 20, Tier::BClass)] // 12/20 = 0.60, inclusive
    #[case(13, 20, Tier::Rookie)]
    fn tier_boundaries_for_twenty_players(
        #[case] rank: usize,
        #[case] total: usize,
        #[case] expected: Tier,
    ) {
        assert_eq!(Tier::for_standing(rank, total), expected);
    }
}
