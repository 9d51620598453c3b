//! Score and result glue
//!
//! Converts the round's ratcheted peak height into the final score, clear
//! line check, rank title, and medal shown on the result screen.

use serde::Serialize;

use crate::sim::{GameOverReason, GameState};

/// Score needed to clear the round ("clear line")
pub const CLEAR_LINE: u32 = 200;

/// Result medal tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    None,
}

/// A rank tier on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub level: u8,
    pub title: &'static str,
    pub min_score: u32,
}

/// Rank ladder, ascending
pub const RANKS: [Rank; 4] = [
    Rank {
        level: 1,
        title: "Trainee Engineer",
        min_score: 0,
    },
    Rank {
        level: 2,
        title: "Certified Scrum Master",
        min_score: 100,
    },
    Rank {
        level: 3,
        title: "Agile Coach",
        min_score: 250,
    },
    Rank {
        level: 4,
        title: "Evangelist",
        min_score: 400,
    },
];

/// Highest rank whose floor the score reaches
pub fn rank_for_score(score: u32) -> Rank {
    let mut achieved = RANKS[0];
    for rank in RANKS {
        if score >= rank.min_score {
            achieved = rank;
        }
    }
    achieved
}

/// Medal tier for a final score
pub fn medal_for_score(score: u32) -> Medal {
    match score {
        400.. => Medal::Gold,
        250.. => Medal::Silver,
        100.. => Medal::Bronze,
        _ => Medal::None,
    }
}

/// Everything the result screen needs from a finished round
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub reason: GameOverReason,
    pub blocks_placed: u32,
    /// Ratcheted peak height reached during the round
    pub peak_score: u32,
    /// Score the round actually banks: zero when the tower collapsed
    pub final_score: u32,
    /// Whether the peak crossed the clear line, even if the tower fell later
    pub passed_clear_line: bool,
    pub rank: Rank,
    pub medal: Medal,
}

impl RoundSummary {
    /// Summarize a finished round. Callers must only invoke this after the
    /// state reached GameOver; an unfinished round summarizes as a timeout.
    pub fn from_state(state: &GameState) -> Self {
        let reason = state.reason.unwrap_or(GameOverReason::Timeout);
        let peak_score = state.score;
        let final_score = if reason == GameOverReason::BlockFell {
            0
        } else {
            peak_score
        };

        Self {
            reason,
            blocks_placed: state.blocks_dropped,
            peak_score,
            final_score,
            passed_clear_line: peak_score >= CLEAR_LINE,
            rank: rank_for_score(final_score),
            medal: medal_for_score(final_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSource;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    #[test]
    fn test_rank_ladder() {
        assert_eq!(rank_for_score(0).level, 1);
        assert_eq!(rank_for_score(99).level, 1);
        assert_eq!(rank_for_score(100).level, 2);
        assert_eq!(rank_for_score(399).level, 3);
        assert_eq!(rank_for_score(400).title, "Evangelist");
    }

    #[test]
    fn test_medal_tiers() {
        assert_eq!(medal_for_score(50), Medal::None);
        assert_eq!(medal_for_score(100), Medal::Bronze);
        assert_eq!(medal_for_score(250), Medal::Silver);
        assert_eq!(medal_for_score(1000), Medal::Gold);
    }

    #[test]
    fn test_collapse_zeroes_final_score() {
        let mut state = GameState::new(1, Tuning::default(), ContentSource::empty());
        state.score = 320;
        state.phase = GamePhase::GameOver;
        state.reason = Some(GameOverReason::BlockFell);

        let summary = RoundSummary::from_state(&state);
        assert_eq!(summary.peak_score, 320);
        assert_eq!(summary.final_score, 0);
        // The peak still counts toward the clear line record
        assert!(summary.passed_clear_line);
        assert_eq!(summary.medal, Medal::None);
        assert_eq!(summary.rank.level, 1);
    }

    #[test]
    fn test_complete_keeps_score() {
        let mut state = GameState::new(1, Tuning::default(), ContentSource::empty());
        state.score = 320;
        state.phase = GamePhase::GameOver;
        state.reason = Some(GameOverReason::Complete);

        let summary = RoundSummary::from_state(&state);
        assert_eq!(summary.final_score, 320);
        assert_eq!(summary.medal, Medal::Silver);
        assert_eq!(summary.rank.level, 3);
    }
}
