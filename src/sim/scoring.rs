//! Score, combo chain and final-score history

use super::state::ObjectKind;
use crate::audio::SoundEvent;
use crate::consts::*;
use crate::highscores::HistoryScores;
use crate::persistence::KeyValueStore;

/// What slicing one object did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOutcome {
    /// Signed score change
    pub points: i64,
    pub sound: SoundEvent,
    /// "N COMBO!" banner text for chained fruit
    pub combo_message: Option<String>,
}

/// Owns the running score, the combo counter and the history
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    raw_score: i64,
    combo: u32,
    history: HistoryScores,
}

impl ScoringEngine {
    pub fn new(history: HistoryScores) -> Self {
        Self {
            raw_score: 0,
            combo: 0,
            history,
        }
    }

    /// Unclamped score
    #[inline]
    pub fn raw_score(&self) -> i64 {
        self.raw_score
    }

    /// Score as shown to the player
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.raw_score.max(0) as u64
    }

    #[inline]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn history(&self) -> &HistoryScores {
        &self.history
    }

    /// Start a fresh run
    pub fn reset(&mut self) {
        self.raw_score = 0;
        self.combo = 0;
    }

    /// Apply the score rules for slicing an object of `kind`
    pub fn apply(&mut self, kind: ObjectKind) -> SliceOutcome {
        let outcome = match kind {
            ObjectKind::Fruit => {
                self.combo += 1;
                if self.combo > 1 {
                    SliceOutcome {
                        points: FRUIT_POINTS + self.combo as i64 * COMBO_BONUS,
                        sound: SoundEvent::Combo(self.combo),
                        combo_message: Some(format!("{} COMBO!", self.combo)),
                    }
                } else {
                    SliceOutcome {
                        points: FRUIT_POINTS,
                        sound: SoundEvent::Fruit,
                        combo_message: None,
                    }
                }
            }
            ObjectKind::Poop => {
                self.combo = 0;
                SliceOutcome {
                    points: -POOP_PENALTY,
                    sound: SoundEvent::Poop,
                    combo_message: None,
                }
            }
            // Bombs leave the chain alone
            ObjectKind::Bomb => SliceOutcome {
                points: -BOMB_PENALTY,
                sound: SoundEvent::Bomb,
                combo_message: None,
            },
        };
        self.raw_score += outcome.points;
        outcome
    }

    /// Score has run out
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.raw_score <= 0
    }

    /// Clamp the score, record it in the history and persist. Returns the
    /// recorded score.
    pub fn finish_run(&mut self, store: &mut dyn KeyValueStore) -> u64 {
        self.raw_score = self.raw_score.max(0);
        let final_score = self.display_score();
        self.history.record(final_score, store);
        final_score
    }
}
