//! Score bands.
//!
//! Bands are checked most exclusive first with a strict `score > threshold`
//! test, so a score sitting exactly on a threshold falls to the next band
//! down. The table always ends in a catch-all.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Matches scores strictly greater than the value.
    Above(i32),
    /// Matches everything.
    CatchAll,
}

impl Threshold {
    pub fn admits(self, score: i32) -> bool {
        match self {
            Threshold::Above(t) => score > t,
            Threshold::CatchAll => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMessage {
    pub text: String,
    pub glyph: String,
}

impl BandMessage {
    fn new(text: &str, glyph: &str) -> Self {
        Self {
            text: text.to_string(),
            glyph: glyph.to_string(),
        }
    }
}

/// One qualitative tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub name: String,
    pub threshold: Threshold,
    pub messages: Vec<BandMessage>,
    /// Tokens added on top of the base reward
    pub bonus_reward: i64,
    /// Celebration particle count for the presentation layer
    pub effect_count: u32,
}

/// Ordered band table, most exclusive first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTable {
    tiers: Vec<ScoreBand>,
    fallback: ScoreBand,
}

impl BandTable {
    /// Build a table from bands ordered by descending threshold.
    ///
    /// # Errors
    ///
    /// Fails when the last band is not a catch-all, a catch-all appears
    /// earlier, thresholds are not strictly descending, or a band has no
    /// messages.
    pub fn new(mut bands: Vec<ScoreBand>) -> Result<Self, ValidationError> {
        let fallback = match bands.pop() {
            Some(band) if band.threshold == Threshold::CatchAll => band,
            _ => return Err(ValidationError::MissingCatchAll),
        };

        let mut previous: Option<i32> = None;
        for band in &bands {
            let t = match band.threshold {
                Threshold::Above(t) => t,
                Threshold::CatchAll => {
                    return Err(ValidationError::InvalidValue {
                        field: format!("bands.{}", band.name),
                        message: "only the last band may be a catch-all".to_string(),
                    })
                }
            };
            if previous.is_some_and(|p| t >= p) {
                return Err(ValidationError::InvalidValue {
                    field: format!("bands.{}", band.name),
                    message: "thresholds must be strictly descending".to_string(),
                });
            }
            previous = Some(t);
        }

        for band in bands.iter().chain(std::iter::once(&fallback)) {
            if band.messages.is_empty() {
                return Err(ValidationError::EmptyMessagePool(band.name.clone()));
            }
        }

        Ok(Self {
            tiers: bands,
            fallback,
        })
    }

    /// The weekly check-in bands.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                ScoreBand {
                    name: "EXCELLENT".to_string(),
                    threshold: Threshold::Above(15),
                    messages: vec![
                        BandMessage::new("You're absolutely crushing it! Keep this amazing energy going.", "🎉"),
                        BandMessage::new("Phenomenal work today! You're truly unstoppable.", "🚀"),
                        BandMessage::new("Outstanding achievement! You're reaching new heights.", "⭐"),
                        BandMessage::new("Incredible effort! You're making magic happen.", "✨"),
                        BandMessage::new("Brilliant performance! You're shining so bright.", "🌟"),
                    ],
                    bonus_reward: 2000,
                    effect_count: 300,
                },
                ScoreBand {
                    name: "GREAT".to_string(),
                    threshold: Threshold::Above(12),
                    messages: vec![
                        BandMessage::new("Well done! You're building such great momentum.", "💫"),
                        BandMessage::new("Keep going strong! Your dedication is really showing.", "💪"),
                        BandMessage::new("Fantastic work! You're on such a positive path.", "🌱"),
                        BandMessage::new("Great progress! You're really making it count.", "🎯"),
                        BandMessage::new("Impressive effort! You're moving mountains.", "⚡"),
                    ],
                    bonus_reward: 1000,
                    effect_count: 200,
                },
                ScoreBand {
                    name: "GOOD".to_string(),
                    threshold: Threshold::Above(9),
                    messages: vec![
                        BandMessage::new("Steady progress! Every step forward makes a difference.", "👍"),
                        BandMessage::new("You're doing fine! These small wins really add up.", "🌿"),
                        BandMessage::new("Keep at it! You're making consistent progress.", "⭐"),
                        BandMessage::new("Nice work! You're moving in the right direction.", "💫"),
                        BandMessage::new("Good effort! You're building something special.", "🌱"),
                    ],
                    bonus_reward: 500,
                    effect_count: 150,
                },
            ],
            fallback: ScoreBand {
                name: "SUPPORT".to_string(),
                threshold: Threshold::CatchAll,
                messages: vec![
                    BandMessage::new("We're here for you. Tomorrow brings new opportunities.", "💙"),
                    BandMessage::new("It's okay to have tough days. You're stronger than you know.", "🫂"),
                    BandMessage::new("Take it easy on yourself. Small steps lead to big changes.", "💜"),
                    BandMessage::new("You're not alone in this. Better days are ahead.", "🤝"),
                    BandMessage::new("Remember to breathe. You've got this, one day at a time.", "💫"),
                ],
                bonus_reward: 500,
                effect_count: 50,
            },
        }
    }

    /// First band whose threshold the score strictly exceeds.
    pub fn select(&self, score: i32) -> &ScoreBand {
        self.tiers
            .iter()
            .find(|band| band.threshold.admits(score))
            .unwrap_or(&self.fallback)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreBand> {
        self.tiers.iter().chain(std::iter::once(&self.fallback))
    }

    pub fn get(&self, name: &str) -> Option<&ScoreBand> {
        self.iter().find(|band| band.name == name)
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::standard()
    }
}
