//! Data-driven game balance
//!
//! Difficulty presets and physics tunables. Everything here is plain data:
//! the Easy/Hard presets are compiled-in defaults, and a whole `Tuning` can
//! be deserialized from JSON to rebalance without touching code.

use serde::{Deserialize, Serialize};

use crate::settings::DifficultyMode;

/// A parameter that ramps linearly from `start` to `end` over round progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub start: f32,
    pub end: f32,
}

impl Ramp {
    pub const fn flat(value: f32) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Interpolated value at `progress` (clamped to 0..1)
    pub fn at(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * t
    }
}

/// Block sizing difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTuning {
    /// Narrowest block width the factory will draw (px)
    pub min_width: Ramp,
    /// Widest block width the factory will draw (px)
    pub max_width: Ramp,
    /// Probability of a tall (narrow, unstable) keyword block
    pub tall_chance: Ramp,
}

/// Pending-block movement difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementTuning {
    /// Horizontal oscillation speed (px/s)
    pub oscillation_speed: Ramp,
}

/// Wind model tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindTuning {
    /// Peak horizontal push (px/s) at strength ±1
    pub max_strength: f32,
    /// Full sine cycle duration (s)
    pub cycle_time: f32,
    /// Extra multiplier applied to airborne blocks
    pub falling_multiplier: f32,
    /// Multiplier at the board center (fades to 1.0 at the edges)
    pub center_multiplier: f32,
    /// Distance from center (px) over which the center boost fades out
    pub center_falloff: f32,
}

/// See-saw tilt model tunables
///
/// These constants are empirically tuned for feel, not derived from a
/// physical model. Treat them as balance knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeesawTuning {
    /// Net torque → angular acceleration (deg/s² per torque unit)
    pub sensitivity: f32,
    /// Tilt clamp (deg)
    pub max_tilt: f32,
    /// Per-tick multiplicative angular velocity damping (< 1)
    pub damping: f32,
    /// Net torque magnitude below this is ignored
    pub torque_deadzone: f32,
    /// Restoring acceleration per degree of tilt (pulls back toward level)
    pub restore_force: f32,
    /// Torque multiplier cap for counter-weight blocks
    pub counter_bonus: f32,
    /// Tilt (deg) above which the counter-weight bonus engages
    pub counter_min_tilt: f32,
    /// A block must sit at least this far (px) past the pivot on the
    /// opposite side to count as a counter-weight
    pub counter_margin: f32,
    /// Block area (px²) per torque weight unit
    pub weight_divisor: f32,
    /// Weight cap so oversized blocks cannot dominate
    pub weight_cap: f32,
    /// Slide speed coefficient (px/s per degree over the threshold)
    pub slide_speed: f32,
    /// Tilt (deg) above which landed blocks start sliding
    pub slide_threshold: f32,
    /// Max angular speed (deg/s) at which a landed block eases toward
    /// its tilt-tracking pose
    pub settle_speed: f32,
    /// Gravitational acceleration for falling blocks (px/s²)
    pub gravity: f32,
}

/// Complete balance table for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub block: BlockTuning,
    pub movement: MovementTuning,
    pub wind: WindTuning,
    pub seesaw: SeesawTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::preset(DifficultyMode::Easy)
    }
}

impl Tuning {
    /// Compiled-in preset for a difficulty mode
    pub fn preset(mode: DifficultyMode) -> Self {
        match mode {
            DifficultyMode::Easy => Self {
                block: BlockTuning {
                    min_width: Ramp {
                        start: 80.0,
                        end: 50.0,
                    },
                    max_width: Ramp {
                        start: 130.0,
                        end: 80.0,
                    },
                    tall_chance: Ramp {
                        start: 0.2,
                        end: 0.4,
                    },
                },
                movement: MovementTuning {
                    oscillation_speed: Ramp {
                        start: 120.0,
                        end: 280.0,
                    },
                },
                wind: WindTuning {
                    max_strength: 50.0,
                    cycle_time: 5.0,
                    falling_multiplier: 1.5,
                    center_multiplier: 1.3,
                    center_falloff: 100.0,
                },
                seesaw: SeesawTuning {
                    sensitivity: 0.04,
                    damping: 0.88,
                    slide_speed: 12.0,
                    ..SeesawTuning::baseline()
                },
            },
            DifficultyMode::Hard => Self {
                block: BlockTuning {
                    min_width: Ramp {
                        start: 70.0,
                        end: 30.0,
                    },
                    max_width: Ramp {
                        start: 120.0,
                        end: 60.0,
                    },
                    tall_chance: Ramp {
                        start: 0.3,
                        end: 0.6,
                    },
                },
                movement: MovementTuning {
                    oscillation_speed: Ramp {
                        start: 180.0,
                        end: 480.0,
                    },
                },
                wind: WindTuning {
                    max_strength: 80.0,
                    cycle_time: 4.0,
                    falling_multiplier: 2.0,
                    center_multiplier: 1.5,
                    center_falloff: 100.0,
                },
                seesaw: SeesawTuning {
                    sensitivity: 0.06,
                    damping: 0.92,
                    slide_speed: 18.0,
                    ..SeesawTuning::baseline()
                },
            },
        }
    }

    /// Load a full balance table from JSON (falls back to the caller's
    /// default on error)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SeesawTuning {
    /// Shared baseline; presets override the feel-critical knobs
    fn baseline() -> Self {
        Self {
            sensitivity: 0.05,
            max_tilt: 15.0,
            damping: 0.9,
            torque_deadzone: 30.0,
            restore_force: 1.2,
            counter_bonus: 2.5,
            counter_min_tilt: 3.0,
            counter_margin: 20.0,
            weight_divisor: 1000.0,
            weight_cap: 12.0,
            slide_speed: 15.0,
            slide_threshold: 14.0,
            settle_speed: 120.0,
            gravity: 2000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_interpolation() {
        let ramp = Ramp {
            start: 80.0,
            end: 50.0,
        };
        assert_eq!(ramp.at(0.0), 80.0);
        assert_eq!(ramp.at(1.0), 50.0);
        assert_eq!(ramp.at(0.5), 65.0);
        // Out-of-range progress clamps
        assert_eq!(ramp.at(-1.0), 80.0);
        assert_eq!(ramp.at(2.0), 50.0);
    }

    #[test]
    fn test_presets_differ() {
        let easy = Tuning::preset(DifficultyMode::Easy);
        let hard = Tuning::preset(DifficultyMode::Hard);
        assert!(hard.wind.max_strength > easy.wind.max_strength);
        assert!(hard.movement.oscillation_speed.end > easy.movement.oscillation_speed.end);
        assert!(hard.block.min_width.end < easy.block.min_width.end);
    }

    #[test]
    fn test_tuning_json_round_trip() {
        let tuning = Tuning::preset(DifficultyMode::Hard);
        let json = serde_json::to_string(&tuning).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.wind.cycle_time, tuning.wind.cycle_time);
        assert_eq!(back.seesaw.max_tilt, tuning.seesaw.max_tilt);
    }

    #[test]
    fn test_damping_below_one() {
        for mode in [DifficultyMode::Easy, DifficultyMode::Hard] {
            let tuning = Tuning::preset(mode);
            assert!(tuning.seesaw.damping < 1.0);
            assert!(tuning.seesaw.restore_force > 0.0);
        }
    }
}
