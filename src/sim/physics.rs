//! See-saw, wind, and fall physics
//!
//! The bespoke approximate model at the heart of the game. Not a rigid-body
//! solver: falling blocks integrate gravity plus a horizontal wind push,
//! landing is a bounding-region test, and the platform tilt is driven by a
//! lever-arm torque sum over the landed blocks. All operations are total
//! numeric transforms over `PhysicsWorld`; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::state::DroppedBlock;
use crate::consts::*;
use crate::snap_to_right_angle;
use crate::tuning::{SeesawTuning, WindTuning};

/// Platform tilt state: angle in degrees, positive tips the right side down
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeesawState {
    pub angle: f32,
    pub angular_vel: f32,
}

/// Wind state: a phase accumulator driving a pure sinusoid
///
/// Strength cycles in [-1, 1] with no randomness; two rounds fed identical
/// dt sequences see identical wind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindState {
    pub elapsed: f32,
    pub strength: f32,
}

/// Owns every physical quantity of one round: tilt, wind, dropped blocks
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub seesaw: SeesawState,
    pub wind: WindState,
    pub blocks: Vec<DroppedBlock>,
    pub seesaw_tuning: SeesawTuning,
    pub wind_tuning: WindTuning,
}

impl PhysicsWorld {
    pub fn new(seesaw_tuning: SeesawTuning, wind_tuning: WindTuning) -> Self {
        Self {
            seesaw: SeesawState::default(),
            wind: WindState::default(),
            blocks: Vec::new(),
            seesaw_tuning,
            wind_tuning,
        }
    }

    /// Y of the platform's top surface at horizontal position `x`,
    /// accounting for the current tilt about the center pivot
    pub fn platform_top_at(&self, x: f32) -> f32 {
        let slope = self.seesaw.angle.to_radians().tan();
        PLATFORM_Y - PLATFORM_THICKNESS / 2.0 + (x - BOARD_CENTER_X) * slope
    }

    /// Current signed wind strength in [-1, 1]
    pub fn wind_strength(&self) -> f32 {
        self.wind.strength
    }

    /// Advance the wind sinusoid
    pub fn update_wind(&mut self, dt: f32) {
        self.wind.elapsed += dt;
        self.wind.strength = (self.wind.elapsed * TAU / self.wind_tuning.cycle_time).sin();
    }

    /// Push airborne blocks horizontally
    ///
    /// Blocks near the board center feel more wind than blocks near the
    /// edges, so corner drops are a wind-avoidance strategy.
    pub fn apply_wind(&mut self, dt: f32) {
        let w = &self.wind_tuning;
        let force = self.wind.strength * w.max_strength * w.falling_multiplier;
        for block in &mut self.blocks {
            if block.landed {
                continue;
            }
            let dist = (block.pos.x - BOARD_CENTER_X).abs() / w.center_falloff;
            let center_factor = 1.0 + (1.0 - dist.min(1.0)) * (w.center_multiplier - 1.0);
            block.pos.x += force * center_factor * dt;
        }
    }

    /// Integrate gravity and self-rotation for airborne blocks and detect
    /// landings. Returns the IDs of blocks that landed this tick.
    ///
    /// On landing the rotation snaps to the nearest 90° (the block's
    /// `stable_angle` from then on) and the block is seated on the contact
    /// surface.
    pub fn integrate_falling(&mut self, dt: f32) -> Vec<u32> {
        let gravity = self.seesaw_tuning.gravity;
        let mut landed_ids = Vec::new();

        for i in 0..self.blocks.len() {
            if self.blocks[i].landed {
                continue;
            }

            {
                let block = &mut self.blocks[i];
                block.vel_y += gravity * dt;
                block.pos.y += block.vel_y * dt;
                block.angle += block.spin * dt;
            }

            // Highest surface (smallest y) the block currently contacts
            let contact = {
                let block = &self.blocks[i];
                let bottom = block.bottom_y();
                let mut contact: Option<f32> = None;

                let over_platform =
                    (block.pos.x - BOARD_CENTER_X).abs() <= PLATFORM_HALF_WIDTH;
                let platform_top = self.platform_top_at(block.pos.x);
                if over_platform && bottom >= platform_top {
                    contact = Some(platform_top);
                }

                for (j, other) in self.blocks.iter().enumerate() {
                    if j == i || !other.landed {
                        continue;
                    }
                    let x_overlap = (block.pos.x - other.pos.x).abs()
                        < (block.apparent_width() + other.apparent_width()) / 2.0;
                    // Bounding-region overlap, not a swept test; the overlap
                    // band is wider than a single tick's fall so fast blocks
                    // cannot tunnel through thin ones
                    let y_overlap =
                        bottom >= other.top_y() && block.top_y() <= other.bottom_y();
                    if x_overlap && y_overlap {
                        let surface = other.top_y();
                        contact = Some(contact.map_or(surface, |c| c.min(surface)));
                    }
                }
                contact
            };

            if let Some(surface) = contact {
                let block = &mut self.blocks[i];
                block.angle = snap_to_right_angle(block.angle);
                block.stable_angle = block.angle;
                block.pos.y = surface - block.apparent_height() / 2.0;
                block.vel_y = 0.0;
                block.spin = 0.0;
                block.landed = true;
                landed_ids.push(block.id);
            }
        }

        landed_ids
    }

    /// Per-tick pose tracking for landed blocks
    ///
    /// Each landed block eases its angle toward `stable_angle + tilt` at a
    /// bounded angular speed, and slides down-slope once the tilt exceeds
    /// the slide threshold. A block whose footprint has left every support
    /// resumes falling (its `landed` flag stays set).
    pub fn settle_landed(&mut self, dt: f32) {
        let tilt = self.seesaw.angle;
        let t = self.seesaw_tuning.clone();

        for i in 0..self.blocks.len() {
            if !self.blocks[i].landed {
                continue;
            }

            let supported = {
                let block = &self.blocks[i];
                let over_platform = (block.pos.x - BOARD_CENTER_X).abs()
                    < PLATFORM_HALF_WIDTH + block.apparent_width() / 2.0;
                over_platform
                    || self.blocks.iter().enumerate().any(|(j, other)| {
                        j != i
                            && other.landed
                            && other.pos.y > block.pos.y
                            && (block.pos.x - other.pos.x).abs()
                                < (block.apparent_width() + other.apparent_width()) / 2.0
                    })
            };

            let block = &mut self.blocks[i];
            if !supported {
                block.vel_y += t.gravity * dt;
                block.pos.y += block.vel_y * dt;
                continue;
            }

            let target = block.stable_angle + tilt;
            let max_step = t.settle_speed * dt;
            let delta = (target - block.angle).clamp(-max_step, max_step);
            block.angle += delta;

            // No hysteresis at the threshold; a block balanced exactly on it
            // can chatter in and out of sliding
            let over = tilt.abs() - t.slide_threshold;
            if over > 0.0 {
                block.pos.x += tilt.signum() * t.slide_speed * over * dt;
            }
        }
    }

    /// Signed torque sum over the landed blocks (lever arm × capped weight,
    /// with the counter-weight bonus applied)
    pub fn total_torque(&self) -> f32 {
        let t = &self.seesaw_tuning;
        let tilt = self.seesaw.angle;
        let mut total = 0.0;

        for block in &self.blocks {
            if !block.landed {
                continue;
            }
            let dist = block.pos.x - BOARD_CENTER_X;
            let weight = ((block.width * block.height) / t.weight_divisor).min(t.weight_cap);
            let mut torque = dist * weight;

            // Blocks opposite the current tilt get amplified leverage once
            // the tilt is past the bonus threshold, ramping toward the cap
            let is_counter = (tilt > 0.0 && dist < -t.counter_margin)
                || (tilt < 0.0 && dist > t.counter_margin);
            if is_counter && tilt.abs() > t.counter_min_tilt {
                let span = (t.max_tilt - t.counter_min_tilt).max(f32::EPSILON);
                let strength = ((tilt.abs() - t.counter_min_tilt) / span).min(1.0);
                torque *= 1.0 + (t.counter_bonus - 1.0) * strength;
            }

            total += torque;
        }

        total
    }

    /// Advance the see-saw tilt from the net torque
    pub fn update_seesaw(&mut self, dt: f32) {
        let t = &self.seesaw_tuning;
        let total = self.total_torque();

        // Dead-zone: small imbalances produce no rotation at all
        let net = if total.abs() <= t.torque_deadzone {
            0.0
        } else {
            total - total.signum() * t.torque_deadzone
        };

        let accel = net * t.sensitivity - self.seesaw.angle * t.restore_force;
        self.seesaw.angular_vel += accel * dt;
        self.seesaw.angular_vel *= t.damping;
        self.seesaw.angle =
            (self.seesaw.angle + self.seesaw.angular_vel * dt).clamp(-t.max_tilt, t.max_tilt);
    }

    /// Terminal condition: any dropped block past the fall threshold below
    /// the platform, or past the board edges by the side margin
    pub fn has_any_block_fallen(&self) -> bool {
        self.blocks.iter().any(|block| {
            block.pos.y > FALL_THRESHOLD_Y
                || block.pos.x < -FALL_SIDE_MARGIN
                || block.pos.x > BOARD_WIDTH + FALL_SIDE_MARGIN
        })
    }

    /// Rotation-aware peak height of the landed stack above the platform,
    /// floored to whole pixels, never negative. The caller ratchets this.
    pub fn peak_height(&self) -> u32 {
        let mut max_height: f32 = 0.0;
        for block in &self.blocks {
            if !block.landed {
                continue;
            }
            let height = PLATFORM_Y - block.top_y();
            if height > max_height {
                max_height = height;
            }
        }
        max_height.max(0.0).floor() as u32
    }
}
