//! The pending block oscillating at the top of the board
//!
//! Exactly one exists at a time, owned by `GameState`. It ping-pongs
//! horizontally between the oscillation bounds while slowly spinning, until
//! the drop command captures its pose.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawner::BlockConfig;
use crate::consts::*;

/// Pose handed to the physics world when the pending block is released
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPose {
    pub pos: Vec2,
    pub angle: f32,
    /// Travel direction at release; seeds the dropped block's spin sign
    pub direction: f32,
}

/// The single block awaiting the player's drop command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBlock {
    pub config: BlockConfig,
    /// Oscillating horizontal position
    pub x: f32,
    /// Fixed spawn height
    pub y: f32,
    /// -1.0 or +1.0
    pub direction: f32,
    /// Horizontal speed (px/s)
    pub speed: f32,
    /// Self-rotation (deg)
    pub angle: f32,
    /// Spin rate (deg/s)
    pub spin: f32,
}

impl PendingBlock {
    /// Spawn centered, heading right
    pub fn new(config: BlockConfig, speed: f32, spin: f32) -> Self {
        Self {
            config,
            x: BOARD_CENTER_X,
            y: SPAWN_Y,
            direction: 1.0,
            speed,
            angle: 0.0,
            spin,
        }
    }

    /// Integrate one tick of oscillation
    ///
    /// Pure reflection at the bounds: position clamps to the bound and the
    /// direction flips, speed unchanged. Post-condition: x stays within
    /// [OSC_LEFT_BOUND, OSC_RIGHT_BOUND].
    pub fn advance(&mut self, dt: f32) {
        self.x += self.direction * self.speed * dt;
        self.angle += self.spin * dt;

        if self.x <= OSC_LEFT_BOUND {
            self.x = OSC_LEFT_BOUND;
            self.direction = 1.0;
        } else if self.x >= OSC_RIGHT_BOUND {
            self.x = OSC_RIGHT_BOUND;
            self.direction = -1.0;
        }
    }

    /// Capture the exact pose for the dropped block, consuming the pending
    /// entity. Visual continuity: the dropped block starts precisely here.
    pub fn release(self) -> (BlockConfig, DropPose) {
        let pose = DropPose {
            pos: Vec2::new(self.x, self.y),
            angle: self.angle,
            direction: self.direction,
        };
        (self.config, pose)
    }
}
