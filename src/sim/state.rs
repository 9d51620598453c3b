//! Game state and core simulation types
//!
//! One `GameState` owns everything a round mutates: the physics world, the
//! pending block, timers, and the ratcheted score. No globals; independent
//! rounds are independent values.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pending::PendingBlock;
use super::physics::PhysicsWorld;
use super::spawner::{BlockConfig, BlockKind};
use crate::consts::*;
use crate::content::ContentSource;
use crate::tuning::Tuning;
use crate::{rotated_extent_x, rotated_extent_y};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Grace delay before the next block appears
    AwaitingSpawn,
    /// A block is oscillating at the top, waiting for the drop command
    PendingDrop,
    /// The dropped block is in the air
    Falling,
    /// All blocks placed; letting the tower settle before scoring
    Resolving,
    /// Round ended
    GameOver,
}

/// Why the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// All blocks placed and none fell
    Complete,
    /// A block dropped off the board
    BlockFell,
    /// The countdown reached zero first
    Timeout,
}

/// Discrete events emitted by the game loop, drained by the host
/// (audio cues, screen shake, result transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    BlockDropped,
    BlockLanded,
    TowerCollapsed,
    RoundComplete,
    TimeExpired,
}

/// A block that has been dropped onto the board
///
/// Falls under gravity and wind until `landed`; afterwards it tracks the
/// see-saw tilt from its snapped `stable_angle` and may slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedBlock {
    pub id: u32,
    pub kind: BlockKind,
    /// Center position (px, y grows downward)
    pub pos: Vec2,
    /// Vertical velocity (px/s), meaningful while airborne
    pub vel_y: f32,
    /// Current rotation (deg)
    pub angle: f32,
    /// Self-rotation rate while airborne (deg/s)
    pub spin: f32,
    pub width: f32,
    pub height: f32,
    /// Monotonic: set once on first contact, never cleared
    pub landed: bool,
    /// 90°-snapped pose captured at landing; tilt-tracking baseline
    pub stable_angle: f32,
    /// Render host data carried through from the config
    pub label: Option<String>,
    pub image: Option<String>,
}

impl DroppedBlock {
    /// Build a dropped block from a config at the release pose
    pub fn from_config(id: u32, config: &BlockConfig, pos: Vec2, angle: f32, spin: f32) -> Self {
        Self {
            id,
            kind: config.kind,
            pos,
            vel_y: 0.0,
            angle,
            spin,
            width: config.width,
            height: config.height,
            landed: false,
            stable_angle: 0.0,
            label: config.label.clone(),
            image: config.image.clone(),
        }
    }

    /// Rotation-aware bounding box width
    pub fn apparent_width(&self) -> f32 {
        rotated_extent_x(self.width, self.height, self.angle)
    }

    /// Rotation-aware bounding box height
    pub fn apparent_height(&self) -> f32 {
        rotated_extent_y(self.width, self.height, self.angle)
    }

    /// Top edge Y of the rotated bounding box
    pub fn top_y(&self) -> f32 {
        self.pos.y - self.apparent_height() / 2.0
    }

    /// Bottom edge Y of the rotated bounding box
    pub fn bottom_y(&self) -> f32 {
        self.pos.y + self.apparent_height() / 2.0
    }
}

/// Complete state for one round
#[derive(Debug, Clone)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    /// Deterministic RNG for spawn decisions and drop spin
    pub rng: Pcg32,
    /// Balance table for this round
    pub tuning: Tuning,
    /// Content pool the factory draws from
    pub content: ContentSource,
    /// Current phase
    pub phase: GamePhase,
    /// Set once the phase reaches GameOver
    pub reason: Option<GameOverReason>,
    /// Seesaw + wind + dropped blocks
    pub physics: PhysicsWorld,
    /// The single oscillating block awaiting a drop (at most one)
    pub pending: Option<PendingBlock>,
    /// Blocks not yet dropped
    pub blocks_remaining: u32,
    /// Blocks dropped so far
    pub blocks_dropped: u32,
    /// Countdown (s)
    pub time_remaining: f32,
    /// Ratcheted peak height; only ever increases
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks until the next pending block spawns
    pub spawn_delay_ticks: u32,
    /// Ticks until a fully-placed tower resolves as complete
    pub resolve_delay_ticks: u32,
    /// Events since the last drain
    events: Vec<RoundEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a round with the given seed, balance table, and content
    pub fn new(seed: u64, tuning: Tuning, content: ContentSource) -> Self {
        let physics = PhysicsWorld::new(tuning.seesaw.clone(), tuning.wind.clone());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            content,
            phase: GamePhase::AwaitingSpawn,
            reason: None,
            physics,
            pending: None,
            blocks_remaining: TOTAL_BLOCKS,
            blocks_dropped: 0,
            time_remaining: ROUND_DURATION_SECS,
            score: 0,
            time_ticks: 0,
            // Short beat before the first block appears
            spawn_delay_ticks: (0.5 / SIM_DT) as u32,
            resolve_delay_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Round progress 0..1 (drives the difficulty ramps)
    pub fn progress(&self) -> f32 {
        ((ROUND_DURATION_SECS - self.time_remaining) / ROUND_DURATION_SECS).clamp(0.0, 1.0)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn push_event(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}
