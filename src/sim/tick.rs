//! Fixed timestep game loop
//!
//! Orchestrates the spawn → drop → land → spawn cycle, the countdown timer,
//! and the terminal conditions. One call per simulation tick; everything
//! downstream of the input is deterministic.

use rand::Rng;

use super::pending::PendingBlock;
use super::spawner::{BlockKind, DifficultySnapshot, generate_block_config, select_block_kind};
use super::state::{DroppedBlock, GameOverReason, GamePhase, GameState, RoundEvent};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Drop the pending block (click/tap/space)
    pub drop: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    // Countdown first: an expired timer ends the round before anything
    // else moves this tick
    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        state.push_event(RoundEvent::TimeExpired);
        end_round(state, GameOverReason::Timeout);
        return;
    }

    // Physics: tilt, wind, falls, settling
    state.physics.update_seesaw(dt);
    state.physics.update_wind(dt);
    state.physics.apply_wind(dt);
    let landed = state.physics.integrate_falling(dt);
    state.physics.settle_landed(dt);

    for _ in &landed {
        state.push_event(RoundEvent::BlockLanded);
    }
    if !landed.is_empty() && state.phase == GamePhase::Falling {
        if state.blocks_remaining == 0 {
            // Final block down: let the tower visibly settle before scoring
            state.phase = GamePhase::Resolving;
            state.resolve_delay_ticks = (1.0 / SIM_DT) as u32;
        } else {
            state.phase = GamePhase::AwaitingSpawn;
            state.spawn_delay_ticks = (0.3 / SIM_DT) as u32;
        }
    }

    // Terminal: anything off the board ends the round immediately
    if state.physics.has_any_block_fallen() {
        state.push_event(RoundEvent::TowerCollapsed);
        end_round(state, GameOverReason::BlockFell);
        return;
    }

    // Score ratchet: peaks are kept even if the tower later settles lower
    let height = state.physics.peak_height();
    if height > state.score {
        state.score = height;
    }

    match state.phase {
        GamePhase::AwaitingSpawn => {
            if state.spawn_delay_ticks > 0 {
                state.spawn_delay_ticks -= 1;
            } else if state.blocks_remaining > 0 {
                spawn_pending(state);
                state.phase = GamePhase::PendingDrop;
            }
        }
        GamePhase::PendingDrop => {
            if let Some(pending) = &mut state.pending {
                pending.advance(dt);
            }
            // Single in-flight: this is the only phase that accepts a drop
            if input.drop {
                drop_pending(state);
            }
        }
        GamePhase::Resolving => {
            if state.resolve_delay_ticks > 0 {
                state.resolve_delay_ticks -= 1;
            } else {
                state.push_event(RoundEvent::RoundComplete);
                end_round(state, GameOverReason::Complete);
            }
        }
        GamePhase::Falling | GamePhase::GameOver => {}
    }
}

/// Build the next pending block from the difficulty curve and content pool
fn spawn_pending(state: &mut GameState) {
    let progress = state.progress();
    let difficulty = DifficultySnapshot::at(&state.tuning, progress);

    let kind = select_block_kind(
        &mut state.rng,
        progress,
        state.content.images_remaining(),
        state.content.keywords_remaining(),
    );
    let (image, keyword) = match kind {
        BlockKind::Image => (state.content.next_image(), None),
        BlockKind::Keyword => (None, state.content.next_keyword()),
    };
    let config = generate_block_config(
        &mut state.rng,
        kind,
        &difficulty,
        image.as_ref(),
        keyword.as_deref(),
    );

    let spin = state.rng.random_range(-45.0..45.0);
    state.pending = Some(PendingBlock::new(
        config,
        difficulty.oscillation_speed,
        spin,
    ));
}

/// Release the pending block into the physics world at its exact pose
fn drop_pending(state: &mut GameState) {
    let Some(pending) = state.pending.take() else {
        return;
    };
    let (config, pose) = pending.release();

    // Spin direction follows the travel direction at release
    let spin = pose.direction * (80.0 + state.rng.random::<f32>() * 120.0);
    let id = state.next_entity_id();
    state
        .physics
        .blocks
        .push(DroppedBlock::from_config(id, &config, pose.pos, pose.angle, spin));

    state.blocks_dropped += 1;
    state.blocks_remaining -= 1;
    state.push_event(RoundEvent::BlockDropped);
    state.phase = GamePhase::Falling;
}

/// Terminal transition: synchronously stop input and spawns
fn end_round(state: &mut GameState, reason: GameOverReason) {
    state.phase = GamePhase::GameOver;
    state.reason = Some(reason);
    state.pending = None;
    state.spawn_delay_ticks = 0;
    state.resolve_delay_ticks = 0;
    log::info!(
        "Round over: {:?} (score {}, {} blocks placed)",
        reason,
        state.score,
        state.blocks_dropped
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSource;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn keywords() -> ContentSource {
        ContentSource::new(
            Vec::new(),
            (0..20).map(|i| format!("kw{i}")).collect(),
        )
    }

    /// Calm-air tuning so drop trajectories are exactly vertical
    fn calm_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.wind.max_strength = 0.0;
        tuning
    }

    fn calm_state(seed: u64) -> GameState {
        GameState::new(seed, calm_tuning(), keywords())
    }

    fn tick_until<F: Fn(&GameState) -> bool>(state: &mut GameState, max_ticks: u32, done: F) {
        for _ in 0..max_ticks {
            if done(state) {
                return;
            }
            tick(state, &TickInput::default(), SIM_DT);
        }
        panic!("condition not reached in {max_ticks} ticks");
    }

    #[test]
    fn test_spawn_after_grace_delay() {
        let mut state = calm_state(1);
        assert!(state.pending.is_none());
        tick_until(&mut state, 120, |s| s.phase == GamePhase::PendingDrop);
        assert!(state.pending.is_some());
    }

    #[test]
    fn test_drop_ignored_without_pending() {
        let mut state = calm_state(1);
        // Still in the spawn grace period
        tick(&mut state, &TickInput { drop: true }, SIM_DT);
        assert_eq!(state.blocks_dropped, 0);
        assert_eq!(state.phase, GamePhase::AwaitingSpawn);
    }

    #[test]
    fn test_single_block_in_flight() {
        let mut state = calm_state(2);
        tick_until(&mut state, 120, |s| s.phase == GamePhase::PendingDrop);

        tick(&mut state, &TickInput { drop: true }, SIM_DT);
        assert_eq!(state.blocks_dropped, 1);
        assert_eq!(state.phase, GamePhase::Falling);
        assert!(state.pending.is_none());

        // Drop input while falling does nothing
        tick(&mut state, &TickInput { drop: true }, SIM_DT);
        assert_eq!(state.blocks_dropped, 1);
    }

    #[test]
    fn test_budget_invariant_holds() {
        let mut state = calm_state(3);
        for _ in 0..600 {
            let drop = state.phase == GamePhase::PendingDrop;
            tick(&mut state, &TickInput { drop }, SIM_DT);
            assert_eq!(
                state.blocks_dropped + state.blocks_remaining,
                TOTAL_BLOCKS
            );
            if state.is_over() {
                break;
            }
        }
    }

    #[test]
    fn test_timeout_with_blocks_remaining() {
        let mut state = calm_state(4);
        state.blocks_remaining = 3;
        state.blocks_dropped = TOTAL_BLOCKS - 3;
        state.time_remaining = 2.0 * SIM_DT;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.is_over());
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.is_over());
        assert_eq!(state.reason, Some(GameOverReason::Timeout));
        assert!(state.drain_events().contains(&RoundEvent::TimeExpired));
    }

    #[test]
    fn test_block_fell_ends_round() {
        let mut state = calm_state(5);
        // A block dropped well past the platform edge never lands
        let config = crate::sim::spawner::BlockConfig {
            kind: BlockKind::Keyword,
            width: 50.0,
            height: 30.0,
            image: None,
            label: None,
        };
        state.physics.blocks.push(DroppedBlock::from_config(
            99,
            &config,
            Vec2::new(30.0, SPAWN_Y),
            0.0,
            0.0,
        ));

        tick_until(&mut state, 600, |s| s.is_over());
        assert_eq!(state.reason, Some(GameOverReason::BlockFell));
        assert!(state.drain_events().contains(&RoundEvent::TowerCollapsed));
        // Input is dead after game over
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput { drop: true }, SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_score_ratchet_never_decreases() {
        let mut state = calm_state(6);
        tick_until(&mut state, 120, |s| s.phase == GamePhase::PendingDrop);
        tick(&mut state, &TickInput { drop: true }, SIM_DT);
        tick_until(&mut state, 600, |s| {
            s.physics.blocks.first().is_some_and(|b| b.landed)
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        let scored = state.score;
        assert!(scored > 0);

        // Yank the tower out from under the score
        state.physics.blocks.clear();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.score, scored);
    }

    #[test]
    fn test_centered_round_completes_level() {
        let mut state = calm_state(7);
        let mut just_dropped = false;
        for _ in 0..(40.0 / SIM_DT) as u32 {
            if just_dropped {
                // Zero-torque scenario: pin the drop to the pivot and kill
                // its spin so the stack stays centered and unrotated
                if let Some(block) = state.physics.blocks.last_mut() {
                    block.pos.x = BOARD_CENTER_X;
                    block.spin = 0.0;
                    block.angle = 0.0;
                }
                just_dropped = false;
            }
            let drop = state.phase == GamePhase::PendingDrop;
            tick(&mut state, &TickInput { drop }, SIM_DT);
            if drop {
                just_dropped = true;
            }
            // Near-centered drops never produce meaningful torque
            assert!(state.physics.seesaw.angle.abs() < 0.5);
            if state.is_over() {
                break;
            }
        }

        assert_eq!(state.reason, Some(GameOverReason::Complete));
        assert_eq!(state.blocks_dropped, TOTAL_BLOCKS);

        // Unrotated stack: peak height is the sum of block heights plus the
        // platform's top half, within float-seating slop
        let sum: f32 = state.physics.blocks.iter().map(|b| b.height).sum();
        let expected = sum + PLATFORM_THICKNESS / 2.0;
        let score = state.score as f32;
        assert!(
            (score - expected).abs() <= TOTAL_BLOCKS as f32,
            "score {score} vs expected {expected}"
        );
    }

    #[test]
    fn test_determinism_across_rounds() {
        let run = |seed: u64| -> (u32, u64, f32) {
            let mut state = GameState::new(seed, calm_tuning(), keywords());
            for _ in 0..1800 {
                let drop = state.phase == GamePhase::PendingDrop;
                tick(&mut state, &TickInput { drop }, SIM_DT);
                if state.is_over() {
                    break;
                }
            }
            (state.score, state.time_ticks, state.physics.seesaw.angle)
        };
        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_wind_trace_is_replayable() {
        let mut a = calm_state(8);
        let mut b = calm_state(8);
        let mut traces = (Vec::new(), Vec::new());
        for _ in 0..300 {
            tick(&mut a, &TickInput::default(), SIM_DT);
            tick(&mut b, &TickInput::default(), SIM_DT);
            traces.0.push(a.physics.wind_strength());
            traces.1.push(b.physics.wind_strength());
        }
        assert_eq!(traces.0, traces.1);
    }
}
