//! Tilt Tower entry point
//!
//! On wasm32 this exposes the game to the hosting page: the page drives
//! requestAnimationFrame and input events, and draws each frame from the
//! scene snapshot the core hands back. On native it runs one headless demo
//! round and prints the result summary.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use tilt_tower::audio::{AudioManager, cue_for_event};
    use tilt_tower::consts::*;
    use tilt_tower::content::ContentSource;
    use tilt_tower::score::RoundSummary;
    use tilt_tower::sim::{GamePhase, GameState, TickInput, tick};
    use tilt_tower::tuning::Tuning;
    use tilt_tower::{HighScores, Settings};

    /// One block as the render host sees it
    #[derive(Serialize)]
    struct BlockView {
        id: u32,
        x: f32,
        y: f32,
        angle: f32,
        width: f32,
        height: f32,
        landed: bool,
        label: Option<String>,
        image: Option<String>,
    }

    /// Per-frame scene snapshot handed to the host for drawing
    #[derive(Serialize)]
    struct SceneView {
        phase: &'static str,
        tilt: f32,
        wind: f32,
        score: u32,
        time_remaining: f32,
        blocks_remaining: u32,
        pending: Option<BlockView>,
        blocks: Vec<BlockView>,
    }

    fn phase_name(phase: GamePhase) -> &'static str {
        match phase {
            GamePhase::AwaitingSpawn => "awaitingSpawn",
            GamePhase::PendingDrop => "pendingDrop",
            GamePhase::Falling => "falling",
            GamePhase::Resolving => "resolving",
            GamePhase::GameOver => "gameOver",
        }
    }

    fn scene_view(state: &GameState) -> SceneView {
        let pending = state.pending.as_ref().map(|p| BlockView {
            id: 0,
            x: p.x,
            y: p.y,
            angle: p.angle,
            width: p.config.width,
            height: p.config.height,
            landed: false,
            label: p.config.label.clone(),
            image: p.config.image.clone(),
        });
        let blocks = state
            .physics
            .blocks
            .iter()
            .map(|b| BlockView {
                id: b.id,
                x: b.pos.x,
                y: b.pos.y,
                angle: b.angle,
                width: b.width,
                height: b.height,
                landed: b.landed,
                label: b.label.clone(),
                image: b.image.clone(),
            })
            .collect();

        SceneView {
            phase: phase_name(state.phase),
            tilt: state.physics.seesaw.angle,
            wind: state.physics.wind_strength(),
            score: state.score,
            time_remaining: state.time_remaining,
            blocks_remaining: state.blocks_remaining,
            pending,
            blocks,
        }
    }

    /// Game instance driven by the hosting page
    #[wasm_bindgen]
    pub struct TiltTower {
        state: GameState,
        settings: Settings,
        highscores: HighScores,
        audio: AudioManager,
        /// Content kept pristine so restarts get a fresh pool
        base_content: ContentSource,
        accumulator: f32,
        last_time: f64,
        drop_queued: bool,
        summary: Option<RoundSummary>,
    }

    #[wasm_bindgen]
    impl TiltTower {
        /// Create a round. `content_json` is the host's prepared pool
        /// (`{"images": [{"handle", "width", "height", "usable"}], "keywords": [..]}`);
        /// anything unparseable degrades to an empty pool and keyword
        /// fallback blocks.
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u32, content_json: &str) -> TiltTower {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let content: ContentSource = serde_json::from_str(content_json).unwrap_or_else(|e| {
                log::warn!("Unusable content pool ({e}); falling back to keywords only");
                ContentSource::empty()
            });
            let settings = Settings::load();
            let tuning = Tuning::preset(settings.difficulty);

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            log::info!("Round start (seed {seed}, {:?})", settings.difficulty);
            TiltTower {
                state: GameState::new(seed as u64, tuning, content.clone()),
                settings,
                highscores: HighScores::load(),
                audio,
                base_content: content,
                accumulator: 0.0,
                last_time: 0.0,
                drop_queued: false,
                summary: None,
            }
        }

        /// Queue a drop command (click/tap/space). Also the user gesture
        /// that unlocks the audio context.
        pub fn queue_drop(&mut self) {
            self.audio.resume();
            self.drop_queued = true;
        }

        /// Advance the simulation to `now_ms` and return the scene snapshot
        /// as JSON for the host to draw.
        pub fn frame(&mut self, now_ms: f64) -> String {
            let dt = if self.last_time > 0.0 {
                (((now_ms - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                0.0
            };
            self.last_time = now_ms;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    drop: self.drop_queued,
                };
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.drop_queued = false;
            }

            for event in self.state.drain_events() {
                if let Some(cue) = cue_for_event(event) {
                    self.audio.play(cue);
                }
            }

            if self.state.is_over() && self.summary.is_none() {
                self.finish_round();
            }

            serde_json::to_string(&scene_view(&self.state)).unwrap_or_else(|_| "null".into())
        }

        /// Result summary as JSON, or "null" while the round is live
        pub fn summary(&self) -> String {
            match &self.summary {
                Some(summary) => serde_json::to_string(summary).unwrap_or_else(|_| "null".into()),
                None => "null".into(),
            }
        }

        pub fn is_over(&self) -> bool {
            self.state.is_over()
        }

        /// Start a fresh round with a new seed and a pristine content pool
        pub fn restart(&mut self, seed: u32) {
            let tuning = Tuning::preset(self.settings.difficulty);
            self.state = GameState::new(seed as u64, tuning, self.base_content.clone());
            self.accumulator = 0.0;
            self.last_time = 0.0;
            self.drop_queued = false;
            self.summary = None;
            log::info!("Round restart (seed {seed})");
        }

        /// Switch the balance preset; takes effect on the next restart
        pub fn set_difficulty(&mut self, mode: &str) {
            if let Some(difficulty) = tilt_tower::DifficultyMode::from_str(mode) {
                self.settings.difficulty = difficulty;
                self.settings.save();
            }
        }

        fn finish_round(&mut self) {
            let summary = RoundSummary::from_state(&self.state);

            if summary.final_score > 0 {
                let rank = self.highscores.add_score(
                    summary.final_score,
                    summary.blocks_placed,
                    js_sys::Date::now(),
                );
                if let Some(rank) = rank {
                    log::info!("New high score, rank {rank}");
                    self.audio.play(tilt_tower::audio::AudioCue::HighScore);
                    self.highscores.save();
                }
            }

            self.summary = Some(summary);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tilt_tower::consts::*;
    use tilt_tower::content::ContentSource;
    use tilt_tower::score::RoundSummary;
    use tilt_tower::sim::{GamePhase, GameState, TickInput, tick};
    use tilt_tower::tuning::Tuning;

    env_logger::init();

    let keywords = [
        "scrum", "kanban", "sprint", "backlog", "velocity", "standup", "retro", "kaizen",
        "mvp", "launch",
    ];
    let content = ContentSource::new(
        Vec::new(),
        keywords.iter().map(|k| k.to_string()).collect(),
    );
    let mut state = GameState::new(42, Tuning::default(), content);

    // Headless demo: drop each block as it swings past the pivot
    let max_ticks = (ROUND_DURATION_SECS / SIM_DT) as u32 + 60;
    for _ in 0..max_ticks {
        let drop = state.phase == GamePhase::PendingDrop
            && state
                .pending
                .as_ref()
                .is_some_and(|p| (p.x - BOARD_CENTER_X).abs() < 10.0);
        tick(&mut state, &TickInput { drop }, SIM_DT);
        if state.is_over() {
            break;
        }
    }

    let summary = RoundSummary::from_state(&state);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize summary: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // wasm entry is the TiltTower constructor, driven by the hosting page
}
