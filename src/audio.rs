//! Audio cues using the Web Audio API
//!
//! Procedurally generated tones - no external files needed. The game loop
//! only emits named events; this module decides what they sound like.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::RoundEvent;

/// Named audio cues the game emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Block released
    Drop,
    /// Block touched down
    Land,
    /// Tower collapsed
    Collapse,
    /// All blocks placed
    Complete,
    /// New leaderboard entry
    HighScore,
}

/// Map a round event to its cue, if it has one
pub fn cue_for_event(event: RoundEvent) -> Option<AudioCue> {
    match event {
        RoundEvent::BlockDropped => Some(AudioCue::Drop),
        RoundEvent::BlockLanded => Some(AudioCue::Land),
        RoundEvent::TowerCollapsed => Some(AudioCue::Collapse),
        RoundEvent::RoundComplete => Some(AudioCue::Complete),
        // The result screen handles the timeout sting, not the sim
        RoundEvent::TimeExpired => None,
    }
}

/// Audio cue player
///
/// Degrades to silence when no AudioContext is available (insecure context,
/// native build, autoplay restrictions before the first gesture).
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            AudioCue::Drop => self.play_drop(ctx, vol),
            AudioCue::Land => self.play_land(ctx, vol),
            AudioCue::Collapse => self.play_collapse(ctx, vol),
            AudioCue::Complete => self.play_complete(ctx, vol),
            AudioCue::HighScore => self.play_high_score(ctx, vol),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _cue: AudioCue) {
        // No-op for native
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Drop - quick falling whistle
    #[cfg(target_arch = "wasm32")]
    fn play_drop(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Land - solid low thump
    #[cfg(target_arch = "wasm32")]
    fn play_land(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Collapse - descending rumble
    #[cfg(target_arch = "wasm32")]
    fn play_collapse(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }

        // Low square underneath for weight
        if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }
    }

    /// Complete - rising major arpeggio
    #[cfg(target_arch = "wasm32")]
    fn play_complete(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.25f32, 659.25, 783.99].iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                continue;
            };
            let start = t + i as f64 * 0.12;
            gain.gain().set_value_at_time(vol * 0.3, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.3).ok();
        }
    }

    /// High score - sparkly double ping
    #[cfg(target_arch = "wasm32")]
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [1046.5f32, 1318.5].iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let start = t + i as f64 * 0.15;
            gain.gain().set_value_at_time(vol * 0.25, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.25).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cue_mapping() {
        assert_eq!(cue_for_event(RoundEvent::BlockDropped), Some(AudioCue::Drop));
        assert_eq!(cue_for_event(RoundEvent::BlockLanded), Some(AudioCue::Land));
        assert_eq!(
            cue_for_event(RoundEvent::TowerCollapsed),
            Some(AudioCue::Collapse)
        );
        assert_eq!(
            cue_for_event(RoundEvent::RoundComplete),
            Some(AudioCue::Complete)
        );
        assert_eq!(cue_for_event(RoundEvent::TimeExpired), None);
    }

    #[test]
    fn test_volume_clamps() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
    }
}
