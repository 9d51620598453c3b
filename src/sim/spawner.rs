//! Block factory
//!
//! Turns the difficulty curve plus one resolved content item into a
//! `BlockConfig`. Total: every input resolves to a valid config, worst case
//! a default-labeled keyword block.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::content::ImageAsset;
use crate::tuning::Tuning;

/// Block content kinds. Shapes collapsed to rectangles-only; the kind just
/// selects what the face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    Image,
    #[default]
    Keyword,
}

/// Immutable spawn-time spec for one block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    pub kind: BlockKind,
    pub width: f32,
    pub height: f32,
    /// Render handle for image blocks
    pub image: Option<String>,
    /// Display text for keyword blocks
    pub label: Option<String>,
}

/// Difficulty values interpolated for the current round progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySnapshot {
    pub min_width: f32,
    pub max_width: f32,
    pub tall_chance: f32,
    pub oscillation_speed: f32,
}

impl DifficultySnapshot {
    /// Sample every ramp at `progress` (0..1)
    pub fn at(tuning: &Tuning, progress: f32) -> Self {
        Self {
            min_width: tuning.block.min_width.at(progress),
            max_width: tuning.block.max_width.at(progress),
            tall_chance: tuning.block.tall_chance.at(progress),
            oscillation_speed: tuning.movement.oscillation_speed.at(progress),
        }
    }
}

/// Label used when the keyword pool is dry
const FALLBACK_LABEL: &str = "BLOCK";

/// Per-character width estimate for label fitting (px)
const CHAR_WIDTH_LATIN: f32 = 8.0;
/// Non-Latin scripts render wider glyphs
const CHAR_WIDTH_WIDE: f32 = 12.0;
/// Horizontal padding around the label (px)
const LABEL_PADDING: f32 = 16.0;

/// Image blocks below this edge length are unusable; fall back to keyword
const MIN_USABLE_SIZE: f32 = 24.0;
/// Image block height cap (px)
const MAX_IMAGE_HEIGHT: f32 = 60.0;

/// Pick which kind of block to spawn next
///
/// Availability wins: a dry pool forces the other kind. With both pools
/// live, keyword probability ramps up over the round (images early for a
/// stable base, keywords late for instability).
pub fn select_block_kind(
    rng: &mut Pcg32,
    progress: f32,
    images_remaining: usize,
    keywords_remaining: usize,
) -> BlockKind {
    match (images_remaining > 0, keywords_remaining > 0) {
        (false, _) => BlockKind::Keyword,
        (true, false) => BlockKind::Image,
        (true, true) => {
            let keyword_chance = 0.2 + 0.4 * progress.clamp(0.0, 1.0);
            if rng.random::<f32>() < keyword_chance {
                BlockKind::Keyword
            } else {
                BlockKind::Image
            }
        }
    }
}

/// Build the spawn config for one block
///
/// Image path preserves the source aspect ratio and falls back to a keyword
/// block when the image is missing, unusable, or would come out too small.
pub fn generate_block_config(
    rng: &mut Pcg32,
    kind: BlockKind,
    difficulty: &DifficultySnapshot,
    image: Option<&ImageAsset>,
    keyword: Option<&str>,
) -> BlockConfig {
    match kind {
        BlockKind::Image => match image {
            Some(asset) if asset.usable && asset.width > 0.0 => {
                if let Some(config) = image_config(rng, asset) {
                    config
                } else {
                    keyword_config(rng, difficulty, keyword)
                }
            }
            _ => keyword_config(rng, difficulty, keyword),
        },
        BlockKind::Keyword => keyword_config(rng, difficulty, keyword),
    }
}

/// Tri-modal width bands for image blocks (px): small fillers, medium
/// bread-and-butter, large foundations
const IMAGE_BANDS: [(f32, f32); 3] = [(40.0, 65.0), (65.0, 95.0), (95.0, 130.0)];

fn image_config(rng: &mut Pcg32, asset: &ImageAsset) -> Option<BlockConfig> {
    let band = match rng.random_range(0..10u32) {
        0..=2 => IMAGE_BANDS[0],
        3..=7 => IMAGE_BANDS[1],
        _ => IMAGE_BANDS[2],
    };
    let mut width = rng.random_range(band.0..band.1);
    let mut height = width * asset.aspect();

    // Cap height, rescaling width to keep the aspect ratio
    if height > MAX_IMAGE_HEIGHT {
        width *= MAX_IMAGE_HEIGHT / height;
        height = MAX_IMAGE_HEIGHT;
    }

    if width < MIN_USABLE_SIZE || height < MIN_USABLE_SIZE {
        return None;
    }

    Some(BlockConfig {
        kind: BlockKind::Image,
        width,
        height,
        image: Some(asset.handle.clone()),
        label: None,
    })
}

fn keyword_config(
    rng: &mut Pcg32,
    difficulty: &DifficultySnapshot,
    keyword: Option<&str>,
) -> BlockConfig {
    let text = match keyword {
        Some(k) if !k.is_empty() => k,
        _ => FALLBACK_LABEL,
    };

    let char_width = if text.chars().any(|c| !c.is_ascii()) {
        CHAR_WIDTH_WIDE
    } else {
        CHAR_WIDTH_LATIN
    };
    let min_width_for_text = text.chars().count() as f32 * char_width + LABEL_PADDING;

    let is_tall = rng.random::<f32>() < difficulty.tall_chance;
    let (width, height) = if is_tall {
        // Tall tower piece: narrow and unstable
        let width = (40.0 + rng.random::<f32>() * 30.0).max(min_width_for_text);
        let height = 60.0 + rng.random::<f32>() * 40.0;
        (width, height)
    } else {
        // Flat plank: stable base material
        let span = (difficulty.max_width - difficulty.min_width).max(0.0);
        let width = (difficulty.min_width + rng.random::<f32>() * span).max(min_width_for_text);
        let height = 22.0 + rng.random::<f32>() * 18.0;
        (width, height)
    };

    BlockConfig {
        kind: BlockKind::Keyword,
        width,
        height,
        image: None,
        label: Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DifficultyMode;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    fn snapshot() -> DifficultySnapshot {
        DifficultySnapshot::at(&Tuning::preset(DifficultyMode::Easy), 0.0)
    }

    #[test]
    fn test_snapshot_interpolates() {
        let tuning = Tuning::preset(DifficultyMode::Easy);
        let start = DifficultySnapshot::at(&tuning, 0.0);
        let end = DifficultySnapshot::at(&tuning, 1.0);
        assert!(end.min_width < start.min_width);
        assert!(end.oscillation_speed > start.oscillation_speed);
        assert!(end.tall_chance > start.tall_chance);
    }

    #[test]
    fn test_kind_forced_by_availability() {
        let mut r = rng(1);
        assert_eq!(select_block_kind(&mut r, 0.5, 0, 3), BlockKind::Keyword);
        assert_eq!(select_block_kind(&mut r, 0.5, 3, 0), BlockKind::Image);
        // Both dry still yields a valid (keyword fallback) kind
        assert_eq!(select_block_kind(&mut r, 0.5, 0, 0), BlockKind::Keyword);
    }

    #[test]
    fn test_image_preserves_aspect() {
        let asset = ImageAsset::new("logo.png", 200.0, 100.0);
        let mut r = rng(2);
        let config = generate_block_config(
            &mut r,
            BlockKind::Image,
            &snapshot(),
            Some(&asset),
            None,
        );
        assert_eq!(config.kind, BlockKind::Image);
        let aspect = config.height / config.width;
        assert!((aspect - 0.5).abs() < 1e-3);
        assert!(config.height <= MAX_IMAGE_HEIGHT + 1e-3);
        assert_eq!(config.image.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_missing_image_falls_back_to_keyword() {
        let mut r = rng(3);
        let config =
            generate_block_config(&mut r, BlockKind::Image, &snapshot(), None, Some("scrum"));
        assert_eq!(config.kind, BlockKind::Keyword);
        assert_eq!(config.label.as_deref(), Some("scrum"));
    }

    #[test]
    fn test_broken_image_falls_back() {
        let mut broken = ImageAsset::new("broken.png", 120.0, 80.0);
        broken.usable = false;
        let mut r = rng(4);
        let config =
            generate_block_config(&mut r, BlockKind::Image, &snapshot(), Some(&broken), None);
        assert_eq!(config.kind, BlockKind::Keyword);
        assert_eq!(config.label.as_deref(), Some(FALLBACK_LABEL));
    }

    #[test]
    fn test_extreme_aspect_falls_back() {
        // A 20:1 banner scales under the usable threshold at any band width
        let banner = ImageAsset::new("banner.png", 2000.0, 100.0);
        let mut r = rng(5);
        for _ in 0..50 {
            let config = generate_block_config(
                &mut r,
                BlockKind::Image,
                &snapshot(),
                Some(&banner),
                Some("fallback"),
            );
            if config.kind == BlockKind::Image {
                // Whenever an image survives, it must still be usable
                assert!(config.width >= MIN_USABLE_SIZE);
                assert!(config.height >= MIN_USABLE_SIZE);
            }
        }
    }

    #[test]
    fn test_keyword_width_fits_label() {
        let mut r = rng(6);
        let long_label = "retrospective";
        for _ in 0..50 {
            let config = generate_block_config(
                &mut r,
                BlockKind::Keyword,
                &snapshot(),
                None,
                Some(long_label),
            );
            let min = long_label.chars().count() as f32 * CHAR_WIDTH_LATIN + LABEL_PADDING;
            assert!(config.width >= min);
            assert!(config.height > 0.0);
        }
    }

    #[test]
    fn test_wide_script_needs_more_width() {
        let mut r = rng(7);
        let config = generate_block_config(
            &mut r,
            BlockKind::Keyword,
            &snapshot(),
            None,
            Some("仕様変更"),
        );
        let min = 4.0 * CHAR_WIDTH_WIDE + LABEL_PADDING;
        assert!(config.width >= min);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let snapshot = snapshot();
        let mut a = rng(42);
        let mut b = rng(42);
        for _ in 0..20 {
            let ca = generate_block_config(&mut a, BlockKind::Keyword, &snapshot, None, Some("x"));
            let cb = generate_block_config(&mut b, BlockKind::Keyword, &snapshot, None, Some("x"));
            assert_eq!(ca.width, cb.width);
            assert_eq!(ca.height, cb.height);
        }
    }
}
