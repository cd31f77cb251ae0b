//! Sprite loading.
//!
//! Every image is optional.  A file that is missing or cannot be decoded is
//! replaced by a solid-colour placeholder of the entity's size, so hitboxes
//! and gameplay are unaffected.

use std::collections::HashMap;
use std::path::Path;

use image::{ImageResult, Rgba, RgbaImage};
use log::{info, warn};

use crate::entities::SpriteKey;

// ── Fallback palette ──────────────────────────────────────────────────────────

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);

/// File name looked up in the asset directory for each sprite.
pub fn file_name(key: SpriteKey) -> &'static str {
    match key {
        SpriteKey::Background => "background.png",
        SpriteKey::Foreground => "foreground.png",
        SpriteKey::PlayerWalk1 => "right1.png",
        SpriteKey::PlayerWalk2 => "right2.png",
        SpriteKey::PlayerStanding => "standing.png",
        SpriteKey::PlayerAttack => "attack.png",
        SpriteKey::Coin => "coin.png",
        SpriteKey::EnemyRun1 => "enemy_run1.png",
        SpriteKey::EnemyRun2 => "enemy_run2.png",
        SpriteKey::EnemyAttack1 => "enemy_attack1.png",
        SpriteKey::EnemyAttack2 => "enemy_attack2.png",
    }
}

/// Size and colour of the stand-in used when a sprite's file is unavailable.
pub fn placeholder_style(key: SpriteKey) -> (u32, u32, Rgba<u8>) {
    let (w, h) = key.logical_size();
    let color = match key {
        SpriteKey::Background => WHITE,
        SpriteKey::Foreground => BLACK,
        SpriteKey::PlayerWalk1 | SpriteKey::PlayerWalk2 => BLUE,
        SpriteKey::PlayerStanding => GREEN,
        SpriteKey::PlayerAttack => RED,
        SpriteKey::Coin => YELLOW,
        SpriteKey::EnemyRun1 | SpriteKey::EnemyRun2 => RED,
        SpriteKey::EnemyAttack1 | SpriteKey::EnemyAttack2 => BLUE,
    };
    (w as u32, h as u32, color)
}

pub fn placeholder(key: SpriteKey) -> RgbaImage {
    let (w, h, color) = placeholder_style(key);
    RgbaImage::from_pixel(w, h, color)
}

/// Decode an image file into RGBA.  Scaling to the entity size happens at
/// draw time.
pub fn load_sprite(path: &Path) -> ImageResult<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

// ── Sprite table ──────────────────────────────────────────────────────────────

pub struct Assets {
    sprites: HashMap<SpriteKey, RgbaImage>,
    fallbacks: Vec<SpriteKey>,
}

impl Assets {
    /// Load every sprite from `dir`, substituting placeholders as needed.
    pub fn load(dir: &Path) -> Self {
        let mut sprites = HashMap::new();
        let mut fallbacks = Vec::new();

        for key in SpriteKey::ALL {
            let path = dir.join(file_name(key));
            let image = match load_sprite(&path) {
                Ok(image) => image,
                Err(err) => {
                    warn!("'{}' unavailable ({}); using fallback colour", path.display(), err);
                    fallbacks.push(key);
                    placeholder(key)
                }
            };
            sprites.insert(key, image);
        }

        info!(
            "loaded {} of {} sprites from {}",
            SpriteKey::ALL.len() - fallbacks.len(),
            SpriteKey::ALL.len(),
            dir.display()
        );
        Assets { sprites, fallbacks }
    }

    /// A table made entirely of placeholders.
    pub fn placeholders() -> Self {
        Assets {
            sprites: SpriteKey::ALL.iter().map(|&k| (k, placeholder(k))).collect(),
            fallbacks: SpriteKey::ALL.to_vec(),
        }
    }

    pub fn get(&self, key: SpriteKey) -> &RgbaImage {
        &self.sprites[&key]
    }

    pub fn is_placeholder(&self, key: SpriteKey) -> bool {
        self.fallbacks.contains(&key)
    }
}
