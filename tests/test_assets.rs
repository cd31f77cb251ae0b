use side_scroller::assets::*;
use side_scroller::entities::SpriteKey;

use image::{Rgba, RgbaImage};

#[test]
fn empty_directory_falls_back_to_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let assets = Assets::load(dir.path());
    for key in SpriteKey::ALL {
        assert!(assets.is_placeholder(key), "{:?}", key);
        let (w, h, color) = placeholder_style(key);
        let image = assets.get(key);
        assert_eq!(image.dimensions(), (w, h));
        assert_eq!(*image.get_pixel(0, 0), color);
    }
}

#[test]
fn fallback_palette() {
    assert_eq!(placeholder_style(SpriteKey::Background), (800, 600, WHITE));
    assert_eq!(placeholder_style(SpriteKey::Foreground), (800, 600, BLACK));
    assert_eq!(placeholder_style(SpriteKey::PlayerWalk1), (150, 150, BLUE));
    assert_eq!(placeholder_style(SpriteKey::PlayerWalk2), (150, 150, BLUE));
    assert_eq!(placeholder_style(SpriteKey::PlayerStanding), (150, 150, GREEN));
    assert_eq!(placeholder_style(SpriteKey::PlayerAttack), (150, 150, RED));
    assert_eq!(placeholder_style(SpriteKey::Coin), (40, 40, YELLOW));
    assert_eq!(placeholder_style(SpriteKey::EnemyRun1), (200, 200, RED));
    assert_eq!(placeholder_style(SpriteKey::EnemyAttack2), (200, 200, BLUE));
}

#[test]
fn present_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let coin = RgbaImage::from_pixel(2, 3, Rgba([10, 20, 30, 255]));
    coin.save(dir.path().join(file_name(SpriteKey::Coin))).unwrap();

    let assets = Assets::load(dir.path());
    assert!(!assets.is_placeholder(SpriteKey::Coin));
    assert_eq!(assets.get(SpriteKey::Coin).dimensions(), (2, 3));
    assert_eq!(*assets.get(SpriteKey::Coin).get_pixel(1, 1), Rgba([10, 20, 30, 255]));
    // Everything else still falls back independently.
    assert!(assets.is_placeholder(SpriteKey::PlayerStanding));
}

#[test]
fn unreadable_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(file_name(SpriteKey::PlayerStanding)), b"not a png").unwrap();

    assert!(load_sprite(&dir.path().join("standing.png")).is_err());
    let assets = Assets::load(dir.path());
    assert!(assets.is_placeholder(SpriteKey::PlayerStanding));
    assert_eq!(*assets.get(SpriteKey::PlayerStanding).get_pixel(0, 0), GREEN);
}

#[test]
fn file_names_are_distinct() {
    let mut names: Vec<&str> = SpriteKey::ALL.iter().map(|&k| file_name(k)).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), SpriteKey::ALL.len());
}
