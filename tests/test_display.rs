use side_scroller::assets::{file_name, Assets};
use side_scroller::compute::init_session;
use side_scroller::display::*;
use side_scroller::entities::*;

use image::{Rgba, RgbaImage};

const RED: Rgb = [255, 0, 0];
const GREEN: Rgb = [0, 255, 0];
const BLACK: Rgb = [0, 0, 0];

/// 80 columns × 30 rows → 80×60 pixels, i.e. one pixel per 10 logical units.
fn make_renderer() -> Renderer {
    Renderer::new(Assets::placeholders(), 80, 30)
}

fn rendered(renderer: &mut Renderer, session: &Session) -> String {
    let mut out: Vec<u8> = Vec::new();
    renderer.render(&mut out, session).unwrap();
    String::from_utf8_lossy(&out).into_owned()
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[test]
fn canvas_has_two_pixels_per_row() {
    let canvas = Canvas::new(80, 30);
    assert_eq!(canvas.width(), 80);
    assert_eq!(canvas.height(), 60);
}

#[test]
fn fill_rect_clips_to_the_canvas() {
    let mut canvas = Canvas::new(80, 30);
    canvas.fill_rect(Rect::new(-100.0, -100.0, 200.0, 200.0), RED);
    assert_eq!(canvas.pixel(0, 0), RED);
    assert_eq!(canvas.pixel(9, 9), RED);
    assert_eq!(canvas.pixel(10, 10), BLACK);

    canvas.fill_rect(Rect::new(790.0, 590.0, 500.0, 500.0), GREEN);
    assert_eq!(canvas.pixel(79, 59), GREEN);
}

#[test]
fn blit_stretches_and_mirrors() {
    let mut image = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
    image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    let full = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);

    let mut canvas = Canvas::new(80, 30);
    canvas.blit(&image, full, false);
    assert_eq!(canvas.pixel(0, 30), RED);
    assert_eq!(canvas.pixel(79, 30), GREEN);

    canvas.blit(&image, full, true);
    assert_eq!(canvas.pixel(0, 30), GREEN);
    assert_eq!(canvas.pixel(79, 30), RED);
}

#[test]
fn transparent_pixels_leave_the_canvas_alone() {
    let mut canvas = Canvas::new(80, 30);
    canvas.clear(GREEN);
    let clear = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 0]));
    canvas.blit(&clear, Rect::new(0.0, 0.0, 400.0, 300.0), false);
    assert_eq!(canvas.pixel(5, 5), GREEN);
}

// ── Scene composition ─────────────────────────────────────────────────────────

#[test]
fn placeholder_scene_is_fully_drawn() {
    let mut renderer = make_renderer();
    renderer.draw(&init_session());
    let canvas = renderer.canvas();

    // Opaque black foreground placeholder covers the white background.
    assert_eq!(canvas.pixel(40, 2), BLACK);
    // Standing player (green) at logical (75, 505).
    assert_eq!(canvas.pixel(7, 50), GREEN);
    // Running enemy (red) at logical (705, 485).
    assert_eq!(canvas.pixel(70, 48), RED);
    // Full health bars, 20 units above each entity's top edge.
    assert_eq!(canvas.pixel(7, 41), GREEN);
    assert_eq!(canvas.pixel(70, 36), GREEN);
}

#[test]
fn health_bar_shows_lost_health_in_red() {
    let mut session = init_session();
    session.player.health = 50;
    let mut renderer = make_renderer();
    renderer.draw(&session);
    let canvas = renderer.canvas();
    // Bar spans logical x 25..125; the green half ends at 75.
    assert_eq!(canvas.pixel(3, 41), GREEN);
    assert_eq!(canvas.pixel(10, 41), RED);
}

#[test]
fn coins_are_drawn_yellow() {
    let mut session = init_session();
    session.coins.push(Coin::dropped_at(400.0, 300.0));
    let mut renderer = make_renderer();
    renderer.draw(&session);
    assert_eq!(renderer.canvas().pixel(40, 30), [255, 255, 0]);
}

#[test]
fn resize_replaces_the_canvas() {
    let mut renderer = make_renderer();
    renderer.resize(120, 40);
    assert_eq!(renderer.canvas().width(), 120);
    assert_eq!(renderer.canvas().height(), 80);
}

#[test]
fn resize_rescales_the_scene() {
    let mut renderer = make_renderer();
    renderer.resize(160, 60);
    renderer.draw(&init_session());
    let canvas = renderer.canvas();
    // One pixel per 5 logical units: player spans 0..30, enemy 120..160.
    assert_eq!(canvas.pixel(15, 100), GREEN);
    assert_eq!(canvas.pixel(28, 100), GREEN);
    assert_eq!(canvas.pixel(140, 100), RED);
    assert_eq!(canvas.pixel(122, 100), RED);
}

#[test]
fn player_sprite_is_mirrored_when_facing_left() {
    let dir = tempfile::tempdir().unwrap();
    let mut standing = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
    standing.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    standing
        .save(dir.path().join(file_name(SpriteKey::PlayerStanding)))
        .unwrap();
    let mut renderer = Renderer::new(Assets::load(dir.path()), 80, 30);

    let mut session = init_session();
    renderer.draw(&session);
    assert_eq!(renderer.canvas().pixel(2, 50), RED);
    assert_eq!(renderer.canvas().pixel(12, 50), GREEN);

    session.player.facing = Facing::Left;
    renderer.draw(&session);
    assert_eq!(renderer.canvas().pixel(2, 50), GREEN);
    assert_eq!(renderer.canvas().pixel(12, 50), RED);
}

// ── Terminal output ───────────────────────────────────────────────────────────

#[test]
fn frame_output_contains_score_and_blocks() {
    let mut renderer = make_renderer();
    let mut session = init_session();
    session.player.score = 30;
    let text = rendered(&mut renderer, &session);
    assert!(text.contains("Score: 30"));
    assert!(text.contains('▀'));
}

#[test]
fn game_over_screen_names_the_outcome() {
    let mut renderer = make_renderer();
    let mut session = init_session();
    session.status = GameStatus::Lost;
    let mut out: Vec<u8> = Vec::new();
    renderer.render_game_over(&mut out, &session).unwrap();
    let text = String::from_utf8_lossy(&out).into_owned();
    assert!(text.contains("Game Over"));
    assert!(text.contains("You lose"));
    assert!(text.contains("Final Score: 0"));

    session.status = GameStatus::Won;
    session.player.score = 100;
    let mut out: Vec<u8> = Vec::new();
    renderer.render_game_over(&mut out, &session).unwrap();
    let text = String::from_utf8_lossy(&out).into_owned();
    assert!(text.contains("You win!"));
    assert!(text.contains("Final Score: 100"));
}
