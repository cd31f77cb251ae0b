//! Rendering layer — all terminal I/O lives here.
//!
//! The 800×600 logical playfield is rasterised onto a `Canvas` with one
//! pixel per column and two pixels per terminal row, then emitted as
//! half-block characters (`▀`: foreground = upper pixel, background = lower
//! pixel).  No game logic is performed; this module only translates state
//! into terminal commands.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::assets::Assets;
use crate::entities::{
    Drawable, GameStatus, Rect, ScrollLayer, Session, SpriteKey, ENEMY_MAX_HEALTH,
    PLAYER_MAX_HEALTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};

// ── Colour palette ────────────────────────────────────────────────────────────

pub type Rgb = [u8; 3];

const C_CLEAR: Rgb = [0, 0, 0];
const C_BAR_EMPTY: Rgb = [255, 0, 0];
const C_BAR_FULL: Rgb = [0, 255, 0];
const C_HINT: Color = Color::DarkGrey;

const HEALTH_BAR_WIDTH: f32 = 100.0;
const HEALTH_BAR_HEIGHT: f32 = 10.0;
/// Gap between the top of an entity and its health bar.
const HEALTH_BAR_LIFT: f32 = 20.0;

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
    }
}

fn opaque(rgb: Rgb) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Pixel grid the logical playfield is scaled onto.
pub struct Canvas {
    cols: u16,
    rows: u16,
    image: RgbaImage,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Canvas {
            cols,
            rows,
            image: RgbaImage::from_pixel(cols as u32, rows as u32 * 2, opaque(C_CLEAR)),
        }
    }

    /// Width in pixels (= terminal columns).
    pub fn width(&self) -> usize {
        self.cols as usize
    }

    /// Height in pixels (= terminal rows × 2).
    pub fn height(&self) -> usize {
        self.rows as usize * 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let p = self.image.get_pixel(x as u32, y as u32).0;
        [p[0], p[1], p[2]]
    }

    pub fn clear(&mut self, color: Rgb) {
        let color = opaque(color);
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    fn scale(&self) -> (f32, f32) {
        (
            self.width() as f32 / SCREEN_WIDTH,
            self.height() as f32 / SCREEN_HEIGHT,
        )
    }

    /// Pixel position of a logical point.
    pub fn to_pixels(&self, x: f32, y: f32) -> (i64, i64) {
        let (sx, sy) = self.scale();
        ((x * sx).round() as i64, (y * sy).round() as i64)
    }

    /// Pixel size of a logical extent, never smaller than 1×1.
    pub fn pixel_size(&self, w: f32, h: f32) -> (u32, u32) {
        let (sx, sy) = self.scale();
        (
            (w * sx).round().max(1.0) as u32,
            (h * sy).round().max(1.0) as u32,
        )
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let (x, y) = self.to_pixels(rect.x, rect.y);
        let (w, h) = self.pixel_size(rect.w, rect.h);
        imageops::replace(&mut self.image, &RgbaImage::from_pixel(w, h, opaque(color)), x, y);
    }

    /// Scale `image` (nearest-neighbour) to the on-screen size of a logical area.
    pub fn fit(&self, image: &RgbaImage, w: f32, h: f32) -> RgbaImage {
        let (pw, ph) = self.pixel_size(w, h);
        imageops::resize(image, pw, ph, FilterType::Nearest)
    }

    /// Alpha-composite an already scaled sprite with its top-left at pixel (`x`, `y`).
    pub fn stamp(&mut self, sprite: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, sprite, x, y);
    }

    /// Scale, optionally mirror, and composite `image` over the logical `rect`.
    pub fn blit(&mut self, image: &RgbaImage, rect: Rect, mirrored: bool) {
        let mut sprite = self.fit(image, rect.w, rect.h);
        if mirrored {
            sprite = imageops::flip_horizontal(&sprite);
        }
        let (x, y) = self.to_pixels(rect.x, rect.y);
        self.stamp(&sprite, x, y);
    }
}

/// Every sprite pre-scaled to the canvas, plain and mirrored.
fn scale_sprites(assets: &Assets, canvas: &Canvas) -> HashMap<(SpriteKey, bool), RgbaImage> {
    let mut sprites = HashMap::new();
    for key in SpriteKey::ALL {
        let (w, h) = key.logical_size();
        let scaled = canvas.fit(assets.get(key), w, h);
        sprites.insert((key, true), imageops::flip_horizontal(&scaled));
        sprites.insert((key, false), scaled);
    }
    sprites
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Render context for one session: the sprite table, its scaled copies and
/// the canvas.
pub struct Renderer {
    assets: Assets,
    canvas: Canvas,
    sprites: HashMap<(SpriteKey, bool), RgbaImage>,
}

impl Renderer {
    pub fn new(assets: Assets, cols: u16, rows: u16) -> Self {
        let canvas = Canvas::new(cols, rows);
        let sprites = scale_sprites(&assets, &canvas);
        Renderer {
            assets,
            canvas,
            sprites,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Follow a terminal resize; sprites are rescaled once here, not per frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.canvas.cols, self.canvas.rows) {
            self.canvas = Canvas::new(cols, rows);
            self.sprites = scale_sprites(&self.assets, &self.canvas);
        }
    }

    /// Compose one frame onto the canvas: layers, entities, health bars.
    pub fn draw(&mut self, session: &Session) {
        self.canvas.clear(C_CLEAR);

        self.draw_layer(&session.background);
        self.draw_layer(&session.foreground);

        self.draw_entity(&session.player);
        for coin in &session.coins {
            self.draw_entity(coin);
        }
        for enemy in &session.enemies {
            self.draw_entity(enemy);
            self.draw_health_bar(enemy.rect, enemy.health, ENEMY_MAX_HEALTH);
        }
        self.draw_health_bar(session.player.rect, session.player.health, PLAYER_MAX_HEALTH);
    }

    fn draw_layer(&mut self, layer: &ScrollLayer) {
        let sprite = &self.sprites[&(layer.sprite(), false)];
        let (x, _) = self.canvas.to_pixels(layer.offset, 0.0);
        // Second copy butts against the first so no seam opens up.
        self.canvas.stamp(sprite, x, 0);
        self.canvas.stamp(sprite, x + sprite.width() as i64, 0);
    }

    fn draw_entity(&mut self, entity: &impl Drawable) {
        let sprite = &self.sprites[&(entity.sprite(), entity.mirrored())];
        let rect = entity.rect();
        let (x, y) = self.canvas.to_pixels(rect.x, rect.y);
        self.canvas.stamp(sprite, x, y);
    }

    fn draw_health_bar(&mut self, owner: Rect, health: u32, max: u32) {
        let ratio = (health as f32 / max as f32).clamp(0.0, 1.0);
        let x = owner.center_x() - HEALTH_BAR_WIDTH / 2.0;
        let y = owner.top() - HEALTH_BAR_LIFT;
        let bar = Rect::new(x, y, HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT);
        self.canvas.fill_rect(bar, C_BAR_EMPTY);
        let filled = (HEALTH_BAR_WIDTH * ratio).floor();
        if filled > 0.0 {
            self.canvas
                .fill_rect(Rect::new(x, y, filled, HEALTH_BAR_HEIGHT), C_BAR_FULL);
        }
    }

    /// Render one complete playing frame.
    pub fn render<W: Write>(&mut self, out: &mut W, session: &Session) -> std::io::Result<()> {
        self.draw(session);
        present(out, &self.canvas)?;
        draw_hud(out, session)?;
        draw_controls_hint(out, &self.canvas)?;

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.canvas.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }

    /// Full-screen black with a centred "Game Over" banner.
    pub fn render_game_over<W: Write>(
        &mut self,
        out: &mut W,
        session: &Session,
    ) -> std::io::Result<()> {
        self.canvas.clear(C_CLEAR);
        present(out, &self.canvas)?;
        draw_game_over(out, &self.canvas, session)?;

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.canvas.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }
}

// ── Canvas output ─────────────────────────────────────────────────────────────

fn present<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows {
        out.queue(cursor::MoveTo(0, row))?;
        // Colours are only re-sent when they change along the row.
        let mut last: Option<(Rgb, Rgb)> = None;
        for col in 0..canvas.width() {
            let top = canvas.pixel(col, row as usize * 2);
            let bottom = canvas.pixel(col, row as usize * 2 + 1);
            if last != Some((top, bottom)) {
                out.queue(style::SetForegroundColor(term_color(top)))?;
                out.queue(style::SetBackgroundColor(term_color(bottom)))?;
                last = Some((top, bottom));
            }
            out.queue(Print('▀'))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(Color::Black))?;
    out.queue(style::SetBackgroundColor(Color::White))?;
    out.queue(Print(format!("Score: {}", session.player.score)))?;
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, canvas.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(style::SetBackgroundColor(Color::Black))?;
    out.queue(Print("← → / A D : Move   SPACE : Jump   F : Attack   Q : Quit"))?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    session: &Session,
) -> std::io::Result<()> {
    let outcome = match session.status {
        GameStatus::Won => "You win!",
        GameStatus::Lost => "You lose",
        GameStatus::Playing => "",
    };
    let score_line = format!("Final Score: {}", session.player.score);
    let lines: &[(&str, Color)] = &[
        ("Game Over", Color::White),
        (outcome, Color::Yellow),
        (&score_line, Color::Yellow),
    ];

    let cx = canvas.cols / 2;
    let start_row = (canvas.rows / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetBackgroundColor(Color::Black))?;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
