//! All game entity types — pure data, no frame logic.
//!
//! Coordinates are logical units on an 800×600 playfield with the origin in
//! the top-left corner and y growing downward.

// ── Tuning constants ──────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const FPS: u64 = 60;

/// Bottom edge of every grounded entity.
pub const GROUND_Y: f32 = SCREEN_HEIGHT - 20.0;

pub const PLAYER_SIZE: f32 = 150.0;
pub const PLAYER_MAX_HEALTH: u32 = 100;
pub const PLAYER_SPEED: f32 = 5.0;
pub const JUMP_VELOCITY: f32 = -10.0;
pub const GRAVITY: f32 = 0.5;
pub const MAX_FALL_SPEED: f32 = 10.0;
/// Horizontal band kept free on both sides so the player stays near the centre.
pub const SCREEN_MARGIN: f32 = 200.0;
pub const ATTACK_COOLDOWN: u32 = 20;
pub const ATTACK_DURATION: u32 = 10;
pub const ATTACK_DAMAGE: u32 = 50;
pub const CONTACT_DAMAGE: u32 = 10;
/// 0.5 s at 60 FPS.
pub const DAMAGE_COOLDOWN: u32 = 30;

pub const ENEMY_SIZE: f32 = 200.0;
pub const ENEMY_MAX_HEALTH: u32 = 200;
pub const ENEMY_SPEED: f32 = 2.0;
pub const ENEMY_ATTACK_RANGE: f32 = 150.0;
pub const ENEMY_ANIM_INTERVAL: u32 = 10;
pub const ENEMY_SPAWN_MIN_X: i32 = 200;
pub const ENEMY_SPAWN_MAX_X: i32 = SCREEN_WIDTH as i32 - 200;

pub const COIN_SIZE: f32 = 40.0;
pub const SCORE_PER_KILL: u32 = 10;
pub const SCORE_PER_COIN: u32 = 10;
pub const WIN_SCORE: u32 = 100;

pub const BACKGROUND_SCROLL_FACTOR: f32 = 0.3;
pub const FOREGROUND_SCROLL_FACTOR: f32 = 0.5;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding rectangle, used both for drawing and for collisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// A `w`×`h` rectangle whose bottom edge sits on the ground line.
    pub fn on_ground(x: f32, w: f32, h: f32) -> Self {
        Rect::new(x, GROUND_Y - h, w, h)
    }

    /// A `w`×`h` rectangle centred on (`cx`, `cy`).
    pub fn centered_at(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap test: rectangles that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Every image the game can draw.  The asset table maps each key to either a
/// loaded file or a placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Background,
    Foreground,
    PlayerWalk1,
    PlayerWalk2,
    PlayerStanding,
    PlayerAttack,
    Coin,
    EnemyRun1,
    EnemyRun2,
    EnemyAttack1,
    EnemyAttack2,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 11] = [
        SpriteKey::Background,
        SpriteKey::Foreground,
        SpriteKey::PlayerWalk1,
        SpriteKey::PlayerWalk2,
        SpriteKey::PlayerStanding,
        SpriteKey::PlayerAttack,
        SpriteKey::Coin,
        SpriteKey::EnemyRun1,
        SpriteKey::EnemyRun2,
        SpriteKey::EnemyAttack1,
        SpriteKey::EnemyAttack2,
    ];

    /// Logical width and height the sprite is drawn at.
    pub fn logical_size(&self) -> (f32, f32) {
        match self {
            SpriteKey::Background | SpriteKey::Foreground => (SCREEN_WIDTH, SCREEN_HEIGHT),
            SpriteKey::PlayerWalk1
            | SpriteKey::PlayerWalk2
            | SpriteKey::PlayerStanding
            | SpriteKey::PlayerAttack => (PLAYER_SIZE, PLAYER_SIZE),
            SpriteKey::Coin => (COIN_SIZE, COIN_SIZE),
            SpriteKey::EnemyRun1
            | SpriteKey::EnemyRun2
            | SpriteKey::EnemyAttack1
            | SpriteKey::EnemyAttack2 => (ENEMY_SIZE, ENEMY_SIZE),
        }
    }
}

/// Anything the renderer can place on screen.
pub trait Drawable {
    fn rect(&self) -> Rect;
    fn sprite(&self) -> SpriteKey;
    /// Draw the sprite mirrored horizontally.
    fn mirrored(&self) -> bool {
        false
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Facing {
    Left,
    Right,
}

/// One-way latch on backward movement.  A session starts `BackwardLocked`;
/// the first step to the right unlocks it for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovementGate {
    BackwardLocked,
    Unlocked,
}

impl MovementGate {
    /// The only transition.  Idempotent once unlocked.
    pub fn unlock(&mut self) {
        *self = MovementGate::Unlocked;
    }

    pub fn allows_backward(&self) -> bool {
        *self == MovementGate::Unlocked
    }
}

/// Which of the player's images to show this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerPose {
    Standing,
    Walking(usize),
    Attacking,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub x_velocity: f32,
    pub y_velocity: f32,
    pub facing: Facing,
    pub health: u32,
    pub score: u32,
    pub attacking: bool,
    pub attack_cooldown: u32,
    /// Frames of the current attack still to resolve.
    pub attack_frames_left: u32,
    pub jumping: bool,
    pub damage_cooldown: u32,
    /// Index into the two-frame walk cycle.
    pub walk_frame: usize,
    pub movement: MovementGate,
}

impl Player {
    pub fn is_grounded(&self) -> bool {
        self.rect.bottom() >= GROUND_Y
    }

    /// Attacking beats moving beats standing.
    pub fn pose(&self) -> PlayerPose {
        if self.attacking {
            PlayerPose::Attacking
        } else if self.x_velocity != 0.0 {
            PlayerPose::Walking(self.walk_frame)
        } else {
            PlayerPose::Standing
        }
    }
}

impl Drawable for Player {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        match self.pose() {
            PlayerPose::Attacking => SpriteKey::PlayerAttack,
            PlayerPose::Walking(0) => SpriteKey::PlayerWalk1,
            PlayerPose::Walking(_) => SpriteKey::PlayerWalk2,
            PlayerPose::Standing => SpriteKey::PlayerStanding,
        }
    }

    fn mirrored(&self) -> bool {
        self.facing == Facing::Left
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyState {
    Run,
    Attack,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    pub x_velocity: f32,
    pub health: u32,
    pub state: EnemyState,
    pub facing_left: bool,
    pub anim_frame: usize,
    pub anim_timer: u32,
}

impl Enemy {
    /// A fresh enemy standing on the ground at horizontal position `x`.
    pub fn spawn(x: f32) -> Self {
        Enemy {
            rect: Rect::on_ground(x, ENEMY_SIZE, ENEMY_SIZE),
            x_velocity: 0.0,
            health: ENEMY_MAX_HEALTH,
            state: EnemyState::Run,
            facing_left: true,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

impl Drawable for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        match (self.state, self.anim_frame) {
            (EnemyState::Run, 0) => SpriteKey::EnemyRun1,
            (EnemyState::Run, _) => SpriteKey::EnemyRun2,
            (EnemyState::Attack, 0) => SpriteKey::EnemyAttack1,
            (EnemyState::Attack, _) => SpriteKey::EnemyAttack2,
        }
    }
}

// ── Coin ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Coin {
    pub rect: Rect,
}

impl Coin {
    /// A coin centred on (`cx`, `cy`).
    pub fn dropped_at(cx: f32, cy: f32) -> Self {
        Coin {
            rect: Rect::centered_at(cx, cy, COIN_SIZE, COIN_SIZE),
        }
    }
}

impl Drawable for Coin {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Coin
    }
}

// ── Scrolling layers ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerKind {
    Background,
    Foreground,
}

/// A screen-wide image tiled twice and shifted by `offset`.
#[derive(Clone, Debug)]
pub struct ScrollLayer {
    pub kind: LayerKind,
    /// Always within (−SCREEN_WIDTH, 0] after an update.
    pub offset: f32,
    /// Parallax multiplier applied to the player's horizontal velocity.
    pub factor: f32,
}

impl ScrollLayer {
    pub fn new(kind: LayerKind) -> Self {
        let factor = match kind {
            LayerKind::Background => BACKGROUND_SCROLL_FACTOR,
            LayerKind::Foreground => FOREGROUND_SCROLL_FACTOR,
        };
        ScrollLayer { kind, offset: 0.0, factor }
    }

    pub fn sprite(&self) -> SpriteKey {
        match self.kind {
            LayerKind::Background => SpriteKey::Background,
            LayerKind::Foreground => SpriteKey::Foreground,
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Held state of the four logical controls, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        *self != GameStatus::Playing
    }
}

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Session {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub background: ScrollLayer,
    pub foreground: ScrollLayer,
    pub status: GameStatus,
    pub frame: u64,
}
