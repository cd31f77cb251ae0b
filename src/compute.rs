//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current state
//! (and, where needed, an RNG handle) and returns a brand-new value.  Side
//! effects are limited to the injected RNG and `debug!` logging.

use log::debug;
use rand::Rng;

use crate::entities::*;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial session: the player on the left edge, one enemy on the
/// right, no coins.
pub fn init_session() -> Session {
    Session {
        player: Player {
            rect: Rect::on_ground(0.0, PLAYER_SIZE, PLAYER_SIZE),
            x_velocity: 0.0,
            y_velocity: 0.0,
            facing: Facing::Right,
            health: PLAYER_MAX_HEALTH,
            score: 0,
            attacking: false,
            attack_cooldown: 0,
            attack_frames_left: 0,
            jumping: false,
            damage_cooldown: 0,
            walk_frame: 0,
            movement: MovementGate::BackwardLocked,
        },
        enemies: vec![Enemy::spawn(SCREEN_WIDTH - 200.0)],
        coins: Vec::new(),
        background: ScrollLayer::new(LayerKind::Background),
        foreground: ScrollLayer::new(LayerKind::Foreground),
        status: GameStatus::Playing,
        frame: 0,
    }
}

/// A replacement enemy at a random ground position.
pub fn spawn_enemy(rng: &mut impl Rng) -> Enemy {
    let x = rng.gen_range(ENEMY_SPAWN_MIN_X..=ENEMY_SPAWN_MAX_X);
    Enemy::spawn(x as f32)
}

// ── Scrolling layers ─────────────────────────────────────────────────────────

/// Fold any offset into (−SCREEN_WIDTH, 0].
pub fn wrap_offset(offset: f32) -> f32 {
    let r = offset.rem_euclid(SCREEN_WIDTH);
    if r == 0.0 {
        0.0
    } else {
        r - SCREEN_WIDTH
    }
}

/// Shift a layer opposite to the player's motion, scaled by its parallax factor.
pub fn scroll_layer(layer: &ScrollLayer, player_velocity: f32) -> ScrollLayer {
    let shifted = layer.offset - player_velocity * layer.factor;
    ScrollLayer {
        offset: wrap_offset(shifted),
        ..layer.clone()
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

/// Chase the player until within attack range, then stand and attack.
pub fn update_enemy(enemy: &Enemy, player: &Player) -> Enemy {
    let mut next = enemy.clone();
    let dx = player.rect.center_x() - enemy.rect.center_x();

    if dx.abs() > ENEMY_ATTACK_RANGE {
        next.x_velocity = ENEMY_SPEED * dx.signum();
        next.facing_left = dx < 0.0;
        next.state = EnemyState::Run;
    } else {
        next.x_velocity = 0.0;
        next.state = EnemyState::Attack;
    }
    next.rect.x += next.x_velocity;

    next.anim_timer += 1;
    if next.anim_timer >= ENEMY_ANIM_INTERVAL {
        next.anim_timer = 0;
        next.anim_frame = (next.anim_frame + 1) % 2;
    }
    next
}

// ── Player ───────────────────────────────────────────────────────────────────

fn steer(player: &mut Player, input: &Input) {
    player.x_velocity = if input.left {
        if player.movement.allows_backward() && player.rect.left() > 0.0 {
            player.facing = Facing::Left;
            -PLAYER_SPEED
        } else {
            0.0
        }
    } else if input.right {
        player.facing = Facing::Right;
        player.movement.unlock();
        PLAYER_SPEED
    } else {
        0.0
    };

    // Keep the player inside the central band.
    let cx = player.rect.center_x();
    if (cx < SCREEN_MARGIN && player.x_velocity < 0.0)
        || (cx > SCREEN_WIDTH - SCREEN_MARGIN && player.x_velocity > 0.0)
    {
        player.x_velocity = 0.0;
    }
    player.rect.x += player.x_velocity;
}

fn fall(player: &mut Player, input: &Input) {
    if input.jump && !player.jumping && player.is_grounded() {
        player.y_velocity = JUMP_VELOCITY;
        player.jumping = true;
    }

    player.y_velocity = (player.y_velocity + GRAVITY).min(MAX_FALL_SPEED);
    player.rect.y += player.y_velocity;

    if player.rect.bottom() >= GROUND_Y {
        player.rect.set_bottom(GROUND_Y);
        player.y_velocity = 0.0;
        player.jumping = false;
    }
    if player.rect.top() < 0.0 {
        player.rect.y = 0.0;
    }
}

/// Damage every enemy overlapping the player.  Each kill drops a coin, scores,
/// and brings in exactly one replacement.  Replacements are not hit until the
/// next frame.
fn resolve_attack(state: &mut Session, rng: &mut impl Rng) {
    let reach = state.player.rect;
    let mut survivors = Vec::with_capacity(state.enemies.len());
    let mut kills = 0;

    for mut enemy in std::mem::take(&mut state.enemies) {
        if enemy.rect.intersects(&reach) {
            enemy.health = enemy.health.saturating_sub(ATTACK_DAMAGE);
            if enemy.is_dead() {
                state
                    .coins
                    .push(Coin::dropped_at(enemy.rect.center_x(), enemy.rect.center_y()));
                state.player.score += SCORE_PER_KILL;
                kills += 1;
                continue;
            }
        }
        survivors.push(enemy);
    }

    for _ in 0..kills {
        let enemy = spawn_enemy(rng);
        debug!("enemy killed, replacement at x={}", enemy.rect.x);
        survivors.push(enemy);
    }
    state.enemies = survivors;
}

fn collect_coins(state: &mut Session) {
    let reach = state.player.rect;
    let before = state.coins.len();
    state.coins.retain(|coin| !coin.rect.intersects(&reach));
    let picked = (before - state.coins.len()) as u32;
    state.player.score += picked * SCORE_PER_COIN;
}

fn take_contact_damage(state: &mut Session) {
    let player = &mut state.player;
    if player.damage_cooldown > 0 {
        player.damage_cooldown -= 1;
        return;
    }
    if state.enemies.iter().any(|e| e.rect.intersects(&player.rect)) {
        player.health = player.health.saturating_sub(CONTACT_DAMAGE);
        player.damage_cooldown = DAMAGE_COOLDOWN;
        debug!("player hit, health={}", player.health);
    }
}

/// Advance the player one frame: movement, jumping, attacks, coin pickup,
/// layer scrolling, then the win and damage checks.
pub fn update_player(state: &Session, input: &Input, rng: &mut impl Rng) -> Session {
    let mut next = state.clone();

    steer(&mut next.player, input);
    fall(&mut next.player, input);

    if input.attack && next.player.attack_cooldown == 0 {
        next.player.attacking = true;
        next.player.attack_cooldown = ATTACK_COOLDOWN;
        next.player.attack_frames_left = ATTACK_DURATION;
    }
    if next.player.attacking {
        resolve_attack(&mut next, rng);
        next.player.attack_frames_left = next.player.attack_frames_left.saturating_sub(1);
        if next.player.attack_frames_left == 0 {
            next.player.attacking = false;
        }
    }
    next.player.attack_cooldown = next.player.attack_cooldown.saturating_sub(1);

    if !next.player.attacking && next.player.x_velocity != 0.0 {
        next.player.walk_frame = (next.player.walk_frame + 1) % 2;
    }

    collect_coins(&mut next);

    next.background = scroll_layer(&next.background, next.player.x_velocity);
    next.foreground = scroll_layer(&next.foreground, next.player.x_velocity);

    if next.player.score >= WIN_SCORE {
        next.status = GameStatus::Won;
        return next;
    }

    take_contact_damage(&mut next);
    if next.player.health == 0 {
        next.status = GameStatus::Lost;
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  The player (and everything it
/// touches) updates before the enemies; a finished session is returned
/// unchanged so the game-over transition happens exactly once.
pub fn tick(state: &Session, input: &Input, rng: &mut impl Rng) -> Session {
    if state.status.is_over() {
        return state.clone();
    }

    let mut next = update_player(state, input, rng);
    next.frame = state.frame + 1;
    if next.status.is_over() {
        return next;
    }

    next.enemies = next
        .enemies
        .iter()
        .map(|enemy| update_enemy(enemy, &next.player))
        .collect();
    next
}
