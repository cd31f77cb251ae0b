use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::thread_rng;

use side_scroller::assets::Assets;
use side_scroller::compute::{init_session, tick};
use side_scroller::config::Config;
use side_scroller::display::Renderer;
use side_scroller::entities::{Input, Session, FPS};

const FRAME: Duration = Duration::from_micros(1_000_000 / FPS);

/// How long the Game-Over screen stays up before the program exits.
const GAME_OVER_HOLD: Duration = Duration::from_secs(3);

/// Without key-release reporting a key is considered "held" if its last
/// press/repeat event arrived within this many frames.  The OS key-repeat
/// rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is always refreshed
/// before expiry.
const HOLD_WINDOW: u64 = 8;

/// Held-key state.  When the terminal reports key releases a key stays down
/// until its Release event; otherwise it expires after `HOLD_WINDOW` frames.
struct HeldKeys {
    key_frame: HashMap<KeyCode, u64>,
    release_events: bool,
}

impl HeldKeys {
    fn new(release_events: bool) -> Self {
        HeldKeys {
            key_frame: HashMap::new(),
            release_events,
        }
    }

    fn press(&mut self, code: KeyCode, frame: u64) {
        self.key_frame.insert(code, frame);
    }

    fn release(&mut self, code: &KeyCode) {
        self.key_frame.remove(code);
    }

    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.release_events || frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|key| self.is_held(key, frame))
    }
}

fn sample_input(keys: &HeldKeys, frame: u64) -> Input {
    Input {
        left: keys.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: keys.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        jump: keys.any_held(
            &[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
            frame,
        ),
        attack: keys.any_held(&[KeyCode::Char('f'), KeyCode::Char('F')], frame),
    }
}

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the session ends or the player quits.
/// Returns `true` → quit requested, `false` → session reached Game Over.
///
/// Input model: `HeldKeys` records the frame of the last press/repeat event
/// for every key.  Each frame we sample every held key and apply all their
/// effects simultaneously, so jump + move + attack can be held together.
fn game_loop<W: Write>(
    out: &mut W,
    renderer: &mut Renderer,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let mut keys = HeldKeys::new(keyboard_enhanced);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        if is_quit(&code, modifiers) {
                            return Ok(true);
                        }
                        keys.press(code, frame);
                    }
                    KeyEventKind::Repeat => {
                        keys.press(code, frame);
                    }
                    KeyEventKind::Release => {
                        keys.release(&code);
                    }
                },
                Event::Resize(cols, rows) => renderer.resize(cols, rows),
                _ => {}
            }
        }

        let input = sample_input(&keys, frame);
        *session = tick(session, &input, &mut rng);

        if session.status.is_over() {
            return Ok(false);
        }

        renderer.render(out, session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env();
    // Loaded before the alternate screen so fallback warnings stay readable.
    let assets = Assets::load(&config.asset_dir);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, assets, &rx, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Ok(Some(session)) = &result {
        info!(
            "session ended: {:?} with score {} after {} frames",
            session.status, session.player.score, session.frame
        );
    }
    result.map(|_| ())
}

/// Play one session.  Returns the finished session, or `None` if the player quit.
fn run<W: Write>(
    out: &mut W,
    assets: Assets,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> std::io::Result<Option<Session>> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(assets, cols, rows);
    let mut session = init_session();
    info!("session started on a {}x{} terminal", cols, rows);

    if game_loop(out, &mut renderer, &mut session, rx, keyboard_enhanced)? {
        return Ok(None);
    }

    renderer.render_game_over(out, &session)?;
    thread::sleep(GAME_OVER_HOLD);
    Ok(Some(session))
}
