mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use tank_battle::compute::{init_state, tick};
use tank_battle::entities::{GameState, SpawnKind, TickInput};
use tank_battle::render::draw_frame;
use tank_battle::spawner::start_spawners;

const FRAME: Duration = Duration::from_millis(16); // ≈60 TPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

const KEYS_UP: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_RIGHT: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_DOWN: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → start a new game.
///
/// Held keys are tracked in `key_frame` (frame of the last press/repeat), so
/// movement and firing can overlap.  Fire is edge-triggered: only a fresh
/// `Press` of Space fires, never an auto-repeat.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &Receiver<Event>,
    spawns: &Receiver<SpawnKind>,
) -> anyhow::Result<bool> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut fire = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if state.status.is_terminal() => {
                            return Ok(false);
                        }
                        KeyCode::Char(' ') => fire = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = TickInput {
            up: any_held(&key_frame, &KEYS_UP, frame),
            right: any_held(&key_frame, &KEYS_RIGHT, frame),
            down: any_held(&key_frame, &KEYS_DOWN, frame),
            left: any_held(&key_frame, &KEYS_LEFT, frame),
            fire,
            clock: frame,
            spawns: spawns.try_iter().collect(),
        };

        *state = tick(state, &input, &mut rng);

        display::render(out, &draw_frame(state), state.status)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Log to a file in the temp directory; stderr would tear the frame.
fn init_logging() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("tank_battle.log");
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let (cols, rows) = terminal::size().context("cannot query terminal size")?;
    if cols < display::MIN_COLS || rows < display::MIN_ROWS {
        bail!(
            "terminal is {}x{}, the arena needs at least {}x{}",
            cols,
            rows,
            display::MIN_COLS,
            display::MIN_ROWS
        );
    }

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("cannot enable raw mode")?;

    let mut keyboard_enhanced = false;
    let result = session(&mut out, &mut keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        warn!("exiting with error: {:#}", err);
    }
    result
}

fn session<W: Write>(out: &mut W, keyboard_enhanced: &mut bool) -> anyhow::Result<()> {
    out.execute(terminal::EnterAlternateScreen)
        .context("cannot enter alternate screen")?;
    out.execute(cursor::Hide).context("cannot hide cursor")?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let spawns = start_spawners();
    run(out, &rx, &spawns)
}

fn run<W: Write>(
    out: &mut W,
    rx: &Receiver<Event>,
    spawns: &Receiver<SpawnKind>,
) -> anyhow::Result<()> {
    loop {
        let mut state = init_state();
        info!("new game started");
        // Requests queued while the previous game was over start fresh
        spawns.try_iter().for_each(drop);

        if game_loop(out, &mut state, rx, spawns)? {
            info!("quit requested");
            break;
        }
    }
    Ok(())
}
