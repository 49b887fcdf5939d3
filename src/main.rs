//! Breath Pulse entry point
//!
//! No renderer ships with the core, so the native binary plays a demo: a bot
//! breathes along at 60 Hz with a small random reaction delay, and the final
//! snapshot and summary are printed as JSON.
//!
//! Usage: `breath-pulse [tuning.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use breath_pulse::Tuning;
use breath_pulse::consts::TICK_MS;
use breath_pulse::sim::{GameSession, SessionState, TickInput, tick};

/// Bot reaction delay range is 1..=this many ticks
const MAX_REACTION_TICKS: u32 = 6;

fn main() {
    env_logger::init();
    log::info!("Breath Pulse (native demo) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load tuning from {}: {} - using defaults", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut rng = Pcg32::seed_from_u64(tuning.seed ^ 0x5eed);
    let mut session = match GameSession::new(tuning) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };

    // Frame 0 press starts the clock
    tick(
        &mut session,
        &TickInput {
            press: true,
            ..Default::default()
        },
        0.0,
    );

    let mut frame: u64 = 1;
    let mut last_value = session.phase().value;
    let mut was_rising = true;
    let mut press_at: Option<u64> = None;
    let mut release_at: Option<u64> = None;
    let mut next_report_ms = 10_000.0;

    while session.state() == SessionState::Running {
        let now = frame as f64 * TICK_MS;
        let input = TickInput {
            press: press_at == Some(frame),
            release: release_at == Some(frame),
        };
        tick(&mut session, &input, now);

        // React after passing a trough or a peak
        let value = session.phase().value;
        let rising = value > last_value;
        if rising && !was_rising {
            press_at = Some(frame + rng.random_range(1..=MAX_REACTION_TICKS) as u64);
        } else if !rising && was_rising {
            release_at = Some(frame + rng.random_range(1..=MAX_REACTION_TICKS) as u64);
        }
        was_rising = rising;
        last_value = value;

        if session.elapsed_ms() >= next_report_ms {
            log::info!(
                "{:.0}s: score {} combo {}",
                session.elapsed_ms() / 1000.0,
                session.total_score(),
                session.combo_len()
            );
            next_report_ms += 10_000.0;
        }
        frame += 1;
    }

    match (
        serde_json::to_string_pretty(&session.summary()),
        serde_json::to_string_pretty(&session.snapshot()),
    ) {
        (Ok(summary), Ok(snapshot)) => {
            println!("{}", snapshot);
            println!("{}", summary);
        }
        (Err(e), _) | (_, Err(e)) => log::error!("Failed to serialize results: {}", e),
    }
}
