//! Simulation tick
//!
//! Within one tick the order is fixed: breath phase, then gate re-arming,
//! then due scheduled events and feedback physics, and only then the tick's
//! press/release input.

use super::breath::{BreathPhase, phase_at};
use super::scoring::{ScoreEvent, combo_text};
use super::state::{GameSession, ScheduledEvent, ScheduledPayload, SessionState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Button went down (inhale attempt, or start)
    pub press: bool,
    /// Button went up (exhale attempt)
    pub release: bool,
}

/// Advance the session to driver time `now_ms`, then apply `input`
pub fn tick(session: &mut GameSession, input: &TickInput, now_ms: f64) {
    advance(session, now_ms);

    if input.press {
        press(session);
    }
    if input.release {
        release(session);
    }
}

/// Time-driven part of a tick
pub fn advance(session: &mut GameSession, now_ms: f64) {
    session.now_ms = now_ms;

    if let (SessionState::Running, Some(start)) = (session.state, session.start_ms) {
        let elapsed = (now_ms - start).max(0.0);
        if elapsed >= session.tuning.time_limit_ms {
            end_session(session);
        } else {
            session.phase = phase_at(elapsed, session.tuning.rhythm_period_ms);
            session.gate.update(session.phase.value);
            fire_due_events(session, elapsed);
        }
    }

    // Text keeps drifting after the session ends
    session.feedback.tick();
}

/// Inhale input: starts an idle session, otherwise tries the inhale window
pub fn press(session: &mut GameSession) {
    match session.state {
        SessionState::NotStarted => start_session(session),
        SessionState::Running => {
            let value = session.phase.value;
            if session.gate.try_consume_inhale(value) {
                // Distance to fully exhaled
                record_score(session, value);
            }
        }
        SessionState::Ended => {}
    }
}

/// Exhale input: tries the exhale window
pub fn release(session: &mut GameSession) {
    if session.state != SessionState::Running {
        return;
    }
    let value = session.phase.value;
    if session.gate.try_consume_exhale(value) {
        // Distance to fully inhaled
        record_score(session, 1.0 - value);
    }
}

fn start_session(session: &mut GameSession) {
    session.state = SessionState::Running;
    session.start_ms = Some(session.now_ms);
    session.phase = BreathPhase::REST;
    log::info!(
        "Session started at {:.0} ms ({:.0} ms limit, {:.0} ms breath)",
        session.now_ms,
        session.tuning.time_limit_ms,
        session.tuning.rhythm_period_ms
    );
}

fn end_session(session: &mut GameSession) {
    session.state = SessionState::Ended;
    if !session.pending.is_empty() {
        log::debug!("Dropping {} pending announcements", session.pending.len());
        session.pending.clear();
    }

    let summary = session.summary();
    log::info!(
        "Session ended: score {} (best combo {}, {} attempts)",
        summary.final_score,
        summary.max_combo,
        summary.attempts
    );
}

fn record_score(session: &mut GameSession, delta: f64) {
    let event = session.scoring.score(delta);
    session.attempts += 1;
    if let Some(count) = session.tier_counts.get_mut(event.tier_index) {
        *count += 1;
    }

    log::debug!(
        "{} (delta {:.4}): +{} combo {} total {}",
        event.tier.label,
        event.delta,
        event.points_awarded,
        event.combo_length_after,
        session.scoring.total_score()
    );

    let origin = session.feedback.origin();
    session
        .feedback
        .spawn(score_text(&event), origin, Some(event.tier.label.clone()), None);

    if event.announce_combo {
        let elapsed = session.elapsed_ms();
        session.pending.push(ScheduledEvent {
            fire_at_ms: elapsed + session.tuning.combo_announce.delay_ms,
            payload: ScheduledPayload::ComboAnnouncement {
                combo_length: event.combo_length_after,
            },
        });
    }
}

fn score_text(event: &ScoreEvent) -> String {
    if event.points_awarded > 0 {
        format!("{} +{}", event.tier.label, event.points_awarded)
    } else {
        event.tier.label.clone()
    }
}

fn fire_due_events(session: &mut GameSession, elapsed: f64) {
    if session.state != SessionState::Running {
        return;
    }

    let mut due = Vec::new();
    session.pending.retain(|ev| {
        if ev.fire_at_ms <= elapsed {
            due.push(ev.payload);
            false
        } else {
            true
        }
    });

    let origin = session.feedback.origin();
    for payload in due {
        match payload {
            ScheduledPayload::ComboAnnouncement { combo_length } => {
                log::debug!("Announcing {}x combo", combo_length);
                session
                    .feedback
                    .spawn(combo_text(combo_length), origin, None, Some(combo_length));
            }
        }
    }
}
