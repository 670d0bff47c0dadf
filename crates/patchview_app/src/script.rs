//! Scripted input for headless runs
//!
//! One step per line; `#` starts a comment:
//!
//! ```text
//! press 25 35          # optional third argument: button index (0 = left)
//! drag 25 60
//! release 25 60
//! move 100 100
//! key t
//! tick 300             # advance the clock by 300 ms, then tick the view
//! ```

use std::fmt;

use patchview_core::{ManualClock, MouseButton, PointerEvent, PointerEventKind};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::view::PatchView;

/// One scripted input
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Pointer(PointerEvent),
    Key(char),
    Tick(u64),
}

impl ScriptStep {
    pub fn event_type(&self) -> &'static str {
        match self {
            ScriptStep::Pointer(event) => match event.kind {
                PointerEventKind::Press => "press",
                PointerEventKind::Drag => "drag",
                PointerEventKind::Release => "release",
                PointerEventKind::Move => "move",
            },
            ScriptStep::Key(_) => "key",
            ScriptStep::Tick(_) => "tick",
        }
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStep::Pointer(event) => write!(
                f,
                "{} {} {}",
                self.event_type(),
                event.position.x,
                event.position.y
            ),
            ScriptStep::Key(key) => write!(f, "key {key}"),
            ScriptStep::Tick(ms) => write!(f, "tick {ms}"),
        }
    }
}

/// Parse a whole script
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        steps.push(parse_step(line, index + 1)?);
    }
    Ok(steps)
}

fn parse_step(line: &str, number: usize) -> Result<ScriptStep> {
    let fail = |message: String| AppError::Script {
        line: number,
        message,
    };
    let mut parts = line.split_ascii_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let kind = match command {
        "press" => PointerEventKind::Press,
        "drag" => PointerEventKind::Drag,
        "release" => PointerEventKind::Release,
        "move" => PointerEventKind::Move,
        "key" => {
            let mut chars = args.first().map(|a| a.chars()).ok_or_else(|| {
                fail("key needs a character".to_string())
            })?;
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(ScriptStep::Key(c)),
                _ => Err(fail("key takes exactly one character".to_string())),
            };
        }
        "tick" => {
            let ms = match args.first() {
                Some(arg) => arg
                    .parse::<u64>()
                    .map_err(|_| fail(format!("bad tick duration {arg:?}")))?,
                None => 0,
            };
            return Ok(ScriptStep::Tick(ms));
        }
        other => return Err(fail(format!("unknown command {other:?}"))),
    };

    if args.len() < 2 {
        return Err(fail(format!("{command} needs x and y")));
    }
    let coord = |arg: &str| {
        arg.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| fail(format!("bad coordinate {arg:?}")))
    };
    let x = coord(args[0])?;
    let y = coord(args[1])?;
    let button = match args.get(2) {
        Some(arg) => MouseButton::from_index(
            arg.parse::<u16>()
                .map_err(|_| fail(format!("bad button {arg:?}")))?,
        ),
        None => MouseButton::Left,
    };
    Ok(ScriptStep::Pointer(PointerEvent::new(kind, x, y, button)))
}

/// What happened while playing a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayReport {
    pub steps: usize,
    /// Pointer events some widget handled
    pub handled: usize,
    pub keys: usize,
    pub ticks: usize,
    pub elapsed_ms: u64,
}

/// Feed `steps` to `view`, advancing `clock` on each tick
pub fn play(view: &mut PatchView, steps: &[ScriptStep], clock: &ManualClock) -> PlayReport {
    let mut report = PlayReport::default();
    for step in steps {
        report.steps += 1;
        match step {
            ScriptStep::Pointer(event) => {
                let handled = view.handle_event(event);
                debug!(step = %step, handled, "script step");
                if handled {
                    report.handled += 1;
                }
            }
            ScriptStep::Key(key) => {
                if view.handle_key(*key) {
                    report.keys += 1;
                }
            }
            ScriptStep::Tick(ms) => {
                clock.advance(*ms);
                view.tick();
                report.ticks += 1;
                report.elapsed_ms += ms;
            }
        }
    }
    report
}
