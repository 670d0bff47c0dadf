//! Patch decoder
//!
//! Turns patch text into an ordered list of widgets. Decoding is lenient:
//! a line that cannot be decoded is skipped and reported as a diagnostic,
//! and a broken include degrades to an empty group. Only
//! [`PatchDecoder::load_checked`] fails outright, and only when the top-level
//! source itself cannot be read.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use patchview_core::{Color, Point, SharedClock, Size, SystemClock};
use tracing::{debug, info, warn};

use crate::base::{is_wired, ValueRange, EMPTY_SYMBOL};
use crate::error::{PatchError, Result};
use crate::include_group::IncludeGroup;
use crate::label::{Label, DEFAULT_FONT_SIZE};
use crate::number_entry::{NumberEntry, DEFAULT_DRAG_SENSITIVITY};
use crate::slider::Slider;
use crate::style::Palette;
use crate::toggle::Toggle;
use crate::trigger::{Trigger, DEFAULT_HOLD_MS};
use crate::widget::{PatchWidget, WidgetKind};

use super::color::ColorField;
use super::diagnostics::{DecodeOutput, Diagnostic, Severity};
use super::grammar::{self, floatatom, include, label, slider, ObjectGrammar};
use super::source::{normalize_path, FsSource, SharedSource};
use super::tokens::{statements, tokenize, Statement, Tokens};

/// Default include nesting limit
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Knobs applied to every decoded widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    pub max_include_depth: usize,
    pub trigger_hold_ms: u64,
    pub number_drag_sensitivity: f32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            trigger_hold_ms: DEFAULT_HOLD_MS,
            number_drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
        }
    }
}

/// Decodes patch text into widgets
///
/// Include references are read through the [`PatchSource`](super::PatchSource),
/// so the same decoder works against the filesystem or in-memory fixtures.
/// Triggers share the decoder's clock.
#[derive(Clone)]
pub struct PatchDecoder {
    source: SharedSource,
    clock: SharedClock,
    options: DecodeOptions,
}

impl fmt::Debug for PatchDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchDecoder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// State of one decode call
#[derive(Default)]
struct Session {
    /// Files currently being decoded, outermost first
    chain: Vec<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    fn current_path(&self) -> Option<PathBuf> {
        self.chain.last().cloned()
    }

    fn current_dir(&self) -> PathBuf {
        self.chain
            .last()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn push(&mut self, severity: Severity, line: usize, message: String, source_line: &str) {
        let diagnostic = Diagnostic::new(severity, line, message)
            .with_path(self.current_path())
            .with_source_line(source_line);
        self.diagnostics.push(diagnostic);
    }
}

impl PatchDecoder {
    pub fn new(source: SharedSource, clock: SharedClock) -> Self {
        Self {
            source,
            clock,
            options: DecodeOptions::default(),
        }
    }

    /// Decoder reading files below `root` with the system clock
    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsSource::new(root)), SystemClock::shared())
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Decode patch text; includes resolve against the source root
    pub fn decode(&self, text: &str) -> Vec<PatchWidget> {
        self.decode_with_diagnostics(text).widgets
    }

    pub fn decode_with_diagnostics(&self, text: &str) -> DecodeOutput {
        let mut session = Session::default();
        let widgets = self.decode_text(&mut session, text);
        DecodeOutput {
            widgets,
            diagnostics: session.diagnostics,
        }
    }

    /// Load a patch file; an unreadable or empty file yields no widgets
    pub fn load(&self, path: impl AsRef<Path>) -> Vec<PatchWidget> {
        self.load_with_diagnostics(path).widgets
    }

    /// Load a patch file, recording a read failure as an error diagnostic
    pub fn load_with_diagnostics(&self, path: impl AsRef<Path>) -> DecodeOutput {
        let path = path.as_ref();
        match self.load_checked(path) {
            Ok(output) => output,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load patch");
                DecodeOutput {
                    widgets: Vec::new(),
                    diagnostics: vec![Diagnostic::new(Severity::Error, 0, err.to_string())
                        .with_path(Some(path.to_path_buf()))],
                }
            }
        }
    }

    /// Load a patch file, failing if it cannot be read or holds no text
    pub fn load_checked(&self, path: impl AsRef<Path>) -> Result<DecodeOutput> {
        let path = path.as_ref();
        let mut session = Session::default();
        let widgets = self.decode_file(&mut session, path)?;
        let output = DecodeOutput {
            widgets,
            diagnostics: session.diagnostics,
        };
        info!(
            path = %path.display(),
            widgets = output.widgets.len(),
            leaves = output.leaf_count(),
            diagnostics = output.diagnostics.len(),
            "loaded patch"
        );
        Ok(output)
    }

    /// Decode the file behind an include group
    ///
    /// Failures are reported as warnings and produce no widgets, leaving the
    /// group empty.
    pub fn decode_include(&self, path: &Path) -> DecodeOutput {
        let mut session = Session::default();
        let widgets = match self.decode_file(&mut session, path) {
            Ok(widgets) => widgets,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "include failed");
                session.diagnostics.push(
                    Diagnostic::warning(0, err.to_string()).with_path(Some(path.to_path_buf())),
                );
                Vec::new()
            }
        };
        DecodeOutput {
            widgets,
            diagnostics: session.diagnostics,
        }
    }

    fn decode_file(&self, session: &mut Session, path: &Path) -> Result<Vec<PatchWidget>> {
        let path = normalize_path(path);
        if session.chain.contains(&path) {
            return Err(PatchError::IncludeCycle(path));
        }
        if session.chain.len() >= self.options.max_include_depth {
            return Err(PatchError::IncludeDepth {
                path,
                limit: self.options.max_include_depth,
            });
        }

        let text = self
            .source
            .read_patch(&path)
            .map_err(|source| PatchError::Io {
                path: path.clone(),
                source,
            })?;
        if text.trim().is_empty() {
            return Err(PatchError::EmptySource(path));
        }

        session.chain.push(path);
        let widgets = self.decode_text(session, &text);
        session.chain.pop();
        Ok(widgets)
    }

    fn decode_text(&self, session: &mut Session, text: &str) -> Vec<PatchWidget> {
        let mut widgets = Vec::new();
        for statement in statements(text) {
            let tokens = tokenize(&statement.text);
            match self.decode_statement(session, &statement, &tokens) {
                Ok(Some(widget)) => widgets.push(widget),
                Ok(None) => {}
                Err(err) => {
                    debug!(line = statement.line, error = %err, "skipped patch line");
                    session.push(
                        Severity::Warning,
                        statement.line,
                        err.to_string(),
                        &statement.text,
                    );
                }
            }
        }
        widgets
    }

    fn decode_statement(
        &self,
        session: &mut Session,
        statement: &Statement,
        tokens: &Tokens<'_>,
    ) -> Result<Option<PatchWidget>> {
        if tokens.first() != Some(&grammar::RECORD) {
            return Ok(None);
        }
        let line = statement.line;

        match tokens.get(1).copied() {
            Some(grammar::OBJ) => {
                let Some(class) = tokens.get(grammar::CLASS).copied() else {
                    return Ok(None);
                };
                if let Some(object) = grammar::object_grammar(class) {
                    require(tokens, object.min_tokens, class, line)?;
                    self.decode_object(session, statement, tokens, object)
                } else if class == label::CLASS {
                    require(tokens, label::MIN_TOKENS, class, line)?;
                    self.decode_label(session, statement, tokens).map(Some)
                } else if class == include::CLASS {
                    require(tokens, include::MIN_TOKENS, class, line)?;
                    self.decode_group(session, tokens, line).map(Some)
                } else {
                    Ok(None)
                }
            }
            Some(grammar::RESTORE) => {
                if tokens.get(grammar::CLASS) != Some(&include::CLASS) {
                    return Ok(None);
                }
                require(tokens, include::MIN_TOKENS, grammar::RESTORE, line)?;
                self.decode_group(session, tokens, line).map(Some)
            }
            Some(grammar::FLOATATOM) => {
                require(tokens, floatatom::MIN_TOKENS, grammar::FLOATATOM, line)?;
                self.decode_floatatom(tokens, line).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Slider, toggle and trigger lines
    fn decode_object(
        &self,
        session: &mut Session,
        statement: &Statement,
        tokens: &Tokens<'_>,
        object: &ObjectGrammar,
    ) -> Result<Option<PatchWidget>> {
        let line = statement.line;
        let send = symbol(tokens, object.send);
        let receive = symbol(tokens, object.receive);
        if !is_wired(send) && !is_wired(receive) {
            session.push(
                Severity::Info,
                line,
                format!("{} has no send or receive symbol, left out", object.class),
                &statement.text,
            );
            return Ok(None);
        }

        let position = position(tokens, line)?;
        let widget: PatchWidget = match object.kind {
            WidgetKind::Slider(orientation) => {
                let size = Size::new(
                    number(tokens, slider::WIDTH, line)?,
                    number(tokens, slider::HEIGHT, line)?,
                );
                let range = ValueRange::new(
                    number(tokens, slider::MIN, line)?,
                    number(tokens, slider::MAX, line)?,
                );
                let initial = if tokens.len() > slider::VALUE_AFTER {
                    number(tokens, tokens.len() - 1, line)?
                } else {
                    range.min()
                };
                Slider::new(position, size, orientation, range, initial)
                    .with_symbols(send, receive)
                    .into()
            }
            WidgetKind::Toggle => {
                let side = number(tokens, grammar::SQUARE_SIZE, line)?;
                Toggle::new(position, side).with_symbols(send, receive).into()
            }
            WidgetKind::Trigger => {
                let side = number(tokens, grammar::SQUARE_SIZE, line)?;
                Trigger::new(position, side, self.clock.clone())
                    .with_symbols(send, receive)
                    .with_hold_ms(self.options.trigger_hold_ms)
                    .into()
            }
            _ => return Ok(None),
        };
        Ok(Some(widget))
    }

    fn decode_label(
        &self,
        session: &mut Session,
        statement: &Statement,
        tokens: &Tokens<'_>,
    ) -> Result<PatchWidget> {
        let line = statement.line;
        let position = position(tokens, line)?;
        let width = number(tokens, label::WIDTH, line)?;
        let height = if tokens.len() > label::HEIGHT {
            number(tokens, label::HEIGHT, line)?
        } else {
            width
        };

        let palette = Palette::default();
        let mut colors = [palette.label_background, palette.label_text];
        for (slot, index) in colors.iter_mut().zip([label::BACKGROUND, label::FOREGROUND]) {
            let field = ColorField::read(tokens.get(index).copied());
            if let ColorField::Invalid(err) = &field {
                warn!(line, token = index, error = %err, "invalid label color, using fallback");
                session.push(
                    Severity::Warning,
                    line,
                    format!("label color: {err}"),
                    &statement.text,
                );
            }
            *slot = field.resolve(*slot, palette.color_fallback);
        }
        let [background, text_color]: [Color; 2] = colors;

        let font_size = tokens
            .get(label::FONT_SIZE)
            .and_then(|t| t.parse::<f32>().ok())
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE);

        let mut label = Label::new(position, Size::new(width, height))
            .with_colors(background, text_color)
            .with_font_size(font_size);
        if let Some(text) = tokens.get(label::TEXT).copied().filter(|t| is_wired(t)) {
            label = label.with_text(text);
        }
        Ok(label.into())
    }

    fn decode_floatatom(&self, tokens: &Tokens<'_>, line: usize) -> Result<PatchWidget> {
        let position = position(tokens, line)?;

        let chars = match tokens.get(floatatom::WIDTH) {
            Some(_) => number(tokens, floatatom::WIDTH, line)?,
            None => 0.0,
        };
        let chars = if chars <= 0.0 {
            floatatom::AUTO_WIDTH_CHARS
        } else {
            chars
        };
        let size = Size::new(chars * floatatom::CHAR_WIDTH, floatatom::HEIGHT);

        let (min, max) = if tokens.len() >= floatatom::RANGE_TOKENS {
            (
                number(tokens, floatatom::MIN, line)?,
                number(tokens, floatatom::MAX, line)?,
            )
        } else {
            (0.0, 0.0)
        };
        let range = if min == 0.0 && max == 0.0 {
            ValueRange::new(-floatatom::UNBOUNDED, floatatom::UNBOUNDED)
        } else {
            ValueRange::new(min, max)
        };

        let initial = if tokens.len() > floatatom::VALUE_AFTER {
            range.clamp(number(tokens, tokens.len() - 1, line)?)
        } else {
            range.clamp(0.0)
        };
        let precision = if initial.fract() == 0.0 {
            0
        } else {
            floatatom::FRACTIONAL_PRECISION
        };

        let send = atom_symbol(tokens, floatatom::SEND);
        let receive = atom_symbol(tokens, floatatom::RECEIVE);
        let (send, receive) = match (send, receive) {
            (None, None) => {
                let x = tokens[grammar::X];
                let y = tokens[grammar::Y];
                let synthesized = format!("floatatom-{x}-{y}");
                (synthesized.clone(), synthesized)
            }
            (send, receive) => (
                send.unwrap_or(EMPTY_SYMBOL).to_string(),
                receive.unwrap_or(EMPTY_SYMBOL).to_string(),
            ),
        };

        let mut entry =
            NumberEntry::new(position, size, range, initial, precision).with_symbols(send, receive);
        entry.set_drag_sensitivity(self.options.number_drag_sensitivity);
        Ok(entry.into())
    }

    fn decode_group(
        &self,
        session: &mut Session,
        tokens: &Tokens<'_>,
        line: usize,
    ) -> Result<PatchWidget> {
        let position = position(tokens, line)?;
        let name = tokens.get(include::NAME).copied().ok_or_else(|| PatchError::Format {
            line,
            message: "include is missing its name".to_string(),
        })?;

        let path = session
            .current_dir()
            .join(format!("{name}.{}", include::EXTENSION));
        let mut group = IncludeGroup::new(name, position, normalize_path(&path));

        match self.decode_file(session, &path) {
            Ok(children) => {
                debug!(group = name, children = children.len(), "decoded include");
                for child in children {
                    group.add_child(child);
                }
            }
            Err(err) => {
                warn!(line, group = name, error = %err, "include failed, group left empty");
                session.push(Severity::Warning, line, err.to_string(), "");
            }
        }
        Ok(group.into())
    }
}

fn require(tokens: &Tokens<'_>, min: usize, what: &str, line: usize) -> Result<()> {
    if tokens.len() < min {
        return Err(PatchError::Format {
            line,
            message: format!("{what} needs at least {min} tokens, found {}", tokens.len()),
        });
    }
    Ok(())
}

fn number(tokens: &Tokens<'_>, index: usize, line: usize) -> Result<f32> {
    let token = tokens.get(index).ok_or_else(|| PatchError::Format {
        line,
        message: format!("missing numeric field {index}"),
    })?;
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PatchError::Format {
            line,
            message: format!("field {index} is not a number: {token:?}"),
        }),
    }
}

fn position(tokens: &Tokens<'_>, line: usize) -> Result<Point> {
    Ok(Point::new(
        number(tokens, grammar::X, line)?,
        number(tokens, grammar::Y, line)?,
    ))
}

/// A missing symbol token reads as unwired
fn symbol<'a>(tokens: &Tokens<'a>, index: usize) -> &'a str {
    tokens.get(index).copied().unwrap_or(EMPTY_SYMBOL)
}

fn atom_symbol<'a>(tokens: &Tokens<'a>, index: usize) -> Option<&'a str> {
    tokens
        .get(index)
        .copied()
        .filter(|s| *s != floatatom::ABSENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::MemorySource;
    use crate::widget::Widget;
    use patchview_core::ManualClock;

    fn decoder() -> PatchDecoder {
        PatchDecoder::new(Arc::new(MemorySource::new()), Arc::new(ManualClock::new(0)))
    }

    #[test]
    fn test_ignores_unknown_records() {
        let out = decoder().decode_with_diagnostics(
            "#N canvas 0 50 450 300 12;\n#X obj 10 10 osc~ 440;\n#X connect 0 0 1 0;\n#A set 1;",
        );
        assert!(out.widgets.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_bad_number_skips_line_only() {
        let out = decoder().decode_with_diagnostics(
            "#X obj 1 2 tgl abc 0 s r empty 0 0 0 10;\n#X obj 1 2 tgl 15 0 s r empty 0 0 0 10;",
        );
        assert_eq!(out.widgets.len(), 1);
        assert_eq!(out.warnings().count(), 1);
        assert_eq!(out.diagnostics[0].line, 1);
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let widgets = decoder().decode("#X obj inf 2 tgl 15 0 s r empty 0 0 0 10;");
        assert!(widgets.is_empty());
    }

    #[test]
    fn test_trigger_uses_configured_hold() {
        let decoder = decoder().with_options(DecodeOptions {
            trigger_hold_ms: 50,
            ..DecodeOptions::default()
        });
        let widgets = decoder.decode("#X obj 5 5 bng 15 250 50 0 out in empty 17 7 0 10;");
        let trigger = widgets[0].as_trigger().unwrap();
        assert_eq!(trigger.hold_ms(), 50);
        assert_eq!(trigger.bounds().width(), 15.0);
    }

    #[test]
    fn test_restore_requires_pd_class() {
        let widgets = decoder().decode("#X restore 10 10 graph;");
        assert!(widgets.is_empty());
    }

    #[test]
    fn test_floatatom_one_symbol() {
        let widgets = decoder().decode("#X floatatom 1 2 5 0 10 0 - - out 3.5;");
        let entry = widgets[0].as_number_entry().unwrap();
        assert_eq!(entry.base().output_symbol(), EMPTY_SYMBOL);
        assert_eq!(entry.base().input_symbol(), "out");
        assert_eq!(entry.value(), 3.5);
        assert_eq!(entry.precision(), 2);
    }

    #[test]
    fn test_floatatom_short_line_is_unbounded() {
        let widgets = decoder().decode("#X floatatom 4 8 0;");
        let entry = widgets[0].as_number_entry().unwrap();
        assert_eq!(entry.base().max(), floatatom::UNBOUNDED);
        assert_eq!(entry.bounds().width(), 40.0);
        assert_eq!(entry.base().output_symbol(), "floatatom-4-8");
    }
}
