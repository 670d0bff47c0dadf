//! Patch view: owns the decoded widgets and drives them
//!
//! The host calls [`PatchView::tick`] and [`PatchView::draw`] once per frame
//! and forwards pointer and key input between frames. Widgets are updated,
//! drawn and offered events in declaration order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use patchview_core::{
    Color, DrawContext, MouseButton, Point, PointerEvent, PointerEventKind, Rect, SharedClock,
    Size, SystemClock,
};
use patchview_widgets::{
    Diagnostic, FsSource, LogSink, Palette, PatchDecoder, PatchWidget, SharedSink, Widget,
    WidgetKind,
};
use rand::Rng;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::error::Result;

/// Widgets with a value above this count as active
pub const ACTIVE_THRESHOLD: f32 = 0.5;

/// Keyboard shortcuts understood by [`PatchView::handle_key`]
pub mod keys {
    pub const RESET: char = 'r';
    pub const MAXIMIZE: char = 'a';
    pub const RANDOM: char = 't';
}

pub struct PatchView {
    widgets: Vec<PatchWidget>,
    config: ViewerConfig,
    palette: Palette,
    background: Color,
    clock: SharedClock,
    sink: SharedSink,
    decoder: Option<PatchDecoder>,
    patch_path: Option<PathBuf>,
}

impl std::fmt::Debug for PatchView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchView")
            .field("widgets", &self.widgets.len())
            .field("patch_path", &self.patch_path)
            .finish_non_exhaustive()
    }
}

impl Default for PatchView {
    fn default() -> Self {
        Self::new(SystemClock::shared())
    }
}

impl PatchView {
    /// An empty view with default configuration
    pub fn new(clock: SharedClock) -> Self {
        Self {
            widgets: Vec::new(),
            config: ViewerConfig::default(),
            palette: Palette::default(),
            background: Color::from_rgb8(50, 50, 50),
            clock,
            sink: LogSink::shared(),
            decoder: None,
            patch_path: None,
        }
    }

    pub fn with_config(config: ViewerConfig, clock: SharedClock) -> Result<Self> {
        config.validate()?;
        let background = config.background_color()?;
        Ok(Self {
            background,
            config,
            ..Self::new(clock)
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.mark_all_dirty();
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn viewport(&self) -> Size {
        self.config.viewport()
    }

    pub fn patch_path(&self) -> Option<&Path> {
        self.patch_path.as_deref()
    }

    // Loading

    /// Decoder reading files below `root` with this view's clock and options
    pub fn decoder_for(&self, root: impl Into<PathBuf>) -> PatchDecoder {
        PatchDecoder::new(Arc::new(FsSource::new(root)), self.clock.clone())
            .with_options(self.config.decode_options())
    }

    /// Load a patch file, replacing the current widgets
    ///
    /// Fails only if the file itself is unreadable or empty; problems inside
    /// the patch are returned as diagnostics.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Vec<Diagnostic>> {
        let path = path.as_ref();
        let (decoder, relative) = self.config.patch_decoder(path, self.clock.clone());
        let output = decoder.load_checked(&relative)?;
        output.log_diagnostics();
        info!(
            path = %path.display(),
            widgets = output.widgets.len(),
            leaves = output.leaf_count(),
            "patch view loaded"
        );

        self.set_widgets(output.widgets);
        self.decoder = Some(decoder);
        self.patch_path = Some(relative);
        Ok(output.diagnostics)
    }

    /// Load the same patch again through the decoder used last time
    pub fn reload(&mut self) -> Result<Vec<Diagnostic>> {
        let (Some(decoder), Some(path)) = (self.decoder.clone(), self.patch_path.clone()) else {
            return Ok(Vec::new());
        };
        let output = decoder.load_checked(&path)?;
        output.log_diagnostics();
        self.set_widgets(output.widgets);
        Ok(output.diagnostics)
    }

    /// Replace the widget list, wiring every widget to the current sink
    pub fn set_widgets(&mut self, widgets: Vec<PatchWidget>) {
        self.widgets = widgets;
        for widget in &mut self.widgets {
            widget.set_sink(self.sink.clone());
        }
        self.mark_all_dirty();
    }

    pub fn add_widget(&mut self, mut widget: PatchWidget) {
        widget.set_sink(self.sink.clone());
        self.widgets.push(widget);
    }

    /// Route every widget's output to `sink`
    pub fn connect_sink(&mut self, sink: SharedSink) {
        for widget in &mut self.widgets {
            widget.set_sink(sink.clone());
        }
        self.sink = sink;
    }

    pub fn widgets(&self) -> &[PatchWidget] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut [PatchWidget] {
        &mut self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Number of widgets including those inside include groups
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(|_| count += 1);
        count
    }

    fn for_each_leaf<'a>(&'a self, mut f: impl FnMut(&'a PatchWidget)) {
        for widget in &self.widgets {
            widget.for_each_leaf(&mut f);
        }
    }

    fn for_each_leaf_mut(&mut self, mut f: impl FnMut(&mut PatchWidget)) {
        for widget in &mut self.widgets {
            widget.for_each_leaf_mut(&mut f);
        }
    }

    // Frame

    /// Per-frame tick
    pub fn tick(&mut self) {
        for widget in &mut self.widgets {
            widget.update();
        }
    }

    /// Draw a full frame
    pub fn draw(&mut self, ctx: &mut dyn DrawContext) {
        let viewport = ctx.viewport_size();
        ctx.clear_rect(Rect::from_origin_size(Point::ZERO, viewport), self.background);
        for widget in &self.widgets {
            widget.paint(ctx, &self.palette);
        }
        for widget in &mut self.widgets {
            widget.clear_dirty();
        }
    }

    /// Redraw only what changed since the last draw
    ///
    /// Each dirty region is cleared to the background and every widget
    /// overlapping it is painted again, in declaration order. Returns the
    /// cleared rectangles.
    pub fn draw_dirty(&mut self, ctx: &mut dyn DrawContext) -> Vec<Rect> {
        let mut regions = Vec::new();
        self.for_each_leaf(|leaf| {
            if leaf.needs_redraw() {
                regions.push(leaf.base().dirty_region().rect().outset(1.0));
            }
        });

        for region in &regions {
            ctx.clear_rect(*region, self.background);
            let palette = &self.palette;
            for widget in &self.widgets {
                widget.for_each_leaf(&mut |leaf: &PatchWidget| {
                    if leaf.base().is_visible() && leaf.bounds().intersects(region) {
                        leaf.paint(ctx, palette);
                    }
                });
            }
        }

        for widget in &mut self.widgets {
            widget.clear_dirty();
        }
        if !regions.is_empty() {
            debug!(regions = regions.len(), "redrew dirty regions");
        }
        regions
    }

    pub fn needs_redraw(&self) -> bool {
        self.widgets.iter().any(|w| w.needs_redraw())
    }

    fn mark_all_dirty(&mut self) {
        self.for_each_leaf_mut(|leaf| leaf.base_mut().mark_dirty());
    }

    // Input

    /// The first widget that handles the press consumes it
    pub fn dispatch_press(&mut self, point: Point, button: MouseButton) -> bool {
        self.widgets
            .iter_mut()
            .any(|widget| widget.on_press(point, button))
    }

    pub fn dispatch_drag(&mut self, point: Point, button: MouseButton) -> bool {
        let mut handled = false;
        for widget in &mut self.widgets {
            handled |= widget.on_drag(point, button);
        }
        handled
    }

    pub fn dispatch_release(&mut self, point: Point, button: MouseButton) -> bool {
        let mut handled = false;
        for widget in &mut self.widgets {
            handled |= widget.on_release(point, button);
        }
        handled
    }

    pub fn dispatch_move(&mut self, point: Point) -> bool {
        let mut handled = false;
        for widget in &mut self.widgets {
            handled |= widget.on_move(point);
        }
        handled
    }

    pub fn handle_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Press => self.dispatch_press(event.position, event.button),
            PointerEventKind::Drag => self.dispatch_drag(event.position, event.button),
            PointerEventKind::Release => self.dispatch_release(event.position, event.button),
            PointerEventKind::Move => self.dispatch_move(event.position),
        }
    }

    /// Apply a keyboard shortcut; returns whether the key was recognized
    pub fn handle_key(&mut self, key: char) -> bool {
        match key {
            keys::RESET => {
                self.reset_all_to_minimum();
                info!("reset all widgets to minimum");
            }
            keys::MAXIMIZE => {
                self.set_all_to_maximum();
                info!("set all widgets to maximum");
            }
            keys::RANDOM => match self.trigger_random(&mut rand::thread_rng()) {
                Some(symbol) => info!(symbol = %symbol, "random trigger"),
                None => debug!("nothing to trigger"),
            },
            _ => return false,
        }
        true
    }

    // Global operations

    pub fn reset_all_to_minimum(&mut self) {
        self.for_each_leaf_mut(|leaf| {
            if leaf.kind().is_interactive() {
                let min = leaf.base().min();
                leaf.set_value(min);
            }
        });
    }

    /// Toggles and sliders only; triggers fire through `trigger_random`
    pub fn set_all_to_maximum(&mut self) {
        self.for_each_leaf_mut(|leaf| {
            if matches!(leaf.kind(), WidgetKind::Toggle | WidgetKind::Slider(_)) {
                let max = leaf.base().max();
                leaf.set_value(max);
            }
        });
    }

    /// Fire one trigger or flip one toggle, picked at random
    ///
    /// Returns the output symbol of the widget that was actuated.
    pub fn trigger_random(&mut self, rng: &mut impl Rng) -> Option<String> {
        let mut candidates = 0usize;
        self.for_each_leaf(|leaf| {
            if is_random_target(leaf) {
                candidates += 1;
            }
        });
        if candidates == 0 {
            return None;
        }

        let pick = rng.gen_range(0..candidates);
        let mut seen = 0usize;
        let mut actuated = None;
        self.for_each_leaf_mut(|leaf| {
            if !is_random_target(leaf) {
                return;
            }
            if seen == pick {
                match leaf {
                    PatchWidget::Trigger(trigger) => trigger.trigger(),
                    PatchWidget::Toggle(toggle) => toggle.toggle(),
                    _ => {}
                }
                actuated = Some(leaf.output_symbol().to_string());
            }
            seen += 1;
        });
        actuated
    }

    /// Widgets whose value is above [`ACTIVE_THRESHOLD`]
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(|leaf| {
            if leaf.kind().is_interactive() && leaf.value() > ACTIVE_THRESHOLD {
                count += 1;
            }
        });
        count
    }

    /// Short status line for hosts
    pub fn status(&self) -> String {
        format!(
            "{} widgets, {} active",
            self.leaf_count(),
            self.active_count()
        )
    }
}

fn is_random_target(widget: &PatchWidget) -> bool {
    matches!(widget.kind(), WidgetKind::Trigger | WidgetKind::Toggle)
        && widget.base().accepts_input()
}
