//! Shell behaviour against patches on disk and scripted input

use std::sync::Arc;

use patchview_app::{parse_script, play, PatchView, ViewerConfig, CONFIG_FILE_NAME};
use patchview_core::{DrawCommand, ManualClock, MouseButton, Point, RecordingContext, Size};
use patchview_widgets::{RecordingSink, Widget, WidgetKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAIN: &str = "\
#N canvas 0 50 640 480 12;
#X obj 20 20 tgl 20 0 tog empty empty 17 7 0 10;
#X obj 20 60 hsl 128 20 0 100 0 0 level empty empty 0 0 0 10;
#X obj 200 200 pd sub;
";

const SUB: &str = "#X obj 0 0 bng 20 250 50 0 hit empty empty 17 7 0 10;";

fn write_patch(dir: &std::path::Path) -> std::path::PathBuf {
    std::fs::write(dir.join("main.pd"), MAIN).unwrap();
    std::fs::write(dir.join("sub.pd"), SUB).unwrap();
    dir.join("main.pd")
}

fn loaded_view(clock: Arc<ManualClock>) -> (tempfile::TempDir, PatchView) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_patch(dir.path());
    let mut view = PatchView::new(clock);
    let diagnostics = view.load(&path).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    (dir, view)
}

#[test]
fn load_resolves_includes_next_to_the_patch() {
    let (_dir, view) = loaded_view(Arc::new(ManualClock::new(0)));
    assert_eq!(view.len(), 3);
    assert_eq!(view.leaf_count(), 3);
    assert_eq!(view.widgets()[2].kind(), WidgetKind::IncludeGroup);
}

#[test]
fn missing_patch_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut view = PatchView::new(Arc::new(ManualClock::new(0)));
    assert!(view.load(dir.path().join("nope.pd")).is_err());
    assert!(view.is_empty());
}

#[test]
fn config_flows_into_decoded_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_patch(dir.path());
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[interaction]\ntrigger_hold_ms = 100\n",
    )
    .unwrap();

    let config = ViewerConfig::discover(dir.path()).unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let mut view = PatchView::with_config(config, clock.clone()).unwrap();
    view.load(&path).unwrap();

    let group = view.widgets()[2].as_group().unwrap();
    assert_eq!(group.child(0).and_then(|c| c.as_trigger()).map(|t| t.hold_ms()), Some(100));
}

#[test]
fn scripted_trigger_clears_after_hold_time() {
    let clock = Arc::new(ManualClock::new(0));
    let (_dir, mut view) = loaded_view(clock.clone());
    let sink = Arc::new(RecordingSink::new());
    view.connect_sink(sink.clone());

    let is_active = |view: &PatchView| {
        view.widgets()[2]
            .as_group()
            .and_then(|g| g.child(0))
            .and_then(|c| c.as_trigger())
            .map(|t| t.is_active())
            .unwrap_or(false)
    };

    let steps = parse_script("press 210 210\nrelease 210 210\ntick 299\n").unwrap();
    let report = play(&mut view, &steps, &clock);
    assert_eq!(report.handled, 2);
    assert!(is_active(&view));
    assert_eq!(sink.values(), vec![("hit".to_string(), 1.0)]);

    let report = play(&mut view, &parse_script("tick 1").unwrap(), &clock);
    assert_eq!(report.elapsed_ms, 1);
    assert!(!is_active(&view));
}

#[test]
fn slider_drag_emits_to_sink() {
    let (_dir, mut view) = loaded_view(Arc::new(ManualClock::new(0)));
    let sink = Arc::new(RecordingSink::new());
    view.connect_sink(sink.clone());

    // track spans x 26..142 in host coordinates
    assert!(view.dispatch_press(Point::new(84.0, 70.0), MouseButton::Left));
    assert!(view.dispatch_drag(Point::new(142.0, 70.0), MouseButton::Left));
    assert!(view.dispatch_release(Point::new(142.0, 70.0), MouseButton::Left));

    let values = sink.values();
    assert_eq!(values.first(), Some(&("level".to_string(), 50.0)));
    assert_eq!(values.last(), Some(&("level".to_string(), 100.0)));
    assert_eq!(view.widgets()[1].value(), 100.0);
}

#[test]
fn press_goes_to_first_hit_only() {
    let clock = Arc::new(ManualClock::new(0));
    let mut view = PatchView::new(clock.clone());
    let decoder = view.decoder_for("");
    view.set_widgets(decoder.decode(
        "#X obj 0 0 tgl 20 0 first empty empty 17 7 0 10;\n\
         #X obj 10 10 tgl 20 0 second empty empty 17 7 0 10;",
    ));

    assert!(view.dispatch_press(Point::new(15.0, 15.0), MouseButton::Left));
    assert_eq!(view.widgets()[0].value(), 1.0);
    assert_eq!(view.widgets()[1].value(), 0.0);
}

#[test]
fn draw_dirty_repaints_changed_widgets_only() {
    let (_dir, mut view) = loaded_view(Arc::new(ManualClock::new(0)));
    let mut ctx = RecordingContext::new(Size::new(640.0, 480.0));

    view.draw(&mut ctx);
    assert!(!view.needs_redraw());
    assert!(view.draw_dirty(&mut ctx).is_empty());

    ctx.clear();
    view.dispatch_press(Point::new(30.0, 30.0), MouseButton::Left);
    let regions = view.draw_dirty(&mut ctx);
    assert_eq!(regions.len(), 1);
    let region = regions[0];
    assert_eq!((region.x(), region.y()), (19.0, 19.0));
    assert_eq!((region.width(), region.height()), (22.0, 22.0));
    assert!(matches!(ctx.commands().first(), Some(DrawCommand::ClearRect { .. })));
    assert!(!view.needs_redraw());
}

#[test]
fn demo_operations() {
    let (_dir, mut view) = loaded_view(Arc::new(ManualClock::new(0)));

    view.set_all_to_maximum();
    assert_eq!(view.widgets()[0].value(), 1.0);
    assert_eq!(view.widgets()[1].value(), 100.0);
    let group = view.widgets()[2].as_group().unwrap();
    assert_eq!(group.child(0).map(|c| c.value()), Some(0.0));

    view.reset_all_to_minimum();
    assert_eq!(view.active_count(), 0);

    let mut rng = StdRng::seed_from_u64(7);
    let symbol = view.trigger_random(&mut rng).expect("a toggle or trigger");
    assert!(symbol == "tog" || symbol == "hit");
    assert!(view.status().starts_with("3 widgets"));
}

#[test]
fn release_over_another_widget_repaints_its_hover() {
    let mut view = PatchView::new(Arc::new(ManualClock::new(0)));
    let decoder = view.decoder_for("");
    view.set_widgets(decoder.decode(
        "#X obj 0 0 tgl 20 0 a empty empty 17 7 0 10;\n\
         #X obj 100 0 tgl 20 0 b empty empty 17 7 0 10;",
    ));
    let mut ctx = RecordingContext::new(Size::new(640.0, 480.0));
    view.draw(&mut ctx);

    assert!(view.dispatch_press(Point::new(10.0, 10.0), MouseButton::Left));
    view.draw(&mut ctx);

    assert!(view.dispatch_release(Point::new(110.0, 10.0), MouseButton::Left));
    assert!(view.widgets()[1].base().is_hovered());
    assert!(view.widgets()[1].needs_redraw());

    ctx.clear();
    let regions = view.draw_dirty(&mut ctx);
    assert!(regions.iter().any(|r| r.x() == 99.0 && r.width() == 22.0));
}

#[test]
fn hiding_a_pressed_slider_ends_the_press() {
    let (_dir, mut view) = loaded_view(Arc::new(ManualClock::new(0)));
    let sink = Arc::new(RecordingSink::new());
    view.connect_sink(sink.clone());

    assert!(view.dispatch_press(Point::new(84.0, 70.0), MouseButton::Left));
    view.widgets_mut()[1].set_visible(false);
    assert!(!view.dispatch_release(Point::new(84.0, 70.0), MouseButton::Left));
    view.widgets_mut()[1].set_visible(true);

    let slider = view.widgets()[1].as_slider().unwrap();
    assert!(!slider.base().is_pressed());
    assert!(!slider.is_knob_grabbed());

    sink.take();
    assert!(!view.dispatch_drag(Point::new(142.0, 70.0), MouseButton::Left));
    assert!(sink.is_empty());
    assert_eq!(view.widgets()[1].value(), 50.0);
}
