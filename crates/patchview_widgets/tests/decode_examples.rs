//! End-to-end decoding of patch text

use std::sync::Arc;

use patchview_core::ManualClock;
use patchview_widgets::{
    MemorySource, Orientation, PatchDecoder, PatchWidget, Severity, Widget, WidgetKind,
};

fn decoder() -> PatchDecoder {
    PatchDecoder::new(Arc::new(MemorySource::new()), Arc::new(ManualClock::new(0)))
}

fn decode(text: &str) -> Vec<PatchWidget> {
    decoder().decode(text)
}

#[test]
fn toggle_line() {
    let widgets =
        decode("#X obj 20 30 tgl 20 0 s1 r1 empty 0 -10 0 12 #fcfcfc #000000 #000000 0 1;");
    assert_eq!(widgets.len(), 1);

    let toggle = &widgets[0];
    assert_eq!(toggle.kind(), WidgetKind::Toggle);
    let bounds = toggle.bounds();
    assert_eq!((bounds.x(), bounds.y()), (20.0, 30.0));
    assert_eq!((bounds.width(), bounds.height()), (20.0, 20.0));
    assert_eq!(toggle.output_symbol(), "s1");
    assert_eq!(toggle.input_symbol(), "r1");
    assert_eq!(toggle.value(), 0.0);
}

#[test]
fn bang_line_reads_symbols_after_timing_fields() {
    let widgets = decode("#X obj 40 60 bng 25 250 50 0 hit ack empty 17 7 0 10;");
    assert_eq!(widgets.len(), 1);

    let trigger = &widgets[0];
    assert_eq!(trigger.kind(), WidgetKind::Trigger);
    let bounds = trigger.bounds();
    assert_eq!((bounds.x(), bounds.y()), (40.0, 60.0));
    assert_eq!((bounds.width(), bounds.height()), (25.0, 25.0));
    assert_eq!(trigger.output_symbol(), "hit");
    assert_eq!(trigger.input_symbol(), "ack");
    assert_eq!(trigger.value(), 0.0);
}

#[test]
fn slider_line_takes_trailing_value() {
    let widgets =
        decode("#X obj 10 10 hsl 128 20 0 100 0 0 send1 recv1 empty 0 0 0 10 -1 -1 -1 75;");
    assert_eq!(widgets.len(), 1);

    let slider = widgets[0].as_slider().expect("slider");
    assert_eq!(slider.orientation(), Orientation::Horizontal);
    assert_eq!(slider.base().min(), 0.0);
    assert_eq!(slider.base().max(), 100.0);
    assert_eq!(slider.value(), 75.0);
    assert_eq!(slider.base().output_symbol(), "send1");
    assert_eq!(slider.base().input_symbol(), "recv1");
}

#[test]
fn slider_trailing_value_is_clamped() {
    let widgets =
        decode("#X obj 0 0 vsl 15 128 0 10 0 0 a b empty 0 -9 0 10 #fcfcfc #000000 #000000 0 1 500;");
    assert_eq!(widgets[0].kind(), WidgetKind::Slider(Orientation::Vertical));
    assert_eq!(widgets[0].value(), 10.0);
}

#[test]
fn short_slider_line_starts_at_min() {
    let widgets = decode("#X obj 0 0 hsl 100 15 5 50 0 0 a b empty;");
    assert_eq!(widgets[0].value(), 5.0);
}

#[test]
fn floatatom_line() {
    let widgets = decode("#X floatatom 91 112 5 0 0 0 - - - 0;");
    assert_eq!(widgets.len(), 1);

    let entry = widgets[0].as_number_entry().expect("number entry");
    assert_eq!(entry.base().output_symbol(), entry.base().input_symbol());
    assert_eq!(entry.base().output_symbol(), "floatatom-91-112");
    assert_eq!(entry.base().min(), -1_000_000.0);
    assert_eq!(entry.base().max(), 1_000_000.0);
    assert_eq!(entry.value(), 0.0);
    assert_eq!(entry.precision(), 0);
    assert_eq!(entry.bounds().width(), 40.0);
    assert_eq!(entry.bounds().height(), 20.0);
}

#[test]
fn short_line_is_skipped_without_affecting_the_next() {
    let out = decoder().decode_with_diagnostics(
        "#X obj 1 2 tgl 15 0;\n#X obj 20 30 tgl 20 0 s1 r1 empty 0 -10 0 12;",
    );
    assert_eq!(out.widgets.len(), 1);
    assert_eq!(out.widgets[0].output_symbol(), "s1");

    let warnings: Vec<_> = out.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, 1);
    assert!(warnings[0].message.contains("at least 10 tokens"));
}

#[test]
fn unwired_widgets_are_discarded() {
    let text = "\
#X obj 10 10 tgl 15 0 empty empty empty 17 7 0 10;
#X obj 10 40 bng 15 250 50 0 empty empty empty 17 7 0 10;
#X obj 10 70 hsl 128 15 0 127 0 0 empty empty empty -2 -8 0 10;
#X obj 10 100 bng 15 250 50 0 hit empty empty 17 7 0 10;
";
    let out = decoder().decode_with_diagnostics(text);
    assert_eq!(out.widgets.len(), 1);
    assert_eq!(out.widgets[0].kind(), WidgetKind::Trigger);
    assert_eq!(
        out.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .count(),
        3
    );
    assert!(!out.has_warnings());
}

#[test]
fn label_fields_and_colors() {
    let widgets = decode(
        "#X obj 100 100 cnv 15 198 138 empty empty hello 20 12 0 14 #e0e0e0 #404040 0;",
    );
    let label = widgets[0].as_label().expect("label");
    assert_eq!(label.text(), "hello");
    assert_eq!(label.font_size(), 14.0);
    assert_eq!(label.bounds().width(), 198.0);
    assert_eq!(label.bounds().height(), 138.0);
    assert_eq!(label.background().to_rgb8(), [224, 224, 224]);
    assert_eq!(label.text_color().to_rgb8(), [64, 64, 64]);
}

#[test]
fn label_defaults_and_bad_color_fallback() {
    let out = decoder()
        .decode_with_diagnostics("#X obj 0 0 cnv 15 100 60 empty empty empty 20 12 0 14 #zz0000 -1 0;");
    let label = out.widgets[0].as_label().expect("label");
    assert_eq!(label.text(), "");
    assert_eq!(label.background().to_rgb8(), [128, 128, 128]);
    assert_eq!(label.text_color().to_rgb8(), [0, 0, 0]);
    assert_eq!(out.warnings().count(), 1);

    let widgets = decode("#X obj 0 0 cnv 15 50;");
    let label = widgets[0].as_label().expect("label");
    assert_eq!(label.bounds().height(), 50.0);
    assert_eq!(label.background().to_rgb8(), [224, 224, 224]);
    assert_eq!(label.font_size(), 12.0);
}

#[test]
fn wrapped_statements_are_joined() {
    let text = "\
#N canvas 0 50 450 300 12;
#X obj 10 10 hsl 128 15 0 127 0 0 out in empty -2 -8 0 10
#fcfcfc #000000 #000000 0 1 64;
#X obj 10 40 tgl 15 0 t1 empty empty 17 7 0 10 #fcfcfc #000000 #000000 0 1;
";
    let widgets = decode(text);
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].value(), 64.0);
    assert_eq!(widgets[1].kind(), WidgetKind::Toggle);
}

#[test]
fn decode_order_is_declaration_order() {
    let text = "\
#X obj 0 0 bng 15 250 50 0 a empty empty 17 7 0 10;
#X floatatom 0 20 5 0 0 0 - - - 0;
#X obj 0 40 tgl 15 0 b empty empty 17 7 0 10;
";
    let kinds: Vec<_> = decode(text).iter().map(|w| w.kind()).collect();
    assert_eq!(
        kinds,
        vec![WidgetKind::Trigger, WidgetKind::NumberEntry, WidgetKind::Toggle]
    );
}
