//! Text listing of decoded widgets

use std::fmt::Write;

use patchview_widgets::{PatchWidget, Widget};

/// One line per widget, include groups followed by their children
pub fn widget_table(widgets: &[PatchWidget]) -> String {
    let mut out = String::new();
    for widget in widgets {
        write_widget(&mut out, widget, 0);
    }
    out
}

fn write_widget(out: &mut String, widget: &PatchWidget, depth: usize) {
    let indent = "  ".repeat(depth);
    let bounds = widget.bounds();
    let base = widget.base();

    let _ = write!(
        out,
        "{indent}{:<8} ({}, {}) {}x{}",
        widget.kind().name(),
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height()
    );

    match widget {
        PatchWidget::IncludeGroup(group) => {
            let _ = writeln!(
                out,
                " {} <- {} [{} children]",
                group.name(),
                group.source_path().display(),
                group.len()
            );
            for child in group.children() {
                write_widget(out, child, depth + 1);
            }
        }
        PatchWidget::Label(label) => {
            let _ = writeln!(out, " {:?}", label.text());
        }
        _ => {
            let _ = writeln!(
                out,
                " [{}, {}] = {} out={} in={}",
                base.min(),
                base.max(),
                widget.value(),
                base.output_symbol(),
                base.input_symbol()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchview_core::ManualClock;
    use patchview_widgets::{MemorySource, PatchDecoder};
    use std::sync::Arc;

    #[test]
    fn test_widget_table() {
        let source = MemorySource::new()
            .with_file("main.pd", "#X obj 20 30 tgl 20 0 s1 r1 empty 0 -10 0 12;\n#X obj 0 0 pd sub;")
            .with_file("sub.pd", "#X obj 1 2 cnv 15 40 20 empty empty hi 20 12 0 14;");
        let decoder = PatchDecoder::new(Arc::new(source), Arc::new(ManualClock::new(0)));
        let table = widget_table(&decoder.load("main.pd"));

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "toggle   (20, 30) 20x20 [0, 1] = 0 out=s1 in=r1");
        assert!(lines[1].starts_with("group"));
        assert!(lines[1].ends_with("sub <- sub.pd [1 children]"));
        assert_eq!(lines[2], "  label    (1, 2) 40x20 \"hi\"");
    }
}
