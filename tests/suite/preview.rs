//! Markdown preview outline tests

use notepad_tui::preview::{EMPTY_PREVIEW, render_preview};

#[test]
fn renders_a_typical_note() {
    let md = "# Release plan\n\nShip the **beta** on Friday.\n\n## Risks\n- weak docs\n- unclear owner\n\n> keep it simple\n";
    let rendered = render_preview(md);
    let lines: Vec<&str> = rendered.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "H1  RELEASE PLAN",
            "",
            "Ship the beta on Friday.",
            "",
            "H2  RISKS",
            "• weak docs",
            "• unclear owner",
            "",
            "| keep it simple",
        ]
    );
}

#[test]
fn nested_lists_indent() {
    let out = render_preview("- outer\n  - inner\n- next");
    assert_eq!(out, "• outer\n  • inner\n• next");
}

#[test]
fn whitespace_only_is_empty() {
    assert_eq!(render_preview("\n\n   \n"), EMPTY_PREVIEW);
}

#[test]
fn code_is_fenced_with_markers() {
    let out = render_preview("Intro\n\n```rust\nfn main() {}\n```");
    assert!(out.contains("[code]\n    fn main() {}\n[code]"), "{out}");
}
