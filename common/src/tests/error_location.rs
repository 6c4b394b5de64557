use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error raised by the dispatch layer carries an `ErrorLocation`,
/// and marshalled failures use it as their stack. A broken capture makes every failure that
/// crosses the process boundary point nowhere.
#[test]
#[track_caller]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: Capturing the current caller location
    let location = ErrorLocation::from(Location::caller());

    // THEN: File, line and column are populated
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert!(location.line > 0, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the bracketed `Display` format used inside error messages.
///
/// **BUG THIS CATCHES**: Would catch a format change that drops the brackets or one of the
/// coordinates, which makes log lines inconsistent with the rest of the workspace.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "src/host/mod.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting with Display
    let formatted = location.to_string();

    // THEN: "[file:line:column]"
    assert_eq!(formatted, "[src/host/mod.rs:42:7]");
}

/// **VALUE**: Verifies the stack-frame rendering used when failures are marshalled.
///
/// **WHY THIS MATTERS**: The app side shows this text as the remote stack. It must carry the
/// same coordinates as the Display form, just laid out as a frame.
#[test]
fn given_error_location_when_rendered_as_stack_frame_then_uses_at_prefix() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "src/handler/request.rs",
        line: 10,
        column: 3,
    };

    // WHEN: Rendering as a stack frame
    let frame = location.stack_frame();

    // THEN: Indented "at file:line:column"
    assert_eq!(frame, "    at src/handler/request.rs:10:3");
}

/// **VALUE**: Verifies that `#[track_caller]` propagation yields distinct positions per call site.
///
/// **BUG THIS CATCHES**: Would catch someone removing `#[track_caller]` from an error
/// constructor helper, which would make every error report the helper's own line.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper that captures its caller
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // WHEN: Capturing from two consecutive lines
    let first = capture_location();
    let second = capture_location();

    // THEN: Same file, consecutive lines
    assert_eq!(first.file, second.file, "Should have same file");
    assert_eq!(first.line + 1, second.line, "Lines should be sequential");
}
