//! `check()` integration, run as part of `cargo test`.

const WIDGETS: &str = "crates/construct-lint/tests/fixtures/widgets.assembly.json";
const WIDGET_SCHEMA: &str = "crates/construct-lint/tests/fixtures/resources.json";

#[test]
fn conforming_assembly_passes() {
    construct_lint::check(WIDGETS, WIDGET_SCHEMA);
}

#[test]
#[should_panic(expected = "resource-interface")]
fn warnings_fail_when_fail_on_is_warning() {
    construct_lint::check_with(WIDGETS, WIDGET_SCHEMA, None, Some("warning"));
}

#[test]
#[should_panic(expected = "grant-result")]
fn violating_assembly_panics_with_report() {
    construct_lint::check(
        "crates/construct-lint-rules/tests/fixtures/store.assembly.json",
        "crates/construct-lint-rules/tests/fixtures/resources.json",
    );
}

#[test]
#[should_panic(expected = "failed to load assembly")]
fn missing_assembly_panics() {
    construct_lint::check("does/not/exist.assembly.json", WIDGET_SCHEMA);
}
