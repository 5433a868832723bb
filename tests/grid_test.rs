//! Grid service: the host-facing view and click handling.

use rstest::{fixture, rstest};

use treegrid::application::{ApplicationError, TreeGrid};
use treegrid::config::Settings;
use treegrid::domain::{
    DomainError, EventResult, ExpansionSet, OrphanPolicy, Row, RowCategory, ToggleControl,
    TreeIssue,
};
use treegrid::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn rows() -> Vec<Row> {
    vec![
        Row::root("P1").with_field("description", "Bicycle"),
        Row::child("C1", "P1", 1).with_field("description", "Frame"),
        Row::child("G1", "C1", 2).with_field("description", "Down tube"),
        Row::child("C2", "P1", 1).with_field("description", "Wheel"),
        Row::root("P2").with_field("description", "Spare chain"),
    ]
}

#[rstest]
fn given_fresh_grid_when_viewing_then_only_roots_and_toggle_column(rows: Vec<Row>) {
    let grid = TreeGrid::new();

    let view = grid.view(&rows, ["description"]);

    assert_eq!(view.visible_ids(), vec!["P1", "P2"]);
    assert!(view.columns[0].is_toggle());
    assert_eq!(view.columns.len(), 2);
    assert_eq!(view.category("P1"), Some(RowCategory::RootParent));
    assert_eq!(view.category("P2"), Some(RowCategory::Root));
    assert_eq!(view.rows[0].toggle.control, ToggleControl::Collapsed);
    assert_eq!(view.rows[1].toggle.control, ToggleControl::Placeholder);
    assert!(view.issues.is_empty());
}

#[rstest]
fn given_clicks_when_handled_then_view_follows_expansion(rows: Vec<Row>) {
    let mut grid = TreeGrid::new();

    assert_eq!(grid.on_toggle_click(&rows, "P1"), EventResult::Consumed);
    assert_eq!(grid.on_toggle_click(&rows, "C1"), EventResult::Consumed);
    let view = grid.view(&rows, Vec::<String>::new());
    assert_eq!(view.visible_ids(), vec!["P1", "C1", "G1", "C2", "P2"]);
    assert_eq!(view.category("G1"), Some(RowCategory::Grandchild));

    assert_eq!(grid.on_toggle_click(&rows, "P1"), EventResult::Consumed);
    assert!(grid.expansion().is_empty());
    assert_eq!(grid.on_toggle_click(&rows, "P1"), EventResult::Consumed);
    assert_eq!(grid.view(&rows, Vec::<String>::new()).visible_ids(), vec!["P1", "C1", "C2", "P2"]);
}

#[rstest]
fn given_leaf_click_when_handled_then_ignored(rows: Vec<Row>) {
    let mut grid = TreeGrid::new().with_expansion(["P1"].into_iter().collect());

    let result = grid.on_toggle_click(&rows, "C2");

    assert_eq!(result, EventResult::Ignored);
    assert_eq!(grid.expansion(), &["P1"].into_iter().collect::<ExpansionSet>());
}

#[rstest]
fn given_bulk_operations_when_applied_then_state_is_replaced(rows: Vec<Row>) {
    let mut grid = TreeGrid::new();

    grid.expand_all(&rows);
    assert_eq!(grid.view(&rows, Vec::<String>::new()).len(), rows.len());

    grid.collapse_all();
    assert!(grid.expansion().is_empty());

    grid.expand_to_level(&rows, 1);
    assert_eq!(grid.view(&rows, Vec::<String>::new()).len(), 4);

    grid.reset();
    assert!(grid.expansion().is_empty());
}

#[rstest]
fn given_unknown_id_when_revealing_then_errors(rows: Vec<Row>) {
    let mut grid = TreeGrid::new();

    grid.reveal(&rows, "G1").expect("reveal known row");
    assert!(grid.view(&rows, Vec::<String>::new()).visible_ids().contains(&"G1"));

    let err = grid.reveal(&rows, "missing").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnknownId(ref id)) if id == "missing"
    ));
}

#[rstest]
fn given_settings_when_building_grid_then_geometry_and_policy_apply() {
    let settings = Settings {
        indent_unit: 4,
        toggle_width: 3,
        orphan_policy: OrphanPolicy::Root,
        ..Settings::default()
    };
    let rows = vec![Row::root("P1"), Row::child("O1", "gone", 1)];

    let grid = TreeGrid::from_settings(&settings);
    let view = grid.view(&rows, Vec::<String>::new());

    assert_eq!(grid.toggle_column().indent_unit, 4);
    assert_eq!(view.visible_ids(), vec!["P1", "O1"]);
    assert_eq!(view.rows[1].toggle.indent, 4);
    assert_eq!(view.rows[1].toggle.width, 3);
    assert!(matches!(view.issues[0], TreeIssue::Orphan { .. }));
}
