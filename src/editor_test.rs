use super::*;
use crate::grading::grade_response;
use crate::line::Handle;
use crate::question::{GradeMethod, QuestionLine};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// Helpers
// =============================================================

fn question(line_type: LineType) -> Question {
    Question {
        grade_method: GradeMethod::Partial,
        penalty: 0.0,
        lines: vec![QuestionLine {
            number: 1,
            line_type,
            label_start: "A".into(),
            label_middle: String::new(),
            label_end: "B".into(),
            zone_start: Zone::parse("50,50;10").unwrap(),
            zone_end: Zone::parse("150,50;10").unwrap(),
        }],
        hints: Vec::new(),
    }
}

fn dims() -> Dimensions {
    Dimensions::new(400, 200)
}

fn authoring() -> EditorCore {
    EditorCore::for_question(&question(LineType::LineSegment), &dims(), Mode::Authoring, 1.0)
}

/// Attempt editor: the single line starts at (40,100)→(160,100), radius 10.
fn attempt(line_type: LineType) -> EditorCore {
    EditorCore::for_question(&question(line_type), &dims(), Mode::Attempt, 1.0)
}

fn drag(core: &mut EditorCore, from: Point, to: Point) -> Vec<Action> {
    core.on_pointer_down(from);
    core.on_pointer_move(to);
    core.on_pointer_up(to)
}

fn response_change(actions: &[Action]) -> Option<(&str, &str)> {
    actions.iter().find_map(|a| match a {
        Action::ResponseChanged { field, value } => Some((field.as_str(), value.as_str())),
        _ => None,
    })
}

// =============================================================
// Construction
// =============================================================

#[test]
fn authoring_shows_stored_zones() {
    let core = authoring();
    assert_eq!(core.lines()[0].start, Zone::new(Point::new(50.0, 50.0), 10.0));
    assert_eq!(core.lines()[0].end, Zone::new(Point::new(150.0, 50.0), 10.0));
}

#[test]
fn attempt_does_not_reveal_zones() {
    let core = attempt(LineType::LineSegment);
    let line = &core.lines()[0];
    assert_eq!(line.start.centre, Point::new(40.0, 100.0));
    assert_eq!(line.end.centre, Point::new(160.0, 100.0));
    assert_eq!(line.label_start, "A");
    assert_eq!(line.label_end, "B");
}

#[test]
fn non_positive_ratio_falls_back_to_one() {
    let core = EditorCore::new(&dims(), Mode::Attempt, 0.0);
    assert!(approx_eq(core.ratio, 1.0));
}

// =============================================================
// Authoring gestures
// =============================================================

#[test]
fn dragging_endpoint_updates_zone() {
    let mut core = authoring();
    let actions = drag(&mut core, Point::new(50.0, 50.0), Point::new(60.0, 70.0));
    assert!(actions.contains(&Action::LineUpdated {
        number: 1,
        zone_start: "60,70;10".into(),
        zone_end: "150,50;10".into(),
    }));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn dragging_zone_edge_resizes() {
    let mut core = authoring();
    core.on_pointer_down(Point::new(60.0, 50.0));
    assert!(matches!(core.input, InputState::ResizingZone { handle: Handle::Start, .. }));
    core.on_pointer_move(Point::new(65.0, 50.0));
    let actions = core.on_pointer_up(Point::new(65.0, 50.0));
    assert!(actions.contains(&Action::LineUpdated {
        number: 1,
        zone_start: "50,50;15".into(),
        zone_end: "150,50;10".into(),
    }));
}

#[test]
fn shrinking_past_zero_is_normalized_on_release() {
    let mut core = authoring();
    core.on_pointer_down(Point::new(60.0, 50.0));
    let actions = core.on_pointer_up(Point::new(45.0, 50.0));
    assert!(approx_eq(core.lines()[0].start.radius, 5.0));
    assert!(actions.iter().any(|a| matches!(a, Action::LineUpdated { zone_start, .. } if zone_start == "50,50;5")));
}

#[test]
fn add_line_emits_default_zones() {
    let mut core = EditorCore::new(&dims(), Mode::Authoring, 1.0);
    let actions = core.add_line(LineType::LineDoubleArrows);
    assert_eq!(core.lines().len(), 1);
    assert_eq!(
        actions[0],
        Action::LineUpdated { number: 1, zone_start: "40,100;10".into(), zone_end: "160,100;10".into() }
    );
    assert_eq!(actions.last(), Some(&Action::RenderNeeded));
}

#[test]
fn authoring_zone_strings_undo_ratio() {
    let mut core = EditorCore::for_question(&question(LineType::LineSegment), &dims(), Mode::Authoring, 2.0);
    assert_eq!(core.lines()[0].start, Zone::new(Point::new(100.0, 100.0), 20.0));
    let actions = drag(&mut core, Point::new(100.0, 100.0), Point::new(120.0, 100.0));
    assert!(actions.iter().any(|a| matches!(a, Action::LineUpdated { zone_start, .. } if zone_start == "60,50;10")));
}

#[test]
fn set_line_type_changes_only_type() {
    let mut core = authoring();
    assert_eq!(core.set_line_type(0, LineType::LineInfinite), vec![Action::RenderNeeded]);
    assert_eq!(core.lines()[0].line_type, LineType::LineInfinite);
    assert!(core.set_line_type(5, LineType::LineSegment).is_empty());
}

// =============================================================
// Attempt gestures
// =============================================================

#[test]
fn attempt_zone_edge_drags_endpoint() {
    let mut core = attempt(LineType::LineSegment);
    core.on_pointer_down(Point::new(50.0, 100.0));
    assert!(matches!(core.input, InputState::DraggingEndpoint { handle: Handle::Start, .. }));
}

#[test]
fn dragging_body_moves_line_and_reports_response() {
    let mut core = attempt(LineType::LineSegment);
    let actions = drag(&mut core, Point::new(100.0, 100.0), Point::new(110.0, 90.0));
    assert_eq!(response_change(&actions), Some(("c0", "50,90 170,90")));
}

#[test]
fn endpoint_drag_is_clamped_to_image() {
    let mut core = attempt(LineType::LineSegment);
    drag(&mut core, Point::new(160.0, 100.0), Point::new(1000.0, 100.0));
    assert_eq!(core.lines()[0].end.centre, Point::new(400.0, 100.0));
}

#[test]
fn authoring_drag_keeps_zone_inside_image() {
    let mut core = authoring();
    drag(&mut core, Point::new(150.0, 50.0), Point::new(1000.0, 50.0));
    assert_eq!(core.lines()[0].end.centre, Point::new(390.0, 50.0));
}

#[test]
fn zone_touching_edge_is_reachable_in_attempt() {
    let mut q = question(LineType::LineSegment);
    q.lines[0].zone_start = Zone::parse("3,100;3").unwrap();
    q.lines[0].zone_end = Zone::parse("150,100;10").unwrap();
    let mut core = EditorCore::for_question(&q, &dims(), Mode::Attempt, 1.0);

    drag(&mut core, Point::new(40.0, 100.0), Point::new(3.0, 100.0));
    drag(&mut core, Point::new(160.0, 100.0), Point::new(150.0, 100.0));

    let response = core.response();
    assert_eq!(response.for_line(1), Some("3,100 150,100"));
    let (fraction, _) = grade_response(&q.lines, &response, q.grade_method);
    assert!(approx_eq(fraction, 1.0));
}

#[test]
fn infinite_line_reports_four_points() {
    let mut core = attempt(LineType::LineInfinite);
    let actions = drag(&mut core, Point::new(40.0, 100.0), Point::new(40.0, 100.0));
    assert_eq!(response_change(&actions), Some(("c0", "0,100 40,100 160,100 400,100")));
}

#[test]
fn response_is_in_natural_coordinates() {
    let core = EditorCore::for_question(&question(LineType::LineSegment), &Dimensions::new(200, 100), Mode::Attempt, 0.5);
    assert_eq!(core.response().for_line(1), Some("40,100 160,100"));
}

#[test]
fn pointer_down_on_empty_space_clears_focus() {
    let mut core = attempt(LineType::LineSegment);
    core.on_pointer_down(Point::new(40.0, 100.0));
    assert!(core.focus.is_some());
    assert!(core.on_pointer_down(Point::new(300.0, 20.0)).is_empty());
    assert!(core.focus.is_none());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn move_without_gesture_is_ignored() {
    let mut core = attempt(LineType::LineSegment);
    assert!(core.on_pointer_move(Point::new(10.0, 10.0)).is_empty());
    assert!(core.on_pointer_up(Point::new(10.0, 10.0)).is_empty());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn arrow_key_nudges_focused_endpoint() {
    let mut core = attempt(LineType::LineSegment);
    drag(&mut core, Point::new(40.0, 100.0), Point::new(40.0, 100.0));
    let actions = core.on_key_down(&Key("ArrowRight".into()), Modifiers::default());
    assert_eq!(response_change(&actions), Some(("c0", "41,100 160,100")));
}

#[test]
fn shift_arrow_moves_faster() {
    let mut core = attempt(LineType::LineSegment);
    drag(&mut core, Point::new(40.0, 100.0), Point::new(40.0, 100.0));
    core.on_key_down(&Key("ArrowUp".into()), Modifiers { shift: true });
    assert_eq!(core.lines()[0].start.centre, Point::new(40.0, 90.0));
}

#[test]
fn arrow_key_on_body_moves_whole_line() {
    let mut core = attempt(LineType::LineSegment);
    drag(&mut core, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
    core.on_key_down(&Key("ArrowDown".into()), Modifiers::default());
    assert_eq!(core.lines()[0].start.centre, Point::new(40.0, 101.0));
    assert_eq!(core.lines()[0].end.centre, Point::new(160.0, 101.0));
}

#[test]
fn escape_clears_focus() {
    let mut core = attempt(LineType::LineSegment);
    drag(&mut core, Point::new(40.0, 100.0), Point::new(40.0, 100.0));
    core.on_key_down(&Key("Escape".into()), Modifiers::default());
    assert!(core.focus.is_none());
    assert!(core.on_key_down(&Key("ArrowLeft".into()), Modifiers::default()).is_empty());
}

// =============================================================
// Responses and dimensions
// =============================================================

#[test]
fn load_response_restores_placement() {
    let mut core = attempt(LineType::LineSegment);
    core.load_response(&[("c0", "50,50 150,50")].into_iter().collect::<Response>());
    assert_eq!(core.lines()[0].start.centre, Point::new(50.0, 50.0));
    assert_eq!(core.lines()[0].end.centre, Point::new(150.0, 50.0));
}

#[test]
fn load_response_ignores_malformed_values() {
    let mut core = attempt(LineType::LineSegment);
    core.load_response(&[("c0", "garbage")].into_iter().collect::<Response>());
    assert_eq!(core.lines()[0].start.centre, Point::new(40.0, 100.0));
}

#[test]
fn placed_answer_grades_right() {
    let q = question(LineType::LineSegment);
    let mut core = EditorCore::for_question(&q, &dims(), Mode::Attempt, 1.0);
    drag(&mut core, Point::new(40.0, 100.0), Point::new(50.0, 50.0));
    drag(&mut core, Point::new(160.0, 100.0), Point::new(150.0, 50.0));
    let (fraction, _) = grade_response(&q.lines, &core.response(), q.grade_method);
    assert!(approx_eq(fraction, 1.0));
}

#[test]
fn shrinking_image_pulls_lines_inside() {
    let mut core = attempt(LineType::LineSegment);
    core.set_dimensions(&Dimensions::new(100, 50));
    let line = &core.lines()[0];
    assert_eq!(line.end.centre, Point::new(100.0, 50.0));
}

#[test]
fn load_response_keeps_edge_placement() {
    let mut core = attempt(LineType::LineSegment);
    core.load_response(&[("c0", "3,100 400,0")].into_iter().collect::<Response>());
    assert_eq!(core.response().for_line(1), Some("3,100 400,0"));
}

#[test]
fn render_returns_one_model_per_line() {
    let core = attempt(LineType::LineSingleArrow);
    let models = core.render();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].arrowheads.len(), 1);
}
