//! End-to-end: authoring form JSON to question, student placement through the
//! editor, and grading across tries.

use drawlines::config::{ENV_GRADE_METHOD, ENV_PENALTY, GradingConfig};
use drawlines::editor::{Action, EditorCore};
use drawlines::grading::{
    classify_response, clear_wrong_from_response, compute_final_grade, grade_response, summarise_response,
};
use drawlines::input::{Key, Mode, Modifiers};
use drawlines::{Dimensions, GradeMethod, LineType, Point, Question, QuestionForm, Response, State};

const FORM: &str = r#"{
    "grademethod": "partial",
    "penalty": 0.2,
    "lines": [
        {"type": "linesinglearrow", "labelstart": "Force", "zonestart": "100,100;10", "zoneend": "200,100;10"},
        {"type": "lineinfinite", "zonestart": "50,300;15", "zoneend": "350,300;15"},
        {"type": "", "zonestart": "", "zoneend": ""}
    ],
    "hints": [{"text": "Check the arrow.", "shownumcorrect": true, "clearwrong": true}]
}"#;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn question() -> Question {
    let form: QuestionForm = serde_json::from_str(FORM).unwrap();
    assert!(form.validate(Some(Dimensions::new(400, 400))).is_empty());
    Question::try_from(form).unwrap()
}

fn response(pairs: &[(&str, &str)]) -> Response {
    pairs.iter().copied().collect()
}

#[test]
fn form_loads_into_question() {
    let q = question();
    assert_eq!(q.lines.len(), 2);
    assert_eq!(q.lines[0].line_type, LineType::LineSingleArrow);
    assert_eq!(q.lines[1].line_type, LineType::LineInfinite);
    assert_eq!(q.total_tries(), 2);
    assert!(approx_eq(q.penalty, 0.2));
}

#[test]
fn correct_response_grades_right() {
    let q = question();
    let correct = q.correct_response();
    assert_eq!(correct.get("c0"), Some("100,100 200,100"));
    assert_eq!(q.grade_response(&correct), (1.0, State::Right));
}

#[test]
fn infinite_line_grades_on_inner_pair() {
    let q = question();
    let r = response(&[("c0", "100,100 200,100"), ("c1", "0,300 55,305 345,295 400,300")]);
    assert_eq!(q.grade_response(&r).1, State::Right);
}

#[test]
fn partial_and_allnone_differ() {
    let q = question();
    let r = response(&[("c0", "100,100 250,250"), ("c1", "0,0 1,1 2,2 3,3")]);
    let (partial, state) = grade_response(&q.lines, &r, GradeMethod::Partial);
    assert!(approx_eq(partial, 0.25));
    assert_eq!(state, State::Partial);
    let (allnone, state) = grade_response(&q.lines, &r, GradeMethod::AllNone);
    assert!(approx_eq(allnone, 0.0));
    assert_eq!(state, State::Wrong);
}

#[test]
fn second_try_is_penalized() {
    let q = question();
    let wrong = response(&[("c0", "0,0 1,1"), ("c1", "0,0 1,1 2,2 3,3")]);
    let right = q.correct_response();
    let grade = compute_final_grade(&q.lines, q.grade_method, &[wrong, right], q.penalty, q.total_tries());
    assert!(approx_eq(grade, 0.8));
}

#[test]
fn environment_settings_change_the_grade() {
    let q = question();
    let half_right = response(&[("c0", "100,100 250,250"), ("c1", "0,0 1,1 2,2 3,3")]);
    let env = GradingConfig::from_lookup(|key| match key {
        ENV_GRADE_METHOD => Some("allnone".to_string()),
        ENV_PENALTY => Some("0.5".to_string()),
        _ => None,
    })
    .unwrap();
    let settings = GradingConfig::default().or(env).resolve(&q);
    assert_eq!(settings.total_tries, 2);

    let (fraction, state) = grade_response(&q.lines, &half_right, settings.grade_method);
    assert!(approx_eq(fraction, 0.0));
    assert_eq!(state, State::Wrong);

    let grade = compute_final_grade(
        &q.lines,
        settings.grade_method,
        &[half_right, q.correct_response()],
        settings.penalty,
        settings.total_tries,
    );
    assert!(approx_eq(grade, 0.5));
}

#[test]
fn clear_wrong_keeps_right_lines() {
    let q = question();
    let r = response(&[("c0", "100,100 200,100"), ("c1", "0,0 1,1 2,2 3,3")]);
    let cleared = clear_wrong_from_response(&q.lines, &r);
    assert_eq!(cleared.get("c0"), Some("100,100 200,100"));
    assert_eq!(cleared.get("c1"), None);

    let classes = classify_response(&q.lines, &r, q.grade_method);
    assert!(classes[0].start_ok && classes[0].end_ok);
    assert!(!classes[1].start_ok && !classes[1].end_ok);
}

#[test]
fn summary_lists_each_line() {
    let q = question();
    let summary = summarise_response(&q.lines, &q.correct_response()).unwrap();
    assert_eq!(summary, "Line 1: 100,100 200,100; Line 2: 50,300 350,300");
}

#[test]
fn editor_placement_round_trips_through_grading() {
    let q = question();
    let mut editor = EditorCore::for_question(&q, &Dimensions::new(400, 400), Mode::Attempt, 1.0);
    let mut stored = Response::new();

    let start = editor.lines()[0].start.centre;
    let end = editor.lines()[0].end.centre;
    for (from, to) in [(start, Point::new(100.0, 100.0)), (end, Point::new(200.0, 100.0))] {
        editor.on_pointer_down(from);
        editor.on_pointer_move(to);
        for action in editor.on_pointer_up(to) {
            if let Action::ResponseChanged { field, value } = action {
                stored.set(field, value);
            }
        }
    }

    assert_eq!(stored.get("c0"), Some("100,100 200,100"));
    let (fraction, state) = q.grade_response(&editor.response());
    assert!(approx_eq(fraction, 0.5));
    assert_eq!(state, State::Partial);
}

#[test]
fn keyboard_nudge_moves_endpoint_out_of_zone() {
    let q = question();
    let mut editor = EditorCore::for_question(&q, &Dimensions::new(400, 400), Mode::Attempt, 1.0);
    editor.load_response(&q.correct_response());
    let start = editor.lines()[0].start.centre;
    editor.on_pointer_down(start);
    editor.on_pointer_up(start);
    for _ in 0..2 {
        editor.on_key_down(&Key("ArrowRight".into()), Modifiers { shift: true });
    }
    assert_eq!(editor.lines()[0].start.centre, Point::new(120.0, 100.0));
    assert_eq!(q.grade_response(&editor.response()).1, State::Partial);
}
