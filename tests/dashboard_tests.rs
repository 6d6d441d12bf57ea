// Integration tests for the dashboard view state

use std::time::{Duration, Instant};

use codemaster::dashboard::editor::{RunRequest, OUTPUT_PLACEHOLDER};
use codemaster::dashboard::exercises::ExerciseSession;
use codemaster::dashboard::{Dashboard, Tab};
use codemaster::fixtures::exercises::exercises_for;
use codemaster::fixtures::{Difficulty, RESET_SNIPPET, WELCOME_SNIPPET};
use codemaster::runner::{CodeRunner, ExecutionResult};

fn dashboard() -> Dashboard {
    Dashboard::new(CodeRunner::default(), Duration::from_millis(50), Tab::Editor)
}

#[test]
fn test_reset_restores_default_from_any_state() {
    let mut dash = dashboard();
    assert_eq!(dash.editor.buffer.text(), WELCOME_SNIPPET);

    for junk in ["", "console.log(1)", "}}}{{{", "while (true) {}"] {
        dash.editor.load(junk);
        dash.editor.run();
        dash.editor.wait();
        dash.reset_code();
        assert_eq!(dash.editor.buffer.text(), RESET_SNIPPET);
        assert_eq!(dash.editor.output.display_lines(), [OUTPUT_PLACEHOLDER]);

        dash.reset_code();
        assert_eq!(dash.editor.buffer.text(), RESET_SNIPPET);
    }
}

#[test]
fn test_reset_snippet_runs() {
    let mut dash = dashboard();
    dash.reset_code();
    dash.run_code();
    assert_eq!(
        dash.editor.wait().cloned(),
        Some(ExecutionResult::Output(vec![
            "Hello, Developer! Welcome to coding!".to_string()
        ]))
    );
}

#[test]
fn test_only_one_run_in_flight() {
    let mut dash = dashboard();
    dash.editor.load("let i = 0;\nwhile (true) { i++; }");
    assert_eq!(dash.editor.run(), RunRequest::Started);
    assert_eq!(dash.editor.run(), RunRequest::Busy);
    dash.run_code();
    assert!(dash.status_message.contains("Already running"));

    dash.cancel_run();
    assert_eq!(
        dash.editor.wait().cloned(),
        Some(ExecutionResult::Failure("Error: Execution cancelled".to_string()))
    );
    assert_eq!(dash.editor.run(), RunRequest::Started);
    dash.editor.cancel();
    dash.editor.wait();
}

#[test]
fn test_result_replaced_by_latest_run() {
    let mut dash = dashboard();
    dash.editor.load("missing();");
    dash.editor.run();
    dash.editor.wait();
    assert!(dash.editor.output.is_failure());
    assert_eq!(dash.editor.output.report().and_then(|r| r.fault_line), Some(1));

    dash.editor.load("console.log('fixed');");
    dash.editor.run();
    dash.editor.wait();
    assert!(!dash.editor.output.is_failure());
    assert_eq!(dash.editor.output.display_lines(), ["fixed"]);
}

#[test]
fn test_solution_loads_into_editor_and_runs() {
    let mut dash = dashboard();
    dash.select_tab(Tab::Exercises);
    dash.exercises.set_difficulty(Difficulty::Intermediate);
    dash.exercises.new_exercise();
    dash.load_solution();
    assert_eq!(dash.tab, Tab::Editor);
    dash.run_code();
    let result = dash.editor.wait().cloned();
    assert!(matches!(result, Some(ExecutionResult::Output(lines)) if lines.len() == 2));
}

#[test]
fn test_analysis_transition_through_tick() {
    let mut dash = dashboard();
    let t0 = Instant::now();
    dash.start_analysis(t0);
    assert!(dash.analysis.is_analyzing());
    dash.tick(t0 + Duration::from_millis(10));
    assert_eq!(dash.analysis.record().score, 85);
    dash.tick(t0 + Duration::from_millis(50));
    assert!(!dash.analysis.is_analyzing());
    assert_eq!(dash.analysis.record().score, 92);
}

#[test]
fn test_exercise_session_scoring_and_hints() {
    let mut session = ExerciseSession::with_seed(42);
    for difficulty in Difficulty::ALL {
        session.set_difficulty(difficulty);
        session.new_exercise();
        assert!(exercises_for(difficulty).contains(session.exercise()));

        let hints = session.exercise().hints.len();
        for _ in 0..hints + 3 {
            session.next_hint();
        }
        assert_eq!(session.hint_index(), hints - 1);
        assert!(!session.has_more_hints());
    }

    let mut total = 0;
    for difficulty in Difficulty::ALL {
        session.set_difficulty(difficulty);
        total += session.submit();
    }
    assert_eq!(total, 60);
    assert_eq!(session.score(), 60);
}

#[test]
fn test_seeded_sessions_pick_the_same_exercises() {
    let mut a = ExerciseSession::with_seed(9);
    let mut b = ExerciseSession::with_seed(9);
    a.set_difficulty(Difficulty::Beginner);
    b.set_difficulty(Difficulty::Beginner);
    for _ in 0..10 {
        a.new_exercise();
        b.new_exercise();
        assert_eq!(a.exercise().title, b.exercise().title);
    }
}
