//! Dashboard view state
//!
//! The dashboard is four tabs over one shared editor:
//! - [`editor`]: source buffer, background runs and the output view
//! - [`analysis`]: the simulated code review
//! - [`tutorials`]: tutorial catalog browser
//! - [`exercises`]: tiered practice exercises with hints and scoring
//!
//! Everything here is plain state with no terminal code, so each transition
//! can be tested directly. The `ui` module draws it and maps keys onto it.

pub mod analysis;
pub mod buffer;
pub mod editor;
pub mod exercises;
pub mod tutorials;

use std::time::{Duration, Instant};

use crate::runner::{CodeRunner, ExecutionResult};
use analysis::AnalysisSession;
use editor::{EditorSession, RunRequest};
use exercises::ExerciseSession;
use tutorials::TutorialBrowser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Editor,
    Analysis,
    Tutorials,
    Exercises,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Editor, Tab::Analysis, Tab::Tutorials, Tab::Exercises];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Editor => "Code Editor",
            Tab::Analysis => "AI Analysis",
            Tab::Tutorials => "Tutorials",
            Tab::Exercises => "Exercises",
        }
    }

    /// Name used in the config file
    pub fn key(self) -> &'static str {
        match self {
            Tab::Editor => "editor",
            Tab::Analysis => "analysis",
            Tab::Tutorials => "tutorials",
            Tab::Exercises => "exercises",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|t| t.key().eq_ignore_ascii_case(key))
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Editor => 0,
            Tab::Analysis => 1,
            Tab::Tutorials => 2,
            Tab::Exercises => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// The whole dashboard
pub struct Dashboard {
    pub tab: Tab,
    pub editor: EditorSession,
    pub analysis: AnalysisSession,
    pub tutorials: TutorialBrowser,
    pub exercises: ExerciseSession,
    /// One-line message for the status bar
    pub status_message: String,
}

impl Dashboard {
    pub fn new(runner: CodeRunner, analysis_delay: Duration, start_tab: Tab) -> Self {
        Dashboard {
            tab: start_tab,
            editor: EditorSession::new(runner),
            analysis: AnalysisSession::new(analysis_delay),
            tutorials: TutorialBrowser::default(),
            exercises: ExerciseSession::new(),
            status_message: String::from("Ready!"),
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn run_code(&mut self) {
        self.status_message = match self.editor.run() {
            RunRequest::Started => "Running...".to_string(),
            RunRequest::Busy => "Already running; press Esc to cancel".to_string(),
        };
    }

    pub fn cancel_run(&mut self) {
        if self.editor.cancel() {
            self.status_message = "Cancelling...".to_string();
        }
    }

    pub fn reset_code(&mut self) {
        self.editor.reset();
        self.status_message = "Editor reset".to_string();
    }

    /// Put `source` in the editor and switch to it
    pub fn load_into_editor(&mut self, source: &str, what: &str) {
        self.editor.load(source);
        self.tab = Tab::Editor;
        self.status_message = format!("Loaded {} into the editor", what);
    }

    pub fn load_practice(&mut self) {
        let snippet = self.tutorials.practice_snippet();
        self.load_into_editor(snippet, "practice snippet");
    }

    pub fn load_solution(&mut self) {
        let solution = self.exercises.exercise().solution;
        self.load_into_editor(solution, "solution");
    }

    pub fn start_analysis(&mut self, now: Instant) {
        if self.analysis.start(now) {
            self.status_message = "Analyzing code...".to_string();
        }
    }

    pub fn submit_exercise(&mut self) {
        let points = self.exercises.submit();
        self.status_message = format!("+{} points! Score: {}", points, self.exercises.score());
    }

    /// Advance background work: collect a finished run, finish a review
    pub fn tick(&mut self, now: Instant) {
        let finished_run = self.editor.poll().map(|result| match result {
            ExecutionResult::Failure(_) => "Run failed".to_string(),
            ExecutionResult::Output(_) => "Run complete".to_string(),
        });
        if let Some(message) = finished_run {
            let elapsed = self.editor.output.report().map(|r| r.elapsed).unwrap_or_default();
            self.status_message = format!("{} in {} ms", message, elapsed.as_millis());
        }

        if self.analysis.tick(now) {
            self.status_message = "Analysis complete".to_string();
        }
    }
}
