//! Tutorial list and detail view

use crate::fixtures::tutorials::{Tutorial, PRACTICE_SNIPPET, TUTORIALS};

#[derive(Debug, Clone, Default)]
pub struct TutorialBrowser {
    selected: usize,
}

impl TutorialBrowser {
    pub fn tutorials(&self) -> &'static [Tutorial] {
        TUTORIALS
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &'static Tutorial {
        &TUTORIALS[self.selected.min(TUTORIALS.len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % TUTORIALS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + TUTORIALS.len() - 1) % TUTORIALS.len();
    }

    pub fn practice_snippet(&self) -> &'static str {
        PRACTICE_SNIPPET
    }
}
