//! Exercise practice: tier selection, hints, solution and score

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::exercises::{exercises_for, Exercise};
use crate::fixtures::Difficulty;

/// Shown in the stats row; progress is not tracked
pub const EXERCISES_COMPLETED: u32 = 12;

#[derive(Debug, Clone)]
pub struct ExerciseSession {
    difficulty: Difficulty,
    current: &'static Exercise,
    hint_index: usize,
    show_solution: bool,
    score: u32,
    rng: StdRng,
}

impl ExerciseSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Session with a reproducible exercise sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        ExerciseSession {
            difficulty: Difficulty::Beginner,
            current: &exercises_for(Difficulty::Beginner)[0],
            hint_index: 0,
            show_solution: false,
            score: 0,
            rng,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn exercise(&self) -> &'static Exercise {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_solution_visible(&self) -> bool {
        self.show_solution
    }

    pub fn hint_index(&self) -> usize {
        self.hint_index
    }

    pub fn current_hint(&self) -> &'static str {
        let hints = self.current.hints;
        hints[self.hint_index.min(hints.len() - 1)]
    }

    pub fn has_more_hints(&self) -> bool {
        self.hint_index + 1 < self.current.hints.len()
    }

    /// Label of the hint button, e.g. `Get Hint (1/3)`
    pub fn hint_label(&self) -> String {
        format!(
            "Get Hint ({}/{})",
            self.hint_index + 1,
            self.current.hints.len()
        )
    }

    /// Change tier; the exercise on screen stays until a new one is drawn
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
    }

    /// Draw a random exercise from the current tier
    pub fn new_exercise(&mut self) {
        let bank = exercises_for(self.difficulty);
        let pick = self.rng.random_range(0..bank.len());
        self.current = &bank[pick];
        self.hint_index = 0;
        self.show_solution = false;
        debug!("new {} exercise: {}", self.difficulty, self.current.title);
    }

    /// Reveal the next hint; stays on the last one
    pub fn next_hint(&mut self) -> bool {
        if self.has_more_hints() {
            self.hint_index += 1;
            true
        } else {
            false
        }
    }

    pub fn toggle_solution(&mut self) {
        self.show_solution = !self.show_solution;
    }

    /// Award the tier's points and reveal the solution
    pub fn submit(&mut self) -> u32 {
        let points = self.difficulty.points();
        self.score += points;
        self.show_solution = true;
        points
    }
}

impl Default for ExerciseSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_are_capped() {
        let mut session = ExerciseSession::with_seed(1);
        assert_eq!(session.hint_label(), "Get Hint (1/3)");
        assert!(session.next_hint());
        assert!(session.next_hint());
        assert!(!session.next_hint());
        assert_eq!(session.hint_index(), 2);
        assert_eq!(session.current_hint(), "Boolean values are true or false");
    }

    #[test]
    fn test_score_by_tier() {
        let mut session = ExerciseSession::with_seed(1);
        assert_eq!(session.submit(), 10);
        session.set_difficulty(Difficulty::Intermediate);
        assert_eq!(session.submit(), 20);
        session.cycle_difficulty();
        assert_eq!(session.submit(), 30);
        assert_eq!(session.score(), 60);
        assert!(session.is_solution_visible());
    }

    #[test]
    fn test_new_exercise_resets_hint_and_solution() {
        let mut session = ExerciseSession::with_seed(3);
        session.set_difficulty(Difficulty::Intermediate);
        session.next_hint();
        session.toggle_solution();
        session.new_exercise();
        assert_eq!(session.hint_index(), 0);
        assert!(!session.is_solution_visible());
        assert!(exercises_for(Difficulty::Intermediate).contains(session.exercise()));
    }

    #[test]
    fn test_solution_toggle() {
        let mut session = ExerciseSession::with_seed(5);
        assert!(!session.is_solution_visible());
        session.toggle_solution();
        assert!(session.is_solution_visible());
        session.toggle_solution();
        assert!(!session.is_solution_visible());
    }
}
