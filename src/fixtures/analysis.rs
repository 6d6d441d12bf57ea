//! Canned code-analysis records
//!
//! No analysis is performed; the dashboard shows [`INITIAL_ANALYSIS`] until
//! the learner asks for a review and then switches to [`REVIEWED_ANALYSIS`].

use super::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisRecord {
    pub summary: &'static str,
    pub suggestions: &'static [&'static str],
    pub errors: &'static [&'static str],
    pub complexity: Difficulty,
    /// Out of 100
    pub score: u8,
}

pub static INITIAL_ANALYSIS: AnalysisRecord = AnalysisRecord {
    summary: "Your code demonstrates good understanding of JavaScript fundamentals including functions, template literals, and array methods.",
    suggestions: &[
        "Consider adding error handling for edge cases",
        "Variable naming could be more descriptive",
        "Consider using const instead of let for variables that don't change",
    ],
    errors: &[],
    complexity: Difficulty::Beginner,
    score: 85,
};

pub static REVIEWED_ANALYSIS: AnalysisRecord = AnalysisRecord {
    summary: "Your code shows excellent use of modern JavaScript features. The function is well-structured and the array manipulation demonstrates good understanding of functional programming concepts.",
    suggestions: &[
        "Consider adding JSDoc comments for better documentation",
        "You could use more descriptive variable names like 'doubledNumbers'",
        "Try using const for variables that don't change their reference",
    ],
    errors: &[],
    complexity: Difficulty::Intermediate,
    score: 92,
};

pub const QUICK_ACTIONS: [&str; 4] = [
    "Generate Documentation",
    "Add Error Handling",
    "Optimize Performance",
    "Add Unit Tests",
];
