//! Tutorial catalog

use super::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tutorial {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
    pub difficulty: Difficulty,
    /// Percentage in `0..=100`
    pub progress: u8,
    pub completed: bool,
    pub steps: &'static [TutorialStep],
}

impl Tutorial {
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }
}

const fn step(title: &'static str, completed: bool) -> TutorialStep {
    TutorialStep { title, completed }
}

pub static TUTORIALS: &[Tutorial] = &[
    Tutorial {
        id: 1,
        title: "JavaScript Fundamentals",
        description: "Learn the basics of JavaScript including variables, functions, and control structures",
        duration: "30 min",
        difficulty: Difficulty::Beginner,
        progress: 75,
        completed: false,
        steps: &[
            step("Variables and Data Types", true),
            step("Functions and Scope", true),
            step("Control Structures", true),
            step("Arrays and Objects", false),
            step("Practice Exercises", false),
        ],
    },
    Tutorial {
        id: 2,
        title: "DOM Manipulation",
        description: "Master DOM manipulation techniques for interactive web development",
        duration: "45 min",
        difficulty: Difficulty::Intermediate,
        progress: 25,
        completed: false,
        steps: &[
            step("Selecting Elements", true),
            step("Modifying Content", false),
            step("Event Handling", false),
            step("Dynamic Styling", false),
            step("Advanced Techniques", false),
        ],
    },
    Tutorial {
        id: 3,
        title: "Async JavaScript",
        description: "Understanding promises, async/await, and handling asynchronous operations",
        duration: "60 min",
        difficulty: Difficulty::Advanced,
        progress: 0,
        completed: false,
        steps: &[
            step("Callbacks and Promises", false),
            step("Async/Await Syntax", false),
            step("Error Handling", false),
            step("Fetch API", false),
            step("Real-world Examples", false),
        ],
    },
];

/// "Try It Yourself" snippet shared by every tutorial
pub const PRACTICE_SNIPPET: &str = "// Practice: Create a function that calculates the area of a rectangle
function calculateArea(length, width) {
  // Your code here
  
}

// Test your function
console.log(calculateArea(5, 3)); // Should output: 15";
