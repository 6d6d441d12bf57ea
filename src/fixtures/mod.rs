//! Static content shown by the dashboard
//!
//! Everything here is an immutable `&'static` table: the tutorial catalog, the
//! exercise bank, the two analysis records and the editor snippets. Views
//! borrow from these tables and never copy or mutate them.

pub mod analysis;
pub mod exercises;
pub mod tutorials;

use std::fmt;

pub const PRODUCT_NAME: &str = "CodeMaster AI";
pub const TAGLINE: &str = "Intelligent Code Learning Platform";

/// Editor contents at startup
pub const WELCOME_SNIPPET: &str = r#"// Welcome to CodeMaster AI!
// Try writing some JavaScript code below

function greetUser(name) {
  return `Hello, ${name}! Welcome to coding!`;
}

// Call the function
console.log(greetUser("Developer"));

// Try modifying the code and see what happens!
let numbers = [1, 2, 3, 4, 5];
let doubled = numbers.map(n => n * 2);
console.log("Doubled numbers:", doubled);"#;

/// Editor contents after a reset
pub const RESET_SNIPPET: &str = r#"// Welcome to CodeMaster AI!
// Try writing some JavaScript code below

function greetUser(name) {
  return `Hello, ${name}! Welcome to coding!`;
}

// Call the function
console.log(greetUser("Developer"));"#;

/// Difficulty tier shared by tutorials and exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Points awarded for submitting an exercise of this tier
    pub fn points(self) -> u32 {
        match self {
            Difficulty::Beginner => 10,
            Difficulty::Intermediate => 20,
            Difficulty::Advanced => 30,
        }
    }

    /// The next tier, wrapping from Advanced back to Beginner
    pub fn next(self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate => Difficulty::Advanced,
            Difficulty::Advanced => Difficulty::Beginner,
        }
    }

    /// Parse a lowercase or capitalized tier name
    pub fn from_name(name: &str) -> Option<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
