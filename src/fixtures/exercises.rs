//! Exercise bank, grouped by tier

use super::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub title: &'static str,
    pub description: &'static str,
    pub task: &'static str,
    pub solution: &'static str,
    /// Never empty
    pub hints: &'static [&'static str],
}

static BEGINNER: &[Exercise] = &[
    Exercise {
        title: "Variable Declaration",
        description: "Create variables of different types and print their values",
        task: "Declare a string variable with your name, a number variable with your age, and a boolean variable indicating if you like coding. Print all three variables.",
        solution: "let name = \"Alice\";\nlet age = 25;\nlet likesCoding = true;\n\nconsole.log(\"Name:\", name);\nconsole.log(\"Age:\", age);\nconsole.log(\"Likes coding:\", likesCoding);",
        hints: &[
            "Use let or const to declare variables",
            "Remember to use quotes for strings",
            "Boolean values are true or false",
        ],
    },
    Exercise {
        title: "Simple Function",
        description: "Write a function that greets a user by name",
        task: "Create a function called 'greetUser' that takes a name as parameter and returns a greeting message.",
        solution: "function greetUser(name) {\n  return \"Hello, \" + name + \"! Welcome!\";\n}\n\nconsole.log(greetUser(\"Alice\"));",
        hints: &[
            "Functions use the 'function' keyword",
            "Use 'return' to send back a value",
            "Parameters go inside parentheses",
        ],
    },
];

static INTERMEDIATE: &[Exercise] = &[
    Exercise {
        title: "Array Manipulation",
        description: "Filter and transform array data using built-in methods",
        task: "Given an array of numbers [1, 2, 3, 4, 5, 6, 7, 8, 9, 10], create a new array containing only even numbers, then double each even number.",
        solution: "let numbers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];\nlet evenNumbers = numbers.filter(n => n % 2 === 0);\nlet doubledEvens = evenNumbers.map(n => n * 2);\n\nconsole.log(\"Even numbers:\", evenNumbers);\nconsole.log(\"Doubled evens:\", doubledEvens);",
        hints: &[
            "Use filter() to select elements",
            "Use map() to transform elements",
            "Modulo operator % checks for even numbers",
        ],
    },
    Exercise {
        title: "Object Methods",
        description: "Create an object with methods to calculate area and perimeter",
        task: "Create a 'rectangle' object with width and height properties, and methods to calculate area and perimeter.",
        solution: "let rectangle = {\n  width: 5,\n  height: 3,\n  calculateArea() {\n    return this.width * this.height;\n  },\n  calculatePerimeter() {\n    return 2 * (this.width + this.height);\n  }\n};\n\nconsole.log(\"Area:\", rectangle.calculateArea());\nconsole.log(\"Perimeter:\", rectangle.calculatePerimeter());",
        hints: &[
            "Objects use curly braces {}",
            "Methods are functions inside objects",
            "Use 'this' to access object properties",
        ],
    },
];

static ADVANCED: &[Exercise] = &[Exercise {
    title: "Async Data Processing",
    description: "Handle asynchronous operations with promises and async/await",
    task: "Create an async function that simulates fetching user data with a 2-second delay, then processes and returns the data.",
    solution: "async function fetchUserData(userId) {\n  console.log(\"Fetching user data...\");\n  \n  // Simulate API delay\n  await new Promise(resolve => setTimeout(resolve, 2000));\n  \n  let userData = {\n    id: userId,\n    name: \"Alice Smith\",\n    email: \"alice@example.com\"\n  };\n  \n  return userData;\n}\n\n// Usage\nfetchUserData(123).then(data => {\n  console.log(\"User data:\", data);\n});",
    hints: &[
        "Use 'async' keyword before function",
        "Use 'await' for promises",
        "setTimeout can simulate delays",
    ],
}];

/// Exercises for a tier; never empty
pub fn exercises_for(difficulty: Difficulty) -> &'static [Exercise] {
    match difficulty {
        Difficulty::Beginner => BEGINNER,
        Difficulty::Intermediate => INTERMEDIATE,
        Difficulty::Advanced => ADVANCED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tier_has_exercises_with_hints() {
        for difficulty in Difficulty::ALL {
            let bank = exercises_for(difficulty);
            assert!(!bank.is_empty());
            assert!(bank.iter().all(|e| !e.hints.is_empty()));
        }
    }
}
