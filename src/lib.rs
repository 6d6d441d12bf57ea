//! # Introduction
//!
//! CodeMaster is a terminal code-learning dashboard. Its core is a sandboxed
//! runner for LearnScript, a teaching subset of JavaScript: the learner edits
//! a script, runs it, and sees every `console.log` line or the error that
//! stopped it. Tutorials, exercises and a simulated code review round out the
//! dashboard.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → OutputSink → ExecutionResult
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`interpreter`]: walks the AST under a step, time, depth and output
//!    budget, writing print-style calls to an injected sink.
//! 3. [`memory`]: runtime values, lexical scopes and the heap registry that
//!    breaks reference cycles when a run ends.
//! 4. [`runner`]: the run contract. Each run gets a fresh sink and
//!    interpreter on its own large-stack thread and yields `Output(lines)` or
//!    `Failure("Error: ...")`.
//! 5. [`dashboard`]: view state for the four tabs, free of terminal code.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported language
//!
//! Bindings: `let`, `const`, `var`, functions, arrows, closures.
//! Control flow: `if/else`, `while`, `do-while`, `for`, `for-of`, `for-in`,
//! `switch`, `try/catch/finally`, `throw`.
//! Values: numbers, strings, booleans, `null`, `undefined`, arrays, objects,
//! functions. Built-ins: `console`, `Math`, `JSON.stringify`, `Object`,
//! `Array.isArray`, conversions and the common array, string and number
//! methods.
//!
//! ## Differences from JavaScript
//!
//! - Strings are sequences of Unicode scalar values, not UTF-16 code units:
//!   `'😀'.length` is `1`, indexing and `slice` count chars, and the
//!   collection-length limit measures strings in chars too.
//! - Source nesting is capped (`SyntaxError: Maximum nesting depth
//!   exceeded`), and so is the depth `JSON.stringify` will walk (`RangeError:
//!   Maximum call stack size exceeded`).
//! - Classes, `async`/`await`, generators and spread syntax are rejected with
//!   a `SyntaxError`.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod runner;
pub mod ui;
