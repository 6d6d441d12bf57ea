//! LearnScript source code parser
//!
//! This module transforms script text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser core (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported JavaScript Subset
//!
//! The parser supports a pedagogical subset of JavaScript:
//! - Bindings: `let`, `const`, `var`, function declarations, arrow functions
//! - Statements: control flow (`if`, `while`, `do-while`, `for`, `for-of`,
//!   `for-in`, `switch`), `try`/`catch`/`finally`, `throw`
//! - Expressions: arithmetic, logical, nullish, bitwise, ternary, template
//!   literals, array/object literals, member access, calls, `new`
//! - No classes, async functions, generators, destructuring, spread or regex
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{ParseError, Parser};
