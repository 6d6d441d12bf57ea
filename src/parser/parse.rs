//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing variable and function declarations
//! - `statements`: Parsing statements (if, while, for, etc.)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Statement terminators follow a simplified automatic semicolon insertion:
//! a `;` may be omitted when the next token starts a new line, is a `}` or is
//! the end of input.
//!
//! Nesting is bounded: every expression, unary operand and statement entered
//! counts against [`MAX_PARSE_DEPTH`], so pathological input such as thousands
//! of `(` fails with a `SyntaxError` instead of exhausting the stack.

use crate::interpreter::constants::MAX_PARSE_DEPTH;
use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SyntaxError: {} (line {}, column {})",
            self.message, self.location.line, self.location.column
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for LearnScript
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Nesting levels currently open
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parser over a nested source fragment whose first character sits at
    /// `start`; the fragment continues counting from this parser's depth
    pub(crate) fn fragment(&self, source: &str, start: SourceLocation) -> Result<Self, ParseError> {
        let tokens = Lexer::starting_at(source, start).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: self.depth,
        })
    }

    /// Parse the entire program (top-level statements)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.nodes.push(stmt);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_ahead(n)
            .map(|t| std::mem::discriminant(&t.kind) == std::mem::discriminant(kind))
            .unwrap_or(false)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        // The token stream always ends with Eof and `advance` never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    /// Run `parse` one nesting level deeper
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return self.error("Maximum nesting depth exceeded");
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            message: message.into(),
            location: self.current_location(),
        })
    }

    pub(crate) fn unexpected<T>(&self) -> Result<T, ParseError> {
        let token = self.peek();
        let message = match &token.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            kind => format!("Unexpected token {}", kind),
        };
        self.error(message)
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            self.error(format!("{}, found {}", message, self.peek()))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LParen, &format!("Expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RParen, &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LBrace, &format!("Expected '{{' {ctx}"))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RBrace, &format!("Expected '}}' {ctx}"))
    }

    /// Consume a statement terminator, allowing it to be omitted before a
    /// line break, a closing brace or the end of input
    pub(crate) fn consume_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Semicolon) {
            return Ok(());
        }
        let next = self.peek();
        if next.newline_before || matches!(next.kind, TokenKind::RBrace | TokenKind::Eof) {
            return Ok(());
        }
        self.error(format!("Expected ';' {}, found {}", ctx, next))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            self.error(format!("Expected identifier, found {}", self.peek()))
        }
    }

    /// Property name after `.` or as an object key; keywords are allowed here
    pub(crate) fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            kind => match kind.keyword_text() {
                Some(text) => text.to_string(),
                None => return self.error(format!("Expected property name, found {}", self.peek())),
            },
        };
        self.advance();
        Ok(name)
    }

    /// Reject reserved words this interpreter does not implement
    pub(crate) fn reject_unsupported(&self) -> Result<(), ParseError> {
        let feature = match self.peek().kind {
            TokenKind::Class => "Classes are",
            TokenKind::Async | TokenKind::Await => "async/await is",
            TokenKind::Yield => "Generators are",
            TokenKind::Ellipsis => "Spread syntax is",
            _ => return Ok(()),
        };
        self.error(format!("{} not supported", feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::new(source).and_then(|mut p| p.parse_program()) {
            Ok(_) => panic!("Expected parse error for {:?}", source),
            Err(e) => e,
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("function main() { return 0; }");

        assert_eq!(program.nodes.len(), 1);
        match &program.nodes[0] {
            AstNode::FunctionDecl { func, .. } => {
                assert_eq!(func.name.as_deref(), Some("main"));
                assert_eq!(func.params.len(), 0);
                assert!(matches!(&func.body, FunctionBody::Block(body) if body.len() == 1));
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_moderate_nesting_parses() {
        use crate::interpreter::test_support::run;
        let source = format!("console.log({}1{})", "(".repeat(200), ")".repeat(200));
        assert_eq!(run(&source), ["1"]);
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        use crate::interpreter::test_support::run_err;
        let n = 100_000;
        let sources = [
            format!("{}1{}", "(".repeat(n), ")".repeat(n)),
            format!("{}1{}", "[".repeat(n), "]".repeat(n)),
            "{".repeat(n),
            format!("let x = {}", "{a:".repeat(n)),
            format!("{}true", "!".repeat(n)),
            format!("2{}", " ** 2".repeat(n)),
            "if (true) ".repeat(n),
        ];
        for source in &sources {
            let err = run_err(source);
            assert!(
                err.starts_with("SyntaxError: Maximum nesting depth exceeded"),
                "{}",
                err
            );
        }
    }

    #[test]
    fn test_optional_semicolons() {
        let program = parse("let x = 1\nlet y = 2\nconsole.log(x + y)");
        assert_eq!(program.nodes.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_on_same_line() {
        let err = parse_err("let x = 1 let y = 2");
        assert!(err.message.contains("Expected ';'"));
        assert_eq!(err.location, SourceLocation::new(1, 11));
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_err("let = 5;");
        assert_eq!(
            err.to_string(),
            "SyntaxError: Expected identifier, found '=' (line 1, column 5)"
        );
    }

    #[test]
    fn test_unsupported_class() {
        let err = parse_err("class Foo {}");
        assert_eq!(err.message, "Classes are not supported");
    }
}
