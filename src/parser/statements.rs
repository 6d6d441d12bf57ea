//! Statement parsing implementation
//!
//! This module handles parsing of all LearnScript statement types:
//!
//! - Declarations: `let x = 42`, `const f = () => 1`, `function f() {}`
//! - Control flow: `if`, `while`, `do-while`, `for`, `for-of`, `for-in`, `switch`
//! - Jump statements: `return`, `break`, `continue`, `throw`
//! - Exception handling: `try`/`catch`/`finally`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | function_decl | if_stmt | while_stmt | for_stmt
//!             | do_while_stmt | switch_stmt | return_stmt | throw_stmt
//!             | try_stmt | break_stmt | continue_stmt | block | ";" | expr_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        self.nested(Self::parse_statement_level)
    }

    fn parse_statement_level(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        self.reject_unsupported()?;

        if let Some(kind) = self.declaration_keyword() {
            self.advance();
            let decl = self.parse_variable_declaration(kind, loc)?;
            self.consume_semicolon("after variable declaration")?;
            return Ok(decl);
        }

        if self.match_token(&TokenKind::Function) {
            return self.parse_function_declaration(loc);
        }

        if self.match_token(&TokenKind::Return) {
            return self.parse_return_statement();
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement();
        }

        if self.match_token(&TokenKind::Do) {
            return self.parse_do_while_statement();
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement();
        }

        if self.match_token(&TokenKind::Switch) {
            return self.parse_switch_statement();
        }

        if self.match_token(&TokenKind::Throw) {
            return self.parse_throw_statement();
        }

        if self.match_token(&TokenKind::Try) {
            return self.parse_try_statement();
        }

        if self.match_token(&TokenKind::Break) {
            self.consume_semicolon("after 'break'")?;
            return Ok(AstNode::Break { location: loc });
        }

        if self.match_token(&TokenKind::Continue) {
            self.consume_semicolon("after 'continue'")?;
            return Ok(AstNode::Continue { location: loc });
        }

        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(AstNode::Block {
                statements,
                location: loc,
            });
        }

        if self.match_token(&TokenKind::Semicolon) {
            return Ok(AstNode::Empty { location: loc });
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.consume_semicolon("after expression")?;
        Ok(AstNode::ExpressionStatement {
            expr: Box::new(expr),
            location: loc,
        })
    }

    fn declaration_keyword(&self) -> Option<DeclKind> {
        match self.peek().kind {
            TokenKind::Let => Some(DeclKind::Let),
            TokenKind::Const => Some(DeclKind::Const),
            TokenKind::Var => Some(DeclKind::Var),
            _ => None,
        }
    }

    /// Parse return statement; a line break right after `return` ends it
    fn parse_return_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        let next = self.peek();
        let bare = next.newline_before
            || matches!(
                next.kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            );

        let expr = if bare {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.consume_semicolon("after return")?;

        Ok(AstNode::Return {
            expr,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(AstNode::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after while condition")?;

        let body = self.parse_statement_or_block()?;

        Ok(AstNode::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        let body = self.parse_statement_or_block()?;

        self.expect_token(&TokenKind::While, "Expected 'while' after do body")?;
        self.expect_lparen("after 'while'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after do-while condition")?;
        // `do ... while (c)` may be followed directly by another statement
        self.match_token(&TokenKind::Semicolon);

        Ok(AstNode::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse `for`, `for-of` and `for-in` statements
    fn parse_for_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'for'")?;

        if let Some((kind, name)) = self.for_each_head() {
            return self.parse_for_each(loc, kind, name);
        }

        // Init (optional)
        let init = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if let Some(kind) = self.declaration_keyword() {
            let decl_loc = self.current_location();
            self.advance();
            let decl = self.parse_variable_declaration(kind, decl_loc)?;
            self.expect_token(&TokenKind::Semicolon, "Expected ';' after for init")?;
            Some(Box::new(decl))
        } else {
            let expr = self.parse_expression()?;
            self.expect_token(&TokenKind::Semicolon, "Expected ';' after for init")?;
            Some(Box::new(expr))
        };

        // Condition (optional)
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_token(&TokenKind::Semicolon, "Expected ';' after for condition")?;

        // Increment (optional)
        let increment = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.expect_rparen("after for clauses")?;

        let body = self.parse_statement_or_block()?;

        Ok(AstNode::For {
            init,
            condition,
            increment,
            body,
            location: loc,
        })
    }

    /// Detect `[let|const|var] name of|in` at the start of a for head
    fn for_each_head(&self) -> Option<(Option<DeclKind>, String)> {
        let (kind, offset) = match self.declaration_keyword() {
            Some(kind) => (Some(kind), 1),
            None => (None, 0),
        };
        let name = match self.peek_ahead(offset).map(|t| &t.kind) {
            Some(TokenKind::Ident(name)) => name.clone(),
            _ => return None,
        };
        match self.peek_ahead(offset + 1).map(|t| &t.kind) {
            Some(TokenKind::In) => Some((kind, name)),
            Some(TokenKind::Ident(word)) if word == "of" => Some((kind, name)),
            _ => None,
        }
    }

    fn parse_for_each(
        &mut self,
        loc: SourceLocation,
        kind: Option<DeclKind>,
        name: String,
    ) -> Result<AstNode, ParseError> {
        if kind.is_some() {
            self.advance();
        }
        self.advance(); // loop variable

        let is_in = self.match_token(&TokenKind::In);
        if !is_in {
            self.advance(); // contextual 'of'
        }

        let target = Box::new(self.parse_expression()?);
        self.expect_rparen("after for-each head")?;
        let body = self.parse_statement_or_block()?;

        Ok(if is_in {
            AstNode::ForIn {
                kind,
                name,
                object: target,
                body,
                location: loc,
            }
        } else {
            AstNode::ForOf {
                kind,
                name,
                iterable: target,
                body,
                location: loc,
            }
        })
    }

    /// Parse switch statement
    fn parse_switch_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'switch'")?;
        let expr = Box::new(self.parse_expression()?);
        self.expect_rparen("after switch expression")?;
        self.expect_lbrace("before switch body")?;

        let mut cases = Vec::new();
        let mut seen_default = false;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.match_token(&TokenKind::Case) {
                let case_loc = self.previous_location();
                let value = self.parse_expression()?;
                self.expect_token(&TokenKind::Colon, "Expected ':' after case value")?;
                let statements = self.parse_case_body()?;

                cases.push(CaseNode::Case {
                    value: Box::new(value),
                    statements,
                    location: case_loc,
                });
            } else if self.match_token(&TokenKind::Default) {
                let default_loc = self.previous_location();
                if seen_default {
                    return Err(ParseError {
                        message: "More than one default clause in switch statement".to_string(),
                        location: default_loc,
                    });
                }
                seen_default = true;
                self.expect_token(&TokenKind::Colon, "Expected ':' after 'default'")?;
                let statements = self.parse_case_body()?;

                cases.push(CaseNode::Default {
                    statements,
                    location: default_loc,
                });
            } else {
                return self.error("Expected 'case' or 'default' in switch body");
            }
        }

        self.expect_rbrace("after switch body")?;

        Ok(AstNode::Switch {
            expr,
            cases,
            location: loc,
        })
    }

    fn parse_case_body(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Case)
            && !self.check(&TokenKind::Default)
            && !self.check(&TokenKind::RBrace)
            && !self.is_at_end()
        {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse throw statement
    fn parse_throw_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        if self.peek().newline_before {
            return self.error("Illegal newline after throw");
        }
        let expr = Box::new(self.parse_expression()?);
        self.consume_semicolon("after throw")?;

        Ok(AstNode::Throw {
            expr,
            location: loc,
        })
    }

    /// Parse try statement with optional catch binding and finally block
    fn parse_try_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lbrace("after 'try'")?;
        let block = self.parse_block_statements()?;
        self.expect_rbrace("after try block")?;

        let mut catch_param = None;
        let catch_block = if self.match_token(&TokenKind::Catch) {
            if self.match_token(&TokenKind::LParen) {
                catch_param = Some(self.expect_identifier()?);
                self.expect_rparen("after catch parameter")?;
            }
            self.expect_lbrace("before catch block")?;
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after catch block")?;
            Some(statements)
        } else {
            None
        };

        let finally_block = if self.match_token(&TokenKind::Finally) {
            self.expect_lbrace("after 'finally'")?;
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after finally block")?;
            Some(statements)
        } else {
            None
        };

        if catch_block.is_none() && finally_block.is_none() {
            return self.error("Missing catch or finally after try");
        }

        Ok(AstNode::Try {
            block,
            catch_param,
            catch_block,
            finally_block,
            location: loc,
        })
    }

    /// Parse statement or block (for if/while/for bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<AstNode>, ParseError> {
        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            Ok(statements)
        } else {
            // Single statement
            Ok(vec![self.parse_statement()?])
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_one(source: &str) -> AstNode {
        let mut program = Parser::new(source).unwrap().parse_program().unwrap();
        assert_eq!(program.nodes.len(), 1, "expected a single statement");
        program.nodes.remove(0)
    }

    #[test]
    fn test_for_of_with_const() {
        match parse_one("for (const n of [1, 2]) { console.log(n) }") {
            AstNode::ForOf { kind, name, body, .. } => {
                assert_eq!(kind, Some(DeclKind::Const));
                assert_eq!(name, "n");
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for-of, got {:?}", other),
        }
    }

    #[test]
    fn test_for_in_without_declaration() {
        assert!(matches!(
            parse_one("for (k in obj) {}"),
            AstNode::ForIn { kind: None, .. }
        ));
    }

    #[test]
    fn test_classic_for() {
        match parse_one("for (let i = 0; i < 3; i++) sum += i;") {
            AstNode::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                assert!(matches!(init.as_deref(), Some(AstNode::VarDecl { .. })));
                assert!(condition.is_some());
                assert!(increment.is_some());
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_return_followed_by_newline() {
        match parse_one("function f() {\n  return\n  42\n}") {
            AstNode::FunctionDecl { func, .. } => match &func.body {
                FunctionBody::Block(body) => {
                    assert_eq!(body.len(), 2);
                    assert!(matches!(body[0], AstNode::Return { expr: None, .. }));
                }
                _ => panic!("Expected block body"),
            },
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_try_catch_finally() {
        match parse_one("try { risky() } catch (e) { log(e) } finally { done() }") {
            AstNode::Try {
                catch_param,
                catch_block,
                finally_block,
                ..
            } => {
                assert_eq!(catch_param.as_deref(), Some("e"));
                assert!(catch_block.is_some());
                assert!(finally_block.is_some());
            }
            other => panic!("Expected try, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_with_fallthrough_cases() {
        match parse_one("switch (x) { case 1: case 2: y = 1; break; default: y = 0 }") {
            AstNode::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(matches!(&cases[0], CaseNode::Case { statements, .. } if statements.is_empty()));
                assert!(matches!(&cases[2], CaseNode::Default { .. }));
            }
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_try_without_handler_is_error() {
        assert!(Parser::new("try { x() }").unwrap().parse_program().is_err());
    }
}
