//! Declaration parsing implementation
//!
//! This module handles parsing of bindings and function definitions:
//!
//! - Variable declarations: `let a = 1, b;`, `const c = 2;`, `var d;`
//! - Function declarations and expressions: `function name(params) { ... }`
//! - Arrow functions: `x => x * 2`, `(a, b = 1) => { ... }`
//! - Parameter lists with default values
//!
//! # Grammar
//!
//! ```text
//! var_decl     ::= ("let" | "const" | "var") declarator ("," declarator)*
//! declarator   ::= identifier ("=" assignment)?
//! function     ::= "function" identifier? "(" params ")" "{" statements "}"
//! arrow        ::= (identifier | "(" params ")") "=>" (assignment | block)
//! params       ::= (identifier ("=" assignment)?) ("," ...)*
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use std::rc::Rc;

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse the declarators after a `let`/`const`/`var` keyword (no terminator)
    pub(crate) fn parse_variable_declaration(
        &mut self,
        kind: DeclKind,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let mut declarators = Vec::new();

        loop {
            let decl_loc = self.current_location();
            if matches!(self.peek().kind, TokenKind::LBrace | TokenKind::LBracket) {
                return self.error("Destructuring declarations are not supported");
            }
            let name = self.expect_identifier()?;

            let init = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };

            if kind == DeclKind::Const && init.is_none() {
                return Err(ParseError {
                    message: "Missing initializer in const declaration".to_string(),
                    location: decl_loc,
                });
            }

            declarators.push(Declarator {
                name,
                init,
                location: decl_loc,
            });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(AstNode::VarDecl {
            kind,
            declarators,
            location: loc,
        })
    }

    /// Parse function declaration: function name(params) { body }
    pub(crate) fn parse_function_declaration(
        &mut self,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let name = self.expect_identifier()?;
        let func = self.parse_function_rest(Some(name), loc)?;

        Ok(AstNode::FunctionDecl {
            func: Rc::new(func),
            location: loc,
        })
    }

    /// Parse `(params) { body }` of a function or method whose name is known
    pub(crate) fn parse_function_rest(
        &mut self,
        name: Option<String>,
        loc: SourceLocation,
    ) -> Result<FunctionDef, ParseError> {
        self.expect_lparen("after function name")?;
        let params = self.parse_params()?;
        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok(FunctionDef {
            name,
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
            location: loc,
        })
    }

    /// Parse function parameters; the opening parenthesis is already consumed
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params: Vec<Param> = Vec::new();

        if self.match_token(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            self.reject_unsupported()?;
            let param_loc = self.current_location();
            let name = self.expect_identifier()?;
            if params.iter().any(|p| p.name == name) {
                return Err(ParseError {
                    message: format!("Duplicate parameter name '{}'", name),
                    location: param_loc,
                });
            }

            let default = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            params.push(Param { name, default });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            // Trailing comma
            if self.check(&TokenKind::RParen) {
                break;
            }
        }

        self.expect_rparen("after parameters")?;
        Ok(params)
    }

    /// True when the tokens at the cursor start an arrow function
    pub(crate) fn is_arrow_ahead(&self) -> bool {
        match self.peek().kind {
            TokenKind::Ident(_) => self.check_ahead(1, &TokenKind::Arrow),
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut offset = 0;
                while let Some(token) = self.peek_ahead(offset) {
                    match token.kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self.check_ahead(offset + 1, &TokenKind::Arrow);
                            }
                        }
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    offset += 1;
                }
                false
            }
            _ => false,
        }
    }

    /// Parse an arrow function; the cursor is on its first token
    pub(crate) fn parse_arrow_function(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let params = if self.match_token(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            let name = self.expect_identifier()?;
            vec![Param {
                name,
                default: None,
            }]
        };

        if self.peek().newline_before {
            return self.error("Line break before '=>' in arrow function");
        }
        self.expect_token(&TokenKind::Arrow, "Expected '=>' after arrow parameters")?;

        let body = if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after arrow function body")?;
            FunctionBody::Block(statements)
        } else {
            FunctionBody::Expression(Box::new(self.parse_assignment()?))
        };

        Ok(AstNode::FunctionExpr {
            func: Rc::new(FunctionDef {
                name: None,
                params,
                body,
                is_arrow: true,
                location: loc,
            }),
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_err_message(source: &str) -> String {
        match Parser::new(source).and_then(|mut p| p.parse_program()) {
            Ok(_) => panic!("Expected parse error for {:?}", source),
            Err(e) => e.message,
        }
    }

    #[test]
    fn test_multiple_declarators() {
        let program = Parser::new("let a = 1, b, c = a + 1;")
            .unwrap()
            .parse_program()
            .unwrap();
        match &program.nodes[0] {
            AstNode::VarDecl {
                kind, declarators, ..
            } => {
                assert_eq!(*kind, DeclKind::Let);
                let names: Vec<_> = declarators.iter().map(|d| d.name.as_str()).collect();
                assert_eq!(names, ["a", "b", "c"]);
                assert!(declarators[1].init.is_none());
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_const_requires_initializer() {
        assert_eq!(
            parse_err_message("const x;"),
            "Missing initializer in const declaration"
        );
    }

    #[test]
    fn test_default_parameters() {
        let program = Parser::new("function greet(name = 'World', punct = '!') {}")
            .unwrap()
            .parse_program()
            .unwrap();
        match &program.nodes[0] {
            AstNode::FunctionDecl { func, .. } => {
                assert_eq!(func.params.len(), 2);
                assert!(func.params.iter().all(|p| p.default.is_some()));
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_arrow_function_forms() {
        let program = Parser::new("const f = x => x * 2;\nconst g = (a, b) => { return a + b };")
            .unwrap()
            .parse_program()
            .unwrap();
        for node in &program.nodes {
            match node {
                AstNode::VarDecl { declarators, .. } => match &declarators[0].init {
                    Some(AstNode::FunctionExpr { func, .. }) => assert!(func.is_arrow),
                    other => panic!("Expected arrow, got {:?}", other),
                },
                other => panic!("Expected declaration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rest_parameters_rejected() {
        assert_eq!(
            parse_err_message("function f(...args) {}"),
            "Spread syntax is not supported"
        );
    }
}
