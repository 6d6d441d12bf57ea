//! Expression parsing implementation
//!
//! This module handles parsing of LearnScript expressions using precedence
//! climbing for binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, template literals, booleans, `null`
//! - Array and object literals (including shorthand properties and methods)
//! - Identifiers, `this`
//! - Binary operators: arithmetic, comparison, logical, nullish, bitwise
//! - Unary operators: `-`, `+`, `!`, `~`, `typeof`, `++`, `--`
//! - Postfix: `[]`, `.`, `()`, `++`, `--`
//! - Ternary: `? :`
//! - Function expressions and arrow functions
//! - `new Constructor(args)`
//!
//! # Precedence
//!
//! From lowest to highest: assignment, ternary, `??`, `||`, `&&`, `|`, `^`,
//! `&`, equality, relational, shift, additive, multiplicative, `**`
//! (right-associative), unary, postfix, call/member, primary.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use std::rc::Rc;

use crate::parser::ast::*;
use crate::parser::lexer::{TemplateChunk, TokenKind};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment, arrow function or ternary (right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        self.nested(Self::parse_assignment_level)
    }

    fn parse_assignment_level(&mut self) -> Result<AstNode, ParseError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow_function();
        }

        let expr = self.parse_ternary()?;

        let loc = self.current_location();
        if self.match_token(&TokenKind::Eq) {
            Self::check_assignment_target(&expr, "assignment")?;
            let rhs = Box::new(self.parse_assignment()?);
            return Ok(AstNode::Assignment {
                lhs: Box::new(expr),
                rhs,
                location: loc,
            });
        }

        // Compound assignments
        let compound_op = match self.peek().kind {
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::PercentEq => Some(BinOp::Mod),
            _ => None,
        };

        if let Some(op) = compound_op {
            self.advance();
            Self::check_assignment_target(&expr, "assignment")?;
            let rhs = Box::new(self.parse_assignment()?);
            return Ok(AstNode::CompoundAssignment {
                lhs: Box::new(expr),
                op,
                rhs,
                location: loc,
            });
        }

        Ok(expr)
    }

    fn check_assignment_target(expr: &AstNode, context: &str) -> Result<(), ParseError> {
        match expr {
            AstNode::Variable(..) | AstNode::MemberAccess { .. } | AstNode::IndexAccess { .. } => {
                Ok(())
            }
            other => Err(ParseError {
                message: format!("Invalid left-hand side in {}", context),
                location: other.location(),
            }),
        }
    }

    /// Parse ternary: condition ? true_expr : false_expr
    fn parse_ternary(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_nullish()?;

        if self.match_token(&TokenKind::Question) {
            let loc = self.previous_location();
            let true_expr = Box::new(self.parse_assignment()?);
            self.expect_token(&TokenKind::Colon, "Expected ':' in ternary expression")?;
            let false_expr = Box::new(self.parse_assignment()?);

            return Ok(AstNode::TernaryOp {
                condition: Box::new(expr),
                true_expr,
                false_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse one left-associative binary precedence level
    fn parse_binary_level(
        &mut self,
        operators: &[(TokenKind, BinOp)],
        next: fn(&mut Self) -> Result<AstNode, ParseError>,
    ) -> Result<AstNode, ParseError> {
        let mut left = next(self)?;

        'outer: loop {
            for (kind, op) in operators {
                if self.match_token(kind) {
                    let loc = self.previous_location();
                    let right = Box::new(next(self)?);
                    left = AstNode::BinaryOp {
                        op: *op,
                        left: Box::new(left),
                        right,
                        location: loc,
                    };
                    continue 'outer;
                }
            }
            break;
        }

        Ok(left)
    }

    /// Parse nullish coalescing (??)
    fn parse_nullish(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[(TokenKind::QuestionQuestion, BinOp::Nullish)],
            Self::parse_logical_or,
        )
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(&[(TokenKind::OrOr, BinOp::Or)], Self::parse_logical_and)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(&[(TokenKind::AndAnd, BinOp::And)], Self::parse_bitwise_or)
    }

    /// Parse bitwise OR (|)
    fn parse_bitwise_or(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(&[(TokenKind::Pipe, BinOp::BitOr)], Self::parse_bitwise_xor)
    }

    /// Parse bitwise XOR (^)
    fn parse_bitwise_xor(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(&[(TokenKind::Caret, BinOp::BitXor)], Self::parse_bitwise_and)
    }

    /// Parse bitwise AND (&)
    fn parse_bitwise_and(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(&[(TokenKind::Amp, BinOp::BitAnd)], Self::parse_equality)
    }

    /// Parse equality (==, !=, ===, !==)
    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::EqEqEq, BinOp::StrictEq),
                (TokenKind::NotEqEq, BinOp::StrictNe),
                (TokenKind::EqEq, BinOp::Eq),
                (TokenKind::NotEq, BinOp::Ne),
            ],
            Self::parse_relational,
        )
    }

    /// Parse relational (<, <=, >, >=)
    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Lt, BinOp::Lt),
                (TokenKind::Le, BinOp::Le),
                (TokenKind::Gt, BinOp::Gt),
                (TokenKind::Ge, BinOp::Ge),
            ],
            Self::parse_shift,
        )
    }

    /// Parse shift (<<, >>)
    fn parse_shift(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::LtLt, BinOp::BitShl),
                (TokenKind::GtGt, BinOp::BitShr),
            ],
            Self::parse_additive,
        )
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
            Self::parse_multiplicative,
        )
    }

    /// Parse multiplicative (*, /, %)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::Percent, BinOp::Mod),
            ],
            Self::parse_exponent,
        )
    }

    /// Parse exponentiation (**), right-associative
    fn parse_exponent(&mut self) -> Result<AstNode, ParseError> {
        let starts_with_unary = matches!(
            self.peek().kind,
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Tilde | TokenKind::Typeof
        );
        let base = self.parse_unary()?;

        if self.match_token(&TokenKind::StarStar) {
            let loc = self.previous_location();
            if starts_with_unary {
                return Err(ParseError {
                    message: "Unary operator used immediately before exponentiation expression. \
                              Parenthesis must be used to disambiguate operator precedence"
                        .to_string(),
                    location: loc,
                });
            }
            let exponent = Box::new(self.nested(Self::parse_exponent)?);
            return Ok(AstNode::BinaryOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: exponent,
                location: loc,
            });
        }

        Ok(base)
    }

    /// Parse unary operators
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let op = match self.peek().kind {
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Plus => UnOp::Plus,
            TokenKind::Bang => UnOp::Not,
            TokenKind::Tilde => UnOp::BitNot,
            TokenKind::Typeof => UnOp::Typeof,
            TokenKind::PlusPlus => UnOp::PreInc,
            TokenKind::MinusMinus => UnOp::PreDec,
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        if matches!(op, UnOp::PreInc | UnOp::PreDec) {
            Self::check_assignment_target(&operand, "prefix operation")?;
        }

        Ok(AstNode::UnaryOp {
            op,
            operand: Box::new(operand),
            location: loc,
        })
    }

    /// Parse postfix increment/decrement
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_call_member()?;

        let next = self.peek();
        if next.newline_before {
            return Ok(expr);
        }
        let op = match next.kind {
            TokenKind::PlusPlus => UnOp::PostInc,
            TokenKind::MinusMinus => UnOp::PostDec,
            _ => return Ok(expr),
        };
        let loc = self.current_location();
        self.advance();
        Self::check_assignment_target(&expr, "postfix operation")?;

        Ok(AstNode::UnaryOp {
            op,
            operand: Box::new(expr),
            location: loc,
        })
    }

    /// Parse member access, indexing and calls
    fn parse_call_member(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            if self.match_token(&TokenKind::Dot) {
                let member = self.expect_property_name()?;
                expr = AstNode::MemberAccess {
                    object: Box::new(expr),
                    member,
                    location: loc,
                };
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect_token(&TokenKind::RBracket, "Expected ']' after index")?;
                expr = AstNode::IndexAccess {
                    object: Box::new(expr),
                    index: Box::new(index),
                    location: loc,
                };
            } else if self.match_token(&TokenKind::LParen) {
                let args = self.parse_arguments()?;
                expr = AstNode::Call {
                    callee: Box::new(expr),
                    args,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments; the opening parenthesis is already consumed
    fn parse_arguments(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();

        while !self.check(&TokenKind::RParen) {
            self.reject_unsupported()?;
            args.push(self.parse_assignment()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_rparen("after arguments")?;
        Ok(args)
    }

    /// Parse primary expressions
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        self.reject_unsupported()?;

        let kind = self.peek().kind.clone();
        match kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(AstNode::NumberLiteral(n, loc))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(AstNode::StringLiteral(s, loc))
            }
            TokenKind::Template(chunks) => {
                self.advance();
                self.parse_template(chunks, loc)
            }
            TokenKind::True => {
                self.advance();
                Ok(AstNode::BoolLiteral(true, loc))
            }
            TokenKind::False => {
                self.advance();
                Ok(AstNode::BoolLiteral(false, loc))
            }
            TokenKind::Null => {
                self.advance();
                Ok(AstNode::Null { location: loc })
            }
            TokenKind::This => {
                self.advance();
                Ok(AstNode::This { location: loc })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(AstNode::Variable(name, loc))
            }
            TokenKind::Function => {
                self.advance();
                let name = match &self.peek().kind {
                    TokenKind::Ident(name) => {
                        let name = name.clone();
                        self.advance();
                        Some(name)
                    }
                    _ => None,
                };
                let func = self.parse_function_rest(name, loc)?;
                Ok(AstNode::FunctionExpr {
                    func: Rc::new(func),
                    location: loc,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                self.parse_array_literal(loc)
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_object_literal(loc)
            }
            TokenKind::New => {
                self.advance();
                self.parse_new(loc)
            }
            TokenKind::Slash => self.error("Regular expressions are not supported"),
            _ => self.unexpected(),
        }
    }

    fn parse_array_literal(&mut self, loc: SourceLocation) -> Result<AstNode, ParseError> {
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBracket) {
            if self.check(&TokenKind::Comma) {
                return self.error("Array holes are not supported");
            }
            self.reject_unsupported()?;
            elements.push(self.parse_assignment()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(&TokenKind::RBracket, "Expected ']' after array elements")?;
        Ok(AstNode::ArrayLiteral {
            elements,
            location: loc,
        })
    }

    fn parse_object_literal(&mut self, loc: SourceLocation) -> Result<AstNode, ParseError> {
        let mut properties = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            self.reject_unsupported()?;
            let key_loc = self.current_location();
            let kind = self.peek().kind.clone();
            let (key, shorthand_ok) = match kind {
                TokenKind::Str(s) => {
                    self.advance();
                    (s, false)
                }
                TokenKind::Number(n) => {
                    self.advance();
                    (number_key(n), false)
                }
                TokenKind::Ident(name) => {
                    self.advance();
                    (name, true)
                }
                TokenKind::LBracket => return self.error("Computed property names are not supported"),
                _ => (self.expect_property_name()?, false),
            };

            let value = if self.match_token(&TokenKind::Colon) {
                self.parse_assignment()?
            } else if self.check(&TokenKind::LParen) {
                let func = self.parse_function_rest(Some(key.clone()), key_loc)?;
                AstNode::FunctionExpr {
                    func: Rc::new(func),
                    location: key_loc,
                }
            } else if shorthand_ok {
                AstNode::Variable(key.clone(), key_loc)
            } else {
                return self.error(format!("Expected ':' after property name, found {}", self.peek()));
            };

            properties.push(Property { key, value });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_rbrace("after object literal")?;
        Ok(AstNode::ObjectLiteral {
            properties,
            location: loc,
        })
    }

    fn parse_new(&mut self, loc: SourceLocation) -> Result<AstNode, ParseError> {
        let constructor = self.expect_identifier()?;
        let args = if self.match_token(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(AstNode::New {
            constructor,
            args,
            location: loc,
        })
    }

    /// Parse each `${...}` chunk of a template literal as a standalone expression
    fn parse_template(
        &mut self,
        chunks: Vec<TemplateChunk>,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let mut parts = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            match chunk {
                TemplateChunk::Text(text) => parts.push(TemplatePart::Text(text)),
                TemplateChunk::Code(code, code_loc) => {
                    let mut sub = self.fragment(&code, code_loc)?;
                    if sub.is_at_end() {
                        return Err(ParseError {
                            message: "Empty template substitution".to_string(),
                            location: code_loc,
                        });
                    }
                    let expr = sub.parse_expression()?;
                    if !sub.is_at_end() {
                        return sub.unexpected();
                    }
                    parts.push(TemplatePart::Expr(expr));
                }
            }
        }

        Ok(AstNode::TemplateLiteral {
            parts,
            location: loc,
        })
    }
}

/// Property key for a numeric literal key (`{ 1: "a" }` → `"1"`)
fn number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_expr(source: &str) -> AstNode {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression().unwrap()
    }

    #[test]
    fn test_precedence() {
        match parse_expr("1 + 2 * 3") {
            AstNode::BinaryOp {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(*right, AstNode::BinaryOp { op: BinOp::Mul, .. })),
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_exponent_is_right_associative() {
        match parse_expr("2 ** 3 ** 2") {
            AstNode::BinaryOp {
                op: BinOp::Pow,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, AstNode::NumberLiteral(n, _) if n == 2.0));
                assert!(matches!(*right, AstNode::BinaryOp { op: BinOp::Pow, .. }));
            }
            other => panic!("Expected power, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_before_exponent_is_error() {
        let mut parser = Parser::new("-2 ** 2").unwrap();
        assert!(parser.parse_expression().is_err());
    }

    #[test]
    fn test_method_call_chain() {
        match parse_expr("numbers.map(n => n * 2).join(', ')") {
            AstNode::Call { callee, args, .. } => {
                assert_eq!(args.len(), 1);
                match *callee {
                    AstNode::MemberAccess { member, object, .. } => {
                        assert_eq!(member, "join");
                        assert!(matches!(*object, AstNode::Call { .. }));
                    }
                    other => panic!("Expected member access, got {:?}", other),
                }
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_object_literal_forms() {
        match parse_expr("{ name, 'full name': 1, 2: true, greet() { return 1 }, default: 0 }") {
            AstNode::ObjectLiteral { properties, .. } => {
                let keys: Vec<_> = properties.iter().map(|p| p.key.as_str()).collect();
                assert_eq!(keys, ["name", "full name", "2", "greet", "default"]);
                assert!(matches!(properties[0].value, AstNode::Variable(..)));
                assert!(matches!(properties[3].value, AstNode::FunctionExpr { .. }));
            }
            other => panic!("Expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_template_literal_parts() {
        match parse_expr("`Hello, ${name}! You are ${age + 1}.`") {
            AstNode::TemplateLiteral { parts, .. } => {
                assert_eq!(parts.len(), 5);
                assert!(matches!(&parts[1], TemplatePart::Expr(AstNode::Variable(n, _)) if n == "name"));
                assert!(matches!(&parts[3], TemplatePart::Expr(AstNode::BinaryOp { .. })));
            }
            other => panic!("Expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_template_expression_location() {
        match parse_expr("`a\n  ${oops}`") {
            AstNode::TemplateLiteral { parts, .. } => match &parts[1] {
                TemplatePart::Expr(expr) => assert_eq!(expr.location(), SourceLocation::new(2, 5)),
                other => panic!("Expected expression part, got {:?}", other),
            },
            other => panic!("Expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = 2").unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.message, "Invalid left-hand side in assignment");
    }

    #[test]
    fn test_new_expression() {
        match parse_expr("new Error('boom')") {
            AstNode::New {
                constructor, args, ..
            } => {
                assert_eq!(constructor, "Error");
                assert_eq!(args.len(), 1);
            }
            other => panic!("Expected new, got {:?}", other),
        }
    }
}
