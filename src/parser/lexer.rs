//! Lexer (tokenizer) for LearnScript source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Each token remembers whether a line break preceded it so the parser can
//! accept statements that omit their trailing semicolon.
//!
//! Template literals are split here into literal text and raw `${...}` code
//! chunks; the parser re-lexes each chunk starting at its original location.

use super::ast::SourceLocation;
use std::fmt;

/// Raw piece of a template literal as produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    Text(String),
    Code(String, SourceLocation),
}

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),
    Template(Vec<TemplateChunk>),

    // Identifiers
    Ident(String),

    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    Do,
    For,
    In,
    Break,
    Continue,
    True,
    False,
    Null,
    Typeof,
    New,
    This,
    Throw,
    Try,
    Catch,
    Finally,
    Switch,
    Case,
    Default,

    // Reserved words the interpreter recognises but does not support
    Class,
    Async,
    Await,
    Yield,

    // Arithmetic
    Plus,     // +
    Minus,    // -
    Star,     // *
    StarStar, // **
    Slash,    // /
    Percent,  // %

    // Comparison
    EqEq,     // ==
    EqEqEq,   // ===
    NotEq,    // !=
    NotEqEq,  // !==
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=

    // Logical
    AndAnd,           // &&
    OrOr,             // ||
    QuestionQuestion, // ??
    Bang,             // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Punctuation
    Dot,       // .
    Ellipsis,  // ...
    Arrow,     // =>
    Question,  // ?
    Colon,     // :
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    // End of file
    Eof,
}

impl TokenKind {
    /// Keyword spelling, used where keywords are valid property names (`obj.default`).
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Var => "var",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Typeof => "typeof",
            TokenKind::New => "new",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Class => "class",
            TokenKind::Async => "async",
            TokenKind::Await => "await",
            TokenKind::Yield => "yield",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword_text() {
            return write!(f, "'{}'", keyword);
        }
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Str(s) => write!(f, "string \"{}\"", s),
            TokenKind::Template(_) => write!(f, "template literal"),
            TokenKind::Ident(s) => write!(f, "identifier '{}'", s),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::StarStar => write!(f, "'**'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::EqEqEq => write!(f, "'==='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::NotEqEq => write!(f, "'!=='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::QuestionQuestion => write!(f, "'??'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::LtLt => write!(f, "'<<'"),
            TokenKind::GtGt => write!(f, "'>>'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::PlusEq => write!(f, "'+='"),
            TokenKind::MinusEq => write!(f, "'-='"),
            TokenKind::StarEq => write!(f, "'*='"),
            TokenKind::SlashEq => write!(f, "'/='"),
            TokenKind::PercentEq => write!(f, "'%='"),
            TokenKind::PlusPlus => write!(f, "'++'"),
            TokenKind::MinusMinus => write!(f, "'--'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Ellipsis => write!(f, "'...'"),
            TokenKind::Arrow => write!(f, "'=>'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// A token with its position and line-break context
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
    /// True when at least one line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for LearnScript source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    saw_newline: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::starting_at(input, SourceLocation::new(1, 1))
    }

    /// Create a lexer whose first character sits at `start` (used for template chunks).
    pub fn starting_at(input: &str, start: SourceLocation) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: start.line,
            column: start.column,
            saw_newline: false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    location: self.current_location(),
                    newline_before: true,
                });
                break;
            }

            let location = self.current_location();
            let newline_before = std::mem::take(&mut self.saw_newline);
            let kind = self.next_token()?;
            tokens.push(Token {
                kind,
                location,
                newline_before,
            });
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<TokenKind, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            location: loc,
        })?;

        match ch {
            '"' | '\'' => self.string_literal(ch, loc),
            '`' => self.template_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }
            c if is_ident_start(c) => Ok(self.identifier_or_keyword(c)),

            '+' => Ok(if self.eat('+') {
                TokenKind::PlusPlus
            } else if self.eat('=') {
                TokenKind::PlusEq
            } else {
                TokenKind::Plus
            }),
            '-' => Ok(if self.eat('-') {
                TokenKind::MinusMinus
            } else if self.eat('=') {
                TokenKind::MinusEq
            } else {
                TokenKind::Minus
            }),
            '*' => Ok(if self.eat('*') {
                TokenKind::StarStar
            } else if self.eat('=') {
                TokenKind::StarEq
            } else {
                TokenKind::Star
            }),
            '/' => Ok(if self.eat('=') {
                TokenKind::SlashEq
            } else {
                TokenKind::Slash
            }),
            '%' => Ok(if self.eat('=') {
                TokenKind::PercentEq
            } else {
                TokenKind::Percent
            }),
            '=' => Ok(if self.eat('=') {
                if self.eat('=') {
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            } else if self.eat('>') {
                TokenKind::Arrow
            } else {
                TokenKind::Eq
            }),
            '!' => Ok(if self.eat('=') {
                if self.eat('=') {
                    TokenKind::NotEqEq
                } else {
                    TokenKind::NotEq
                }
            } else {
                TokenKind::Bang
            }),
            '<' => Ok(if self.eat('=') {
                TokenKind::Le
            } else if self.eat('<') {
                TokenKind::LtLt
            } else {
                TokenKind::Lt
            }),
            '>' => Ok(if self.eat('=') {
                TokenKind::Ge
            } else if self.eat('>') {
                TokenKind::GtGt
            } else {
                TokenKind::Gt
            }),
            '&' => Ok(if self.eat('&') {
                TokenKind::AndAnd
            } else {
                TokenKind::Amp
            }),
            '|' => Ok(if self.eat('|') {
                TokenKind::OrOr
            } else {
                TokenKind::Pipe
            }),
            '?' => Ok(if self.eat('?') {
                TokenKind::QuestionQuestion
            } else {
                TokenKind::Question
            }),
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Ok(TokenKind::Ellipsis)
                } else {
                    Ok(TokenKind::Dot)
                }
            }
            '^' => Ok(TokenKind::Caret),
            '~' => Ok(TokenKind::Tilde),
            ':' => Ok(TokenKind::Colon),
            '(' => Ok(TokenKind::LParen),
            ')' => Ok(TokenKind::RParen),
            '{' => Ok(TokenKind::LBrace),
            '}' => Ok(TokenKind::RBrace),
            '[' => Ok(TokenKind::LBracket),
            ']' => Ok(TokenKind::RBracket),
            ';' => Ok(TokenKind::Semicolon),
            ',' => Ok(TokenKind::Comma),

            _ => Err(LexError {
                message: format!("Invalid or unexpected token '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse a quoted string literal; the opening quote is already consumed
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance();
                return Ok(TokenKind::Str(string));
            }
            if ch == '\n' {
                break;
            }

            self.advance();
            if ch == '\\' {
                let escaped = self.read_escape()?;
                string.extend(escaped);
            } else {
                string.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse a template literal into text and `${...}` code chunks
    fn template_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut chunks = Vec::new();
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '`' => {
                    self.advance();
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(text));
                    }
                    return Ok(TokenKind::Template(chunks));
                }
                '\\' => {
                    self.advance();
                    let escaped = self.read_escape()?;
                    text.extend(escaped);
                }
                '$' if self.peek_ahead(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(std::mem::take(&mut text)));
                    }
                    let code_loc = self.current_location();
                    let code = self.template_code()?;
                    chunks.push(TemplateChunk::Code(code, code_loc));
                }
                _ => {
                    self.advance();
                    text.push(ch);
                }
            }
        }

        Err(LexError {
            message: "Unterminated template literal".to_string(),
            location: loc,
        })
    }

    /// Collect the raw code of a `${...}` substitution up to its closing brace
    fn template_code(&mut self) -> Result<String, LexError> {
        let start = self.current_location();
        let mut code = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(ch) = self.advance() {
            if let Some(q) = quote {
                code.push(ch);
                if ch == '\\' {
                    if let Some(next) = self.advance() {
                        code.push(next);
                    }
                } else if ch == q {
                    quote = None;
                }
                continue;
            }

            match ch {
                '"' | '\'' | '`' => {
                    quote = Some(ch);
                    code.push(ch);
                }
                '{' => {
                    depth += 1;
                    code.push(ch);
                }
                '}' if depth == 0 => return Ok(code),
                '}' => {
                    depth -= 1;
                    code.push(ch);
                }
                _ => code.push(ch),
            }
        }

        Err(LexError {
            message: "Unterminated template substitution".to_string(),
            location: start,
        })
    }

    /// Decode one escape sequence; the backslash is already consumed
    fn read_escape(&mut self) -> Result<Option<char>, LexError> {
        let loc = self.current_location();
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input in escape sequence".to_string(),
            location: loc,
        })?;

        let unescaped = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            // Line continuation
            '\n' => return Ok(None),
            'x' => self.read_hex_escape(2, loc)?,
            'u' => self.read_hex_escape(4, loc)?,
            other => other,
        };
        Ok(Some(unescaped))
    }

    fn read_hex_escape(&mut self, digits: usize, loc: SourceLocation) -> Result<char, LexError> {
        let mut hex = String::new();
        for _ in 0..digits {
            match self.advance() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => {
                    return Err(LexError {
                        message: "Invalid hexadecimal escape sequence".to_string(),
                        location: loc,
                    })
                }
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LexError {
                message: format!("Invalid escape value \\{}", hex),
                location: loc,
            })
    }

    /// Parse numeric literal (decimal, fraction, exponent or hex)
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<TokenKind, LexError> {
        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let mut hex = String::new();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() {
                    hex.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return u64::from_str_radix(&hex, 16)
                .map(|v| TokenKind::Number(v as f64))
                .map_err(|_| LexError {
                    message: format!("Invalid hexadecimal literal: 0x{}", hex),
                    location: loc,
                });
        }

        let mut num_str = String::new();
        num_str.push(first);
        let mut seen_dot = first == '.';

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                if ch != '_' {
                    num_str.push(ch);
                }
                self.advance();
            } else if ch == '.' && !seen_dot && self.peek_ahead(1) != Some('.') {
                seen_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = self.peek_ahead(1);
            let has_digits = match sign {
                Some('+') | Some('-') => self.peek_ahead(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                num_str.push('e');
                self.advance();
                if let Some(s @ ('+' | '-')) = self.peek() {
                    num_str.push(s);
                    self.advance();
                }
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        num_str.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if self.peek().is_some_and(is_ident_start) {
            return Err(LexError {
                message: "Invalid or unexpected token after number".to_string(),
                location: loc,
            });
        }

        num_str.parse::<f64>().map(TokenKind::Number).map_err(|_| LexError {
            message: format!("Invalid number literal: {}", num_str),
            location: loc,
        })
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "let" => TokenKind::Let,
            "const" => TokenKind::Const,
            "var" => TokenKind::Var,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "typeof" => TokenKind::Typeof,
            "new" => TokenKind::New,
            "this" => TokenKind::This,
            "throw" => TokenKind::Throw,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "class" => TokenKind::Class,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "yield" => TokenKind::Yield,
            _ => TokenKind::Ident(ident),
        }
    }

    /// Skip whitespace and comments, remembering whether a newline was crossed
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some('\n') => {
                    self.saw_newline = true;
                    self.advance();
                }
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            if self.peek() == Some('\n') {
                self.saw_newline = true;
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("function main() { return 0; }");

        assert_eq!(tokens[0], TokenKind::Function);
        assert!(matches!(tokens[1], TokenKind::Ident(ref s) if s == "main"));
        assert_eq!(tokens[2], TokenKind::LParen);
        assert_eq!(tokens[3], TokenKind::RParen);
        assert_eq!(tokens[4], TokenKind::LBrace);
        assert_eq!(tokens[5], TokenKind::Return);
        assert_eq!(tokens[6], TokenKind::Number(0.0));
        assert_eq!(tokens[7], TokenKind::Semicolon);
        assert_eq!(tokens[8], TokenKind::RBrace);
        assert_eq!(tokens[9], TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        let tokens = kinds("++ -- += === !== && || ?? => ** ...");

        assert_eq!(
            &tokens[..11],
            &[
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::EqEqEq,
                TokenKind::NotEqEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::QuestionQuestion,
                TokenKind::Arrow,
                TokenKind::StarStar,
                TokenKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let tokens = Lexer::new("let x // comment\n/* block\ncomment */ let y")
            .tokenize()
            .unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert!(!tokens[1].newline_before);
        assert_eq!(tokens[2].kind, TokenKind::Let);
        assert!(tokens[2].newline_before);
        assert_eq!(tokens[2].location, SourceLocation::new(3, 12));
    }

    #[test]
    fn test_string_literals() {
        let tokens = kinds(r#""hello\nworld" 'it\'s'"#);

        assert_eq!(tokens[0], TokenKind::Str("hello\nworld".to_string()));
        assert_eq!(tokens[1], TokenKind::Str("it's".to_string()));
    }

    #[test]
    fn test_number_literals() {
        let tokens = kinds("42 3.5 .5 1e3 0xff 2.5e-1");

        assert_eq!(tokens[0], TokenKind::Number(42.0));
        assert_eq!(tokens[1], TokenKind::Number(3.5));
        assert_eq!(tokens[2], TokenKind::Number(0.5));
        assert_eq!(tokens[3], TokenKind::Number(1000.0));
        assert_eq!(tokens[4], TokenKind::Number(255.0));
        assert_eq!(tokens[5], TokenKind::Number(0.25));
    }

    #[test]
    fn test_template_literal_chunks() {
        let tokens = kinds("`Hello, ${name}! ${ {a: 1}.a }`");

        match &tokens[0] {
            TokenKind::Template(chunks) => {
                assert_eq!(chunks.len(), 4);
                assert_eq!(chunks[0], TemplateChunk::Text("Hello, ".to_string()));
                assert!(matches!(&chunks[1], TemplateChunk::Code(c, _) if c == "name"));
                assert_eq!(chunks[2], TemplateChunk::Text("! ".to_string()));
                assert!(matches!(&chunks[3], TemplateChunk::Code(c, _) if c == " {a: 1}.a "));
            }
            other => panic!("Expected template literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = Lexer::new("let s = \"oops").tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated string"));
        assert_eq!(err.location, SourceLocation::new(1, 9));
    }
}
