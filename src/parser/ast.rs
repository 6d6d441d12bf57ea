// AST (Abstract Syntax Tree) definitions for LearnScript

use std::rc::Rc;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binding keyword used by a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Var => "var",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical (short-circuiting)
    And,
    Or,
    Nullish,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Nullish => "??",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitShl => "<<",
            BinOp::BitShr => ">>",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Plus,    // +x
    Not,     // !x
    BitNot,  // ~x
    Typeof,  // typeof x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

/// Function parameter with an optional default value
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<AstNode>,
}

/// Body of a function: a statement block, or a bare expression for arrows
#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(Vec<AstNode>),
    Expression(Box<AstNode>),
}

/// A function definition shared by declarations, expressions, arrows and methods
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub location: SourceLocation,
}

/// One `name = init` pair inside a `let`/`const`/`var` statement
#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub init: Option<AstNode>,
    pub location: SourceLocation,
}

/// Object literal property
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: AstNode,
}

/// Piece of a template literal
#[derive(Debug, Clone)]
pub enum TemplatePart {
    Text(String),
    Expr(AstNode),
}

/// Switch case
#[derive(Debug, Clone)]
pub enum CaseNode {
    Case {
        value: Box<AstNode>,
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    Default {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone)]
pub enum AstNode {
    // Declarations
    VarDecl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
        location: SourceLocation,
    },
    FunctionDecl {
        func: Rc<FunctionDef>,
        location: SourceLocation,
    },

    // Statements
    Return {
        expr: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    DoWhile {
        body: Vec<AstNode>,
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<AstNode>>,
        condition: Option<Box<AstNode>>,
        increment: Option<Box<AstNode>>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    ForOf {
        kind: Option<DeclKind>,
        name: String,
        iterable: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    ForIn {
        kind: Option<DeclKind>,
        name: String,
        object: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Switch {
        expr: Box<AstNode>,
        cases: Vec<CaseNode>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Throw {
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    Try {
        block: Vec<AstNode>,
        catch_param: Option<String>,
        catch_block: Option<Vec<AstNode>>,
        finally_block: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },

    // Expressions
    NumberLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    BoolLiteral(bool, SourceLocation),
    Null {
        location: SourceLocation,
    },
    TemplateLiteral {
        parts: Vec<TemplatePart>,
        location: SourceLocation,
    },
    ArrayLiteral {
        elements: Vec<AstNode>,
        location: SourceLocation,
    },
    ObjectLiteral {
        properties: Vec<Property>,
        location: SourceLocation,
    },
    Variable(String, SourceLocation),
    This {
        location: SourceLocation,
    },
    FunctionExpr {
        func: Rc<FunctionDef>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    Assignment {
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    CompoundAssignment {
        lhs: Box<AstNode>,
        op: BinOp,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    TernaryOp {
        condition: Box<AstNode>,
        true_expr: Box<AstNode>,
        false_expr: Box<AstNode>,
        location: SourceLocation,
    },
    MemberAccess {
        object: Box<AstNode>,
        member: String,
        location: SourceLocation,
    },
    IndexAccess {
        object: Box<AstNode>,
        index: Box<AstNode>,
        location: SourceLocation,
    },
    Call {
        callee: Box<AstNode>,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    New {
        constructor: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Returns the source location of this node.
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::NumberLiteral(_, loc)
            | AstNode::StringLiteral(_, loc)
            | AstNode::BoolLiteral(_, loc)
            | AstNode::Variable(_, loc) => *loc,
            AstNode::VarDecl { location, .. }
            | AstNode::FunctionDecl { location, .. }
            | AstNode::Return { location, .. }
            | AstNode::If { location, .. }
            | AstNode::While { location, .. }
            | AstNode::DoWhile { location, .. }
            | AstNode::For { location, .. }
            | AstNode::ForOf { location, .. }
            | AstNode::ForIn { location, .. }
            | AstNode::Switch { location, .. }
            | AstNode::Break { location }
            | AstNode::Continue { location }
            | AstNode::Throw { location, .. }
            | AstNode::Try { location, .. }
            | AstNode::Block { location, .. }
            | AstNode::ExpressionStatement { location, .. }
            | AstNode::Empty { location }
            | AstNode::Null { location }
            | AstNode::TemplateLiteral { location, .. }
            | AstNode::ArrayLiteral { location, .. }
            | AstNode::ObjectLiteral { location, .. }
            | AstNode::This { location }
            | AstNode::FunctionExpr { location, .. }
            | AstNode::BinaryOp { location, .. }
            | AstNode::UnaryOp { location, .. }
            | AstNode::Assignment { location, .. }
            | AstNode::CompoundAssignment { location, .. }
            | AstNode::TernaryOp { location, .. }
            | AstNode::MemberAccess { location, .. }
            | AstNode::IndexAccess { location, .. }
            | AstNode::Call { location, .. }
            | AstNode::New { location, .. } => *location,
        }
    }
}

/// A parsed script: the top-level statement list
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub nodes: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Program { nodes: Vec::new() }
    }
}
