//! Binding-target shapes consumed by the static semantics. Parsing into
//! these shapes happens outside this crate.

#[derive(Clone, Debug)]
pub struct VariableDeclaration {
    pub kind: VarKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarator {
    pub pattern: Pattern,
    pub init: Option<Expression>,
}

#[derive(Clone, Debug)]
pub enum Pattern {
    Identifier(String),
    Array(Vec<Option<ArrayPatternElement>>),
    Object(Vec<ObjectPatternProperty>),
    Rest(Box<Pattern>),
    MemberExpression(Box<Expression>),
}

#[derive(Clone, Debug)]
pub enum ArrayPatternElement {
    Pattern(Pattern),
    Rest(Pattern),
}

#[derive(Clone, Debug)]
pub enum ObjectPatternProperty {
    KeyValue(String, Pattern),
    Shorthand(String),
    Rest(Pattern),
}

#[derive(Clone, Debug)]
pub enum Expression {
    Literal(Literal),
    Identifier(String),
    This,
    Call(Box<Expression>, Vec<Expression>),
    Member(Box<Expression>, MemberProperty),
}

#[derive(Clone, Debug)]
pub enum MemberProperty {
    Dot(String),
    Computed(Box<Expression>),
}

#[derive(Clone, Debug)]
pub enum Literal {
    Null,
    Number(f64),
}

/// Left-hand side of a `for (... of ...)` / `for (... in ...)` head.
#[derive(Clone, Debug)]
pub enum ForInOfLeft {
    Variable(VariableDeclaration),
    Pattern(Pattern),
}
