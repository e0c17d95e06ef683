/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The procedure syntax tree handed over by the document parser.
//!
//! Identifiers are stored bare; the compiler prefixes `$` when forming
//! assembly symbols. Blocks are procedures: entering one pushes a new
//! procedure frame in the builder.

/// A compilable unit: a sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Procedure {
    pub statements: Vec<Statement>,
}

impl Procedure {
    pub fn new(statements: Vec<Statement>) -> Self {
        Procedure { statements }
    }
}

/// A main clause optionally followed by handle clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub main: MainClause,
    pub handlers: Vec<HandleClause>,
}

impl Statement {
    pub fn new(main: MainClause) -> Self {
        Statement {
            main,
            handlers: Vec::new(),
        }
    }

    pub fn with_handlers(main: MainClause, handlers: Vec<HandleClause>) -> Self {
        Statement { main, handlers }
    }
}

/// A catch-like branch matching a thrown exception against a template.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleClause {
    pub exception: String,
    pub template: Expression,
    pub block: Procedure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MainClause {
    Evaluate {
        recipient: Option<Recipient>,
        expression: Expression,
    },
    If {
        conditions: Vec<(Expression, Procedure)>,
        else_block: Option<Procedure>,
    },
    Select {
        selector: Expression,
        options: Vec<(Expression, Procedure)>,
        else_block: Option<Procedure>,
    },
    While {
        condition: Expression,
        block: Procedure,
    },
    WithEach {
        item: String,
        sequence: Expression,
        block: Procedure,
    },
    Break,
    Continue,
    Return {
        expression: Option<Expression>,
    },
    Throw {
        expression: Expression,
    },
    Publish {
        event: Expression,
    },
    Post {
        message: Expression,
        queue: Expression,
    },
    Save {
        draft: Expression,
        location: Expression,
    },
    Commit {
        document: Expression,
        location: Expression,
    },
    Discard {
        location: Expression,
    },
    Checkout {
        recipient: Recipient,
        location: Expression,
    },
    Wait {
        recipient: Recipient,
        queue: Expression,
    },
}

impl MainClause {
    /// The statement kind used in label construction: the clause kind minus
    /// its `Clause` suffix, plus `Statement`.
    pub fn statement_kind(&self) -> &'static str {
        match self {
            MainClause::Evaluate { .. } => "EvaluateStatement",
            MainClause::If { .. } => "IfStatement",
            MainClause::Select { .. } => "SelectStatement",
            MainClause::While { .. } => "WhileStatement",
            MainClause::WithEach { .. } => "WithEachStatement",
            MainClause::Break => "BreakStatement",
            MainClause::Continue => "ContinueStatement",
            MainClause::Return { .. } => "ReturnStatement",
            MainClause::Throw { .. } => "ThrowStatement",
            MainClause::Publish { .. } => "PublishStatement",
            MainClause::Post { .. } => "PostStatement",
            MainClause::Save { .. } => "SaveStatement",
            MainClause::Commit { .. } => "CommitStatement",
            MainClause::Discard { .. } => "DiscardStatement",
            MainClause::Checkout { .. } => "CheckoutStatement",
            MainClause::Wait { .. } => "WaitStatement",
        }
    }

    /// Whether the main clause contains nested blocks (subclauses).
    pub fn has_blocks(&self) -> bool {
        matches!(
            self,
            MainClause::If { .. }
                | MainClause::Select { .. }
                | MainClause::While { .. }
                | MainClause::WithEach { .. }
        )
    }
}

/// The left-hand side of an assignment: a bare symbol or a subcomponent
/// path into a composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    Variable(String),
    Subcomponent {
        composite: Expression,
        indices: Vec<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal element in its source form, e.g. `true` or `"text"`.
    Element {
        literal: String,
        parameters: Option<Box<Expression>>,
    },
    /// A reference to a parameter, constant or variable.
    Variable(String),
    Arithmetic {
        operator: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Comparison {
        operator: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Concatenation {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Exponential {
        base: Box<Expression>,
        exponent: Box<Expression>,
    },
    Factorial {
        operand: Box<Expression>,
    },
    Complement {
        operand: Box<Expression>,
    },
    Inversion {
        operator: InversionOperator,
        operand: Box<Expression>,
    },
    Magnitude {
        operand: Box<Expression>,
    },
    /// `value ? fallback`
    Default {
        value: Box<Expression>,
        fallback: Box<Expression>,
    },
    /// `@reference`
    Dereference {
        reference: Box<Expression>,
    },
    FunctionCall {
        function: String,
        arguments: Vec<Argument>,
    },
    MessageCall {
        target: Box<Expression>,
        message: String,
        arguments: Vec<Expression>,
    },
    Collection {
        kind: CollectionKind,
        items: Vec<CollectionItem>,
        parameters: Option<Box<Expression>>,
    },
    Range {
        first: Box<Expression>,
        last: Box<Expression>,
        parameters: Option<Box<Expression>>,
    },
    Subcomponent {
        composite: Box<Expression>,
        indices: Vec<Expression>,
    },
    /// A source block used as a value; the braces are added on emission.
    Block {
        source: String,
        parameters: Option<Box<Expression>>,
    },
}

/// A function call argument. The name of a named argument is discarded at
/// compile time; only the value is pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expression,
}

impl Argument {
    pub fn positional(value: Expression) -> Self {
        Argument { name: None, value }
    }

    pub fn named(name: &str, value: Expression) -> Self {
        Argument {
            name: Some(name.to_string()),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionItem {
    Item(Expression),
    Association { key: Expression, value: Expression },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Stack,
    Queue,
    Catalog,
}

impl CollectionKind {
    pub fn intrinsic(&self) -> &'static str {
        match self {
            CollectionKind::List => "$list",
            CollectionKind::Set => "$set",
            CollectionKind::Stack => "$stack",
            CollectionKind::Queue => "$queue",
            CollectionKind::Catalog => "$catalog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Sum,
    Difference,
    Product,
    Quotient,
    Remainder,
}

impl ArithmeticOperator {
    pub fn intrinsic(&self) -> &'static str {
        match self {
            ArithmeticOperator::Sum => "$sum",
            ArithmeticOperator::Difference => "$difference",
            ArithmeticOperator::Product => "$product",
            ArithmeticOperator::Quotient => "$quotient",
            ArithmeticOperator::Remainder => "$remainder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    IsLessThan,
    IsEqualTo,
    IsMoreThan,
    IsSameAs,
    IsMatchedBy,
}

impl ComparisonOperator {
    pub fn intrinsic(&self) -> &'static str {
        match self {
            ComparisonOperator::IsLessThan => "$isLessThan",
            ComparisonOperator::IsEqualTo => "$isEqualTo",
            ComparisonOperator::IsMoreThan => "$isMoreThan",
            ComparisonOperator::IsSameAs => "$isSameAs",
            ComparisonOperator::IsMatchedBy => "$isMatchedBy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Sans,
    Xor,
    Or,
}

impl LogicalOperator {
    pub fn intrinsic(&self) -> &'static str {
        match self {
            LogicalOperator::And => "$and",
            LogicalOperator::Sans => "$sans",
            LogicalOperator::Xor => "$xor",
            LogicalOperator::Or => "$or",
        }
    }
}

/// The three inversion operators: arithmetic (`-x`), multiplicative (`/x`)
/// and complex conjugate (`*x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InversionOperator {
    Inverse,
    Reciprocal,
    Conjugate,
}

impl InversionOperator {
    pub fn intrinsic(&self) -> &'static str {
        match self {
            InversionOperator::Inverse => "$inverse",
            InversionOperator::Reciprocal => "$reciprocal",
            InversionOperator::Conjugate => "$conjugate",
        }
    }
}
