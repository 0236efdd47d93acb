use std::fmt::Write as _;

/// Represents a literal value written directly in source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal, such as `2.5`.
    Float(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A string literal, stored exactly as written between the quotes.
    Str(String),
}

impl LiteralValue {
    /// Returns the terminal kind name of the literal.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) | Self::Float(_) => "NUMBER",
            Self::Str(_) => "STR",
            Self::Bool(true) => "TRUE",
            Self::Bool(false) => "FALSE",
        }
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(r) => write!(f, "{r:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "'{s}'"),
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// `Expr` covers everything that produces a value: literals, variables,
/// element reads, array literals, operators, and calls. OR-chains and
/// AND-chains are stored flat in [`Expr::Chain`]; every other operator is
/// binary and nests to the left.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string or boolean).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Read of one element of an array variable (`a[i]`).
    ArrayItem {
        /// Name of the array variable.
        name:  String,
        /// The index expression.
        index: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Array literal expression (`[1, 2, 3]`).
    ArrayLiteral {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A unary operation (negation, casts, logical not).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary arithmetic or relational operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A flattened chain of `and` or `or` operands, evaluated left to right
    /// with short-circuiting.
    Chain {
        /// Which connective joins the operands.
        op:       LogicalOperator,
        /// The operands, at least two when built by the parser.
        operands: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Call of a built-in or user-defined function.
    FunctionCall(Call),
    /// Call of an external script.
    ScriptCall(ScriptCall),
}

/// A call by name with positional arguments (`f(a, b)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Name of the function being called.
    pub name:      String,
    /// Arguments to the function.
    pub arguments: Vec<Expr>,
    /// Line number in the source code.
    pub line:      usize,
}

/// A call of an external script (`./tools/sum.py(a, b)`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCall {
    /// Script path as written, without the leading `./`.
    pub path:      String,
    /// Arguments passed to the script after stringification.
    pub arguments: Vec<Expr>,
    /// Line number in the source code.
    pub line:      usize,
}

impl Expr {
    /// Returns the line number where this expression occurs in the source
    /// code.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::ArrayItem { line, .. }
            | Self::ArrayLiteral { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Chain { line, .. }
            | Self::FunctionCall(Call { line, .. })
            | Self::ScriptCall(ScriptCall { line, .. }) => *line,
        }
    }

    /// Returns the grammar kind of the node, as shown by the tree printer.
    ///
    /// # Example
    /// ```
    /// use quill::ast::{Expr, LogicalOperator};
    ///
    /// let chain = Expr::Chain { op:       LogicalOperator::And,
    ///                           operands: vec![],
    ///                           line:     1, };
    /// assert_eq!(chain.kind(), "boolexpression");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Literal { value, .. } => value.kind(),
            Self::Variable { .. } => "ID",
            Self::ArrayItem { .. } => "array_item",
            Self::ArrayLiteral { .. } => "array",
            Self::UnaryOp { op: UnaryOperator::Not,
                            .. } => "boolfactor",
            Self::UnaryOp { .. } => "factor",
            Self::BinaryOp { op, .. } => op.kind(),
            Self::Chain { op: LogicalOperator::Or,
                          .. } => "condition",
            Self::Chain { op: LogicalOperator::And,
                          .. } => "boolexpression",
            Self::FunctionCall(_) => "function_call",
            Self::ScriptCall(_) => "python_call",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Numeric negation (`-x`).
    Negate,
    /// Text to number (`atoi x`, `(atoi) x`).
    Atoi,
    /// Any value to text (`itoa x`, `(itoa) x`).
    Itoa,
    /// Logical negation of truthiness (`not x`).
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication or repetition (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Equality (`==`).
    Equal,
    /// Inequality (`!=`).
    NotEqual,
    /// Less than (`<`).
    Less,
    /// Less than or equal (`<=`).
    LessEqual,
    /// Greater than (`>`).
    Greater,
    /// Greater than or equal (`>=`).
    GreaterEqual,
}

impl BinaryOperator {
    /// Returns `true` for the comparison operators.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::LessEqual
                 | Self::Greater
                 | Self::GreaterEqual)
    }

    /// Returns the grammar level the operator belongs to.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Add | Self::Sub => "expression",
            Self::Mul | Self::Div => "term",
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual => "boolterm",
        }
    }
}

/// Connectives of flattened boolean chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Represents a statement node in the abstract syntax tree (AST).
///
/// Statements are executed for their effect. Only `return` produces a value,
/// and it does so by unwinding to the enclosing function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Assignment to a variable or to an element of an array variable.
    Assign {
        /// What is being assigned to.
        target: AssignTarget,
        /// The value expression.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// `if cond begin ... [else ...] end`
    If {
        /// The condition.
        condition:   Expr,
        /// Statements run when the condition is truthy.
        then_branch: Program,
        /// Statements run otherwise, if an `else` was written.
        else_branch: Option<Program>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while cond begin ... end`
    While {
        /// The loop condition, re-evaluated before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Program,
        /// Line number in the source code.
        line:      usize,
    },
    /// A function definition.
    FunctionDef(FunctionDef),
    /// A function call whose result is discarded.
    Call(Call),
    /// An external script call whose result is discarded.
    ScriptCall(ScriptCall),
    /// `return [condition]`
    Return {
        /// The returned expression; `None` returns null.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Statement {
    /// Returns the line number where this statement occurs in the source
    /// code.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Assign { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::FunctionDef(FunctionDef { line, .. })
            | Self::Call(Call { line, .. })
            | Self::ScriptCall(ScriptCall { line, .. })
            | Self::Return { line, .. } => *line,
        }
    }
}

/// The left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// A bare variable name.
    Variable(String),
    /// One element of an array variable.
    Element {
        /// Name of the array variable.
        name:  String,
        /// The index expression.
        index: Expr,
    },
}

/// A function definition: `function name(params) begin body end`.
///
/// Parameters are kept as parsed expressions; they are checked to be distinct
/// plain identifiers when the definition executes.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name.
    pub name:   String,
    /// The parameter list.
    pub params: Vec<Expr>,
    /// The function body.
    pub body:   Program,
    /// Line number in the source code.
    pub line:   usize,
}

/// A sequence of statements: a whole source file, a branch, or a body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The statements, in execution order.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Renders the tree one node per line as `(kind, value, operation)`,
    /// indenting children two spaces per level. Absent fields print as `-`.
    ///
    /// # Example
    /// ```
    /// let program = quill::parse("x = 1 + 2").unwrap();
    ///
    /// assert_eq!(program.pretty(),
    ///            "(program, -, -)\n\
    ///             \x20 (assign, -, =)\n\
    ///             \x20   (ID, x, -)\n\
    ///             \x20   (expression, -, +)\n\
    ///             \x20     (NUMBER, 1, -)\n\
    ///             \x20     (NUMBER, 2, -)\n");
    /// ```
    #[must_use]
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        TreePrinter { out: &mut out }.program(self, 0);
        out
    }
}

struct TreePrinter<'a> {
    out: &'a mut String,
}

impl TreePrinter<'_> {
    fn node(&mut self, depth: usize, kind: &str, value: Option<&str>, operation: Option<&str>) {
        let _ = writeln!(self.out,
                         "{:indent$}({kind}, {}, {})",
                         "",
                         value.unwrap_or("-"),
                         operation.unwrap_or("-"),
                         indent = depth * 2);
    }

    fn program(&mut self, program: &Program, depth: usize) {
        self.node(depth, "program", None, None);
        for statement in &program.statements {
            self.statement(statement, depth + 1);
        }
    }

    fn arguments(&mut self, arguments: &[Expr], depth: usize) {
        self.node(depth, "argument_list", None, None);
        for argument in arguments {
            self.expr(argument, depth + 1);
        }
    }

    fn call(&mut self, call: &Call, depth: usize) {
        self.node(depth, "function_call", None, Some(&call.name));
        self.arguments(&call.arguments, depth + 1);
    }

    fn script_call(&mut self, call: &ScriptCall, depth: usize) {
        self.node(depth, "python_call", None, Some(&call.path));
        self.arguments(&call.arguments, depth + 1);
    }

    fn statement(&mut self, statement: &Statement, depth: usize) {
        match statement {
            Statement::Assign { target, value, .. } => {
                self.node(depth, "assign", None, Some("="));
                match target {
                    AssignTarget::Variable(name) => self.node(depth + 1, "ID", Some(name), None),
                    AssignTarget::Element { name, index } => {
                        self.node(depth + 1, "array_item", Some(name), None);
                        self.expr(index, depth + 2);
                    },
                }
                self.expr(value, depth + 1);
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                self.node(depth, "if", None, None);
                self.expr(condition, depth + 1);
                self.program(then_branch, depth + 1);
                if let Some(else_branch) = else_branch {
                    self.program(else_branch, depth + 1);
                }
            },
            Statement::While { condition, body, .. } => {
                self.node(depth, "while", None, None);
                self.expr(condition, depth + 1);
                self.program(body, depth + 1);
            },
            Statement::FunctionDef(def) => {
                self.node(depth, "function_def", None, Some(&def.name));
                self.arguments(&def.params, depth + 1);
                self.program(&def.body, depth + 1);
            },
            Statement::Call(call) => self.call(call, depth),
            Statement::ScriptCall(call) => self.script_call(call, depth),
            Statement::Return { value, .. } => {
                self.node(depth, "return", None, None);
                if let Some(value) = value {
                    self.expr(value, depth + 1);
                }
            },
        }
    }

    fn expr(&mut self, expr: &Expr, depth: usize) {
        match expr {
            Expr::Literal { value, .. } => {
                let text = match value {
                    LiteralValue::Str(s) => s.clone(),
                    other => other.to_string(),
                };
                self.node(depth, expr.kind(), Some(&text), None);
            },
            Expr::Variable { name, .. } => self.node(depth, "ID", Some(name), None),
            Expr::ArrayItem { name, index, .. } => {
                self.node(depth, "array_item", Some(name), None);
                self.expr(index, depth + 1);
            },
            Expr::ArrayLiteral { elements, .. } => {
                self.node(depth, "array", None, None);
                self.arguments(elements, depth + 1);
            },
            Expr::UnaryOp { op, expr: operand, .. } => {
                self.node(depth, expr.kind(), None, Some(&op.to_string()));
                self.expr(operand, depth + 1);
            },
            Expr::BinaryOp { left, op, right, .. } => {
                self.node(depth, expr.kind(), None, Some(&op.to_string()));
                self.expr(left, depth + 1);
                self.expr(right, depth + 1);
            },
            Expr::Chain { op, operands, .. } => {
                self.node(depth, expr.kind(), None, Some(&op.to_string()));
                for operand in operands {
                    self.expr(operand, depth + 1);
                }
            },
            Expr::FunctionCall(call) => self.call(call, depth),
            Expr::ScriptCall(call) => self.script_call(call, depth),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op_str = match self {
            Self::Negate => "-",
            Self::Atoi => "atoi",
            Self::Itoa => "itoa",
            Self::Not => "not",
        };
        write!(f, "{op_str}")
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op_str = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        };
        write!(f, "{op_str}")
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}
