//! Instructions of the linear IR.
use dflow_utils::Id;
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

/// Operator of an [Operation].
///
/// The core operators are spelled out so that analyses can match on them;
/// anything else is kept verbatim in [Opcode::Other].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Const,
    Add,
    Mul,
    Sub,
    Div,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Not,
    And,
    Or,
    Jmp,
    Br,
    Call,
    Ret,
    Id,
    Print,
    Nop,
    Other(Id),
}

impl Opcode {
    /// Terminators end a basic block.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Br | Opcode::Ret)
    }

    /// Transfers control to one of the operation's labels.
    pub fn is_branch(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Br)
    }

    /// Operations whose only effect is to compute their result.
    pub fn is_pure(&self) -> bool {
        !matches!(
            self,
            Opcode::Jmp
                | Opcode::Br
                | Opcode::Ret
                | Opcode::Call
                | Opcode::Print
                | Opcode::Nop
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Opcode::Const => "const",
            Opcode::Add => "add",
            Opcode::Mul => "mul",
            Opcode::Sub => "sub",
            Opcode::Div => "div",
            Opcode::Eq => "eq",
            Opcode::Lt => "lt",
            Opcode::Gt => "gt",
            Opcode::Le => "le",
            Opcode::Ge => "ge",
            Opcode::Not => "not",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Jmp => "jmp",
            Opcode::Br => "br",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Id => "id",
            Opcode::Print => "print",
            Opcode::Nop => "nop",
            Opcode::Other(op) => op.as_str(),
        }
    }
}

impl FromStr for Opcode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "const" => Opcode::Const,
            "add" => Opcode::Add,
            "mul" => Opcode::Mul,
            "sub" => Opcode::Sub,
            "div" => Opcode::Div,
            "eq" => Opcode::Eq,
            "lt" => Opcode::Lt,
            "gt" => Opcode::Gt,
            "le" => Opcode::Le,
            "ge" => Opcode::Ge,
            "not" => Opcode::Not,
            "and" => Opcode::And,
            "or" => Opcode::Or,
            "jmp" => Opcode::Jmp,
            "br" => Opcode::Br,
            "call" => Opcode::Call,
            "ret" => Opcode::Ret,
            "id" => Opcode::Id,
            "print" => Opcode::Print,
            "nop" => Opcode::Nop,
            other => Opcode::Other(Id::from(other)),
        })
    }
}

// Sorted by spelling, so expressions print in alphabetical order. An `Other`
// that spells a core operator sorts after it.
impl PartialOrd for Opcode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Opcode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let is_other = |op: &Opcode| matches!(op, Opcode::Other(_));
        self.as_str()
            .cmp(other.as_str())
            .then_with(|| is_other(self).cmp(&is_other(other)))
    }
}

impl From<&str> for Opcode {
    fn from(s: &str) -> Self {
        match s.parse::<Opcode>() {
            Ok(op) => op,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal carried by a `const` operation.
#[derive(Clone, Copy, Debug)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Float(f64),
}

// Floats compare by bit pattern so that literals can live in maps and be
// compared exactly by constant propagation.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Int(a), Literal::Int(b)) => a == b,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Float(a), Literal::Float(b)) => {
                a.to_bits() == b.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::Int(v) => v.hash(state),
            Literal::Bool(v) => v.hash(state),
            Literal::Float(v) => v.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// An instruction that does something: computes a value, has an effect, or
/// transfers control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub op: Opcode,
    /// Variable written by this operation.
    pub dest: Option<Id>,
    /// Variables read by this operation, in order.
    pub args: Vec<Id>,
    /// Branch targets, in order.
    pub labels: Vec<Id>,
    /// Functions referenced by a `call`.
    pub funcs: Vec<Id>,
    pub value: Option<Literal>,
}

impl Operation {
    /// An operation with no operands. Use the builder methods to fill in the
    /// rest.
    pub fn new(op: Opcode) -> Self {
        Operation {
            op,
            dest: None,
            args: vec![],
            labels: vec![],
            funcs: vec![],
            value: None,
        }
    }

    pub fn with_dest<S: Into<Id>>(mut self, dest: S) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Id>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Id>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value(mut self, value: Literal) -> Self {
        self.value = Some(value);
        self
    }

    /// `dest = const value`
    pub fn constant<S: Into<Id>>(dest: S, value: Literal) -> Self {
        Operation::new(Opcode::Const)
            .with_dest(dest)
            .with_value(value)
    }

    /// `dest = op args...`
    pub fn compute<S, I, A>(op: Opcode, dest: S, args: I) -> Self
    where
        S: Into<Id>,
        I: IntoIterator<Item = A>,
        A: Into<Id>,
    {
        Operation::new(op).with_dest(dest).with_args(args)
    }

    /// `jmp .target`
    pub fn jump<S: Into<Id>>(target: S) -> Self {
        Operation::new(Opcode::Jmp).with_labels([target])
    }

    /// `br cond .then .else`
    pub fn branch<C, T, E>(cond: C, then: T, els: E) -> Self
    where
        C: Into<Id>,
        T: Into<Id>,
        E: Into<Id>,
    {
        Operation::new(Opcode::Br)
            .with_args([cond])
            .with_labels([then.into(), els.into()])
    }

    /// `ret`
    pub fn ret() -> Self {
        Operation::new(Opcode::Ret)
    }

    /// `print args...`
    pub fn print<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Id>,
    {
        Operation::new(Opcode::Print).with_args(args)
    }

    pub fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }
}

/// An element of a function's instruction stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Operation(Operation),
    Label(Id),
}

impl Instruction {
    pub fn label<S: Into<Id>>(name: S) -> Self {
        Instruction::Label(name.into())
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match self {
            Instruction::Operation(op) => Some(op),
            Instruction::Label(_) => None,
        }
    }
}

impl From<Operation> for Instruction {
    fn from(op: Operation) -> Self {
        Instruction::Operation(op)
    }
}
