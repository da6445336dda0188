use std::fmt::{self, Write as _};
use std::ops::Index;

use kaleido_arena::{Array, BumpArena};
use kaleido_errors::Diagnostic;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn try_new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    Number,
    Variable,
    Binary,
    Call,
    Error,
}

/// An expression. Names and argument lists live in the arena, children are
/// ids into the node sequence of the same [`Module`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    Number(f64),
    Variable(&'a str),
    Binary { op: char, lhs: NodeId, rhs: NodeId },
    Call { callee: &'a str, args: &'a [NodeId] },
    /// Stands in for an expression that failed to parse. The message went to
    /// the diagnostics.
    Error,
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Number(_) => NodeKind::Number,
            Node::Variable(_) => NodeKind::Variable,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Call { .. } => NodeKind::Call,
            Node::Error => NodeKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error)
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Node::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&'a str> {
        match *self {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<(char, NodeId, NodeId)> {
        match *self {
            Node::Binary { op, lhs, rhs } => Some((op, lhs, rhs)),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<(&'a str, &'a [NodeId])> {
        match *self {
            Node::Call { callee, args } => Some((callee, args)),
            _ => None,
        }
    }
}

/// Name and parameter names of a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prototype<'a> {
    pub name: &'a str,
    pub params: &'a [&'a str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Function<'a> {
    pub prototype: Prototype<'a>,
    pub body: NodeId,
}

/// Marks the [`Node::Error`] that a failed production left in the node
/// sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorNode(pub(crate) NodeId);

impl ErrorNode {
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// One top-level parse attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item<'a> {
    Definition(Function<'a>),
    Extern(Prototype<'a>),
    /// A bare expression, wrapped in a function named
    /// [`ANONYMOUS_FUNCTION`](crate::grammar::items::ANONYMOUS_FUNCTION).
    Expression(Function<'a>),
    Error(ErrorNode),
}

/// Past this depth the dump stops indenting and prefixes each line with its
/// depth instead.
const MAX_INDENT_DEPTH: usize = 64;

pub struct Module<'a> {
    pub(crate) nodes: Array<Node<'a>, &'a BumpArena>,
    pub(crate) items: Array<Item<'a>, &'a BumpArena>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Module<'a> {
    pub fn node(&self, id: NodeId) -> Option<&Node<'a>> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[Node<'a>] {
        self.nodes.as_slice()
    }

    pub fn items(&self) -> &[Item<'a>] {
        self.items.as_slice()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn debug_tree(&self) -> String {
        let mut buf = String::new();
        for item in self.items() {
            self.write_item(&mut buf, item).unwrap_or_else(|_| unreachable!());
        }
        buf
    }

    fn write_item(&self, buf: &mut String, item: &Item<'a>) -> fmt::Result {
        match *item {
            Item::Definition(function) => {
                writeln!(buf, "DEFINITION {}", DisplayPrototype(function.prototype))?;
                self.write_node(buf, function.body, 1)
            }
            Item::Extern(prototype) => writeln!(buf, "EXTERN {}", DisplayPrototype(prototype)),
            Item::Expression(function) => {
                writeln!(buf, "EXPRESSION")?;
                self.write_node(buf, function.body, 1)
            }
            Item::Error(_) => writeln!(buf, "ERROR"),
        }
    }

    fn write_node(&self, buf: &mut String, root: NodeId, depth: usize) -> fmt::Result {
        let mut stack = vec![(root, depth)];

        while let Some((id, depth)) = stack.pop() {
            let indent = depth.min(MAX_INDENT_DEPTH) * 2;
            write!(buf, "{:indent$}", "")?;
            if depth > MAX_INDENT_DEPTH {
                write!(buf, "{depth}: ")?;
            }

            match self[id] {
                Node::Number(value) => writeln!(buf, "NUMBER {value:?}")?,
                Node::Variable(name) => writeln!(buf, "VARIABLE {name}")?,
                Node::Binary { op, lhs, rhs } => {
                    writeln!(buf, "BINARY '{op}'")?;
                    stack.push((rhs, depth + 1));
                    stack.push((lhs, depth + 1));
                }
                Node::Call { callee, args } => {
                    writeln!(buf, "CALL {callee}")?;
                    stack.extend(args.iter().rev().map(|&arg| (arg, depth + 1)));
                }
                Node::Error => writeln!(buf, "ERROR")?,
            }
        }

        Ok(())
    }
}

impl<'a> Index<NodeId> for Module<'a> {
    type Output = Node<'a>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes.as_slice()[id.index()]
    }
}

struct DisplayPrototype<'a>(Prototype<'a>);

impl fmt::Display for DisplayPrototype<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.0.name, self.0.params.join(", "))
    }
}
