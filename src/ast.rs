//! The Shape Expressions schema AST.
//!
//! Every variant that can be referenced by label (`ShapeRef`/`TripleExprRef`)
//! carries an optional `id`. The tree never owns a cycle: a schema author
//! expresses recursive shapes with `ShapeExpr::Ref`, and `Context` is the
//! only structure that turns a label back into a pointer (see `context.rs`).

use std::fmt::{Display, Formatter};

use oxigraph::model::{BlankNode, NamedNode};
use regex::Regex;

use crate::node::Node;

/// A schema-internal identifier: every `shapeExpr`/`tripleExpr` may declare
/// one of these so it can be the target of a `Ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
    Iri(NamedNode),
    BlankNode(BlankNode),
}

impl Display for ShapeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeLabel::Iri(n) => write!(f, "{}", n.as_str()),
            ShapeLabel::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for ShapeLabel {
    fn from(n: NamedNode) -> Self {
        ShapeLabel::Iri(n)
    }
}

impl From<BlankNode> for ShapeLabel {
    fn from(b: BlankNode) -> Self {
        ShapeLabel::BlankNode(b)
    }
}

/// `max` cardinality: either a concrete bound or `*` (unbounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCardinality {
    Bounded(u32),
    Unbounded,
}

impl MaxCardinality {
    pub fn allows(&self, count: u32) -> bool {
        match self {
            MaxCardinality::Bounded(n) => count <= *n,
            MaxCardinality::Unbounded => true,
        }
    }
}

/// `nodeKind` facet values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Iri,
    BNode,
    Literal,
    NonLiteral,
}

impl NodeKind {
    pub fn matches(&self, n: &Node) -> bool {
        match self {
            NodeKind::Iri => n.is_iri(),
            NodeKind::BNode => n.is_blank_node(),
            NodeKind::Literal => n.is_literal(),
            NodeKind::NonLiteral => !n.is_literal(),
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Iri => write!(f, "iri"),
            NodeKind::BNode => write!(f, "bnode"),
            NodeKind::Literal => write!(f, "literal"),
            NodeKind::NonLiteral => write!(f, "nonliteral"),
        }
    }
}

/// A compiled `xsPattern` facet: the regex plus the raw flags string, kept
/// around for diagnostics and `PartialEq` (compiled `Regex` has no `Eq`).
#[derive(Debug, Clone)]
pub struct PatternFacet {
    pub pattern: String,
    pub flags: Option<String>,
    pub regex: Regex,
}

impl PartialEq for PatternFacet {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}
impl Eq for PatternFacet {}

/// XSD-style facets attached to a `NodeConstraint`. Every field is
/// independently optional; all present facets must hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XsFacets {
    pub length: Option<u32>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<PatternFacet>,
    pub min_inclusive: Option<String>,
    pub max_inclusive: Option<String>,
    pub min_exclusive: Option<String>,
    pub max_exclusive: Option<String>,
    pub total_digits: Option<u32>,
    pub fraction_digits: Option<u32>,
}

impl XsFacets {
    pub fn is_empty(&self) -> bool {
        self == &XsFacets::default()
    }
}

/// One element of a `values` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSetValue {
    ObjectValue(Node),
    IriStem(String),
    IriStemRange(StemRangeBound, Vec<ValueSetValue>),
    LiteralStem(String),
    LiteralStemRange(StemRangeBound, Vec<ValueSetValue>),
    LanguageStem(String),
    LanguageStemRange(StemRangeBound, Vec<ValueSetValue>),
}

/// The stem of a `*StemRange`: a literal prefix, or the wildcard that
/// matches anything not caught by an exclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StemRangeBound {
    Stem(String),
    Wildcard,
}

/// A leaf node constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeConstraint {
    pub id: Option<ShapeLabel>,
    pub node_kind: Option<NodeKind>,
    pub datatype: Option<NamedNode>,
    pub facets: XsFacets,
    pub values: Option<Vec<ValueSetValue>>,
}

/// A shape expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeExpr {
    ShapeAnd {
        id: Option<ShapeLabel>,
        operands: Vec<ShapeExpr>,
    },
    ShapeOr {
        id: Option<ShapeLabel>,
        operands: Vec<ShapeExpr>,
    },
    ShapeNot {
        id: Option<ShapeLabel>,
        operand: Box<ShapeExpr>,
    },
    Shape {
        id: Option<ShapeLabel>,
        expression: Option<Box<TripleExpr>>,
        closed: bool,
        extra: Vec<NamedNode>,
    },
    NodeConstraint(NodeConstraint),
    /// Reference to another `shapeExpr` by label, resolved via `Context`.
    Ref(ShapeLabel),
}

impl ShapeExpr {
    pub fn id(&self) -> Option<&ShapeLabel> {
        match self {
            ShapeExpr::ShapeAnd { id, .. }
            | ShapeExpr::ShapeOr { id, .. }
            | ShapeExpr::ShapeNot { id, .. }
            | ShapeExpr::Shape { id, .. } => id.as_ref(),
            ShapeExpr::NodeConstraint(nc) => nc.id.as_ref(),
            ShapeExpr::Ref(_) => None,
        }
    }
}

/// A triple expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TripleExpr {
    EachOf {
        id: Option<ShapeLabel>,
        expressions: Vec<TripleExpr>,
        min: u32,
        max: MaxCardinality,
    },
    OneOf {
        id: Option<ShapeLabel>,
        expressions: Vec<TripleExpr>,
        min: u32,
        max: MaxCardinality,
    },
    TripleConstraint {
        id: Option<ShapeLabel>,
        predicate: NamedNode,
        value_expr: Option<Box<ShapeExpr>>,
        min: u32,
        max: MaxCardinality,
        inverse: bool,
    },
    /// Reference to another `tripleExpr` by label, resolved via `Context`.
    Ref(ShapeLabel),
}

impl TripleExpr {
    pub fn id(&self) -> Option<&ShapeLabel> {
        match self {
            TripleExpr::EachOf { id, .. }
            | TripleExpr::OneOf { id, .. }
            | TripleExpr::TripleConstraint { id, .. } => id.as_ref(),
            TripleExpr::Ref(_) => None,
        }
    }
}

/// A schema: a start shape expression plus every top-level, labeled shape
/// expression declared in the schema (`Context` indexes both, and anything
/// reachable from either, by label).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub start: Option<ShapeExpr>,
    pub shapes: Vec<ShapeExpr>,
}
