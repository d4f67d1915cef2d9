use std::fmt::{Display, Formatter};

use oxigraph::model::{BlankNode, Literal, NamedNode, Term};

/// An RDF node: IRI, blank node, or literal.
///
/// Owning variant of `oxigraph::model::Term`, used everywhere the engine
/// needs a node that outlives the borrow of any one graph query (shape-map
/// entries, value-set elements, trace diagnostics).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Result<Self, oxigraph::model::IriParseError> {
        Ok(Node::Iri(NamedNode::new(iri)?))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Node::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// The node's lexical form: the IRI string, blank node id, or a
    /// literal's lexical value (ignoring datatype/language tag).
    pub fn lexical_form(&self) -> &str {
        match self {
            Node::Iri(n) => n.as_str(),
            Node::BlankNode(b) => b.as_str(),
            Node::Literal(l) => l.value(),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<NamedNode> for Node {
    fn from(n: NamedNode) -> Self {
        Node::Iri(n)
    }
}

impl From<BlankNode> for Node {
    fn from(b: BlankNode) -> Self {
        Node::BlankNode(b)
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Node::Literal(l)
    }
}

impl From<Term> for Node {
    fn from(t: Term) -> Self {
        match t {
            Term::NamedNode(n) => Node::Iri(n),
            Term::BlankNode(b) => Node::BlankNode(b),
            Term::Literal(l) => Node::Literal(l),
            #[allow(unreachable_patterns)]
            _ => unreachable!("RDF-star quoted triples are not part of this model"),
        }
    }
}

impl From<Node> for Term {
    fn from(n: Node) -> Self {
        match n {
            Node::Iri(i) => Term::NamedNode(i),
            Node::BlankNode(b) => Term::BlankNode(b),
            Node::Literal(l) => Term::Literal(l),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Iri(n) => write!(f, "{}", n.as_str()),
            Node::BlankNode(b) => write!(f, "{}", b),
            Node::Literal(l) => write!(f, "{}", l.value()),
        }
    }
}

/// A single RDF triple, owning its three terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: NamedNode,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: NamedNode, object: Node) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate.as_str(), self.object)
    }
}
