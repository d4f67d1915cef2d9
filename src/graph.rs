//! The graph adapter contract: the engine never stores or queries RDF
//! itself, it consults whatever `Graph` implementation the caller supplies.

use oxigraph::model::{GraphNameRef, NamedNode, SubjectRef, TermRef};

use crate::node::{Node, Triple};

/// External collaborator: a read-only view over an RDF graph, queried by
/// the *neighbourhood* of a single node.
pub trait Graph {
    /// All triples with `n` as subject.
    fn arcs_out(&self, n: &Node) -> Vec<Triple>;

    /// All triples with `n` as object. Only required if the schema under
    /// validation uses inverse triple constraints.
    fn arcs_in(&self, n: &Node) -> Vec<Triple>;

    /// One object of `(s, p, ·)`, if any; `None` if there are zero or more
    /// than one (the contract leaves the multi-valued case undefined).
    fn value(&self, s: &Node, p: &NamedNode) -> Option<Node> {
        let mut matches = self.arcs_out(s).into_iter().filter(|t| &t.predicate == p);
        let first = matches.next()?;
        if matches.next().is_some() {
            None
        } else {
            Some(first.object)
        }
    }
}

/// A concrete `Graph` backed by an in-memory `oxigraph::model::Graph`.
///
/// Not part of the core algorithm; a convenience for tests and the CLI demo
/// that need a working adapter without standing up a triple store.
pub struct OxigraphGraph {
    graph: oxigraph::model::Graph,
}

impl OxigraphGraph {
    pub fn new(graph: oxigraph::model::Graph) -> Self {
        OxigraphGraph { graph }
    }

    pub fn from_turtle(turtle: &str) -> Result<Self, oxigraph::io::RdfParseError> {
        use oxigraph::io::{RdfFormat, RdfParser};

        let mut graph = oxigraph::model::Graph::new();
        let parser = RdfParser::from_format(RdfFormat::Turtle)
            .without_named_graphs()
            .with_base_iri("http://example.org/")
            .expect("literal base IRI is always valid");
        for quad in parser.for_reader(turtle.as_bytes()) {
            let quad = quad?;
            graph.insert(quad.as_ref().into());
        }
        Ok(OxigraphGraph { graph })
    }
}

fn subject_ref(n: &Node) -> Option<SubjectRef<'_>> {
    match n {
        Node::Iri(i) => Some(SubjectRef::NamedNode(i.as_ref())),
        Node::BlankNode(b) => Some(SubjectRef::BlankNode(b.as_ref())),
        Node::Literal(_) => None,
    }
}

impl Graph for OxigraphGraph {
    fn arcs_out(&self, n: &Node) -> Vec<Triple> {
        let Some(subject) = subject_ref(n) else {
            return Vec::new();
        };
        self.graph
            .triples_for_subject(subject)
            .filter(|t| t.graph_name == GraphNameRef::DefaultGraph)
            .map(|t| {
                Triple::new(
                    n.clone(),
                    t.predicate.into_owned(),
                    node_from_term_ref(t.object),
                )
            })
            .collect()
    }

    fn arcs_in(&self, n: &Node) -> Vec<Triple> {
        let object: TermRef<'_> = match n {
            Node::Iri(i) => i.as_ref().into(),
            Node::BlankNode(b) => b.as_ref().into(),
            Node::Literal(l) => l.as_ref().into(),
        };
        self.graph
            .triples_for_object(object)
            .filter(|t| t.graph_name == GraphNameRef::DefaultGraph)
            .map(|t| {
                Triple::new(
                    subject_to_node(t.subject),
                    t.predicate.into_owned(),
                    n.clone(),
                )
            })
            .collect()
    }
}

fn node_from_term_ref(t: TermRef<'_>) -> Node {
    match t {
        TermRef::NamedNode(n) => Node::Iri(n.into_owned()),
        TermRef::BlankNode(b) => Node::BlankNode(b.into_owned()),
        TermRef::Literal(l) => Node::Literal(l.into_owned()),
        #[allow(unreachable_patterns)]
        _ => unreachable!("RDF-star quoted triples are not part of this model"),
    }
}

fn subject_to_node(s: SubjectRef<'_>) -> Node {
    match s {
        SubjectRef::NamedNode(n) => Node::Iri(n.into_owned()),
        SubjectRef::BlankNode(b) => Node::BlankNode(b.into_owned()),
        #[allow(unreachable_patterns)]
        _ => unreachable!("RDF-star quoted triples are not part of this model"),
    }
}
