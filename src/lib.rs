pub mod ast;
pub mod context;
pub mod err;
pub mod graph;
pub mod node;
pub mod node_constraint;
pub mod shape_expr;
pub mod trace;
pub mod triple_expr;
pub mod validator;
pub mod visitor;

pub use ast::{MaxCardinality, NodeConstraint, NodeKind, Schema, ShapeExpr, ShapeLabel, TripleExpr};
pub use context::Context;
pub use err::ShexError;
pub use graph::{Graph, OxigraphGraph};
pub use node::{Node, Triple};
pub use trace::ParseNode;
pub use validator::{is_valid, ShapeMap, ShapeMapEntry, ShapeMapLabel};
