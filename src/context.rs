//! The schema context: label → expression cross-reference tables,
//! the parse-trace cursor, and the cycle-cut bookkeeping shared by the
//! evaluator and the static visitor.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::debug;

use crate::ast::{Schema, ShapeExpr, ShapeLabel, TripleExpr};
use crate::err::ShexError;
use crate::graph::Graph;
use crate::node::Node;
use crate::trace::ParseNode;

/// Constructed once per `is_valid` call from a borrowed graph and schema;
/// not safe to share across concurrent validations because the trace
/// cursor and the evaluator's assumption set are both interior-mutable.
pub struct Context<'a> {
    pub graph: &'a dyn Graph,
    pub schema: &'a Schema,
    schema_id_map: HashMap<ShapeLabel, &'a ShapeExpr>,
    te_id_map: HashMap<ShapeLabel, &'a TripleExpr>,

    /// The node currently being written to by the recursive evaluators.
    /// A convenience cursor; callers should not rely on its value
    /// outside of a single evaluator call stack.
    pub current_node: RefCell<Option<ParseNode>>,

    /// `(node, shape-label)` pairs currently under evaluation, used by the
    /// shape-expression evaluator to terminate on data-level recursion.
    /// Deliberately separate from the visitor's `seen_*`/`visiting_*`
    /// sets, which are a static-analysis device over the schema alone.
    assumptions: RefCell<HashSet<(Node, ShapeLabel)>>,
}

impl<'a> Context<'a> {
    pub fn new(graph: &'a dyn Graph, schema: &'a Schema) -> Self {
        let mut schema_id_map = HashMap::new();
        let mut te_id_map = HashMap::new();

        if let Some(start) = &schema.start {
            gen_schema_xref(start, &mut schema_id_map, &mut te_id_map);
        }
        for shape in &schema.shapes {
            gen_schema_xref(shape, &mut schema_id_map, &mut te_id_map);
        }

        debug!(
            "indexed {} shape expression(s) and {} triple expression(s)",
            schema_id_map.len(),
            te_id_map.len()
        );

        Context {
            graph,
            schema,
            schema_id_map,
            te_id_map,
            current_node: RefCell::new(None),
            assumptions: RefCell::new(HashSet::new()),
        }
    }

    /// Resolves a `shapeExpr` by label. Total over labels present in the
    /// schema; fails with `UnknownShapeLabel` otherwise.
    pub fn shape_expr_for(&self, label: &ShapeLabel) -> Result<&'a ShapeExpr, ShexError> {
        self.schema_id_map
            .get(label)
            .copied()
            .ok_or_else(|| ShexError::UnknownShapeLabel(label.clone()))
    }

    pub fn triple_expr_for(&self, label: &ShapeLabel) -> Result<&'a TripleExpr, ShexError> {
        self.te_id_map
            .get(label)
            .copied()
            .ok_or_else(|| ShexError::UnknownTripleExprLabel(label.clone()))
    }

    /// True if `(n, label)` is already being evaluated further up the call
    /// stack; used by the shape evaluator to cut cyclic references.
    pub fn is_assuming(&self, n: &Node, label: &ShapeLabel) -> bool {
        self.assumptions.borrow().contains(&(n.clone(), label.clone()))
    }

    pub fn start_assuming(&self, n: &Node, label: &ShapeLabel) {
        self.assumptions.borrow_mut().insert((n.clone(), label.clone()));
    }

    pub fn stop_assuming(&self, n: &Node, label: &ShapeLabel) {
        self.assumptions.borrow_mut().remove(&(n.clone(), label.clone()));
    }
}

/// Single recursive descent from a root `shapeExpr`, recording every
/// labeled sub-expression reached through `ShapeAnd`/`ShapeOr` operands,
/// `ShapeNot`'s operand, and `Shape.expression`.
fn gen_schema_xref<'a>(
    se: &'a ShapeExpr,
    schema_id_map: &mut HashMap<ShapeLabel, &'a ShapeExpr>,
    te_id_map: &mut HashMap<ShapeLabel, &'a TripleExpr>,
) {
    if let Some(id) = se.id() {
        schema_id_map.insert(id.clone(), se);
    }

    match se {
        ShapeExpr::ShapeAnd { operands, .. } | ShapeExpr::ShapeOr { operands, .. } => {
            for op in operands {
                gen_schema_xref(op, schema_id_map, te_id_map);
            }
        }
        ShapeExpr::ShapeNot { operand, .. } => {
            gen_schema_xref(operand, schema_id_map, te_id_map);
        }
        ShapeExpr::Shape { expression, .. } => {
            if let Some(te) = expression {
                gen_te_xref(te, schema_id_map, te_id_map);
            }
        }
        ShapeExpr::NodeConstraint(_) | ShapeExpr::Ref(_) => {}
    }
}

fn gen_te_xref<'a>(
    te: &'a TripleExpr,
    schema_id_map: &mut HashMap<ShapeLabel, &'a ShapeExpr>,
    te_id_map: &mut HashMap<ShapeLabel, &'a TripleExpr>,
) {
    if let Some(id) = te.id() {
        te_id_map.insert(id.clone(), te);
    }

    match te {
        TripleExpr::EachOf { expressions, .. } | TripleExpr::OneOf { expressions, .. } => {
            for sub in expressions {
                gen_te_xref(sub, schema_id_map, te_id_map);
            }
        }
        TripleExpr::TripleConstraint { value_expr, .. } => {
            if let Some(ve) = value_expr {
                gen_schema_xref(ve, schema_id_map, te_id_map);
            }
        }
        TripleExpr::Ref(_) => {}
    }
}
