//! Cycle-aware traversal of the schema's shape/triple-expression graphs,
//! used for static analysis and pre-computation — entirely separate from
//! the evaluator's runtime `assumptions` set.

use std::collections::HashSet;

use crate::ast::{ShapeExpr, ShapeLabel, TripleExpr};
use crate::context::Context;

/// Four-set bookkeeping for a single traversal: a labeled expression moves
/// from `visiting_*` to `seen_*` on exit, and is skipped entirely if
/// already in `seen_*`. A label found in `visiting_*` identifies a cycle to
/// cut. Anonymous sub-expressions (no `id`) are visited every time they are
/// encountered, since they cannot themselves participate in a cycle.
#[derive(Debug, Default)]
pub struct VisitorCenter {
    seen_shapes: HashSet<ShapeLabel>,
    visiting_shapes: HashSet<ShapeLabel>,
    seen_tes: HashSet<ShapeLabel>,
    visiting_tes: HashSet<ShapeLabel>,
}

impl VisitorCenter {
    pub fn new() -> Self {
        VisitorCenter::default()
    }

    fn start_visiting_shape(&mut self, label: ShapeLabel) {
        self.visiting_shapes.insert(label);
    }

    fn done_visiting_shape(&mut self, label: &ShapeLabel) {
        self.visiting_shapes.remove(label);
        self.seen_shapes.insert(label.clone());
    }

    fn already_seen_shape(&self, label: &ShapeLabel) -> bool {
        self.seen_shapes.contains(label)
    }

    fn actively_visiting_shape(&self, label: &ShapeLabel) -> bool {
        self.visiting_shapes.contains(label)
    }

    fn start_visiting_te(&mut self, label: ShapeLabel) {
        self.visiting_tes.insert(label);
    }

    fn done_visiting_te(&mut self, label: &ShapeLabel) {
        self.visiting_tes.remove(label);
        self.seen_tes.insert(label.clone());
    }

    fn already_seen_te(&self, label: &ShapeLabel) -> bool {
        self.seen_tes.contains(label)
    }

    fn actively_visiting_te(&self, label: &ShapeLabel) -> bool {
        self.visiting_tes.contains(label)
    }
}

/// Visits `root` and every `shapeExpr`/`tripleExpr` reachable from it,
/// calling `on_shape`/`on_te` once per labeled expression (plus once for
/// every anonymous expression encountered). Terminates on cyclic schemas
/// and visits each labeled expression at most once.
pub fn visit_shapes<'a>(
    ctx: &Context<'a>,
    root: &'a ShapeExpr,
    center: &mut VisitorCenter,
    on_shape: &mut dyn FnMut(&'a ShapeExpr),
    on_te: &mut dyn FnMut(&'a TripleExpr),
) {
    let id = root.id().cloned();
    let has_id = id.is_some();

    if has_id {
        let label = id.clone().unwrap();
        if center.already_seen_shape(&label) {
            return;
        }
        center.start_visiting_shape(label);
    }

    on_shape(root);

    match root {
        ShapeExpr::ShapeAnd { operands, .. } | ShapeExpr::ShapeOr { operands, .. } => {
            for op in operands {
                visit_shapes(ctx, op, center, on_shape, on_te);
            }
        }
        ShapeExpr::ShapeNot { operand, .. } => {
            // REDESIGN: the source recurses on `expr` itself here, which
            // would re-visit this same node forever. Recurse on the
            // operand instead.
            visit_shapes(ctx, operand, center, on_shape, on_te);
        }
        ShapeExpr::Shape { expression, .. } => {
            if let Some(te) = expression {
                visit_triple_expressions(ctx, te, center, on_shape, on_te);
            }
        }
        ShapeExpr::NodeConstraint(_) => {}
        ShapeExpr::Ref(label) => {
            if !center.actively_visiting_shape(label) {
                if let Ok(target) = ctx.shape_expr_for(label) {
                    visit_shapes(ctx, target, center, on_shape, on_te);
                }
            }
        }
    }

    if let Some(label) = id {
        center.done_visiting_shape(&label);
    }
}

pub fn visit_triple_expressions<'a>(
    ctx: &Context<'a>,
    root: &'a TripleExpr,
    center: &mut VisitorCenter,
    on_shape: &mut dyn FnMut(&'a ShapeExpr),
    on_te: &mut dyn FnMut(&'a TripleExpr),
) {
    let id = root.id().cloned();
    let has_id = id.is_some();

    if has_id {
        let label = id.clone().unwrap();
        // REDESIGN: the source's guard here is inverted relative to
        // `visit_shapes` (`already_seen_te` without the `not`), which would
        // skip every *unseen* labeled expression and recurse forever on
        // anything actually seen. Mirror `visit_shapes`'s sense instead.
        if center.already_seen_te(&label) {
            return;
        }
        center.start_visiting_te(label);
    }

    on_te(root);

    match root {
        TripleExpr::EachOf { expressions, .. } | TripleExpr::OneOf { expressions, .. } => {
            for sub in expressions {
                visit_triple_expressions(ctx, sub, center, on_shape, on_te);
            }
        }
        TripleExpr::TripleConstraint { value_expr, .. } => {
            if let Some(ve) = value_expr {
                visit_shapes(ctx, ve, center, on_shape, on_te);
            }
        }
        TripleExpr::Ref(label) => {
            if !center.actively_visiting_te(label) {
                if let Ok(target) = ctx.triple_expr_for(label) {
                    visit_triple_expressions(ctx, target, center, on_shape, on_te);
                }
            }
        }
    }

    if let Some(label) = id {
        center.done_visiting_te(&label);
    }
}
