//! The triple-expression evaluator: backtracking partition search
//! over a node's arcs-out (and arcs-in, for inverse constraints).

use crate::ast::{MaxCardinality, TripleExpr};
use crate::context::Context;
use crate::node::{Node, Triple};
use crate::shape_expr::satisfies;
use crate::trace::ParseNode;

/// The arcs available to match against, split by direction since an
/// outgoing and an incoming triple constraint draw from disjoint pools.
#[derive(Debug, Clone, Default)]
pub struct ArcPool {
    pub out_arcs: Vec<Triple>,
    pub in_arcs: Vec<Triple>,
}

/// Every distinct way the expression can consume part of `pool`, expressed
/// as the arc pool left over after a successful match. Failure is an empty
/// vector; success is "exists a leftover".
pub fn matches<'a>(
    ctx: &Context<'a>,
    n: &Node,
    te: &'a TripleExpr,
    pool: &ArcPool,
    trace: &mut ParseNode,
) -> Vec<ArcPool> {
    match te {
        TripleExpr::TripleConstraint {
            predicate,
            value_expr,
            min,
            max,
            inverse,
            ..
        } => {
            let round = |pool: &ArcPool, trace: &mut ParseNode| {
                one_round_triple_constraint(ctx, n, predicate, value_expr.as_deref(), *inverse, pool, trace)
            };
            match_n_times(&round, *min, *max, pool, trace)
        }
        TripleExpr::EachOf { expressions, min, max, .. } => {
            let round = |pool: &ArcPool, trace: &mut ParseNode| one_round_each_of(ctx, n, expressions, pool, trace);
            match_n_times(&round, *min, *max, pool, trace)
        }
        TripleExpr::OneOf { expressions, min, max, .. } => {
            let round = |pool: &ArcPool, trace: &mut ParseNode| one_round_one_of(ctx, n, expressions, pool, trace);
            match_n_times(&round, *min, *max, pool, trace)
        }
        TripleExpr::Ref(label) => match ctx.triple_expr_for(label) {
            Ok(target) => matches(ctx, n, target, pool, trace),
            Err(e) => {
                trace.fail(e.to_string());
                Vec::new()
            }
        },
    }
}

/// One arc, individually, either satisfies a `TripleConstraint` occurrence
/// or it doesn't; this returns every candidate arc's outcome as its own
/// "one unit consumed" branch, so `match_n_times` can pick between `min`
/// and `max` of them.
fn one_round_triple_constraint<'a>(
    ctx: &Context<'a>,
    _n: &Node,
    predicate: &oxigraph::model::NamedNode,
    value_expr: Option<&'a crate::ast::ShapeExpr>,
    inverse: bool,
    pool: &ArcPool,
    trace: &mut ParseNode,
) -> Vec<ArcPool> {
    let candidates: Vec<(usize, &Triple)> = if inverse {
        pool.in_arcs.iter().enumerate().filter(|(_, t)| &t.predicate == predicate).collect()
    } else {
        pool.out_arcs.iter().enumerate().filter(|(_, t)| &t.predicate == predicate).collect()
    };

    let mut outcomes = Vec::new();
    for (idx, arc) in candidates {
        let target = if inverse { &arc.subject } else { &arc.object };
        let ok = match value_expr {
            Some(ve) => {
                let mut child = ParseNode::new("satisfies", describe_shape_expr(ve), target.clone());
                let result = satisfies(ctx, target, ve, &mut child);
                trace.add_child(child);
                result
            }
            None => true,
        };
        if ok {
            let mut leftover = pool.clone();
            if inverse {
                leftover.in_arcs.remove(idx);
            } else {
                leftover.out_arcs.remove(idx);
            }
            outcomes.push(leftover);
        }
    }
    outcomes
}

fn one_round_each_of<'a>(
    ctx: &Context<'a>,
    n: &Node,
    expressions: &'a [TripleExpr],
    pool: &ArcPool,
    trace: &mut ParseNode,
) -> Vec<ArcPool> {
    let mut options = vec![pool.clone()];
    for sub in expressions {
        let mut next_options = Vec::new();
        for opt in &options {
            next_options.extend(matches(ctx, n, sub, opt, trace));
        }
        options = next_options;
        if options.is_empty() {
            break;
        }
    }
    options
}

fn one_round_one_of<'a>(
    ctx: &Context<'a>,
    n: &Node,
    expressions: &'a [TripleExpr],
    pool: &ArcPool,
    trace: &mut ParseNode,
) -> Vec<ArcPool> {
    let mut outcomes = Vec::new();
    for sub in expressions {
        outcomes.extend(matches(ctx, n, sub, pool, trace));
    }
    outcomes
}

/// Applies `round` between `min` and `max` times, backtracking over how
/// many repetitions to take (stopping anywhere in `[min, max]`).
fn match_n_times(
    round: &dyn Fn(&ArcPool, &mut ParseNode) -> Vec<ArcPool>,
    min: u32,
    max: MaxCardinality,
    pool: &ArcPool,
    trace: &mut ParseNode,
) -> Vec<ArcPool> {
    fn search(
        round: &dyn Fn(&ArcPool, &mut ParseNode) -> Vec<ArcPool>,
        r: u32,
        min: u32,
        max: MaxCardinality,
        pool: &ArcPool,
        trace: &mut ParseNode,
    ) -> Vec<ArcPool> {
        let mut results = Vec::new();
        if r >= min {
            results.push(pool.clone());
        }
        if max.allows(r + 1) {
            for leftover in round(pool, trace) {
                results.extend(search(round, r + 1, min, max, &leftover, trace));
            }
        }
        results
    }
    search(round, 0, min, max, pool, trace)
}

fn describe_shape_expr(se: &crate::ast::ShapeExpr) -> String {
    match se.id() {
        Some(id) => id.to_string(),
        None => "<anonymous shapeExpr>".to_string(),
    }
}
