//! The validator entry point: `is_valid(ctx, shape_map)`.

use log::{debug, warn};

use crate::ast::ShapeLabel;
use crate::context::Context;
use crate::err::ShexError;
use crate::node::Node;
use crate::shape_expr::satisfies;
use crate::trace::ParseNode;

/// A shape-map label: a concrete shape `Iri`, or the `START` sentinel
/// resolving to the schema's designated start shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMapLabel {
    Iri(ShapeLabel),
    Start,
}

/// One `(nodeSelector, shapeLabel)` pair of the input shape map. Only fully
/// resolved node selectors are supported.
#[derive(Debug, Clone)]
pub struct ShapeMapEntry {
    pub node: Node,
    pub label: ShapeMapLabel,
}

impl ShapeMapEntry {
    pub fn new(node: Node, label: ShapeMapLabel) -> Self {
        ShapeMapEntry { node, label }
    }

    pub fn start(node: Node) -> Self {
        ShapeMapEntry {
            node,
            label: ShapeMapLabel::Start,
        }
    }
}

pub type ShapeMap = Vec<ShapeMapEntry>;

/// `isValid(ctx, shapeMap) -> (bool, reasons)`. Fails fast on the
/// first failing `(node, label)` pair; within the evaluation of one pair,
/// every explored branch is recorded on the trace.
pub fn is_valid<'a>(ctx: &Context<'a>, shape_map: &ShapeMap) -> (bool, Vec<String>) {
    for entry in shape_map {
        debug!("validating {} against {}", entry.node, describe_label(&entry.label));

        if let ShapeMapLabel::Iri(ShapeLabel::BlankNode(_)) = &entry.label {
            warn!("blank-node shape labels are unsupported");
            return (false, vec![ShexError::BlankShapeRefUnsupported.to_string()]);
        }

        let se = match &entry.label {
            ShapeMapLabel::Start => match &ctx.schema.start {
                Some(se) => se,
                None => {
                    warn!("schema has no START shape");
                    return (false, vec![ShexError::UnknownStartShape.to_string()]);
                }
            },
            ShapeMapLabel::Iri(label) => match ctx.shape_expr_for(label) {
                Ok(se) => se,
                Err(e) => {
                    warn!("failed to resolve shape label {label:?}: {e}");
                    return (false, vec![e.to_string()]);
                }
            },
        };

        let mut trace = ParseNode::new("satisfies", describe_label(&entry.label), entry.node.clone());
        let ok = satisfies(ctx, &entry.node, se, &mut trace);
        trace.set_result(ok);
        *ctx.current_node.borrow_mut() = Some(trace);

        if !ok {
            let reasons = ctx
                .current_node
                .borrow()
                .as_ref()
                .map(ParseNode::process_reasons)
                .unwrap_or_default();
            warn!("{} does not satisfy {}: {:?}", entry.node, describe_label(&entry.label), reasons);
            return (false, reasons);
        }
    }

    (true, Vec::new())
}

fn describe_label(label: &ShapeMapLabel) -> String {
    match label {
        ShapeMapLabel::Start => "START".to_string(),
        ShapeMapLabel::Iri(l) => l.to_string(),
    }
}
