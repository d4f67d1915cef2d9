//! The node-constraint evaluator: decides whether one RDF node
//! satisfies a leaf `NodeConstraint`.

use serde_json::{json, Value};

use crate::ast::{NodeConstraint, StemRangeBound, ValueSetValue};
use crate::node::Node;
use crate::trace::ParseNode;

const REASON_TRUNCATE_AT: usize = 60;

/// `nodeSatisfies(ctx, n, nc)`. All four checks are required; the
/// first one that fails attaches a reason to `trace` and short-circuits.
pub fn node_satisfies(node: &Node, nc: &NodeConstraint, trace: &mut ParseNode) -> bool {
    if let Some(kind) = nc.node_kind {
        if !kind.matches(node) {
            trace.fail(format!("Node: {node} is not of kind {kind}"));
            return false;
        }
    }

    if let Some(datatype) = &nc.datatype {
        match node.as_literal() {
            Some(lit) if lit.datatype() == datatype.as_ref() => {}
            _ => {
                trace.fail(format!(
                    "Node: {node} does not have datatype {}",
                    datatype.as_str()
                ));
                return false;
            }
        }
    }

    if !nc.facets.is_empty() && !facets_satisfy(node, nc, trace) {
        return false;
    }

    if let Some(values) = &nc.values {
        if !matches_value_set(node, values) {
            trace.fail(format!(
                "Node: {node} not in value set: {}",
                truncated_values_json(values)
            ));
            return false;
        }
    }

    trace.set_result(true);
    true
}

fn facets_satisfy(node: &Node, nc: &NodeConstraint, trace: &mut ParseNode) -> bool {
    let facets = &nc.facets;
    let lexical = node.lexical_form();
    let len = lexical.chars().count() as u32;

    if let Some(length) = facets.length {
        if len != length {
            trace.fail(format!("Node: {node} does not have length {length}"));
            return false;
        }
    }
    if let Some(min) = facets.min_length {
        if len < min {
            trace.fail(format!("Node: {node} is shorter than minlength {min}"));
            return false;
        }
    }
    if let Some(max) = facets.max_length {
        if len > max {
            trace.fail(format!("Node: {node} is longer than maxlength {max}"));
            return false;
        }
    }
    if let Some(pattern) = &facets.pattern {
        if !pattern.regex.is_match(lexical) {
            trace.fail(format!(
                "Node: {node} does not match pattern \"{}\"",
                pattern.pattern
            ));
            return false;
        }
    }

    if has_numeric_facets(facets) {
        let numeric = match parse_numeric(lexical) {
            Some(n) => n,
            None => {
                trace.fail(format!("Node: {node} is not a numeric literal"));
                return false;
            }
        };
        if let Some(min) = &facets.min_inclusive {
            if numeric < parse_numeric(min).unwrap_or(f64::NEG_INFINITY) {
                trace.fail(format!("Node: {node} is less than mininclusive {min}"));
                return false;
            }
        }
        if let Some(max) = &facets.max_inclusive {
            if numeric > parse_numeric(max).unwrap_or(f64::INFINITY) {
                trace.fail(format!("Node: {node} is greater than maxinclusive {max}"));
                return false;
            }
        }
        if let Some(min) = &facets.min_exclusive {
            if numeric <= parse_numeric(min).unwrap_or(f64::NEG_INFINITY) {
                trace.fail(format!("Node: {node} is not greater than minexclusive {min}"));
                return false;
            }
        }
        if let Some(max) = &facets.max_exclusive {
            if numeric >= parse_numeric(max).unwrap_or(f64::INFINITY) {
                trace.fail(format!("Node: {node} is not less than maxexclusive {max}"));
                return false;
            }
        }
    }

    if let Some(total) = facets.total_digits {
        let digits = lexical.chars().filter(|c| c.is_ascii_digit()).count() as u32;
        if digits > total {
            trace.fail(format!("Node: {node} has more than totaldigits {total}"));
            return false;
        }
    }
    if let Some(fraction) = facets.fraction_digits {
        let frac_digits = lexical
            .split('.')
            .nth(1)
            .map(|f| f.chars().filter(|c| c.is_ascii_digit()).count() as u32)
            .unwrap_or(0);
        if frac_digits > fraction {
            trace.fail(format!("Node: {node} has more than fractiondigits {fraction}"));
            return false;
        }
    }

    true
}

fn has_numeric_facets(facets: &crate::ast::XsFacets) -> bool {
    facets.min_inclusive.is_some()
        || facets.max_inclusive.is_some()
        || facets.min_exclusive.is_some()
        || facets.max_exclusive.is_some()
}

fn parse_numeric(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

/// A node matches a value set iff it matches any element.
pub fn matches_value_set(node: &Node, values: &[ValueSetValue]) -> bool {
    values.iter().any(|v| matches_one(node, v))
}

fn matches_one(node: &Node, value: &ValueSetValue) -> bool {
    match value {
        ValueSetValue::ObjectValue(expected) => node == expected,

        ValueSetValue::IriStem(stem) => node.is_iri() && node.lexical_form().starts_with(stem.as_str()),

        ValueSetValue::IriStemRange(bound, exclusions) => {
            stem_range_base_match(node, bound, |n| n.is_iri()) && !is_excluded(node, exclusions)
        }

        ValueSetValue::LiteralStem(stem) => {
            node.is_literal() && node.lexical_form().starts_with(stem.as_str())
        }

        ValueSetValue::LiteralStemRange(bound, exclusions) => {
            stem_range_base_match(node, bound, |n| n.is_literal()) && !is_excluded(node, exclusions)
        }

        ValueSetValue::LanguageStem(stem) => language_tag(node)
            .map(|lang| lang.starts_with(stem.as_str()))
            .unwrap_or(false),

        ValueSetValue::LanguageStemRange(bound, exclusions) => {
            let base = match bound {
                StemRangeBound::Wildcard => true,
                StemRangeBound::Stem(s) => language_tag(node)
                    .map(|lang| lang.starts_with(s.as_str()))
                    .unwrap_or(false),
            };
            base && !is_excluded(node, exclusions)
        }
    }
}

/// A `Wildcard` stem matches any node regardless of kind; a literal-prefix
/// stem requires the node to additionally pass `kind_ok` (be an IRI, for
/// `IriStemRange`, or a literal, for `LiteralStemRange`) before the prefix
/// test applies.
fn stem_range_base_match(node: &Node, bound: &StemRangeBound, kind_ok: impl Fn(&Node) -> bool) -> bool {
    match bound {
        StemRangeBound::Wildcard => true,
        StemRangeBound::Stem(s) => kind_ok(node) && node.lexical_form().starts_with(s.as_str()),
    }
}

fn is_excluded(node: &Node, exclusions: &[ValueSetValue]) -> bool {
    exclusions.iter().any(|ex| matches_one(node, ex))
}

fn language_tag(node: &Node) -> Option<&str> {
    node.as_literal().and_then(|l| l.language())
}

fn value_set_value_json(v: &ValueSetValue) -> Value {
    match v {
        ValueSetValue::ObjectValue(n) => json!(n.to_string()),
        ValueSetValue::IriStem(s) => json!({"stem": s}),
        ValueSetValue::IriStemRange(bound, exclusions) => stem_range_json(bound, exclusions),
        ValueSetValue::LiteralStem(s) => json!({"stem": s}),
        ValueSetValue::LiteralStemRange(bound, exclusions) => stem_range_json(bound, exclusions),
        ValueSetValue::LanguageStem(s) => json!({"langStem": s}),
        ValueSetValue::LanguageStemRange(bound, exclusions) => stem_range_json(bound, exclusions),
    }
}

fn stem_range_json(bound: &StemRangeBound, exclusions: &[ValueSetValue]) -> Value {
    let stem = match bound {
        StemRangeBound::Wildcard => json!({"type": "Wildcard"}),
        StemRangeBound::Stem(s) => json!(s),
    };
    if exclusions.is_empty() {
        json!({"stem": stem})
    } else {
        json!({
            "stem": stem,
            "exclusions": exclusions.iter().map(value_set_value_json).collect::<Vec<_>>(),
        })
    }
}

fn truncated_values_json(values: &[ValueSetValue]) -> String {
    let doc = json!({"values": values.iter().map(value_set_value_json).collect::<Vec<_>>()});
    let rendered = doc.to_string();
    if rendered.chars().count() <= REASON_TRUNCATE_AT {
        rendered
    } else {
        let truncated: String = rendered.chars().take(REASON_TRUNCATE_AT).collect();
        format!("{truncated}...")
    }
}
