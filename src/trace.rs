//! The parse trace: a tree recording what the evaluator tried, attached to
//! each recursive call so that a failing validation can explain itself.

use crate::node::Node;

/// One node of the evaluation trace.
///
/// `operation` names the evaluator that produced this node (`"satisfies"`,
/// `"nodeSatisfies"`, `"matches"`, ...); `expression` is a short, debug-only
/// description of the AST node under evaluation, not the full subtree.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub operation: &'static str,
    pub expression: String,
    pub focus_node: Node,
    pub result: Option<bool>,
    pub fail_reason: Option<String>,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(operation: &'static str, expression: impl Into<String>, focus_node: Node) -> Self {
        ParseNode {
            operation,
            expression: expression.into(),
            focus_node,
            result: None,
            fail_reason: None,
            children: Vec::new(),
        }
    }

    pub fn set_result(&mut self, result: bool) {
        self.result = Some(result);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.result = Some(false);
        self.fail_reason = Some(reason.into());
    }

    pub fn add_child(&mut self, child: ParseNode) {
        self.children.push(child);
    }

    /// Linearizes the trace into human-readable reason strings, innermost
    /// failures first so the most specific diagnostic leads the list.
    pub fn process_reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        self.collect_reasons(&mut reasons);
        reasons
    }

    fn collect_reasons(&self, out: &mut Vec<String>) {
        for child in &self.children {
            child.collect_reasons(out);
        }
        if let Some(reason) = &self.fail_reason {
            out.push(reason.clone());
        }
    }
}
