//! Pretty-printer for syntax trees
//!
//! Renders trees back to normalized S-expression text: one space between
//! siblings, parentheses around every group. The output reparses to an equal
//! tree (ignoring spans), and is the canonical text of world-state facts.

use crate::ast::SyntaxNode;

/// A pretty-printer accumulating into a string
#[derive(Default)]
pub struct Pretty {
    output: String,
}

impl Pretty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub fn node(&mut self, node: &SyntaxNode) {
        if node.is_start() {
            self.siblings(&node.children);
            return;
        }
        if node.grouped {
            self.write("(");
            self.write(&node.value);
            if !node.children.is_empty() {
                self.write(" ");
                self.siblings(&node.children);
            }
            self.write(")");
        } else {
            self.write(&node.value);
        }
    }

    fn siblings(&mut self, nodes: &[SyntaxNode]) {
        for (i, child) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(" ");
            }
            self.node(child);
        }
    }
}

/// Render a tree (or subtree) as S-expression text
pub fn pretty_print(node: &SyntaxNode) -> String {
    let mut pretty = Pretty::new();
    pretty.node(node);
    pretty.finish()
}

/// Flat pre-order list of node values, skipping the start node
pub fn node_values(node: &SyntaxNode) -> Vec<&str> {
    node.walk()
        .filter(|n| !n.is_start())
        .map(|n| n.value.as_str())
        .collect()
}
