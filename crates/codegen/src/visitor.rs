// Tree visitors
//
// A Visitor judges one node at a time; `walk` drives it over a whole tree in
// post-order, so children are visited (and possibly rewritten) before their
// parent sees them.

use crate::node::Node;

pub trait Visitor {
    fn visit(&mut self, node: &mut Node);
}

impl<F: FnMut(&mut Node)> Visitor for F {
    fn visit(&mut self, node: &mut Node) {
        self(node)
    }
}

/// Visit every node below and including `node`, children first.
pub fn walk(node: &mut Node, visitor: &mut dyn Visitor) {
    for child in node.children_mut() {
        walk(child, visitor);
    }
    visitor.visit(node);
}
