use crate::kind::NodeKind;
use crate::tree::NodeRef;

macro_rules! define_visitor {
    ($($variant:ident => $visit:ident,)*) => {
        /// Visitor over the syntax tree. Every kind-specific method defaults to
        /// [`Visitor::visit_node`], which walks the children in order and threads
        /// `data` through them, so implementors only override what they care about.
        pub trait Visitor {
            type Data;

            fn visit_node(&mut self, node: NodeRef<'_>, data: Self::Data) -> Self::Data {
                walk_children(self, node, data)
            }

            $(
                fn $visit(&mut self, node: NodeRef<'_>, data: Self::Data) -> Self::Data {
                    self.visit_node(node, data)
                }
            )*
        }

        /// Calls the visitor method matching `node`'s kind.
        pub fn dispatch<V: Visitor + ?Sized>(visitor: &mut V, node: NodeRef<'_>, data: V::Data) -> V::Data {
            match node.kind() {
                $(NodeKind::$variant => visitor.$visit(node, data),)*
            }
        }
    };
}

node_kinds!(define_visitor);

pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, node: NodeRef<'_>, mut data: V::Data) -> V::Data {
    for child in node.children() {
        data = child.accept(visitor, data);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Position, Span};
    use crate::tree::Ast;

    /// Counts variables and collects operator images.
    struct Collector;

    impl Visitor for Collector {
        type Data = (usize, Vec<String>);

        fn visit_variable(&mut self, node: NodeRef<'_>, mut data: Self::Data) -> Self::Data {
            data.0 += 1;
            self.visit_node(node, data)
        }

        fn visit_addition_expression(&mut self, node: NodeRef<'_>, mut data: Self::Data) -> Self::Data {
            data.1.push(node.image().to_string());
            data
        }
    }

    struct Identity;

    impl Visitor for Identity {
        type Data = u32;

        fn visit_node(&mut self, _node: NodeRef<'_>, data: u32) -> u32 {
            data
        }
    }

    fn tree() -> Ast {
        let span = Span::new(Position::new(1, 1), Position::new(1, 7));
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Variable, "$a", span);
        let op = ast.alloc(NodeKind::AdditionExpression, "+", span);
        let b = ast.alloc(NodeKind::Variable, "$b", span);
        let expr = ast.alloc(NodeKind::Expression, "", span);
        for child in [a, op, b] {
            ast.push_child(expr, child);
        }
        ast.set_root(expr);
        ast
    }

    #[test]
    fn test_visitor_threads_data() {
        let ast = tree();
        let root = ast.root().unwrap();
        let (vars, ops) = root.accept(&mut Collector, (0, Vec::new()));
        assert_eq!(vars, 2);
        assert_eq!(ops, ["+"]);
    }

    #[test]
    fn test_accept_returns_visitor_value_unchanged() {
        let ast = tree();
        assert_eq!(ast.root().unwrap().accept(&mut Identity, 42), 42);
    }
}
