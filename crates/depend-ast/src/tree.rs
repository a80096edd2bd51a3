use std::fmt::{self, Write as _};
use std::sync::Arc;

use thiserror::Error;

use crate::context::{ContextError, TypeDecl};
use crate::kind::NodeKind;
use crate::node::{Metadata, Node, NodeExtra, NodeId};
use crate::reference::TypeReference;
use crate::span::{Position, Span};
use crate::value::Value;
use crate::visitor::{self, Visitor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("child index {index} is out of range for a node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind} nodes do not carry a type reference")]
    NotAReference { kind: NodeKind },

    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Arena owning every node of one syntax tree.
///
/// Nodes are appended children-first; a parent adopts its children with
/// [`Ast::push_child`] and never reorders them afterwards.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn alloc(&mut self, kind: NodeKind, image: impl Into<String>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, image.into(), span));
        id
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].metadata.span = span;
    }

    /// Moves the end of a node's span, used when a closing keyword is absorbed late.
    pub fn extend_to(&mut self, id: NodeId, end: Position) {
        let span = &mut self.nodes[id.index()].metadata.span;
        if end > span.end {
            span.end = end;
        }
    }

    pub fn set_image(&mut self, id: NodeId, image: impl Into<String>) {
        self.nodes[id.index()].metadata.image = image.into();
    }

    pub fn set_comment(&mut self, id: NodeId, comment: Option<String>) {
        self.nodes[id.index()].comment = comment;
    }

    pub fn add_flags(&mut self, id: NodeId, flags: u32) {
        self.nodes[id.index()].metadata.flags |= flags;
    }

    pub fn set_extra(&mut self, id: NodeId, extra: NodeExtra) {
        self.nodes[id.index()].extra = extra;
    }

    pub fn set_value(&mut self, id: NodeId, value: Value) {
        self.set_extra(id, NodeExtra::Value(value));
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.get(id))
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { ast: self, id }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].metadata.span
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

/// Borrowed, copyable handle to one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        self.ast.node(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    pub fn is_a(&self, kind: NodeKind) -> bool {
        self.kind().is_a(kind)
    }

    pub fn image(&self) -> &'a str {
        &self.node().metadata.image
    }

    pub fn metadata(&self) -> &'a Metadata {
        &self.node().metadata
    }

    pub fn span(&self) -> Span {
        self.node().metadata.span
    }

    pub fn start_line(&self) -> u32 {
        self.span().start.line
    }

    pub fn start_column(&self) -> u32 {
        self.span().start.column
    }

    pub fn end_line(&self) -> u32 {
        self.span().end.line
    }

    pub fn end_column(&self) -> u32 {
        self.span().end.column
    }

    pub fn flags(&self) -> u32 {
        self.node().metadata.flags
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags() & flag == flag
    }

    pub fn comment(&self) -> Option<&'a str> {
        self.node().comment.as_deref()
    }

    pub fn extra(&self) -> &'a NodeExtra {
        &self.node().extra
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.ast.get(id))
    }

    // =========================================================================
    // Children
    // =========================================================================

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn child(&self, index: usize) -> Result<NodeRef<'a>, AstError> {
        let children = &self.node().children;
        children
            .get(index)
            .map(|&id| self.ast.get(id))
            .ok_or(AstError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let ast = self.ast;
        self.node().children.iter().map(move |&id| ast.get(id))
    }

    /// Every node below this one, in pre-order.
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack: Vec<NodeId> = self.node().children.clone();
        stack.reverse();
        Descendants {
            ast: self.ast,
            stack,
        }
    }

    /// First descendant (pre-order, excluding self) whose kind is `kind` or a subtype of it.
    pub fn first_child_of_type(&self, kind: NodeKind) -> Option<NodeRef<'a>> {
        self.descendants().find(|node| node.is_a(kind))
    }

    /// All descendants (pre-order, any depth) whose kind is `kind` or a subtype of it.
    pub fn find_children_of_type(&self, kind: NodeKind) -> Vec<NodeRef<'a>> {
        self.descendants().filter(|node| node.is_a(kind)).collect()
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, data: V::Data) -> V::Data {
        visitor::dispatch(visitor, *self, data)
    }

    // =========================================================================
    // Payload
    // =========================================================================

    pub fn value(&self) -> Option<&'a Value> {
        match &self.node().extra {
            NodeExtra::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<&'a TypeReference> {
        match &self.node().extra {
            NodeExtra::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn declaration(&self) -> Option<&'a Arc<TypeDecl>> {
        match &self.node().extra {
            NodeExtra::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Resolves the referenced type, consulting the builder context at most once.
    pub fn get_type(&self) -> Result<Arc<TypeDecl>, AstError> {
        let reference = self
            .reference()
            .ok_or(AstError::NotAReference { kind: self.kind() })?;
        Ok(reference.get_type()?)
    }

    /// Indented outline of the subtree: `Kind "image" start-end` per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let span = self.span();
        let _ = writeln!(
            out,
            "{:indent$}{} {:?} {}-{}",
            "",
            self.kind(),
            self.image(),
            span.start,
            span.end,
            indent = depth * 2
        );
        for child in self.children() {
            child.dump_into(out, depth + 1);
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("image", &self.image())
            .field("span", &self.span())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ast, other.ast) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.ast.node(id);
        self.stack.extend(node.children.iter().rev().copied());
        Some(self.ast.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, column: u32) -> Position {
        Position::new(line, column)
    }

    fn span(a: (u32, u32), b: (u32, u32)) -> Span {
        Span::new(pos(a.0, a.1), pos(b.0, b.1))
    }

    /// `$a + $b;` as Statement[Expression[Variable, AdditionExpression, Variable]]
    fn sample() -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Variable, "$a", span((1, 1), (1, 2)));
        let op = ast.alloc(NodeKind::AdditionExpression, "+", span((1, 4), (1, 4)));
        let b = ast.alloc(NodeKind::Variable, "$b", span((1, 6), (1, 7)));
        let expr = ast.alloc(NodeKind::Expression, "", span((1, 1), (1, 7)));
        for child in [a, op, b] {
            ast.push_child(expr, child);
        }
        let stmt = ast.alloc(NodeKind::Statement, "", span((1, 1), (1, 8)));
        ast.push_child(stmt, expr);
        ast.set_root(stmt);
        (ast, stmt)
    }

    #[test]
    fn test_child_access() {
        let (ast, stmt) = sample();
        let stmt = ast.get(stmt);
        let expr = stmt.child(0).unwrap();
        assert_eq!(expr.kind(), NodeKind::Expression);
        assert_eq!(expr.child_count(), 3);
        assert_eq!(expr.child(1).unwrap().image(), "+");
        assert_eq!(expr.parent(), Some(stmt));
        assert!(stmt.parent().is_none());
    }

    #[test]
    fn test_child_out_of_range() {
        let (ast, stmt) = sample();
        assert_eq!(
            ast.get(stmt).child(1).unwrap_err(),
            AstError::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn test_queries_are_preorder_and_exclude_self() {
        let (ast, stmt) = sample();
        let stmt = ast.get(stmt);
        let vars: Vec<_> = stmt
            .find_children_of_type(NodeKind::Variable)
            .iter()
            .map(|n| n.image())
            .collect();
        assert_eq!(vars, ["$a", "$b"]);
        assert_eq!(stmt.first_child_of_type(NodeKind::Variable).unwrap().image(), "$a");
        assert!(stmt.first_child_of_type(NodeKind::Statement).is_none());
        assert_eq!(stmt.descendants().count(), 4);
    }

    #[test]
    fn test_get_type_on_plain_node() {
        let (ast, stmt) = sample();
        assert_eq!(
            ast.get(stmt).get_type().unwrap_err(),
            AstError::NotAReference { kind: NodeKind::Statement }
        );
    }

    #[test]
    fn test_extend_to_only_grows() {
        let (mut ast, stmt) = sample();
        ast.extend_to(stmt, pos(1, 3));
        assert_eq!(ast.span(stmt).end, pos(1, 8));
        ast.extend_to(stmt, pos(2, 6));
        assert_eq!(ast.span(stmt).end, pos(2, 6));
    }

    #[test]
    fn test_dump() {
        let (ast, stmt) = sample();
        assert_eq!(
            ast.get(stmt).dump(),
            "Statement \"\" 1:1-1:8\n  Expression \"\" 1:1-1:7\n    Variable \"$a\" 1:1-1:2\n    AdditionExpression \"+\" 1:4-1:4\n    Variable \"$b\" 1:6-1:7\n"
        );
    }
}
