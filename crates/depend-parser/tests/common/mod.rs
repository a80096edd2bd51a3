#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use depend_ast::{BuilderContext, ContextError, NodeKind, NodeRef, TypeDecl};
use depend_parser::{parse_with, CompilationUnit, ParseError, ParserOptions, PhpVersion, SymbolTable};

pub fn parse_ok(source: &str) -> CompilationUnit {
    depend_parser::parse(source).unwrap_or_else(|e| panic!("Unexpected parse error: {e}"))
}

pub fn parse_err(source: &str) -> ParseError {
    match depend_parser::parse(source) {
        Ok(unit) => panic!("Expected a parse error, got:\n{}", unit.root().dump()),
        Err(e) => e,
    }
}

pub fn parse_version(source: &str, version: PhpVersion) -> Result<CompilationUnit, ParseError> {
    let options = ParserOptions::new().with_version(version);
    parse_with(source, &options, Arc::new(SymbolTable::new()))
}

/// Every node of the unit, root included, in pre-order.
pub fn all_nodes(unit: &CompilationUnit) -> Vec<NodeRef<'_>> {
    let root = unit.root();
    std::iter::once(root).chain(root.descendants()).collect()
}

pub fn first(unit: &CompilationUnit, kind: NodeKind) -> NodeRef<'_> {
    unit.root()
        .first_child_of_type(kind)
        .unwrap_or_else(|| panic!("No {kind} node in:\n{}", unit.root().dump()))
}

/// Span ordering, containment and parent links hold for every node.
pub fn assert_tree_invariants(unit: &CompilationUnit) {
    for node in all_nodes(unit) {
        let span = node.span();
        assert!(
            span.start <= span.end,
            "{} {:?} ends before it starts: {}-{}",
            node.kind(),
            node.image(),
            span.start,
            span.end
        );
        for child in node.children() {
            assert!(
                span.contains(child.span()),
                "{} {}-{} does not contain child {} {}-{}",
                node.kind(),
                span.start,
                span.end,
                child.kind(),
                child.span().start,
                child.span().end
            );
            assert_eq!(child.parent().map(|p| p.id()), Some(node.id()));
        }
    }
    assert!(unit.root().parent().is_none());
}

/// Symbol table wrapper counting how often a lookup reaches it.
#[derive(Debug, Default)]
pub struct CountingContext {
    inner: SymbolTable,
    lookups: AtomicUsize,
}

impl CountingContext {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl BuilderContext for CountingContext {
    fn register_type(&self, decl: Arc<TypeDecl>) -> Result<(), ContextError> {
        self.inner.register_type(decl)
    }

    fn find_type(&self, qualified_name: &str) -> Option<Arc<TypeDecl>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_type(qualified_name)
    }
}
