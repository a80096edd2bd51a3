use std::sync::Arc;

use depend_ast::{Ast, NodeKind, NodeRef, TypeDecl, TypeKind};

/// A parsed source file: the syntax tree plus the name it was parsed under.
#[derive(Debug)]
pub struct CompilationUnit {
    ast: Ast,
    file_name: Option<String>,
}

impl CompilationUnit {
    pub(crate) fn new(ast: Ast, file_name: Option<String>) -> Self {
        Self { ast, file_name }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// The `CompilationUnit` node. Always present for a successful parse.
    pub fn root(&self) -> NodeRef<'_> {
        match self.ast.root() {
            Some(root) => root,
            None => unreachable!("compilation unit without root"),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Top-level statements, looking through namespace declarations.
    fn top_level(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.root().children().flat_map(|child| {
            let nested: Vec<_> = if child.kind() == NodeKind::NamespaceDeclaration {
                child.children().collect()
            } else {
                vec![child]
            };
            nested
        })
    }

    fn of_kind(&self, kind: NodeKind) -> Vec<NodeRef<'_>> {
        self.top_level().filter(|node| node.kind() == kind).collect()
    }

    /// Declared classes, interfaces and traits in source order.
    pub fn declarations(&self) -> Vec<Arc<TypeDecl>> {
        self.top_level()
            .filter_map(|node| node.declaration().cloned())
            .collect()
    }

    fn declarations_of(&self, kind: TypeKind) -> Vec<Arc<TypeDecl>> {
        self.declarations()
            .into_iter()
            .filter(|decl| decl.kind == kind)
            .collect()
    }

    pub fn classes(&self) -> Vec<Arc<TypeDecl>> {
        self.declarations_of(TypeKind::Class)
    }

    pub fn interfaces(&self) -> Vec<Arc<TypeDecl>> {
        self.declarations_of(TypeKind::Interface)
    }

    pub fn traits(&self) -> Vec<Arc<TypeDecl>> {
        self.declarations_of(TypeKind::Trait)
    }

    pub fn functions(&self) -> Vec<NodeRef<'_>> {
        self.of_kind(NodeKind::FunctionDeclaration)
    }

    /// Top-level `const` definitions.
    pub fn constants(&self) -> Vec<NodeRef<'_>> {
        self.of_kind(NodeKind::ConstantDefinition)
    }
}
