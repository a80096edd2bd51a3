use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Trait => write!(f, "trait"),
        }
    }
}

/// A declared class, interface or trait as seen by the builder context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub namespace: String,
    pub kind: TypeKind,
    /// Modifier bits from [`flags`](crate::flags).
    pub modifiers: u32,
    /// Qualified name of the declared parent class.
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    /// Compilation unit (file) the type was declared in.
    pub unit: Option<String>,
    pub line: u32,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            modifiers: 0,
            parent: None,
            interfaces: Vec::new(),
            unit: None,
            line: 0,
        }
    }

    /// Namespace-qualified name without a leading backslash.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}\\{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("`{name}` is a {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: TypeKind,
    },

    #[error("{0}")]
    Other(String),
}

/// Registry the parser declares types into and references resolve against.
///
/// Names are namespace-qualified, without a leading backslash, and compared
/// case-insensitively.
pub trait BuilderContext: Send + Sync {
    fn register_type(&self, decl: Arc<TypeDecl>) -> Result<(), ContextError>;

    fn find_type(&self, qualified_name: &str) -> Option<Arc<TypeDecl>>;

    fn get_type(&self, qualified_name: &str) -> Result<Arc<TypeDecl>, ContextError> {
        self.find_type(qualified_name)
            .ok_or_else(|| ContextError::UnknownType {
                name: qualified_name.to_string(),
            })
    }

    fn get_class(&self, qualified_name: &str) -> Result<Arc<TypeDecl>, ContextError> {
        expect_kind(self.get_type(qualified_name)?, "class", |k| k == TypeKind::Class)
    }

    fn get_class_or_interface(&self, qualified_name: &str) -> Result<Arc<TypeDecl>, ContextError> {
        expect_kind(self.get_type(qualified_name)?, "class or interface", |k| {
            matches!(k, TypeKind::Class | TypeKind::Interface)
        })
    }

    fn get_trait(&self, qualified_name: &str) -> Result<Arc<TypeDecl>, ContextError> {
        expect_kind(self.get_type(qualified_name)?, "trait", |k| k == TypeKind::Trait)
    }
}

fn expect_kind(
    decl: Arc<TypeDecl>,
    expected: &'static str,
    accepts: impl Fn(TypeKind) -> bool,
) -> Result<Arc<TypeDecl>, ContextError> {
    if accepts(decl.kind) {
        Ok(decl)
    } else {
        Err(ContextError::KindMismatch {
            name: decl.qualified_name(),
            expected,
            found: decl.kind,
        })
    }
}
