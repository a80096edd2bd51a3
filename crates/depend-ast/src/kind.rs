use serde::{Deserialize, Serialize};

/// A field that survives [`Ast::sleep`](crate::Ast::sleep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistedField {
    Value,
    QualifiedName,
    Reference,
    Context,
    NewName,
    NewModifier,
    Comment,
    Metadata,
    Nodes,
}

impl PersistedField {
    pub fn name(self) -> &'static str {
        match self {
            PersistedField::Value => "value",
            PersistedField::QualifiedName => "qualifiedName",
            PersistedField::Reference => "reference",
            PersistedField::Context => "context",
            PersistedField::NewName => "newName",
            PersistedField::NewModifier => "newModifier",
            PersistedField::Comment => "comment",
            PersistedField::Metadata => "metadata",
            PersistedField::Nodes => "nodes",
        }
    }
}

impl std::fmt::Display for PersistedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! define_node_kind {
    ($($variant:ident => $visit:ident,)*) => {
        /// Every syntax node kind the parser produces.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];

            /// Stable, externally visible kind name, e.g. `"ShiftLeftExpression"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

node_kinds!(define_node_kind);

use PersistedField as F;

const DEFAULT_FIELDS: &[PersistedField] = &[F::Comment, F::Metadata, F::Nodes];
const VALUE_FIELDS: &[PersistedField] = &[F::Value, F::Comment, F::Metadata, F::Nodes];
const CONTEXT_FIELDS: &[PersistedField] = &[F::Context, F::Comment, F::Metadata, F::Nodes];
const BOUND_FIELDS: &[PersistedField] =
    &[F::QualifiedName, F::Context, F::Comment, F::Metadata, F::Nodes];
const PARENT_FIELDS: &[PersistedField] =
    &[F::Reference, F::Context, F::Comment, F::Metadata, F::Nodes];
const ALIAS_FIELDS: &[PersistedField] =
    &[F::NewName, F::NewModifier, F::Comment, F::Metadata, F::Nodes];

impl NodeKind {
    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// The kind this one specializes, if any.
    pub fn supertype(self) -> Option<NodeKind> {
        match self {
            NodeKind::ClassReference
            | NodeKind::ParentReference
            | NodeKind::SelfReference
            | NodeKind::TraitReference => Some(NodeKind::ClassOrInterfaceReference),
            NodeKind::StaticReference => Some(NodeKind::SelfReference),
            _ => None,
        }
    }

    /// `true` when `self` is `other` or one of its subtypes.
    pub fn is_a(self, other: NodeKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.supertype();
        }
        false
    }

    pub fn is_reference(self) -> bool {
        self.is_a(NodeKind::ClassOrInterfaceReference)
    }

    /// Ordered allow-list of fields kept when a node of this kind is persisted.
    pub fn persisted_fields(self) -> &'static [PersistedField] {
        match self {
            NodeKind::ConstantDeclarator | NodeKind::VariableDeclarator => VALUE_FIELDS,
            NodeKind::ClassOrInterfaceReference
            | NodeKind::ClassReference
            | NodeKind::TraitReference => CONTEXT_FIELDS,
            NodeKind::SelfReference | NodeKind::StaticReference => BOUND_FIELDS,
            NodeKind::ParentReference => PARENT_FIELDS,
            NodeKind::TraitAdaptationAlias => ALIAS_FIELDS,
            _ => DEFAULT_FIELDS,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::from_name(s).ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownNodeKind(pub String);
