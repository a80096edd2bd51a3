use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::TypeDecl;
use crate::kind::NodeKind;
use crate::reference::TypeReference;
use crate::span::Span;
use crate::value::Value;

/// Index of a node inside its [`Ast`](crate::Ast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Packed bits stored in [`Metadata::flags`].
pub mod flags {
    pub const PUBLIC: u32 = 0x01;
    pub const PROTECTED: u32 = 0x02;
    pub const PRIVATE: u32 = 0x04;
    pub const STATIC: u32 = 0x08;
    pub const ABSTRACT: u32 = 0x10;
    pub const FINAL: u32 = 0x20;

    pub const VISIBILITY: u32 = PUBLIC | PROTECTED | PRIVATE;
    pub const MODIFIERS: u32 = 0xff;

    pub const BY_REFERENCE: u32 = 0x100;
    pub const VARIADIC: u32 = 0x200;
    pub const HAS_ELSE: u32 = 0x400;
    /// `include_once` / `require_once`
    pub const ONCE: u32 = 0x800;
    pub const NOWDOC: u32 = 0x1000;
    pub const DEFAULT_LABEL: u32 = 0x2000;
    pub const ALTERNATIVE_SYNTAX: u32 = 0x4000;
    pub const SHORT_ARRAY: u32 = 0x8000;
}

/// Image, span and flag bag shared by every node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub image: String,
    pub span: Span,
    pub flags: u32,
}

/// Kind-specific payload.
#[derive(Debug, Default)]
pub enum NodeExtra {
    #[default]
    None,
    Value(Value),
    Reference(TypeReference),
    TraitAlias {
        new_name: Option<String>,
        /// Visibility bit from [`flags`], `None` when the alias keeps the original.
        new_modifier: Option<u32>,
    },
    Declaration(Arc<TypeDecl>),
}

#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) metadata: Metadata,
    pub(crate) comment: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) extra: NodeExtra,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, image: String, span: Span) -> Self {
        Self {
            kind,
            metadata: Metadata {
                image,
                span,
                flags: 0,
            },
            comment: None,
            parent: None,
            children: Vec::new(),
            extra: NodeExtra::None,
        }
    }
}
