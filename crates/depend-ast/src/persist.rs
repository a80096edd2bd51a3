use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::BuilderContext;
use crate::kind::{NodeKind, PersistedField};
use crate::node::{Metadata, NodeExtra, NodeId};
use crate::reference::{LookupKind, TypeReference};
use crate::tree::Ast;
use crate::value::Value;

/// `newModifier` value stored when an alias keeps the original visibility.
pub const UNSET_MODIFIER: i32 = -1;

/// One persisted field. The variant order inside [`PersistedNode::fields`]
/// always follows [`NodeKind::persisted_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum Field {
    Value(Value),
    QualifiedName(String),
    Reference(String),
    Context,
    NewName(Option<String>),
    NewModifier(i32),
    Comment(Option<String>),
    Metadata(Metadata),
    Nodes(Vec<PersistedNode>),
}

impl Field {
    pub fn key(&self) -> PersistedField {
        match self {
            Field::Value(_) => PersistedField::Value,
            Field::QualifiedName(_) => PersistedField::QualifiedName,
            Field::Reference(_) => PersistedField::Reference,
            Field::Context => PersistedField::Context,
            Field::NewName(_) => PersistedField::NewName,
            Field::NewModifier(_) => PersistedField::NewModifier,
            Field::Comment(_) => PersistedField::Comment,
            Field::Metadata(_) => PersistedField::Metadata,
            Field::Nodes(_) => PersistedField::Nodes,
        }
    }
}

/// Serializable snapshot of a subtree that keeps only the allow-listed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedNode {
    pub kind: NodeKind,
    pub fields: Vec<Field>,
}

impl PersistedNode {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key().name()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("{kind} is missing persisted field `{field}`")]
    MissingField {
        kind: NodeKind,
        field: PersistedField,
    },

    #[error("{kind} does not persist field `{field}`")]
    UnexpectedField {
        kind: NodeKind,
        field: PersistedField,
    },
}

impl Ast {
    /// Snapshot the subtree rooted at `id`.
    pub fn sleep(&self, id: NodeId) -> PersistedNode {
        let node = self.get(id);
        let kind = node.kind();
        let fields = kind
            .persisted_fields()
            .iter()
            .map(|field| match field {
                PersistedField::Value => Field::Value(node.value().cloned().unwrap_or_default()),
                PersistedField::QualifiedName | PersistedField::Reference => {
                    let name = node
                        .reference()
                        .map(|r| r.qualified_name().to_string())
                        .unwrap_or_default();
                    if *field == PersistedField::Reference {
                        Field::Reference(name)
                    } else {
                        Field::QualifiedName(name)
                    }
                }
                PersistedField::Context => Field::Context,
                PersistedField::NewName => match node.extra() {
                    NodeExtra::TraitAlias { new_name, .. } => Field::NewName(new_name.clone()),
                    _ => Field::NewName(None),
                },
                PersistedField::NewModifier => match node.extra() {
                    NodeExtra::TraitAlias {
                        new_modifier: Some(bits),
                        ..
                    } => Field::NewModifier(*bits as i32),
                    _ => Field::NewModifier(UNSET_MODIFIER),
                },
                PersistedField::Comment => Field::Comment(node.comment().map(str::to_string)),
                PersistedField::Metadata => Field::Metadata(node.metadata().clone()),
                PersistedField::Nodes => {
                    Field::Nodes(node.children().map(|child| self.sleep(child.id())).collect())
                }
            })
            .collect();
        PersistedNode { kind, fields }
    }

    /// Rebuild a tree from a snapshot. References are re-bound to `context`
    /// with an empty cache.
    pub fn wake(
        persisted: &PersistedNode,
        context: Arc<dyn BuilderContext>,
    ) -> Result<Ast, PersistError> {
        let mut ast = Ast::new();
        let root = ast.wake_node(persisted, &context)?;
        ast.set_root(root);
        Ok(ast)
    }

    fn wake_node(
        &mut self,
        persisted: &PersistedNode,
        context: &Arc<dyn BuilderContext>,
    ) -> Result<NodeId, PersistError> {
        let kind = persisted.kind;
        let expected = kind.persisted_fields();
        for (index, field) in persisted.fields.iter().enumerate() {
            if expected.get(index) != Some(&field.key()) {
                return Err(PersistError::UnexpectedField {
                    kind,
                    field: field.key(),
                });
            }
        }
        if let Some(missing) = expected.get(persisted.fields.len()) {
            return Err(PersistError::MissingField {
                kind,
                field: *missing,
            });
        }

        let mut metadata = Metadata::default();
        let mut comment = None;
        let mut extra = NodeExtra::None;
        let mut bound_name = None;
        let mut alias_name = None;
        let mut alias_modifier = None;
        let mut children = Vec::new();

        for field in &persisted.fields {
            match field {
                Field::Value(value) => extra = NodeExtra::Value(value.clone()),
                Field::QualifiedName(name) | Field::Reference(name) => bound_name = Some(name.clone()),
                Field::Context => {}
                Field::NewName(name) => alias_name = name.clone(),
                Field::NewModifier(bits) => {
                    alias_modifier = (*bits != UNSET_MODIFIER).then_some(*bits as u32)
                }
                Field::Comment(text) => comment = text.clone(),
                Field::Metadata(meta) => metadata = meta.clone(),
                Field::Nodes(nodes) => {
                    for node in nodes {
                        children.push(self.wake_node(node, context)?);
                    }
                }
            }
        }

        if kind.is_reference() {
            let (name, lookup) = match kind {
                NodeKind::ClassReference => (metadata.image.clone(), LookupKind::Class),
                NodeKind::TraitReference => (metadata.image.clone(), LookupKind::Trait),
                NodeKind::ParentReference => (bound_name.unwrap_or_default(), LookupKind::Class),
                NodeKind::SelfReference | NodeKind::StaticReference => {
                    (bound_name.unwrap_or_default(), LookupKind::Any)
                }
                _ => (metadata.image.clone(), LookupKind::ClassOrInterface),
            };
            extra = NodeExtra::Reference(TypeReference::deferred(context.clone(), name, lookup));
        } else if kind == NodeKind::TraitAdaptationAlias {
            extra = NodeExtra::TraitAlias {
                new_name: alias_name,
                new_modifier: alias_modifier,
            };
        }

        let id = self.alloc(kind, metadata.image, metadata.span);
        self.add_flags(id, metadata.flags);
        self.set_comment(id, comment);
        self.set_extra(id, extra);
        for child in children {
            self.push_child(id, child);
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::MapContext;
    use crate::context::{TypeDecl, TypeKind};
    use crate::node::flags;
    use crate::span::{Position, Span};

    fn span() -> Span {
        Span::new(Position::new(2, 3), Position::new(2, 9))
    }

    #[test]
    fn test_constant_declarator_round_trip() {
        let mut ast = Ast::new();
        let literal = ast.alloc(NodeKind::Literal, "42", span());
        let declarator = ast.alloc(NodeKind::ConstantDeclarator, "ANSWER", span());
        ast.push_child(declarator, literal);
        ast.set_value(declarator, Value::Int(42));
        ast.set_comment(declarator, Some("/** doc */".into()));

        let persisted = ast.sleep(declarator);
        assert_eq!(persisted.field_names(), ["value", "comment", "metadata", "nodes"]);

        let json = serde_json::to_string(&persisted).unwrap();
        let restored: PersistedNode = serde_json::from_str(&json).unwrap();
        let woken = Ast::wake(&restored, Arc::new(MapContext::default())).unwrap();
        let root = woken.root().unwrap();
        assert_eq!(root.image(), "ANSWER");
        assert_eq!(root.value(), Some(&Value::Int(42)));
        assert_eq!(root.comment(), Some("/** doc */"));
        assert_eq!(root.child(0).unwrap().image(), "42");
        assert_eq!(root.span(), span());
    }

    #[test]
    fn test_self_reference_rebinds_with_empty_cache() {
        let ctx = Arc::new(MapContext::with(&[TypeDecl::new("Foo", "", TypeKind::Class)]));
        let decl = ctx.find_type("Foo").unwrap();
        let before = ctx.lookup_count();

        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::SelfReference, "self", span());
        ast.set_extra(id, NodeExtra::Reference(TypeReference::bound(ctx.clone(), decl)));
        let persisted = ast.sleep(id);
        assert_eq!(persisted.fields[0], Field::QualifiedName("Foo".into()));

        let woken = Ast::wake(&persisted, ctx.clone()).unwrap();
        let root = woken.root().unwrap();
        assert!(!root.reference().unwrap().is_resolved());
        assert_eq!(root.get_type().unwrap().name, "Foo");
        assert_eq!(ctx.lookup_count(), before + 1);
    }

    #[test]
    fn test_trait_alias_unset_modifier() {
        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::TraitAdaptationAlias, "foo", span());
        ast.set_extra(
            id,
            NodeExtra::TraitAlias {
                new_name: Some("bar".into()),
                new_modifier: None,
            },
        );
        let persisted = ast.sleep(id);
        assert_eq!(persisted.fields[0], Field::NewName(Some("bar".into())));
        assert_eq!(persisted.fields[1], Field::NewModifier(UNSET_MODIFIER));

        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::TraitAdaptationAlias, "foo", span());
        ast.set_extra(
            id,
            NodeExtra::TraitAlias {
                new_name: None,
                new_modifier: Some(flags::PROTECTED),
            },
        );
        let persisted = ast.sleep(id);
        let woken = Ast::wake(&persisted, Arc::new(MapContext::default())).unwrap();
        assert!(matches!(
            woken.root().unwrap().extra(),
            NodeExtra::TraitAlias {
                new_name: None,
                new_modifier: Some(flags::PROTECTED)
            }
        ));
    }

    #[test]
    fn test_wake_rejects_fields_outside_allow_list() {
        let persisted = PersistedNode {
            kind: NodeKind::Statement,
            fields: vec![Field::Value(Value::Null)],
        };
        assert_eq!(
            Ast::wake(&persisted, Arc::new(MapContext::default())).unwrap_err(),
            PersistError::UnexpectedField {
                kind: NodeKind::Statement,
                field: PersistedField::Value,
            }
        );

        let persisted = PersistedNode {
            kind: NodeKind::Statement,
            fields: vec![Field::Comment(None)],
        };
        assert_eq!(
            Ast::wake(&persisted, Arc::new(MapContext::default())).unwrap_err(),
            PersistError::MissingField {
                kind: NodeKind::Statement,
                field: PersistedField::Metadata,
            }
        );
    }
}
