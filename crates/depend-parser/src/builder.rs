use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use depend_ast::{BuilderContext, ContextError, TypeDecl};

/// Shared, thread-safe registry of declared types.
///
/// Keys are lower-cased qualified names. When two units declare the same
/// name, the first registration wins and later ones are ignored.
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: DashMap<String, Arc<TypeDecl>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Snapshot of every registered declaration, in no particular order.
    pub fn types(&self) -> Vec<Arc<TypeDecl>> {
        self.types.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}

impl BuilderContext for SymbolTable {
    fn register_type(&self, decl: Arc<TypeDecl>) -> Result<(), ContextError> {
        let key = decl.qualified_name().to_ascii_lowercase();
        match self.types.entry(key) {
            Entry::Occupied(existing) => {
                log::debug!(
                    "{} `{}` already declared in {:?}, keeping the first declaration",
                    decl.kind,
                    decl.qualified_name(),
                    existing.get().unit
                );
            }
            Entry::Vacant(slot) => {
                log::debug!("registered {} `{}`", decl.kind, decl.qualified_name());
                slot.insert(decl);
            }
        }
        Ok(())
    }

    fn find_type(&self, qualified_name: &str) -> Option<Arc<TypeDecl>> {
        let key = qualified_name.trim_start_matches('\\').to_ascii_lowercase();
        self.types.get(&key).map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depend_ast::TypeKind;

    #[test]
    fn test_case_insensitive_lookup() {
        let table = SymbolTable::new();
        table
            .register_type(Arc::new(TypeDecl::new("Foo", "App", TypeKind::Class)))
            .unwrap();
        assert_eq!(table.find_type("app\\FOO").unwrap().name, "Foo");
        assert_eq!(table.find_type("\\App\\Foo").unwrap().name, "Foo");
        assert!(table.find_type("Foo").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_first_registration_wins() {
        let table = SymbolTable::new();
        let mut first = TypeDecl::new("Foo", "", TypeKind::Class);
        first.unit = Some("a.php".into());
        let mut second = TypeDecl::new("foo", "", TypeKind::Interface);
        second.unit = Some("b.php".into());
        table.register_type(Arc::new(first)).unwrap();
        table.register_type(Arc::new(second)).unwrap();
        let found = table.get_type("FOO").unwrap();
        assert_eq!(found.unit.as_deref(), Some("a.php"));
        assert_eq!(found.kind, TypeKind::Class);
    }

    #[test]
    fn test_kind_lookups_through_trait_defaults() {
        let table = SymbolTable::new();
        table
            .register_type(Arc::new(TypeDecl::new("T", "", TypeKind::Trait)))
            .unwrap();
        assert!(table.get_trait("t").is_ok());
        assert!(matches!(
            table.get_class("t"),
            Err(ContextError::KindMismatch { .. })
        ));
    }
}
