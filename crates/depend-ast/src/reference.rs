use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::context::{BuilderContext, ContextError, TypeDecl};

/// Which context lookup a reference performs when it is first resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    Class,
    ClassOrInterface,
    Trait,
    Any,
}

/// A named type reference that resolves against a [`BuilderContext`] on first use.
///
/// The resolved declaration is cached; the context is consulted at most once
/// per reference, no matter how many threads ask.
pub struct TypeReference {
    qualified_name: String,
    lookup: LookupKind,
    context: Arc<dyn BuilderContext>,
    cache: OnceCell<Arc<TypeDecl>>,
}

impl TypeReference {
    /// A reference that will look `qualified_name` up lazily.
    pub fn deferred(
        context: Arc<dyn BuilderContext>,
        qualified_name: impl Into<String>,
        lookup: LookupKind,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            lookup,
            context,
            cache: OnceCell::new(),
        }
    }

    /// A reference already bound to `decl`, as used for `self` and `static`.
    pub fn bound(context: Arc<dyn BuilderContext>, decl: Arc<TypeDecl>) -> Self {
        let cache = OnceCell::new();
        let qualified_name = decl.qualified_name();
        // a fresh cell accepts exactly one value
        let _ = cache.set(decl);
        Self {
            qualified_name,
            lookup: LookupKind::Any,
            context,
            cache,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn lookup(&self) -> LookupKind {
        self.lookup
    }

    pub fn context(&self) -> &Arc<dyn BuilderContext> {
        &self.context
    }

    pub fn is_resolved(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn get_type(&self) -> Result<Arc<TypeDecl>, ContextError> {
        self.cache
            .get_or_try_init(|| {
                log::trace!("resolving {:?} reference `{}`", self.lookup, self.qualified_name);
                let name = self.qualified_name.as_str();
                match self.lookup {
                    LookupKind::Class => self.context.get_class(name),
                    LookupKind::ClassOrInterface => self.context.get_class_or_interface(name),
                    LookupKind::Trait => self.context.get_trait(name),
                    LookupKind::Any => self.context.get_type(name),
                }
            })
            .map(Arc::clone)
    }

    /// Same name and lookup, bound to another context with an empty cache.
    pub fn rebind(&self, context: Arc<dyn BuilderContext>) -> Self {
        Self::deferred(context, self.qualified_name.clone(), self.lookup)
    }
}

impl fmt::Debug for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeReference")
            .field("qualified_name", &self.qualified_name)
            .field("lookup", &self.lookup)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
