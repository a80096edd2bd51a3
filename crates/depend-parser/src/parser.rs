use std::collections::HashMap;
use std::sync::Arc;

use depend_ast::{
    Ast, BuilderContext, LookupKind, NodeExtra, NodeId, NodeKind, Position, Span, TextRange, TypeDecl,
    TypeKind, TypeReference,
};
use depend_lexer::{LexError, Token, TokenKind, TokenStream};

use crate::diagnostics::ParseError;
use crate::options::ParserOptions;
use crate::stmt;
use crate::version::{Feature, PhpVersion};

/// Placeholder target of `parent` inside a trait. The real parent is only
/// known in the class that uses the trait.
pub const TRAIT_RUNTIME_PARENT: &str = "__trait_runtime_parent";

pub struct Parser<'src> {
    tokens: TokenStream<'src>,
    ast: Ast,
    context: Arc<dyn BuilderContext>,
    options: ParserOptions,
    /// Current namespace, without leading or trailing backslash.
    namespace: String,
    /// Lower-cased `use` alias to imported qualified name.
    aliases: HashMap<String, String>,
    /// Declaration of the class, interface or trait whose body is being parsed.
    class_scope: Option<Arc<TypeDecl>>,
    /// End position of the most recently consumed token.
    last_end: Position,
}

impl<'src> Parser<'src> {
    pub fn new(
        source: &'src str,
        options: ParserOptions,
        context: Arc<dyn BuilderContext>,
    ) -> Result<Self, ParseError> {
        let tokens = TokenStream::new(source)
            .map_err(|e| ParseError::from_lex(e, source, options.display_name()))?;
        Ok(Self {
            tokens,
            ast: Ast::new(),
            context,
            options,
            namespace: String::new(),
            aliases: HashMap::new(),
            class_scope: None,
            last_end: Position::default(),
        })
    }

    pub fn version(&self) -> PhpVersion {
        self.options.version
    }

    pub fn file_name(&self) -> Option<&str> {
        self.options.file_name.as_deref()
    }

    pub fn context(&self) -> &Arc<dyn BuilderContext> {
        &self.context
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    // =========================================================================
    // Token navigation
    // =========================================================================

    pub fn current(&self) -> &Token {
        self.tokens.current()
    }

    pub fn current_kind(&self) -> TokenKind {
        self.tokens.current().kind
    }

    /// Kind of the token `n` positions after the current one.
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens.peek(n).kind
    }

    pub fn peek(&self, n: usize) -> &Token {
        self.tokens.peek(n)
    }

    pub fn current_text(&self) -> &'src str {
        self.tokens.text(self.tokens.current())
    }

    pub fn text(&self, token: &Token) -> &'src str {
        self.tokens.text(token)
    }

    pub fn slice(&self, range: TextRange) -> &'src str {
        self.tokens.slice(range)
    }

    pub fn position(&self, offset: u32) -> Position {
        self.tokens.position(offset)
    }

    pub fn end_position(&self, range: TextRange) -> Position {
        self.tokens.line_index().end_position(range)
    }

    /// Advance to the next token, returning the consumed token.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens.advance();
        if token.kind != TokenKind::Eof {
            self.last_end = token.end;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// If the current token matches `kind`, consume and return it.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    pub fn last_end(&self) -> Position {
        self.last_end
    }

    /// A statement ends with `;` or with a `?>` close tag; either is consumed
    /// and becomes part of the statement's span.
    pub fn terminate(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Semicolon | TokenKind::CloseTag => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    fn display_name(&self) -> String {
        self.options.display_name().to_string()
    }

    /// Error for the current token: end of stream or an unexpected token.
    pub fn unexpected(&self) -> ParseError {
        let token = *self.current();
        self.unexpected_token(&token)
    }

    pub fn unexpected_token(&self, token: &Token) -> ParseError {
        if token.kind == TokenKind::Eof {
            ParseError::TokenStreamEnd {
                file: self.display_name(),
                position: token.start,
            }
        } else {
            ParseError::UnexpectedToken {
                image: self.text(token).to_string(),
                position: token.start,
                file: self.display_name(),
            }
        }
    }

    /// End of input reached inside a construct, e.g. an unclosed `{$` in a string.
    pub fn stream_end(&self, position: Position) -> ParseError {
        ParseError::TokenStreamEnd {
            file: self.display_name(),
            position,
        }
    }

    pub fn invalid_state(&self, message: impl Into<String>, position: Position) -> ParseError {
        ParseError::InvalidState {
            message: message.into(),
            position,
            file: self.display_name(),
        }
    }

    pub fn lex_error(&self, error: LexError) -> ParseError {
        ParseError::from_lex(error, self.tokens.source(), self.options.display_name())
    }

    /// Reject the current token when `feature` is newer than the configured version.
    pub fn require(&self, feature: Feature) -> Result<(), ParseError> {
        if self.version().supports(feature) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    pub fn span_of(token: &Token) -> Span {
        Span::new(token.start, token.end)
    }

    /// Leaf node whose image is the token text.
    pub fn leaf(&mut self, kind: NodeKind, token: &Token) -> NodeId {
        let image = self.text(token);
        self.ast.alloc(kind, image, Self::span_of(token))
    }

    pub fn node(&mut self, kind: NodeKind, image: impl Into<String>, span: Span, children: &[NodeId]) -> NodeId {
        let id = self.ast.alloc(kind, image, span);
        for &child in children {
            self.ast.push_child(id, child);
        }
        id
    }

    /// Node spanning from `start` to the end of the last consumed token.
    pub fn finish(&mut self, kind: NodeKind, image: impl Into<String>, start: Position, children: &[NodeId]) -> NodeId {
        let span = Span::new(start, self.last_end);
        self.node(kind, image, span, children)
    }

    pub fn start_of(&self, id: NodeId) -> Position {
        self.ast.span(id).start
    }

    pub fn kind_of(&self, id: NodeId) -> NodeKind {
        self.ast.kind(id)
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub fn doc_comment(&self, token: &Token) -> Option<String> {
        token.doc_comment.map(|range| self.slice(range).to_string())
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// True when the current token starts a (possibly qualified) name.
    pub fn at_name(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier => true,
            TokenKind::Backslash => self.peek_kind(1) == TokenKind::Identifier,
            TokenKind::Namespace => self.peek_kind(1) == TokenKind::Backslash,
            _ => false,
        }
    }

    /// Consume a name as written: `Foo`, `Foo\Bar`, `\Foo\Bar` or `namespace\Foo`.
    pub fn parse_qualified_name(&mut self) -> Result<(String, Span), ParseError> {
        let start = self.current().start;
        let mut name = String::new();

        if self.check(TokenKind::Namespace) {
            let token = self.advance();
            name.push_str(self.text(&token));
            name.push('\\');
            self.expect(TokenKind::Backslash)?;
        } else if self.eat(TokenKind::Backslash).is_some() {
            name.push('\\');
        }

        let first = self.expect(TokenKind::Identifier)?;
        name.push_str(self.text(&first));
        while self.check(TokenKind::Backslash) && self.peek(1).kind.is_identifier_like() {
            self.advance();
            let part = self.advance();
            name.push('\\');
            name.push_str(self.text(&part));
        }

        Ok((name, Span::new(start, self.last_end)))
    }

    /// Resolve a class-like name against the current namespace and imports.
    pub fn qualify(&self, raw: &str) -> String {
        let resolved = if let Some(rest) = raw.strip_prefix('\\') {
            rest.to_string()
        } else if raw.get(..10).is_some_and(|p| p.eq_ignore_ascii_case("namespace\\")) {
            self.in_namespace(&raw[10..])
        } else {
            let (first, rest) = match raw.find('\\') {
                Some(i) => (&raw[..i], &raw[i..]),
                None => (raw, ""),
            };
            match self.aliases.get(&first.to_ascii_lowercase()) {
                Some(target) => format!("{target}{rest}"),
                None => self.in_namespace(raw),
            }
        };
        log::trace!("resolved `{raw}` to `{resolved}`");
        resolved
    }

    fn in_namespace(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Enter a namespace; imports never carry over between namespaces.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
        self.aliases.clear();
    }

    pub fn add_alias(&mut self, alias: &str, target: &str) {
        log::trace!("import `{target}` as `{alias}`");
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.trim_start_matches('\\').to_string());
    }

    // =========================================================================
    // References
    // =========================================================================

    /// A deferred reference to a named type; the image is the qualified name.
    pub fn class_reference(&mut self, kind: NodeKind, raw: &str, span: Span) -> NodeId {
        let name = self.qualify(raw);
        let lookup = match kind {
            NodeKind::ClassReference => LookupKind::Class,
            NodeKind::TraitReference => LookupKind::Trait,
            _ => LookupKind::ClassOrInterface,
        };
        let reference = TypeReference::deferred(Arc::clone(&self.context), name.clone(), lookup);
        let id = self.ast.alloc(kind, name, span);
        self.ast.set_extra(id, NodeExtra::Reference(reference));
        id
    }

    /// Parse a name at the cursor into a reference of `kind`.
    pub fn parse_class_reference(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let (raw, span) = self.parse_qualified_name()?;
        Ok(self.class_reference(kind, &raw, span))
    }

    /// `self`, `static` or `parent`. `self` and `static` bind eagerly to the
    /// enclosing type; `parent` defers to the declared parent class. Inside a
    /// trait, `parent` refers to [`TRAIT_RUNTIME_PARENT`].
    pub fn keyword_reference(&mut self, token: &Token) -> Result<NodeId, ParseError> {
        let keyword = match token.kind {
            TokenKind::Self_ => "self",
            TokenKind::Static => "static",
            _ => "parent",
        };
        let Some(decl) = self.class_scope.clone() else {
            return Err(self.invalid_state(
                format!("The keyword \"{keyword}\" was used outside of a class/method scope."),
                token.start,
            ));
        };

        let (kind, reference) = match token.kind {
            TokenKind::Self_ => (
                NodeKind::SelfReference,
                TypeReference::bound(Arc::clone(&self.context), decl),
            ),
            TokenKind::Static => (
                NodeKind::StaticReference,
                TypeReference::bound(Arc::clone(&self.context), decl),
            ),
            _ if decl.kind == TypeKind::Trait => (
                NodeKind::ParentReference,
                TypeReference::deferred(
                    Arc::clone(&self.context),
                    TRAIT_RUNTIME_PARENT.to_string(),
                    LookupKind::Class,
                ),
            ),
            _ => {
                let Some(parent) = decl.parent.clone() else {
                    return Err(self.invalid_state(
                        format!(
                            "The keyword \"parent\" was used but the class \"{}\" does not declare a parent.",
                            decl.name
                        ),
                        token.start,
                    ));
                };
                (
                    NodeKind::ParentReference,
                    TypeReference::deferred(Arc::clone(&self.context), parent, LookupKind::Class),
                )
            }
        };
        let id = self.leaf(kind, token);
        self.ast.set_extra(id, NodeExtra::Reference(reference));
        Ok(id)
    }

    pub fn class_scope(&self) -> Option<&Arc<TypeDecl>> {
        self.class_scope.as_ref()
    }

    /// Make `decl` the enclosing type, returning the previous one for [`Parser::leave_class`].
    pub fn enter_class(&mut self, decl: Arc<TypeDecl>) -> Option<Arc<TypeDecl>> {
        self.class_scope.replace(decl)
    }

    pub fn leave_class(&mut self, previous: Option<Arc<TypeDecl>>) {
        self.class_scope = previous;
    }

    // =========================================================================
    // Embedded code
    // =========================================================================

    /// Parse PHP code embedded in a string token (`{$...}` and `${...}`). The
    /// slice must be consumed completely by `parse`.
    pub fn parse_embedded(
        &mut self,
        range: TextRange,
        parse: impl FnOnce(&mut Self) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        let inner = self.tokens.embedded(range).map_err(|e| self.lex_error(e))?;
        let outer = std::mem::replace(&mut self.tokens, inner);
        let saved_end = self.last_end;
        let result = parse(self).and_then(|id| {
            if self.check(TokenKind::Eof) {
                Ok(id)
            } else {
                Err(self.unexpected())
            }
        });
        self.tokens = outer;
        self.last_end = saved_end;
        result
    }

    // =========================================================================
    // Top-level parsing
    // =========================================================================

    pub fn parse_compilation_unit(&mut self) -> Result<NodeId, ParseError> {
        let mut children = Vec::new();
        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Namespace) && self.peek_kind(1) != TokenKind::Backslash {
                children.push(crate::decl::parse_namespace(self)?);
                continue;
            }
            if let Some(stmt) = stmt::parse_statement(self)? {
                children.push(stmt);
            }
        }

        let source_len = self.tokens.source().len() as u32;
        let span = Span::new(
            Position::default(),
            self.end_position(TextRange::new(0, source_len)),
        );
        let image = self.options.file_name.clone().unwrap_or_default();
        let root = self.node(NodeKind::CompilationUnit, image, span, &children);
        self.ast.set_root(root);
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SymbolTable;

    fn parser(source: &str) -> Parser<'_> {
        Parser::new(source, ParserOptions::default(), Arc::new(SymbolTable::new())).unwrap()
    }

    #[test]
    fn test_qualify_names() {
        let mut p = parser("<?php");
        assert_eq!(p.qualify("Foo"), "Foo");
        p.set_namespace("App\\Model");
        assert_eq!(p.qualify("Foo"), "App\\Model\\Foo");
        assert_eq!(p.qualify("\\Foo"), "Foo");
        assert_eq!(p.qualify("namespace\\Sub\\Foo"), "App\\Model\\Sub\\Foo");
        p.add_alias("Base", "\\Lib\\Base");
        assert_eq!(p.qualify("base"), "Lib\\Base");
        assert_eq!(p.qualify("Base\\Child"), "Lib\\Base\\Child");
        p.set_namespace("Other");
        assert_eq!(p.qualify("Base"), "Other\\Base");
    }

    #[test]
    fn test_parse_qualified_name() {
        let mut p = parser("<?php \\Foo\\Bar namespace\\Baz Qux");
        p.advance();
        assert_eq!(p.parse_qualified_name().unwrap().0, "\\Foo\\Bar");
        assert_eq!(p.parse_qualified_name().unwrap().0, "namespace\\Baz");
        let (name, span) = p.parse_qualified_name().unwrap();
        assert_eq!(name, "Qux");
        assert_eq!(span, Span::new(Position::new(1, 30), Position::new(1, 32)));
    }

    #[test]
    fn test_expect_at_eof_is_stream_end() {
        let mut p = parser("<?php");
        p.advance();
        let err = p.expect(TokenKind::Semicolon).unwrap_err();
        assert!(matches!(err, ParseError::TokenStreamEnd { .. }));
    }

    #[test]
    fn test_keyword_reference_outside_class() {
        let mut p = parser("<?php static");
        p.advance();
        let token = p.advance();
        let err = p.keyword_reference(&token).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The keyword \"static\" was used outside of a class/method scope."
        );
    }

    #[test]
    fn test_terminate_accepts_close_tag() {
        let mut p = parser("<?php ?>");
        p.advance();
        p.terminate().unwrap();
        assert_eq!(p.last_end(), Position::new(1, 8));
        assert!(p.check(TokenKind::Eof));
    }
}
