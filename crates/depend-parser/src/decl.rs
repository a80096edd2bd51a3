use std::sync::Arc;

use depend_ast::{flags, Ast, NodeExtra, NodeId, NodeKind, TypeDecl, TypeKind, Value};
use depend_lexer::{Token, TokenKind};

use crate::diagnostics::ParseError;
use crate::expr::parse_expr;
use crate::parser::Parser;
use crate::stmt;
use crate::version::Feature;

// =============================================================================
// Namespaces and imports
// =============================================================================

/// `namespace A\B;` (runs to the next namespace or end of file) or `namespace A\B { }`.
pub fn parse_namespace(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance(); // consume namespace
    let name = if parser.at_name() {
        let (raw, _) = parser.parse_qualified_name()?;
        raw.trim_start_matches('\\').to_string()
    } else {
        String::new()
    };
    parser.set_namespace(name.clone());

    let braced = parser.eat(TokenKind::LeftBrace).is_some();
    let statements = if braced {
        let statements = stmt::parse_statements_until(parser, &[TokenKind::RightBrace])?;
        parser.expect(TokenKind::RightBrace)?;
        statements
    } else {
        parser.terminate()?;
        let mut statements = Vec::new();
        while !parser.check(TokenKind::Eof)
            && !(parser.check(TokenKind::Namespace) && parser.peek_kind(1) != TokenKind::Backslash)
        {
            if let Some(statement) = stmt::parse_statement(parser)? {
                statements.push(statement);
            }
        }
        statements
    };

    let id = parser.finish(NodeKind::NamespaceDeclaration, name, token.start, &statements);
    if braced {
        parser.set_namespace("");
    }
    Ok(id)
}

/// `use A\B, C as D;` and `use A\{B, C as D};`. Only class imports become
/// aliases; `use function` and `use const` are consumed and ignored.
pub fn parse_use_imports(parser: &mut Parser) -> Result<(), ParseError> {
    parser.advance(); // consume use
    let skip = parser.eat(TokenKind::Function).is_some() || parser.eat(TokenKind::Const).is_some();

    loop {
        let (raw, _) = parser.parse_qualified_name()?;
        if parser.check(TokenKind::Backslash) && parser.peek_kind(1) == TokenKind::LeftBrace {
            parser.advance(); // consume \
            parser.advance(); // consume {
            while !parser.check(TokenKind::RightBrace) {
                let entry_skip =
                    parser.eat(TokenKind::Function).is_some() || parser.eat(TokenKind::Const).is_some();
                let (suffix, _) = parser.parse_qualified_name()?;
                let target = format!("{raw}\\{suffix}");
                let alias = parse_import_alias(parser, &target)?;
                if !skip && !entry_skip {
                    parser.add_alias(&alias, &target);
                }
                if parser.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            parser.expect(TokenKind::RightBrace)?;
        } else {
            let alias = parse_import_alias(parser, &raw)?;
            if !skip {
                parser.add_alias(&alias, &raw);
            }
        }
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.terminate()
}

/// Explicit `as Alias`, or the last segment of the imported name.
fn parse_import_alias(parser: &mut Parser, target: &str) -> Result<String, ParseError> {
    if parser.eat(TokenKind::As).is_some() {
        let alias = parser.expect(TokenKind::Identifier)?;
        return Ok(parser.text(&alias).to_string());
    }
    Ok(target.rsplit('\\').next().unwrap_or(target).to_string())
}

// =============================================================================
// Type declarations
// =============================================================================

pub fn parse_class_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let first = *parser.current();
    let mut modifiers = 0;
    loop {
        match parser.current_kind() {
            TokenKind::Abstract => modifiers |= flags::ABSTRACT,
            TokenKind::Final => modifiers |= flags::FINAL,
            _ => break,
        }
        parser.advance();
    }
    parser.expect(TokenKind::Class)?;
    let name = parser.expect(TokenKind::Identifier)?;

    let mut decl = new_type_decl(parser, &name, &first, TypeKind::Class);
    decl.modifiers = modifiers;
    let mut children = Vec::new();
    if parser.eat(TokenKind::Extends).is_some() {
        let parent = parser.parse_class_reference(NodeKind::ClassReference)?;
        decl.parent = Some(parser.ast().get(parent).image().to_string());
        children.push(parent);
    }
    if parser.eat(TokenKind::Implements).is_some() {
        children.extend(parse_interface_list(parser, &mut decl)?);
    }

    let id = parse_type_body(parser, NodeKind::ClassDeclaration, &first, &name, decl, children)?;
    parser.ast_mut().add_flags(id, modifiers);
    Ok(id)
}

pub fn parse_interface_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let first = parser.advance(); // consume interface
    let name = parser.expect(TokenKind::Identifier)?;

    let mut decl = new_type_decl(parser, &name, &first, TypeKind::Interface);
    let mut children = Vec::new();
    if parser.eat(TokenKind::Extends).is_some() {
        children.extend(parse_interface_list(parser, &mut decl)?);
    }
    parse_type_body(parser, NodeKind::InterfaceDeclaration, &first, &name, decl, children)
}

pub fn parse_trait_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.require(Feature::Traits)?;
    let first = parser.advance(); // consume trait
    let name = parser.expect(TokenKind::Identifier)?;
    let decl = new_type_decl(parser, &name, &first, TypeKind::Trait);
    parse_type_body(parser, NodeKind::TraitDeclaration, &first, &name, decl, Vec::new())
}

fn new_type_decl(parser: &Parser, name: &Token, first: &Token, kind: TypeKind) -> TypeDecl {
    let mut decl = TypeDecl::new(parser.text(name), parser.namespace(), kind);
    decl.unit = parser.file_name().map(str::to_string);
    decl.line = first.start.line;
    decl
}

fn parse_interface_list(parser: &mut Parser, decl: &mut TypeDecl) -> Result<Vec<NodeId>, ParseError> {
    let mut references = Vec::new();
    loop {
        let reference = parser.parse_class_reference(NodeKind::ClassOrInterfaceReference)?;
        decl.interfaces.push(parser.ast().get(reference).image().to_string());
        references.push(reference);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    Ok(references)
}

/// Register the declaration, then parse `{ members }` with it as the enclosing type.
fn parse_type_body(
    parser: &mut Parser,
    kind: NodeKind,
    first: &Token,
    name: &Token,
    decl: TypeDecl,
    mut children: Vec<NodeId>,
) -> Result<NodeId, ParseError> {
    let decl = Arc::new(decl);
    parser.context().register_type(Arc::clone(&decl))?;

    let previous = parser.enter_class(Arc::clone(&decl));
    let members = parse_members(parser);
    parser.leave_class(previous);
    children.extend(members?);

    let id = parser.finish(kind, parser.text(name), first.start, &children);
    let comment = parser.doc_comment(first);
    parser.ast_mut().set_comment(id, comment);
    parser.ast_mut().set_extra(id, NodeExtra::Declaration(decl));
    Ok(id)
}

fn parse_members(parser: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    parser.expect(TokenKind::LeftBrace)?;
    let mut members = Vec::new();
    while !parser.check(TokenKind::RightBrace) {
        if parser.check(TokenKind::Eof) {
            return Err(parser.unexpected());
        }
        members.push(parse_member(parser)?);
    }
    parser.expect(TokenKind::RightBrace)?;
    Ok(members)
}

fn parse_member(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let first = *parser.current();
    match first.kind {
        TokenKind::Use => return parse_trait_use(parser),
        TokenKind::Const => return parse_constant_definition(parser),
        _ => {}
    }

    let mut modifiers = 0;
    loop {
        let bit = match parser.current_kind() {
            TokenKind::Public => flags::PUBLIC,
            TokenKind::Protected => flags::PROTECTED,
            TokenKind::Private => flags::PRIVATE,
            TokenKind::Static => flags::STATIC,
            TokenKind::Abstract => flags::ABSTRACT,
            TokenKind::Final => flags::FINAL,
            TokenKind::Var => 0,
            _ => break,
        };
        modifiers |= bit;
        parser.advance();
    }
    if modifiers & flags::VISIBILITY == 0 {
        modifiers |= flags::PUBLIC;
    }

    match parser.current_kind() {
        TokenKind::Function => parse_method(parser, &first, modifiers),
        TokenKind::Variable if first.kind != TokenKind::Variable => parse_field(parser, &first, modifiers),
        _ => Err(parser.unexpected()),
    }
}

fn parse_method(parser: &mut Parser, first: &Token, modifiers: u32) -> Result<NodeId, ParseError> {
    parser.advance(); // consume function
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();
    let name = *parser.current();
    if !name.kind.is_identifier_like() {
        return Err(parser.unexpected());
    }
    parser.advance();

    let mut children = vec![parse_formal_parameters(parser)?];
    if let Some(return_type) = parse_return_type(parser)? {
        children.push(return_type);
    }
    if parser.check(TokenKind::LeftBrace) {
        children.push(parse_scope(parser)?);
    } else {
        parser.terminate()?;
    }

    let id = parser.finish(NodeKind::MethodDeclaration, parser.text(&name), first.start, &children);
    let comment = parser.doc_comment(first);
    parser.ast_mut().set_comment(id, comment);
    let by_ref = if by_ref { flags::BY_REFERENCE } else { 0 };
    parser.ast_mut().add_flags(id, modifiers | by_ref);
    Ok(id)
}

fn parse_field(parser: &mut Parser, first: &Token, modifiers: u32) -> Result<NodeId, ParseError> {
    let mut declarators = vec![parse_variable_declarator(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        declarators.push(parse_variable_declarator(parser)?);
    }
    parser.terminate()?;

    let id = parser.finish(NodeKind::FieldDeclaration, "", first.start, &declarators);
    let comment = parser.doc_comment(first);
    parser.ast_mut().set_comment(id, comment);
    parser.ast_mut().add_flags(id, modifiers);
    Ok(id)
}

// =============================================================================
// Trait use and adaptation
// =============================================================================

/// `use A, B;` or `use A, B { ... }` inside a class or trait body.
fn parse_trait_use(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.require(Feature::Traits)?;
    let token = parser.advance();
    let mut children = Vec::new();
    loop {
        children.push(parser.parse_class_reference(NodeKind::TraitReference)?);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }

    if parser.check(TokenKind::LeftBrace) {
        let open = parser.advance();
        let mut rules = Vec::new();
        while !parser.check(TokenKind::RightBrace) {
            if parser.check(TokenKind::Eof) {
                return Err(parser.unexpected());
            }
            rules.push(parse_trait_rule(parser)?);
        }
        parser.expect(TokenKind::RightBrace)?;
        children.push(parser.finish(NodeKind::TraitAdaptation, "", open.start, &rules));
    } else {
        parser.terminate()?;
    }

    Ok(parser.finish(NodeKind::TraitUseStatement, parser.text(&token), token.start, &children))
}

/// `[Trait::]method as [visibility] [alias];` or `Trait::method insteadof A, B;`.
fn parse_trait_rule(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let start = parser.current().start;

    let qualified = parser.check(TokenKind::Backslash)
        || (parser.check(TokenKind::Identifier)
            && matches!(parser.peek_kind(1), TokenKind::DoubleColon | TokenKind::Backslash));
    let mut trait_reference = None;
    if qualified {
        let (raw, span) = parser.parse_qualified_name()?;
        parser.expect(TokenKind::DoubleColon)?;
        trait_reference = Some(parser.class_reference(NodeKind::TraitReference, &raw, span));
    }

    let method = *parser.current();
    if !method.kind.is_identifier_like() {
        return Err(parser.unexpected());
    }
    parser.advance();
    let method_name = parser.text(&method);

    match parser.current_kind() {
        TokenKind::As => {
            parser.advance();
            let new_modifier = match parser.current_kind() {
                TokenKind::Public => Some(flags::PUBLIC),
                TokenKind::Protected => Some(flags::PROTECTED),
                TokenKind::Private => Some(flags::PRIVATE),
                _ => None,
            };
            if new_modifier.is_some() {
                parser.advance();
            }
            let mut new_name = None;
            if parser.current_kind().is_identifier_like() {
                let alias = parser.advance();
                new_name = Some(parser.text(&alias).to_string());
            }
            parser.terminate()?;

            let children: Vec<NodeId> = trait_reference.into_iter().collect();
            let id = parser.finish(NodeKind::TraitAdaptationAlias, method_name, start, &children);
            parser
                .ast_mut()
                .set_extra(id, NodeExtra::TraitAlias { new_name, new_modifier });
            Ok(id)
        }
        TokenKind::Insteadof => {
            let Some(trait_reference) = trait_reference else {
                return Err(parser.invalid_state(
                    "Expecting full qualified trait method name.",
                    parser.current().start,
                ));
            };
            parser.advance();
            let mut children = vec![trait_reference];
            loop {
                children.push(parser.parse_class_reference(NodeKind::TraitReference)?);
                if parser.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            parser.terminate()?;
            Ok(parser.finish(NodeKind::TraitAdaptationPrecedence, method_name, start, &children))
        }
        _ => Err(parser.unexpected()),
    }
}

// =============================================================================
// Functions
// =============================================================================

pub fn parse_function_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let first = parser.advance(); // consume function
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();
    let name = *parser.current();
    if !name.kind.is_identifier_like() {
        return Err(parser.unexpected());
    }
    parser.advance();

    let mut children = vec![parse_formal_parameters(parser)?];
    if let Some(return_type) = parse_return_type(parser)? {
        children.push(return_type);
    }
    children.push(parse_scope(parser)?);

    let id = parser.finish(NodeKind::FunctionDeclaration, parser.text(&name), first.start, &children);
    let comment = parser.doc_comment(&first);
    parser.ast_mut().set_comment(id, comment);
    if by_ref {
        parser.ast_mut().add_flags(id, flags::BY_REFERENCE);
    }
    Ok(id)
}

/// Function or method body as a `Scope` spanning the braces.
pub fn parse_scope(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let open = parser.expect(TokenKind::LeftBrace)?;
    let statements = stmt::parse_statements_until(parser, &[TokenKind::RightBrace])?;
    parser.expect(TokenKind::RightBrace)?;
    Ok(parser.finish(NodeKind::Scope, "", open.start, &statements))
}

pub fn parse_formal_parameters(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let open = parser.expect(TokenKind::LeftParen)?;
    let mut parameters = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        parameters.push(parse_formal_parameter(parser)?);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    Ok(parser.finish(NodeKind::FormalParameters, "", open.start, &parameters))
}

fn parse_formal_parameter(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let start = parser.current().start;
    let mut children = Vec::new();
    if !matches!(
        parser.current_kind(),
        TokenKind::Variable | TokenKind::Ampersand | TokenKind::Ellipsis
    ) {
        children.push(parse_type_hint(parser)?);
    }

    let mut bits = 0;
    if parser.eat(TokenKind::Ampersand).is_some() {
        bits |= flags::BY_REFERENCE;
    }
    if parser.check(TokenKind::Ellipsis) {
        parser.require(Feature::Variadics)?;
        parser.advance();
        bits |= flags::VARIADIC;
    }
    children.push(parse_variable_declarator(parser)?);

    let id = parser.finish(NodeKind::FormalParameter, "", start, &children);
    parser.ast_mut().add_flags(id, bits);
    Ok(id)
}

/// `: type` after a parameter list.
pub fn parse_return_type(parser: &mut Parser) -> Result<Option<NodeId>, ParseError> {
    if !parser.check(TokenKind::Colon) {
        return Ok(None);
    }
    parser.require(Feature::ReturnTypes)?;
    parser.advance();
    parse_type_hint(parser).map(Some)
}

/// `array`, `callable`, a scalar type on PHP 7, `self`/`parent`, or a class name.
/// Before the version that introduced them, `callable` and scalar names are
/// ordinary class names.
fn parse_type_hint(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    match token.kind {
        TokenKind::Array => {
            parser.advance();
            Ok(parser.leaf(NodeKind::TypeArray, &token))
        }
        TokenKind::Self_ | TokenKind::Parent_ | TokenKind::Static => {
            parser.advance();
            parser.keyword_reference(&token)
        }
        TokenKind::Identifier if parser.peek_kind(1) != TokenKind::Backslash => {
            let lower = parser.text(&token).to_ascii_lowercase();
            let version = parser.version();
            if lower == "callable" && version.supports(Feature::CallableTypeHint) {
                parser.advance();
                Ok(parser.leaf(NodeKind::TypeCallable, &token))
            } else if matches!(lower.as_str(), "int" | "float" | "string" | "bool")
                && version.supports(Feature::ScalarTypeHints)
            {
                parser.advance();
                Ok(parser.leaf(NodeKind::ScalarType, &token))
            } else {
                parser.parse_class_reference(NodeKind::ClassOrInterfaceReference)
            }
        }
        _ if parser.at_name() => parser.parse_class_reference(NodeKind::ClassOrInterfaceReference),
        _ => Err(parser.unexpected()),
    }
}

// =============================================================================
// Constants and declarators
// =============================================================================

/// `const A = 1, B = 2;` at top level or in a type body.
pub fn parse_constant_definition(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance(); // consume const
    let mut declarators = vec![parse_constant_declarator(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        declarators.push(parse_constant_declarator(parser)?);
    }
    parser.terminate()?;

    let id = parser.finish(NodeKind::ConstantDefinition, parser.text(&token), token.start, &declarators);
    let comment = parser.doc_comment(&token);
    parser.ast_mut().set_comment(id, comment);
    if parser.class_scope().is_some() {
        parser.ast_mut().add_flags(id, flags::PUBLIC);
    }
    Ok(id)
}

/// `NAME = expr` with its statically folded value.
pub fn parse_constant_declarator(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let name = *parser.current();
    if !name.kind.is_identifier_like() {
        return Err(parser.unexpected());
    }
    parser.advance();
    parser.expect(TokenKind::Equals)?;
    let init = parse_expr(parser)?;
    let value = static_value(parser.ast(), init);

    let id = parser.finish(NodeKind::ConstantDeclarator, parser.text(&name), name.start, &[init]);
    parser.ast_mut().set_value(id, value);
    Ok(id)
}

/// `$name [= expr]` for properties, parameters and static variables.
pub fn parse_variable_declarator(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let name = parser.expect(TokenKind::Variable)?;
    let mut children = Vec::new();
    let mut value = Value::None;
    if parser.eat(TokenKind::Equals).is_some() {
        let init = parse_expr(parser)?;
        value = static_value(parser.ast(), init);
        children.push(init);
    }

    let id = parser.finish(NodeKind::VariableDeclarator, parser.text(&name), name.start, &children);
    parser.ast_mut().set_value(id, value);
    Ok(id)
}

/// Scalar value of an initialiser made of a literal with optional sign.
pub fn static_value(ast: &Ast, id: NodeId) -> Value {
    let node = ast.get(id);
    match node.kind() {
        NodeKind::Literal => Value::from_literal(node.image()),
        NodeKind::UnaryExpression => {
            let Ok(operand) = node.child(0) else {
                return Value::None;
            };
            let inner = static_value(ast, operand.id());
            match (node.image(), inner) {
                ("-", inner) => inner.negate(),
                ("+", inner @ (Value::Int(_) | Value::Float(_))) => inner,
                _ => Value::None,
            }
        }
        _ => Value::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SymbolTable;
    use crate::options::ParserOptions;
    use crate::version::PhpVersion;
    use depend_ast::BuilderContext;

    fn parse_in(source: &str, version: PhpVersion, table: Arc<SymbolTable>) -> Result<Ast, ParseError> {
        let options = ParserOptions::new().with_version(version).with_file_name("test.php");
        let mut parser = Parser::new(source, options, table)?;
        parser.parse_compilation_unit()?;
        Ok(parser.into_ast())
    }

    fn parse(source: &str) -> Ast {
        parse_in(source, PhpVersion::Php70, Arc::new(SymbolTable::new())).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        parse_in(source, PhpVersion::Php70, Arc::new(SymbolTable::new())).unwrap_err()
    }

    #[test]
    fn test_class_registration() {
        let table = Arc::new(SymbolTable::new());
        let source = "<?php namespace App;\n/** Doc */\nabstract class Foo extends Base implements \\Countable { }";
        let ast = parse_in(source, PhpVersion::Php70, Arc::clone(&table)).unwrap();

        let decl = table.get_class("app\\foo").unwrap();
        assert_eq!(decl.parent.as_deref(), Some("App\\Base"));
        assert_eq!(decl.interfaces, vec!["Countable".to_string()]);
        assert_eq!(decl.unit.as_deref(), Some("test.php"));
        assert_eq!(decl.line, 3);

        let class = ast.root().unwrap().first_child_of_type(NodeKind::ClassDeclaration).unwrap();
        assert_eq!(class.image(), "Foo");
        assert_eq!(class.comment(), Some("/** Doc */"));
        assert!(class.has_flag(flags::ABSTRACT));
        assert_eq!(class.declaration().unwrap().qualified_name(), "App\\Foo");
    }

    #[test]
    fn test_use_alias_resolution() {
        let ast = parse("<?php namespace A; use Lib\\Base as B, Lib\\Other; class C extends B implements Other\\I {}");
        let class = ast.root().unwrap().first_child_of_type(NodeKind::ClassDeclaration).unwrap();
        assert_eq!(class.child(0).unwrap().image(), "Lib\\Base");
        assert_eq!(class.child(1).unwrap().image(), "Lib\\Other\\I");
    }

    #[test]
    fn test_group_use() {
        let ast = parse("<?php use Lib\\{A, B as Bee}; new Bee;");
        let reference = ast.root().unwrap().first_child_of_type(NodeKind::ClassReference).unwrap();
        assert_eq!(reference.image(), "Lib\\B");
    }

    #[test]
    fn test_braced_namespaces() {
        let ast = parse("<?php namespace A { class X {} } namespace { class Y {} }");
        let root = ast.root().unwrap();
        let namespaces = root.find_children_of_type(NodeKind::NamespaceDeclaration);
        assert_eq!(namespaces.len(), 2);
        assert_eq!(namespaces[0].image(), "A");
        assert_eq!(namespaces[1].image(), "");
        let y = namespaces[1].child(0).unwrap();
        assert_eq!(y.declaration().unwrap().qualified_name(), "Y");
    }

    #[test]
    fn test_members() {
        let source = "<?php class A {\n\
            const X = 1, Y = 'y';\n\
            var $a;\n\
            protected static $b = -2.5;\n\
            /** m */\n\
            abstract public function &m(array $x, callable $c = null, int ...$rest): bool;\n\
        }";
        let ast = parse(source);
        let class = ast.root().unwrap().child(0).unwrap();
        assert_eq!(class.child_count(), 4);

        let constants = class.child(0).unwrap();
        assert_eq!(constants.kind(), NodeKind::ConstantDefinition);
        assert_eq!(constants.child(1).unwrap().value(), Some(&Value::String("y".into())));

        let field = class.child(1).unwrap();
        assert!(field.has_flag(flags::PUBLIC));

        let stat = class.child(2).unwrap();
        assert!(stat.has_flag(flags::PROTECTED | flags::STATIC));
        assert_eq!(stat.child(0).unwrap().value(), Some(&Value::Float(-2.5)));

        let method = class.child(3).unwrap();
        assert_eq!(method.image(), "m");
        assert_eq!(method.comment(), Some("/** m */"));
        assert!(method.has_flag(flags::ABSTRACT | flags::PUBLIC | flags::BY_REFERENCE));
        assert_eq!(method.child_count(), 2);
        let params = method.child(0).unwrap();
        assert_eq!(params.child(0).unwrap().child(0).unwrap().kind(), NodeKind::TypeArray);
        assert_eq!(params.child(1).unwrap().child(0).unwrap().kind(), NodeKind::TypeCallable);
        assert_eq!(params.child(1).unwrap().child(1).unwrap().value(), Some(&Value::Null));
        let rest = params.child(2).unwrap();
        assert!(rest.has_flag(flags::VARIADIC));
        assert_eq!(rest.child(0).unwrap().kind(), NodeKind::ScalarType);
        assert_eq!(method.child(1).unwrap().kind(), NodeKind::ScalarType);
    }

    #[test]
    fn test_scalar_hints_are_classes_before_php7() {
        let table = Arc::new(SymbolTable::new());
        let ast = parse_in("<?php function f(int $a) {}", PhpVersion::Php56, table).unwrap();
        let param = ast.root().unwrap().first_child_of_type(NodeKind::FormalParameter).unwrap();
        assert_eq!(param.child(0).unwrap().kind(), NodeKind::ClassOrInterfaceReference);
    }

    #[test]
    fn test_self_binds_to_enclosing_class() {
        let ast = parse("<?php class A { function m(self $o) { return static::X; } }");
        let root = ast.root().unwrap();
        let self_ref = root.first_child_of_type(NodeKind::SelfReference).unwrap();
        assert!(self_ref.reference().unwrap().is_resolved());
        assert_eq!(self_ref.get_type().unwrap().name, "A");
        let static_ref = root.first_child_of_type(NodeKind::StaticReference).unwrap();
        assert_eq!(static_ref.get_type().unwrap().name, "A");
    }

    #[test]
    fn test_parent_without_declared_parent() {
        let err = parse_err("<?php class A { function m() { parent::m(); } }");
        assert_eq!(
            err.to_string(),
            "The keyword \"parent\" was used but the class \"A\" does not declare a parent."
        );
    }

    #[test]
    fn test_trait_adaptation() {
        let source = "<?php class A { use T1, T2 { T1::m insteadof T2; m as protected n; T2::m as x; } }";
        let ast = parse(source);
        let adaptation = ast.root().unwrap().first_child_of_type(NodeKind::TraitAdaptation).unwrap();
        assert_eq!(adaptation.child_count(), 3);

        let precedence = adaptation.child(0).unwrap();
        assert_eq!(precedence.kind(), NodeKind::TraitAdaptationPrecedence);
        assert_eq!(precedence.child_count(), 2);

        let alias = adaptation.child(1).unwrap();
        assert_eq!(alias.image(), "m");
        assert_eq!(alias.child_count(), 0);
        match alias.extra() {
            NodeExtra::TraitAlias { new_name, new_modifier } => {
                assert_eq!(new_name.as_deref(), Some("n"));
                assert_eq!(*new_modifier, Some(flags::PROTECTED));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(adaptation.child(2).unwrap().child(0).unwrap().kind(), NodeKind::TraitReference);
    }

    #[test]
    fn test_insteadof_requires_qualified_method() {
        let err = parse_err("<?php class A { use T1, T2 { m insteadof T2; } }");
        assert_eq!(err.to_string(), "Expecting full qualified trait method name.");
    }

    #[test]
    fn test_traits_need_php54() {
        let table = Arc::new(SymbolTable::new());
        assert!(parse_in("<?php trait T {}", PhpVersion::Php53, table).is_err());
    }

    #[test]
    fn test_static_value_folding() {
        let ast = parse("<?php const A = +1, B = -0x10, C = TRUE, D = 1 + 2;");
        let root = ast.root().unwrap();
        let values: Vec<_> = root
            .find_children_of_type(NodeKind::ConstantDeclarator)
            .iter()
            .map(|d| d.value().cloned())
            .collect();
        assert_eq!(
            values,
            vec![
                Some(Value::Int(1)),
                Some(Value::Int(-16)),
                Some(Value::Bool(true)),
                Some(Value::None),
            ]
        );
    }
}
