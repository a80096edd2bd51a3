use depend_ast::{flags, NodeId, NodeKind, Position};
use depend_lexer::{Token, TokenKind};

use crate::decl;
use crate::diagnostics::ParseError;
use crate::interpolation;
use crate::parser::Parser;
use crate::precedence::{
    self, ASSIGNMENT_BP, BANG_BP, CLONE_BP, INSTANCEOF_BP, TERNARY_BP, UNARY_BP,
};
use crate::version::Feature;

/// Cast keywords accepted inside `( )`.
const CAST_KEYWORDS: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "binary", "array",
    "object", "unset",
];

/// Parse an expression.
pub fn parse_expr(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parse_expr_bp(parser, 0)
}

/// Pratt expression parser. Parses expressions with binding power >= min_bp.
pub fn parse_expr_bp(parser: &mut Parser, min_bp: u8) -> Result<NodeId, ParseError> {
    let mut lhs = parse_unary(parser)?;

    loop {
        let kind = parser.current_kind();
        let start = parser.start_of(lhs);

        // Assignment binds to any assignable operand, whatever the surrounding power
        if kind.is_assignment_op() && is_assignable(parser.kind_of(lhs)) {
            let op_token = parser.advance();
            let mut image = parser.text(&op_token).to_string();
            if op_token.kind == TokenKind::Equals && parser.eat(TokenKind::Ampersand).is_some() {
                image.push('&');
            }
            let value = parse_expr_bp(parser, ASSIGNMENT_BP)?;
            lhs = parser.finish(NodeKind::AssignmentExpression, image, start, &[lhs, value]);
            continue;
        }

        // Ternary, left-associative before PHP 8
        if kind == TokenKind::Question {
            if TERNARY_BP < min_bp {
                break;
            }
            parser.advance(); // consume ?
            let mut children = vec![lhs];
            if !parser.check(TokenKind::Colon) {
                children.push(parse_expr(parser)?);
            }
            parser.expect(TokenKind::Colon)?;
            children.push(parse_expr_bp(parser, TERNARY_BP + 1)?);
            lhs = parser.finish(NodeKind::ConditionalExpression, "?", start, &children);
            continue;
        }

        if kind == TokenKind::Instanceof {
            if INSTANCEOF_BP.0 < min_bp {
                break;
            }
            parser.advance(); // consume instanceof
            let class = parse_class_name_or_expr(parser, NodeKind::ClassOrInterfaceReference, INSTANCEOF_BP.1)?;
            lhs = parser.finish(NodeKind::InstanceOfExpression, "instanceof", start, &[lhs, class]);
            continue;
        }

        if let Some((l_bp, r_bp)) = precedence::infix_binding_power(kind) {
            if l_bp < min_bp {
                break;
            }
            match kind {
                TokenKind::StarStar => parser.require(Feature::PowOperator)?,
                TokenKind::QuestionQuestion => parser.require(Feature::NullCoalescing)?,
                TokenKind::Spaceship => parser.require(Feature::SpaceshipOperator)?,
                _ => {}
            }
            let op_token = parser.advance();
            let Some(op_kind) = precedence::operator_kind(kind) else {
                return Err(parser.unexpected_token(&op_token));
            };
            let op = parser.leaf(op_kind, &op_token);
            let rhs = parse_expr_bp(parser, r_bp)?;
            lhs = parser.finish(NodeKind::Expression, "", start, &[lhs, op, rhs]);
            continue;
        }

        break;
    }

    Ok(lhs)
}

/// Targets an assignment operator may bind to.
fn is_assignable(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Variable
            | NodeKind::VariableVariable
            | NodeKind::CompoundVariable
            | NodeKind::ArrayIndexExpression
            | NodeKind::StringIndexExpression
            | NodeKind::MemberPrimaryPrefix
            | NodeKind::ListExpression
    )
}

// =============================================================================
// Prefix operators
// =============================================================================

fn parse_unary(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    let start = token.start;

    match token.kind {
        TokenKind::Bang => {
            parser.advance();
            let operand = parse_expr_bp(parser, BANG_BP)?;
            Ok(parser.finish(NodeKind::UnaryExpression, "!", start, &[operand]))
        }
        TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde | TokenKind::At | TokenKind::Ampersand => {
            parser.advance();
            let operand = parse_expr_bp(parser, UNARY_BP)?;
            let image = parser.text(&token);
            Ok(parser.finish(NodeKind::UnaryExpression, image, start, &[operand]))
        }
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            parser.advance();
            let operand = parse_expr_bp(parser, UNARY_BP)?;
            let kind = if token.kind == TokenKind::PlusPlus {
                NodeKind::PreIncrementExpression
            } else {
                NodeKind::PreDecrementExpression
            };
            let image = parser.text(&token);
            Ok(parser.finish(kind, image, start, &[operand]))
        }
        TokenKind::LeftParen => match cast_image(parser) {
            Some(image) => {
                parser.advance(); // consume (
                parser.advance(); // consume type
                parser.advance(); // consume )
                let operand = parse_expr_bp(parser, UNARY_BP)?;
                Ok(parser.finish(NodeKind::CastExpression, image, start, &[operand]))
            }
            None => parse_postfix_expr(parser),
        },
        TokenKind::Clone => {
            parser.advance();
            let operand = parse_expr_bp(parser, CLONE_BP)?;
            Ok(parser.finish(NodeKind::CloneExpression, "clone", start, &[operand]))
        }
        TokenKind::Print => {
            parser.advance();
            let operand = parse_expr_bp(parser, ASSIGNMENT_BP)?;
            let image = parser.text(&token);
            Ok(parser.finish(NodeKind::PrintExpression, image, start, &[operand]))
        }
        TokenKind::Yield_ => parse_yield(parser),
        TokenKind::Include | TokenKind::IncludeOnce | TokenKind::Require | TokenKind::RequireOnce => {
            parser.advance();
            let operand = parse_expr_bp(parser, ASSIGNMENT_BP)?;
            let kind = match token.kind {
                TokenKind::Include | TokenKind::IncludeOnce => NodeKind::IncludeExpression,
                _ => NodeKind::RequireExpression,
            };
            let image = parser.text(&token);
            let id = parser.finish(kind, image, start, &[operand]);
            if matches!(token.kind, TokenKind::IncludeOnce | TokenKind::RequireOnce) {
                parser.ast_mut().add_flags(id, flags::ONCE);
            }
            Ok(id)
        }
        _ => parse_postfix_expr(parser),
    }
}

/// `(int)`, `( string )`, ...: lower-cased with inner whitespace removed.
fn cast_image(parser: &Parser) -> Option<String> {
    let name = *parser.peek(1);
    if !matches!(name.kind, TokenKind::Identifier | TokenKind::Array | TokenKind::Unset)
        || parser.peek_kind(2) != TokenKind::RightParen
    {
        return None;
    }
    let lower = parser.text(&name).to_ascii_lowercase();
    CAST_KEYWORDS
        .contains(&lower.as_str())
        .then(|| format!("({lower})"))
}

fn parse_yield(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.require(Feature::Generators)?;
    let token = parser.advance();
    let mut children = Vec::new();
    let ends_yield = matches!(
        parser.current_kind(),
        TokenKind::Semicolon
            | TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::Comma
            | TokenKind::CloseTag
            | TokenKind::Eof
    );
    if !ends_yield {
        let first = parse_expr_bp(parser, ASSIGNMENT_BP)?;
        children.push(first);
        if parser.eat(TokenKind::FatArrow).is_some() {
            children.push(parse_expr_bp(parser, ASSIGNMENT_BP)?);
        }
    }
    let image = parser.text(&token);
    Ok(parser.finish(NodeKind::YieldExpression, image, token.start, &children))
}

// =============================================================================
// Postfix chains
// =============================================================================

/// A primary expression followed by member access, calls, indexing and `++`/`--`.
fn parse_postfix_expr(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let base = parse_primary(parser)?;
    parse_postfix_chain(parser, base)
}

fn parse_postfix_chain(parser: &mut Parser, mut base: NodeId) -> Result<NodeId, ParseError> {
    loop {
        let start = parser.start_of(base);
        match parser.current_kind() {
            TokenKind::LeftBracket => {
                parser.advance(); // consume [
                let mut children = vec![base];
                if !parser.check(TokenKind::RightBracket) {
                    children.push(parse_expr(parser)?);
                }
                parser.expect(TokenKind::RightBracket)?;
                base = parser.finish(NodeKind::ArrayIndexExpression, "[", start, &children);
            }
            TokenKind::LeftBrace if is_variable_like(parser.kind_of(base)) => {
                parser.advance(); // consume {
                let index = parse_expr(parser)?;
                parser.expect(TokenKind::RightBrace)?;
                base = parser.finish(NodeKind::StringIndexExpression, "{", start, &[base, index]);
            }
            TokenKind::Arrow => {
                parser.advance(); // consume ->
                let postfix = parse_object_member(parser)?;
                base = parser.finish(NodeKind::MemberPrimaryPrefix, "->", start, &[base, postfix]);
            }
            TokenKind::DoubleColon => {
                parser.advance(); // consume ::
                let postfix = parse_static_member(parser)?;
                base = parser.finish(NodeKind::MemberPrimaryPrefix, "::", start, &[base, postfix]);
            }
            TokenKind::LeftParen if is_callable(parser.kind_of(base)) => {
                let arguments = parse_arguments(parser)?;
                let image = match parser.kind_of(base) {
                    NodeKind::Variable => parser.ast().get(base).image().to_string(),
                    _ => String::new(),
                };
                base = parser.finish(NodeKind::FunctionPostfix, image, start, &[base, arguments]);
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus if is_assignable(parser.kind_of(base)) => {
                let token = parser.advance();
                let image = parser.text(&token);
                base = parser.finish(NodeKind::PostfixExpression, image, start, &[base]);
            }
            _ => return Ok(base),
        }
    }
}

fn is_variable_like(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Variable
            | NodeKind::VariableVariable
            | NodeKind::CompoundVariable
            | NodeKind::ArrayIndexExpression
            | NodeKind::StringIndexExpression
            | NodeKind::MemberPrimaryPrefix
    )
}

fn is_callable(kind: NodeKind) -> bool {
    is_variable_like(kind)
        || matches!(
            kind,
            NodeKind::FunctionPostfix | NodeKind::Expression | NodeKind::Closure
        )
}

/// Member after `->`: property or method, named, variable or `{expr}`.
fn parse_object_member(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let start = parser.current().start;
    let name = parse_member_name(parser)?;
    let image = parser.ast().get(name).image().to_string();
    if parser.check(TokenKind::LeftParen) {
        let arguments = parse_arguments(parser)?;
        Ok(parser.finish(NodeKind::MethodPostfix, image, start, &[name, arguments]))
    } else {
        Ok(parser.finish(NodeKind::PropertyPostfix, image, start, &[name]))
    }
}

/// Member after `::`: constant, static property, static method or `class`.
fn parse_static_member(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    let start = token.start;

    if token.kind == TokenKind::Class {
        parser.require(Feature::ClassNameResolution)?;
        parser.advance();
        return Ok(parser.leaf(NodeKind::ClassFqnPostfix, &token));
    }

    if matches!(token.kind, TokenKind::Variable | TokenKind::Dollar) {
        let variable = parse_variable(parser)?;
        let image = parser.ast().get(variable).image().to_string();
        if parser.check(TokenKind::LeftParen) {
            let arguments = parse_arguments(parser)?;
            return Ok(parser.finish(NodeKind::MethodPostfix, image, start, &[variable, arguments]));
        }
        return Ok(parser.finish(NodeKind::PropertyPostfix, image, start, &[variable]));
    }

    let name = parse_member_name(parser)?;
    let image = parser.ast().get(name).image().to_string();
    if parser.check(TokenKind::LeftParen) {
        let arguments = parse_arguments(parser)?;
        Ok(parser.finish(NodeKind::MethodPostfix, image, start, &[name, arguments]))
    } else if parser.kind_of(name) == NodeKind::Identifier {
        Ok(parser.finish(NodeKind::ConstantPostfix, image, start, &[name]))
    } else {
        Err(parser.unexpected())
    }
}

/// Identifier (keywords allowed), variable or `{expr}` naming a member.
fn parse_member_name(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    match token.kind {
        kind if kind.is_identifier_like() => {
            parser.advance();
            Ok(parser.leaf(NodeKind::Identifier, &token))
        }
        TokenKind::Variable | TokenKind::Dollar => parse_variable(parser),
        TokenKind::LeftBrace => {
            parser.advance(); // consume {
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::RightBrace)?;
            Ok(parser.finish(NodeKind::CompoundExpression, "{", token.start, &[inner]))
        }
        _ => Err(parser.unexpected()),
    }
}

/// `( args )` spanning the parentheses.
pub fn parse_arguments(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let open = parser.expect(TokenKind::LeftParen)?;
    let mut args = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        if parser.check(TokenKind::Ellipsis) {
            parser.require(Feature::ArgumentUnpacking)?;
            let token = parser.advance();
            let inner = parse_expr(parser)?;
            args.push(parser.finish(NodeKind::UnaryExpression, "...", token.start, &[inner]));
        } else {
            args.push(parse_expr(parser)?);
        }
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    Ok(parser.finish(NodeKind::Arguments, "", open.start, &args))
}

// =============================================================================
// Primary expressions
// =============================================================================

fn parse_primary(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    let start = token.start;

    match token.kind {
        TokenKind::Variable | TokenKind::Dollar => parse_variable(parser),

        kind if kind.is_numeric_literal() => parse_number(parser),

        TokenKind::SingleQuotedString => {
            parser.advance();
            Ok(parser.leaf(NodeKind::Literal, &token))
        }
        TokenKind::DoubleQuotedString
        | TokenKind::BacktickString
        | TokenKind::Heredoc
        | TokenKind::Nowdoc => {
            parser.advance();
            interpolation::parse_string(parser, &token)
        }

        TokenKind::True | TokenKind::False | TokenKind::Null => {
            parser.advance();
            Ok(parser.leaf(NodeKind::Literal, &token))
        }

        kind if kind.is_magic_constant() => {
            parser.advance();
            Ok(parser.leaf(NodeKind::Constant, &token))
        }

        TokenKind::LeftParen => {
            parser.advance(); // consume (
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::RightParen)?;
            Ok(parser.finish(NodeKind::Expression, "", start, &[inner]))
        }

        TokenKind::Self_ | TokenKind::Parent_ => {
            parser.advance();
            let reference = parser.keyword_reference(&token)?;
            if parser.check(TokenKind::DoubleColon) {
                Ok(reference)
            } else {
                Err(parser.unexpected())
            }
        }
        TokenKind::Static => {
            if parser.peek_kind(1) == TokenKind::Function {
                parser.require(Feature::StaticClosures)?;
                parser.advance(); // consume static
                return parse_closure(parser, start, true);
            }
            parser.advance();
            let reference = parser.keyword_reference(&token)?;
            if parser.check(TokenKind::DoubleColon) {
                Ok(reference)
            } else {
                Err(parser.unexpected())
            }
        }

        TokenKind::Function => parse_closure(parser, start, false),
        TokenKind::New => parse_new(parser),
        TokenKind::Array if parser.peek_kind(1) == TokenKind::LeftParen => parse_array(parser),
        TokenKind::LeftBracket => {
            parser.require(Feature::ShortArraySyntax)?;
            parse_array(parser)
        }
        TokenKind::List => parse_list(parser),
        TokenKind::Isset => {
            parser.advance();
            let arguments = parse_call_operands(parser)?;
            Ok(parser.finish(NodeKind::IssetExpression, parser.text(&token), start, &arguments))
        }
        TokenKind::Empty => {
            parser.advance();
            let arguments = parse_call_operands(parser)?;
            Ok(parser.finish(NodeKind::EmptyExpression, parser.text(&token), start, &arguments))
        }
        TokenKind::Eval => {
            parser.advance();
            let arguments = parse_call_operands(parser)?;
            Ok(parser.finish(NodeKind::EvalExpression, parser.text(&token), start, &arguments))
        }
        TokenKind::Exit | TokenKind::Die => {
            parser.advance();
            let mut children = Vec::new();
            if parser.check(TokenKind::LeftParen) {
                children = parse_call_operands(parser)?;
            }
            Ok(parser.finish(NodeKind::ExitExpression, parser.text(&token), start, &children))
        }

        _ if parser.at_name() => parse_name_expr(parser),

        _ => Err(parser.unexpected()),
    }
}

/// `( expr, ... )` of a language construct; the operands become direct children.
fn parse_call_operands(parser: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    parser.expect(TokenKind::LeftParen)?;
    let mut operands = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        operands.push(parse_expr(parser)?);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    Ok(operands)
}

/// `$a`, `$$a`, `${expr}`.
pub fn parse_variable(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    match token.kind {
        TokenKind::Variable => Ok(parser.leaf(NodeKind::Variable, &token)),
        TokenKind::Dollar if parser.check(TokenKind::LeftBrace) => {
            let open = parser.advance();
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::RightBrace)?;
            let compound = parser.finish(NodeKind::CompoundExpression, "{", open.start, &[inner]);
            Ok(parser.finish(NodeKind::CompoundVariable, "$", token.start, &[compound]))
        }
        TokenKind::Dollar => {
            let inner = parse_variable(parser)?;
            Ok(parser.finish(NodeKind::VariableVariable, "$", token.start, &[inner]))
        }
        _ => Err(parser.unexpected_token(&token)),
    }
}

/// Numeric literal, kept verbatim. A literal glued to a following name or
/// number (`0b2`, `1abc`) is rejected; a glued keyword (`1and 2`) is not.
fn parse_number(parser: &mut Parser) -> Result<NodeId, ParseError> {
    if parser.check(TokenKind::BinIntLiteral) {
        parser.require(Feature::BinaryLiterals)?;
    }
    let token = parser.advance();
    let next = *parser.current();
    if next.range.start == token.range.end
        && (next.kind == TokenKind::Identifier || next.kind.is_numeric_literal())
    {
        return Err(parser.unexpected_token(&next));
    }
    Ok(parser.leaf(NodeKind::Literal, &token))
}

/// A bare name: function call, class reference before `::`, or constant.
fn parse_name_expr(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let (raw, span) = parser.parse_qualified_name()?;
    match parser.current_kind() {
        TokenKind::LeftParen => {
            let name = parser.node(NodeKind::Identifier, raw.clone(), span, &[]);
            let arguments = parse_arguments(parser)?;
            Ok(parser.finish(NodeKind::FunctionPostfix, raw, span.start, &[name, arguments]))
        }
        TokenKind::DoubleColon => Ok(parser.class_reference(NodeKind::ClassOrInterfaceReference, &raw, span)),
        _ => Ok(parser.node(NodeKind::Constant, raw, span, &[])),
    }
}

/// Right operand of `new` and `instanceof`: a class name, `self`/`parent`/`static`,
/// or a dynamic expression.
fn parse_class_name_or_expr(parser: &mut Parser, kind: NodeKind, min_bp: u8) -> Result<NodeId, ParseError> {
    let token = *parser.current();
    match token.kind {
        TokenKind::Self_ | TokenKind::Parent_ | TokenKind::Static => {
            parser.advance();
            parser.keyword_reference(&token)
        }
        _ if parser.at_name() => parser.parse_class_reference(kind),
        _ => parse_expr_bp(parser, min_bp),
    }
}

fn parse_new(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance(); // consume new
    let class = match parser.current_kind() {
        TokenKind::Variable | TokenKind::Dollar => parse_new_target(parser)?,
        _ => parse_class_name_or_expr(parser, NodeKind::ClassReference, CLONE_BP)?,
    };
    let mut children = vec![class];
    if parser.check(TokenKind::LeftParen) {
        children.push(parse_arguments(parser)?);
    }
    Ok(parser.finish(NodeKind::AllocationExpression, parser.text(&token), token.start, &children))
}

/// Dynamic class name after `new`: a variable with property and index access
/// but no calls, so `new $a->b()` instantiates `$a->b`.
fn parse_new_target(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let mut base = parse_variable(parser)?;
    loop {
        let start = parser.start_of(base);
        match parser.current_kind() {
            TokenKind::LeftBracket => {
                parser.advance();
                let index = parse_expr(parser)?;
                parser.expect(TokenKind::RightBracket)?;
                base = parser.finish(NodeKind::ArrayIndexExpression, "[", start, &[base, index]);
            }
            TokenKind::Arrow => {
                parser.advance();
                let member_start = parser.current().start;
                let name = parse_member_name(parser)?;
                let image = parser.ast().get(name).image().to_string();
                let postfix = parser.finish(NodeKind::PropertyPostfix, image, member_start, &[name]);
                base = parser.finish(NodeKind::MemberPrimaryPrefix, "->", start, &[base, postfix]);
            }
            TokenKind::DoubleColon if matches!(parser.peek_kind(1), TokenKind::Variable | TokenKind::Dollar) => {
                parser.advance();
                let member_start = parser.current().start;
                let variable = parse_variable(parser)?;
                let image = parser.ast().get(variable).image().to_string();
                let postfix = parser.finish(NodeKind::PropertyPostfix, image, member_start, &[variable]);
                base = parser.finish(NodeKind::MemberPrimaryPrefix, "::", start, &[base, postfix]);
            }
            _ => return Ok(base),
        }
    }
}

// =============================================================================
// Arrays and list()
// =============================================================================

/// `array(...)` or `[...]`; an empty literal has no children.
fn parse_array(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let short = token.kind == TokenKind::LeftBracket;
    let close = if short {
        TokenKind::RightBracket
    } else {
        parser.expect(TokenKind::LeftParen)?;
        TokenKind::RightParen
    };

    let mut elements = Vec::new();
    while !parser.check(close) {
        elements.push(parse_array_element(parser)?);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(close)?;

    let image = parser.text(&token);
    let id = parser.finish(NodeKind::Array, image, token.start, &elements);
    if short {
        parser.ast_mut().add_flags(id, flags::SHORT_ARRAY);
    }
    Ok(id)
}

fn parse_array_element(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let start = parser.current().start;
    let mut by_ref = parser.eat(TokenKind::Ampersand).is_some();
    let first = parse_expr(parser)?;

    let children = if !by_ref && parser.eat(TokenKind::FatArrow).is_some() {
        by_ref = parser.eat(TokenKind::Ampersand).is_some();
        let value = parse_expr(parser)?;
        vec![first, value]
    } else {
        vec![first]
    };

    let id = parser.finish(NodeKind::ArrayElement, "", start, &children);
    if by_ref {
        parser.ast_mut().add_flags(id, flags::BY_REFERENCE);
    }
    Ok(id)
}

/// `list($a, , list($b))`; skipped slots produce no child.
fn parse_list(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    parser.expect(TokenKind::LeftParen)?;
    let mut children = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        if parser.eat(TokenKind::Comma).is_some() {
            continue;
        }
        children.push(parse_postfix_expr(parser)?);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    Ok(parser.finish(NodeKind::ListExpression, parser.text(&token), token.start, &children))
}

// =============================================================================
// Closures
// =============================================================================

fn parse_closure(parser: &mut Parser, start: Position, is_static: bool) -> Result<NodeId, ParseError> {
    parser.expect(TokenKind::Function)?;
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();

    let mut children = vec![decl::parse_formal_parameters(parser)?];
    if parser.check(TokenKind::Use) {
        children.push(parse_closure_use(parser)?);
    }
    if let Some(return_type) = decl::parse_return_type(parser)? {
        children.push(return_type);
    }
    children.push(decl::parse_scope(parser)?);

    let id = parser.finish(NodeKind::Closure, "function", start, &children);
    let mut bits = 0;
    if by_ref {
        bits |= flags::BY_REFERENCE;
    }
    if is_static {
        bits |= flags::STATIC;
    }
    parser.ast_mut().add_flags(id, bits);
    Ok(id)
}

/// `use ($a, &$b)`; by-reference imports carry `BY_REFERENCE`.
fn parse_closure_use(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance(); // consume use
    parser.expect(TokenKind::LeftParen)?;
    let mut variables = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        let by_ref = parser.eat(TokenKind::Ampersand).is_some();
        let variable = parser.expect(TokenKind::Variable)?;
        let id = parser.leaf(NodeKind::Variable, &variable);
        if by_ref {
            parser.ast_mut().add_flags(id, flags::BY_REFERENCE);
        }
        variables.push(id);
        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    Ok(parser.finish(NodeKind::ClosureUse, parser.text(&token), token.start, &variables))
}

/// True when `token` can begin an expression; used to detect optional operands.
pub fn starts_expression(token: &Token) -> bool {
    !matches!(
        token.kind,
        TokenKind::Semicolon
            | TokenKind::CloseTag
            | TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Eof
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SymbolTable;
    use crate::options::ParserOptions;
    use crate::version::PhpVersion;
    use depend_ast::{Ast, Span};
    use std::sync::Arc;

    fn parse_with_version(source: &str, version: PhpVersion) -> Result<Ast, ParseError> {
        let code = format!("<?php {source}");
        let options = ParserOptions::new().with_version(version);
        let mut parser = Parser::new(&code, options, Arc::new(SymbolTable::new()))?;
        parser.advance(); // consume <?php
        let id = parse_expr(&mut parser)?;
        let mut ast = parser.into_ast();
        ast.set_root(id);
        Ok(ast)
    }

    fn parse(source: &str) -> Ast {
        parse_with_version(source, PhpVersion::Php70).unwrap()
    }

    fn root_kind(ast: &Ast) -> NodeKind {
        ast.root().unwrap().kind()
    }

    #[test]
    fn test_binary_expression_shape() {
        let ast = parse("1 + 2 * 3");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::Expression);
        assert_eq!(root.child(1).unwrap().kind(), NodeKind::AdditionExpression);
        let rhs = root.child(2).unwrap();
        assert_eq!(rhs.kind(), NodeKind::Expression);
        assert_eq!(rhs.child(1).unwrap().image(), "*");
    }

    #[test]
    fn test_operator_node_spans_only_operator() {
        let ast = parse("1 <<  2");
        let op = ast.root().unwrap().child(1).unwrap();
        assert_eq!(op.kind(), NodeKind::ShiftLeftExpression);
        assert_eq!(op.image(), "<<");
        assert_eq!(op.span(), Span::new(Position::new(1, 9), Position::new(1, 10)));
    }

    #[test]
    fn test_assignment_binds_under_bang() {
        let ast = parse("!$a = f()");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::UnaryExpression);
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::AssignmentExpression);
    }

    #[test]
    fn test_reference_assignment_image() {
        let ast = parse("$a =& $b");
        assert_eq!(ast.root().unwrap().image(), "=&");
    }

    #[test]
    fn test_short_ternary() {
        let ast = parse("$a ?: $b");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::ConditionalExpression);
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_ternary_is_left_associative() {
        let ast = parse("$a ? 1 : $b ? 2 : 3");
        let root = ast.root().unwrap();
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::ConditionalExpression);
    }

    #[test]
    fn test_pow_is_right_associative() {
        let ast = parse("2 ** 3 ** 4");
        let root = ast.root().unwrap();
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::Literal);
        assert_eq!(root.child(2).unwrap().kind(), NodeKind::Expression);
    }

    #[test]
    fn test_cast_image_normalized() {
        let ast = parse("( INT ) $a");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::CastExpression);
        assert_eq!(root.image(), "(int)");
    }

    #[test]
    fn test_parenthesized_constant_is_not_cast() {
        let ast = parse("(FOO) + 1");
        assert_eq!(ast.root().unwrap().child(0).unwrap().kind(), NodeKind::Expression);
    }

    #[test]
    fn test_method_call_chain() {
        let ast = parse("$a->b()->c");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::MemberPrimaryPrefix);
        assert_eq!(root.child(1).unwrap().kind(), NodeKind::PropertyPostfix);
        let inner = root.child(0).unwrap();
        assert_eq!(inner.kind(), NodeKind::MemberPrimaryPrefix);
        let method = inner.child(1).unwrap();
        assert_eq!(method.kind(), NodeKind::MethodPostfix);
        assert_eq!(method.image(), "b");
        assert_eq!(method.child(1).unwrap().kind(), NodeKind::Arguments);
    }

    #[test]
    fn test_static_call_reference() {
        let ast = parse("Foo::bar(1)");
        let root = ast.root().unwrap();
        assert_eq!(root.image(), "::");
        let class = root.child(0).unwrap();
        assert_eq!(class.kind(), NodeKind::ClassOrInterfaceReference);
        assert_eq!(class.image(), "Foo");
    }

    #[test]
    fn test_function_call() {
        let ast = parse("\\strlen($s)");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::FunctionPostfix);
        assert_eq!(root.image(), "\\strlen");
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::Identifier);
    }

    #[test]
    fn test_empty_arrays_have_no_children() {
        let ast = parse("array()");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::Array);
        assert_eq!(root.child_count(), 0);
        assert_eq!(root.span(), Span::new(Position::new(1, 7), Position::new(1, 13)));

        let ast = parse("[]");
        let root = ast.root().unwrap();
        assert_eq!(root.child_count(), 0);
        assert!(root.has_flag(flags::SHORT_ARRAY));
        assert_eq!(root.span(), Span::new(Position::new(1, 7), Position::new(1, 8)));
    }

    #[test]
    fn test_array_elements() {
        let ast = parse("array('a' => 1, &$b)");
        let root = ast.root().unwrap();
        assert_eq!(root.child(0).unwrap().child_count(), 2);
        assert!(root.child(1).unwrap().has_flag(flags::BY_REFERENCE));
    }

    #[test]
    fn test_short_array_needs_php54() {
        let err = parse_with_version("[1]", PhpVersion::Php53).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_numeric_literals_verbatim() {
        for literal in ["0", "00", "0x0", "0b0", "0X1F", "1.", ".5", "1e3", "017"] {
            let ast = parse(literal);
            let root = ast.root().unwrap();
            assert_eq!(root.kind(), NodeKind::Literal);
            assert_eq!(root.image(), literal);
        }
    }

    #[test]
    fn test_invalid_binary_literals() {
        for source in ["0b", "0b2", "1abc"] {
            for version in [PhpVersion::Php53, PhpVersion::Php70] {
                let err = parse_with_version(source, version).unwrap_err();
                assert!(matches!(err, ParseError::UnexpectedToken { .. }), "{source}");
            }
        }
        assert!(parse_with_version("0b1", PhpVersion::Php53).is_err());

        let ast = parse("1and 2");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::Expression);
        assert_eq!(root.child(0).unwrap().image(), "1");
        assert_eq!(root.child(1).unwrap().kind(), NodeKind::LogicalAndExpression);
        assert_eq!(parse_with_version("0b1", PhpVersion::Php54).unwrap().root().unwrap().image(), "0b1");
    }

    #[test]
    fn test_version_gated_operators() {
        assert!(parse_with_version("$a ?? $b", PhpVersion::Php56).is_err());
        assert!(parse_with_version("$a <=> $b", PhpVersion::Php56).is_err());
        assert!(parse_with_version("$a ** $b", PhpVersion::Php55).is_err());
        assert_eq!(root_kind(&parse("$a ?? $b")), NodeKind::Expression);
    }

    #[test]
    fn test_variable_variables() {
        let ast = parse("$$a");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::VariableVariable);
        assert_eq!(root.child(0).unwrap().image(), "$a");

        let ast = parse("${'a' . $b}");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::CompoundVariable);
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::CompoundExpression);
    }

    #[test]
    fn test_new_with_dynamic_class() {
        let ast = parse("new $a->b()");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::AllocationExpression);
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::MemberPrimaryPrefix);
        assert_eq!(root.child(1).unwrap().kind(), NodeKind::Arguments);

        let ast = parse("new Foo");
        let root = ast.root().unwrap();
        assert_eq!(root.child(0).unwrap().kind(), NodeKind::ClassReference);
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_include_once_flag() {
        let ast = parse("require_once 'a.php'");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::RequireExpression);
        assert!(root.has_flag(flags::ONCE));
    }

    #[test]
    fn test_postfix_increment() {
        let ast = parse("$i++");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::PostfixExpression);
        assert_eq!(root.image(), "++");
    }

    #[test]
    fn test_closure_shape() {
        let ast = parse("function ($a) use (&$b) { return $a; }");
        let root = ast.root().unwrap();
        assert_eq!(root.kind(), NodeKind::Closure);
        let kinds: Vec<_> = root.children().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::FormalParameters, NodeKind::ClosureUse, NodeKind::Scope]);
        assert!(root.child(1).unwrap().child(0).unwrap().has_flag(flags::BY_REFERENCE));
    }

    #[test]
    fn test_yield_needs_php55() {
        assert!(parse_with_version("yield $a", PhpVersion::Php54).is_err());
        let ast = parse("yield $k => $v");
        assert_eq!(ast.root().unwrap().child_count(), 2);
    }

    #[test]
    fn test_static_outside_class_fails() {
        let err = parse_with_version("static::m()", PhpVersion::Php70).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The keyword \"static\" was used outside of a class/method scope."
        );
    }
}
