use depend_ast::{flags, NodeId, NodeKind};
use depend_lexer::TokenKind;

use crate::decl;
use crate::diagnostics::ParseError;
use crate::expr::{self, parse_expr};
use crate::parser::Parser;
use crate::version::Feature;

/// Parse one statement. Inline HTML, open/close tags between statements and
/// empty statements produce no node.
pub fn parse_statement(parser: &mut Parser) -> Result<Option<NodeId>, ParseError> {
    let token = *parser.current();
    let start = token.start;

    let id = match token.kind {
        TokenKind::InlineHtml | TokenKind::CloseTag | TokenKind::Semicolon => {
            parser.advance();
            return Ok(None);
        }
        TokenKind::OpenTag => {
            parser.advance();
            if !parser.text(&token).starts_with("<?=") {
                return Ok(None);
            }
            let values = parse_expr_list(parser)?;
            parser.terminate()?;
            parser.finish(NodeKind::EchoStatement, "<?=", start, &values)
        }
        TokenKind::LeftBrace => parse_block(parser)?,

        TokenKind::If => parse_if(parser, NodeKind::IfStatement)?,
        TokenKind::While => parse_while(parser)?,
        TokenKind::Do => parse_do_while(parser)?,
        TokenKind::For => parse_for(parser)?,
        TokenKind::Foreach => parse_foreach(parser)?,
        TokenKind::Switch => parse_switch(parser)?,
        TokenKind::Try => parse_try(parser)?,
        TokenKind::Declare => parse_declare(parser)?,

        TokenKind::Return => parse_optional_operand(parser, NodeKind::ReturnStatement)?,
        TokenKind::Break => parse_optional_operand(parser, NodeKind::BreakStatement)?,
        TokenKind::Continue => parse_optional_operand(parser, NodeKind::ContinueStatement)?,
        TokenKind::Echo => {
            parser.advance();
            let values = parse_expr_list(parser)?;
            parser.terminate()?;
            parser.finish(NodeKind::EchoStatement, parser.text(&token), start, &values)
        }
        TokenKind::Throw => {
            parser.advance();
            let value = parse_expr(parser)?;
            parser.terminate()?;
            parser.finish(NodeKind::ThrowStatement, parser.text(&token), start, &[value])
        }
        TokenKind::Global => {
            parser.advance();
            let mut variables = vec![expr::parse_variable(parser)?];
            while parser.eat(TokenKind::Comma).is_some() {
                variables.push(expr::parse_variable(parser)?);
            }
            parser.terminate()?;
            parser.finish(NodeKind::GlobalStatement, parser.text(&token), start, &variables)
        }
        TokenKind::Unset => {
            parser.advance();
            parser.expect(TokenKind::LeftParen)?;
            let mut operands = Vec::new();
            while !parser.check(TokenKind::RightParen) {
                operands.push(parse_expr(parser)?);
                if parser.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            parser.expect(TokenKind::RightParen)?;
            parser.terminate()?;
            parser.finish(NodeKind::UnsetStatement, parser.text(&token), start, &operands)
        }
        TokenKind::Static if parser.peek_kind(1) == TokenKind::Variable => parse_static_variables(parser)?,
        TokenKind::Goto => {
            parser.advance();
            let label = parser.expect(TokenKind::Identifier)?;
            parser.terminate()?;
            parser.finish(NodeKind::GotoStatement, parser.text(&label), start, &[])
        }
        TokenKind::Identifier if parser.peek_kind(1) == TokenKind::Colon => {
            parser.advance();
            parser.advance(); // consume :
            parser.finish(NodeKind::LabelStatement, parser.text(&token), start, &[])
        }

        TokenKind::Function
            if parser.peek(1).kind.is_identifier_like()
                || (parser.peek_kind(1) == TokenKind::Ampersand && parser.peek(2).kind.is_identifier_like()) =>
        {
            decl::parse_function_declaration(parser)?
        }
        TokenKind::Abstract | TokenKind::Final | TokenKind::Class => decl::parse_class_declaration(parser)?,
        TokenKind::Interface => decl::parse_interface_declaration(parser)?,
        TokenKind::Trait => decl::parse_trait_declaration(parser)?,
        TokenKind::Const => decl::parse_constant_definition(parser)?,
        TokenKind::Use => {
            decl::parse_use_imports(parser)?;
            return Ok(None);
        }
        TokenKind::HaltCompiler => {
            parser.advance();
            parser.expect(TokenKind::LeftParen)?;
            parser.expect(TokenKind::RightParen)?;
            parser.terminate()?;
            return Ok(None);
        }

        _ => {
            let value = parse_expr(parser)?;
            parser.terminate()?;
            parser.finish(NodeKind::Statement, "", start, &[value])
        }
    };

    Ok(Some(id))
}

/// Statements up to (not including) one of `terminators`.
pub fn parse_statements_until(parser: &mut Parser, terminators: &[TokenKind]) -> Result<Vec<NodeId>, ParseError> {
    let mut statements = Vec::new();
    while !terminators.contains(&parser.current_kind()) {
        if parser.check(TokenKind::Eof) {
            return Err(parser.unexpected());
        }
        if let Some(statement) = parse_statement(parser)? {
            statements.push(statement);
        }
    }
    Ok(statements)
}

/// `{ ... }` as a `ScopeStatement` spanning the braces.
pub fn parse_block(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let open = parser.expect(TokenKind::LeftBrace)?;
    let statements = parse_statements_until(parser, &[TokenKind::RightBrace])?;
    parser.expect(TokenKind::RightBrace)?;
    Ok(parser.finish(NodeKind::ScopeStatement, "", open.start, &statements))
}

fn parse_expr_list(parser: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    let mut values = vec![parse_expr(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        values.push(parse_expr(parser)?);
    }
    Ok(values)
}

/// `return`, `break` and `continue` with an optional operand.
fn parse_optional_operand(parser: &mut Parser, kind: NodeKind) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let mut children = Vec::new();
    if expr::starts_expression(parser.current()) {
        children.push(parse_expr(parser)?);
    }
    parser.terminate()?;
    Ok(parser.finish(kind, parser.text(&token), token.start, &children))
}

/// `static $a = 1, $b;`
fn parse_static_variables(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let mut declarators = vec![decl::parse_variable_declarator(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        declarators.push(decl::parse_variable_declarator(parser)?);
    }
    parser.terminate()?;
    Ok(parser.finish(
        NodeKind::StaticVariableDeclaration,
        parser.text(&token),
        token.start,
        &declarators,
    ))
}

// =============================================================================
// Control structure bodies
// =============================================================================

/// `( expr )` as an `Expression` spanning the parentheses.
fn parse_condition(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let open = parser.expect(TokenKind::LeftParen)?;
    let inner = parse_expr(parser)?;
    parser.expect(TokenKind::RightParen)?;
    Ok(parser.finish(NodeKind::Expression, "", open.start, &[inner]))
}

/// Body of a control structure: a block, an empty `;`, a single statement, or
/// the alternative `:` form running up to one of `alt_end`. Returns whether
/// the alternative form was used; the caller then closes it.
fn parse_body(parser: &mut Parser, alt_end: &[TokenKind]) -> Result<(NodeId, bool), ParseError> {
    let token = *parser.current();
    match token.kind {
        TokenKind::LeftBrace => Ok((parse_block(parser)?, false)),
        TokenKind::Colon => {
            parser.advance();
            let statements = parse_statements_until(parser, alt_end)?;
            let body = parser.finish(NodeKind::ScopeStatement, "", token.start, &statements);
            parser.ast_mut().add_flags(body, flags::ALTERNATIVE_SYNTAX);
            Ok((body, true))
        }
        TokenKind::Semicolon | TokenKind::CloseTag => {
            parser.advance();
            let span = Parser::span_of(&token);
            Ok((parser.node(NodeKind::ScopeStatement, "", span, &[]), false))
        }
        _ => {
            let statement = loop {
                if parser.check(TokenKind::Eof) {
                    return Err(parser.unexpected());
                }
                if let Some(statement) = parse_statement(parser)? {
                    break statement;
                }
            };
            let span = parser.ast().span(statement);
            Ok((parser.node(NodeKind::ScopeStatement, "", span, &[statement]), false))
        }
    }
}

/// Consume `end*;` of an alternative-syntax construct and stretch `body` over it.
fn close_alternative(parser: &mut Parser, end: TokenKind, body: NodeId) -> Result<(), ParseError> {
    parser.expect(end)?;
    parser.terminate()?;
    let end = parser.last_end();
    parser.ast_mut().extend_to(body, end);
    Ok(())
}

// =============================================================================
// Conditionals and loops
// =============================================================================

/// `if` and `elseif`; a following `elseif` nests as the last child.
fn parse_if(parser: &mut Parser, kind: NodeKind) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let condition = parse_condition(parser)?;
    let (body, alternative) = parse_body(parser, &[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf])?;

    let mut children = vec![condition, body];
    let mut has_else = false;
    match parser.current_kind() {
        TokenKind::ElseIf => {
            has_else = true;
            children.push(parse_if(parser, NodeKind::ElseIfStatement)?);
        }
        TokenKind::Else => {
            has_else = true;
            parser.advance();
            let (else_body, else_alternative) = parse_body(parser, &[TokenKind::EndIf])?;
            if alternative || else_alternative {
                close_alternative(parser, TokenKind::EndIf, else_body)?;
            }
            children.push(else_body);
        }
        TokenKind::EndIf if alternative => close_alternative(parser, TokenKind::EndIf, body)?,
        _ => {}
    }

    let id = parser.finish(kind, parser.text(&token), token.start, &children);
    if has_else {
        parser.ast_mut().add_flags(id, flags::HAS_ELSE);
    }
    Ok(id)
}

fn parse_while(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let condition = parse_condition(parser)?;
    let (body, alternative) = parse_body(parser, &[TokenKind::EndWhile])?;
    if alternative {
        close_alternative(parser, TokenKind::EndWhile, body)?;
    }
    Ok(parser.finish(NodeKind::WhileStatement, parser.text(&token), token.start, &[condition, body]))
}

fn parse_do_while(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let (body, _) = parse_body(parser, &[])?;
    parser.expect(TokenKind::While)?;
    let condition = parse_condition(parser)?;
    parser.terminate()?;
    Ok(parser.finish(NodeKind::DoWhileStatement, parser.text(&token), token.start, &[body, condition]))
}

/// `for (init; condition; update) body`; empty clauses produce no child.
fn parse_for(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    parser.expect(TokenKind::LeftParen)?;

    let mut children = Vec::new();
    let clauses = [
        (NodeKind::ForInit, TokenKind::Semicolon),
        (NodeKind::Expression, TokenKind::Semicolon),
        (NodeKind::ForUpdate, TokenKind::RightParen),
    ];
    for (kind, close) in clauses {
        if !parser.check(close) {
            let start = parser.current().start;
            let values = parse_expr_list(parser)?;
            children.push(parser.finish(kind, "", start, &values));
        }
        parser.expect(close)?;
    }

    let (body, alternative) = parse_body(parser, &[TokenKind::EndFor])?;
    if alternative {
        close_alternative(parser, TokenKind::EndFor, body)?;
    }
    children.push(body);
    Ok(parser.finish(NodeKind::ForStatement, parser.text(&token), token.start, &children))
}

/// `foreach (subject as [key =>] [&]value) body`.
fn parse_foreach(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    parser.expect(TokenKind::LeftParen)?;
    let mut children = vec![parse_expr(parser)?];
    parser.expect(TokenKind::As)?;
    children.push(parse_expr(parser)?);
    if parser.eat(TokenKind::FatArrow).is_some() {
        children.push(parse_expr(parser)?);
    }
    parser.expect(TokenKind::RightParen)?;

    let (body, alternative) = parse_body(parser, &[TokenKind::EndForeach])?;
    if alternative {
        close_alternative(parser, TokenKind::EndForeach, body)?;
    }
    children.push(body);
    Ok(parser.finish(NodeKind::ForeachStatement, parser.text(&token), token.start, &children))
}

// =============================================================================
// switch
// =============================================================================

fn parse_switch(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let condition = parse_condition(parser)?;

    let alternative = parser.eat(TokenKind::Colon).is_some();
    let close = if alternative {
        TokenKind::EndSwitch
    } else {
        parser.expect(TokenKind::LeftBrace)?;
        TokenKind::RightBrace
    };

    let mut children = vec![condition];
    loop {
        match parser.current_kind() {
            TokenKind::Case | TokenKind::Default => children.push(parse_switch_label(parser, close)?),
            // Trivia between the opening brace and the first label
            TokenKind::InlineHtml | TokenKind::CloseTag | TokenKind::OpenTag | TokenKind::Semicolon => {
                parser.advance();
            }
            kind if kind == close => break,
            _ => return Err(parser.unexpected()),
        }
    }
    parser.expect(close)?;
    if alternative {
        parser.terminate()?;
    }

    let id = parser.finish(NodeKind::SwitchStatement, parser.text(&token), token.start, &children);
    if alternative {
        parser.ast_mut().add_flags(id, flags::ALTERNATIVE_SYNTAX);
    }
    Ok(id)
}

/// `case expr:` / `default:` followed by its statements.
fn parse_switch_label(parser: &mut Parser, close: TokenKind) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let is_default = token.kind == TokenKind::Default;

    let mut children = Vec::new();
    if !is_default {
        children.push(parse_expr(parser)?);
    }
    if parser.eat(TokenKind::Colon).is_none() {
        parser.expect(TokenKind::Semicolon)?;
    }
    children.extend(parse_statements_until(parser, &[TokenKind::Case, TokenKind::Default, close])?);

    let id = parser.finish(NodeKind::SwitchLabel, parser.text(&token), token.start, &children);
    if is_default {
        parser.ast_mut().add_flags(id, flags::DEFAULT_LABEL);
    }
    Ok(id)
}

// =============================================================================
// try / catch / finally
// =============================================================================

/// Children: `[ScopeStatement, CatchStatement..., FinallyStatement?]`.
fn parse_try(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    let mut children = vec![parse_block(parser)?];

    while parser.check(TokenKind::Catch) {
        let catch = parser.advance();
        parser.expect(TokenKind::LeftParen)?;
        let class = parser.parse_class_reference(NodeKind::ClassOrInterfaceReference)?;
        let variable = parser.expect(TokenKind::Variable)?;
        let variable = parser.leaf(NodeKind::Variable, &variable);
        parser.expect(TokenKind::RightParen)?;
        let body = parse_block(parser)?;
        children.push(parser.finish(NodeKind::CatchStatement, parser.text(&catch), catch.start, &[class, variable, body]));
    }

    if parser.check(TokenKind::Finally) {
        parser.require(Feature::Finally)?;
        let finally = parser.advance();
        let body = parse_block(parser)?;
        children.push(parser.finish(NodeKind::FinallyStatement, parser.text(&finally), finally.start, &[body]));
    }

    if children.len() == 1 {
        return Err(parser.unexpected());
    }
    Ok(parser.finish(NodeKind::TryStatement, parser.text(&token), token.start, &children))
}

// =============================================================================
// declare
// =============================================================================

/// `declare(ticks=1) body`, `declare(strict_types=1);`
fn parse_declare(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let token = parser.advance();
    parser.expect(TokenKind::LeftParen)?;
    let mut children = vec![decl::parse_constant_declarator(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        children.push(decl::parse_constant_declarator(parser)?);
    }
    parser.expect(TokenKind::RightParen)?;

    if !parser.check(TokenKind::Semicolon) && !parser.check(TokenKind::CloseTag) {
        let (body, alternative) = parse_body(parser, &[TokenKind::EndDeclare])?;
        if alternative {
            close_alternative(parser, TokenKind::EndDeclare, body)?;
        }
        children.push(body);
    } else {
        parser.terminate()?;
    }
    Ok(parser.finish(NodeKind::DeclareStatement, parser.text(&token), token.start, &children))
}
