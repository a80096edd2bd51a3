use depend_ast::{flags, NodeId, NodeKind, Span, TextRange};
use depend_lexer::{heredoc_parts, Token, TokenKind};

use crate::diagnostics::ParseError;
use crate::expr::parse_expr;
use crate::parser::Parser;

/// Build the node for a double-quoted, backtick, heredoc or nowdoc token.
///
/// Double-quoted strings without interpolation stay a single `Literal` with the
/// verbatim image. Everything else becomes a container whose children alternate
/// raw `Literal` segments and embedded expressions in source order.
pub fn parse_string(parser: &mut Parser, token: &Token) -> Result<NodeId, ParseError> {
    let text = parser.text(token);
    let span = Parser::span_of(token);
    let start = token.range.start;

    match token.kind {
        TokenKind::DoubleQuotedString => {
            let quote = text.find('"').unwrap_or(0) as u32;
            let body = TextRange::new(start + quote + 1, token.range.end.saturating_sub(1));
            if !has_interpolation(parser.slice(body)) {
                return Ok(parser.leaf(NodeKind::Literal, token));
            }
            let parts = scan_parts(parser, body)?;
            Ok(parser.node(NodeKind::String, "\"", span, &parts))
        }
        TokenKind::BacktickString => {
            let body = TextRange::new(start + 1, token.range.end.saturating_sub(1));
            let parts = scan_parts(parser, body)?;
            Ok(parser.node(NodeKind::ShellExecExpression, "`", span, &parts))
        }
        TokenKind::Heredoc | TokenKind::Nowdoc => {
            let Some(heredoc) = heredoc_parts(text) else {
                return Err(parser.unexpected_token(token));
            };
            let body = TextRange::new(start + heredoc.body.start as u32, start + heredoc.body.end as u32);
            let parts = if body.is_empty() {
                Vec::new()
            } else if heredoc.nowdoc {
                vec![literal(parser, body)]
            } else {
                scan_parts(parser, body)?
            };
            let id = parser.node(NodeKind::Heredoc, heredoc.label, span, &parts);
            if heredoc.nowdoc {
                parser.ast_mut().add_flags(id, flags::NOWDOC);
            }
            Ok(id)
        }
        _ => Err(parser.unexpected_token(token)),
    }
}

/// True when the body contains an unescaped `$name`, `${` or `{$`.
pub fn has_interpolation(inner: &str) -> bool {
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2; // skip escape
            continue;
        }
        if bytes[i] == b'$'
            && i + 1 < bytes.len()
            && (is_var_start(bytes[i + 1]) || bytes[i + 1] == b'{')
        {
            return true;
        }
        if bytes[i] == b'{' && i + 1 < bytes.len() && bytes[i + 1] == b'$' {
            return true;
        }
        i += 1;
    }
    false
}

fn is_var_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_var_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Split a string body into literal segments and embedded expressions.
fn scan_parts(parser: &mut Parser, body: TextRange) -> Result<Vec<NodeId>, ParseError> {
    let inner = parser.slice(body);
    let bytes = inner.as_bytes();
    let len = bytes.len();
    let base = body.start;

    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < len {
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if next.is_some_and(is_var_start) => {
                flush_literal(parser, &mut parts, base, literal_start, i);
                let (node, end) = parse_simple_variable(parser, inner, base, i);
                parts.push(node);
                i = end;
                literal_start = i;
            }
            b'$' if next == Some(b'{') => {
                flush_literal(parser, &mut parts, base, literal_start, i);
                let close = matching_brace(bytes, i + 1)
                    .ok_or_else(|| parser.stream_end(parser.position(base + i as u32)))?;
                parts.push(parse_dollar_brace(parser, inner, base, i, close)?);
                i = close + 1;
                literal_start = i;
            }
            b'{' if next == Some(b'$') => {
                flush_literal(parser, &mut parts, base, literal_start, i);
                let close = matching_brace(bytes, i)
                    .ok_or_else(|| parser.stream_end(parser.position(base + i as u32)))?;
                let range = TextRange::new(base + i as u32 + 1, base + close as u32);
                let expr = parser.parse_embedded(range, parse_expr)?;
                let span = span_between(parser, base + i as u32, base + close as u32 + 1);
                parts.push(parser.node(NodeKind::CompoundExpression, "{", span, &[expr]));
                i = close + 1;
                literal_start = i;
            }
            _ => i += 1,
        }
    }
    flush_literal(parser, &mut parts, base, literal_start, len.min(i));
    Ok(parts)
}

fn flush_literal(parser: &mut Parser, parts: &mut Vec<NodeId>, base: u32, start: usize, end: usize) {
    if end > start {
        let range = TextRange::new(base + start as u32, base + end as u32);
        parts.push(literal(parser, range));
    }
}

fn literal(parser: &mut Parser, range: TextRange) -> NodeId {
    let image = parser.slice(range);
    let span = span_between(parser, range.start, range.end);
    parser.node(NodeKind::Literal, image, span, &[])
}

/// Inclusive span covering the bytes `start..end`.
fn span_between(parser: &Parser, start: u32, end: u32) -> Span {
    Span::new(
        parser.position(start),
        parser.end_position(TextRange::new(start, end)),
    )
}

/// `$a`, `$a[0]`, `$a[key]`, `$a[$b]` or `$a->b`. Returns the node and the
/// offset just past it.
fn parse_simple_variable(parser: &mut Parser, inner: &str, base: u32, start: usize) -> (NodeId, usize) {
    let bytes = inner.as_bytes();
    let mut end = start + 1;
    while end < bytes.len() && is_var_char(bytes[end]) {
        end += 1;
    }
    let variable = parser.node(
        NodeKind::Variable,
        &inner[start..end],
        span_between(parser, base + start as u32, base + end as u32),
        &[],
    );

    if bytes.get(end) == Some(&b'[') {
        if let Some((index, close)) = parse_simple_index(parser, inner, base, end + 1) {
            let span = span_between(parser, base + start as u32, base + close as u32 + 1);
            let id = parser.node(NodeKind::ArrayIndexExpression, "[", span, &[variable, index]);
            return (id, close + 1);
        }
    } else if bytes.get(end) == Some(&b'-')
        && bytes.get(end + 1) == Some(&b'>')
        && bytes.get(end + 2).copied().is_some_and(is_var_start)
    {
        let name_start = end + 2;
        let mut name_end = name_start + 1;
        while name_end < bytes.len() && is_var_char(bytes[name_end]) {
            name_end += 1;
        }
        let name = &inner[name_start..name_end];
        let name_span = span_between(parser, base + name_start as u32, base + name_end as u32);
        let identifier = parser.node(NodeKind::Identifier, name, name_span, &[]);
        let postfix = parser.node(NodeKind::PropertyPostfix, name, name_span, &[identifier]);
        let span = span_between(parser, base + start as u32, base + name_end as u32);
        let id = parser.node(NodeKind::MemberPrimaryPrefix, "->", span, &[variable, postfix]);
        return (id, name_end);
    }

    (variable, end)
}

/// Index inside `$a[...]`: an integer, a bare key or a variable. Returns the
/// index node and the offset of the closing bracket.
fn parse_simple_index(parser: &mut Parser, inner: &str, base: u32, start: usize) -> Option<(NodeId, usize)> {
    let bytes = inner.as_bytes();
    let close = start + memchr::memchr(b']', &bytes[start..])?;
    let key = &inner[start..close];
    let span = span_between(parser, base + start as u32, base + close as u32);

    let digits = key.strip_prefix('-').unwrap_or(key);
    let kind = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        NodeKind::Literal
    } else if key.len() > 1
        && key.starts_with('$')
        && is_var_start(key.as_bytes()[1])
        && key.bytes().skip(1).all(is_var_char)
    {
        NodeKind::Variable
    } else if !key.is_empty() && is_var_start(key.as_bytes()[0]) && key.bytes().all(is_var_char) {
        NodeKind::Literal
    } else {
        return None;
    };
    Some((parser.node(kind, key, span, &[]), close))
}

/// `${name}` or `${expr}` starting at `dollar`, closed at `close`.
fn parse_dollar_brace(
    parser: &mut Parser,
    inner: &str,
    base: u32,
    dollar: usize,
    close: usize,
) -> Result<NodeId, ParseError> {
    let content_start = dollar + 2;
    let content = &inner[content_start..close];
    let is_name = !content.is_empty()
        && is_var_start(content.as_bytes()[0])
        && content.bytes().all(is_var_char);

    let inner_node = if is_name {
        let span = span_between(parser, base + content_start as u32, base + close as u32);
        parser.node(NodeKind::Identifier, content, span, &[])
    } else {
        let range = TextRange::new(base + content_start as u32, base + close as u32);
        parser.parse_embedded(range, parse_expr)?
    };

    let brace_span = span_between(parser, base + dollar as u32 + 1, base + close as u32 + 1);
    let compound = parser.node(NodeKind::CompoundExpression, "{", brace_span, &[inner_node]);
    let span = span_between(parser, base + dollar as u32, base + close as u32 + 1);
    Ok(parser.node(NodeKind::CompoundVariable, "$", span, &[compound]))
}

/// Offset of the `}` matching the `{` at `open`, skipping quoted strings.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1; // skip escaped char
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
