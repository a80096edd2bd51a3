use depend_ast::{LineIndex, Position, TextRange};
use logos::Logos;
use memchr::memmem;
use thiserror::Error;

use crate::token::{resolve_keyword, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated heredoc")]
    UnterminatedHeredoc,
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at line {}, column {}", .position.line, .position.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: u32,
    pub position: Position,
}

/// One token with its byte range and the line/column of its first and last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    pub start: Position,
    pub end: Position,
    /// `/** ... */` block directly preceding this token, if any.
    pub doc_comment: Option<TextRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerMode {
    InlineHtml,
    Php,
}

pub struct Lexer<'src> {
    source: &'src str,
    end: usize,
    mode: LexerMode,
    pos: usize,
    pending_doc: Option<TextRange>,
    line_index: &'src LineIndex,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, line_index: &'src LineIndex) -> Self {
        // Skip shebang line if present (e.g., #!/usr/bin/env php)
        let pos = if source.starts_with("#!") {
            memchr::memchr(b'\n', source.as_bytes())
                .map(|p| p + 1)
                .unwrap_or(source.len())
        } else {
            0
        };

        Self {
            source,
            end: source.len(),
            mode: LexerMode::InlineHtml,
            pos,
            pending_doc: None,
            line_index,
        }
    }

    /// Lexer over a slice of `source` that is already PHP code, such as the
    /// expression inside `{$...}` in a double-quoted string. Token ranges stay
    /// absolute so positions refer to the enclosing file.
    pub fn embedded(source: &'src str, range: TextRange, line_index: &'src LineIndex) -> Self {
        Self {
            source,
            end: range.end as usize,
            mode: LexerMode::Php,
            pos: range.start as usize,
            pending_doc: None,
            line_index,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..self.end]
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Token {
        let range = TextRange::new(start as u32, end as u32);
        Token {
            kind,
            range,
            start: self.line_index.position(range.start),
            end: self.line_index.end_position(range),
            doc_comment: self.pending_doc.take(),
        }
    }

    fn error(&self, kind: LexErrorKind, offset: usize) -> LexError {
        LexError {
            kind,
            offset: offset as u32,
            position: self.line_index.position(offset as u32),
        }
    }

    /// Lex everything up to and including the final `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.mode == LexerMode::Php {
            self.skip_trivia()?;
        }
        if self.pos >= self.end {
            return Ok(self.token(TokenKind::Eof, self.end, self.end));
        }

        match self.mode {
            LexerMode::InlineHtml => Ok(self.lex_inline_html()),
            LexerMode::Php => self.lex_php(),
        }
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        let bytes = self.source.as_bytes();
        loop {
            while self.pos < self.end && matches!(bytes[self.pos], b' ' | b'\t' | b'\r' | b'\n' | b'\x0C') {
                self.pos += 1;
            }
            let rest = self.rest().as_bytes();
            if rest.starts_with(b"//") || rest.starts_with(b"#") {
                self.skip_line_comment();
            } else if rest.starts_with(b"/*") {
                let start = self.pos;
                let close = memmem::find(&rest[2..], b"*/")
                    .ok_or_else(|| self.error(LexErrorKind::UnterminatedComment, start))?;
                self.pos = start + 2 + close + 2;
                let is_doc = rest.len() > 3
                    && rest[2] == b'*'
                    && matches!(rest[3], b' ' | b'\t' | b'\r' | b'\n');
                if is_doc {
                    self.pending_doc = Some(TextRange::new(start as u32, self.pos as u32));
                }
            } else {
                return Ok(());
            }
        }
    }

    /// A line comment ends at the newline or right before a `?>` close tag.
    fn skip_line_comment(&mut self) {
        let rest = self.rest().as_bytes();
        let newline = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
        let close = memmem::find(&rest[..newline], b"?>").unwrap_or(newline);
        self.pos += close.min(newline);
    }

    // =========================================================================
    // Inline HTML
    // =========================================================================

    fn lex_inline_html(&mut self) -> Token {
        let start = self.pos;
        match find_open_tag(self.rest()) {
            Some(0) => {
                self.mode = LexerMode::Php;
                let len = if self.rest().starts_with("<?=") { 3 } else { 5 };
                self.pos += len;
                self.token(TokenKind::OpenTag, start, self.pos)
            }
            Some(offset) => {
                self.pos += offset;
                self.token(TokenKind::InlineHtml, start, self.pos)
            }
            None => {
                self.pos = self.end;
                self.token(TokenKind::InlineHtml, start, self.pos)
            }
        }
    }

    // =========================================================================
    // PHP code
    // =========================================================================

    fn lex_php(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.try_lex_heredoc()? {
            return Ok(token);
        }

        let remaining = self.rest();
        let mut inner = TokenKind::lexer(remaining);

        match inner.next() {
            Some(Ok(kind)) => {
                let logos_span = inner.span();
                let start = self.pos + logos_span.start;
                let end = self.pos + logos_span.end;
                self.pos = end;

                let kind = match kind {
                    TokenKind::CloseTag => {
                        self.mode = LexerMode::InlineHtml;
                        // A single newline directly after `?>` belongs to the tag.
                        let rest = self.rest();
                        if rest.starts_with("\r\n") {
                            self.pos += 2;
                        } else if rest.starts_with('\n') {
                            self.pos += 1;
                        }
                        TokenKind::CloseTag
                    }
                    TokenKind::Identifier => {
                        resolve_keyword(&self.source[start..end]).unwrap_or(TokenKind::Identifier)
                    }
                    other => other,
                };
                Ok(self.token(kind, start, end))
            }
            Some(Err(())) => {
                let start = self.pos + inner.span().start;
                let lexeme = &self.source[start..self.end];
                let unquoted = lexeme.strip_prefix(['b', 'B']).unwrap_or(lexeme);
                let kind = if unquoted.starts_with(['\'', '"', '`']) {
                    LexErrorKind::UnterminatedString
                } else {
                    LexErrorKind::UnexpectedCharacter(lexeme.chars().next().unwrap_or('\0'))
                };
                Err(self.error(kind, start))
            }
            None => {
                self.pos = self.end;
                Ok(self.token(TokenKind::Eof, self.end, self.end))
            }
        }
    }

    /// Lex a heredoc or nowdoc starting at the current position. The token covers
    /// `<<<LABEL` through the closing label; [`heredoc_parts`] splits it again.
    fn try_lex_heredoc(&mut self) -> Result<Option<Token>, LexError> {
        let remaining = self.rest();
        let Some(parts) = heredoc_header(remaining) else {
            return Ok(None);
        };

        let start = self.pos;
        let body = &remaining[parts.body_start..];
        let Some(close) = find_closing_label(body, parts.label) else {
            return Err(self.error(LexErrorKind::UnterminatedHeredoc, start));
        };
        let end = start + parts.body_start + close + parts.label.len();
        self.pos = end;

        let kind = if parts.nowdoc {
            TokenKind::Nowdoc
        } else {
            TokenKind::Heredoc
        };
        Ok(Some(self.token(kind, start, end)))
    }
}

/// Offset of the next `<?php` / `<?=` open tag.
fn find_open_tag(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    memmem::find_iter(bytes, b"<?").find(|&at| {
        let tail = &bytes[at + 2..];
        tail.starts_with(b"=") || (tail.len() >= 3 && tail[..3].eq_ignore_ascii_case(b"php"))
    })
}

struct HeredocHeader<'a> {
    label: &'a str,
    nowdoc: bool,
    /// Offset of the first body byte, just past the newline after the label.
    body_start: usize,
}

fn heredoc_header(text: &str) -> Option<HeredocHeader<'_>> {
    let after_prefix = text.strip_prefix(['b', 'B']).unwrap_or(text);
    let prefix_len = text.len() - after_prefix.len();
    let after_arrows = after_prefix.strip_prefix("<<<")?;
    let label_text = after_arrows.trim_start_matches([' ', '\t']);
    let mut offset = prefix_len + 3 + (after_arrows.len() - label_text.len());

    let (label, nowdoc, quoted) = match label_text.as_bytes().first()? {
        quote @ (b'\'' | b'"') => {
            let inner = &label_text[1..];
            let close = memchr::memchr(*quote, inner.as_bytes())?;
            (&inner[..close], *quote == b'\'', 2)
        }
        _ => {
            let end = label_text
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_' && (c as u32) < 0x80)
                .unwrap_or(label_text.len());
            (&label_text[..end], false, 0)
        }
    };
    if label.is_empty() || label.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    offset += label.len() + quoted;

    let tail = &text[offset..];
    let newline = if tail.starts_with("\r\n") {
        2
    } else if tail.starts_with('\n') {
        1
    } else {
        return None;
    };
    Some(HeredocHeader {
        label,
        nowdoc,
        body_start: offset + newline,
    })
}

/// Offset of the closing label inside `body`: the label at the start of a line,
/// not followed by another identifier character.
fn find_closing_label(body: &str, label: &str) -> Option<usize> {
    let mut line_start = 0;
    loop {
        let line = &body[line_start..];
        if let Some(after) = line.strip_prefix(label) {
            let continues = after
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || (c as u32) >= 0x80);
            if !continues {
                return Some(line_start);
            }
        }
        line_start += memchr::memchr(b'\n', line.as_bytes())? + 1;
    }
}

/// Label and body of a heredoc/nowdoc token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeredocParts<'a> {
    pub label: &'a str,
    pub nowdoc: bool,
    /// Body byte range relative to the token start. The newline before the
    /// closing label is not part of the body.
    pub body: std::ops::Range<usize>,
}

pub fn heredoc_parts(text: &str) -> Option<HeredocParts<'_>> {
    let header = heredoc_header(text)?;
    let close = header.body_start + find_closing_label(&text[header.body_start..], header.label)?;
    let body_end = if close == header.body_start {
        close
    } else if text[..close].ends_with("\r\n") {
        close - 2
    } else {
        close - 1
    };
    Some(HeredocParts {
        label: header.label,
        nowdoc: header.nowdoc,
        body: header.body_start..body_end.max(header.body_start),
    })
}
