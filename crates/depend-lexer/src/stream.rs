use std::sync::Arc;

use depend_ast::{LineIndex, Position, TextRange};

use crate::lexer::{LexError, Lexer, Token};
use crate::token::TokenKind;

/// Eagerly lexed token sequence with a cursor, always terminated by `Eof`.
///
/// Tokens after `__halt_compiler();` are never produced.
#[derive(Debug, Clone)]
pub struct TokenStream<'src> {
    source: &'src str,
    line_index: Arc<LineIndex>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Result<Self, LexError> {
        let line_index = Arc::new(LineIndex::new(source));
        let mut lexer = Lexer::new(source, &line_index);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
            if halted(&tokens) {
                let end = source.len() as u32;
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    range: TextRange::new(end, end),
                    start: line_index.position(end),
                    end: line_index.position(end),
                    doc_comment: None,
                });
                break;
            }
        }
        Ok(Self {
            source,
            line_index,
            tokens,
            pos: 0,
        })
    }

    /// A fresh stream over `range` of the same source, lexed as PHP code.
    pub fn embedded(&self, range: TextRange) -> Result<TokenStream<'src>, LexError> {
        let tokens = Lexer::embedded(self.source, range, &self.line_index).tokenize()?;
        Ok(Self {
            source: self.source,
            line_index: Arc::clone(&self.line_index),
            tokens,
            pos: 0,
        })
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Token `n` positions ahead of the cursor, saturating at `Eof`.
    pub fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Consume the current token. The cursor never moves past `Eof`.
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i])
    }

    pub fn mark(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, mark: usize) {
        self.pos = mark.min(self.tokens.len() - 1);
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn text(&self, token: &Token) -> &'src str {
        self.slice(token.range)
    }

    pub fn slice(&self, range: TextRange) -> &'src str {
        &self.source[range.start as usize..range.end as usize]
    }

    pub fn position(&self, offset: u32) -> Position {
        self.line_index.position(offset)
    }
}

/// True once the tail of `tokens` reads `__halt_compiler ( ) ;` (or `?>` instead of `;`).
fn halted(tokens: &[Token]) -> bool {
    let kinds: Vec<TokenKind> = tokens.iter().rev().take(4).map(|t| t.kind).collect();
    matches!(
        kinds.as_slice(),
        [TokenKind::Semicolon | TokenKind::CloseTag, TokenKind::RightParen, TokenKind::LeftParen, TokenKind::HaltCompiler]
    )
}
