pub mod lexer;
pub mod stream;
pub mod token;

pub use lexer::{heredoc_parts, HeredocParts, LexError, LexErrorKind, Lexer, Token};
pub use stream::TokenStream;
pub use token::{resolve_keyword, TokenKind};
