use logos::Logos;

fn lex_quoted(lex: &mut logos::Lexer<TokenKind>, quote: char) -> bool {
    let remainder = lex.remainder();
    let mut chars = remainder.chars();
    loop {
        match chars.next() {
            Some('\\') => {
                chars.next(); // skip escaped char
            }
            Some(c) if c == quote => {
                let consumed = remainder.len() - chars.as_str().len();
                lex.bump(consumed);
                return true;
            }
            Some(_) => {}
            None => return false,
        }
    }
}

fn lex_single_quoted_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, '\'')
}

fn lex_double_quoted_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, '"')
}

fn lex_backtick_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, '`')
}

/// Token kinds. Comments, heredocs, inline HTML and the end marker are produced
/// by the [`Lexer`](crate::Lexer) wrapper, everything else by logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Literals
    // 1e3, 1.5E-2
    #[regex(r"([0-9]+|[0-9]*\.[0-9]+|[0-9]+\.[0-9]*)[eE][+-]?[0-9]+", priority = 5)]
    FloatLiteral,

    // Float: decimal point after at least one digit (`1.` is a float)
    #[regex(r"[0-9]+\.[0-9]*", priority = 4)]
    FloatLiteralSimple,

    // Float: decimal starting with dot (.5)
    #[regex(r"\.[0-9]+", priority = 4)]
    FloatLiteralLeadingDot,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexIntLiteral,

    #[regex(r"0[bB][01]+")]
    BinIntLiteral,

    #[regex(r"0[0-7]+", priority = 3)]
    OctIntLiteral,

    #[regex(r"[0-9]+", priority = 1)]
    IntLiteral,

    // b"..." and b'...' are the same tokens
    #[regex(r"[bB]?'", lex_single_quoted_string)]
    SingleQuotedString,

    #[regex(r#"[bB]?""#, lex_double_quoted_string)]
    DoubleQuotedString,

    #[token("`", lex_backtick_string)]
    BacktickString,

    // Variables
    #[regex(r"\$[a-zA-Z_\x80-\xff][a-zA-Z0-9_\x80-\xff]*")]
    Variable,
    #[token("$")]
    Dollar,

    // Names; keywords are resolved from these in the lexer
    #[regex(r"[a-zA-Z_\x80-\xff][a-zA-Z0-9_\x80-\xff]*")]
    Identifier,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token(".")]
    Dot,

    #[token("=")]
    Equals,
    #[token("+=")]
    PlusEquals,
    #[token("-=")]
    MinusEquals,
    #[token("*=")]
    StarEquals,
    #[token("/=")]
    SlashEquals,
    #[token("%=")]
    PercentEquals,
    #[token("**=")]
    StarStarEquals,
    #[token(".=")]
    DotEquals,
    #[token("&=")]
    AmpersandEquals,
    #[token("|=")]
    PipeEquals,
    #[token("^=")]
    CaretEquals,
    #[token("<<=")]
    ShiftLeftEquals,
    #[token(">>=")]
    ShiftRightEquals,

    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    BangEquals,
    #[token("<>")]
    LessGreater,
    #[token("===")]
    EqualsEqualsEquals,
    #[token("!==")]
    BangEqualsEquals,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LessThanEquals,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<=>")]
    Spaceship,

    #[token("&&")]
    AmpersandAmpersand,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,

    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token(":")]
    Colon,

    #[token("=>")]
    FatArrow,

    // Punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,

    #[token("::")]
    DoubleColon,

    #[token("->")]
    Arrow,

    #[token("\\")]
    Backslash,

    #[token("@")]
    At,

    #[token("...")]
    Ellipsis,

    // Keywords, produced by `resolve_keyword`
    If,
    Else,
    ElseIf,
    While,
    Do,
    For,
    Foreach,
    As,
    Function,
    Return,
    Echo,
    Print,
    True,
    False,
    Null,
    And,
    Or,
    Xor,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    EndIf,
    EndWhile,
    EndFor,
    EndForeach,
    Throw,
    Try,
    Catch,
    Finally,
    Instanceof,
    Insteadof,
    Array,
    List,
    Goto,
    Declare,
    Unset,
    Global,
    EndDeclare,
    EndSwitch,
    Isset,
    Empty,
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
    Eval,
    Exit,
    Die,
    Clone,
    // Classes and members
    New,
    Class,
    Abstract,
    Final,
    Interface,
    Trait,
    Extends,
    Implements,
    Public,
    Protected,
    Private,
    Static,
    Var,
    Const,
    Namespace,
    Use,
    Yield_,
    Self_,
    Parent_,
    // __LINE__ and friends
    MagicClass,
    MagicDir,
    MagicFile,
    MagicFunction,
    MagicLine,
    MagicMethod,
    MagicNamespace,
    MagicTrait,
    HaltCompiler,

    // Tags
    #[token("<?php")]
    #[token("<?=")]
    OpenTag,

    #[token("?>")]
    CloseTag,

    // Text outside <?php ... ?>
    InlineHtml,

    // Scanned by the lexer wrapper
    Heredoc,
    Nowdoc,

    Eof,
}

impl TokenKind {
    pub fn is_assignment_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::StarStarEquals
                | TokenKind::DotEquals
                | TokenKind::AmpersandEquals
                | TokenKind::PipeEquals
                | TokenKind::CaretEquals
                | TokenKind::ShiftLeftEquals
                | TokenKind::ShiftRightEquals
        )
    }

    pub fn is_numeric_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::HexIntLiteral
                | TokenKind::BinIntLiteral
                | TokenKind::OctIntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::FloatLiteralSimple
                | TokenKind::FloatLiteralLeadingDot
        )
    }

    pub fn is_magic_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::MagicClass
                | TokenKind::MagicDir
                | TokenKind::MagicFile
                | TokenKind::MagicFunction
                | TokenKind::MagicLine
                | TokenKind::MagicMethod
                | TokenKind::MagicNamespace
                | TokenKind::MagicTrait
        )
    }

    /// Reserved words, i.e. every kind that [`resolve_keyword`] can produce.
    pub fn is_keyword(&self) -> bool {
        let index = *self as usize;
        (TokenKind::If as usize..=TokenKind::HaltCompiler as usize).contains(&index)
    }

    /// Identifiers and keywords: anything usable as a member or method name.
    pub fn is_identifier_like(&self) -> bool {
        *self == TokenKind::Identifier || self.is_keyword()
    }
}

/// Keyword kind for `text`, compared case-insensitively.
pub fn resolve_keyword(text: &str) -> Option<TokenKind> {
    match text.to_ascii_lowercase().as_str() {
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "elseif" => Some(TokenKind::ElseIf),
        "while" => Some(TokenKind::While),
        "do" => Some(TokenKind::Do),
        "for" => Some(TokenKind::For),
        "foreach" => Some(TokenKind::Foreach),
        "as" => Some(TokenKind::As),
        "function" => Some(TokenKind::Function),
        "return" => Some(TokenKind::Return),
        "echo" => Some(TokenKind::Echo),
        "print" => Some(TokenKind::Print),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "xor" => Some(TokenKind::Xor),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "switch" => Some(TokenKind::Switch),
        "case" => Some(TokenKind::Case),
        "default" => Some(TokenKind::Default),
        "endif" => Some(TokenKind::EndIf),
        "endwhile" => Some(TokenKind::EndWhile),
        "endfor" => Some(TokenKind::EndFor),
        "endforeach" => Some(TokenKind::EndForeach),
        "throw" => Some(TokenKind::Throw),
        "try" => Some(TokenKind::Try),
        "catch" => Some(TokenKind::Catch),
        "finally" => Some(TokenKind::Finally),
        "instanceof" => Some(TokenKind::Instanceof),
        "insteadof" => Some(TokenKind::Insteadof),
        "array" => Some(TokenKind::Array),
        "list" => Some(TokenKind::List),
        "goto" => Some(TokenKind::Goto),
        "declare" => Some(TokenKind::Declare),
        "unset" => Some(TokenKind::Unset),
        "global" => Some(TokenKind::Global),
        "enddeclare" => Some(TokenKind::EndDeclare),
        "endswitch" => Some(TokenKind::EndSwitch),
        "isset" => Some(TokenKind::Isset),
        "empty" => Some(TokenKind::Empty),
        "include" => Some(TokenKind::Include),
        "include_once" => Some(TokenKind::IncludeOnce),
        "require" => Some(TokenKind::Require),
        "require_once" => Some(TokenKind::RequireOnce),
        "eval" => Some(TokenKind::Eval),
        "exit" => Some(TokenKind::Exit),
        "die" => Some(TokenKind::Die),
        "clone" => Some(TokenKind::Clone),
        "new" => Some(TokenKind::New),
        "class" => Some(TokenKind::Class),
        "abstract" => Some(TokenKind::Abstract),
        "final" => Some(TokenKind::Final),
        "interface" => Some(TokenKind::Interface),
        "trait" => Some(TokenKind::Trait),
        "extends" => Some(TokenKind::Extends),
        "implements" => Some(TokenKind::Implements),
        "public" => Some(TokenKind::Public),
        "protected" => Some(TokenKind::Protected),
        "private" => Some(TokenKind::Private),
        "static" => Some(TokenKind::Static),
        "var" => Some(TokenKind::Var),
        "const" => Some(TokenKind::Const),
        "namespace" => Some(TokenKind::Namespace),
        "use" => Some(TokenKind::Use),
        "yield" => Some(TokenKind::Yield_),
        "self" => Some(TokenKind::Self_),
        "parent" => Some(TokenKind::Parent_),
        "__class__" => Some(TokenKind::MagicClass),
        "__dir__" => Some(TokenKind::MagicDir),
        "__file__" => Some(TokenKind::MagicFile),
        "__function__" => Some(TokenKind::MagicFunction),
        "__line__" => Some(TokenKind::MagicLine),
        "__method__" => Some(TokenKind::MagicMethod),
        "__namespace__" => Some(TokenKind::MagicNamespace),
        "__trait__" => Some(TokenKind::MagicTrait),
        "__halt_compiler" => Some(TokenKind::HaltCompiler),
        _ => None,
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::IntLiteral => write!(f, "integer"),
            TokenKind::HexIntLiteral => write!(f, "hex integer"),
            TokenKind::BinIntLiteral => write!(f, "binary integer"),
            TokenKind::OctIntLiteral => write!(f, "octal integer"),
            TokenKind::FloatLiteral
            | TokenKind::FloatLiteralSimple
            | TokenKind::FloatLiteralLeadingDot => write!(f, "float"),
            TokenKind::SingleQuotedString | TokenKind::DoubleQuotedString => write!(f, "string"),
            TokenKind::BacktickString => write!(f, "backtick string"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::InlineHtml => write!(f, "inline HTML"),
            TokenKind::Heredoc => write!(f, "heredoc"),
            TokenKind::Nowdoc => write!(f, "nowdoc"),
            TokenKind::Eof => write!(f, "end of file"),
            other => match other.symbol() {
                Some(symbol) => write!(f, "'{symbol}'"),
                None => write!(f, "{other:?}"),
            },
        }
    }
}

impl TokenKind {
    /// Fixed source text of punctuation, tags and keywords.
    pub fn symbol(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Dollar => "$",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::StarStar => "**",
            TokenKind::Dot => ".",
            TokenKind::Equals => "=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::StarEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::StarStarEquals => "**=",
            TokenKind::DotEquals => ".=",
            TokenKind::AmpersandEquals => "&=",
            TokenKind::PipeEquals => "|=",
            TokenKind::CaretEquals => "^=",
            TokenKind::ShiftLeftEquals => "<<=",
            TokenKind::ShiftRightEquals => ">>=",
            TokenKind::EqualsEquals => "==",
            TokenKind::BangEquals => "!=",
            TokenKind::LessGreater => "<>",
            TokenKind::EqualsEqualsEquals => "===",
            TokenKind::BangEqualsEquals => "!==",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessThanEquals => "<=",
            TokenKind::GreaterThanEquals => ">=",
            TokenKind::Spaceship => "<=>",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::Colon => ":",
            TokenKind::FatArrow => "=>",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::DoubleColon => "::",
            TokenKind::Arrow => "->",
            TokenKind::Backslash => "\\",
            TokenKind::At => "@",
            TokenKind::Ellipsis => "...",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::ElseIf => "elseif",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Foreach => "foreach",
            TokenKind::As => "as",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Echo => "echo",
            TokenKind::Print => "print",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Xor => "xor",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::EndIf => "endif",
            TokenKind::EndWhile => "endwhile",
            TokenKind::EndFor => "endfor",
            TokenKind::EndForeach => "endforeach",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Instanceof => "instanceof",
            TokenKind::Insteadof => "insteadof",
            TokenKind::Array => "array",
            TokenKind::List => "list",
            TokenKind::Goto => "goto",
            TokenKind::Declare => "declare",
            TokenKind::Unset => "unset",
            TokenKind::Global => "global",
            TokenKind::EndDeclare => "enddeclare",
            TokenKind::EndSwitch => "endswitch",
            TokenKind::Isset => "isset",
            TokenKind::Empty => "empty",
            TokenKind::Include => "include",
            TokenKind::IncludeOnce => "include_once",
            TokenKind::Require => "require",
            TokenKind::RequireOnce => "require_once",
            TokenKind::Eval => "eval",
            TokenKind::Exit => "exit",
            TokenKind::Die => "die",
            TokenKind::Clone => "clone",
            TokenKind::New => "new",
            TokenKind::Class => "class",
            TokenKind::Abstract => "abstract",
            TokenKind::Final => "final",
            TokenKind::Interface => "interface",
            TokenKind::Trait => "trait",
            TokenKind::Extends => "extends",
            TokenKind::Implements => "implements",
            TokenKind::Public => "public",
            TokenKind::Protected => "protected",
            TokenKind::Private => "private",
            TokenKind::Static => "static",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Namespace => "namespace",
            TokenKind::Use => "use",
            TokenKind::Yield_ => "yield",
            TokenKind::Self_ => "self",
            TokenKind::Parent_ => "parent",
            TokenKind::MagicClass => "__CLASS__",
            TokenKind::MagicDir => "__DIR__",
            TokenKind::MagicFile => "__FILE__",
            TokenKind::MagicFunction => "__FUNCTION__",
            TokenKind::MagicLine => "__LINE__",
            TokenKind::MagicMethod => "__METHOD__",
            TokenKind::MagicNamespace => "__NAMESPACE__",
            TokenKind::MagicTrait => "__TRAIT__",
            TokenKind::HaltCompiler => "__halt_compiler",
            TokenKind::OpenTag => "<?php",
            TokenKind::CloseTag => "?>",
            _ => return None,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keyword() {
        assert_eq!(resolve_keyword("if"), Some(TokenKind::If));
        assert_eq!(resolve_keyword("IF"), Some(TokenKind::If));
        assert_eq!(resolve_keyword("If"), Some(TokenKind::If));
        assert_eq!(resolve_keyword("function"), Some(TokenKind::Function));
        assert_eq!(resolve_keyword("myFunc"), None);
        assert_eq!(resolve_keyword("TRUE"), Some(TokenKind::True));
        assert_eq!(resolve_keyword("insteadof"), Some(TokenKind::Insteadof));
        assert_eq!(resolve_keyword("callable"), None);
    }

    #[test]
    fn test_keyword_range_matches_resolver() {
        for word in ["if", "var", "yield", "__trait__", "__halt_compiler", "insteadof"] {
            assert!(resolve_keyword(word).unwrap().is_keyword(), "{word}");
        }
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::OpenTag.is_keyword());
        assert!(!TokenKind::Ellipsis.is_keyword());
        assert!(TokenKind::Class.is_identifier_like());
    }

    #[test]
    fn test_is_assignment_op() {
        assert!(TokenKind::Equals.is_assignment_op());
        assert!(TokenKind::PlusEquals.is_assignment_op());
        assert!(TokenKind::DotEquals.is_assignment_op());
        assert!(!TokenKind::Plus.is_assignment_op());
        assert!(!TokenKind::EqualsEquals.is_assignment_op());
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::ShiftLeft.to_string(), "'<<'");
        assert_eq!(TokenKind::Insteadof.to_string(), "'insteadof'");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }

    #[test]
    fn test_logos_basic_tokens() {
        let mut lex = TokenKind::lexer("+ - * / % ** . <>");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Plus)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Minus)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Star)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Slash)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Percent)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::StarStar)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::Dot)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::LessGreater)));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_logos_integers() {
        let mut lex = TokenKind::lexer("42 0xFF 0b1010 077 0 00");
        assert_eq!(lex.next(), Some(Ok(TokenKind::IntLiteral)));
        assert_eq!(lex.slice(), "42");
        assert_eq!(lex.next(), Some(Ok(TokenKind::HexIntLiteral)));
        assert_eq!(lex.slice(), "0xFF");
        assert_eq!(lex.next(), Some(Ok(TokenKind::BinIntLiteral)));
        assert_eq!(lex.slice(), "0b1010");
        assert_eq!(lex.next(), Some(Ok(TokenKind::OctIntLiteral)));
        assert_eq!(lex.slice(), "077");
        assert_eq!(lex.next(), Some(Ok(TokenKind::IntLiteral)));
        assert_eq!(lex.slice(), "0");
        assert_eq!(lex.next(), Some(Ok(TokenKind::OctIntLiteral)));
        assert_eq!(lex.slice(), "00");
    }

    #[test]
    fn test_logos_incomplete_binary_splits() {
        let mut lex = TokenKind::lexer("0b2");
        assert_eq!(lex.next(), Some(Ok(TokenKind::IntLiteral)));
        assert_eq!(lex.slice(), "0");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Identifier)));
        assert_eq!(lex.slice(), "b2");
    }

    #[test]
    fn test_logos_floats() {
        let mut lex = TokenKind::lexer("3.14 1e10 2.5e-3 .5");
        assert_eq!(lex.next(), Some(Ok(TokenKind::FloatLiteralSimple)));
        assert_eq!(lex.slice(), "3.14");
        assert_eq!(lex.next(), Some(Ok(TokenKind::FloatLiteral)));
        assert_eq!(lex.slice(), "1e10");
        assert_eq!(lex.next(), Some(Ok(TokenKind::FloatLiteral)));
        assert_eq!(lex.slice(), "2.5e-3");
        assert_eq!(lex.next(), Some(Ok(TokenKind::FloatLiteralLeadingDot)));
        assert_eq!(lex.slice(), ".5");
    }

    #[test]
    fn test_logos_strings() {
        let mut lex = TokenKind::lexer(r#"'hello' "world" 'it\'s' "say \"hi\"""#);
        assert_eq!(lex.next(), Some(Ok(TokenKind::SingleQuotedString)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::DoubleQuotedString)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::SingleQuotedString)));
        assert_eq!(lex.next(), Some(Ok(TokenKind::DoubleQuotedString)));
    }

    #[test]
    fn test_logos_variable() {
        let mut lex = TokenKind::lexer("$x $myVar $_foo");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Variable)));
        assert_eq!(lex.slice(), "$x");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Variable)));
        assert_eq!(lex.slice(), "$myVar");
        assert_eq!(lex.next(), Some(Ok(TokenKind::Variable)));
        assert_eq!(lex.slice(), "$_foo");
    }
}
