use depend_ast::NodeKind;
use depend_lexer::TokenKind;

/// Binding power for Pratt parsing. Returns (left_bp, right_bp).
/// A higher binding power means tighter binding.
///
/// PHP 5 / 7.0 operator precedence (from lowest to highest):
///  1. `or`                            (left)
///  2. `xor`                           (left)
///  3. `and`                           (left)
///  4. `= += -= ...` (assignment)      (right), handled separately
///  5. `?:` (ternary)                  (left), handled separately
///  6. `??`                            (right)
///  7. `||`                            (left)
///  8. `&&`                            (left)
///  9. `|`                             (left)
/// 10. `^`                             (left)
/// 11. `&`                             (left)
/// 12. `== != <> === !== <=>`          (nonassoc)
/// 13. `< <= > >=`                     (nonassoc)
/// 14. `<< >>`                         (left)
/// 15. `+ - .`                         (left)
/// 16. `* / %`                         (left)
/// 17. `!`                             prefix, see [`BANG_BP`]
/// 18. `instanceof`                    (nonassoc), see [`INSTANCEOF_BP`]
/// 19. `++ -- ~ (cast) @` and unary `+ -`, see [`UNARY_BP`]
/// 20. `**`                            (right)
pub fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Logical keyword operators (lowest precedence)
        TokenKind::Or => Some((1, 2)),
        TokenKind::Xor => Some((3, 4)),
        TokenKind::And => Some((5, 6)),

        // Null coalescing (right-associative)
        TokenKind::QuestionQuestion => Some((14, 13)),

        TokenKind::PipePipe => Some((15, 16)),
        TokenKind::AmpersandAmpersand => Some((17, 18)),

        TokenKind::Pipe => Some((19, 20)),
        TokenKind::Caret => Some((21, 22)),
        TokenKind::Ampersand => Some((23, 24)),

        // Equality (nonassoc, treated as left)
        TokenKind::EqualsEquals
        | TokenKind::BangEquals
        | TokenKind::LessGreater
        | TokenKind::EqualsEqualsEquals
        | TokenKind::BangEqualsEquals
        | TokenKind::Spaceship => Some((25, 26)),

        TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::LessThanEquals
        | TokenKind::GreaterThanEquals => Some((27, 28)),

        TokenKind::ShiftLeft | TokenKind::ShiftRight => Some((29, 30)),

        // Additive and string concatenation share a level before PHP 8
        TokenKind::Plus | TokenKind::Minus | TokenKind::Dot => Some((31, 32)),

        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((33, 34)),

        // Exponentiation (right-associative)
        TokenKind::StarStar => Some((42, 41)),

        _ => None,
    }
}

/// Operand binding power of prefix `!`.
pub const BANG_BP: u8 = 35;

/// `instanceof` binding power (left, right).
pub const INSTANCEOF_BP: (u8, u8) = (37, 38);

/// Operand binding power of unary `+ - ~ @ &`, casts and prefix `++ --`.
pub const UNARY_BP: u8 = 39;

/// Operand binding power of `clone` and `new`: tighter than every operator.
pub const CLONE_BP: u8 = 43;

/// Assignment binding power. Handled specially: the right-hand side is parsed
/// at this power and the left-hand side must be a valid assignment target.
pub const ASSIGNMENT_BP: u8 = 8;

/// Ternary binding power. `?:` is left-associative before PHP 8.
pub const TERNARY_BP: u8 = 10;

/// Node kind for a binary operator token.
pub fn operator_kind(kind: TokenKind) -> Option<NodeKind> {
    let node = match kind {
        TokenKind::Or => NodeKind::LogicalOrExpression,
        TokenKind::Xor => NodeKind::LogicalXorExpression,
        TokenKind::And => NodeKind::LogicalAndExpression,
        TokenKind::QuestionQuestion => NodeKind::CoalesceExpression,
        TokenKind::PipePipe => NodeKind::BooleanOrExpression,
        TokenKind::AmpersandAmpersand => NodeKind::BooleanAndExpression,
        TokenKind::Pipe => NodeKind::BitwiseOrExpression,
        TokenKind::Caret => NodeKind::BitwiseXorExpression,
        TokenKind::Ampersand => NodeKind::BitwiseAndExpression,
        TokenKind::EqualsEquals => NodeKind::EqualExpression,
        TokenKind::BangEquals | TokenKind::LessGreater => NodeKind::NotEqualExpression,
        TokenKind::EqualsEqualsEquals => NodeKind::IdenticalExpression,
        TokenKind::BangEqualsEquals => NodeKind::NotIdenticalExpression,
        TokenKind::Spaceship => NodeKind::SpaceshipExpression,
        TokenKind::LessThan => NodeKind::LessThanExpression,
        TokenKind::GreaterThan => NodeKind::GreaterThanExpression,
        TokenKind::LessThanEquals => NodeKind::LessThanOrEqualExpression,
        TokenKind::GreaterThanEquals => NodeKind::GreaterThanOrEqualExpression,
        TokenKind::ShiftLeft => NodeKind::ShiftLeftExpression,
        TokenKind::ShiftRight => NodeKind::ShiftRightExpression,
        TokenKind::Plus => NodeKind::AdditionExpression,
        TokenKind::Minus => NodeKind::SubtractionExpression,
        TokenKind::Dot => NodeKind::ConcatExpression,
        TokenKind::Star => NodeKind::MultiplicationExpression,
        TokenKind::Slash => NodeKind::DivisionExpression,
        TokenKind::Percent => NodeKind::ModuloExpression,
        TokenKind::StarStar => NodeKind::PowExpression,
        _ => return None,
    };
    Some(node)
}
