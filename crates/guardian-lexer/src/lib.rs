// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the Guardian language.
//!
//! This crate tokenizes Guardian source code using logos.
//!
//! # Design
//!
//! - `Token` — all Guardian token types (keywords, operators, literals, identifiers)
//! - Newlines are tokens (`Token::NewLine`), not skipped: Guardian statements are
//!   newline-terminated and the parser decides where line breaks matter
//! - Comments and horizontal whitespace are stripped during lexing
//! - Token strings defined once in `TOKEN_STRINGS` table (single source of truth
//!   for Display)
//!
//! # Examples
//!
//! ```
//! # use guardian_lexer::*;
//! let (tokens, errors) = tokenize("class Light inherits LightSource {}");
//! assert!(errors.is_empty());
//! assert_eq!(tokens[0].0, Token::Class);
//! ```

use logos::Logos;
use std::ops::Range;
use std::rc::Rc;

/// Guardian token.
///
/// Represents all lexical elements of the language: declaration and statement
/// keywords, operators, delimiters, and literals.
///
/// # Layout
///
/// Uses `#[repr(u16)]` to guarantee discriminant values are stable and
/// can be safely used to index into `TOKEN_STRINGS`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[repr(u16)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace (newlines are tokens)
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"/\*([^*]|\*[^/])*\*/")] // Skip /* */ comments
pub enum Token {
    // === Declaration keywords ===
    /// Keyword `class`
    #[token("class")]
    Class,
    /// Keyword `contract`
    #[token("contract")]
    Contract,
    /// Keyword `interface`
    #[token("interface")]
    Interface,
    /// Keyword `enum`
    #[token("enum")]
    Enum,
    /// Keyword `event`
    #[token("event")]
    Event,
    /// Keyword `func`
    #[token("func")]
    Func,
    /// Keyword `type`
    #[token("type")]
    Type,
    /// Keyword `map`
    #[token("map")]
    Map,

    // Lifecycle keywords
    /// Keyword `constructor`
    #[token("constructor")]
    Constructor,
    /// Keyword `destructor`
    #[token("destructor")]
    Destructor,
    /// Keyword `fallback`
    #[token("fallback")]
    Fallback,

    // Clause keywords
    /// Keyword `inherits` (super-type clause)
    #[token("inherits")]
    Inherits,
    /// Keyword `is` (interface clause / cast operator)
    #[token("is")]
    Is,
    /// Keyword `as` (cast operator)
    #[token("as")]
    As,

    // Statement keywords
    /// Keyword `if`
    #[token("if")]
    If,
    /// Keyword `else if` (a single token; the grammar has no dangling-else)
    #[token("else if")]
    ElseIf,
    /// Keyword `else`
    #[token("else")]
    Else,
    /// Keyword `for`
    #[token("for")]
    For,
    /// Keyword `in`
    #[token("in")]
    In,
    /// Keyword `switch`
    #[token("switch")]
    Switch,
    /// Keyword `exclusive` (switch modifier)
    #[token("exclusive")]
    Exclusive,
    /// Keyword `case`
    #[token("case")]
    Case,
    /// Keyword `default`
    #[token("default")]
    Default,
    /// Keyword `return`
    #[token("return")]
    Return,
    /// Keyword `break`
    #[token("break")]
    Break,
    /// Keyword `continue`
    #[token("continue")]
    Continue,
    /// Keyword `import`
    #[token("import")]
    Import,
    /// Keyword `package`
    #[token("package")]
    Package,

    // Boolean literals
    /// Boolean literal `true`
    #[token("true")]
    True,
    /// Boolean literal `false`
    #[token("false")]
    False,

    // === Operators ===

    // Arithmetic
    /// Operator `+`
    #[token("+")]
    Add,
    /// Operator `-`
    #[token("-")]
    Sub,
    /// Operator `*`
    #[token("*")]
    Mul,
    /// Operator `/`
    #[token("/")]
    Div,
    /// Operator `%`
    #[token("%")]
    Mod,
    /// Operator `**`
    #[token("**")]
    Exp,

    // Bitwise
    /// Operator `&`
    #[token("&")]
    BitAnd,
    /// Operator `|`
    #[token("|")]
    BitOr,
    /// Operator `^`
    #[token("^")]
    Xor,
    /// Operator `<<`
    #[token("<<")]
    Shl,
    /// Operator `>>`
    #[token(">>")]
    Shr,

    // Comparison
    /// Operator `==`
    #[token("==")]
    Eql,
    /// Operator `!=`
    #[token("!=")]
    Neq,
    /// Operator `<`
    #[token("<")]
    Lss,
    /// Operator `<=`
    #[token("<=")]
    Leq,
    /// Operator `>`
    #[token(">")]
    Gtr,
    /// Operator `>=`
    #[token(">=")]
    Geq,

    // Logical
    /// Operator `&&`
    #[token("&&")]
    LogicalAnd,
    /// Operator `||`
    #[token("||")]
    LogicalOr,
    /// Operator `!`
    #[token("!")]
    Not,

    // Assignment
    /// Operator `=`
    #[token("=")]
    Assign,
    /// Operator `:=` (declare-and-assign)
    #[token(":=")]
    Define,
    /// Operator `+=`
    #[token("+=")]
    AddAssign,
    /// Operator `-=`
    #[token("-=")]
    SubAssign,
    /// Operator `*=`
    #[token("*=")]
    MulAssign,
    /// Operator `/=`
    #[token("/=")]
    DivAssign,
    /// Operator `%=`
    #[token("%=")]
    ModAssign,
    /// Operator `**=`
    #[token("**=")]
    ExpAssign,
    /// Operator `&=`
    #[token("&=")]
    AndAssign,
    /// Operator `|=`
    #[token("|=")]
    OrAssign,
    /// Operator `^=`
    #[token("^=")]
    XorAssign,
    /// Operator `<<=`
    #[token("<<=")]
    ShlAssign,
    /// Operator `>>=`
    #[token(">>=")]
    ShrAssign,
    /// Operator `++`
    #[token("++")]
    Increment,
    /// Operator `--`
    #[token("--")]
    Decrement,

    // Other
    /// Operator `.`
    #[token(".")]
    Dot,
    /// Operator `...` (variadic marker)
    #[token("...")]
    Ellipsis,
    /// Operator `,`
    #[token(",")]
    Comma,
    /// Operator `:`
    #[token(":")]
    Colon,
    /// Operator `;`
    #[token(";")]
    Semicolon,

    // === Delimiters ===
    /// Delimiter `(`
    #[token("(")]
    OpenBracket,
    /// Delimiter `)`
    #[token(")")]
    CloseBracket,
    /// Delimiter `{`
    #[token("{")]
    OpenBrace,
    /// Delimiter `}`
    #[token("}")]
    CloseBrace,
    /// Delimiter `[`
    #[token("[")]
    OpenSquare,
    /// Delimiter `]`
    #[token("]")]
    CloseSquare,

    /// Line break (statement terminator)
    #[token("\n")]
    NewLine,

    // === Literals ===
    /// Integer literal (e.g., 42, 0, 1000)
    ///
    /// LIMITATION: overflow of i64 produces a generic lexical error for the
    /// token rather than a dedicated overflow message (logos drops the parse
    /// failure). The regex guarantees the format, so only overflow can fail.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    /// Float literal (e.g., 3.14, 0.5)
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// String literal (e.g., "hello")
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len()-1];
        unescape(content).map(|s| Rc::from(s.as_str()))
    })]
    String(Rc<str>),

    /// Character literal (e.g., 'a')
    #[regex(r"'([^'\\\n]|\\.)'", |lex| {
        let s = lex.slice();
        let content = &s[1..s.len()-1];
        unescape(content).and_then(|s| {
            let mut chars = s.chars();
            let c = chars.next()?;
            chars.next().is_none().then_some(c)
        })
    })]
    Character(char),

    /// Identifier (e.g., balance, LightSource, uint8)
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Identifier(Rc<str>),
}

/// Unescape string/character literal content.
fn unescape(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(_) => return None, // Unsupported escape sequence
                None => return None,    // Trailing backslash
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// Token string lookup table.
///
/// Maps discriminant indices to their string representation.
/// This is the single source of truth for token display strings,
/// indexed by the enum discriminant order.
///
/// NOTE: The `#[token("...")]` attributes above must match these strings.
/// The duplication is unavoidable because logos requires literal strings,
/// but this table consolidates Display logic to avoid a large match.
const TOKEN_STRINGS: &[&str] = &[
    "class",
    "contract",
    "interface",
    "enum",
    "event",
    "func",
    "type",
    "map", // declarations
    "constructor",
    "destructor",
    "fallback", // lifecycles
    "inherits",
    "is",
    "as", // clauses
    "if",
    "else if",
    "else",
    "for",
    "in",
    "switch",
    "exclusive",
    "case",
    "default",
    "return",
    "break",
    "continue",
    "import",
    "package", // statements
    "true",
    "false", // booleans
    "+",
    "-",
    "*",
    "/",
    "%",
    "**", // arithmetic
    "&",
    "|",
    "^",
    "<<",
    ">>", // bitwise
    "==",
    "!=",
    "<",
    "<=",
    ">",
    ">=", // comparison
    "&&",
    "||",
    "!", // logical
    "=",
    ":=",
    "+=",
    "-=",
    "*=",
    "/=",
    "%=",
    "**=",
    "&=",
    "|=",
    "^=",
    "<<=",
    ">>=",
    "++",
    "--", // assignment
    ".",
    "...",
    ",",
    ":",
    ";", // other
    "(",
    ")",
    "{",
    "}",
    "[",
    "]",    // delimiters
    "\\n", // newline
];

impl Token {
    /// Get the index into TOKEN_STRINGS for simple tokens.
    ///
    /// # Returns
    ///
    /// Index for simple tokens (keywords, operators, delimiters).
    ///
    /// # Safety
    ///
    /// Safe due to `#[repr(u16)]` on Token enum ensuring stable discriminants.
    fn token_string_index(&self) -> usize {
        // Safe: Token has #[repr(u16)] so discriminant values are stable
        let discriminant = unsafe { *(self as *const Token as *const u16) };
        discriminant as usize
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Literals with data (not in TOKEN_STRINGS table)
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Character(c) => write!(f, "'{}'", c),
            Token::Identifier(id) => write!(f, "{}", id),

            // Simple tokens (keywords, operators, delimiters)
            _ => {
                let idx = self.token_string_index();
                let s = TOKEN_STRINGS
                    .get(idx)
                    .expect("BUG: token discriminant out of bounds for TOKEN_STRINGS");
                write!(f, "{}", s)
            }
        }
    }
}

/// Lexical error: a byte range the lexer could not tokenize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte range of the unrecognised input
    pub span: Range<usize>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unrecognised token at bytes {}..{}",
            self.span.start, self.span.end
        )
    }
}

impl std::error::Error for LexError {}

/// Tokenize Guardian source text.
///
/// # Parameters
///
/// * `source` - Source text to tokenize
///
/// # Returns
///
/// All recognised tokens paired with their byte spans, plus the list of
/// lexical errors. Unrecognised input produces an error and lexing continues
/// at the next byte, so a single pass reports every lexical problem.
pub fn tokenize(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => errors.push(LexError { span }),
        }
    }
    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: lex source and panic on any error.
    fn lex(source: &str) -> Vec<Token> {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "lexing failed: {:?}", errors);
        tokens.into_iter().map(|(tok, _)| tok).collect()
    }

    /// Test helper: create an identifier token.
    fn ident(s: &str) -> Token {
        Token::Identifier(Rc::from(s))
    }

    #[test]
    fn test_declaration_keywords() {
        let tokens = lex("class contract interface enum event func type");
        assert_eq!(
            tokens,
            vec![
                Token::Class,
                Token::Contract,
                Token::Interface,
                Token::Enum,
                Token::Event,
                Token::Func,
                Token::Type,
            ]
        );
    }

    #[test]
    fn test_lifecycle_keywords() {
        let tokens = lex("constructor destructor fallback");
        assert_eq!(
            tokens,
            vec![Token::Constructor, Token::Destructor, Token::Fallback]
        );
    }

    #[test]
    fn test_identifiers() {
        let tokens = lex("balance LightSource my_var uint8");
        assert_eq!(
            tokens,
            vec![
                ident("balance"),
                ident("LightSource"),
                ident("my_var"),
                ident("uint8"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 0 3.14");
        assert_eq!(
            tokens,
            vec![Token::Integer(42), Token::Integer(0), Token::Float(3.14)]
        );
    }

    #[test]
    fn test_strings_and_characters() {
        let tokens = lex(r#""hello" 'a' "with\nescape""#);
        assert_eq!(
            tokens,
            vec![
                Token::String(Rc::from("hello")),
                Token::Character('a'),
                Token::String(Rc::from("with\nescape")),
            ]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = lex("+ - * / % ** == != < <= > >= && || !");
        assert_eq!(
            tokens,
            vec![
                Token::Add,
                Token::Sub,
                Token::Mul,
                Token::Div,
                Token::Mod,
                Token::Exp,
                Token::Eql,
                Token::Neq,
                Token::Lss,
                Token::Leq,
                Token::Gtr,
                Token::Geq,
                Token::LogicalAnd,
                Token::LogicalOr,
                Token::Not,
            ]
        );
    }

    #[test]
    fn test_assignment_operators() {
        let tokens = lex("= := += -= <<= ++ --");
        assert_eq!(
            tokens,
            vec![
                Token::Assign,
                Token::Define,
                Token::AddAssign,
                Token::SubAssign,
                Token::ShlAssign,
                Token::Increment,
                Token::Decrement,
            ]
        );
    }

    #[test]
    fn test_newlines_are_tokens() {
        let tokens = lex("a = 1\nb = 2");
        assert_eq!(
            tokens,
            vec![
                ident("a"),
                Token::Assign,
                Token::Integer(1),
                Token::NewLine,
                ident("b"),
                Token::Assign,
                Token::Integer(2),
            ]
        );
    }

    #[test]
    fn test_else_if_single_token() {
        let tokens = lex("if x {} else if y {} else {}");
        assert_eq!(
            tokens,
            vec![
                Token::If,
                ident("x"),
                Token::OpenBrace,
                Token::CloseBrace,
                Token::ElseIf,
                ident("y"),
                Token::OpenBrace,
                Token::CloseBrace,
                Token::Else,
                Token::OpenBrace,
                Token::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_class_declaration() {
        let tokens = lex("class Light inherits LightSource is Visible {}");
        assert_eq!(
            tokens,
            vec![
                Token::Class,
                ident("Light"),
                Token::Inherits,
                ident("LightSource"),
                Token::Is,
                ident("Visible"),
                Token::OpenBrace,
                Token::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_map_and_array_types() {
        let tokens = lex("map[string]int [3]uint8 ...int");
        assert_eq!(
            tokens,
            vec![
                Token::Map,
                Token::OpenSquare,
                ident("string"),
                Token::CloseSquare,
                ident("int"),
                Token::OpenSquare,
                Token::Integer(3),
                Token::CloseSquare,
                ident("uint8"),
                Token::Ellipsis,
                ident("int"),
            ]
        );
    }

    #[test]
    fn test_comments_stripped() {
        let tokens = lex("a // line comment\n/* block\ncomment */ b");
        assert_eq!(tokens, vec![ident("a"), Token::NewLine, ident("b")]);
    }

    #[test]
    fn test_define_vs_colon() {
        let tokens = lex("a := b : c");
        assert_eq!(
            tokens,
            vec![ident("a"), Token::Define, ident("b"), Token::Colon, ident("c")]
        );
    }

    #[test]
    fn test_lexer_error_detection() {
        let (tokens, errors) = tokenize("class @ Light");
        assert_eq!(tokens.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 6..7);
    }

    /// Verify that TOKEN_STRINGS matches token definitions.
    #[test]
    fn test_token_string_consistency() {
        assert_eq!(Token::Class.to_string(), "class");
        assert_eq!(Token::Contract.to_string(), "contract");
        assert_eq!(Token::Inherits.to_string(), "inherits");
        assert_eq!(Token::ElseIf.to_string(), "else if");
        assert_eq!(Token::Add.to_string(), "+");
        assert_eq!(Token::Exp.to_string(), "**");
        assert_eq!(Token::Define.to_string(), ":=");
        assert_eq!(Token::ShrAssign.to_string(), ">>=");
        assert_eq!(Token::Ellipsis.to_string(), "...");
        assert_eq!(Token::CloseSquare.to_string(), "]");
    }
}
