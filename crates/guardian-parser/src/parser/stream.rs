//! Token stream wrapper for the hand-written parser.

use guardian_ast::foundation::Span;
use guardian_lexer::Token;
use std::ops::Range;

/// Token stream with lookahead and position tracking.
///
/// Provides methods for consuming tokens, lookahead, and span tracking.
/// Each token is paired with its byte span from the source, enabling
/// accurate error message locations.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream from tokens with their byte spans.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token kind.
    ///
    /// Compares discriminants only, so data-carrying tokens match any payload.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume the current token if it matches, returning whether it did.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token and advance past it.
    ///
    /// Returns an error if the token doesn't match.
    pub fn expect(&mut self, expected: Token) -> Result<Span, super::ParseError> {
        if self.check(&expected) {
            let start = self.pos;
            self.advance();
            Ok(self.span_from(start))
        } else {
            Err(super::ParseError::expected_token(
                expected,
                self.peek().cloned(),
                self.current_span(),
            ))
        }
    }

    /// Skip any run of newline tokens.
    ///
    /// Guardian is newline-sensitive; productions call this wherever the
    /// grammar permits line breaks (after commas, inside braces).
    pub fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::NewLine)) {
            self.advance();
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Create a span from a starting position to the current position.
    ///
    /// Uses actual byte offsets from the source file.
    pub fn span_from(&self, start: usize) -> Span {
        if self.tokens.is_empty() {
            return Span::zero(self.file_id);
        }
        let start = start.min(self.tokens.len() - 1);
        let start_byte = self.tokens[start].1.start;

        let end_byte = if self.pos > 0 && self.pos <= self.tokens.len() {
            // End of the last consumed token
            self.tokens[self.pos - 1].1.end
        } else {
            start_byte
        };

        Span::new(self.file_id, start_byte as u32, end_byte as u32, 0)
    }

    /// Get a span for the current token.
    ///
    /// At EOF this is a zero-length span at the end of the last token.
    pub fn current_span(&self) -> Span {
        if let Some((_, span)) = self.tokens.get(self.pos) {
            Span::new(self.file_id, span.start as u32, span.end as u32, 0)
        } else if let Some((_, span)) = self.tokens.last() {
            Span::new(self.file_id, span.end as u32, span.end as u32, 0)
        } else {
            Span::zero(self.file_id)
        }
    }

    /// Synchronize to the next declaration keyword for error recovery.
    ///
    /// Skips tokens until we find a declaration keyword or EOF.
    pub fn synchronize(&mut self) {
        while !self.at_end() {
            match self.peek() {
                Some(Token::Class)
                | Some(Token::Contract)
                | Some(Token::Interface)
                | Some(Token::Enum)
                | Some(Token::Event)
                | Some(Token::Func)
                | Some(Token::Type)
                | Some(Token::Constructor)
                | Some(Token::Destructor)
                | Some(Token::Fallback) => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Get the file_id for this token stream.
    pub fn file_id(&self) -> u16 {
        self.file_id
    }
}
