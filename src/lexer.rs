//! Tokenizer for DBC text.
//!
//! Turns the decoded file content into a flat [`Token`] sequence terminated by
//! an explicit [`TokenKind::EndOfFile`]. The lexer never fails: bytes it does
//! not recognize come out as [`TokenKind::Unknown`] tokens and the parser
//! decides whether the position tolerates them.

/// All token kinds produced by the lexer.
///
/// Keywords are recognized by exact spelling after reading a full identifier;
/// anything that reads like an identifier but is not in the keyword table
/// stays [`TokenKind::Identifier`]. The bare identifier `M` is deliberately
/// *not* classified as a multiplexer switch here since `M` is a legal node or
/// signal name; the parser decides from the position. `m<n>` / `m<n>M` are
/// unambiguous at lex time and come out as [`TokenKind::MuxValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer,
    Float,
    String,
    Identifier,

    // Keywords
    Version,
    Ns,
    NsDesc,
    Bs,
    Bu,
    Bo,
    Sg,
    Cm,
    BaDef,
    BaDefDef,
    Ba,
    Val,
    ValTable,
    SigGroup,
    SigValtype,
    BoTxBu,
    Ev,
    EvData,
    EnvvarData,
    Sgtype,
    SgtypeVal,
    BaDefSgtype,
    BaSgtype,
    SigTypeRef,
    SigtypeValtype,
    BaDefRel,
    BaRel,
    BaDefDefRel,
    BuSgRel,
    BuEvRel,
    BuBoRel,
    SgMulVal,

    // Symbols
    Colon,
    Semicolon,
    Comma,
    At,
    Plus,
    Minus,
    Pipe,
    LParen,
    RParen,
    LBracket,
    RBracket,

    /// Multiplex hint: `m<n>` or `m<n>M`. The numeric value and the trailing
    /// `M` flag are recovered from the token text via [`parse_mux_literal`].
    MuxValue,

    EndOfFile,

    /// Any byte no other rule claims. Non-fatal; rejection is the parser's
    /// job.
    Unknown,
}

/// One lexed token with its source position (1-based line and column).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl TokenKind {
    /// Whether this kind is one of the DBC keyword spellings. The `NS_`
    /// symbol list may name keywords, so its parser needs the distinction.
    pub fn is_keyword(self) -> bool {
        !matches!(
            self,
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::Identifier
                | TokenKind::Colon
                | TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::At
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Pipe
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::MuxValue
                | TokenKind::EndOfFile
                | TokenKind::Unknown
        )
    }
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

/// Splits a [`TokenKind::MuxValue`] token text into its numeric value and the
/// extended-switch flag (`true` for the `m<n>M` form).
///
/// Returns `None` when the text does not match `m[0-9]+M?` or the number does
/// not fit a `u64`; the lexer only emits `MuxValue` for matching text, so a
/// `None` on a real token indicates a corrupted stream.
pub fn parse_mux_literal(text: &str) -> Option<(u64, bool)> {
    let rest = text.strip_prefix('m')?;
    let (digits, extended) = match rest.strip_suffix('M') {
        Some(digits) => (digits, true),
        None => (rest, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().map(|value| (value, extended))
}

fn keyword_kind(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "VERSION" => TokenKind::Version,
        "NS_" => TokenKind::Ns,
        "NS_DESC_" => TokenKind::NsDesc,
        "BS_" => TokenKind::Bs,
        "BU_" => TokenKind::Bu,
        "BO_" => TokenKind::Bo,
        "SG_" => TokenKind::Sg,
        "CM_" => TokenKind::Cm,
        "BA_DEF_" => TokenKind::BaDef,
        "BA_DEF_DEF_" => TokenKind::BaDefDef,
        "BA_" => TokenKind::Ba,
        "VAL_" => TokenKind::Val,
        "VAL_TABLE_" => TokenKind::ValTable,
        "SIG_GROUP_" => TokenKind::SigGroup,
        "SIG_VALTYPE_" => TokenKind::SigValtype,
        "BO_TX_BU_" => TokenKind::BoTxBu,
        "EV_" => TokenKind::Ev,
        "EV_DATA_" => TokenKind::EvData,
        "ENVVAR_DATA_" => TokenKind::EnvvarData,
        "SGTYPE_" => TokenKind::Sgtype,
        "SGTYPE_VAL_" => TokenKind::SgtypeVal,
        "BA_DEF_SGTYPE_" => TokenKind::BaDefSgtype,
        "BA_SGTYPE_" => TokenKind::BaSgtype,
        "SIG_TYPE_REF_" => TokenKind::SigTypeRef,
        "SIGTYPE_VALTYPE_" => TokenKind::SigtypeValtype,
        "BA_DEF_REL_" => TokenKind::BaDefRel,
        "BA_REL_" => TokenKind::BaRel,
        "BA_DEF_DEF_REL_" => TokenKind::BaDefDefRel,
        "BU_SG_REL_" => TokenKind::BuSgRel,
        "BU_EV_REL_" => TokenKind::BuEvRel,
        "BU_BO_REL_" => TokenKind::BuBoRel,
        "SG_MUL_VAL_" => TokenKind::SgMulVal,
        _ => return None,
    };
    Some(kind)
}

/// Hand-written tokenizer over the decoded DBC text.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = match self.chars.get(self.pos) {
            Some(&ch) => ch,
            None => return '\0',
        };
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    /// Skips runs of whitespace and `//…` / `/*…*/` comments in any order.
    /// Block comments do not nest.
    fn skip_trivia(&mut self) {
        loop {
            let ch = self.peek();
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_at(1) == '/' {
                while self.peek() != '\n' && self.peek() != '\0' {
                    self.advance();
                }
            } else if ch == '/' && self.peek_at(1) == '*' {
                self.advance();
                self.advance();
                while self.peek() != '\0' {
                    if self.peek() == '*' && self.peek_at(1) == '/' {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let (start_line, start_col) = (self.line, self.column);
        let mut text = String::new();
        let mut is_float = false;

        if self.peek() == '0' && matches!(self.peek_at(1), 'x' | 'X') {
            // Hex literal: digits only, no sign, no fraction.
            text.push(self.advance());
            text.push(self.advance());
            while self.peek().is_ascii_hexdigit() {
                text.push(self.advance());
            }
        } else {
            if self.peek() == '-' {
                text.push(self.advance());
            }
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
            if self.peek() == '.' && self.peek_at(1).is_ascii_digit() {
                is_float = true;
                text.push(self.advance());
                while self.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
            }
            // Exponent only when something numeric actually follows;
            // otherwise `e` starts the next identifier.
            let exp_follows = self.peek_at(1).is_ascii_digit()
                || (matches!(self.peek_at(1), '+' | '-') && self.peek_at(2).is_ascii_digit());
            if matches!(self.peek(), 'e' | 'E') && exp_follows {
                is_float = true;
                text.push(self.advance());
                if matches!(self.peek(), '+' | '-') {
                    text.push(self.advance());
                }
                while self.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
            }
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        Token::new(kind, text, start_line, start_col)
    }

    fn read_string(&mut self) -> Token {
        let (start_line, start_col) = (self.line, self.column);
        let mut text = String::new();

        self.advance(); // opening quote

        while self.peek() != '"' && self.peek() != '\0' {
            if self.peek() == '\\' && self.peek_at(1) == '"' {
                self.advance();
                text.push(self.advance());
            } else if self.peek() == '\\' && self.peek_at(1) == '\\' {
                self.advance();
                text.push(self.advance());
            } else {
                // Unrecognized escapes keep their backslash.
                text.push(self.advance());
            }
        }

        if self.peek() == '"' {
            self.advance();
        }

        Token::new(TokenKind::String, text, start_line, start_col)
    }

    fn read_identifier(&mut self) -> Token {
        let (start_line, start_col) = (self.line, self.column);
        let mut text = String::new();

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            text.push(self.advance());
        }

        let kind = keyword_kind(&text).unwrap_or_else(|| {
            if text.len() > 1 && parse_mux_literal(&text).is_some() {
                TokenKind::MuxValue
            } else {
                TokenKind::Identifier
            }
        });

        Token::new(kind, text, start_line, start_col)
    }

    /// Consumes the whole input and returns the token sequence, always ending
    /// with one [`TokenKind::EndOfFile`] token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let ch = self.peek();
            if ch == '\0' {
                break;
            }

            let symbol = match ch {
                ':' => Some(TokenKind::Colon),
                ';' => Some(TokenKind::Semicolon),
                ',' => Some(TokenKind::Comma),
                '@' => Some(TokenKind::At),
                '+' => Some(TokenKind::Plus),
                '-' if !self.peek_at(1).is_ascii_digit() => Some(TokenKind::Minus),
                '|' => Some(TokenKind::Pipe),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                '[' => Some(TokenKind::LBracket),
                ']' => Some(TokenKind::RBracket),
                _ => None,
            };

            if let Some(kind) = symbol {
                let ch = self.advance();
                tokens.push(Token::new(kind, ch.to_string(), line, column));
            } else if ch == '"' {
                tokens.push(self.read_string());
            } else if ch.is_ascii_digit() || (ch == '-' && self.peek_at(1).is_ascii_digit()) {
                tokens.push(self.read_number());
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                tokens.push(self.read_identifier());
            } else {
                let ch = self.advance();
                tokens.push(Token::new(TokenKind::Unknown, ch.to_string(), line, column));
            }
        }

        tokens.push(Token::new(TokenKind::EndOfFile, "", self.line, self.column));
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn keywords() {
        let tokens = lex("VERSION NS_ BS_ BU_ BO_ SG_ CM_ BA_DEF_ BA_ VAL_ VAL_TABLE_ SG_MUL_VAL_");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Version,
                TokenKind::Ns,
                TokenKind::Bs,
                TokenKind::Bu,
                TokenKind::Bo,
                TokenKind::Sg,
                TokenKind::Cm,
                TokenKind::BaDef,
                TokenKind::Ba,
                TokenKind::Val,
                TokenKind::ValTable,
                TokenKind::SgMulVal,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn numbers() {
        let tokens = lex("123 -456 12.34 -56.78 1.23e4 -5.67e-8 0xFF 0x123ABC");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "123");
        assert_eq!(tokens[1].kind, TokenKind::Integer);
        assert_eq!(tokens[1].text, "-456");
        assert_eq!(tokens[2].kind, TokenKind::Float);
        assert_eq!(tokens[2].text, "12.34");
        assert_eq!(tokens[3].kind, TokenKind::Float);
        assert_eq!(tokens[3].text, "-56.78");
        assert_eq!(tokens[4].kind, TokenKind::Float);
        assert_eq!(tokens[4].text, "1.23e4");
        assert_eq!(tokens[5].kind, TokenKind::Float);
        assert_eq!(tokens[5].text, "-5.67e-8");
        assert_eq!(tokens[6].kind, TokenKind::Integer);
        assert_eq!(tokens[6].text, "0xFF");
        assert_eq!(tokens[7].kind, TokenKind::Integer);
        assert_eq!(tokens[7].text, "0x123ABC");
    }

    #[test]
    fn minus_stays_a_symbol_without_digit() {
        let tokens = lex("0 - 10");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Minus);
        assert_eq!(tokens[2].kind, TokenKind::Integer);
    }

    #[test]
    fn minus_never_joins_hex() {
        let tokens = lex("-0x10");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "-0");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "x10");
    }

    #[test]
    fn strings_and_escapes() {
        let tokens = lex(r#""hello" "world with spaces" "escaped \" quote" "" "back\\slash" "keep\nraw""#);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world with spaces");
        assert_eq!(tokens[2].text, "escaped \" quote");
        assert_eq!(tokens[3].text, "");
        assert_eq!(tokens[4].text, "back\\slash");
        // Unknown escapes pass through with the backslash preserved.
        assert_eq!(tokens[5].text, "keep\\nraw");
        assert!(tokens.iter().take(6).all(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn multiplexer_indicators() {
        let tokens = lex("M m0 m1 m99 m123M mNotMux mixed123 m");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "M");
        assert_eq!(tokens[1].kind, TokenKind::MuxValue);
        assert_eq!(tokens[2].kind, TokenKind::MuxValue);
        assert_eq!(tokens[3].kind, TokenKind::MuxValue);
        assert_eq!(tokens[4].kind, TokenKind::MuxValue);
        assert_eq!(tokens[4].text, "m123M");
        assert_eq!(tokens[5].kind, TokenKind::Identifier);
        assert_eq!(tokens[6].kind, TokenKind::Identifier);
        assert_eq!(tokens[7].kind, TokenKind::Identifier);
    }

    #[test]
    fn mux_literal_decoding() {
        assert_eq!(parse_mux_literal("m0"), Some((0, false)));
        assert_eq!(parse_mux_literal("m42"), Some((42, false)));
        assert_eq!(parse_mux_literal("m0M"), Some((0, true)));
        assert_eq!(parse_mux_literal("m7M"), Some((7, true)));
        assert_eq!(parse_mux_literal("mM"), None);
        assert_eq!(parse_mux_literal("m1x"), None);
        assert_eq!(parse_mux_literal("M"), None);
    }

    #[test]
    fn special_chars() {
        let tokens = lex(": ; , @ + - | ( ) [ ]");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::At,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Pipe,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = lex("VERSION // single line\n\"1.0\" /* block \n comment */ BU_");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Version);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "1.0");
        assert_eq!(tokens[2].kind, TokenKind::Bu);
        assert_eq!(tokens[3].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn adjacent_comments() {
        let tokens = lex("/* a *//* b */BU_");
        assert_eq!(tokens[0].kind, TokenKind::Bu);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = lex("VERSION\n  \"1.0\"\nBU_ ECU1");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (3, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (3, 5));
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let tokens = lex("VERSION\r\n\"1.0\"");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].column, 1);
    }

    #[test]
    fn unknown_bytes_become_tokens() {
        let tokens = lex("BU_ $ ECU1");
        assert_eq!(tokens[0].kind, TokenKind::Bu);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, "$");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }
}
