//! Recursive-descent parser: token sequence → [`NetworkAst`].
//!
//! One token of lookahead, a result threaded through every production, first
//! error aborts the parse. The top-level dispatcher silently consumes any
//! token that does not begin a statement it knows, so dialect extensions
//! (`CAT_`, `FILTER`, the `EV_*` family, ...) pass through without failing
//! the file.
//!
//! Statement handlers are split per keyword family: `bo_` (`BO_`, `SG_`,
//! `BO_TX_BU_`), `ba_` (`BA_DEF_*`, `BA_DEF_DEF_*`, `BA_`), `val_`
//! (`VAL_TABLE_`, `VAL_`), `cm_` (`CM_`), `sig_` (`SIG_GROUP_`,
//! `SIG_VALTYPE_`, `SG_MUL_VAL_`, `SGTYPE_`).

pub(crate) mod ba_;
pub(crate) mod bo_;
pub(crate) mod cm_;
pub(crate) mod sig_;
pub(crate) mod val_;

use crate::ast::{BitTimingAst, NetworkAst, NodeAst, Position};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Parses a whole DBC document into its AST.
pub fn parse(input: &str) -> PResult<NetworkAst> {
    Parser::new(input).parse_network()
}

/// Token cursor with one-token lookahead.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(input: &str) -> Self {
        Parser {
            tokens: Lexer::new(input).tokenize(),
            pos: 0,
        }
    }

    /// The token under the cursor. The lexer guarantees a trailing
    /// `EndOfFile`, so this never runs past the buffer.
    pub(crate) fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn position(&self) -> Position {
        let tok = self.current();
        Position {
            line: tok.line,
            column: tok.column,
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            return true;
        }
        false
    }

    pub(crate) fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        let tok = self.current();
        ParseError::new(kind, message, tok.line, tok.column)
    }

    /// Structural-mismatch error for the current token; reports
    /// `UnexpectedEndOfFile` instead when the input ran out.
    pub(crate) fn unexpected(&self, what: &str) -> ParseError {
        if self.kind() == TokenKind::EndOfFile {
            self.error(
                ParseErrorKind::UnexpectedEndOfFile,
                format!("Unexpected end of file, expected {}", what),
            )
        } else {
            self.error(
                ParseErrorKind::UnexpectedToken,
                format!("Expected {} but got '{}'", what, self.current().text),
            )
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<()> {
        if self.kind() != kind {
            return Err(self.unexpected(what));
        }
        self.advance();
        Ok(())
    }

    /// Consumes the current token and returns its text.
    pub(crate) fn take_text(&mut self) -> String {
        let text = self.current().text.clone();
        self.advance();
        text
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> PResult<String> {
        if self.kind() != TokenKind::Identifier {
            return Err(self.unexpected(what));
        }
        Ok(self.take_text())
    }

    pub(crate) fn expect_string(&mut self, what: &str) -> PResult<String> {
        if self.kind() != TokenKind::String {
            return Err(self.unexpected(what));
        }
        Ok(self.take_text())
    }

    /// Consumes an `Integer` token as a `u64`. Hex (`0x…`) and decimal forms
    /// are both accepted; a negative or overflowing literal is a structural
    /// error.
    pub(crate) fn expect_u64(&mut self, what: &str) -> PResult<u64> {
        if self.kind() != TokenKind::Integer {
            return Err(self.unexpected(what));
        }
        let text = self.current().text.clone();
        let value = parse_u64_text(&text).ok_or_else(|| {
            self.error(
                ParseErrorKind::InvalidInteger,
                format!("Invalid integer '{}' for {}", text, what),
            )
        })?;
        self.advance();
        Ok(value)
    }

    /// Consumes an `Integer` token as an `i64` (hex or signed decimal).
    pub(crate) fn expect_i64(&mut self, what: &str) -> PResult<i64> {
        if self.kind() != TokenKind::Integer {
            return Err(self.unexpected(what));
        }
        let text = self.current().text.clone();
        let value = parse_i64_text(&text).ok_or_else(|| {
            self.error(
                ParseErrorKind::InvalidInteger,
                format!("Invalid integer '{}' for {}", text, what),
            )
        })?;
        self.advance();
        Ok(value)
    }

    /// Consumes a numeric value: an `Integer` or `Float` token, optionally
    /// preceded by a standalone `+`/`-` sign token.
    pub(crate) fn parse_num(&mut self, what: &str) -> PResult<f64> {
        let mut sign = 1.0;
        if self.match_kind(TokenKind::Minus) {
            sign = -1.0;
        } else {
            self.match_kind(TokenKind::Plus);
        }
        match self.kind() {
            TokenKind::Integer => {
                let text = self.current().text.clone();
                let value = parse_i64_text(&text).map(|v| v as f64).ok_or_else(|| {
                    self.error(
                        ParseErrorKind::InvalidInteger,
                        format!("Invalid integer '{}' for {}", text, what),
                    )
                })?;
                self.advance();
                Ok(sign * value)
            }
            TokenKind::Float => {
                let text = self.current().text.clone();
                let value = text.parse::<f64>().map_err(|_| {
                    self.error(
                        ParseErrorKind::InvalidFloatFormat,
                        format!("Invalid float '{}' for {}", text, what),
                    )
                })?;
                self.advance();
                Ok(sign * value)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Consumes everything up to and including the next `;` (or EOF).
    /// Used for statements the grammar recognizes but does not model.
    pub(crate) fn skip_statement(&mut self) {
        while !matches!(self.kind(), TokenKind::Semicolon | TokenKind::EndOfFile) {
            self.advance();
        }
        self.match_kind(TokenKind::Semicolon);
    }

    // --- Header sections ---

    fn parse_version(&mut self) -> PResult<String> {
        self.expect(TokenKind::Version, "VERSION")?;
        if self.kind() != TokenKind::String {
            return Err(self.error(
                ParseErrorKind::InvalidStringFormat,
                "Expected string for version",
            ));
        }
        Ok(self.take_text())
    }

    /// `NS_ :` followed by symbol names. Symbols may be plain identifiers or
    /// keyword spellings and may sit on the same line or indented on the
    /// following ones; collection stops at `BS_`, `BU_`, or EOF.
    fn parse_new_symbols(&mut self) -> PResult<Vec<String>> {
        let mut symbols = Vec::new();

        self.expect(TokenKind::Ns, "NS_")?;
        self.expect(TokenKind::Colon, "':' after NS_")?;

        loop {
            let kind = self.kind();
            if matches!(kind, TokenKind::Bs | TokenKind::Bu | TokenKind::EndOfFile) {
                break;
            }
            if kind == TokenKind::Identifier || kind.is_keyword() {
                symbols.push(self.current().text.clone());
            }
            self.advance();
        }

        Ok(symbols)
    }

    /// `BS_ : [baudrate : btr1 , btr2]`. A missing `BS_` line or an empty one
    /// both produce `None`; the zero-valued record is supplied at lowering.
    fn parse_bit_timing(&mut self) -> PResult<Option<BitTimingAst>> {
        let pos = self.position();
        if !self.match_kind(TokenKind::Bs) {
            return Ok(None);
        }
        self.expect(TokenKind::Colon, "':' after BS_")?;

        if self.kind() != TokenKind::Integer {
            return Ok(None);
        }
        let baudrate = self.expect_u64("baudrate")?;
        self.expect(TokenKind::Colon, "':' in bit timing")?;
        let btr1 = self.expect_u64("BTR1")?;
        self.expect(TokenKind::Comma, "',' in bit timing")?;
        let btr2 = self.expect_u64("BTR2")?;

        Ok(Some(BitTimingAst {
            baudrate,
            btr1,
            btr2,
            pos,
        }))
    }

    /// `BU_ [:] node*`. Canonical exports write the colon, older ones omit it.
    fn parse_nodes(&mut self) -> PResult<Vec<NodeAst>> {
        let mut nodes = Vec::new();

        self.expect(TokenKind::Bu, "BU_")?;
        self.match_kind(TokenKind::Colon);

        while self.kind() == TokenKind::Identifier {
            let pos = self.position();
            nodes.push(NodeAst {
                name: self.take_text(),
                pos,
            });
        }

        Ok(nodes)
    }

    /// Entry point: fixed header (`VERSION`, optional `NS_`, optional `BS_`,
    /// `BU_`), then statements in any order until EOF.
    pub(crate) fn parse_network(&mut self) -> PResult<NetworkAst> {
        let mut net = NetworkAst {
            version: self.parse_version()?,
            ..NetworkAst::default()
        };

        if self.kind() == TokenKind::Ns {
            net.new_symbols = self.parse_new_symbols()?;
        }

        net.bit_timing = self.parse_bit_timing()?;
        net.nodes = self.parse_nodes()?;

        while self.kind() != TokenKind::EndOfFile {
            match self.kind() {
                TokenKind::ValTable => {
                    let vt = self.parse_value_table()?;
                    net.value_tables.push(vt);
                }
                TokenKind::Bo => {
                    let msg = self.parse_message()?;
                    net.messages.push(msg);
                }
                TokenKind::BoTxBu => {
                    let mt = self.parse_message_transmitter()?;
                    net.message_transmitters.push(mt);
                }
                TokenKind::Cm => {
                    let cm = self.parse_comment()?;
                    net.comments.push(cm);
                }
                TokenKind::BaDef | TokenKind::BaDefRel => {
                    if let Some(def) = self.parse_attribute_definition()? {
                        net.attribute_definitions.push(def);
                    }
                }
                TokenKind::BaDefDef | TokenKind::BaDefDefRel => {
                    let def = self.parse_attribute_default()?;
                    net.attribute_defaults.push(def);
                }
                TokenKind::Ba => {
                    let av = self.parse_attribute_value()?;
                    net.attribute_values.push(av);
                }
                TokenKind::BaRel => {
                    // Relation attribute values have no place in the model;
                    // consume the whole statement.
                    self.advance();
                    self.skip_statement();
                }
                TokenKind::Val => {
                    let vd = self.parse_value_description()?;
                    net.value_descriptions.push(vd);
                }
                TokenKind::SigGroup => {
                    let sg = self.parse_signal_group()?;
                    net.signal_groups.push(sg);
                }
                TokenKind::SigValtype => {
                    let sevt = self.parse_signal_extended_value_type()?;
                    net.signal_extended_value_types.push(sevt);
                }
                TokenKind::SgMulVal => {
                    let smv = self.parse_signal_multiplexer_value()?;
                    net.signal_multiplexer_values.push(smv);
                }
                TokenKind::Sgtype => {
                    let st = self.parse_signal_type()?;
                    net.signal_types.push(st);
                }
                // Forward compatibility: anything else is not an error.
                _ => self.advance(),
            }
        }

        Ok(net)
    }
}

pub(crate) fn parse_u64_text(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<u64>().ok()
    }
}

pub(crate) fn parse_i64_text(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<i64>().ok()
    }
}
