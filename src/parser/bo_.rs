//! `BO_` (message), nested `SG_` (signal), and `BO_TX_BU_` (message
//! transmitters).

use crate::ast::{MessageAst, MessageTransmitterAst, MuxMarker, SignalAst};
use crate::error::ParseErrorKind;
use crate::lexer::{parse_mux_literal, TokenKind};
use crate::parser::{PResult, Parser};

impl Parser {
    /// `BO_ <id> <name>: <size> [<transmitter>]` followed by its `SG_` lines.
    pub(crate) fn parse_message(&mut self) -> PResult<MessageAst> {
        let pos = self.position();
        self.expect(TokenKind::Bo, "BO_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
        }
        let id = self.expect_u64("message ID")?;
        let name = self.expect_identifier("message name")?;
        self.expect(TokenKind::Colon, "':' after message name")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(
                ParseErrorKind::InvalidMessageFormat,
                "Expected message size (DLC)",
            ));
        }
        let size = self.expect_u64("message size")?;

        // The transmitter may be absent on orphan messages.
        let transmitter = if self.kind() == TokenKind::Identifier {
            self.take_text()
        } else {
            String::new()
        };

        let mut signals = Vec::new();
        while self.kind() == TokenKind::Sg {
            signals.push(self.parse_signal()?);
        }

        Ok(MessageAst {
            id,
            name,
            size,
            transmitter,
            signals,
            pos,
        })
    }

    /// `SG_ <name> [M|m<n>|m<n>M] : <start>|<size>@<order><sign>
    /// (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers>`
    pub(crate) fn parse_signal(&mut self) -> PResult<SignalAst> {
        let pos = self.position();
        self.expect(TokenKind::Sg, "SG_")?;
        let name = self.expect_identifier("signal name")?;

        // Multiplex indicator. The bare `M` is an ordinary identifier token;
        // only this position gives it meaning.
        let mux = match self.kind() {
            TokenKind::Identifier if self.current().text == "M" => {
                self.advance();
                MuxMarker::Switch
            }
            TokenKind::MuxValue => {
                let text = self.take_text();
                let (value, extended) = parse_mux_literal(&text).ok_or_else(|| {
                    self.error(
                        ParseErrorKind::InvalidMultiplexer,
                        format!("Invalid multiplexer indicator '{}'", text),
                    )
                })?;
                MuxMarker::Value { value, extended }
            }
            _ => MuxMarker::None,
        };

        self.expect(TokenKind::Colon, "':' after signal name")?;

        let start_bit = self.expect_u64("start bit")?;
        self.expect(TokenKind::Pipe, "'|' in signal layout")?;
        let bit_size = self.expect_u64("signal size")?;
        self.expect(TokenKind::At, "'@' in signal layout")?;

        let byte_order = match self.kind() {
            TokenKind::Integer if !self.current().text.is_empty() => {
                let text = self.take_text();
                text.chars().next().unwrap_or('1')
            }
            _ => {
                return Err(self.error(
                    ParseErrorKind::InvalidSignalFormat,
                    "Expected byte order (0 or 1)",
                ));
            }
        };

        let sign = if self.match_kind(TokenKind::Plus) {
            '+'
        } else if self.match_kind(TokenKind::Minus) {
            '-'
        } else {
            return Err(self.error(
                ParseErrorKind::InvalidSignalFormat,
                "Expected + or - for signal value type",
            ));
        };

        self.expect(TokenKind::LParen, "'(' before factor")?;
        let factor = self.parse_num("factor")?;
        self.expect(TokenKind::Comma, "',' between factor and offset")?;
        let offset = self.parse_num("offset")?;
        self.expect(TokenKind::RParen, "')' after offset")?;

        self.expect(TokenKind::LBracket, "'[' before minimum")?;
        let minimum = self.parse_num("minimum")?;
        self.expect(TokenKind::Pipe, "'|' between minimum and maximum")?;
        let maximum = self.parse_num("maximum")?;
        self.expect(TokenKind::RBracket, "']' after maximum")?;

        let unit = self.expect_string("signal unit")?;

        // Receivers: identifiers, optionally comma-separated. The following
        // statement always starts with a keyword token, which ends the loop.
        let mut receivers = Vec::new();
        while self.kind() == TokenKind::Identifier {
            receivers.push(self.take_text());
            self.match_kind(TokenKind::Comma);
        }

        Ok(SignalAst {
            name,
            mux,
            start_bit,
            bit_size,
            byte_order,
            sign,
            factor,
            offset,
            minimum,
            maximum,
            unit,
            receivers,
            pos,
        })
    }

    /// `BO_TX_BU_ <message id> : <node> {, <node>} ;`
    pub(crate) fn parse_message_transmitter(&mut self) -> PResult<MessageTransmitterAst> {
        let pos = self.position();
        self.expect(TokenKind::BoTxBu, "BO_TX_BU_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
        }
        let message_id = self.expect_u64("message ID")?;
        self.expect(TokenKind::Colon, "':' after message ID")?;

        let mut transmitters = Vec::new();
        while self.kind() == TokenKind::Identifier {
            transmitters.push(self.take_text());
            self.match_kind(TokenKind::Comma);
        }

        self.expect(TokenKind::Semicolon, "';' after BO_TX_BU_")?;

        Ok(MessageTransmitterAst {
            message_id,
            transmitters,
            pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const HEADER: &str = "VERSION \"\"\nNS_ :\nBS_:\nBU_ ECU1 ECU2\n";

    #[test]
    fn message_without_signals() {
        let net = parse(&format!("{HEADER}BO_ 123 TestMessage: 8 ECU1\n")).unwrap();
        assert_eq!(net.messages.len(), 1);
        let msg = &net.messages[0];
        assert_eq!(msg.id, 123);
        assert_eq!(msg.name, "TestMessage");
        assert_eq!(msg.size, 8);
        assert_eq!(msg.transmitter, "ECU1");
        assert!(msg.signals.is_empty());
    }

    #[test]
    fn signal_fields() {
        let net = parse(&format!(
            "{HEADER}BO_ 100 TestMsg: 8 ECU1\n SG_ TestSignal : 0|16@1+ (1,0) [0|65535] \"units\" ECU2\n"
        ))
        .unwrap();
        let sig = &net.messages[0].signals[0];
        assert_eq!(sig.name, "TestSignal");
        assert_eq!(sig.start_bit, 0);
        assert_eq!(sig.bit_size, 16);
        assert_eq!(sig.byte_order, '1');
        assert_eq!(sig.sign, '+');
        assert_eq!(sig.factor, 1.0);
        assert_eq!(sig.offset, 0.0);
        assert_eq!(sig.minimum, 0.0);
        assert_eq!(sig.maximum, 65535.0);
        assert_eq!(sig.unit, "units");
        assert_eq!(sig.receivers, vec!["ECU2"]);
        assert_eq!(sig.mux, MuxMarker::None);
    }

    #[test]
    fn signal_sign_and_order_variants() {
        let net = parse(&format!(
            concat!(
                "{}BO_ 100 TestMsg: 8 ECU1\n",
                " SG_ Intel_Unsigned : 0|16@1+ (1,0) [0|65535] \"\"\n",
                " SG_ Intel_Signed : 16|16@1- (1,0) [-32768|32767] \"\"\n",
                " SG_ Motorola_Unsigned : 32|16@0+ (1,0) [0|65535] \"\"\n",
                " SG_ Motorola_Signed : 48|16@0- (1,0) [-32768|32767] \"\"\n",
            ),
            HEADER
        ))
        .unwrap();
        let signals = &net.messages[0].signals;
        assert_eq!((signals[0].byte_order, signals[0].sign), ('1', '+'));
        assert_eq!((signals[1].byte_order, signals[1].sign), ('1', '-'));
        assert_eq!((signals[2].byte_order, signals[2].sign), ('0', '+'));
        assert_eq!((signals[3].byte_order, signals[3].sign), ('0', '-'));
        assert_eq!(signals[1].minimum, -32768.0);
        assert_eq!(signals[1].maximum, 32767.0);
    }

    #[test]
    fn signal_with_scientific_scaling() {
        let net = parse(&format!(
            "{HEADER}BO_ 100 TestMsg: 8 ECU1\n SG_ S : 0|16@1+ (1.5e-3,-4.0) [-1.2|3.4e2] \"V\" Vector__XXX\n"
        ))
        .unwrap();
        let sig = &net.messages[0].signals[0];
        assert_eq!(sig.factor, 1.5e-3);
        assert_eq!(sig.offset, -4.0);
        assert_eq!(sig.minimum, -1.2);
        assert_eq!(sig.maximum, 3.4e2);
        assert_eq!(sig.receivers, vec!["Vector__XXX"]);
    }

    #[test]
    fn multiple_receivers() {
        let net = parse(&format!(
            "{HEADER}BO_ 100 TestMsg: 8 ECU1\n SG_ S : 0|8@1+ (1,0) [0|255] \"\" ECU1, ECU2 Gateway\n"
        ))
        .unwrap();
        assert_eq!(
            net.messages[0].signals[0].receivers,
            vec!["ECU1", "ECU2", "Gateway"]
        );
    }

    #[test]
    fn message_transmitters() {
        let net = parse(&format!(
            "{HEADER}BO_ 100 M0: 8 ECU1\nBO_TX_BU_ 100 : ECU2, Gateway;\n"
        ))
        .unwrap();
        let mt = &net.message_transmitters[0];
        assert_eq!(mt.message_id, 100);
        assert_eq!(mt.transmitters, vec!["ECU2", "Gateway"]);
    }

    #[test]
    fn missing_message_id_kind() {
        let err = parse(&format!("{HEADER}BO_ NoId: 8 ECU1\n")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingMessageId);
    }
}
