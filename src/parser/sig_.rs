//! Signal-auxiliary statements: `SIG_GROUP_`, `SIG_VALTYPE_`, `SG_MUL_VAL_`
//! and the `SGTYPE_` signal-type templates.

use crate::ast::{
    SignalExtendedValueTypeAst, SignalGroupAst, SignalMultiplexerValueAst, SignalTypeAst,
};
use crate::error::ParseErrorKind;
use crate::lexer::TokenKind;
use crate::parser::{PResult, Parser};
use crate::types::signal::MuxValueRange;

impl Parser {
    /// `SIG_GROUP_ <message id> <name> <repetitions> : <signal>* ;`
    pub(crate) fn parse_signal_group(&mut self) -> PResult<SignalGroupAst> {
        let pos = self.position();
        self.expect(TokenKind::SigGroup, "SIG_GROUP_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
        }
        let message_id = self.expect_u64("message ID")?;
        let group_name = self.expect_identifier("group name")?;
        let repetitions = self.expect_u64("repetitions count")?;
        self.expect(TokenKind::Colon, "':' in signal group")?;

        let mut signal_names = Vec::new();
        while self.kind() == TokenKind::Identifier {
            signal_names.push(self.take_text());
        }

        self.expect(TokenKind::Semicolon, "';' after signal group")?;

        Ok(SignalGroupAst {
            message_id,
            group_name,
            repetitions,
            signal_names,
            pos,
        })
    }

    /// `SIG_VALTYPE_ <message id> <signal> : <code> ;` with code 0 integer,
    /// 1 float, 2 double.
    pub(crate) fn parse_signal_extended_value_type(
        &mut self,
    ) -> PResult<SignalExtendedValueTypeAst> {
        let pos = self.position();
        self.expect(TokenKind::SigValtype, "SIG_VALTYPE_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
        }
        let message_id = self.expect_u64("message ID")?;
        let signal_name = self.expect_identifier("signal name")?;
        self.expect(TokenKind::Colon, "':' in SIG_VALTYPE_")?;
        let value_type = self.expect_u64("value type code")?;
        self.expect(TokenKind::Semicolon, "';' after SIG_VALTYPE_")?;

        Ok(SignalExtendedValueTypeAst {
            message_id,
            signal_name,
            value_type,
            pos,
        })
    }

    /// `SG_MUL_VAL_ <message id> <signal> <switch> <range> {, <range>} ;`
    ///
    /// A range is `from-to` or a lone value. `0-10` tokenizes as the integers
    /// `0` and `-10` (the lexer attaches `-` to a following digit), so a
    /// negative integer after `from` is read as the dashed upper bound; the
    /// spaced `0 - 10` form arrives as an explicit minus token.
    pub(crate) fn parse_signal_multiplexer_value(
        &mut self,
    ) -> PResult<SignalMultiplexerValueAst> {
        let pos = self.position();
        self.expect(TokenKind::SgMulVal, "SG_MUL_VAL_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
        }
        let message_id = self.expect_u64("message ID")?;
        let signal_name = self.expect_identifier("signal name")?;
        let switch_name = self.expect_identifier("switch name")?;

        let mut value_ranges = Vec::new();
        while self.kind() != TokenKind::Semicolon {
            if self.kind() != TokenKind::Integer {
                return Err(self.unexpected("integer value in SG_MUL_VAL_"));
            }
            let from = self.expect_u64("range start")?;

            let to = if self.match_kind(TokenKind::Minus) {
                self.expect_u64("range end")?
            } else if self.kind() == TokenKind::Integer && self.current().text.starts_with('-') {
                let text = self.take_text();
                text[1..].parse::<u64>().map_err(|_| {
                    self.error(
                        ParseErrorKind::InvalidInteger,
                        format!("Invalid range end '{}'", text),
                    )
                })?
            } else {
                from
            };

            value_ranges.push(MuxValueRange { from, to });
            self.match_kind(TokenKind::Comma);
        }

        self.expect(TokenKind::Semicolon, "';' after SG_MUL_VAL_")?;

        Ok(SignalMultiplexerValueAst {
            message_id,
            signal_name,
            switch_name,
            value_ranges,
            pos,
        })
    }

    /// `SGTYPE_ <name> : <size>@<order><sign> (<factor>,<offset>)
    /// [<min>|<max>] "<unit>" <default>, <value table> ;`
    pub(crate) fn parse_signal_type(&mut self) -> PResult<SignalTypeAst> {
        let pos = self.position();
        self.expect(TokenKind::Sgtype, "SGTYPE_")?;

        let name = self.expect_identifier("signal type name")?;
        self.expect(TokenKind::Colon, "':' after signal type name")?;
        let size = self.expect_u64("signal type size")?;
        self.expect(TokenKind::At, "'@' in signal type")?;

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
                "Expected + or - for value type",
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

        let unit = self.expect_string("signal type unit")?;
        let default_value = self.parse_num("default value")?;
        self.expect(TokenKind::Comma, "',' before value table name")?;
        let value_table = self.expect_identifier("value table name")?;
        self.expect(TokenKind::Semicolon, "';' after signal type")?;

        Ok(SignalTypeAst {
            name,
            size,
            byte_order,
            sign,
            factor,
            offset,
            minimum,
            maximum,
            unit,
            default_value,
            value_table,
            pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    const HEADER: &str = "VERSION \"\"\nNS_ :\nBS_:\nBU_ ECU1\n";

    #[test]
    fn signal_group() {
        let net = parse(&format!(
            "{HEADER}SIG_GROUP_ 100 Powertrain 1 : EngineSpeed EngineTemp ;\n"
        ))
        .unwrap();
        let sg = &net.signal_groups[0];
        assert_eq!(sg.message_id, 100);
        assert_eq!(sg.group_name, "Powertrain");
        assert_eq!(sg.repetitions, 1);
        assert_eq!(sg.signal_names, vec!["EngineSpeed", "EngineTemp"]);
    }

    #[test]
    fn extended_value_type_codes() {
        let net = parse(&format!(
            "{HEADER}SIG_VALTYPE_ 100 FloatSig : 1;\nSIG_VALTYPE_ 100 DoubleSig : 2;\n"
        ))
        .unwrap();
        assert_eq!(net.signal_extended_value_types[0].value_type, 1);
        assert_eq!(net.signal_extended_value_types[1].value_type, 2);
    }

    #[test]
    fn multiplexer_value_ranges() {
        let net = parse(&format!(
            "{HEADER}SG_MUL_VAL_ 700 Data Level2_Mux 0-10, 20-30, 40-40 ;\n"
        ))
        .unwrap();
        let smv = &net.signal_multiplexer_values[0];
        assert_eq!(smv.message_id, 700);
        assert_eq!(smv.signal_name, "Data");
        assert_eq!(smv.switch_name, "Level2_Mux");
        let ranges: Vec<(u64, u64)> = smv.value_ranges.iter().map(|r| (r.from, r.to)).collect();
        assert_eq!(ranges, vec![(0, 10), (20, 30), (40, 40)]);
    }

    #[test]
    fn spaced_range_and_singleton() {
        let net = parse(&format!(
            "{HEADER}SG_MUL_VAL_ 700 Data Mux 3 - 5, 9 ;\n"
        ))
        .unwrap();
        let ranges: Vec<(u64, u64)> = net.signal_multiplexer_values[0]
            .value_ranges
            .iter()
            .map(|r| (r.from, r.to))
            .collect();
        assert_eq!(ranges, vec![(3, 5), (9, 9)]);
    }

    #[test]
    fn signal_type_template() {
        let net = parse(&format!(
            "{HEADER}VAL_TABLE_ OnOff 1 \"On\" 0 \"Off\" ;\nSGTYPE_ SwitchType : 1@1+ (1,0) [0|1] \"\" 0, OnOff;\n"
        ))
        .unwrap();
        let st = &net.signal_types[0];
        assert_eq!(st.name, "SwitchType");
        assert_eq!(st.size, 1);
        assert_eq!(st.byte_order, '1');
        assert_eq!(st.sign, '+');
        assert_eq!(st.default_value, 0.0);
        assert_eq!(st.value_table, "OnOff");
    }

    #[test]
    fn truncated_mul_val_hits_eof() {
        let err = parse(&format!("{HEADER}SG_MUL_VAL_ 700 Data Mux 0-10")).unwrap_err();
        assert_eq!(
            err.kind,
            crate::error::ParseErrorKind::UnexpectedEndOfFile
        );
    }
}
