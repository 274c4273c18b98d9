//! `VAL_TABLE_` (named value tables) and `VAL_` (per-signal value
//! descriptions).

use crate::ast::{ValueDescriptionAst, ValueEncodingDescriptionAst, ValueTableAst};
use crate::error::ParseErrorKind;
use crate::lexer::TokenKind;
use crate::parser::{PResult, Parser};

impl Parser {
    /// `VAL_TABLE_ <name> {<value> "<label>"}* [;]`
    ///
    /// The trailing semicolon is optional; some tools omit it.
    pub(crate) fn parse_value_table(&mut self) -> PResult<ValueTableAst> {
        let pos = self.position();
        self.expect(TokenKind::ValTable, "VAL_TABLE_")?;
        let name = self.expect_identifier("value table name")?;
        let descriptions = self.parse_value_encoding_descriptions()?;
        self.match_kind(TokenKind::Semicolon);

        Ok(ValueTableAst {
            name,
            descriptions,
            pos,
        })
    }

    /// `VAL_ <message id> <signal> {<value> "<label>"}* ;`
    pub(crate) fn parse_value_description(&mut self) -> PResult<ValueDescriptionAst> {
        let pos = self.position();
        self.expect(TokenKind::Val, "VAL_")?;

        if self.kind() != TokenKind::Integer {
            return Err(self.error(
                ParseErrorKind::MissingMessageId,
                "Expected message ID for value description",
            ));
        }
        let message_id = self.expect_u64("message ID")?;
        let signal_name = self.expect_identifier("signal name")?;
        let descriptions = self.parse_value_encoding_descriptions()?;
        self.expect(TokenKind::Semicolon, "';' after value description")?;

        Ok(ValueDescriptionAst {
            message_id,
            signal_name,
            descriptions,
            pos,
        })
    }

    fn parse_value_encoding_descriptions(&mut self) -> PResult<Vec<ValueEncodingDescriptionAst>> {
        let mut descriptions = Vec::new();
        while self.kind() == TokenKind::Integer {
            let value = self.expect_i64("encoded value")?;
            let description = self.expect_string("value label")?;
            descriptions.push(ValueEncodingDescriptionAst { value, description });
        }
        Ok(descriptions)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    const HEADER: &str = "VERSION \"\"\nNS_ :\nBS_:\nBU_ ECU1\n";

    #[test]
    fn value_table_with_and_without_semicolon() {
        let net = parse(&format!(
            "{HEADER}VAL_TABLE_ OnOff 1 \"On\" 0 \"Off\" ;\nVAL_TABLE_ Gears 0 \"N\" 1 \"D\" 2 \"R\"\n"
        ))
        .unwrap();
        assert_eq!(net.value_tables.len(), 2);
        assert_eq!(net.value_tables[0].name, "OnOff");
        assert_eq!(net.value_tables[0].descriptions.len(), 2);
        assert_eq!(net.value_tables[0].descriptions[0].value, 1);
        assert_eq!(net.value_tables[0].descriptions[0].description, "On");
        assert_eq!(net.value_tables[1].descriptions.len(), 3);
    }

    #[test]
    fn signal_value_descriptions() {
        let net = parse(&format!(
            concat!(
                "{}",
                "BO_ 500 M0: 8 ECU1\n",
                " SG_ Status : 0|2@1+ (1,0) [0|3] \"\"\n",
                "VAL_ 500 Status 2 \"Error\" 1 \"On\" 0 \"Off\" ;\n",
            ),
            HEADER
        ))
        .unwrap();
        let vd = &net.value_descriptions[0];
        assert_eq!(vd.message_id, 500);
        assert_eq!(vd.signal_name, "Status");
        let entries: Vec<(i64, &str)> = vd
            .descriptions
            .iter()
            .map(|d| (d.value, d.description.as_str()))
            .collect();
        assert_eq!(entries, vec![(2, "Error"), (1, "On"), (0, "Off")]);
    }

    #[test]
    fn negative_encoded_values() {
        let net = parse(&format!(
            "{HEADER}VAL_TABLE_ Temp -40 \"Min\" 215 \"Max\" ;\n"
        ))
        .unwrap();
        assert_eq!(net.value_tables[0].descriptions[0].value, -40);
    }
}
