//! Attribute statements: `BA_DEF_` / `BA_DEF_REL_` (definitions),
//! `BA_DEF_DEF_` / `BA_DEF_DEF_REL_` (defaults), `BA_` (values).

use tracing::info;

use crate::ast::{
    AttributeDefaultAst, AttributeDefinitionAst, AttributeObjectType, AttributeTarget,
    AttributeValueAst,
};
use crate::error::ParseErrorKind;
use crate::lexer::TokenKind;
use crate::parser::{PResult, Parser};
use crate::types::attributes::{AttributeValue, AttributeValueType};

impl Parser {
    /// `BA_DEF_ [BU_|BO_|SG_|EV_] "<name>" <value type>;` and the
    /// `BA_DEF_REL_` variant with its relation scope keywords.
    ///
    /// Returns `None` for an `EV_`-scoped definition: environment variables
    /// are out of scope, so the statement is consumed, reported once at info
    /// level, and dropped.
    pub(crate) fn parse_attribute_definition(&mut self) -> PResult<Option<AttributeDefinitionAst>> {
        let pos = self.position();
        let rel = self.kind() == TokenKind::BaDefRel;
        self.advance(); // BA_DEF_ or BA_DEF_REL_

        let object_type = if rel {
            match self.kind() {
                TokenKind::BuSgRel => AttributeObjectType::RelSignal,
                TokenKind::BuBoRel => AttributeObjectType::RelMessage,
                TokenKind::BuEvRel => AttributeObjectType::RelNode,
                _ => return Err(self.unexpected("relation scope after BA_DEF_REL_")),
            }
        } else {
            match self.kind() {
                TokenKind::Bu => AttributeObjectType::Node,
                TokenKind::Bo => AttributeObjectType::Message,
                TokenKind::Sg => AttributeObjectType::Signal,
                TokenKind::Ev => AttributeObjectType::EnvironmentVariable,
                _ => AttributeObjectType::Network,
            }
        };
        if object_type != AttributeObjectType::Network {
            self.advance();
        }

        let name = self.expect_string("attribute name")?;
        let value_type = self.parse_attribute_value_type()?;
        self.expect(TokenKind::Semicolon, "';' after attribute definition")?;

        if object_type == AttributeObjectType::EnvironmentVariable {
            info!(
                "Discarding EV_ attribute definition '{}' (environment variables not supported)",
                name
            );
            return Ok(None);
        }

        Ok(Some(AttributeDefinitionAst {
            object_type,
            name,
            value_type,
            pos,
        }))
    }

    fn parse_attribute_value_type(&mut self) -> PResult<AttributeValueType> {
        if self.kind() != TokenKind::Identifier {
            return Err(self.error(
                ParseErrorKind::InvalidValueType,
                "Expected attribute value type",
            ));
        }
        let type_name = self.take_text();

        match type_name.as_str() {
            "INT" => {
                let (min, max) = self.parse_numeric_bounds()?;
                Ok(AttributeValueType::Int {
                    min: min as i64,
                    max: max as i64,
                })
            }
            "HEX" => {
                let (min, max) = self.parse_numeric_bounds()?;
                Ok(AttributeValueType::Hex {
                    min: min as i64,
                    max: max as i64,
                })
            }
            "FLOAT" => {
                let (min, max) = self.parse_numeric_bounds()?;
                Ok(AttributeValueType::Float { min, max })
            }
            "STRING" => Ok(AttributeValueType::String),
            "ENUM" => {
                let mut values = Vec::new();
                while self.kind() == TokenKind::String {
                    values.push(self.take_text());
                    self.match_kind(TokenKind::Comma);
                }
                Ok(AttributeValueType::Enum { values })
            }
            _ => Err(self.error(
                ParseErrorKind::InvalidValueType,
                format!("Unknown attribute value type '{}'", type_name),
            )),
        }
    }

    /// Min/max after `INT`/`HEX`/`FLOAT`. Some exports omit the bounds
    /// entirely; both then default to zero. A lone minimum is an error.
    fn parse_numeric_bounds(&mut self) -> PResult<(f64, f64)> {
        if !matches!(
            self.kind(),
            TokenKind::Integer | TokenKind::Float | TokenKind::Minus | TokenKind::Plus
        ) {
            return Ok((0.0, 0.0));
        }
        let min = self.parse_num("attribute minimum")?;
        let max = self.parse_num("attribute maximum")?;
        Ok((min, max))
    }

    /// `BA_DEF_DEF_ "<name>" <value>;` (and the `_REL_` spelling, which
    /// carries no extra scope information).
    pub(crate) fn parse_attribute_default(&mut self) -> PResult<AttributeDefaultAst> {
        let pos = self.position();
        self.advance(); // BA_DEF_DEF_ or BA_DEF_DEF_REL_

        let name = self.expect_string("attribute name")?;
        let value = self.parse_attribute_value_token()?;
        self.expect(TokenKind::Semicolon, "';' after attribute default")?;

        Ok(AttributeDefaultAst { name, value, pos })
    }

    /// `BA_ "<name>" [BU_ <node> | BO_ <id> | SG_ <id> <signal>] <value>;`
    pub(crate) fn parse_attribute_value(&mut self) -> PResult<AttributeValueAst> {
        let pos = self.position();
        self.expect(TokenKind::Ba, "BA_")?;
        let attribute_name = self.expect_string("attribute name")?;

        let target = match self.kind() {
            TokenKind::Bu => {
                self.advance();
                if self.kind() != TokenKind::Identifier {
                    return Err(self.error(ParseErrorKind::InvalidNodeName, "Expected node name"));
                }
                AttributeTarget::Node {
                    name: self.take_text(),
                }
            }
            TokenKind::Bo => {
                self.advance();
                if self.kind() != TokenKind::Integer {
                    return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
                }
                AttributeTarget::Message {
                    id: self.expect_u64("message ID")?,
                }
            }
            TokenKind::Sg => {
                self.advance();
                if self.kind() != TokenKind::Integer {
                    return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
                }
                let message_id = self.expect_u64("message ID")?;
                let signal_name = self.expect_identifier("signal name")?;
                AttributeTarget::Signal {
                    message_id,
                    signal_name,
                }
            }
            _ => AttributeTarget::Network,
        };

        let value = self.parse_attribute_value_token()?;
        self.expect(TokenKind::Semicolon, "';' after attribute value")?;

        Ok(AttributeValueAst {
            target,
            attribute_name,
            value,
            pos,
        })
    }

    /// One attribute value, decoded by token kind: integer → `Int`, float →
    /// `Float`, string → `String`. No coercion between numeric kinds.
    fn parse_attribute_value_token(&mut self) -> PResult<AttributeValue> {
        match self.kind() {
            TokenKind::Integer => {
                let value = self.expect_i64("attribute value")?;
                Ok(AttributeValue::Int(value))
            }
            TokenKind::Float => {
                let text = self.take_text();
                let value = text.parse::<f64>().map_err(|_| {
                    self.error(
                        ParseErrorKind::InvalidFloatFormat,
                        format!("Invalid float '{}' for attribute value", text),
                    )
                })?;
                Ok(AttributeValue::Float(value))
            }
            TokenKind::String => Ok(AttributeValue::String(self.take_text())),
            TokenKind::EndOfFile => Err(self.unexpected("attribute value")),
            _ => Err(self.error(
                ParseErrorKind::InvalidAttributeValue,
                format!("Expected attribute value, got '{}'", self.current().text),
            )),
        }
    }
}
