//! `CM_` comment statements for the network, a node, a message, or a signal.

use crate::ast::{CommentAst, CommentTarget};
use crate::error::ParseErrorKind;
use crate::lexer::TokenKind;
use crate::parser::{PResult, Parser};

impl Parser {
    /// `CM_ [BU_ <node> | BO_ <id> | SG_ <id> <signal>] "<text>";`
    pub(crate) fn parse_comment(&mut self) -> PResult<CommentAst> {
        let pos = self.position();
        self.expect(TokenKind::Cm, "CM_")?;

        let target = match self.kind() {
            TokenKind::Bu => {
                self.advance();
                if self.kind() != TokenKind::Identifier {
                    return Err(self.error(ParseErrorKind::InvalidNodeName, "Expected node name"));
                }
                CommentTarget::Node {
                    name: self.take_text(),
                }
            }
            TokenKind::Bo => {
                self.advance();
                if self.kind() != TokenKind::Integer {
                    return Err(self.error(ParseErrorKind::MissingMessageId, "Expected message ID"));
                }
                CommentTarget::Message {
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
                CommentTarget::Signal {
                    message_id,
                    signal_name,
                }
            }
            _ => CommentTarget::Network,
        };

        let text = self.expect_string("comment text")?;
        self.expect(TokenKind::Semicolon, "';' after comment")?;

        Ok(CommentAst { target, text, pos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn comment_targets() {
        let net = parse(concat!(
            "VERSION \"\"\nNS_ :\nBS_:\nBU_ Motor Gateway\n",
            "BO_ 500 Motor_01: 8 Motor\n",
            " SG_ Engine_Speed : 0|8@1+ (1,0) [0|255] \"km/h\"\n",
            "CM_ \"Network level note\";\n",
            "CM_ BU_ Motor \"Motor ECU drives the vehicle.\";\n",
            "CM_ BO_ 500 \"Cyclic status frame\";\n",
            "CM_ SG_ 500 Engine_Speed \"Averaged over 100ms.\";\n",
        ))
        .unwrap();

        assert_eq!(net.comments.len(), 4);
        assert_eq!(net.comments[0].target, CommentTarget::Network);
        assert_eq!(net.comments[0].text, "Network level note");
        assert_eq!(
            net.comments[1].target,
            CommentTarget::Node {
                name: "Motor".into()
            }
        );
        assert_eq!(net.comments[2].target, CommentTarget::Message { id: 500 });
        assert_eq!(
            net.comments[3].target,
            CommentTarget::Signal {
                message_id: 500,
                signal_name: "Engine_Speed".into()
            }
        );
    }

    #[test]
    fn multiline_comment_text() {
        let net = parse(
            "VERSION \"\"\nNS_ :\nBS_:\nBU_ Motor\nCM_ BU_ Motor \"first line\nsecond line\";\n",
        )
        .unwrap();
        assert_eq!(net.comments[0].text, "first line\nsecond line");
    }
}
