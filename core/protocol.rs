// Line protocol: `<tag> <kind> <payload>\n` - pure encoding/decoding, no I/O
use crate::error::ProtocolError;
use crate::types::MessageKind;
use num_bigint::BigInt;

pub const PROTOCOL_TAG: &str = "cs5700spring2023";
pub const DIVISION_ERROR_CODE: &str = "#DIV/0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Hello { username: String },
    Eval { tokens: Vec<String> },
    Status { value: BigInt },
    Error { code: String },
    Bye { secret: String },
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Hello { .. } => MessageKind::Hello,
            Message::Eval { .. } => MessageKind::Eval,
            Message::Status { .. } => MessageKind::Status,
            Message::Error { .. } => MessageKind::Error,
            Message::Bye { .. } => MessageKind::Bye,
        }
    }

    pub fn division_error() -> Self {
        Message::Error {
            code: DIVISION_ERROR_CODE.to_string(),
        }
    }

    /// Serialize to a single newline-terminated line.
    pub fn encode(&self, tag: &str) -> String {
        let payload = match self {
            Message::Hello { username } => username.clone(),
            Message::Eval { tokens } => tokens.join(" "),
            Message::Status { value } => value.to_string(),
            Message::Error { code } => code.clone(),
            Message::Bye { secret } => secret.clone(),
        };
        format!("{} {} {}\n", tag, self.kind(), payload)
    }

    /// Parse one line (with or without its trailing newline).
    ///
    /// Fields are whitespace-delimited. The BYE payload is every field after
    /// the kind joined with no separator.
    pub fn decode(line: &str, tag: &str) -> Result<Self, ProtocolError> {
        let mut fields = line.split_whitespace();

        let found = fields.next().ok_or(ProtocolError::Empty)?;
        if found != tag {
            return Err(ProtocolError::TagMismatch {
                expected: tag.to_string(),
                found: found.to_string(),
            });
        }

        let kind_field = fields.next().ok_or(ProtocolError::MissingKind)?;
        let kind = MessageKind::parse(kind_field)
            .ok_or_else(|| ProtocolError::UnknownKind(kind_field.to_string()))?;

        let rest: Vec<&str> = fields.collect();
        match kind {
            MessageKind::Hello => match rest.as_slice() {
                [username] => Ok(Message::Hello {
                    username: username.to_string(),
                }),
                [] => Err(ProtocolError::MissingPayload(kind)),
                _ => Err(ProtocolError::InvalidPayload {
                    kind,
                    payload: rest.join(" "),
                }),
            },
            MessageKind::Eval => Ok(Message::Eval {
                tokens: rest.iter().map(|s| s.to_string()).collect(),
            }),
            MessageKind::Status => match rest.as_slice() {
                [value] => BigInt::parse_bytes(value.as_bytes(), 10)
                    .map(|value| Message::Status { value })
                    .ok_or_else(|| ProtocolError::InvalidPayload {
                        kind,
                        payload: value.to_string(),
                    }),
                [] => Err(ProtocolError::MissingPayload(kind)),
                _ => Err(ProtocolError::InvalidPayload {
                    kind,
                    payload: rest.join(" "),
                }),
            },
            MessageKind::Error => {
                if rest.is_empty() {
                    return Err(ProtocolError::MissingPayload(kind));
                }
                Ok(Message::Error {
                    code: rest.join(" "),
                })
            }
            MessageKind::Bye => Ok(Message::Bye {
                secret: rest.concat(),
            }),
        }
    }
}
