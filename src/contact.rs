use serde::Serialize;

pub const ACKNOWLEDGEMENT: &str = "Thank you for your message! We'll get back to you soon.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingField {
    Name,
    Email,
    Message,
}

impl MissingField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl ContactSubmission {
    /// All three fields are required; whitespace-only counts as empty.
    pub fn from_fields(name: &str, email: &str, message: &str) -> Result<Self, MissingField> {
        let required = |value: &str, field: MissingField| {
            let value = value.trim();
            if value.is_empty() {
                Err(field)
            } else {
                Ok(value.to_string())
            }
        };

        Ok(Self {
            name: required(name, MissingField::Name)?,
            email: required(email, MissingField::Email)?,
            message: required(message, MissingField::Message)?,
        })
    }
}
