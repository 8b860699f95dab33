//! Outreach messages offering a project to a client or doer.
//!
//! A message is plain text with placeholders for whatever the operator left
//! blank. It can be sent through WhatsApp, Telegram or email, each of which is
//! reached through a link carrying the percent-encoded message.

use crate::{
    entities::{client, doer},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use std::{
    fmt::{self, Write},
    str::FromStr,
};

pub const PROJECT_LINK_PLACEHOLDER: &str = "[Project Link]";
pub const DEADLINE_PLACEHOLDER: &str = "[Deadline Date]";
pub const EMAIL_SUBJECT: &str = "New Project Opportunity";

/// How a message reaches its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    WhatsApp,
    Telegram,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WhatsApp => "whatsapp",
            Self::Telegram => "telegram",
            Self::Email => "email",
        })
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "telegram" => Ok(Self::Telegram),
            "email" | "mail" => Ok(Self::Email),
            other => Err(Error::UnknownChannel {
                name: other.to_string(),
            }),
        }
    }
}

/// The contact details a message can be sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    /// "client" or "doer", used in error messages
    pub entity: &'static str,
    pub full_name: String,
    pub email: Option<String>,
    pub whatsapp_number: Option<String>,
    pub telegram_username: Option<String>,
}

impl From<&client::Model> for Contact {
    fn from(client: &client::Model) -> Self {
        Self {
            entity: "client",
            full_name: client.full_name.clone(),
            email: client.email.clone(),
            whatsapp_number: client.whatsapp_number.clone(),
            telegram_username: None,
        }
    }
}

impl From<&doer::Model> for Contact {
    fn from(doer: &doer::Model) -> Self {
        Self {
            entity: "doer",
            full_name: doer.full_name.clone(),
            email: doer.email.clone(),
            whatsapp_number: doer.whatsapp_number.clone(),
            telegram_username: doer.telegram_username.clone(),
        }
    }
}

/// Builds the message text. Blank inputs become placeholders.
#[must_use]
pub fn compose_message(
    full_name: &str,
    project_link: Option<&str>,
    deadline: Option<NaiveDate>,
) -> String {
    let link = project_link
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .unwrap_or(PROJECT_LINK_PLACEHOLDER);
    let deadline = deadline.map_or_else(
        || DEADLINE_PLACEHOLDER.to_string(),
        |day| day.format("%Y-%m-%d").to_string(),
    );

    format!(
        "Hey {full_name},\n\n\
         Here is a new project: {link}\n\n\
         Deadline: {deadline}\n\n\
         Please name your price.\n\n\
         Best regards"
    )
}

/// The link that opens `message` addressed to `contact` on `channel`.
///
/// # Errors
/// Returns [`Error::MissingField`] when the contact has no usable address for
/// the channel.
pub fn send_link(channel: Channel, contact: &Contact, message: &str) -> Result<String> {
    let missing = |field| Error::MissingField {
        entity: contact.entity,
        field,
    };

    match channel {
        Channel::WhatsApp => {
            let digits: String = contact
                .whatsapp_number
                .as_deref()
                .unwrap_or_default()
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            if digits.is_empty() {
                return Err(missing("whatsapp_number"));
            }
            Ok(format!("https://wa.me/{digits}?text={}", encode_component(message)))
        }
        Channel::Telegram => {
            let username = contact
                .telegram_username
                .as_deref()
                .map(|name| name.trim().replacen('@', "", 1))
                .filter(|name| !name.is_empty())
                .ok_or_else(|| missing("telegram_username"))?;
            Ok(format!("https://t.me/{username}?text={}", encode_component(message)))
        }
        Channel::Email => {
            let email = contact
                .email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .ok_or_else(|| missing("email"))?;
            Ok(format!(
                "mailto:{email}?subject={}&body={}",
                encode_component(EMAIL_SUBJECT),
                encode_component(message)
            ))
        }
    }
}

/// Percent-encodes everything except ASCII letters, digits and `-_.!~*'()`.
fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
