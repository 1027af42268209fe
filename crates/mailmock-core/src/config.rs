//! The editable email configuration record.
//!
//! [`EmailConfig`] is a flat, total record: every field is always
//! present and defaults are compiled in.  Mutation happens by full
//! replacement of a single field ([`EmailConfig::updated`]), never by
//! partial construction, so observers can always read a complete
//! record.

use serde::{Deserialize, Serialize};

/// All editable fields of the mock email message.
///
/// Serialized as camelCase JSON; this is also the persisted storage
/// format, so the names are part of the on-disk contract.
///
/// `#[serde(default)]` keeps the record total when hydrating from an
/// older or partially-written persisted blob: missing keys fall back
/// to the compiled-in defaults instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    /// Status-bar clock text.
    pub time: String,
    /// Status-bar battery percentage text.
    pub battery: String,
    /// Email subject line.
    pub subject: String,
    /// Mailbox label chip next to the subject (e.g. "Inbox").
    pub label: String,
    /// Display name of the sender.
    pub sender_name: String,
    /// Sender address shown under the name.
    pub sender_email: String,
    /// Avatar resource locator: a URL, object URL, or data URL.
    /// Empty means "no picture"; the view renders initials instead.
    pub profile_picture: String,
    /// Body text with embedded `\n` line breaks.
    pub email_content: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            time: "10:24".into(),
            battery: "99".into(),
            subject: "not gonna sugarcoat it".into(),
            label: "Inbox".into(),
            sender_name: "Alex Keene".into(),
            sender_email: "alex@example.com".into(),
            profile_picture: String::new(),
            email_content: "Hey –\n\nMost GLP-1 clinics make it way harder (and more expensive) \
                than it needs to be. We cut out the middlemen, the markup, and the nonsense.\n\n\
                Same meds. Legit providers. Zero fluff.\n\nIf you've been thinking about trying \
                it but got overwhelmed by all the chaos out there—yeah, we built this on purpose"
                .into(),
        }
    }
}

impl EmailConfig {
    /// Return a copy of this record with exactly one field replaced.
    ///
    /// Any string is accepted verbatim: the content is free-form copy,
    /// so there is no field-level validation.
    #[must_use]
    pub fn updated(&self, field: ConfigField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set(field, value);
        next
    }

    /// Replace one field in place.
    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ConfigField::Time => self.time = value,
            ConfigField::Battery => self.battery = value,
            ConfigField::Subject => self.subject = value,
            ConfigField::Label => self.label = value,
            ConfigField::SenderName => self.sender_name = value,
            ConfigField::SenderEmail => self.sender_email = value,
            ConfigField::ProfilePicture => self.profile_picture = value,
            ConfigField::EmailContent => self.email_content = value,
        }
    }

    /// Read one field by identifier.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Time => &self.time,
            ConfigField::Battery => &self.battery,
            ConfigField::Subject => &self.subject,
            ConfigField::Label => &self.label,
            ConfigField::SenderName => &self.sender_name,
            ConfigField::SenderEmail => &self.sender_email,
            ConfigField::ProfilePicture => &self.profile_picture,
            ConfigField::EmailContent => &self.email_content,
        }
    }
}

/// Identifier for one field of [`EmailConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// Status-bar clock.
    Time,
    /// Status-bar battery percentage.
    Battery,
    /// Subject line.
    Subject,
    /// Mailbox label chip.
    Label,
    /// Sender display name.
    SenderName,
    /// Sender address.
    SenderEmail,
    /// Avatar resource locator.
    ProfilePicture,
    /// Body text.
    EmailContent,
}

impl ConfigField {
    /// All fields, for iteration in tests and diagnostics.
    pub const ALL: [Self; 8] = [
        Self::Time,
        Self::Battery,
        Self::Subject,
        Self::Label,
        Self::SenderName,
        Self::SenderEmail,
        Self::ProfilePicture,
        Self::EmailContent,
    ];
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn update_replaces_exactly_one_field() {
        let config = EmailConfig::default();
        let updated = config.updated(ConfigField::Subject, "Big Sale");

        assert_eq!(updated.subject, "Big Sale");
        for field in ConfigField::ALL {
            if field == ConfigField::Subject {
                continue;
            }
            assert_eq!(
                updated.get(field),
                config.get(field),
                "field {field:?} changed by an unrelated update"
            );
        }
    }

    #[test]
    fn updates_accept_any_string_verbatim() {
        let config = EmailConfig::default()
            .updated(ConfigField::Time, "")
            .updated(ConfigField::Battery, "  not a number  ")
            .updated(ConfigField::SenderEmail, "<b>html</b>");
        assert_eq!(config.time, "");
        assert_eq!(config.battery, "  not a number  ");
        assert_eq!(config.sender_email, "<b>html</b>");
    }

    #[test]
    fn reset_is_deterministic() {
        // Default::default() is the reset record; it must not depend on
        // prior mutation history.
        let mut config = EmailConfig::default();
        for field in ConfigField::ALL {
            config.set(field, "mutated");
        }
        assert_eq!(EmailConfig::default(), EmailConfig::default());
        assert_ne!(config, EmailConfig::default());
    }

    #[test]
    fn serialized_record_is_total() {
        // The persisted JSON must contain every field under its
        // camelCase name.
        let json = serde_json::to_value(EmailConfig::default()).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "time",
            "battery",
            "subject",
            "label",
            "senderName",
            "senderEmail",
            "profilePicture",
            "emailContent",
        ] {
            assert!(object.contains_key(key), "missing serialized key {key}");
        }
        assert_eq!(object.len(), 8);
    }

    #[test]
    fn hydration_from_partial_json_stays_total() {
        // Older persisted blobs may be missing fields; they hydrate to
        // defaults rather than failing or producing a partial record.
        let config: EmailConfig =
            serde_json::from_str(r#"{"subject":"saved subject"}"#).unwrap();
        assert_eq!(config.subject, "saved subject");
        assert_eq!(config.time, EmailConfig::default().time);
        assert_eq!(config.email_content, EmailConfig::default().email_content);
    }

    #[test]
    fn round_trips_through_json() {
        let config = EmailConfig::default().updated(ConfigField::EmailContent, "a\n\nb");
        let json = serde_json::to_string(&config).unwrap();
        let back: EmailConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
