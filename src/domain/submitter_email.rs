use super::ValidationError;

/// An email address as typed into one of the site's forms.
///
/// Only the shape is checked (it contains an `@`); the email provider is the
/// one that finds out whether the mailbox exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterEmail(String);

impl SubmitterEmail {
    pub fn parse(s: String) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if !trimmed.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn eq_ignore_case(&self, other: &SubmitterEmail) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for SubmitterEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmitterEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for SubmitterEmail {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubmitterEmail::parse(value)
    }
}
