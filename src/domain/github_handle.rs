use super::ValidationError;

const MAX_LEN: usize = 39;

/// A GitHub username: 1 to 39 ASCII alphanumerics or single hyphens,
/// never starting with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubHandle(String);

impl GithubHandle {
    pub fn parse(s: String) -> Result<Self, ValidationError> {
        let handle = s.trim();
        let starts_alphanumeric = handle
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        let allowed_chars = handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

        if !starts_alphanumeric
            || !allowed_chars
            || handle.len() > MAX_LEN
            || handle.contains("--")
        {
            return Err(ValidationError::InvalidGithubHandle);
        }
        Ok(Self(handle.to_string()))
    }
}

impl AsRef<str> for GithubHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GithubHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
