/// The first rule a submission failed. The `Display` output is sent back to
/// the client verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid signup type")]
    InvalidSignupType,
    #[error("Please tell us a bit more about your motivation (at least {min} characters)")]
    MotivationTooShort { min: usize },
    #[error("Invalid GitHub username format")]
    InvalidGithubHandle,
    #[error("You cannot refer yourself")]
    SelfReferral,
}
