use super::ValidationError;

/// Which list a waitlist-form visitor is joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupType {
    #[default]
    Waitlist,
    Foundation100,
}

impl SignupType {
    /// A missing type means the plain waitlist.
    pub fn parse(s: Option<String>) -> Result<Self, ValidationError> {
        let Some(s) = s else {
            return Ok(Self::default());
        };
        match s.trim().to_lowercase().as_str() {
            "" | "waitlist" => Ok(Self::Waitlist),
            "foundation100" => Ok(Self::Foundation100),
            _ => Err(ValidationError::InvalidSignupType),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignupType::Waitlist => "waitlist",
            SignupType::Foundation100 => "foundation100",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignupType::Waitlist => "Waitlist",
            SignupType::Foundation100 => "Foundation 100",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SignupType::Waitlist => "🎉",
            SignupType::Foundation100 => "🏆",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            SignupType::Waitlist => "Successfully joined the waitlist!",
            SignupType::Foundation100 => "Successfully joined the Foundation 100!",
        }
    }
}
