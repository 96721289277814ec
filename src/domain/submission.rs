use super::{GithubHandle, Motivation, ReferralCode, SignupType, SubmitterEmail, ValidationError};

/// Raw body of `POST /api/waitlist`.
#[derive(serde::Deserialize, Debug, Default)]
pub struct WaitlistPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub signup_type: Option<String>,
}

/// Raw body of `POST /api/referral`.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferralPayload {
    pub referrer_name: Option<String>,
    pub referrer_email: Option<String>,
    pub friend_name: Option<String>,
    pub friend_email: Option<String>,
    #[serde(alias = "walletAddress")]
    pub counterparty_address: Option<String>,
}

/// Raw body of `POST /api/alpha-signup`.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlphaPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "githubUsername")]
    pub github: Option<String>,
    #[serde(alias = "howDidYouHear")]
    pub discovery_source: Option<String>,
    pub motivation: Option<String>,
    #[serde(alias = "turnstileToken")]
    pub bot_token: Option<String>,
}

/// A submission that passed validation, one variant per form.
#[derive(Debug, Clone)]
pub enum SubmissionRequest {
    Waitlist(WaitlistSignup),
    Referral(ReferralInvite),
    Alpha(AlphaRequest),
}

impl SubmissionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionRequest::Waitlist(_) => "waitlist",
            SubmissionRequest::Referral(_) => "referral",
            SubmissionRequest::Alpha(_) => "alpha",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            SubmissionRequest::Waitlist(signup) => signup.signup_type.success_message(),
            SubmissionRequest::Referral(_) => "Invitation sent successfully!",
            SubmissionRequest::Alpha(_) => "Alpha access request received!",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaitlistSignup {
    pub email: SubmitterEmail,
    pub name: Option<String>,
    pub signup_type: SignupType,
}

impl TryFrom<WaitlistPayload> for WaitlistSignup {
    type Error = ValidationError;

    fn try_from(payload: WaitlistPayload) -> Result<Self, Self::Error> {
        let mut required = RequiredFields::default();
        let email = required.take("email", payload.email);
        required.check()?;

        let email = SubmitterEmail::parse(email)?;
        let signup_type = SignupType::parse(payload.signup_type)?;

        Ok(Self {
            email,
            name: non_blank(payload.name),
            signup_type,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReferralInvite {
    pub referrer_name: String,
    pub referrer_email: SubmitterEmail,
    pub friend_name: String,
    pub friend_email: SubmitterEmail,
    pub counterparty_address: Option<String>,
}

impl ReferralInvite {
    pub fn referral_code(&self) -> ReferralCode {
        ReferralCode::from_email(&self.referrer_email)
    }
}

impl TryFrom<ReferralPayload> for ReferralInvite {
    type Error = ValidationError;

    fn try_from(payload: ReferralPayload) -> Result<Self, Self::Error> {
        let mut required = RequiredFields::default();
        let referrer_name = required.take("referrerName", payload.referrer_name);
        let referrer_email = required.take("referrerEmail", payload.referrer_email);
        let friend_name = required.take("friendName", payload.friend_name);
        let friend_email = required.take("friendEmail", payload.friend_email);
        required.check()?;

        let referrer_email = SubmitterEmail::parse(referrer_email)?;
        let friend_email = SubmitterEmail::parse(friend_email)?;
        if referrer_email.eq_ignore_case(&friend_email) {
            return Err(ValidationError::SelfReferral);
        }

        Ok(Self {
            referrer_name,
            referrer_email,
            friend_name,
            friend_email,
            counterparty_address: non_blank(payload.counterparty_address),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AlphaRequest {
    pub name: String,
    pub email: SubmitterEmail,
    pub github_handle: GithubHandle,
    pub discovery_source: String,
    pub motivation: Motivation,
    pub bot_token: Option<String>,
}

impl TryFrom<AlphaPayload> for AlphaRequest {
    type Error = ValidationError;

    fn try_from(payload: AlphaPayload) -> Result<Self, Self::Error> {
        let mut required = RequiredFields::default();
        let name = required.take("name", payload.name);
        let email = required.take("email", payload.email);
        let github = required.take("github", payload.github);
        let discovery_source = required.take("discoverySource", payload.discovery_source);
        let motivation = required.take("motivation", payload.motivation);
        required.check()?;

        let email = SubmitterEmail::parse(email)?;
        let motivation = Motivation::parse(motivation)?;
        let github_handle = GithubHandle::parse(github)?;

        Ok(Self {
            name,
            email,
            github_handle,
            discovery_source,
            motivation,
            bot_token: non_blank(payload.bot_token),
        })
    }
}

/// Collects every blank field so the client hears about all of them at once.
#[derive(Default)]
struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    fn take(&mut self, field: &'static str, value: Option<String>) -> String {
        non_blank(value).unwrap_or_else(|| {
            self.missing.push(field);
            String::new()
        })
    }

    fn check(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
