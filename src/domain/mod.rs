mod github_handle;
mod motivation;
mod referral_code;
mod signup_type;
mod submission;
mod submitter_email;
mod validation_error;

pub use github_handle::GithubHandle;
pub use motivation::Motivation;
pub use referral_code::ReferralCode;
pub use signup_type::SignupType;
pub use submission::{
    AlphaPayload, AlphaRequest, ReferralInvite, ReferralPayload, SubmissionRequest,
    WaitlistPayload, WaitlistSignup,
};
pub use submitter_email::SubmitterEmail;
pub use validation_error::ValidationError;
