use super::SubmitterEmail;

const PREFIX: &str = "NC-";
const MAX_DIGITS: usize = 6;
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Short attribution token handed to a referrer.
///
/// Derived from the referrer's email with the 32-bit `h * 31 + c` string
/// hash, so the same address always gets the same code. Codes are not
/// unique and are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn from_email(email: &SubmitterEmail) -> Self {
        let normalized = email.as_ref().trim().to_lowercase();
        let hash = normalized
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));

        let digits: String = to_base36(hash.unsigned_abs())
            .chars()
            .take(MAX_DIGITS)
            .collect();
        Self(format!("{PREFIX}{digits}"))
    }
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from(BASE36_DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    digits.iter().rev().collect()
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
