use unicode_segmentation::UnicodeSegmentation;

use super::ValidationError;

#[derive(Debug, Clone)]
pub struct Motivation(String);

impl Motivation {
    pub const MIN_GRAPHEMES: usize = 20;

    pub fn parse(s: String) -> Result<Self, ValidationError> {
        let text = s.trim();
        if text.graphemes(true).count() < Self::MIN_GRAPHEMES {
            return Err(ValidationError::MotivationTooShort {
                min: Self::MIN_GRAPHEMES,
            });
        }
        Ok(Self(text.to_string()))
    }
}

impl AsRef<str> for Motivation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
