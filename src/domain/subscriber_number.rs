/// E.164 caps a phone number at 15 digits, country code included.
const MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberNumber(String);

impl SubscriberNumber {
    /// Accepts an optional leading `+` followed by up to 15 digits.
    /// Only the digits are kept, so `+31612345678` and `31612345678`
    /// name the same subscriber.
    pub fn parse(s: String) -> Result<SubscriberNumber, String> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let is_empty = digits.is_empty();
        let is_too_long = digits.len() > MAX_DIGITS;
        let has_non_digits = !digits.chars().all(|c| c.is_ascii_digit());

        if is_empty || is_too_long || has_non_digits {
            Err(format!("{} is not a valid subscriber number.", s))
        } else {
            Ok(Self(digits.to_string()))
        }
    }
}

impl AsRef<str> for SubscriberNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
