/// Command carried by an inbound SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Subscribe,
    Stop,
    Other,
}

impl Keyword {
    /// Matching ignores case and surrounding whitespace.
    pub fn parse(payload: &str) -> Self {
        match payload.trim().to_lowercase().as_str() {
            "subscribe" => Keyword::Subscribe,
            "stop" => Keyword::Stop,
            _ => Keyword::Other,
        }
    }
}
