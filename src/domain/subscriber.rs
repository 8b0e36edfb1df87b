use crate::domain::Keyword;

/// State change triggered by an inbound keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionChange {
    Created,
    Resubscribed,
    Unsubscribed,
}

impl SubscriptionChange {
    /// Applies `keyword` to the stored flag of a subscriber, `None` when the
    /// number is unknown. Returns `None` when nothing should change.
    pub fn decide(current: Option<bool>, keyword: Keyword) -> Option<Self> {
        match (current, keyword) {
            (None, Keyword::Subscribe) => Some(Self::Created),
            (Some(false), Keyword::Subscribe) => Some(Self::Resubscribed),
            (Some(true), Keyword::Stop) => Some(Self::Unsubscribed),
            _ => None,
        }
    }

    pub fn subscribed(&self) -> bool {
        !matches!(self, Self::Unsubscribed)
    }

    pub fn reply(&self) -> &'static str {
        match self {
            Self::Created => {
                "Thanks for subscribing to our list! \
                Send STOP anytime if you no longer want to receive messages from us."
            }
            Self::Resubscribed => {
                "Thanks for re-subscribing to our list! \
                Send STOP anytime if you no longer want to receive messages from us."
            }
            Self::Unsubscribed => {
                "Sorry to see you go! You will not receive further marketing messages from us."
            }
        }
    }
}
