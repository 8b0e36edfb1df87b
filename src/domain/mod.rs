mod keyword;
mod recipient_batches;
mod subscriber;
mod subscriber_number;

pub use keyword::Keyword;
pub use recipient_batches::{recipient_batches, MAX_RECIPIENTS_PER_MESSAGE};
pub use subscriber::SubscriptionChange;
pub use subscriber_number::SubscriberNumber;
