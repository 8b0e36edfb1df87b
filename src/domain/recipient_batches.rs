/// Largest recipient list the gateway accepts in a single call.
pub const MAX_RECIPIENTS_PER_MESSAGE: usize = 50;

/// Splits `recipients` into consecutive batches of at most
/// [`MAX_RECIPIENTS_PER_MESSAGE`], keeping their order.
pub fn recipient_batches<T>(recipients: &[T]) -> std::slice::Chunks<'_, T> {
    recipients.chunks(MAX_RECIPIENTS_PER_MESSAGE)
}
