//! The processing capability invoked for every inbound chat message.

use std::future::Future;

use castbot_protocol::Message;

/// Turns a received `CHAT` message into an optional reply.
///
/// Called once per chat message, possibly many times concurrently, so
/// implementations must be safe to share across tasks. Returning `None`
/// means nothing is sent back. Failures are expressed as `None` too; the
/// session has no recovery path for a processor that panics.
pub trait MessageProcessor: Send + Sync + 'static {
    fn process(&self, input: Message) -> impl Future<Output = Option<Message>> + Send;
}

impl<F> MessageProcessor for F
where
    F: Fn(Message) -> Option<Message> + Send + Sync + 'static,
{
    async fn process(&self, input: Message) -> Option<Message> {
        self(input)
    }
}
