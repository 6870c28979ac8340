//! Network message handling
//!
//! Maps named inbound events onto typed messages and sends the local paddle
//! state back out. Connect/disconnect belongs to the channel implementation.

use crate::config::MalformedPolicy;
use crate::error::ClientError;
use proto::{Position, ProtoError, C2S, S2C};
use tokio::sync::mpsc::UnboundedSender;

pub use proto::INBOUND_EVENTS;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("send failed: {0}")]
    Send(String),
}

// Abstract outbound side of the named-event channel
pub trait Channel {
    fn emit(&mut self, event: &str, payload: String) -> Result<(), ChannelError>;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn emit(&mut self, event: &str, payload: String) -> Result<(), ChannelError> {
        (**self).emit(event, payload)
    }
}

/// Outbound events forwarded to a transport task
impl Channel for UnboundedSender<(String, String)> {
    fn emit(&mut self, event: &str, payload: String) -> Result<(), ChannelError> {
        self.send((event.to_string(), payload)).map_err(|_| ChannelError::Closed)
    }
}

/// Decode an inbound event under the configured malformed-message policy.
///
/// `Ok(None)` means the message was dropped.
pub fn decode_inbound(
    event: &str,
    payload: &str,
    policy: MalformedPolicy,
) -> Result<Option<S2C>, ProtoError> {
    match S2C::decode(event, payload) {
        Ok(msg) => Ok(Some(msg)),
        Err(err) => match policy {
            MalformedPolicy::Strict => Err(err),
            MalformedPolicy::Lenient => {
                log::warn!("Dropping inbound `{}`: {}", event, err);
                Ok(None)
            }
        },
    }
}

/// Send the local player's post-tick state
pub fn emit_position<C: Channel + ?Sized>(
    channel: &mut C,
    position: Position,
) -> Result<(), ClientError> {
    let (event, payload) = C2S::Position(position).encode()?;
    channel.emit(event, payload)?;
    Ok(())
}
