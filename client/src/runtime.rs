//! Async session driver
//!
//! Runs a [`PredictiveClient`] on the current task. The only await points are the
//! next scheduler deadline and the next inbound event, so a tick always completes
//! before an inbound message is applied and vice versa.

use crate::{Channel, ClientError, PredictiveClient, RenderSink};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

/// Inbound `(event, payload)` pairs from the transport
pub type Inbound = UnboundedReceiver<(String, String)>;

/// Drive the session until the inbound channel closes.
///
/// `epoch` is the session start; client time is measured from it. Errors from
/// inbound events (malformed payloads under the strict policy) go to `on_error`
/// and the session keeps running. When the channel closes the tick loop is
/// stopped and pending emissions are cancelled.
pub async fn run<C, R, F>(
    client: &mut PredictiveClient<C, R>,
    mut inbound: Inbound,
    epoch: Instant,
    mut on_error: F,
) where
    C: Channel,
    R: RenderSink,
    F: FnMut(ClientError),
{
    loop {
        let deadline = client.next_deadline().map(|offset| epoch + offset);
        let wake = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            event = inbound.recv() => match event {
                Some((event, payload)) => {
                    client.advance_to(epoch.elapsed());
                    if let Err(err) = client.handle_event(&event, &payload) {
                        log::error!("Inbound `{}` rejected: {}", event, err);
                        on_error(err);
                    }
                }
                None => {
                    log::info!(
                        "Channel closed at tick {}, ending session",
                        client.store().tick_count()
                    );
                    client.shutdown();
                    return;
                }
            },
            _ = wake => {
                client.advance_to(epoch.elapsed());
            }
        }
    }
}
