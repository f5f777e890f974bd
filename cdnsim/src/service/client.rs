//! Command emission layer.
//!
//! The [`SimClient`] provides a fire-and-forget interface for driving the
//! simulation. It's designed to be:
//!
//! - **Cheap to clone**: Backed by a channel sender
//! - **Fire-and-forget**: Never blocks, silently drops if the daemon is gone
//! - **Type-safe**: Convenience methods for each command
//!
//! # Usage
//!
//! ```ignore
//! use cdnsim::service::SimClient;
//!
//! let client: SimClient = ...;
//!
//! // Simulate a request for item 1 at us-east
//! client.request_content(1, "us-east");
//!
//! // Kick off a maintenance pass
//! client.update_popularity();
//! ```

use super::command::SimCommand;
use tokio::sync::mpsc;

/// Client for sending commands to the simulation daemon.
///
/// All methods are fire-and-forget: they never block and silently ignore
/// failures (e.g., if the daemon has shut down). External drivers impose no
/// ordering beyond per-command atomicity, which the daemon guarantees by
/// processing sequentially.
#[derive(Clone)]
pub struct SimClient {
    tx: mpsc::UnboundedSender<SimCommand>,
}

impl SimClient {
    /// Creates a new client with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<SimCommand>) -> Self {
        Self { tx }
    }

    /// Sends a command to the daemon (fire-and-forget).
    #[inline]
    fn send(&self, command: SimCommand) {
        // Ignore send errors - daemon may have shut down
        let _ = self.tx.send(command);
    }

    /// Simulates a request for specific content at a specific edge.
    pub fn request_content(&self, content_id: u64, location_id: impl Into<String>) {
        self.send(SimCommand::RequestContent {
            content_id,
            location_id: location_id.into(),
        });
    }

    /// Caches content at an edge on demand.
    pub fn cache_content(&self, content_id: u64, location_id: impl Into<String>) {
        self.send(SimCommand::CacheContent {
            content_id,
            location_id: location_id.into(),
        });
    }

    /// Runs the popularity re-ranking pass.
    pub fn update_popularity(&self) {
        self.send(SimCommand::UpdatePopularity);
    }

    /// Runs the auto-cache pass for popular content.
    pub fn auto_cache_popular(&self) {
        self.send(SimCommand::AutoCachePopular);
    }

    /// Simulates a version bump on one random item.
    pub fn version_update(&self) {
        self.send(SimCommand::VersionUpdate);
    }

    /// Ingests one synthesized catalog item.
    pub fn add_content(&self) {
        self.send(SimCommand::AddContent);
    }

    /// Prunes the catalog if it exceeds its ceiling.
    pub fn prune(&self) {
        self.send(SimCommand::Prune);
    }

    /// Restores the seed catalog and zeroes all metrics.
    pub fn reset(&self) {
        self.send(SimCommand::Reset);
    }
}

impl std::fmt::Debug for SimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_and_rx() -> (SimClient, mpsc::UnboundedReceiver<SimCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SimClient::new(tx), rx)
    }

    #[test]
    fn typed_methods_send_matching_commands() {
        let (client, mut rx) = client_and_rx();

        client.request_content(1, "us-east");
        client.cache_content(4, "eu-west");
        client.update_popularity();
        client.reset();

        assert_eq!(
            rx.try_recv().unwrap(),
            SimCommand::RequestContent {
                content_id: 1,
                location_id: "us-east".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SimCommand::CacheContent {
                content_id: 4,
                location_id: "eu-west".to_string()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), SimCommand::UpdatePopularity);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Reset);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_daemon_drop_is_silent() {
        let (client, rx) = client_and_rx();
        drop(rx);
        // Must not panic
        client.request_content(1, "us-east");
        client.add_content();
    }

    #[test]
    fn client_is_cloneable() {
        let (client, mut rx) = client_and_rx();
        let clone = client.clone();
        clone.prune();
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Prune);
    }
}
