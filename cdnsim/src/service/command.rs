//! Simulation commands for the service layer.
//!
//! Commands are the operations external drivers may invoke on the engine.
//! They are fire-and-forget: producers send them to the daemon without
//! waiting for acknowledgment, and the daemon processes them sequentially
//! so every command is atomic with respect to the others.

/// Commands sent by schedulers and UIs to the simulation daemon.
#[derive(Clone, Debug, PartialEq)]
pub enum SimCommand {
    /// Simulate a request for specific content at a specific edge.
    RequestContent {
        /// Catalog item id.
        content_id: u64,
        /// Edge location id.
        location_id: String,
    },

    /// Cache content at an edge on demand.
    CacheContent {
        /// Catalog item id.
        content_id: u64,
        /// Edge location id.
        location_id: String,
    },

    /// Run the popularity re-ranking pass.
    UpdatePopularity,

    /// Run the auto-cache pass for popular content.
    AutoCachePopular,

    /// Simulate a version bump on one random item.
    VersionUpdate,

    /// Ingest one synthesized catalog item.
    AddContent,

    /// Prune the catalog if it exceeds its ceiling.
    Prune,

    /// Restore the seed catalog and zero all metrics.
    Reset,
}

impl SimCommand {
    /// Returns a short name for this command (useful for debugging).
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::RequestContent { .. } => "request_content",
            Self::CacheContent { .. } => "cache_content",
            Self::UpdatePopularity => "update_popularity",
            Self::AutoCachePopular => "auto_cache_popular",
            Self::VersionUpdate => "version_update",
            Self::AddContent => "add_content",
            Self::Prune => "prune",
            Self::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_types() {
        assert_eq!(
            SimCommand::RequestContent {
                content_id: 1,
                location_id: "us-east".to_string()
            }
            .command_type(),
            "request_content"
        );
        assert_eq!(SimCommand::Reset.command_type(), "reset");
        assert_eq!(SimCommand::AddContent.command_type(), "add_content");
    }

    #[test]
    fn test_command_debug_and_clone() {
        let cmd = SimCommand::CacheContent {
            content_id: 4,
            location_id: "eu-west".to_string(),
        };
        let cloned = cmd.clone();
        assert_eq!(cmd, cloned);
        assert!(format!("{:?}", cmd).contains("CacheContent"));
    }
}
