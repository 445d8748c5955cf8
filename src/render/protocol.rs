//! Protocol definitions shared between the render coordinator and the fetch worker.

use crate::directory::User;
use crate::error::UserlookError;
use serde::Deserialize;

/// Identifier attached to fetch requests so responses can be correlated.
///
/// Ids are issued from a monotonic counter, so a larger id always means a more recent request.
pub type RequestId = u64;

/// How the coordinator treats responses that arrive out of issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOrdering {
    /// Apply only the response to the most recently issued request.
    #[default]
    Latest,
    /// Apply every successful response as it arrives; the last one to land wins.
    Arrival,
}

impl ResponseOrdering {
    /// Parse the name used on the command line and in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "latest" => Some(Self::Latest),
            "arrival" => Some(Self::Arrival),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Arrival => "arrival",
        }
    }
}

/// Commands sent from the render coordinator to the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    Fetch { request_id: RequestId, filter: String },
    Shutdown,
}

/// Responses emitted by the fetch worker back to the coordinator.
#[derive(Debug)]
pub enum FetchResponse {
    UsersLoaded {
        request_id: RequestId,
        filter: String,
        users: Vec<User>,
    },
    Failed {
        request_id: RequestId,
        filter: String,
        error: UserlookError,
    },
}

impl FetchResponse {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::UsersLoaded { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }

    pub fn filter(&self) -> &str {
        match self {
            Self::UsersLoaded { filter, .. } | Self::Failed { filter, .. } => filter,
        }
    }
}
