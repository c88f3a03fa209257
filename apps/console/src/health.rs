use std::fmt;

use tracing::{info, warn};

use crate::api_client::{HealthResponse, RecruiterBackend};

/// Passive backend connectivity indicator. Never blocks anything else.
#[derive(Debug, Clone, Default)]
pub enum Connectivity {
    #[default]
    Checking,
    Connected(HealthResponse),
    Disconnected(String),
}

impl Connectivity {
    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Checking => "Checking...",
            Connectivity::Connected(_) => "Connected",
            Connectivity::Disconnected(_) => "Disconnected",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Connectivity::Connected(_))
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// GET /health once. Any 2xx body counts as connected regardless of the
/// reported `status` string or individual service flags.
pub async fn probe(backend: &dyn RecruiterBackend) -> Connectivity {
    match backend.check_health().await {
        Ok(health) => {
            info!(
                status = %health.status,
                version = %health.version,
                llm = health.services.llm,
                web_search = health.services.web_search,
                "backend reachable"
            );
            Connectivity::Connected(health)
        }
        Err(e) => {
            warn!("backend health check failed: {e}");
            Connectivity::Disconnected(e.to_string())
        }
    }
}
