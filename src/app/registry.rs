//! Cookie-keyed registry of independent workbenches.

use crate::app::workbench::Workbench;
use crate::constants::{MAX_SESSIONS, SESSION_IDLE_TIMEOUT};
use crate::settings::Settings;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Shared handle to one session's workbench
pub type SharedWorkbench = Arc<Mutex<Workbench>>;

struct SessionEntry {
    workbench: SharedWorkbench,
    last_access: Instant,
}

/// Maps session ids to workbenches; sessions never share mutable state
///
/// Sessions idle longer than the timeout are dropped on the next lookup, and
/// the least recently used one is dropped when the registry is full.
pub struct SessionRegistry {
    settings: Settings,
    idle_timeout: Duration,
    max_sessions: usize,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(settings: Settings) -> Self {
        Self::with_limits(settings, SESSION_IDLE_TIMEOUT, MAX_SESSIONS)
    }

    pub fn with_limits(settings: Settings, idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            settings,
            idle_timeout,
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Workbench for `cookie`, creating a new session when the cookie is
    /// absent, malformed, unknown or expired. Returns the id actually used.
    pub fn resolve(&self, cookie: Option<&str>) -> (Uuid, SharedWorkbench) {
        let requested = cookie.and_then(|c| Uuid::parse_str(c.trim()).ok());
        let now = Instant::now();
        let mut sessions = self.sessions.lock();

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) < self.idle_timeout);
        if sessions.len() < before {
            tracing::info!(expired = before - sessions.len(), "Dropped idle sessions");
        }

        if let Some(id) = requested
            && let Some(entry) = sessions.get_mut(&id)
        {
            entry.last_access = now;
            return (id, entry.workbench.clone());
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session = %oldest, "Evicted least recently used session");
        }

        let id = Uuid::new_v4();
        let workbench = Arc::new(Mutex::new(Workbench::new(&self.settings)));
        sessions.insert(
            id,
            SessionEntry {
                workbench: workbench.clone(),
                last_access: now,
            },
        );
        tracing::info!(session = %id, total = sessions.len(), "Created session");
        (id, workbench)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
