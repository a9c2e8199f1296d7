//! The [`AlertSink`] capability and its permission model.
//!
//! The scheduler never touches the platform notification API directly. It
//! talks to an injected sink, so the real platform integration and the test
//! doubles share one contract.

use anyhow::Result;
use async_trait::async_trait;
use log::info;

/// Platform notification permission, as reported by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionState {
    /// The user has allowed notifications; `present` will be honored.
    Granted,
    /// The user has refused; presentation is skipped silently.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
            PermissionState::Undetermined => write!(f, "undetermined"),
        }
    }
}

impl std::str::FromStr for PermissionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "granted" => Ok(PermissionState::Granted),
            "denied" => Ok(PermissionState::Denied),
            "undetermined" | "default" => Ok(PermissionState::Undetermined),
            _ => Err(anyhow::anyhow!("Invalid permission state: {}", s)),
        }
    }
}

/// The platform capability that surfaces alerts to the user.
///
/// `permission` and `present` are synchronous: the platform either shows the
/// alert or it does not, promptly. Only `request_permission` is async because
/// it waits on a user decision.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Current permission state, read without prompting the user.
    fn permission(&self) -> PermissionState;

    /// Prompt the user for notification permission and return the resulting
    /// state. Implementations should be idempotent when already decided.
    async fn request_permission(&self) -> PermissionState;

    /// Surface `message` as a platform alert.
    fn present(&self, message: &str) -> Result<()>;
}

/// Request permission once if the user has not decided yet.
///
/// Hosts call this at startup so the prompt appears before the first firing,
/// not in the middle of one. Already-decided states are returned as-is.
pub async fn ensure_permission(sink: &dyn AlertSink) -> PermissionState {
    match sink.permission() {
        PermissionState::Undetermined => {
            let state = sink.request_permission().await;
            info!("Notification permission resolved to {state}");
            state
        }
        decided => decided,
    }
}

/// Shared test double: scripted permission state, recorded presentations.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct StubSink {
        state: AtomicU8,
        pub presented: Mutex<Vec<String>>,
        pub permission_requests: AtomicUsize,
        /// State the stub switches to after a permission request.
        grant_on_request: bool,
    }

    impl StubSink {
        pub fn new(state: PermissionState) -> Self {
            Self {
                state: AtomicU8::new(Self::encode(state)),
                presented: Mutex::new(Vec::new()),
                permission_requests: AtomicUsize::new(0),
                grant_on_request: true,
            }
        }

        fn encode(state: PermissionState) -> u8 {
            match state {
                PermissionState::Granted => 0,
                PermissionState::Denied => 1,
                PermissionState::Undetermined => 2,
            }
        }

        fn decode(raw: u8) -> PermissionState {
            match raw {
                0 => PermissionState::Granted,
                1 => PermissionState::Denied,
                _ => PermissionState::Undetermined,
            }
        }

        pub fn presented_messages(&self) -> Vec<String> {
            self.presented.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AlertSink for StubSink {
        fn permission(&self) -> PermissionState {
            Self::decode(self.state.load(Ordering::SeqCst))
        }

        async fn request_permission(&self) -> PermissionState {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            if self.grant_on_request {
                self.state
                    .store(Self::encode(PermissionState::Granted), Ordering::SeqCst);
            }
            self.permission()
        }

        fn present(&self, message: &str) -> Result<()> {
            self.presented.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubSink;
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_permission_state_display() {
        assert_eq!(PermissionState::Granted.to_string(), "granted");
        assert_eq!(PermissionState::Denied.to_string(), "denied");
        assert_eq!(PermissionState::Undetermined.to_string(), "undetermined");
    }

    #[test]
    fn test_permission_state_parse() {
        assert_eq!(
            "granted".parse::<PermissionState>().unwrap(),
            PermissionState::Granted
        );
        assert_eq!(
            "DENIED".parse::<PermissionState>().unwrap(),
            PermissionState::Denied
        );
        // Browsers report the unasked state as "default"
        assert_eq!(
            "default".parse::<PermissionState>().unwrap(),
            PermissionState::Undetermined
        );
        assert!("maybe".parse::<PermissionState>().is_err());
    }

    #[tokio::test]
    async fn test_ensure_permission_prompts_only_when_undetermined() {
        let sink = StubSink::new(PermissionState::Undetermined);
        let state = ensure_permission(&sink).await;
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(sink.permission_requests.load(Ordering::SeqCst), 1);

        // Already decided: no further prompt
        let state = ensure_permission(&sink).await;
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(sink.permission_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ensure_permission_leaves_denied_alone() {
        let sink = StubSink::new(PermissionState::Denied);
        let state = ensure_permission(&sink).await;
        assert_eq!(state, PermissionState::Denied);
        assert_eq!(sink.permission_requests.load(Ordering::SeqCst), 0);
    }
}
