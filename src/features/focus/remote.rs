//! Contract with the store of record.

use async_trait::async_trait;

use super::session::Session;
use crate::error::PomosyncError;

/// Read access to the authoritative session store.
///
/// Implementations report transport failures as
/// `PomosyncError::RemoteUnavailable`. A successful `None` means the user has
/// no active session, which is a normal state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the user's current session snapshot.
    async fn fetch_active_session(&self) -> Result<Option<Session>, PomosyncError>;
}
