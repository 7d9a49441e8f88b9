//! Transaction scope
//!
//! A [`UnitOfWork`] binds one session to one logical operation. It is entered
//! by taking a fresh session from a [`SessionFactory`], exposes the
//! repository bound to that session, and is finished with
//! [`UnitOfWork::exit`], which commits when the scoped body succeeded, rolls
//! back when it failed, and closes the session either way.
//!
//! ```text
//! Idle ──enter──> Active ──exit(Ok)──> Committing ──┐
//!                    │                              ├──> Closed
//!                    └────exit(Err)──> RollingBack ─┘
//! ```
//!
//! A scope dropped while it still holds its session (the request was
//! cancelled or timed out between `enter` and `exit`) hands the session to
//! the runtime, which rolls it back and closes it.

use std::fmt;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::ports::{InstrumentRepository, Session, SessionFactory};

/// Lifecycle of a transaction scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    /// No session acquired yet
    Idle,
    /// Session open, repository calls allowed
    Active,
    /// Scoped body succeeded, commit in flight
    Committing,
    /// Scoped body failed, rollback in flight
    RollingBack,
    /// Session released; terminal
    Closed,
}

/// Owns one session for the duration of one logical operation
pub struct UnitOfWork<S: Session> {
    session: Option<S>,
    state: ScopeState,
}

impl<S: Session> UnitOfWork<S> {
    /// Acquires a fresh session and enters the scope
    ///
    /// # Errors
    ///
    /// Propagates the factory's error, `StoreError::ResourceUnavailable`
    /// when the store cannot provide a session
    pub async fn enter<F>(factory: &F) -> Result<Self, StoreError>
    where
        F: SessionFactory<Session = S>,
    {
        let mut scope = Self {
            session: None,
            state: ScopeState::Idle,
        };
        scope.session = Some(factory.new_session().await?);
        scope.state = ScopeState::Active;
        debug!(state = ?scope.state, "transaction scope entered");
        Ok(scope)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ScopeState {
        self.state
    }

    /// The repository bound to this scope's session
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SessionClosed` once the session has been released
    pub fn instruments(&mut self) -> Result<&mut dyn InstrumentRepository, StoreError> {
        self.session
            .as_mut()
            .map(|session| session.instruments())
            .ok_or(StoreError::SessionClosed)
    }

    /// Finishes the scope with the outcome of its body
    ///
    /// Commits on `Ok`, rolls back on `Err`, then closes the session
    /// regardless of how commit or rollback went.
    ///
    /// # Returns
    ///
    /// On the success path, the commit error if commit failed, otherwise the
    /// close error if closing failed, otherwise the body's value. On the
    /// failure path, always the body's original error; rollback and close
    /// failures are logged.
    pub async fn exit<T, E>(mut self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError> + fmt::Display,
    {
        let result = match outcome {
            Ok(value) => {
                self.state = ScopeState::Committing;
                let committed = match self.session.as_mut() {
                    Some(session) => session.commit().await,
                    None => Err(StoreError::SessionClosed),
                };
                let closed = self.release().await;
                match (committed, closed) {
                    (Err(commit_err), closed) => {
                        if let Err(close_err) = closed {
                            warn!(error = %close_err, "failed to close session after failed commit");
                        }
                        Err(E::from(commit_err))
                    }
                    (Ok(()), Err(close_err)) => Err(E::from(close_err)),
                    (Ok(()), Ok(())) => Ok(value),
                }
            }
            Err(error) => {
                self.state = ScopeState::RollingBack;
                debug!(error = %error, "rolling back transaction scope");
                if let Some(session) = self.session.as_mut() {
                    if let Err(rollback_err) = session.rollback().await {
                        warn!(error = %rollback_err, "rollback failed");
                    }
                }
                if let Err(close_err) = self.release().await {
                    warn!(error = %close_err, "failed to close session after rollback");
                }
                Err(error)
            }
        };
        debug!(state = ?self.state, committed = result.is_ok(), "transaction scope exited");
        result
    }

    async fn release(&mut self) -> Result<(), StoreError> {
        let closed = match self.session.as_mut() {
            Some(session) => session.close().await,
            None => Ok(()),
        };
        self.session = None;
        self.state = ScopeState::Closed;
        closed
    }
}

impl<S: Session> fmt::Debug for UnitOfWork<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("state", &self.state)
            .field("holds_session", &self.session.is_some())
            .finish()
    }
}

impl<S: Session> Drop for UnitOfWork<S> {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        warn!(state = ?self.state, "transaction scope dropped before exit, rolling back");
        self.state = ScopeState::Closed;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.rollback().await {
                        warn!(error = %e, "rollback of abandoned session failed");
                    }
                    if let Err(e) = session.close().await {
                        warn!(error = %e, "close of abandoned session failed");
                    }
                });
            }
            Err(_) => {
                warn!("no async runtime available, abandoned session released on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstrumentError;
    use crate::instrument::InstrumentFilter;
    use crate::ports::mock::{MockSession, MockSessionFactory};

    #[tokio::test]
    async fn test_enter_is_active() {
        let factory = MockSessionFactory::new();
        let scope = UnitOfWork::enter(&factory).await.unwrap();

        assert_eq!(scope.state(), ScopeState::Active);
        let _ = scope.exit::<(), InstrumentError>(Ok(())).await;
    }

    #[tokio::test]
    async fn test_exit_ok_commits_then_closes() {
        let factory = MockSessionFactory::new();
        let mut scope = UnitOfWork::enter(&factory).await.unwrap();
        let outcome = scope
            .instruments()
            .unwrap()
            .find_all(&InstrumentFilter::all())
            .await
            .map_err(InstrumentError::from);

        let rows = scope.exit(outcome).await.unwrap();

        assert!(rows.is_empty());
        assert_eq!(factory.journal().committed(), 1);
        assert_eq!(factory.journal().rolled_back(), 0);
        assert_eq!(factory.journal().closed(), 1);
    }

    #[test]
    fn test_released_scope_reports_closed_session() {
        let mut scope: UnitOfWork<MockSession> = UnitOfWork {
            session: None,
            state: ScopeState::Closed,
        };

        assert!(matches!(scope.instruments(), Err(StoreError::SessionClosed)));
    }
}
