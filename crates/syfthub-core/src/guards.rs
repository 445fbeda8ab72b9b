//! Precondition guards for service operations
//!
//! Services advertise what the guards need through two capability traits:
//! [`RuntimeAware`] for the client of the local runtime, and
//! [`AccountAware`] for the account setup flag. Both are checked before the
//! wrapped operation is invoked; on failure the operation never runs.

use std::sync::Arc;

use tracing::debug;

use crate::error::CoreError;
use crate::operation::{AsyncOperation, Operation};

/// Handle to a locally running service daemon
pub trait RuntimeClient: Send + Sync {
    /// True when the runtime's local endpoint exists
    fn is_running(&self) -> bool;
}

impl<C: RuntimeClient + ?Sized> RuntimeClient for &C {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

impl<C: RuntimeClient + ?Sized> RuntimeClient for Box<C> {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

impl<C: RuntimeClient + ?Sized> RuntimeClient for Arc<C> {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

/// A service instance that carries a runtime client
pub trait RuntimeAware {
    type Client: RuntimeClient + ?Sized;

    fn runtime_client(&self) -> &Self::Client;
}

/// A service instance that tracks whether account setup has completed
pub trait AccountAware {
    /// Defaults to `false` for services that never configure an account
    fn account_configured(&self) -> bool {
        false
    }
}

/// Fail with [`CoreError::RuntimeNotRunning`] unless the service's runtime is up
pub fn check_runtime<S: RuntimeAware + ?Sized>(service: &S) -> Result<(), CoreError> {
    if service.runtime_client().is_running() {
        Ok(())
    } else {
        Err(CoreError::runtime_not_running())
    }
}

/// Fail with [`CoreError::Authentication`] unless account setup has completed
pub fn check_account<S: AccountAware + ?Sized>(service: &S) -> Result<(), CoreError> {
    if service.account_configured() {
        Ok(())
    } else {
        Err(CoreError::account_not_configured())
    }
}

/// Gate an async operation on the local runtime being up
///
/// The readiness check runs on every call, before the wrapped body. When it
/// fails the call resolves to `CoreError::RuntimeNotRunning` converted into
/// the operation's error type.
pub fn ensure_runtime_running<S, A, T, E>(
    operation: AsyncOperation<S, A, T, E>,
) -> AsyncOperation<S, A, T, E>
where
    S: RuntimeAware + ?Sized + 'static,
    A: 'static,
    T: Send + 'static,
    E: From<CoreError> + Send + 'static,
{
    let name = operation.name().to_string();
    operation.with_precondition(move |service: &S| {
        check_runtime(service).map_err(|err| {
            debug!(operation = %name, "Refusing call: local runtime is not running");
            E::from(err)
        })
    })
}

/// Gate an operation, sync or async, on account setup having completed
///
/// Returns the same calling convention it was given.
pub fn require_authorization<O>(operation: O) -> O
where
    O: Operation,
    O::Service: AccountAware + 'static,
    O::Error: From<CoreError>,
{
    let name = operation.meta().name().to_string();
    operation.with_precondition(move |service: &O::Service| {
        check_account(service).map_err(|err| {
            debug!(operation = %name, "Refusing call: account is not configured");
            <O::Error as From<CoreError>>::from(err)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SyncOperation;

    struct Flag(bool);

    impl RuntimeClient for Flag {
        fn is_running(&self) -> bool {
            self.0
        }
    }

    struct Svc {
        client: Arc<dyn RuntimeClient>,
        configured: bool,
    }

    impl RuntimeAware for Svc {
        type Client = dyn RuntimeClient;

        fn runtime_client(&self) -> &Self::Client {
            self.client.as_ref()
        }
    }

    impl AccountAware for Svc {
        fn account_configured(&self) -> bool {
            self.configured
        }
    }

    struct Unconfigured;

    impl AccountAware for Unconfigured {}

    fn svc(running: bool, configured: bool) -> Svc {
        Svc {
            client: Arc::new(Flag(running)),
            configured,
        }
    }

    #[test]
    fn test_check_runtime() {
        assert!(check_runtime(&svc(true, false)).is_ok());
        let err = check_runtime(&svc(false, false)).unwrap_err();
        assert!(err.is_runtime_not_running());
    }

    #[test]
    fn test_check_account() {
        assert!(check_account(&svc(false, true)).is_ok());
        assert!(check_account(&svc(true, false)).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_account_flag_defaults_to_false() {
        assert!(!Unconfigured.account_configured());
        assert!(check_account(&Unconfigured).unwrap_err().is_unauthorized());
    }

    fn probe<C: RuntimeClient>(client: C) -> bool {
        client.is_running()
    }

    #[test]
    fn test_runtime_client_through_pointers() {
        let flag = Flag(true);
        assert!(probe(&flag));
        assert!(probe(Box::new(Flag(true))));
        assert!(!probe(Arc::new(Flag(false))));
    }

    #[test]
    fn test_require_authorization_keeps_sync_shape() {
        let op = SyncOperation::new("count", "Counts.", |_: &Svc, n: u32| {
            Ok::<_, CoreError>(n * 2)
        });
        let guarded = require_authorization(op);
        assert!(!guarded.is_async());
        assert_eq!(guarded.meta().name(), "count");

        assert_eq!(guarded.call(&svc(false, true), 4).unwrap(), 8);
        assert!(guarded.call(&svc(true, false), 4).unwrap_err().is_unauthorized());
    }
}
