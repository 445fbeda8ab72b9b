//! Named, documented service operations
//!
//! An operation is a unit of behavior on a service `S`: it takes arguments
//! `A` and produces `Result<T, E>`, either asynchronously ([`AsyncOperation`])
//! or synchronously ([`SyncOperation`]). Each carries an [`OperationMeta`] so
//! that wrapping keeps a traceable name and documentation.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

/// Name and documentation of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMeta {
    name: Cow<'static, str>,
    doc: Cow<'static, str>,
}

impl OperationMeta {
    pub fn new(name: impl Into<Cow<'static, str>>, doc: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Identity of the always-blocking form: `fetch_async` -> `fetch_async_sync`
    pub(crate) fn blocking(&self) -> Self {
        Self {
            name: format!("{}_sync", self.name).into(),
            doc: format!("Synchronous wrapper for {}.\n\n{}", self.name, self.doc).into(),
        }
    }

    /// Identity of the context-adaptive form: `fetch_async` -> `fetch`
    pub(crate) fn adaptive(&self) -> Self {
        let name = self
            .name
            .strip_suffix("_async")
            .unwrap_or(&self.name)
            .to_string();
        Self {
            name: name.into(),
            doc: format!(
                "Adaptive wrapper for {} that follows the caller's execution context.\n\n\
                 Inside a Tokio runtime: returns a deferred future.\n\
                 Outside a runtime: returns the resolved result.\n\n{}",
                self.name, self.doc
            )
            .into(),
        }
    }
}

impl fmt::Display for OperationMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Shared surface of async and sync operations
///
/// Guards that accept either calling convention are written against this
/// trait and hand back the same shape they were given.
pub trait Operation: Sized {
    /// The service instance the operation runs against
    type Service: ?Sized;
    /// The operation's own error type
    type Error;

    fn meta(&self) -> &OperationMeta;

    /// Whether calling the operation yields a future
    fn is_async(&self) -> bool;

    /// Returns the same operation, identity included, gated by `check`
    ///
    /// When `check` fails the wrapped body is never invoked.
    fn with_precondition<P>(self, check: P) -> Self
    where
        P: Fn(&Self::Service) -> Result<(), Self::Error> + Send + Sync + 'static;
}

type AsyncBody<S, A, T, E> =
    dyn for<'s> Fn(&'s S, A) -> BoxFuture<'s, Result<T, E>> + Send + Sync;

/// An asynchronous operation on a service
pub struct AsyncOperation<S: ?Sized, A, T, E> {
    meta: OperationMeta,
    body: Arc<AsyncBody<S, A, T, E>>,
}

impl<S, A, T, E> AsyncOperation<S, A, T, E>
where
    S: ?Sized + 'static,
    A: 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create an operation from a body returning a boxed future
    ///
    /// ```rust
    /// use futures::FutureExt;
    /// use syfthub_core::{AsyncOperation, CoreError};
    ///
    /// struct Counter(u32);
    ///
    /// let op = AsyncOperation::new("add_async", "Adds to the counter.", |c: &Counter, n: u32| {
    ///     async move { Ok::<_, CoreError>(c.0 + n) }.boxed()
    /// });
    /// assert_eq!(op.name(), "add_async");
    /// ```
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        doc: impl Into<Cow<'static, str>>,
        body: F,
    ) -> Self
    where
        F: for<'s> Fn(&'s S, A) -> BoxFuture<'s, Result<T, E>> + Send + Sync + 'static,
    {
        Self::from_parts(OperationMeta::new(name, doc), body)
    }

    fn from_parts<F>(meta: OperationMeta, body: F) -> Self
    where
        F: for<'s> Fn(&'s S, A) -> BoxFuture<'s, Result<T, E>> + Send + Sync + 'static,
    {
        Self {
            meta,
            body: Arc::new(body),
        }
    }
}

impl<S: ?Sized, A, T, E> AsyncOperation<S, A, T, E> {
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn doc(&self) -> &str {
        self.meta.doc()
    }

    /// Start the operation; nothing runs until the returned future is polled
    pub fn call<'s>(&self, service: &'s S, args: A) -> BoxFuture<'s, Result<T, E>> {
        (self.body)(service, args)
    }
}

impl<S, A, T, E> Operation for AsyncOperation<S, A, T, E>
where
    S: ?Sized + 'static,
    A: 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Service = S;
    type Error = E;

    fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    fn is_async(&self) -> bool {
        true
    }

    fn with_precondition<P>(self, check: P) -> Self
    where
        P: Fn(&S) -> Result<(), E> + Send + Sync + 'static,
    {
        let inner = self.body;
        Self::from_parts(self.meta, move |service: &S, args: A| match check(service) {
            Ok(()) => inner(service, args),
            Err(err) => future::ready(Err(err)).boxed(),
        })
    }
}

impl<S: ?Sized, A, T, E> Clone for AsyncOperation<S, A, T, E> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<S: ?Sized, A, T, E> fmt::Debug for AsyncOperation<S, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

type SyncBody<S, A, T, E> = dyn Fn(&S, A) -> Result<T, E> + Send + Sync;

/// A synchronous operation on a service
pub struct SyncOperation<S: ?Sized, A, T, E> {
    meta: OperationMeta,
    body: Arc<SyncBody<S, A, T, E>>,
}

impl<S, A, T, E> SyncOperation<S, A, T, E>
where
    S: ?Sized + 'static,
    A: 'static,
    T: 'static,
    E: 'static,
{
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        doc: impl Into<Cow<'static, str>>,
        body: F,
    ) -> Self
    where
        F: Fn(&S, A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            meta: OperationMeta::new(name, doc),
            body: Arc::new(body),
        }
    }
}

impl<S: ?Sized, A, T, E> SyncOperation<S, A, T, E> {
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn doc(&self) -> &str {
        self.meta.doc()
    }

    pub fn call(&self, service: &S, args: A) -> Result<T, E> {
        (self.body)(service, args)
    }
}

impl<S, A, T, E> Operation for SyncOperation<S, A, T, E>
where
    S: ?Sized + 'static,
    A: 'static,
    T: 'static,
    E: 'static,
{
    type Service = S;
    type Error = E;

    fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    fn is_async(&self) -> bool {
        false
    }

    fn with_precondition<P>(self, check: P) -> Self
    where
        P: Fn(&S) -> Result<(), E> + Send + Sync + 'static,
    {
        let inner = self.body;
        Self {
            meta: self.meta,
            body: Arc::new(move |service: &S, args: A| {
                check(service)?;
                inner(service, args)
            }),
        }
    }
}

impl<S: ?Sized, A, T, E> Clone for SyncOperation<S, A, T, E> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<S: ?Sized, A, T, E> fmt::Debug for SyncOperation<S, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOperation")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Svc {
        base: u32,
    }

    #[test]
    fn test_blocking_identity() {
        let meta = OperationMeta::new("fetch_async", "Fetches X");
        let blocking = meta.blocking();
        assert_eq!(blocking.name(), "fetch_async_sync");
        assert!(blocking.doc().contains("Fetches X"));
        assert!(blocking.doc().starts_with("Synchronous wrapper for fetch_async."));
    }

    #[test]
    fn test_adaptive_identity() {
        assert_eq!(OperationMeta::new("fetch_async", "").adaptive().name(), "fetch");
        assert_eq!(OperationMeta::new("fetch", "").adaptive().name(), "fetch");
        // Only a trailing suffix is stripped
        assert_eq!(
            OperationMeta::new("async_fetch", "").adaptive().name(),
            "async_fetch"
        );
        assert!(
            OperationMeta::new("fetch_async", "Fetches X")
                .adaptive()
                .doc()
                .contains("Fetches X")
        );
    }

    #[test]
    fn test_sync_precondition_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let op = SyncOperation::new("add", "Adds.", move |svc: &Svc, n: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(svc.base + n)
        });

        let gated = op.clone().with_precondition(|svc: &Svc| {
            if svc.base > 10 {
                Ok(())
            } else {
                Err("too small".to_string())
            }
        });
        assert_eq!(gated.meta(), op.meta());
        assert!(!gated.is_async());

        assert_eq!(gated.call(&Svc { base: 1 }, 2), Err("too small".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(gated.call(&Svc { base: 20 }, 2), Ok(22));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_precondition_never_creates_inner_future() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let op = AsyncOperation::new("add_async", "Adds.", move |svc: &Svc, n: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, String>(svc.base + n) }.boxed()
        });
        let gated = op.with_precondition(|_: &Svc| Err("denied".to_string()));
        assert!(gated.is_async());
        assert_eq!(gated.name(), "add_async");

        let svc = Svc { base: 1 };
        assert_eq!(gated.call(&svc, 1).await, Err("denied".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_shows_name() {
        let op = SyncOperation::new("noop", "", |_: &Svc, ()| Ok::<_, String>(()));
        assert!(format!("{:?}", op).contains("noop"));
    }
}
