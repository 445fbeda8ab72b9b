//! Sync/async call bridge
//!
//! SDK methods are implemented once, as async operations. The bridge lets the
//! same operation be called from:
//!
//! - async code, where the caller drives the future on its own runtime, and
//! - plain synchronous code, where the operation is run to completion on a
//!   private worker thread with its own current-thread Tokio runtime.
//!
//! The worker thread is created and torn down per call, so a blocking call
//! never interferes with a runtime already running on the calling thread.
//!
//! # Calling conventions
//!
//! [`make_blocking`] always blocks. [`make_adaptive`] probes the caller's
//! context on each call: inside a runtime it hands back an unstarted future,
//! outside one it blocks and returns the value. Since a static type cannot
//! change with the caller's context, the adaptive call returns a
//! [`Dispatched`], and [`AdaptiveOperation`] also exposes the two explicit
//! entry points `call_async` and `call_blocking`.
//!
//! Blocking calls have no cancellation. Without a timeout in
//! [`BridgeOptions`] a hung operation hangs the calling thread.

use std::borrow::Cow;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::thread;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tracing::{debug, trace};

use crate::config::BridgeConfig;
use crate::error::CoreError;
use crate::operation::{AsyncOperation, OperationMeta};

/// Default name given to bridge worker threads
pub const DEFAULT_THREAD_NAME: &str = "syfthub-bridge";

/// Report whether the calling thread is inside a Tokio runtime context
///
/// Never panics: no active runtime simply means "not in an async context".
pub fn in_async_context() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Settings for blocking calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Name of the per-call worker thread
    pub thread_name: Cow<'static, str>,
    /// Upper bound on a blocking call; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            thread_name: Cow::Borrowed(DEFAULT_THREAD_NAME),
            timeout: None,
        }
    }
}

impl BridgeOptions {
    pub fn with_thread_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&BridgeConfig> for BridgeOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            thread_name: Cow::Owned(config.thread_name.clone()),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Run an async computation to completion from synchronous code
///
/// See [`run_blocking_with`].
pub fn run_blocking<F, Fut>(make: F) -> Result<Fut::Output, CoreError>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future,
    Fut::Output: Send,
{
    run_blocking_with(&BridgeOptions::default(), make)
}

/// Run an async computation to completion on a dedicated worker thread
///
/// `make` is invoked on the worker, so the future it returns may borrow from
/// the caller's stack and does not need to be `Send`. The calling thread
/// blocks until the worker's runtime has driven the future to completion and
/// been shut down.
///
/// A panic inside the computation is re-raised on the calling thread with its
/// original payload.
///
/// When `options.timeout` elapses the future is dropped and the worker
/// runtime is shut down without waiting for tasks still running on its
/// blocking pool, so the call returns [`CoreError::Timeout`] promptly.
pub fn run_blocking_with<F, Fut>(
    options: &BridgeOptions,
    make: F,
) -> Result<Fut::Output, CoreError>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future,
    Fut::Output: Send,
{
    let timeout = options.timeout;

    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name(options.thread_name.to_string())
            .spawn_scoped(scope, move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(CoreError::RuntimeBuild)?;
                trace!("Bridge worker runtime started");

                let output = match timeout {
                    Some(limit) => {
                        match runtime
                            .block_on(async move { tokio::time::timeout(limit, make()).await })
                        {
                            Ok(output) => output,
                            Err(_) => {
                                // Dropping would wait on work parked in the blocking pool
                                runtime.shutdown_background();
                                trace!("Bridge worker runtime abandoned after timeout");
                                return Err(CoreError::Timeout(limit));
                            }
                        }
                    }
                    None => runtime.block_on(make()),
                };

                drop(runtime);
                trace!("Bridge worker runtime shut down");
                Ok(output)
            })
            .map_err(CoreError::WorkerSpawn)?;

        match worker.join() {
            Ok(output) => output,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    })
}

/// An async operation adapted to always block until it completes
pub struct BlockingOperation<S: ?Sized, A, T, E> {
    meta: OperationMeta,
    inner: AsyncOperation<S, A, T, E>,
    options: BridgeOptions,
}

/// Adapt an async operation so that calling it blocks and returns the result
///
/// The adapted operation is named `<name>_sync`.
pub fn make_blocking<S: ?Sized, A, T, E>(
    operation: AsyncOperation<S, A, T, E>,
) -> BlockingOperation<S, A, T, E> {
    BlockingOperation {
        meta: operation_meta(&operation).blocking(),
        inner: operation,
        options: BridgeOptions::default(),
    }
}

impl<S: ?Sized, A, T, E> BlockingOperation<S, A, T, E> {
    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn doc(&self) -> &str {
        self.meta.doc()
    }

    /// The operation this one adapts
    pub fn inner(&self) -> &AsyncOperation<S, A, T, E> {
        &self.inner
    }
}

impl<S, A, T, E> BlockingOperation<S, A, T, E>
where
    S: Sync + ?Sized,
    A: Send,
    T: Send,
    E: From<CoreError> + Send,
{
    /// Run the operation to completion and return its result
    ///
    /// Errors raised by the operation are returned unchanged; bridge failures
    /// are converted into `E`.
    pub fn call(&self, service: &S, args: A) -> Result<T, E> {
        let inner = &self.inner;
        run_blocking_with(&self.options, move || inner.call(service, args))?
    }
}

impl<S: ?Sized, A, T, E> fmt::Debug for BlockingOperation<S, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingOperation")
            .field("meta", &self.meta)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Outcome of an adaptive call
///
/// `Deferred` holds an unstarted future the caller must await; `Ready` holds
/// the result of a call that already ran to completion. Both can be awaited.
#[must_use = "a deferred call does nothing unless awaited"]
pub enum Dispatched<'a, T, E> {
    Deferred(BoxFuture<'a, Result<T, E>>),
    Ready(Result<T, E>),
}

impl<'a, T, E> Dispatched<'a, T, E> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Dispatched::Deferred(_))
    }

    /// The result of a call that already completed, if any
    pub fn into_ready(self) -> Option<Result<T, E>> {
        match self {
            Dispatched::Ready(result) => Some(result),
            Dispatched::Deferred(_) => None,
        }
    }
}

impl<'a, T, E> IntoFuture for Dispatched<'a, T, E>
where
    T: Send + 'a,
    E: Send + 'a,
{
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'a, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Dispatched::Deferred(pending) => pending,
            Dispatched::Ready(result) => future::ready(result).boxed(),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Dispatched<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Deferred(_) => f.write_str("Deferred(..)"),
            Dispatched::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
        }
    }
}

/// An async operation adapted to the caller's execution context
pub struct AdaptiveOperation<S: ?Sized, A, T, E> {
    meta: OperationMeta,
    inner: BlockingOperation<S, A, T, E>,
}

/// Adapt an async operation to defer inside a runtime and block outside one
///
/// The adapted operation drops a trailing `_async` from its name.
///
/// "Inside a runtime" means a Tokio runtime context is entered on the calling
/// thread. That includes threads started with `spawn_blocking`, where there
/// is no scheduler to poll the deferred future; call
/// [`AdaptiveOperation::call_blocking`] from there instead.
pub fn make_adaptive<S: ?Sized, A, T, E>(
    operation: AsyncOperation<S, A, T, E>,
) -> AdaptiveOperation<S, A, T, E> {
    AdaptiveOperation {
        meta: operation_meta(&operation).adaptive(),
        inner: make_blocking(operation),
    }
}

impl<S: ?Sized, A, T, E> AdaptiveOperation<S, A, T, E> {
    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.inner = self.inner.with_options(options);
        self
    }

    pub fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn doc(&self) -> &str {
        self.meta.doc()
    }

    /// Always return the unstarted future
    pub fn call_async<'s>(&self, service: &'s S, args: A) -> BoxFuture<'s, Result<T, E>> {
        self.inner.inner().call(service, args)
    }
}

impl<S, A, T, E> AdaptiveOperation<S, A, T, E>
where
    S: Sync + ?Sized,
    A: Send,
    T: Send,
    E: From<CoreError> + Send,
{
    /// Always block until the operation completes
    pub fn call_blocking(&self, service: &S, args: A) -> Result<T, E> {
        self.inner.call(service, args)
    }

    /// Defer inside a Tokio runtime, block outside one
    ///
    /// A `spawn_blocking` thread counts as inside the runtime and gets
    /// [`Dispatched::Deferred`]. Synchronous code running there should use
    /// [`call_blocking`](Self::call_blocking).
    pub fn call<'s>(&self, service: &'s S, args: A) -> Dispatched<'s, T, E> {
        if in_async_context() {
            debug!(operation = %self.meta, "Async context detected, deferring call");
            Dispatched::Deferred(self.call_async(service, args))
        } else {
            debug!(operation = %self.meta, "No async context, running call on bridge worker");
            Dispatched::Ready(self.call_blocking(service, args))
        }
    }
}

impl<S: ?Sized, A, T, E> fmt::Debug for AdaptiveOperation<S, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveOperation")
            .field("meta", &self.meta)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

fn operation_meta<S: ?Sized, A, T, E>(operation: &AsyncOperation<S, A, T, E>) -> OperationMeta {
    OperationMeta::new(operation.name().to_string(), operation.doc().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_outside_runtime() {
        assert!(!in_async_context());
    }

    #[tokio::test]
    async fn test_probe_inside_runtime() {
        assert!(in_async_context());
    }

    #[test]
    fn test_run_blocking_borrows_caller_state() {
        let words = vec!["a".to_string(), "bc".to_string()];
        let total = run_blocking(|| async {
            tokio::task::yield_now().await;
            words.iter().map(String::len).sum::<usize>()
        })
        .unwrap();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_run_blocking_uses_named_worker() {
        let options = BridgeOptions::default().with_thread_name("bridge-test");
        let name = run_blocking_with(&options, || async {
            thread::current().name().map(str::to_string)
        })
        .unwrap();
        assert_eq!(name.as_deref(), Some("bridge-test"));
        assert_ne!(thread::current().name(), Some("bridge-test"));
    }

    #[test]
    fn test_worker_runs_inside_its_own_runtime() {
        let inside = run_blocking(|| async { in_async_context() }).unwrap();
        assert!(inside);
        assert!(!in_async_context());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_blocking_from_inside_runtime() {
        let value = run_blocking(|| async { 41 + 1 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_timeout() {
        let options = BridgeOptions::default().with_timeout(Duration::from_millis(20));
        let err = run_blocking_with(&options, || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_timeout_does_not_wait_for_blocking_pool() {
        let options = BridgeOptions::default().with_timeout(Duration::from_millis(50));
        let started = std::time::Instant::now();
        let err = run_blocking_with(&options, || async {
            tokio::task::spawn_blocking(|| thread::sleep(Duration::from_secs(3))).await
        })
        .unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_is_reraised_on_caller() {
        let _: Result<(), _> = run_blocking(|| async { panic!("boom") });
    }

    #[test]
    fn test_options_from_config() {
        let config = BridgeConfig {
            thread_name: "cfg-worker".to_string(),
            timeout_secs: Some(3),
        };
        let options = BridgeOptions::from(&config);
        assert_eq!(options.thread_name, "cfg-worker");
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_dispatched_debug() {
        let ready: Dispatched<'_, u8, ()> = Dispatched::Ready(Ok(1));
        assert_eq!(format!("{:?}", ready), "Ready(Ok(1))");
        assert!(!ready.is_deferred());
        assert_eq!(ready.into_ready(), Some(Ok(1)));
    }
}
