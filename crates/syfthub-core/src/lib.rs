//! # syfthub-core
//!
//! Shared building blocks for SyftHub SDK service clients.
//!
//! Service methods in the SDK are written once, as async operations, and then
//! decorated with the behavior every call site needs:
//!
//! - **Guards** - refuse to run unless the local SyftBox runtime is up
//!   ([`ensure_runtime_running`]) or the account has been set up
//!   ([`require_authorization`]).
//! - **Bridge** - run the same async operation from plain synchronous code
//!   ([`make_blocking`]) or let the caller's context decide
//!   ([`make_adaptive`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::FutureExt;
//! use syfthub_core::{
//!     AsyncOperation, CoreError, DatasiteClient, ServiceContext, ensure_runtime_running,
//!     make_adaptive, require_authorization,
//! };
//!
//! type Service = ServiceContext<DatasiteClient>;
//!
//! let list = AsyncOperation::new(
//!     "list_datasites_async",
//!     "Lists the datasites visible to the local runtime.",
//!     |service: &Service, ()| {
//!         async move { service.client().datasites().await }.boxed()
//!     },
//! );
//! let list = make_adaptive(require_authorization(ensure_runtime_running(list)));
//! assert_eq!(list.name(), "list_datasites");
//!
//! let client = DatasiteClient::new("/home/alice/SyftBox", "alice@example.org");
//! let service = ServiceContext::new(client).with_account_configured(true);
//!
//! // Outside a Tokio runtime the call resolves on a private worker thread.
//! let names: Result<Vec<String>, CoreError> = list.call_blocking(&service, ());
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod guards;
pub mod operation;
pub mod service;

pub use bridge::{
    AdaptiveOperation, BlockingOperation, BridgeOptions, Dispatched, in_async_context,
    make_adaptive, make_blocking, run_blocking, run_blocking_with,
};
pub use config::{Config, ConfigError};
pub use error::{CoreError, Result};
pub use guards::{
    AccountAware, RuntimeAware, RuntimeClient, check_account, check_runtime,
    ensure_runtime_running, require_authorization,
};
pub use operation::{AsyncOperation, Operation, OperationMeta, SyncOperation};
pub use service::{DatasiteClient, ServiceContext};
