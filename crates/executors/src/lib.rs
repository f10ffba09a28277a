//! Capability execution: the registry of named executors and the router
//! that turns detected calls into uniform results.
//!
//! The routing boundary is total. Unknown names, executor errors, panics,
//! and timeouts all come back as failed [`stride_domain::tool::ToolCallResult`]s;
//! nothing a capability does can abort the conversation turn driving it.

pub mod coaching;
pub mod handler;
pub mod registry;
pub mod router;

pub use handler::CapabilityHandler;
pub use registry::ExecutorRegistry;
pub use router::CallRouter;
