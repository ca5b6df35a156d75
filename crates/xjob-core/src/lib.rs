pub mod error;
pub use error::CoreError;

pub mod task;
pub use task::{TaskContext, TaskFn, TaskOutcome, TaskRef, Task};

pub mod registry;
pub use registry::TaskRegistry;

pub mod cancel;
pub use cancel::CancelHandle;

pub mod runs;
pub use runs::{RunId, RunRegistry, RunningTask};

pub mod admission;
pub use admission::{Resolution, resolve};

pub mod events;
pub use events::{RejectReason, RunEvent, Subscribe};

pub mod executor;
pub use executor::{Executor, NoopReporter, Reporter};

mod sync;
