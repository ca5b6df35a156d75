mod error;
pub use error::{ExecError, ExecResult};

mod util;

#[cfg(feature = "shell")]
pub mod shell;
#[cfg(feature = "shell")]
pub use shell::ShellTask;

pub mod prelude {
    #[cfg(feature = "shell")]
    pub use crate::ShellTask;
    pub use crate::error::{ExecError, ExecResult};
}
