mod heartbeat;
pub use heartbeat::Heartbeat;

mod callback;
pub use callback::CallbackReporter;

#[cfg(test)]
mod tests;
