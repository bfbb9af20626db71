use tracing::info;

/// Surface for short messages the operator must see (alerts in the browser build).
pub trait OperatorNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes operator messages to the log under the `operator` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl OperatorNotifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(target: "operator", "{message}");
    }
}
