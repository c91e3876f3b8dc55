//! Port interface for the host application

/// The application embedding the pipeline.
///
/// Only used on unrecoverable session failure, to send the user to the
/// unauthenticated entry point.
pub trait SessionHost: Send + Sync {
    /// Path the host is currently showing (e.g. `/orders?page=2`).
    fn current_path(&self) -> String;

    /// Navigate the host to `path`.
    fn navigate(&self, path: &str);
}
