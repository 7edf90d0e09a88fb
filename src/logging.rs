//! Tracing setup for hosts that want the editor's log output.

/// Install a `fmt` subscriber, plus the console panic hook under the
/// `browser` feature. Safe to call more than once.
///
/// # Errors
///
/// Returns an error if a different global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    #[cfg(feature = "browser")]
    console_error_panic_hook::set_once();

    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }
    tracing_subscriber::fmt().with_target(false).without_time().try_init()
}
