use crate::notify::Notifier;

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("No progressive stream available")]
    NoStreamAvailable,
}

/// Picks the requested resolution when the video offers it, otherwise warns
/// once and falls back to the last entry of `available`. Callers pass the
/// progressive resolutions in ascending order, so the fallback is the best
/// quality the video has.
pub fn resolve(
    requested: &str,
    available: &[String],
    notifier: &dyn Notifier,
) -> Result<String, ResolveError> {
    match available.last() {
        None => Err(ResolveError::NoStreamAvailable),
        Some(_) if available.iter().any(|r| r == requested) => Ok(requested.to_string()),
        Some(fallback) => {
            notifier.warning(&format!(
                "Requested resolution {} is not available, downloading {}",
                requested, fallback
            ));
            Ok(fallback.clone())
        }
    }
}
