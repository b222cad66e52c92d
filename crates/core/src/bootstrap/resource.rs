use super::Bootstrap;

/// Application resource run once during bootstrap.
///
/// A resource reads its options, builds whatever it is responsible for,
/// publishes it into the bootstrap's container and returns it.
pub trait Resource {
    /// What `init` hands back to the caller
    type Output;

    /// Failures raised while building; propagated untouched
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resource name for identification and logging
    fn name(&self) -> &'static str;

    /// Build and publish the resource
    fn init(&self, bootstrap: &Bootstrap) -> Result<Self::Output, Self::Error>;

    /// Resource description
    fn description(&self) -> Option<&'static str> {
        None
    }
}
