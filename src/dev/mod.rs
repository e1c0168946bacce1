/// Development utilities module
///
/// Simulated data sources for running the interface without an API key.
pub mod mock_provider;

pub use mock_provider::MockProvider;
