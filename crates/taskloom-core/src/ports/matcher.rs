//! CapabilityMatcher port - decides whether a worker can take a task.
//!
//! # Implementations
//! - **SubstringMatcher**: capability occurs inside the description (default)
//! - **ExactTagMatcher**: capability equals the description

/// CapabilityMatcher compares one capability string with a task description.
///
/// The dispatcher only ever calls `accepts`, so swapping the policy never
/// touches dispatch logic.
pub trait CapabilityMatcher: Send + Sync {
    fn matches(&self, capability: &str, description: &str) -> bool;

    /// Does any of `capabilities` match `description`?
    fn accepts(&self, capabilities: &[String], description: &str) -> bool {
        capabilities
            .iter()
            .any(|capability| self.matches(capability, description))
    }
}
