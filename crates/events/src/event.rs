use chrono::{DateTime, Utc};

/// A notification payload carried by sinks and buses.
///
/// Implementors describe a change that has already happened, so they are never
/// mutated after construction. `event_type` plus `version` identify the payload
/// schema for consumers that persist or forward it.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, e.g. `inventory.updated`.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Time of the change itself, not of delivery.
    fn occurred_at(&self) -> DateTime<Utc>;
}
