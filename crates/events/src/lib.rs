//! Event mechanics: the event contract, sinks, and an in-memory bus.
//!
//! Nothing here knows about inventory; the ledger crates supply the payloads.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod sink;

pub use bus::{EventBus, EventSink, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use sink::{CallbackSink, NullSink};
