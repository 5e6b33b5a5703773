pub mod deque;
pub mod event;
pub mod search;
pub mod source;
pub mod window;

pub use deque::RingDeque;
pub use event::{DequeEvent, ModelEvent, ModelProperty, Subscribers};
pub use search::{SearchMatch, SearchOutcome, SearchState};
pub use source::{open_file, LineSource, StreamSource};
pub use window::{LinePosition, ReadAhead, ReadAheadReport, ReadAheadStatus, WindowModel};

pub use tokio_util::sync::CancellationToken;
