pub mod controller;
pub mod error;
pub mod external;
pub mod options;
pub mod scroll;
pub mod state;
pub mod window;

pub use controller::{
    ControllerMode, DEFAULT_PAGE_SIZE, LoadOutcome, PagedController, SkipReason, StateChange,
    StateListener,
};
pub use error::{ConfigError, FetchError};
pub use external::{ExternalController, ExternalState};
pub use options::ListOptions;
pub use scroll::{DEFAULT_THRESHOLD, ScrollHost, ScrollMetrics, ScrollSubscription, is_near_bottom};
pub use state::PagedState;
pub use window::{WindowStrategy, page_count, page_window, prefix_window};
