mod event;
mod session;
mod viewport;

pub use event::{HostKey, TerminalEvent};
pub use session::{Size, Terminal};
pub use viewport::{Viewport, truncate_to_width};
