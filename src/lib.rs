pub mod core;
pub mod task;
pub mod terminal;
pub mod widgets;

pub use core::controller;
pub use core::error;
pub use core::external;
pub use core::options;
pub use core::scroll;
pub use core::state;
pub use core::window;

pub use widgets::infinite_list;
pub use widgets::table;
pub use widgets::wizard;
