pub mod infinite_list;
pub mod table;
pub mod wizard;

pub use infinite_list::{InfiniteList, InfiniteListBuilder, ListFrame, ListStatus, RenderItem};
pub use table::{
    DataTable, DataTableBuilder, PageEvent, SortDirection, SortState, TableBody, TableSource,
};
pub use wizard::{StepStatus, Wizard};
