mod cell;
mod column;
mod filter;
mod paginator;
mod selection;

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::controller::{LoadOutcome, PagedController, SkipReason};
use crate::core::error::ConfigError;
use crate::core::scroll::ScrollMetrics;
use filter::Matcher;

pub use cell::{CellValue, Record};
pub use column::{CellRenderer, Column};
pub use filter::FilterMatchMode;
pub use paginator::Paginator;
pub use selection::{RowKey, Selection, SelectionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Header click order on one field: ascending, descending, unsorted.
    fn cycled(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Asc),
            Some(Self::Asc) => Some(Self::Desc),
            Some(Self::Desc) => None,
        }
    }
}

pub const DEFAULT_EMPTY_MESSAGE: &str = "No records found";
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

/// Sort request reported to `on_sort`. `direction` is `None` when the third
/// click on a field restores the original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent {
    pub first: usize,
    pub rows: usize,
}

/// What the table body shows in place of, or as, its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Loading(String),
    Empty(String),
    Rows(Vec<Vec<String>>),
}

pub enum TableSource<R> {
    Rows(Vec<R>),
    Paged(PagedController<R>),
}

type SortHandler = Box<dyn FnMut(&SortState)>;
type SelectionHandler<R> = Box<dyn FnMut(&Selection<R>)>;
type SearchHandler = Box<dyn FnMut(&str)>;
type PageHandler = Box<dyn FnMut(&PageEvent)>;

pub struct DataTableBuilder<R> {
    columns: Vec<Column<R>>,
    source: TableSource<R>,
    paginator_rows: Option<usize>,
    selection_mode: SelectionMode,
    row_key: Option<RowKey<R>>,
    column_toggle: bool,
    match_mode: FilterMatchMode,
    on_sort: Option<SortHandler>,
    on_selection_change: Option<SelectionHandler<R>>,
    on_search: Option<SearchHandler>,
    on_page: Option<PageHandler>,
    empty_message: String,
    loading_message: String,
    loading: bool,
}

impl<R: Record + Clone + Send + 'static> DataTableBuilder<R> {
    pub fn new(source: TableSource<R>) -> Self {
        Self {
            columns: Vec::new(),
            source,
            paginator_rows: None,
            selection_mode: SelectionMode::None,
            row_key: None,
            column_toggle: false,
            match_mode: FilterMatchMode::default(),
            on_sort: None,
            on_selection_change: None,
            on_search: None,
            on_page: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            loading_message: DEFAULT_LOADING_MESSAGE.to_string(),
            loading: false,
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn on_page<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&PageEvent) + 'static,
    {
        self.on_page = Some(Box::new(handler));
        self
    }

    pub fn with_column(mut self, column: Column<R>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_paginator(mut self, rows: usize) -> Self {
        self.paginator_rows = Some(rows);
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn with_row_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&R) -> String + 'static,
    {
        self.row_key = Some(Arc::new(key));
        self
    }

    pub fn with_column_toggle(mut self, enabled: bool) -> Self {
        self.column_toggle = enabled;
        self
    }

    pub fn with_match_mode(mut self, mode: FilterMatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn on_sort<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&SortState) + 'static,
    {
        self.on_sort = Some(Box::new(handler));
        self
    }

    pub fn on_selection_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&Selection<R>) + 'static,
    {
        self.on_selection_change = Some(Box::new(handler));
        self
    }

    pub fn on_search<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.on_search = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<DataTable<R>, ConfigError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.field.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.field.clone()));
            }
        }
        if self.selection_mode != SelectionMode::None && self.row_key.is_none() {
            return Err(ConfigError::MissingRowKey(self.selection_mode.name()));
        }
        let paginator = match self.paginator_rows {
            Some(0) => return Err(ConfigError::InvalidPageSize(0)),
            Some(rows) => Some(Paginator::new(rows)),
            None => None,
        };

        Ok(DataTable {
            columns: self.columns,
            source: self.source,
            paginator,
            selection: Selection::for_mode(self.selection_mode),
            selection_mode: self.selection_mode,
            row_key: self.row_key,
            column_toggle: self.column_toggle,
            sort: None,
            search: String::new(),
            match_mode: self.match_mode,
            matcher: Matcher::All,
            on_sort: self.on_sort,
            on_selection_change: self.on_selection_change,
            on_search: self.on_search,
            on_page: self.on_page,
            empty_message: self.empty_message,
            loading_message: self.loading_message,
            loading: self.loading,
        })
    }
}

pub struct DataTable<R> {
    columns: Vec<Column<R>>,
    source: TableSource<R>,
    paginator: Option<Paginator>,
    selection_mode: SelectionMode,
    selection: Selection<R>,
    row_key: Option<RowKey<R>>,
    column_toggle: bool,
    sort: Option<SortState>,
    search: String,
    match_mode: FilterMatchMode,
    matcher: Matcher,
    on_sort: Option<SortHandler>,
    on_selection_change: Option<SelectionHandler<R>>,
    on_search: Option<SearchHandler>,
    on_page: Option<PageHandler>,
    empty_message: String,
    loading_message: String,
    loading: bool,
}

impl<R: Record + Clone + Send + 'static> DataTable<R> {
    pub fn with_rows(rows: Vec<R>) -> DataTableBuilder<R> {
        DataTableBuilder::new(TableSource::Rows(rows))
    }

    pub fn with_controller(controller: PagedController<R>) -> DataTableBuilder<R> {
        DataTableBuilder::new(TableSource::Paged(controller))
    }

    pub fn columns(&self) -> &[Column<R>] {
        self.columns.as_slice()
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter().filter(|column| !column.hidden)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.visible_columns()
            .map(|column| column.header.as_str())
            .collect()
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    pub fn paginator(&self) -> Option<&Paginator> {
        self.paginator.as_ref()
    }

    pub fn selection(&self) -> &Selection<R> {
        &self.selection
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    fn data(&self) -> &[R] {
        match &self.source {
            TableSource::Rows(rows) => rows.as_slice(),
            TableSource::Paged(controller) => controller.items(),
        }
    }

    /// Rows after search and sort, across all pages.
    pub fn processed_rows(&self) -> Vec<&R> {
        let mut rows: Vec<&R> = self
            .data()
            .iter()
            .filter(|row| self.row_matches(row))
            .collect();

        if let Some(SortState {
            field,
            direction: Some(direction),
        }) = &self.sort
        {
            let field = field.as_str();
            rows.sort_by(|a, b| {
                let (left, right) = (a.field(field), b.field(field));
                match (left.is_empty(), right.is_empty(), *direction) {
                    (false, false, SortDirection::Desc) => right.compare(&left),
                    _ => left.compare(&right),
                }
            });
        }
        rows
    }

    pub fn total_records(&self) -> usize {
        self.processed_rows().len()
    }

    /// Rows on the current page, or every processed row without a paginator.
    pub fn visible_rows(&self) -> Vec<&R> {
        let rows = self.processed_rows();
        match &self.paginator {
            Some(paginator) => {
                let (start, end) = paginator.window(rows.len());
                rows[start..end].to_vec()
            }
            None => rows,
        }
    }

    pub fn render_row(&self, row: &R) -> Vec<String> {
        self.visible_columns()
            .map(|column| column.render(row))
            .collect()
    }

    fn row_matches(&self, row: &R) -> bool {
        if self.matcher.is_all() {
            return true;
        }
        self.visible_columns()
            .any(|column| self.matcher.matches(column.render(row).as_str()))
    }

    /// Sorts by `field`. Repeating the same field goes ascending, descending,
    /// then back to the original order.
    pub fn sort_by(&mut self, field: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|column| column.field == field && column.sortable);
        if !sortable {
            return false;
        }
        let current = match &self.sort {
            Some(current) if current.field == field => current.direction,
            _ => None,
        };
        let state = SortState {
            field: field.to_string(),
            direction: SortDirection::cycled(current),
        };
        if let Some(handler) = self.on_sort.as_mut() {
            handler(&state);
        }
        self.sort = state.direction.is_some().then_some(state);
        true
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn set_search(&mut self, query: impl Into<String>) -> Result<(), ConfigError> {
        let query = query.into();
        self.matcher = Matcher::compile(query.as_str(), self.match_mode)?;
        if let Some(paginator) = self.paginator.as_mut() {
            paginator.reset();
        }
        if let Some(handler) = self.on_search.as_mut() {
            handler(query.as_str());
        }
        self.search = query;
        Ok(())
    }

    pub fn toggle_column(&mut self, field: &str) -> bool {
        if !self.column_toggle {
            return false;
        }
        let Some(column) = self.columns.iter_mut().find(|column| column.field == field) else {
            return false;
        };
        column.hidden = !column.hidden;
        true
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.total_records();
        let moved = self
            .paginator
            .as_mut()
            .is_some_and(|paginator| paginator.go_to_page(page, total));
        self.notify_page(moved)
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.total_records();
        let moved = self
            .paginator
            .as_mut()
            .is_some_and(|paginator| paginator.next(total));
        self.notify_page(moved)
    }

    pub fn previous_page(&mut self) -> bool {
        let total = self.total_records();
        let moved = self
            .paginator
            .as_mut()
            .is_some_and(|paginator| paginator.previous(total));
        self.notify_page(moved)
    }

    fn notify_page(&mut self, moved: bool) -> bool {
        if !moved {
            return false;
        }
        let (Some(paginator), Some(handler)) = (self.paginator.as_ref(), self.on_page.as_mut())
        else {
            return true;
        };
        handler(&PageEvent {
            first: paginator.first(),
            rows: paginator.rows(),
        });
        true
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// True while the caller flagged the table as loading or the backing
    /// controller has a page request in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
            || self
                .controller()
                .is_some_and(|controller| controller.state().is_loading())
    }

    pub fn empty_message(&self) -> &str {
        self.empty_message.as_str()
    }

    /// Rendered body for the current page. The loading row replaces the body
    /// when the caller flagged loading, or when a backing controller is
    /// fetching before any row is materialized; a scroll-mode table keeps its
    /// rows while a further page loads.
    pub fn body(&self) -> TableBody {
        let rows = self.visible_rows();
        let fetching_first = self.is_loading() && self.data().is_empty();
        if self.loading || fetching_first {
            return TableBody::Loading(self.loading_message.clone());
        }
        if rows.is_empty() {
            return TableBody::Empty(self.empty_message.clone());
        }
        TableBody::Rows(rows.into_iter().map(|row| self.render_row(row)).collect())
    }

    /// Row click. Returns whether the row is selected afterwards.
    pub fn toggle_row(&mut self, row: &R) -> bool {
        let Some(key) = self.row_key.clone() else {
            return false;
        };
        let selected = self.selection.toggle(self.selection_mode, key.as_ref(), row);
        self.notify_selection();
        selected
    }

    pub fn toggle_visible_row(&mut self, index: usize) -> bool {
        let Some(row) = self.visible_rows().get(index).map(|row| (*row).clone()) else {
            return false;
        };
        self.toggle_row(&row)
    }

    pub fn is_selected(&self, row: &R) -> bool {
        let Some(key) = self.row_key.as_ref() else {
            return false;
        };
        self.selection.contains_key(key.as_ref(), key(row).as_str())
    }

    /// Selects the whole processed data set. Multiple and checkbox modes only.
    pub fn select_all(&mut self) -> bool {
        if !self.selection_mode.is_multi() {
            return false;
        }
        let rows = self.processed_rows().into_iter().cloned().collect();
        self.selection = Selection::Many(rows);
        self.notify_selection();
        true
    }

    pub fn toggle_all(&mut self) -> bool {
        if !self.selection_mode.is_multi() {
            return false;
        }
        if self.selection.len() == self.total_records() && !self.selection.is_empty() {
            self.clear_selection();
            false
        } else {
            self.select_all()
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::for_mode(self.selection_mode);
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        if let Some(handler) = self.on_selection_change.as_mut() {
            handler(&self.selection);
        }
    }

    pub fn on_scroll_sample(&mut self, metrics: Option<ScrollMetrics>) -> LoadOutcome {
        match &mut self.source {
            TableSource::Paged(controller) => controller.on_scroll_sample(metrics),
            TableSource::Rows(_) => LoadOutcome::Skipped(SkipReason::Exhausted),
        }
    }

    pub fn poll(&mut self) -> usize {
        match &mut self.source {
            TableSource::Paged(controller) => controller.poll(),
            TableSource::Rows(_) => 0,
        }
    }

    pub fn controller(&self) -> Option<&PagedController<R>> {
        match &self.source {
            TableSource::Paged(controller) => Some(controller),
            TableSource::Rows(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellValue, Column, DEFAULT_EMPTY_MESSAGE, DEFAULT_LOADING_MESSAGE, DataTable,
        FilterMatchMode, PageEvent, Selection, SelectionMode, SortDirection, TableBody,
    };
    use crate::core::controller::{LoadOutcome, PagedController};
    use crate::core::error::{ConfigError, FetchError};
    use crate::task::PageRequest;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};
    use crate::core::scroll::ScrollMetrics;
    use indexmap::IndexMap;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Row = IndexMap<String, CellValue>;

    fn person(id: i64, name: &str, age: Option<i64>) -> Row {
        let mut row = IndexMap::new();
        row.insert("id".to_string(), CellValue::Number(id));
        row.insert("name".to_string(), CellValue::from(name));
        row.insert(
            "age".to_string(),
            age.map(CellValue::Number).unwrap_or_default(),
        );
        row
    }

    fn people() -> Vec<Row> {
        vec![
            person(1, "Ada", Some(36)),
            person(2, "grace", Some(45)),
            person(3, "Linus", None),
            person(4, "Barbara", Some(29)),
        ]
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|row| row["name"].to_text()).collect()
    }

    fn columns(builder: super::DataTableBuilder<Row>) -> super::DataTableBuilder<Row> {
        builder
            .with_column(Column::new("id", "ID"))
            .with_column(Column::new("name", "Name").sortable())
            .with_column(Column::new("age", "Age").sortable())
    }

    fn key(row: &Row) -> String {
        row["id"].to_text()
    }

    #[test]
    fn sort_toggles_direction_and_keeps_empty_cells_last() {
        let sorts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sorts);
        let mut table = columns(DataTable::with_rows(people()))
            .on_sort(move |state| sink.borrow_mut().push(state.clone()))
            .build()
            .expect("table");

        assert!(table.sort_by("age"));
        assert_eq!(
            names(&table.visible_rows()),
            ["Barbara", "Ada", "grace", "Linus"]
        );
        assert!(table.sort_by("age"));
        assert_eq!(
            names(&table.visible_rows()),
            ["grace", "Ada", "Barbara", "Linus"]
        );
        assert_eq!(
            table.sort_state().map(|s| s.direction),
            Some(Some(SortDirection::Desc))
        );

        assert!(table.sort_by("name"));
        assert_eq!(
            names(&table.visible_rows()),
            ["Ada", "Barbara", "grace", "Linus"]
        );
        assert!(!table.sort_by("id"));
        assert_eq!(sorts.borrow().len(), 3);
    }

    #[test]
    fn third_click_on_a_field_restores_original_order() {
        let sorts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sorts);
        let mut table = columns(DataTable::with_rows(people()))
            .on_sort(move |state| sink.borrow_mut().push(state.direction))
            .build()
            .expect("table");

        for _ in 0..3 {
            assert!(table.sort_by("name"));
        }
        assert_eq!(
            sorts.borrow().as_slice(),
            [
                Some(SortDirection::Asc),
                Some(SortDirection::Desc),
                None
            ]
        );
        assert!(table.sort_state().is_none());
        assert_eq!(
            names(&table.visible_rows()),
            ["Ada", "grace", "Linus", "Barbara"]
        );

        assert!(table.sort_by("name"));
        assert_eq!(
            table.sort_state().map(|s| s.direction),
            Some(Some(SortDirection::Asc))
        );
    }

    #[test]
    fn page_moves_report_first_and_rows() {
        let pages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pages);
        let mut table = columns(DataTable::with_rows(people()))
            .with_paginator(3)
            .on_page(move |event| sink.borrow_mut().push(*event))
            .build()
            .expect("table");

        assert!(!table.previous_page());
        assert!(table.next_page());
        assert!(!table.next_page());
        assert!(table.go_to_page(0));
        assert!(!table.go_to_page(0));
        assert_eq!(
            pages.borrow().as_slice(),
            [
                PageEvent { first: 3, rows: 3 },
                PageEvent { first: 0, rows: 3 }
            ]
        );
    }

    #[test]
    fn body_shows_empty_message_when_nothing_matches() {
        let mut table = columns(DataTable::with_rows(people()))
            .build()
            .expect("table");
        table.set_search("nobody").expect("search");
        assert_eq!(table.body(), TableBody::Empty(DEFAULT_EMPTY_MESSAGE.to_string()));

        let mut custom = DataTable::with_rows(Vec::<Row>::new())
            .with_column(Column::new("id", "ID"))
            .with_empty_message("Nothing here")
            .build()
            .expect("table");
        assert_eq!(custom.empty_message(), "Nothing here");
        assert_eq!(custom.body(), TableBody::Empty("Nothing here".to_string()));

        custom.set_loading(true);
        assert!(custom.is_loading());
        assert_eq!(custom.body(), TableBody::Loading(DEFAULT_LOADING_MESSAGE.to_string()));
    }

    #[test]
    fn loading_flag_swaps_body_for_loading_row() {
        let mut table = columns(DataTable::with_rows(people()))
            .with_loading(true)
            .with_loading_message("fetching")
            .build()
            .expect("table");
        assert_eq!(table.body(), TableBody::Loading("fetching".to_string()));

        table.set_loading(false);
        let TableBody::Rows(rows) = table.body() else {
            panic!("expected rows");
        };
        assert_eq!(rows[0], ["1", "Ada", "36"]);
    }

    #[test]
    fn scroll_mode_reports_controller_loading() {
        let (tx, rx) = mpsc::channel::<Vec<Value>>();
        let rx = Mutex::new(rx);
        let fetcher = move |_request: PageRequest| -> Result<Vec<Value>, FetchError> {
            let rx = rx.lock().map_err(|_| FetchError::failed("poisoned"))?;
            rx.recv().map_err(|_| FetchError::failed("closed"))
        };
        let mut controller = PagedController::deferred(fetcher, 2).expect("controller");
        controller.request_next_page();
        let mut table = DataTable::with_controller(controller)
            .with_column(Column::new("label", "Label"))
            .build()
            .expect("table");
        assert!(table.is_loading());
        assert_eq!(table.body(), TableBody::Loading(DEFAULT_LOADING_MESSAGE.to_string()));

        tx.send(vec![json!({"label": "a"}), json!({"label": "b"})])
            .expect("release");
        let deadline = Instant::now() + Duration::from_secs(5);
        while table.poll() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!table.is_loading());
        assert_eq!(
            table.body(),
            TableBody::Rows(vec![vec!["a".to_string()], vec!["b".to_string()]])
        );
    }

    #[test]
    fn search_filters_visible_columns_and_resets_page() {
        let searches = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&searches);
        let mut table = columns(DataTable::with_rows(people()))
            .with_paginator(2)
            .with_column_toggle(true)
            .on_search(move |query| sink.borrow_mut().push(query.to_string()))
            .build()
            .expect("table");

        assert!(table.next_page());
        assert_eq!(names(&table.visible_rows()), ["Linus", "Barbara"]);

        table.set_search("A").expect("search");
        assert_eq!(table.paginator().map(|p| p.first()), Some(0));
        assert_eq!(table.total_records(), 3);
        assert_eq!(names(&table.visible_rows()), ["Ada", "grace"]);

        table.set_search("45").expect("search");
        assert_eq!(names(&table.visible_rows()), ["grace"]);
        assert!(table.toggle_column("age"));
        assert!(table.visible_rows().is_empty());
        assert_eq!(table.headers(), ["ID", "Name"]);

        assert_eq!(searches.borrow().as_slice(), ["A", "45"]);
    }

    #[test]
    fn regex_search_and_invalid_pattern() {
        let mut table = columns(DataTable::with_rows(people()))
            .with_match_mode(FilterMatchMode::Regex)
            .build()
            .expect("table");
        table.set_search("^(ada|linus)$").expect("search");
        assert_eq!(names(&table.visible_rows()), ["Ada", "Linus"]);
        assert!(matches!(
            table.set_search("[oops"),
            Err(ConfigError::InvalidPattern(_))
        ));
        assert_eq!(table.search(), "^(ada|linus)$");
    }

    #[test]
    fn column_toggle_is_opt_in() {
        let mut table = columns(DataTable::with_rows(people()))
            .build()
            .expect("table");
        assert!(!table.toggle_column("age"));
        assert_eq!(table.headers(), ["ID", "Name", "Age"]);
    }

    #[test]
    fn build_validates_configuration() {
        let duplicate = DataTable::with_rows(people())
            .with_column(Column::new("id", "ID"))
            .with_column(Column::new("id", "Again"))
            .build();
        assert!(matches!(duplicate, Err(ConfigError::DuplicateColumn(f)) if f == "id"));

        let keyless = columns(DataTable::with_rows(people()))
            .with_selection_mode(SelectionMode::Checkbox)
            .build();
        assert!(matches!(keyless, Err(ConfigError::MissingRowKey("checkbox"))));
    }

    #[test]
    fn single_selection_yields_one_row() {
        let mut table = columns(DataTable::with_rows(people()))
            .with_selection_mode(SelectionMode::Single)
            .with_row_key(key)
            .build()
            .expect("table");
        assert_eq!(table.selection(), &Selection::Empty);

        assert!(table.toggle_visible_row(1));
        assert_eq!(table.selection(), &Selection::One(person(2, "grace", Some(45))));
        assert!(table.toggle_visible_row(0));
        assert_eq!(table.selection().len(), 1);
        assert!(!table.toggle_visible_row(0));
        assert_eq!(table.selection(), &Selection::Empty);
        assert!(!table.select_all());
    }

    #[test]
    fn multiple_selection_changes_by_one_and_selects_all() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        for mode in [SelectionMode::Multiple, SelectionMode::Checkbox] {
            let sink = Rc::clone(&sink);
            let mut table = columns(DataTable::with_rows(people()))
                .with_selection_mode(mode)
                .with_row_key(key)
                .on_selection_change(move |selection| sink.borrow_mut().push(selection.len()))
                .build()
                .expect("table");
            assert_eq!(table.selection(), &Selection::Many(Vec::new()));

            table.toggle_visible_row(0);
            table.toggle_visible_row(2);
            assert_eq!(table.selection().len(), 2);
            assert!(table.is_selected(&person(3, "renamed", None)));
            table.toggle_visible_row(0);
            assert_eq!(table.selection().len(), 1);

            table.set_search("a").expect("search");
            assert!(table.select_all());
            assert_eq!(table.selection().len(), 3);
            assert!(!table.toggle_all());
            assert!(table.selection().is_empty());
        }
        assert_eq!(changes.borrow().as_slice(), [1, 2, 1, 3, 0, 1, 2, 1, 3, 0]);
    }

    #[test]
    fn custom_body_renderer_is_used_for_display_and_search() {
        let mut table = DataTable::with_rows(people())
            .with_column(Column::new("name", "Name").with_body(|row: &Row| {
                format!("<{}>", row["name"].to_text())
            }))
            .build()
            .expect("table");
        let rows = table.visible_rows();
        assert_eq!(table.render_row(rows[0]), ["<Ada>"]);
        table.set_search("<lin").expect("search");
        assert_eq!(table.total_records(), 1);
    }

    #[test]
    fn scroll_mode_table_grows_from_controller() {
        let rows: Vec<Value> = (0..25).map(|i| json!({"id": i, "label": format!("r{i}")})).collect();
        let controller = PagedController::eager(rows, 10).expect("controller");
        let mut table = DataTable::with_controller(controller)
            .with_column(Column::new("label", "Label"))
            .build()
            .expect("table");
        assert_eq!(table.visible_rows().len(), 10);

        let outcome = table.on_scroll_sample(Some(ScrollMetrics::new(400.0, 1000.0, 600.0)));
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                page: 1,
                appended: 10
            }
        );
        assert_eq!(table.visible_rows().len(), 20);
        assert_eq!(table.render_row(table.visible_rows()[19]), ["r19"]);
        assert!(table.controller().is_some_and(|c| c.state().has_more()));
    }
}
