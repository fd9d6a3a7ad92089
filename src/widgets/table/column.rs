use std::sync::Arc;

use super::cell::Record;

pub type CellRenderer<R> = Arc<dyn Fn(&R) -> String>;

pub struct Column<R> {
    pub field: String,
    pub header: String,
    pub sortable: bool,
    pub hidden: bool,
    pub style: Option<String>,
    body: Option<CellRenderer<R>>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            header: self.header.clone(),
            sortable: self.sortable,
            hidden: self.hidden,
            style: self.style.clone(),
            body: self.body.clone(),
        }
    }
}

impl<R: Record> Column<R> {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            sortable: false,
            hidden: false,
            style: None,
            body: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&R) -> String + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn render(&self, row: &R) -> String {
        match &self.body {
            Some(body) => body(row),
            None => row.field(self.field.as_str()).to_text(),
        }
    }
}
