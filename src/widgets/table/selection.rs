use std::sync::Arc;

pub type RowKey<R> = Arc<dyn Fn(&R) -> String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    Single,
    Multiple,
    Checkbox,
}

impl SelectionMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Checkbox => "checkbox",
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(self, Self::Multiple | Self::Checkbox)
    }
}

/// Single mode holds at most one row; multiple and checkbox modes hold a
/// list, possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<R> {
    Empty,
    One(R),
    Many(Vec<R>),
}

impl<R> Selection<R> {
    pub(super) fn for_mode(mode: SelectionMode) -> Self {
        if mode.is_multi() {
            Self::Many(Vec::new())
        } else {
            Self::Empty
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> &[R] {
        match self {
            Self::Empty => &[],
            Self::One(row) => std::slice::from_ref(row),
            Self::Many(rows) => rows.as_slice(),
        }
    }

    pub fn contains_key(&self, key: &dyn Fn(&R) -> String, wanted: &str) -> bool {
        self.rows().iter().any(|row| key(row) == wanted)
    }
}

impl<R: Clone> Selection<R> {
    /// Flips membership of `row`, compared by key. Returns whether the row is
    /// selected afterwards.
    pub(super) fn toggle(&mut self, mode: SelectionMode, key: &dyn Fn(&R) -> String, row: &R) -> bool {
        let wanted = key(row);
        match mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let already = matches!(self, Self::One(current) if key(current) == wanted);
                if already {
                    *self = Self::Empty;
                    false
                } else {
                    *self = Self::One(row.clone());
                    true
                }
            }
            SelectionMode::Multiple | SelectionMode::Checkbox => {
                if !matches!(self, Self::Many(_)) {
                    *self = Self::Many(Vec::new());
                }
                let Self::Many(rows) = self else {
                    return false;
                };
                if let Some(pos) = rows.iter().position(|current| key(current) == wanted) {
                    rows.remove(pos);
                    false
                } else {
                    rows.push(row.clone());
                    true
                }
            }
        }
    }
}
