#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
    Cancelled,
}

type SubmitHandler<S> = Box<dyn FnMut(&[S])>;

/// Linear step sequencer. Steps before the current one are `Done`, the current
/// one is `Active` (or `Cancelled`), the rest are `Pending`.
pub struct Wizard<S> {
    steps: Vec<S>,
    current: usize,
    statuses: Vec<StepStatus>,
    finished: bool,
    on_submit: Option<SubmitHandler<S>>,
}

impl<S> Wizard<S> {
    pub fn new(steps: Vec<S>) -> Self {
        let mut statuses = vec![StepStatus::Pending; steps.len()];
        if let Some(first) = statuses.first_mut() {
            *first = StepStatus::Active;
        }

        Self {
            steps,
            current: 0,
            statuses,
            finished: false,
            on_submit: None,
        }
    }

    /// Called once with every step when the last step is finished.
    pub fn on_submit<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&[S]) + 'static,
    {
        self.on_submit = Some(Box::new(handler));
        self
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_step(&self) -> Option<&S> {
        self.steps.get(self.current)
    }

    pub fn current_step_mut(&mut self) -> Option<&mut S> {
        self.steps.get_mut(self.current)
    }

    pub fn step_at(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.statuses
            .get(index)
            .copied()
            .unwrap_or(StepStatus::Pending)
    }

    pub fn current_status(&self) -> StepStatus {
        self.status_at(self.current)
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    pub fn is_last(&self) -> bool {
        !self.steps.is_empty() && !self.has_next()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn advance(&mut self) -> bool {
        if self.finished || !self.has_next() {
            return false;
        }
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        if self.finished || !self.has_previous() {
            return false;
        }
        self.go_to(self.current - 1)
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if self.finished || index >= self.steps.len() || index == self.current {
            return false;
        }
        for (position, status) in self.statuses.iter_mut().enumerate() {
            *status = match position.cmp(&index) {
                std::cmp::Ordering::Less => StepStatus::Done,
                std::cmp::Ordering::Equal => StepStatus::Active,
                std::cmp::Ordering::Greater => StepStatus::Pending,
            };
        }
        log::debug!("wizard step {} -> {}", self.current, index);
        self.current = index;
        true
    }

    pub fn cancel_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Cancelled;
        }
    }

    /// Marks the last step done. Only valid from the last step.
    pub fn finish(&mut self) -> bool {
        if self.finished || !self.is_last() {
            return false;
        }
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Done;
        }
        self.finished = true;
        log::info!("wizard finished after {} steps", self.steps.len());
        if let Some(handler) = self.on_submit.as_mut() {
            handler(self.steps.as_slice());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{StepStatus, Wizard};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn statuses(wizard: &Wizard<&str>) -> Vec<StepStatus> {
        (0..wizard.len()).map(|i| wizard.status_at(i)).collect()
    }

    #[test]
    fn walks_forward_and_back() {
        use StepStatus::*;
        let mut wizard = Wizard::new(vec!["account", "profile", "confirm"]);
        assert_eq!(statuses(&wizard), [Active, Pending, Pending]);

        assert!(wizard.advance());
        assert!(wizard.advance());
        assert!(!wizard.advance());
        assert!(wizard.is_last());
        assert_eq!(statuses(&wizard), [Done, Done, Active]);

        assert!(wizard.previous());
        assert_eq!(wizard.current_step(), Some(&"profile"));
        assert_eq!(statuses(&wizard), [Done, Active, Pending]);

        assert!(wizard.go_to(0));
        assert_eq!(statuses(&wizard), [Active, Pending, Pending]);
        assert!(!wizard.go_to(3));
    }

    #[test]
    fn finish_only_from_last_step_and_submits_once() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&submitted);
        let mut wizard = Wizard::new(vec![1, 2])
            .on_submit(move |steps: &[i32]| sink.borrow_mut().push(steps.to_vec()));
        assert!(!wizard.finish());
        assert!(submitted.borrow().is_empty());

        wizard.advance();
        assert!(wizard.finish());
        assert!(wizard.is_finished());
        assert_eq!(wizard.current_status(), StepStatus::Done);
        assert!(!wizard.previous());

        assert!(!wizard.finish());
        assert_eq!(submitted.borrow().as_slice(), &[vec![1, 2]]);
    }

    #[test]
    fn cancel_marks_current() {
        let mut wizard = Wizard::new(vec!["a", "b"]);
        wizard.cancel_current();
        assert_eq!(wizard.current_status(), StepStatus::Cancelled);
        assert_eq!(wizard.status_at(1), StepStatus::Pending);

        let empty: Wizard<&str> = Wizard::new(Vec::new());
        assert!(!empty.is_last());
        assert!(empty.current_step().is_none());
    }
}
