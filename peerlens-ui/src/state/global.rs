//! Global Application State
//!
//! Reactive wrapper around the [`Controller`] using Leptos signals.

use leptos::*;

use super::controller::{CompanyList, CompareRequest, Controller};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    pub controller: RwSignal<Controller>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState {
        controller: create_rw_signal(Controller::new()),
    });
}

impl GlobalState {
    /// Run `f` against the controller, then surface any alert it raised
    pub fn update<T>(&self, f: impl FnOnce(&mut Controller) -> T) -> Option<T> {
        let result = self.controller.try_update(f);
        self.flush_alert();
        result
    }

    /// Competitor list, changing only when the list itself changes
    pub fn companies(&self) -> Memo<CompanyList> {
        let controller = self.controller;
        create_memo(move |_| controller.with(|c| c.companies.clone()))
    }

    /// Start a submission; `None` when nothing should be sent
    pub fn begin_submit(&self) -> Option<CompareRequest> {
        self.update(|c| c.begin_submit()).flatten()
    }

    fn flush_alert(&self) {
        if !self.controller.with_untracked(|c| c.has_alert()) {
            return;
        }
        if let Some(message) = self.controller.try_update(|c| c.take_alert()).flatten() {
            show_alert(&message);
        }
    }
}

/// Blocking browser alert
pub fn show_alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if window.alert_with_message(message).is_err() {
                web_sys::console::error_1(&format!("Alert failed: {}", message).into());
            }
        }
        None => web_sys::console::error_1(&message.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_companies_ignores_unrelated_updates() {
        let runtime = create_runtime();
        let state = GlobalState {
            controller: create_rw_signal(Controller::new()),
        };
        let companies = state.companies();

        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        let list_view = create_memo(move |_| {
            companies.with(|_| ());
            counter.set(counter.get() + 1);
        });

        list_view.get();
        assert_eq!(renders.get(), 1);

        state.controller.update(|c| c.query = "EBITDA margin".to_string());
        list_view.get();
        assert_eq!(renders.get(), 1);

        state
            .controller
            .update(|c| c.companies_loaded(Ok(vec!["JSW Steel".to_string()])));
        list_view.get();
        assert_eq!(renders.get(), 2);

        runtime.dispose();
    }
}
