//! Form row controller: row wiring, add/remove, global toggles, and
//! submit-time exclusion bookkeeping for the planner form.
//!
//! DESIGN
//! ======
//! One controller is constructed per page with the elements it needs
//! injected. Handlers are methods; the host forwards raw DOM events as
//! [`PageEvent`]s and [`FormController::handle`] routes them through a
//! binding table built by [`FormController::initialize`] and
//! [`FormController::wire_row`]. Every handler is a synchronous, guarded DOM
//! mutation: absent optional elements disable a feature, and the last
//! remaining row is never removed. Nothing here reports an error.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::config::{CompiledSelectors, ElementIds};
use crate::consts::{
    CUSTOM_PROCEDURE, DISPLAY_NONE, EXCLUDE_MARKER_ATTR, FIELD_EXCLUDE_INDEX, LABEL_DISABLE_ALL_MONTHLY,
    LABEL_ENABLE_ALL_MONTHLY, LABEL_HIDE_TERMS, LABEL_SHOW_TERMS,
};
use crate::dom::{Document, FieldKind};
use crate::selector::Selector;
use crate::submission::{form_fields, values_for};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("form element #{0} not found")]
    MissingForm(String),
    #[error("row container #{0} not found")]
    MissingContainer(String),
}

/// Browser events the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    /// Initial document content finished loading.
    ContentLoaded,
    /// Page became visible; `persisted` is true when restored from the history cache.
    PageShow { persisted: bool },
    /// A control's value changed; carries the event target.
    Change(N),
    /// A click landed on the given element.
    Click(N),
    /// The form is about to submit.
    Submit,
}

/// Elements the controller is bound to. Only the form and container are required.
#[derive(Debug, Clone, PartialEq)]
pub struct FormElements<N> {
    pub form: N,
    pub container: N,
    pub add_button: Option<N>,
    pub toggle_all: Option<N>,
    pub toggle_terms: Option<N>,
    pub terms_panel: Option<N>,
}

impl<N> FormElements<N> {
    /// Look up every element by id.
    ///
    /// # Errors
    ///
    /// Returns [`MountError`] if the form or the row container is missing.
    /// Optional controls that are absent are left as `None`.
    pub fn locate<D: Document<Node = N>>(dom: &D, ids: &ElementIds) -> Result<Self, MountError> {
        let form = dom
            .element_by_id(&ids.form)
            .ok_or_else(|| MountError::MissingForm(ids.form.clone()))?;
        let container = dom
            .element_by_id(&ids.container)
            .ok_or_else(|| MountError::MissingContainer(ids.container.clone()))?;
        Ok(Self {
            form,
            container,
            add_button: dom.element_by_id(&ids.add_button),
            toggle_all: dom.element_by_id(&ids.toggle_all),
            toggle_terms: dom.element_by_id(&ids.toggle_terms),
            terms_panel: dom.element_by_id(&ids.terms_panel),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Change,
    Click,
}

#[derive(Debug, Clone, PartialEq)]
enum Handler<N> {
    ToggleCustomField { row: N },
    RemoveRow { row: N },
    SyncMonthlyLabel { row: N },
    CloneRow,
    ToggleAllMonthly,
    ToggleFinanceTerms,
}

impl<N: PartialEq> Handler<N> {
    fn row(&self) -> Option<&N> {
        match self {
            Self::ToggleCustomField { row } | Self::RemoveRow { row } | Self::SyncMonthlyLabel { row } => Some(row),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding<N> {
    target: N,
    trigger: Trigger,
    handler: Handler<N>,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct FormController<D: Document> {
    selectors: CompiledSelectors,
    elements: FormElements<D::Node>,
    bindings: Vec<Binding<D::Node>>,
    controls: Selector,
    markers: Selector,
    toggle_all_active: bool,
}

impl<D: Document> FormController<D> {
    /// Bind every row already in the container plus the optional global controls.
    pub fn initialize(dom: &mut D, selectors: CompiledSelectors, elements: FormElements<D::Node>) -> Self {
        let mut controller = Self {
            selectors,
            elements,
            bindings: Vec::new(),
            controls: Selector::tags(&["input", "textarea", "select"]),
            markers: Selector::has_attr(EXCLUDE_MARKER_ATTR),
            toggle_all_active: false,
        };

        for row in controller.rows(dom) {
            controller.wire_row(dom, &row);
        }

        if let Some(add) = controller.elements.add_button.clone() {
            controller.bind(add, Trigger::Click, Handler::CloneRow);
        }

        if let Some(toggle) = controller.elements.toggle_all.clone() {
            if controller.no_finance_boxes(dom).is_empty() {
                log::debug!("toggle-all present but no no-finance checkboxes; leaving it unbound");
            } else {
                controller.toggle_all_active = true;
                controller.bind(toggle, Trigger::Click, Handler::ToggleAllMonthly);
                controller.sync_toggle_all_label(dom);
            }
        }

        if let Some(toggle) = controller.elements.toggle_terms.clone() {
            if controller.elements.terms_panel.is_some() {
                controller.bind(toggle, Trigger::Click, Handler::ToggleFinanceTerms);
            }
        }

        log::debug!(
            "planner form initialized: {} rows, {} bindings",
            controller.row_count(dom),
            controller.bindings.len()
        );
        controller
    }

    // --- Queries ---

    #[must_use]
    pub fn elements(&self) -> &FormElements<D::Node> {
        &self.elements
    }

    /// Rows in container order.
    pub fn rows(&self, dom: &D) -> Vec<D::Node> {
        dom.query_selector_all(&self.elements.container, &self.selectors.row)
    }

    pub fn row_count(&self, dom: &D) -> usize {
        self.rows(dom).len()
    }

    /// Whether the form was rendered with server-supplied values.
    pub fn is_prefilled(&self, dom: &D) -> bool {
        dom.data(&self.elements.form, &self.selectors.prefill_key)
            .is_some_and(|v| !v.is_empty())
    }

    fn no_finance_boxes(&self, dom: &D) -> Vec<D::Node> {
        dom.query_selector_all(&self.elements.container, &self.selectors.no_finance)
    }

    // --- Row wiring ---

    /// Attach behavior to one row and settle its custom-field visibility.
    ///
    /// Re-wiring a row replaces its previous bindings.
    pub fn wire_row(&mut self, dom: &mut D, row: &D::Node) {
        self.unbind_row(row);

        if let Some(select) = dom.query_selector(row, &self.selectors.procedure_select) {
            self.bind(select, Trigger::Change, Handler::ToggleCustomField { row: row.clone() });
            self.toggle_custom_field(dom, row);
        }
        if let Some(remove) = dom.query_selector(row, &self.selectors.remove_button) {
            self.bind(remove, Trigger::Click, Handler::RemoveRow { row: row.clone() });
        }
        if let Some(checkbox) = dom.query_selector(row, &self.selectors.no_finance) {
            self.bind(checkbox, Trigger::Change, Handler::SyncMonthlyLabel { row: row.clone() });
        }
    }

    /// Show the custom-name field and require its input only when the
    /// procedure selector holds the sentinel value.
    pub fn toggle_custom_field(&self, dom: &mut D, row: &D::Node) {
        let Some(select) = dom.query_selector(row, &self.selectors.procedure_select) else {
            return;
        };
        let Some(field) = dom.query_selector(row, &self.selectors.custom_field) else {
            return;
        };
        let is_custom = dom.value(&select) == CUSTOM_PROCEDURE;
        dom.set_display(&field, if is_custom { "" } else { DISPLAY_NONE });
        if let Some(input) = dom.query_selector(&field, &self.selectors.custom_input) {
            dom.set_required(&input, is_custom);
        }
    }

    /// Detach `row` unless it is the only row left. Returns whether it was removed.
    pub fn remove_row(&mut self, dom: &mut D, row: &D::Node) -> bool {
        let rows = self.rows(dom);
        if rows.len() <= 1 || !rows.contains(row) {
            return false;
        }
        dom.remove(row);
        self.unbind_row(row);
        log::debug!("row removed, {} remaining", rows.len() - 1);
        true
    }

    /// Duplicate the last row, blank every field in the copy, append it, and wire it.
    pub fn clone_row(&mut self, dom: &mut D) -> Option<D::Node> {
        let template = self.rows(dom).pop()?;
        let node = dom.clone_deep(&template)?;
        self.reset_fields(dom, &node);
        dom.append_child(&self.elements.container, &node);
        self.wire_row(dom, &node);
        log::debug!("row added, {} total", self.row_count(dom));
        Some(node)
    }

    fn reset_fields(&self, dom: &mut D, scope: &D::Node) {
        for control in dom.query_selector_all(scope, &self.controls) {
            match dom.field_kind(&control) {
                FieldKind::Checkbox | FieldKind::Radio => dom.set_checked(&control, false),
                FieldKind::TextLike | FieldKind::TextArea => dom.set_value(&control, ""),
                FieldKind::Select => dom.set_selected_index(&control, 0),
                FieldKind::Button | FieldKind::Other => {}
            }
        }
    }

    // --- Global toggles ---

    /// Flip every no-finance checkbox: all checked becomes all unchecked,
    /// anything less becomes all checked.
    pub fn toggle_all_monthly(&self, dom: &mut D) {
        if !self.toggle_all_active {
            return;
        }
        let boxes = self.no_finance_boxes(dom);
        let all_checked = !boxes.is_empty() && boxes.iter().all(|b| dom.checked(b));
        for checkbox in &boxes {
            dom.set_checked(checkbox, !all_checked);
        }
        self.sync_toggle_all_label(dom);
    }

    /// Label the toggle-all button with the action its next click performs.
    pub fn sync_toggle_all_label(&self, dom: &mut D) {
        let Some(button) = self.elements.toggle_all.as_ref().filter(|_| self.toggle_all_active) else {
            return;
        };
        let boxes = self.no_finance_boxes(dom);
        let all_checked = !boxes.is_empty() && boxes.iter().all(|b| dom.checked(b));
        let label = if all_checked { LABEL_ENABLE_ALL_MONTHLY } else { LABEL_DISABLE_ALL_MONTHLY };
        dom.set_text(button, label);
    }

    /// Show the financing terms panel when hidden, hide it otherwise.
    pub fn toggle_finance_terms(&self, dom: &mut D) {
        let (Some(button), Some(panel)) = (&self.elements.toggle_terms, &self.elements.terms_panel) else {
            return;
        };
        let display = dom.display(panel);
        if display.is_empty() || display == DISPLAY_NONE {
            dom.set_display(panel, "block");
            dom.set_text(button, LABEL_HIDE_TERMS);
        } else {
            dom.set_display(panel, DISPLAY_NONE);
            dom.set_text(button, LABEL_SHOW_TERMS);
        }
    }

    // --- Lifecycle ---

    /// Replace any stale exclusion markers with one hidden field per row
    /// whose no-finance checkbox is checked. Returns the marker count.
    pub fn prepare_submission(&self, dom: &mut D) -> usize {
        let form = &self.elements.form;
        for stale in dom.query_selector_all(form, &self.markers) {
            dom.remove(&stale);
        }

        let mut count = 0;
        for (index, row) in self.rows(dom).iter().enumerate() {
            let excluded = dom
                .query_selector(row, &self.selectors.no_finance)
                .is_some_and(|checkbox| dom.checked(&checkbox));
            if !excluded {
                continue;
            }
            let Some(marker) = dom.create_hidden_input(FIELD_EXCLUDE_INDEX, &index.to_string()) else {
                log::warn!("could not create exclusion marker for row {index}");
                continue;
            };
            dom.set_attribute(&marker, EXCLUDE_MARKER_ATTR, "");
            dom.append_child(form, &marker);
            count += 1;
        }
        if log::log_enabled!(log::Level::Debug) {
            let fields = form_fields(&*dom, form);
            let excluded: Vec<&str> = values_for(&fields, FIELD_EXCLUDE_INDEX).collect();
            log::debug!("submitting {} fields, excluded rows {excluded:?}", fields.len());
        }
        count
    }

    /// Reset the form to its markup defaults unless it carries the prefill
    /// marker. Returns whether a reset happened.
    pub fn reset_on_fresh_load(&self, dom: &mut D) -> bool {
        if self.is_prefilled(dom) {
            log::debug!("prefilled form, skipping reset");
            return false;
        }
        dom.reset_form(&self.elements.form);
        for row in self.rows(dom) {
            self.toggle_custom_field(dom, &row);
        }
        self.sync_toggle_all_label(dom);
        true
    }

    // --- Event routing ---

    /// Route a page event to its handler. Returns whether anything handled it.
    pub fn handle(&mut self, dom: &mut D, event: &PageEvent<D::Node>) -> bool {
        match event {
            PageEvent::ContentLoaded | PageEvent::PageShow { persisted: true } => self.reset_on_fresh_load(dom),
            PageEvent::PageShow { persisted: false } => false,
            PageEvent::Submit => {
                self.prepare_submission(dom);
                true
            }
            PageEvent::Change(target) => self.dispatch(dom, target, Trigger::Change),
            PageEvent::Click(target) => self.dispatch(dom, target, Trigger::Click),
        }
    }

    /// Run the handler bound to `target` or its nearest bound ancestor.
    fn dispatch(&mut self, dom: &mut D, target: &D::Node, trigger: Trigger) -> bool {
        let mut cursor = Some(target.clone());
        while let Some(node) = cursor {
            let bound = self
                .bindings
                .iter()
                .find(|b| b.trigger == trigger && b.target == node)
                .map(|b| b.handler.clone());
            if let Some(handler) = bound {
                self.run(dom, handler);
                return true;
            }
            cursor = dom.parent(&node);
        }
        false
    }

    fn run(&mut self, dom: &mut D, handler: Handler<D::Node>) {
        match handler {
            Handler::ToggleCustomField { row } => self.toggle_custom_field(dom, &row),
            Handler::RemoveRow { row } => {
                if !self.remove_row(dom, &row) {
                    log::debug!("refusing to remove the last row");
                }
            }
            Handler::SyncMonthlyLabel { .. } => self.sync_toggle_all_label(dom),
            Handler::CloneRow => {
                if self.clone_row(dom).is_none() {
                    log::warn!("no row available to clone");
                }
            }
            Handler::ToggleAllMonthly => self.toggle_all_monthly(dom),
            Handler::ToggleFinanceTerms => self.toggle_finance_terms(dom),
        }
    }

    fn bind(&mut self, target: D::Node, trigger: Trigger, handler: Handler<D::Node>) {
        self.bindings.push(Binding { target, trigger, handler });
    }

    fn unbind_row(&mut self, row: &D::Node) {
        self.bindings.retain(|b| b.handler.row() != Some(row));
    }
}
