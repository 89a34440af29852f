use super::*;
use crate::config::FormSelectors;
use crate::consts::{FIELD_CUSTOM_NAME, FIELD_PROCEDURE_NAME};
use crate::memory::{MemoryDom, NodeId};
use crate::submission::{form_fields, values_for};

// =============================================================
// Helpers
// =============================================================

// Remaining row fields and the procedure menu, as the server template renders them.
const FIELD_TOOTH_NUMBER: &str = "tooth_number[]";
const FIELD_REASON: &str = "reason[]";
const FIELD_COST: &str = "cost[]";
const FIELD_COVERAGE_PERCENT: &str = "coverage_percent[]";

const PROCEDURE_CATALOG: [&str; 16] = [
    "Extraction",
    "Wisdom tooth extraction",
    "Sedation",
    "Fillings",
    "Invisalign",
    "Root Canal Treatment",
    "Crowns",
    "Bridges",
    "Gum Disease Treatment",
    "Laser surgery",
    "Whitening",
    "Sleep Apnea treatment",
    "Dentures",
    "Dental Implants",
    "Bone Graft",
    CUSTOM_PROCEDURE,
];

struct Page {
    dom: MemoryDom,
    form: NodeId,
    container: NodeId,
}

impl Page {
    fn new() -> Self {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let form = dom.append(root, "form", &[("id", "planner-form"), ("method", "post"), ("action", "/plan")]);
        dom.append(form, "input", &[("type", "text"), ("name", "patient_name")]);
        let container = dom.append(form, "div", &[("id", "rows")]);
        Self { dom, form, container }
    }

    fn prefilled(mut self) -> Self {
        self.dom.set_attribute(&self.form, "data-prefill", "1");
        self
    }

    /// Append one row. `no_finance` of `None` omits the checkbox entirely;
    /// `Some(true)` renders it checked in markup.
    fn row(mut self, no_finance: Option<bool>) -> Self {
        let container = self.container;
        let dom = &mut self.dom;
        let row = dom.append(container, "div", &[("class", "row"), ("data-row", "")]);
        let select = dom.append(row, "select", &[("name", FIELD_PROCEDURE_NAME)]);
        for name in PROCEDURE_CATALOG {
            dom.append_with_text(select, "option", &[("value", name)], name);
        }
        let custom = dom.append(row, "div", &[("class", "custom-field"), ("style", "display: none")]);
        dom.append(custom, "input", &[("type", "text"), ("name", FIELD_CUSTOM_NAME)]);
        dom.append(row, "input", &[("type", "text"), ("name", FIELD_TOOTH_NUMBER)]);
        dom.append(row, "textarea", &[("name", FIELD_REASON)]);
        dom.append(row, "input", &[("type", "number"), ("name", FIELD_COST)]);
        dom.append(row, "input", &[("type", "number"), ("name", FIELD_COVERAGE_PERCENT)]);
        match no_finance {
            Some(true) => {
                dom.append(row, "input", &[("type", "checkbox"), ("data-no-finance", ""), ("checked", "")]);
            }
            Some(false) => {
                dom.append(row, "input", &[("type", "checkbox"), ("data-no-finance", "")]);
            }
            None => {}
        }
        dom.append_with_text(row, "button", &[("type", "button"), ("data-remove", "")], "Remove");
        self
    }

    fn rows(self, count: usize) -> Self {
        (0..count).fold(self, |page, _| page.row(Some(false)))
    }

    fn with_add_button(mut self) -> Self {
        let form = self.form;
        self.dom
            .append_with_text(form, "button", &[("type", "button"), ("id", "add-row")], "Add procedure");
        self
    }

    fn with_toggle_all(mut self) -> Self {
        let form = self.form;
        self.dom
            .append_with_text(form, "button", &[("type", "button"), ("id", "toggle-all-monthly")], "Toggle");
        self
    }

    fn with_terms_button(mut self) -> Self {
        let form = self.form;
        self.dom.append_with_text(
            form,
            "button",
            &[("type", "button"), ("id", "toggle-finance-terms")],
            LABEL_SHOW_TERMS,
        );
        self
    }

    fn with_terms_panel(mut self, style: &str) -> Self {
        let form = self.form;
        self.dom
            .append_with_text(form, "div", &[("id", "finance-terms"), ("style", style)], "15% APR, 48 months");
        self
    }

    fn mount(&mut self) -> FormController<MemoryDom> {
        let selectors = FormSelectors::default().compile().unwrap();
        let elements = FormElements::locate(&self.dom, &selectors.ids).unwrap();
        FormController::initialize(&mut self.dom, selectors, elements)
    }

    fn find(&self, scope: NodeId, selector: &str) -> NodeId {
        self.dom
            .query_selector(&scope, &Selector::parse(selector).unwrap())
            .unwrap()
    }

    fn by_id(&self, id: &str) -> NodeId {
        self.dom.element_by_id(id).unwrap()
    }

    fn select(&self, row: NodeId) -> NodeId {
        self.find(row, r#"select[name="procedure_name[]"]"#)
    }

    fn custom_field(&self, row: NodeId) -> NodeId {
        self.find(row, ".custom-field")
    }

    fn custom_input(&self, row: NodeId) -> NodeId {
        self.find(row, r#"input[name="custom_name[]"]"#)
    }

    fn checkbox(&self, row: NodeId) -> NodeId {
        self.find(row, "input[data-no-finance]")
    }

    fn remove_button(&self, row: NodeId) -> NodeId {
        self.find(row, "[data-remove]")
    }

    fn checkbox_states(&self, controller: &FormController<MemoryDom>) -> Vec<bool> {
        controller
            .rows(&self.dom)
            .iter()
            .map(|row| self.dom.checked(&self.checkbox(*row)))
            .collect()
    }
}

// =============================================================
// Initialize
// =============================================================

#[test]
fn locate_requires_form() {
    let dom = MemoryDom::new();
    let selectors = FormSelectors::default().compile().unwrap();
    let err = FormElements::locate(&dom, &selectors.ids).unwrap_err();
    assert_eq!(err, MountError::MissingForm("planner-form".into()));
}

#[test]
fn locate_requires_container() {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    dom.append(root, "form", &[("id", "planner-form")]);
    let selectors = FormSelectors::default().compile().unwrap();
    let err = FormElements::locate(&dom, &selectors.ids).unwrap_err();
    assert_eq!(err, MountError::MissingContainer("rows".into()));
}

#[test]
fn locate_tolerates_missing_optional_controls() {
    let page = Page::new().rows(1);
    let selectors = FormSelectors::default().compile().unwrap();
    let elements = FormElements::locate(&page.dom, &selectors.ids).unwrap();
    assert_eq!(elements.form, page.form);
    assert_eq!(elements.container, page.container);
    assert!(elements.add_button.is_none());
    assert!(elements.toggle_all.is_none());
    assert!(elements.toggle_terms.is_none());
    assert!(elements.terms_panel.is_none());
}

#[test]
fn initialize_without_optional_controls_still_wires_rows() {
    let mut page = Page::new().rows(2);
    let mut controller = page.mount();
    let rows = controller.rows(&page.dom);
    let remove = page.remove_button(rows[0]);
    assert!(controller.handle(&mut page.dom, &PageEvent::Click(remove)));
    assert_eq!(controller.row_count(&page.dom), 1);
}

#[test]
fn click_outside_any_binding_is_ignored() {
    let mut page = Page::new().rows(2);
    let mut controller = page.mount();
    let form = page.form;
    assert!(!controller.handle(&mut page.dom, &PageEvent::Click(form)));
    assert_eq!(controller.row_count(&page.dom), 2);
}

// =============================================================
// Custom field
// =============================================================

#[test]
fn custom_field_hidden_for_catalog_procedure_at_wiring() {
    let mut page = Page::new().rows(1);
    let controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    assert_eq!(page.dom.display(&page.custom_field(row)), "none");
    assert!(!page.dom.required(&page.custom_input(row)));
}

#[test]
fn custom_field_shown_when_prefilled_with_custom() {
    let mut page = Page::new().rows(1);
    let row = page.dom.query_selector(&page.container, &Selector::has_attr("data-row")).unwrap();
    let select = page.select(row);
    page.dom.set_value(&select, CUSTOM_PROCEDURE);

    page.mount();

    assert_eq!(page.dom.display(&page.custom_field(row)), "");
    assert!(page.dom.required(&page.custom_input(row)));
}

#[test]
fn change_to_custom_reveals_and_requires_input() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    let select = page.select(row);

    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    assert!(controller.handle(&mut page.dom, &PageEvent::Change(select)));

    assert_eq!(page.dom.display(&page.custom_field(row)), "");
    assert!(page.dom.required(&page.custom_input(row)));
}

#[test]
fn change_away_from_custom_hides_and_unrequires_input() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    let select = page.select(row);

    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    controller.handle(&mut page.dom, &PageEvent::Change(select));
    page.dom.set_value(&select, "Crowns");
    controller.handle(&mut page.dom, &PageEvent::Change(select));

    assert_eq!(page.dom.display(&page.custom_field(row)), "none");
    assert!(!page.dom.required(&page.custom_input(row)));
}

#[test]
fn click_on_select_does_not_toggle_custom_field() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    let select = page.select(row);

    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    assert!(!controller.handle(&mut page.dom, &PageEvent::Click(select)));
    assert_eq!(page.dom.display(&page.custom_field(row)), "none");
}

#[test]
fn rewiring_a_row_does_not_duplicate_bindings() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let before = controller.bindings.len();
    let row = controller.rows(&page.dom)[0];
    controller.wire_row(&mut page.dom, &row);
    controller.wire_row(&mut page.dom, &row);
    assert_eq!(controller.bindings.len(), before);
}

// =============================================================
// RemoveRow
// =============================================================

#[test]
fn remove_row_drops_row_when_several_remain() {
    for count in 2..=4 {
        for victim in [0, count / 2, count - 1] {
            let mut page = Page::new().rows(count);
            let mut controller = page.mount();
            let rows = controller.rows(&page.dom);
            let remove = page.remove_button(rows[victim]);

            controller.handle(&mut page.dom, &PageEvent::Click(remove));

            let after = controller.rows(&page.dom);
            assert_eq!(after.len(), count - 1);
            assert!(!after.contains(&rows[victim]));
        }
    }
}

#[test]
fn remove_row_reports_whether_it_removed() {
    let mut page = Page::new().rows(2);
    let mut controller = page.mount();
    let rows = controller.rows(&page.dom);
    assert!(controller.remove_row(&mut page.dom, &rows[1]));
    assert!(!controller.remove_row(&mut page.dom, &rows[1]));
    assert!(!controller.remove_row(&mut page.dom, &rows[0]));
}

#[test]
fn remove_row_refuses_last_row() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    let remove = page.remove_button(row);

    assert!(controller.handle(&mut page.dom, &PageEvent::Click(remove)));
    assert_eq!(controller.rows(&page.dom), vec![row]);
    assert!(!controller.remove_row(&mut page.dom, &row));
    assert_eq!(controller.row_count(&page.dom), 1);
}

#[test]
fn click_inside_remove_button_bubbles_to_it() {
    let mut page = Page::new().rows(2);
    let first = page.dom.query_selector(&page.container, &Selector::has_attr("data-row")).unwrap();
    let remove = page.remove_button(first);
    let icon = page.dom.append(remove, "span", &[("class", "icon")]);
    let mut controller = page.mount();

    controller.handle(&mut page.dom, &PageEvent::Click(icon));

    assert_eq!(controller.row_count(&page.dom), 1);
    assert!(!controller.rows(&page.dom).contains(&first));
}

#[test]
fn removed_row_bindings_are_dropped() {
    let mut page = Page::new().rows(3);
    let mut controller = page.mount();
    let rows = controller.rows(&page.dom);
    let remove = page.remove_button(rows[0]);

    controller.handle(&mut page.dom, &PageEvent::Click(remove));
    assert!(!controller.handle(&mut page.dom, &PageEvent::Click(remove)));
    assert_eq!(controller.row_count(&page.dom), 2);
}

// =============================================================
// CloneRow
// =============================================================

#[test]
fn clone_row_appends_one_blank_row_at_end() {
    let mut page = Page::new().rows(2).with_add_button();
    let mut controller = page.mount();
    let rows = controller.rows(&page.dom);
    let last = rows[1];

    let select = page.select(last);
    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    controller.handle(&mut page.dom, &PageEvent::Change(select));
    let node = page.custom_input(last);
    page.dom.set_value(&node, "Veneer");
    let node = page.find(last, r#"input[name="tooth_number[]"]"#);
    page.dom.set_value(&node, "18");
    let node = page.find(last, "textarea");
    page.dom.set_value(&node, "Cracked cusp");
    let node = page.find(last, r#"input[name="cost[]"]"#);
    page.dom.set_value(&node, "1200");
    let node = page.checkbox(last);
    page.dom.set_checked(&node, true);

    let add = page.by_id("add-row");
    assert!(controller.handle(&mut page.dom, &PageEvent::Click(add)));

    let after = controller.rows(&page.dom);
    assert_eq!(after.len(), 3);
    assert_eq!(&after[..2], &rows[..]);
    let fresh = after[2];
    assert_eq!(page.dom.value(&page.select(fresh)), PROCEDURE_CATALOG[0]);
    assert_eq!(page.dom.value(&page.custom_input(fresh)), "");
    assert_eq!(page.dom.value(&page.find(fresh, r#"input[name="tooth_number[]"]"#)), "");
    assert_eq!(page.dom.value(&page.find(fresh, "textarea")), "");
    assert_eq!(page.dom.value(&page.find(fresh, r#"input[name="cost[]"]"#)), "");
    assert!(!page.dom.checked(&page.checkbox(fresh)));
    assert_eq!(page.dom.display(&page.custom_field(fresh)), "none");
    assert!(!page.dom.required(&page.custom_input(fresh)));
}

#[test]
fn clone_row_leaves_source_row_untouched() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let source = controller.rows(&page.dom)[0];
    let node = page.find(source, r#"input[name="cost[]"]"#);
    page.dom.set_value(&node, "950");
    let node = page.checkbox(source);
    page.dom.set_checked(&node, true);

    controller.clone_row(&mut page.dom).unwrap();

    assert_eq!(page.dom.value(&page.find(source, r#"input[name="cost[]"]"#)), "950");
    assert!(page.dom.checked(&page.checkbox(source)));
}

#[test]
fn cloned_row_is_wired() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let fresh = controller.clone_row(&mut page.dom).unwrap();

    let select = page.select(fresh);
    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    controller.handle(&mut page.dom, &PageEvent::Change(select));
    assert!(page.dom.required(&page.custom_input(fresh)));

    let remove = page.remove_button(fresh);
    controller.handle(&mut page.dom, &PageEvent::Click(remove));
    assert_eq!(controller.row_count(&page.dom), 1);
    assert!(!controller.rows(&page.dom).contains(&fresh));
}

#[test]
fn clone_row_always_adds_exactly_one() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    for expected in 2..6 {
        controller.clone_row(&mut page.dom).unwrap();
        assert_eq!(controller.row_count(&page.dom), expected);
    }
}

// =============================================================
// ToggleAllMonthly
// =============================================================

fn toggle_page(states: [bool; 3]) -> (Page, FormController<MemoryDom>) {
    let page = states
        .iter()
        .fold(Page::new(), |page, checked| page.row(Some(*checked)))
        .with_toggle_all();
    let mut page = page;
    let controller = page.mount();
    (page, controller)
}

#[test]
fn toggle_all_checks_everything_when_some_unchecked() {
    let (mut page, mut controller) = toggle_page([true, false, true]);
    let button = page.by_id("toggle-all-monthly");

    assert!(controller.handle(&mut page.dom, &PageEvent::Click(button)));

    assert_eq!(page.checkbox_states(&controller), vec![true, true, true]);
    assert_eq!(page.dom.text(&button), LABEL_ENABLE_ALL_MONTHLY);
}

#[test]
fn toggle_all_unchecks_everything_when_all_checked() {
    let (mut page, mut controller) = toggle_page([true, true, true]);
    let button = page.by_id("toggle-all-monthly");

    controller.handle(&mut page.dom, &PageEvent::Click(button));

    assert_eq!(page.checkbox_states(&controller), vec![false, false, false]);
    assert_eq!(page.dom.text(&button), LABEL_DISABLE_ALL_MONTHLY);
}

#[test]
fn toggle_all_label_set_at_wiring() {
    let (page, _controller) = toggle_page([true, true, true]);
    assert_eq!(page.dom.text(&page.by_id("toggle-all-monthly")), LABEL_ENABLE_ALL_MONTHLY);

    let (page, _controller) = toggle_page([false, true, true]);
    assert_eq!(page.dom.text(&page.by_id("toggle-all-monthly")), LABEL_DISABLE_ALL_MONTHLY);
}

#[test]
fn toggle_all_unbound_without_checkboxes() {
    let mut page = Page::new().row(None).with_toggle_all();
    let mut controller = page.mount();
    let button = page.by_id("toggle-all-monthly");

    assert_eq!(page.dom.text(&button), "Toggle");
    assert!(!controller.handle(&mut page.dom, &PageEvent::Click(button)));
    assert_eq!(page.dom.text(&button), "Toggle");
}

#[test]
fn toggle_all_label_follows_individual_checkbox_changes() {
    let (mut page, mut controller) = toggle_page([true, true, false]);
    let button = page.by_id("toggle-all-monthly");
    let last = controller.rows(&page.dom)[2];
    let checkbox = page.checkbox(last);

    page.dom.set_checked(&checkbox, true);
    controller.handle(&mut page.dom, &PageEvent::Change(checkbox));

    assert_eq!(page.dom.text(&button), LABEL_ENABLE_ALL_MONTHLY);
}

#[test]
fn toggle_all_reaches_cloned_rows() {
    let (mut page, mut controller) = toggle_page([true, true, true]);
    controller.clone_row(&mut page.dom).unwrap();
    let button = page.by_id("toggle-all-monthly");

    controller.handle(&mut page.dom, &PageEvent::Click(button));

    assert_eq!(page.checkbox_states(&controller), vec![true, true, true, true]);
}

// =============================================================
// ToggleFinanceTermsPanel
// =============================================================

#[test]
fn terms_toggle_shows_then_hides_panel() {
    let mut page = Page::new().rows(1).with_terms_button().with_terms_panel("display: none");
    let mut controller = page.mount();
    let button = page.by_id("toggle-finance-terms");
    let panel = page.by_id("finance-terms");

    assert!(controller.handle(&mut page.dom, &PageEvent::Click(button)));
    assert_ne!(page.dom.display(&panel), "none");
    assert_eq!(page.dom.text(&button), LABEL_HIDE_TERMS);

    controller.handle(&mut page.dom, &PageEvent::Click(button));
    assert_eq!(page.dom.display(&panel), "none");
    assert_eq!(page.dom.text(&button), LABEL_SHOW_TERMS);
}

#[test]
fn terms_panel_without_inline_display_counts_as_hidden() {
    let mut page = Page::new().rows(1).with_terms_button().with_terms_panel("");
    let mut controller = page.mount();
    let button = page.by_id("toggle-finance-terms");

    controller.handle(&mut page.dom, &PageEvent::Click(button));

    assert_eq!(page.dom.display(&page.by_id("finance-terms")), "block");
    assert_eq!(page.dom.text(&button), LABEL_HIDE_TERMS);
}

#[test]
fn terms_toggle_requires_panel() {
    let mut page = Page::new().rows(1).with_terms_button();
    let mut controller = page.mount();
    let button = page.by_id("toggle-finance-terms");

    assert!(!controller.handle(&mut page.dom, &PageEvent::Click(button)));
    assert_eq!(page.dom.text(&button), LABEL_SHOW_TERMS);
}

// =============================================================
// PrepareSubmission
// =============================================================

#[test]
fn submission_marks_excluded_row_indices() {
    let mut page = Page::new().row(Some(true)).row(Some(false)).row(Some(true));
    let mut controller = page.mount();

    assert!(controller.handle(&mut page.dom, &PageEvent::Submit));

    let fields = form_fields(&page.dom, &page.form);
    let markers: Vec<&str> = values_for(&fields, FIELD_EXCLUDE_INDEX).collect();
    assert_eq!(markers, vec!["0", "2"]);
}

#[test]
fn repeated_submission_does_not_duplicate_markers() {
    let mut page = Page::new().row(Some(true)).row(Some(false)).row(Some(true));
    let controller = page.mount();

    assert_eq!(controller.prepare_submission(&mut page.dom), 2);
    assert_eq!(controller.prepare_submission(&mut page.dom), 2);

    let markers = page.dom.query_selector_all(&page.form, &Selector::has_attr(EXCLUDE_MARKER_ATTR));
    assert_eq!(markers.len(), 2);
}

#[test]
fn stale_markers_are_replaced() {
    let mut page = Page::new().row(Some(true)).row(Some(false)).row(Some(true));
    let mut controller = page.mount();
    controller.prepare_submission(&mut page.dom);

    let rows = controller.rows(&page.dom);
    let node = page.checkbox(rows[0]);
    page.dom.set_checked(&node, false);
    let node = page.checkbox(rows[1]);
    page.dom.set_checked(&node, true);
    controller.handle(&mut page.dom, &PageEvent::Submit);

    let fields = form_fields(&page.dom, &page.form);
    assert_eq!(values_for(&fields, FIELD_EXCLUDE_INDEX).collect::<Vec<_>>(), vec!["1", "2"]);
}

#[test]
fn submission_indices_follow_current_row_order() {
    let mut page = Page::new().row(Some(false)).row(Some(false)).row(Some(true));
    let mut controller = page.mount();
    let rows = controller.rows(&page.dom);
    controller.remove_row(&mut page.dom, &rows[0]);

    controller.prepare_submission(&mut page.dom);

    let fields = form_fields(&page.dom, &page.form);
    assert_eq!(values_for(&fields, FIELD_EXCLUDE_INDEX).collect::<Vec<_>>(), vec!["1"]);
}

#[test]
fn submission_without_checkboxes_adds_nothing() {
    let mut page = Page::new().row(None).row(None);
    let controller = page.mount();
    assert_eq!(controller.prepare_submission(&mut page.dom), 0);
    let fields = form_fields(&page.dom, &page.form);
    assert_eq!(values_for(&fields, FIELD_EXCLUDE_INDEX).count(), 0);
}

// =============================================================
// ResetOnFreshLoad
// =============================================================

fn dirty_first_row(page: &mut Page, controller: &mut FormController<MemoryDom>) -> NodeId {
    let row = controller.rows(&page.dom)[0];
    let select = page.select(row);
    page.dom.set_value(&select, CUSTOM_PROCEDURE);
    controller.handle(&mut page.dom, &PageEvent::Change(select));
    let node = page.custom_input(row);
    page.dom.set_value(&node, "Veneer");
    let node = page.find(row, r#"input[name="cost[]"]"#);
    page.dom.set_value(&node, "400");
    let node = page.checkbox(row);
    page.dom.set_checked(&node, true);
    row
}

#[test]
fn fresh_form_is_blank_after_content_loaded() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = dirty_first_row(&mut page, &mut controller);

    assert!(controller.handle(&mut page.dom, &PageEvent::ContentLoaded));

    assert_eq!(page.dom.value(&page.select(row)), PROCEDURE_CATALOG[0]);
    assert_eq!(page.dom.value(&page.custom_input(row)), "");
    assert_eq!(page.dom.value(&page.find(row, r#"input[name="cost[]"]"#)), "");
    assert!(!page.dom.checked(&page.checkbox(row)));
    assert_eq!(page.dom.display(&page.custom_field(row)), "none");
}

#[test]
fn fresh_form_is_blank_after_restore_from_cache() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = dirty_first_row(&mut page, &mut controller);

    assert!(controller.handle(&mut page.dom, &PageEvent::PageShow { persisted: true }));

    assert_eq!(page.dom.value(&page.find(row, r#"input[name="cost[]"]"#)), "");
    assert!(!page.dom.checked(&page.checkbox(row)));
}

#[test]
fn ordinary_page_show_does_not_reset() {
    let mut page = Page::new().rows(1);
    let mut controller = page.mount();
    let row = dirty_first_row(&mut page, &mut controller);

    assert!(!controller.handle(&mut page.dom, &PageEvent::PageShow { persisted: false }));

    assert_eq!(page.dom.value(&page.find(row, r#"input[name="cost[]"]"#)), "400");
}

#[test]
fn prefilled_form_survives_load_and_restore() {
    let mut page = Page::new().rows(1).prefilled();
    let mut controller = page.mount();
    let row = dirty_first_row(&mut page, &mut controller);

    assert!(controller.is_prefilled(&page.dom));
    assert!(!controller.handle(&mut page.dom, &PageEvent::ContentLoaded));
    assert!(!controller.handle(&mut page.dom, &PageEvent::PageShow { persisted: true }));

    assert_eq!(page.dom.value(&page.select(row)), CUSTOM_PROCEDURE);
    assert_eq!(page.dom.value(&page.custom_input(row)), "Veneer");
    assert_eq!(page.dom.value(&page.find(row, r#"input[name="cost[]"]"#)), "400");
    assert!(page.dom.checked(&page.checkbox(row)));
}

#[test]
fn empty_prefill_attribute_is_not_a_prefill() {
    let mut page = Page::new().rows(1);
    let form = page.form;
    page.dom.set_attribute(&form, "data-prefill", "");
    let controller = page.mount();
    assert!(!controller.is_prefilled(&page.dom));
}

#[test]
fn reset_restores_markup_defaults() {
    let mut page = Page::new().row(Some(true)).with_toggle_all();
    let controller = page.mount();
    let row = controller.rows(&page.dom)[0];
    let node = page.checkbox(row);
    page.dom.set_checked(&node, false);

    controller.reset_on_fresh_load(&mut page.dom);

    assert!(page.dom.checked(&page.checkbox(row)));
    assert_eq!(page.dom.text(&page.by_id("toggle-all-monthly")), LABEL_ENABLE_ALL_MONTHLY);
}
