//! The field set a form submission carries.
//!
//! Mirrors the browser's construction of the form data set closely enough to
//! check what the server receives: named, enabled controls in document order,
//! with checkboxes and radios only when checked.

#[cfg(test)]
#[path = "submission_test.rs"]
mod submission_test;

use crate::dom::{Document, FieldKind};
use crate::selector::Selector;

/// Ordered `(name, value)` pairs that submitting `form` would send.
pub fn form_fields<D: Document>(dom: &D, form: &D::Node) -> Vec<(String, String)> {
    let controls = Selector::tags(&["input", "textarea", "select"]);
    dom.query_selector_all(form, &controls)
        .into_iter()
        .filter(|node| !dom.disabled(node))
        .filter_map(|node| {
            let name = dom.name(&node).filter(|n| !n.is_empty())?;
            let value = match dom.field_kind(&node) {
                FieldKind::Checkbox | FieldKind::Radio => {
                    if !dom.checked(&node) {
                        return None;
                    }
                    dom.attribute(&node, "value").unwrap_or_else(|| "on".to_owned())
                }
                FieldKind::Button | FieldKind::Other => return None,
                FieldKind::TextLike | FieldKind::TextArea | FieldKind::Select => dom.value(&node),
            };
            Some((name, value))
        })
        .collect()
}

/// Every value submitted under `name`, in order.
pub fn values_for<'a>(fields: &'a [(String, String)], name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    fields
        .iter()
        .filter(move |(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}
