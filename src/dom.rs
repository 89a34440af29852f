//! The seam between the form controller and a live DOM tree.
//!
//! DESIGN
//! ======
//! The controller is generic over [`Document`] so the same row-management
//! logic runs against the browser (`web::WebDom`, behind the `hydrate`
//! feature) and against the in-memory arena (`memory::MemoryDom`) used by
//! tests and native hosts. Every primitive is best-effort: a node of the
//! wrong kind, or one that has been detached, turns writes into no-ops and
//! reads into empty values. Nothing here returns an error.

use std::fmt;

use crate::selector::Selector;

/// Classification of an element as a form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` holding a free value: text, number, hidden, email, etc.
    TextLike,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<input type="radio">`.
    Radio,
    /// `<input>` acting as a button: submit, reset, button, image, file.
    Button,
    /// `<textarea>`.
    TextArea,
    /// `<select>`.
    Select,
    /// Any element that is not a form control.
    Other,
}

/// A DOM tree the form controller can read and mutate.
pub trait Document {
    /// Handle to one element. Comparing handles compares element identity.
    type Node: Clone + PartialEq + fmt::Debug;

    // --- Lookup ---

    /// Connected element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_selector_all(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`.
    fn query_selector(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// Parent element, or `None` for a detached or root element.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    // --- Attributes ---

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Value of the `data-{key}` attribute.
    fn data(&self, node: &Self::Node, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    // --- Form controls ---

    fn field_kind(&self, node: &Self::Node) -> FieldKind;

    fn name(&self, node: &Self::Node) -> Option<String> {
        self.attribute(node, "name")
    }

    fn disabled(&self, node: &Self::Node) -> bool {
        self.has_attribute(node, "disabled")
    }

    /// Current value of an input, textarea, or select.
    fn value(&self, node: &Self::Node) -> String;

    fn set_value(&mut self, node: &Self::Node, value: &str);

    fn checked(&self, node: &Self::Node) -> bool;

    fn set_checked(&mut self, node: &Self::Node, checked: bool);

    /// Select the option at `index` of a `<select>`.
    fn set_selected_index(&mut self, node: &Self::Node, index: usize);

    fn required(&self, node: &Self::Node) -> bool {
        self.has_attribute(node, "required")
    }

    fn set_required(&mut self, node: &Self::Node, required: bool);

    /// Restore every control in `form` to its markup default.
    fn reset_form(&mut self, form: &Self::Node);

    // --- Presentation ---

    /// Inline `display` style; empty when unset.
    fn display(&self, node: &Self::Node) -> String;

    /// Set the inline `display` style. An empty string clears it.
    fn set_display(&mut self, node: &Self::Node, display: &str);

    fn text(&self, node: &Self::Node) -> String;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    // --- Structure ---

    /// Deep copy of `node` and its subtree, detached from the document.
    fn clone_deep(&mut self, node: &Self::Node) -> Option<Self::Node>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Detach `node` from its parent.
    fn remove(&mut self, node: &Self::Node);

    /// Create a detached `<input type="hidden">` with the given name and value.
    fn create_hidden_input(&mut self, name: &str, value: &str) -> Option<Self::Node>;
}
