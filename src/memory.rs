//! In-memory DOM arena implementing [`Document`].
//!
//! Elements live in a flat `Vec` and refer to each other by [`NodeId`].
//! Removed or freshly cloned subtrees stay in the arena, detached from the
//! root, exactly as the browser keeps unattached nodes alive while a handle
//! exists. Only the element features the form controller observes are
//! modelled: attributes, own text, control value/checkedness/selectedness,
//! and the inline `display` style.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use crate::dom::{Document, FieldKind};
use crate::selector::{Selector, SelectorTarget};

/// Index of an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    value: String,
    checked: bool,
    selected: bool,
    display: String,
}

impl SelectorTarget for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            selected: false,
            display: String::new(),
        }
    }

    fn kind(&self) -> FieldKind {
        match self.tag.as_str() {
            "input" => match self.attr("type").map(str::to_ascii_lowercase).as_deref() {
                Some("checkbox") => FieldKind::Checkbox,
                Some("radio") => FieldKind::Radio,
                Some("submit" | "reset" | "button" | "image" | "file") => FieldKind::Button,
                _ => FieldKind::TextLike,
            },
            "textarea" => FieldKind::TextArea,
            "select" => FieldKind::Select,
            _ => FieldKind::Other,
        }
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_owned();
        } else {
            self.attrs.push((name.to_owned(), value.to_owned()));
        }
        if name == "style" {
            self.display = display_from_style(value);
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    /// Markup default: value attribute for inputs, text for textareas.
    fn default_value(&self) -> String {
        if self.kind() == FieldKind::TextArea {
            self.text.clone()
        } else {
            self.attr("value").unwrap_or_default().to_owned()
        }
    }
}

/// Extract the `display` declaration from an inline style string.
fn display_from_style(style: &str) -> String {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(prop, _)| prop.trim().eq_ignore_ascii_case("display"))
        .map(|(_, value)| value.trim().to_owned())
        .next_back()
        .unwrap_or_default()
}

/// Arena-backed document.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self { nodes: vec![Element::new("#document")], root: NodeId(0) }
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The document root. Elements appended beneath it are connected.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. Control state (value, checked, selected,
    /// display) is initialized from the attributes the way a parser would.
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut el = Element::new(tag);
        for (name, value) in attrs {
            el.set_attr(name, value);
        }
        el.value = el.default_value();
        el.checked = el.attr("checked").is_some();
        el.selected = el.attr("selected").is_some();
        let id = NodeId(self.nodes.len());
        self.nodes.push(el);
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag, attrs);
        self.append_child(&parent, &id);
        id
    }

    /// Create an element holding `text` and append it to `parent`.
    ///
    /// For a `<textarea>` the text is also its default and current value.
    pub fn append_with_text(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let id = self.append(parent, tag, attrs);
        if let Some(el) = self.nodes.get_mut(id.0) {
            el.text = text.to_owned();
            if el.kind() == FieldKind::TextArea {
                el.value = text.to_owned();
            }
        }
        id
    }

    /// Direct children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.get(node) {
            Some(el) => &el.children,
            None => &[],
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|el| el.parent);
        }
        false
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    /// Preorder descendants of `scope`, excluding `scope` itself.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|el| el.tag == "option"))
            .collect()
    }

    fn option_value(&self, option: NodeId) -> String {
        self.get(option).map_or_else(String::new, |el| {
            el.attr("value").map_or_else(|| el.text.clone(), str::to_owned)
        })
    }

    /// The selected option, falling back to the first one as a single-select does.
    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options = self.options(select);
        options
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|el| el.selected))
            .or_else(|| options.first().copied())
    }

    fn select_where(&mut self, select: NodeId, pick: impl Fn(usize, &str) -> bool) -> bool {
        let options = self.options(select);
        let Some(hit) = options
            .iter()
            .enumerate()
            .position(|(i, id)| pick(i, &self.option_value(*id)))
        else {
            // Unknown value: leave the current selection in place.
            return false;
        };
        for (i, id) in options.into_iter().enumerate() {
            if let Some(el) = self.get_mut(id) {
                el.selected = i == hit;
            }
        }
        true
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.get(node).and_then(|el| el.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(el) = self.get_mut(node) {
            el.parent = None;
        }
    }

    fn copy_subtree(&mut self, node: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let mut copy = self.get(node)?.clone();
        let children = std::mem::take(&mut copy.children);
        copy.parent = parent;
        let id = NodeId(self.nodes.len());
        self.nodes.push(copy);
        for child in children {
            if let Some(child_copy) = self.copy_subtree(child, Some(id)) {
                if let Some(el) = self.get_mut(id) {
                    el.children.push(child_copy);
                }
            }
        }
        Some(id)
    }
}

impl Document for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.get(*node).and_then(|el| el.attr("id")) == Some(id))
    }

    fn query_selector_all(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|node| self.get(*node).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node)
            .and_then(|el| el.parent)
            .filter(|p| *p != self.root)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get(*node)?.attr(name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(*node) {
            el.set_attr(name, value);
        }
    }

    fn field_kind(&self, node: &NodeId) -> FieldKind {
        self.get(*node).map_or(FieldKind::Other, Element::kind)
    }

    fn value(&self, node: &NodeId) -> String {
        match self.field_kind(node) {
            FieldKind::Select => self
                .selected_option(*node)
                .map(|opt| self.option_value(opt))
                .unwrap_or_default(),
            FieldKind::Other => String::new(),
            _ => self.get(*node).map(|el| el.value.clone()).unwrap_or_default(),
        }
    }

    fn set_value(&mut self, node: &NodeId, value: &str) {
        match self.field_kind(node) {
            FieldKind::Select => {
                if !self.select_where(*node, |_, v| v == value) {
                    log::debug!("no option {value:?} in select {node:?}");
                }
            }
            FieldKind::Other => {}
            _ => {
                if let Some(el) = self.get_mut(*node) {
                    el.value = value.to_owned();
                }
            }
        }
    }

    fn checked(&self, node: &NodeId) -> bool {
        self.get(*node).is_some_and(|el| el.checked)
    }

    fn set_checked(&mut self, node: &NodeId, checked: bool) {
        if matches!(self.field_kind(node), FieldKind::Checkbox | FieldKind::Radio) {
            if let Some(el) = self.get_mut(*node) {
                el.checked = checked;
            }
        }
    }

    fn set_selected_index(&mut self, node: &NodeId, index: usize) {
        if self.field_kind(node) == FieldKind::Select {
            self.select_where(*node, |i, _| i == index);
        }
    }

    fn set_required(&mut self, node: &NodeId, required: bool) {
        if let Some(el) = self.get_mut(*node) {
            if required {
                el.set_attr("required", "");
            } else {
                el.remove_attr("required");
            }
        }
    }

    fn reset_form(&mut self, form: &NodeId) {
        for node in self.descendants(*form) {
            let Some(el) = self.get_mut(node) else {
                continue;
            };
            match el.kind() {
                FieldKind::Checkbox | FieldKind::Radio => el.checked = el.attr("checked").is_some(),
                FieldKind::TextLike | FieldKind::TextArea => el.value = el.default_value(),
                FieldKind::Other if el.tag == "option" => el.selected = el.attr("selected").is_some(),
                _ => {}
            }
        }
    }

    fn display(&self, node: &NodeId) -> String {
        self.get(*node).map(|el| el.display.clone()).unwrap_or_default()
    }

    fn set_display(&mut self, node: &NodeId, display: &str) {
        if let Some(el) = self.get_mut(*node) {
            el.display = display.to_owned();
        }
    }

    fn text(&self, node: &NodeId) -> String {
        let Some(el) = self.get(*node) else {
            return String::new();
        };
        let mut out = el.text.clone();
        for child in self.descendants(*node) {
            if let Some(c) = self.get(child) {
                out.push_str(&c.text);
            }
        }
        out
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        for child in self.children(*node).to_vec() {
            self.detach(child);
        }
        if let Some(el) = self.get_mut(*node) {
            el.text = text.to_owned();
        }
    }

    fn clone_deep(&mut self, node: &NodeId) -> Option<NodeId> {
        self.copy_subtree(*node, None)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.get(*parent).is_none() || self.is_inclusive_ancestor(*child, *parent) {
            return;
        }
        self.detach(*child);
        if let Some(el) = self.get_mut(*child) {
            el.parent = Some(*parent);
        }
        if let Some(p) = self.get_mut(*parent) {
            p.children.push(*child);
        }
    }

    fn remove(&mut self, node: &NodeId) {
        self.detach(*node);
    }

    fn create_hidden_input(&mut self, name: &str, value: &str) -> Option<NodeId> {
        Some(self.create_element("input", &[("type", "hidden"), ("name", name), ("value", value)]))
    }
}
