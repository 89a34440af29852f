//! Field names, labels, and the procedure sentinel shared with the server.

// ── Procedure selector ──────────────────────────────────────────

/// Procedure option that unlocks the free-text custom name field.
pub const CUSTOM_PROCEDURE: &str = "Custom";

// ── Row field names the default selectors target ───────────────

pub const FIELD_PROCEDURE_NAME: &str = "procedure_name[]";
pub const FIELD_CUSTOM_NAME: &str = "custom_name[]";

// ── Exclusion markers ───────────────────────────────────────────

/// Repeatable hidden field carrying the 0-based index of an excluded row.
pub const FIELD_EXCLUDE_INDEX: &str = "exclude_idx[]";

/// Attribute set on injected markers so a later submit can find and drop them.
pub const EXCLUDE_MARKER_ATTR: &str = "data-exclude-marker";

// ── Button labels ───────────────────────────────────────────────

pub const LABEL_ENABLE_ALL_MONTHLY: &str = "Enable all monthly estimates";
pub const LABEL_DISABLE_ALL_MONTHLY: &str = "Disable all monthly estimates";
pub const LABEL_HIDE_TERMS: &str = "Hide financing terms";
pub const LABEL_SHOW_TERMS: &str = "Financing terms";

// ── Style ───────────────────────────────────────────────────────

/// Inline `display` value that hides an element.
pub const DISPLAY_NONE: &str = "none";
