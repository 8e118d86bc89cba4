//! The `data-*` attribute vocabularies
//!
//! Directives record rendering intent, flags record rendering outcome.
//! Any other attribute is ordinary markup.

pub const DIRECTIVES: &[&str] = &[
    // Execution
    "data-exec",
    "data-where",
    // Element attributes and contents
    "data-attr",
    "data-text",
    "data-icon",
    "data-refer",
    // Scoping
    "data-with",
    // Logical
    "data-if",
    "data-elif",
    "data-else",
    "data-switch",
    "data-case",
    "data-default",
    "data-for",
    "data-each",
    // Macros and parameters
    "data-macro",
    "data-par",
    // Inclusion
    "data-include",
    "data-set",
    "data-delete",
    "data-replace",
    "data-change",
    "data-before",
    "data-after",
    "data-prepend",
    "data-append",
    // Signals and interaction
    "data-when",
    "data-react",
    "data-on",
    "data-click",
    "data-call",
    // Range selection
    "data-begin",
    "data-end",
    // Comments
    "data-comments",
    "data-comment",
];

pub const FLAGS: &[&str] = &[
    "data-error",
    "data-warning",
    "data-hash",
    "data-off",
    "data-lock",
    "data-index",
    "data-out",
    "data-included",
    "data-extra",
];

/// Directives written without an argument
pub const ARGUMENTLESS: &[&str] = &["data-each", "data-else", "data-default"];

pub fn is_directive(attr: &str) -> bool {
    DIRECTIVES.contains(&attr)
}

pub fn is_flag(attr: &str) -> bool {
    FLAGS.contains(&attr)
}
