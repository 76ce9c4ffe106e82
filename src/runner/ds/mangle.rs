//! Registration-time rewriting of class-private attribute names.
//!
//! A name is private when it starts with at least two underscores and ends with at most
//! one (`__x`, `__x_`, but not `__x__`). Private names declared by a class are rewritten to
//! `_<ClassName><name>` so that a subclass declaring the same surface name gets its own key.

/// Is `name` a class-private name subject to mangling?
pub fn is_private_name(name: &str) -> bool {
    name.starts_with("__") && !name.ends_with("__") && name.chars().any(|c| c != '_')
}

/// Scope `name` to `class_name` if it is private, otherwise return it unchanged.
///
/// Leading underscores of the class name are dropped; a class named only with
/// underscores does not mangle at all.
pub fn mangle(class_name: &str, name: &str) -> String {
    if !is_private_name(name) {
        return name.to_string();
    }
    let owner = class_name.trim_start_matches('_');
    if owner.is_empty() {
        name.to_string()
    } else {
        format!("_{}{}", owner, name)
    }
}
