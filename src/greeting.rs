//! The trivial greeting endpoint the front-end shares with replication.

/// Greet `name`; blank input gets a generic greeting.
#[must_use]
pub fn get_greeting(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "Hello!".to_string()
    } else {
        format!("Hello, {name}!")
    }
}
