//! Formatting of shell command suggestions.

/// Wrap `arg` in double quotes when it contains whitespace.
///
/// Used for the `cd` line printed after generation, where the user copies the
/// command verbatim.
pub fn quote_if_spaced(arg: &str) -> String {
    if arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Render a `cd` suggestion for a relative path.
pub fn cd_command(relative: &str) -> String {
    format!("cd {}", quote_if_spaced(relative))
}
