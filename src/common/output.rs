//! Labeled console output
//!
//! Each line carries an icon and a label naming the feature that emitted it,
//! e.g. `i  functions: ensuring required API run.googleapis.com is enabled...`.

use colored::Colorize;

/// Status icons for labeled lines
pub mod icons {
    pub const BULLET: &str = "i";
    pub const SUCCESS: &str = "✔";
    pub const WARNING: &str = "⚠";
}

fn render(icon: &str, label: &str, message: &str) -> String {
    if label.is_empty() {
        format!("{}  {}", icon, message)
    } else {
        format!("{}  {} {}", icon, format!("{}:", label).bold(), message)
    }
}

/// Informational line
pub fn labeled_bullet(label: &str, message: &str) {
    println!("{}", render(&icons::BULLET.cyan().bold().to_string(), label, message));
}

/// Success line
pub fn labeled_success(label: &str, message: &str) {
    println!("{}", render(&icons::SUCCESS.green().bold().to_string(), label, message));
}

/// Warning line
pub fn labeled_warning(label: &str, message: &str) {
    println!("{}", render(&icons::WARNING.yellow().bold().to_string(), label, message));
}

/// Bold a name inside a message
pub fn bold(text: &str) -> String {
    text.bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_label() {
        colored::control::set_override(false);
        assert_eq!(
            render("i", "functions", "hello"),
            "i  functions: hello"
        );
    }

    #[test]
    fn test_render_without_label() {
        colored::control::set_override(false);
        assert_eq!(render("✔", "", "done"), "✔  done");
    }
}
