use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Width of the label column in stat lines
const KEY_WIDTH: usize = 12;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().title.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().ok.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

/// Titled block of stat lines, underlined to the title's width
pub fn group(icon: &str, title: &str) {
    let heading = format!("{icon} {title}");
    let width = console::measure_text_width(&heading);
    println!();
    println!("{}", heading.style(theme().title.clone()));
    println!("{}", "─".repeat(width).style(theme().faint.clone()));
}

/// `  label        value`, with the value styled as a figure
pub fn stat_line(label: &str, value: &str) {
    println!(
        "  {} {}",
        format!("{label:<KEY_WIDTH$}").style(theme().key.clone()),
        value.style(theme().figure.clone())
    );
}

/// Stat line whose value is a placeholder such as "none"
pub fn stat_placeholder(label: &str, text: &str) {
    println!(
        "  {} {}",
        format!("{label:<KEY_WIDTH$}").style(theme().key.clone()),
        text.style(theme().faint.clone())
    );
}
