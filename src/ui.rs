//! Terminal output for rmb-deploy.

use colored::{ColoredString, Colorize};

/// Width of the key column in `field` lines
const FIELD_WIDTH: usize = 9;

/// Leading mark of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Warn,
    Fail,
    Note,
}

impl Mark {
    pub fn symbol(self) -> ColoredString {
        match self {
            Self::Ok => "✓".green(),
            Self::Warn => "⚠".yellow(),
            Self::Fail => "✗".red(),
            Self::Note => "ℹ".blue(),
        }
    }
}

/// Print a marked status line; `Fail` lines go to stderr
pub fn status(mark: Mark, msg: &str) {
    if mark == Mark::Fail {
        eprintln!("{} {msg}", mark.symbol());
    } else {
        println!("{} {msg}", mark.symbol());
    }
}

/// Bold title underlined to its width
pub fn title(text: &str) {
    println!("\n{}\n{}", text.bold(), "─".repeat(text.chars().count()).dimmed());
}

pub fn section(text: &str) {
    println!("\n{}", text.cyan().bold());
}

/// `  Settings  repairmybike.settings`
pub fn field(key: &str, value: &str) {
    println!("  {} {value}", format!("{key:<FIELD_WIDTH$}").dimmed());
}

pub fn rule() {
    println!("{}", "=".repeat(50).dimmed());
}

/// `1 failed task`, `2 failed tasks`
pub fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{n} {}", if n == 1 { singular } else { plural })
}

pub fn banner() {
    println!(
        "{}",
        r"
  ┬─┐┌┬┐┌┐   ┌┬┐┌─┐┌─┐┬  ┌─┐┬ ┬
  ├┬┘│││├┴┐   ││├┤ ├─┘│  │ │└┬┘
  ┴└─┴ ┴└─┘  ─┴┘└─┘┴  ┴─┘└─┘ ┴
"
        .cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_singular_and_plural() {
        assert_eq!(count(1, "failed task", "failed tasks"), "1 failed task");
        assert_eq!(count(0, "failed task", "failed tasks"), "0 failed tasks");
        assert_eq!(count(3, "failed task", "failed tasks"), "3 failed tasks");
    }

    #[test]
    fn test_marks_are_distinct() {
        colored::control::set_override(false);
        let symbols: Vec<String> = [Mark::Ok, Mark::Warn, Mark::Fail, Mark::Note]
            .into_iter()
            .map(|m| m.symbol().to_string())
            .collect();
        assert_eq!(symbols, ["✓", "⚠", "✗", "ℹ"]);
    }
}
