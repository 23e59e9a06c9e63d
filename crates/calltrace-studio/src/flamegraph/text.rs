//! Terminal rendering of hot paths: a table plus a bar chart.

use crate::output::schema::HotPath;
use crate::utils::config::STACK_SEPARATOR;
use colored::{ColoredString, Colorize};

const STACK_COLUMN: usize = 48;
const BAR_WIDTH: usize = 40;

/// Create a text summary with percentages and table formatting
pub fn generate_text_summary(hot_paths: &[HotPath], max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.extend(render_hot_path_table(hot_paths, max_lines));
    lines.push(String::new());
    lines.extend(render_bar_chart(hot_paths));

    if hot_paths.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} paths)",
            max_lines,
            hot_paths.len()
        ));
    }

    lines.join("\n")
}

fn render_hot_path_table(hot_paths: &[HotPath], max_lines: usize) -> Vec<String> {
    let rule = format!(
        "  +-{}-+-{}-+-{}-+-{}-+",
        "-".repeat(STACK_COLUMN),
        "-".repeat(12),
        "-".repeat(8),
        "-".repeat(7)
    );

    let mut lines = vec![
        format!("  {}", "HOT PATHS (self time)".bold()),
        rule.clone(),
        format!(
            "  | {:<width$} | {:>12} | {:>8} | {:>7} |",
            "Call Stack (Hottest First)",
            "TIME",
            "CALLS",
            "%",
            width = STACK_COLUMN
        ),
        rule.clone(),
    ];

    for path in hot_paths.iter().take(max_lines) {
        let display_stack = format!(
            "{:<width$}",
            truncate_stack(&path.stack, STACK_COLUMN),
            width = STACK_COLUMN
        );
        lines.push(format!(
            "  | {} | {:>12} | {:>8} | {:>6.1}% |",
            heat(display_stack, path.percentage),
            path.time,
            path.calls,
            path.percentage
        ));
    }

    lines.push(rule);
    lines
}

fn render_bar_chart(hot_paths: &[HotPath]) -> Vec<String> {
    let mut lines = vec![format!("  {}", "TOP FRAMES".bold())];

    for path in hot_paths.iter().take(5) {
        let bar_width = ((path.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "{:<width$}",
            "#".repeat(bar_width.min(BAR_WIDTH)),
            width = BAR_WIDTH
        );
        let leaf = path
            .stack
            .rsplit(STACK_SEPARATOR)
            .next()
            .unwrap_or(&path.stack);

        lines.push(format!(
            "  - {:<24} {} {:>5.1}%",
            truncate_stack(leaf, 24),
            heat(bar, path.percentage),
            path.percentage
        ));
    }

    lines
}

/// Colour by share of total time
fn heat(text: String, percentage: f64) -> ColoredString {
    if percentage >= 25.0 {
        text.red().bold()
    } else if percentage >= 10.0 {
        text.yellow()
    } else {
        text.normal()
    }
}

/// Keep the tail of a stack (the interesting end) within `max_len` chars.
///
/// Widths below 3 still get the "..." marker.
pub fn truncate_stack(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = s.chars().skip(count - keep).collect();
        format!("...{}", tail)
    } else {
        s.to_string()
    }
}
