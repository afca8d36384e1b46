//! Unified diffs between original and mutated source.

use console::Style;
use similar::TextDiff;

/// Unified diff with three lines of context, headed `Original` /
/// `Mutation: <name>`.
pub fn compare(original: &str, mutated: &str, mutator_name: &str) -> String {
    let diff = TextDiff::from_lines(original, mutated);
    diff.unified_diff()
        .context_radius(3)
        .header("Original", &format!("Mutation: {}", mutator_name))
        .to_string()
}

/// Colors a unified diff for terminal output: deletions red, insertions
/// green, hunk markers magenta.
pub fn colorize(diff: &str) -> String {
    let red = Style::new().red();
    let green = Style::new().green();
    let magenta = Style::new().magenta();

    let mut out = String::new();
    for line in diff.lines() {
        let rendered = match line.bytes().next() {
            Some(b'-') => format!("{}", red.apply_to(line)),
            Some(b'+') => format!("{}", green.apply_to(line)),
            Some(b'@') => format!("{}", magenta.apply_to(line)),
            _ => line.to_string(),
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}
