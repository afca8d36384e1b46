//! Styled terminal output for per-mutant results.

use console::Style;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_pass(msg: &str) {
    let style = Style::new().green();
    println!("{} {}", style.apply_to("✓ PASS"), msg);
}

pub fn print_fail(msg: &str) {
    let style = Style::new().red();
    println!("{} {}", style.apply_to("✗ FAIL"), msg);
}

pub fn print_skip(msg: &str) {
    println!("~ SKIP {}", msg);
}
