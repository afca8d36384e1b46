use gomute::ast::NodeRef;
use gomute::parse;
use gomute::printer;
use gomute::registry::Registry;
use gomute::skip;
use gomute::types::TypeInfo;
use gomute::walker;

/// Runs one mutator over a source file, asserting that the tree is restored
/// to its pristine print after every revert, and returns the mutant prints.
fn mutate(source: &str, mutator: &str) -> Vec<String> {
    let mut tree = parse::parse_source(source).unwrap();
    let info = TypeInfo::infer(&tree);
    let skip_map = skip::skips(&tree);
    let m = Registry::with_defaults().lookup(mutator).unwrap();
    let pristine = printer::print(&tree);

    let mut mutants = Vec::new();
    let mut restored = true;
    walker::mutate_walk(
        &mut tree,
        &info,
        NodeRef::File,
        m,
        &skip_map,
        &mut |t| mutants.push(printer::print(t)),
        &mut |t| {
            if printer::print(t) != pristine {
                restored = false;
            }
        },
    );
    assert!(restored, "tree must print pristine after every revert");
    assert_eq!(printer::print(&tree), pristine);
    mutants
}

// --- arithmetic/base ---

#[test]
fn arithmetic_base_swaps_operators() {
    let source = "package demo\n\nfunc calc(a, b int) int {\n\treturn a + b*2\n}\n";
    let mutants = mutate(source, "arithmetic/base");
    assert_eq!(mutants.len(), 2);
    assert!(mutants[0].contains("a - b*2") || mutants[0].contains("a - b"));
    assert!(mutants[1].contains("b / 2"));
}

#[test]
fn arithmetic_base_rem_becomes_mul() {
    let source = "package demo\n\nfunc even(n int) bool {\n\treturn n%2 == 0\n}\n";
    let mutants = mutate(source, "arithmetic/base");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("n * 2"));
}

#[test]
fn arithmetic_base_skips_string_concatenation() {
    let source = "package demo\n\nfunc greet(name string) string {\n\treturn \"hello \" + name\n}\n";
    let mutants = mutate(source, "arithmetic/base");
    assert!(mutants.is_empty(), "string concatenation must not be mutated");
}

#[test]
fn arithmetic_base_skips_local_string_variables() {
    let source = "package demo\n\nfunc join() string {\n\ta := \"x\"\n\tb := a + \"y\"\n\treturn b\n}\n";
    let mutants = mutate(source, "arithmetic/base");
    assert!(mutants.is_empty());
}

#[test]
fn arithmetic_base_skips_declared_string_vars() {
    let source = "package demo\n\nfunc join(parts []string) string {\n\tvar out string\n\tfor _, p := range parts {\n\t\tout = out + p\n\t}\n\treturn out\n}\n";
    let mutants = mutate(source, "arithmetic/base");
    assert!(mutants.is_empty());
}

// --- arithmetic/bitwise ---

#[test]
fn bitwise_swaps_operators() {
    let source = "package demo\n\nfunc mask(a, b int) int {\n\treturn a & b\n}\n";
    let mutants = mutate(source, "arithmetic/bitwise");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("a | b"));
}

#[test]
fn bitwise_shift_swaps() {
    let source = "package demo\n\nfunc shl(a int) int {\n\treturn a << 3\n}\n";
    let mutants = mutate(source, "arithmetic/bitwise");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("a >> 3"));
}

#[test]
fn bitwise_mutation_keeps_grouping() {
    // a | b&c groups as a | (b & c); the mutated operator must not rebind it.
    let source = "package demo\n\nfunc f(a, b, c int) int {\n\treturn a | b&c\n}\n";
    let mutants = mutate(source, "arithmetic/bitwise");
    assert_eq!(mutants.len(), 2);
    assert!(mutants[0].contains("a & (b & c)"), "got: {}", mutants[0]);
}

// --- arithmetic/assignment and assign_invert ---

#[test]
fn assignment_compound_becomes_plain() {
    let source = "package demo\n\nfunc inc(n int) int {\n\tn += 1\n\treturn n\n}\n";
    let mutants = mutate(source, "arithmetic/assignment");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("n = 1"));
}

#[test]
fn assign_invert_swaps_compound_operator() {
    let source = "package demo\n\nfunc inc(n int) int {\n\tn += 2\n\treturn n\n}\n";
    let mutants = mutate(source, "arithmetic/assign_invert");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("n -= 2"));
}

#[test]
fn assign_invert_skips_string_append() {
    let source = "package demo\n\nfunc cat(s string) string {\n\ts += \"x\"\n\treturn s\n}\n";
    let mutants = mutate(source, "arithmetic/assign_invert");
    assert!(mutants.is_empty());
}

// --- branch ---

#[test]
fn branch_if_negates_condition() {
    let source = "package demo\n\nfunc pos(n int) bool {\n\tif n > 0 {\n\t\treturn true\n\t}\n\treturn false\n}\n";
    let mutants = mutate(source, "branch/if");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("if !(n > 0) {"), "got: {}", mutants[0]);
}

#[test]
fn branch_else_removes_plain_else() {
    let source = "package demo\n\nfunc sign(n int) int {\n\tif n > 0 {\n\t\treturn 1\n\t} else {\n\t\treturn -1\n\t}\n}\n";
    let mutants = mutate(source, "branch/else");
    assert_eq!(mutants.len(), 1);
    assert!(!mutants[0].contains("else"), "got: {}", mutants[0]);
    assert!(!mutants[0].contains("return -1"), "got: {}", mutants[0]);
}

#[test]
fn branch_else_skips_else_if_chains() {
    let source = "package demo\n\nfunc sign(n int) int {\n\tif n > 0 {\n\t\treturn 1\n\t} else if n < 0 {\n\t\treturn -1\n\t}\n\treturn 0\n}\n";
    let mutants = mutate(source, "branch/else");
    // Only the inner if has a removable else (none); the outer else is an
    // if statement and is skipped.
    assert!(mutants.is_empty());
}

// --- expression/remove ---

#[test]
fn expression_remove_keeps_either_operand() {
    let source = "package demo\n\nfunc both(a, b bool) bool {\n\tif a && b {\n\t\treturn true\n\t}\n\treturn false\n}\n";
    let mutants = mutate(source, "expression/remove");
    assert_eq!(mutants.len(), 2);
    assert!(mutants[0].contains("if a {"));
    assert!(mutants[1].contains("if b {"));
}

#[test]
fn expression_remove_handles_or() {
    let source = "package demo\n\nfunc any(a, b bool) bool {\n\treturn a || b\n}\n";
    let mutants = mutate(source, "expression/remove");
    assert_eq!(mutants.len(), 2);
    assert!(mutants[0].contains("return a\n"));
    assert!(mutants[1].contains("return b\n"));
}

// --- loop ---

#[test]
fn loop_break_injects_break_at_head() {
    let source = "package demo\n\nfunc spin(n int) int {\n\tfor i := 0; i < n; i++ {\n\t\tn--\n\t}\n\treturn n\n}\n";
    let mutants = mutate(source, "loop/break");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("{\n\t\tbreak\n\t\tn--\n"), "got: {}", mutants[0]);
}

#[test]
fn loop_condition_negates() {
    let source = "package demo\n\nfunc spin(n int) {\n\tfor n > 0 {\n\t\tn--\n\t}\n}\n";
    let mutants = mutate(source, "loop/condition");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("for !(n > 0) {"));
}

#[test]
fn loop_condition_skips_infinite_and_range_loops() {
    let source = "package demo\n\nfunc spin(xs []int) {\n\tfor {\n\t\tbreak\n\t}\n\tfor range xs {\n\t\tbreak\n\t}\n}\n";
    let mutants = mutate(source, "loop/condition");
    assert!(mutants.is_empty());
}

#[test]
fn range_break_injects_break() {
    let source = "package demo\n\nfunc sum(xs []int) int {\n\ttotal := 0\n\tfor _, v := range xs {\n\t\ttotal += v\n\t}\n\treturn total\n}\n";
    let mutants = mutate(source, "loop/range_break");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("range xs {\n\t\tbreak\n"), "got: {}", mutants[0]);
}

#[test]
fn loop_break_ignores_range_loops() {
    let source = "package demo\n\nfunc sum(xs []int) {\n\tfor _, v := range xs {\n\t\t_ = v\n\t}\n}\n";
    assert!(mutate(source, "loop/break").is_empty());
}

// --- numbers ---

#[test]
fn numbers_increment_and_decrement() {
    let source = "package demo\n\nfunc f() int {\n\treturn 41\n}\n";
    let inc = mutate(source, "numbers/incrementer");
    assert_eq!(inc.len(), 1);
    assert!(inc[0].contains("return 42"));

    let dec = mutate(source, "numbers/decrementer");
    assert_eq!(dec.len(), 1);
    assert!(dec[0].contains("return 40"));
}

#[test]
fn numbers_skip_non_decimal_literals() {
    let source = "package demo\n\nfunc f() int {\n\treturn 0x1F\n}\n";
    assert!(mutate(source, "numbers/incrementer").is_empty());
    assert!(mutate(source, "numbers/decrementer").is_empty());
}

// --- statement/remove ---

#[test]
fn statement_remove_preserves_reads() {
    let source = "package demo\n\nfunc bump(n int) int {\n\tn++\n\treturn n\n}\n";
    let mutants = mutate(source, "statement/remove");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("_ = n"), "got: {}", mutants[0]);
    assert!(!mutants[0].contains("n++"));
}

#[test]
fn statement_remove_keeps_selector_and_argument_reads() {
    let source = "package demo\n\nimport \"fmt\"\n\nfunc log(a, b int) {\n\tfmt.Println(a, b)\n}\n";
    let mutants = mutate(source, "statement/remove");
    assert_eq!(mutants.len(), 1);
    assert!(
        mutants[0].contains("_, _, _ = fmt.Println, a, b"),
        "got: {}",
        mutants[0]
    );
}

#[test]
fn statement_remove_skips_declarations_and_blank_assigns() {
    let source = "package demo\n\nfunc f(a int) int {\n\tx := a\n\t_ = x\n\treturn x\n}\n";
    let mutants = mutate(source, "statement/remove");
    // `x := a` is a declaration, `_ = x` has an all-blank left side, and the
    // return is not removable.
    assert!(mutants.is_empty());
}

#[test]
fn statement_remove_builtin_call_with_no_reads_removes_cleanly() {
    let source = "package demo\n\nfunc f() {\n\tprintln(1)\n}\n";
    let mutants = mutate(source, "statement/remove");
    assert_eq!(mutants.len(), 1);
    assert!(!mutants[0].contains("println"), "got: {}", mutants[0]);
}

#[test]
fn statement_remove_works_in_case_bodies() {
    let source = "package demo\n\nfunc f(n, m int) int {\n\tswitch n {\n\tcase 1:\n\t\tm++\n\t}\n\treturn m\n}\n";
    let mutants = mutate(source, "statement/remove");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].contains("case 1:\n\t\t_ = m"), "got: {}", mutants[0]);
}

// --- skip directive ---

#[test]
fn nomutesting_directive_suppresses_mutations_on_its_line() {
    let skipped = "package demo\n\nfunc add(a, b int) int {\n\treturn a + b // nomutesting\n}\n";
    assert!(mutate(skipped, "arithmetic/base").is_empty());

    let plain = "package demo\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n";
    assert_eq!(mutate(plain, "arithmetic/base").len(), 1);
}

// --- determinism ---

#[test]
fn mutation_sequences_are_deterministic() {
    let source = "package demo\n\nfunc f(a, b int) int {\n\tif a > 0 && b > 0 {\n\t\treturn a + b\n\t}\n\treturn a % b\n}\n";
    let registry = Registry::with_defaults();
    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut all = Vec::new();
        for name in registry.list() {
            for mutant in mutate(source, name) {
                all.push(gomute::serialize::fingerprint(mutant.as_bytes()));
            }
        }
        runs.push(all);
    }
    assert_eq!(runs[0], runs[1]);
    assert!(!runs[0].is_empty());
}
