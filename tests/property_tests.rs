//! Property-based tests for pyshim
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use std::collections::HashSet;

use proptest::prelude::*;
use pyshim::ast::build::*;
use pyshim::ast::{Program, Spanned, Stmt};
use pyshim::backend::codegen::BlockLabels;
use pyshim::backend::zig_emitter::{to_zig_ident, zig_string_literal};
use pyshim::{CodegenConfig, generate};

// =============================================================================
// Label Properties
// =============================================================================

proptest! {
    /// Property: no two labels handed out by one allocator are equal, whatever the bases.
    #[test]
    fn labels_never_collide(bases in prop::collection::vec("[a-z_0-9.]{0,8}", 1..64)) {
        let mut labels = BlockLabels::new();
        let mut seen = HashSet::new();
        for base in &bases {
            let name = labels.allocate(base).name();
            prop_assert!(seen.insert(name.clone()), "duplicate label {}", name);
        }
    }

    /// Property: labels are valid Zig identifiers.
    #[test]
    fn labels_are_identifiers(base in ".{0,12}") {
        let name = BlockLabels::new().allocate(&base).name();
        let mut chars = name.chars();
        let first = chars.next().unwrap();
        prop_assert!(first.is_ascii_alphabetic() || first == '_');
        prop_assert!(chars.all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}

// =============================================================================
// Escaping Properties
// =============================================================================

proptest! {
    /// Property: string literals never contain a raw newline or an unescaped quote.
    #[test]
    fn string_literals_are_single_line(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let lit = zig_string_literal(&bytes);
        prop_assert!(lit.starts_with('"') && lit.ends_with('"'));
        prop_assert!(!lit.contains('\n'));
        let inner = &lit[1..lit.len() - 1];
        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                prop_assert_ne!(c, '"');
            }
        }
    }

    /// Property: a lowercase Python name either passes through or is quoted whole.
    #[test]
    fn plain_identifiers_pass_through(name in "[a-z][a-z0-9_]{0,10}") {
        let ident = to_zig_ident(&name);
        let quoted = format!("@\"{}\"", name);
        prop_assert!(ident == name || ident == quoted);
    }
}

// =============================================================================
// Whole-unit Properties
// =============================================================================

fn isleap_stmt(year: i64) -> Spanned<Stmt> {
    expr_stmt(module_call("calendar", "isleap", vec![int(year)]))
}

proptest! {
    /// Property: N computed calls in one unit allocate N distinct labels in call order.
    #[test]
    fn repeated_calls_get_sequential_labels(years in prop::collection::vec(1i64..3000, 1..20)) {
        let mut body = vec![import("calendar")];
        body.extend(years.iter().map(|y| isleap_stmt(*y)));
        let out = generate(&Program { source: None, body }, CodegenConfig::new().fragment()).unwrap();
        for i in 0..years.len() {
            let needle = format!("isleap_{}: {{", i);
            prop_assert_eq!(out.matches(&needle).count(), 1);
        }
        prop_assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    /// Property: the indentation width only changes leading whitespace.
    #[test]
    fn indent_width_only_changes_indentation(width in 1usize..9, year in 1i64..3000) {
        let body = vec![import("calendar"), isleap_stmt(year)];
        let p = Program { source: None, body };
        let a = generate(&p, CodegenConfig::new().with_indent_width(width)).unwrap();
        let b = generate(&p, CodegenConfig::new()).unwrap();
        let strip = |s: &str| s.lines().map(|l| l.trim_start().to_string()).collect::<Vec<_>>();
        prop_assert_eq!(strip(&a), strip(&b));
    }
}
