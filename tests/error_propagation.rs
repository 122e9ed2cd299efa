//! Errors from deep inside emission reach the caller, and failed statements leave nothing behind.

use pyshim::ast::build::*;
use pyshim::ast::{CallArg, Expr, ImportFromStmt, ImportItem, Program, Span, Spanned, Stmt};
use pyshim::{CodegenConfig, CodegenError, NativeCodegen, generate};

fn spanned_call(module: &str, symbol: &str, start: usize, end: usize) -> Spanned<Expr> {
    Spanned::new(
        Expr::Call(Box::new(attr(name(module), symbol)), vec![CallArg::Positional(int(1))]),
        Span::new(start, end),
    )
}

#[test]
fn unknown_module_import_fails() {
    let p = Program {
        source: None,
        body: vec![import("numpy")],
    };
    let errs = generate(&p, CodegenConfig::new()).unwrap_err();
    assert!(matches!(errs.first(), Some(CodegenError::UnsupportedModule { module, .. }) if module == "numpy"));
}

#[test]
fn unknown_symbol_carries_call_span() {
    let p = Program {
        source: None,
        body: vec![import("calendar"), expr_stmt(spanned_call("calendar", "prcal", 16, 32))],
    };
    let errs = generate(&p, CodegenConfig::new()).unwrap_err();
    match errs.first() {
        Some(CodegenError::UnsupportedSymbol { module, symbol, span }) => {
            assert_eq!(*module, "calendar");
            assert_eq!(symbol, "prcal");
            assert_eq!(*span, Span::new(16, 32));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn error_inside_a_handler_argument_propagates() {
    // The failing call is nested inside heappush's second argument, which is rendered mid-block.
    let inner = module_call("calendar", "prcal", vec![]);
    let p = Program {
        source: None,
        body: vec![
            import("calendar"),
            import("heapq"),
            expr_stmt(module_call("heapq", "heappush", vec![name("h"), inner])),
        ],
    };
    let errs = generate(&p, CodegenConfig::new().fragment()).unwrap_err();
    assert_eq!(errs.len(), 1);
    assert!(errs.first().unwrap().to_string().contains("calendar.prcal"));
}

#[test]
fn failing_argument_stops_the_handler_mid_block() {
    let mut cg = NativeCodegen::without_inference();
    cg.register_import("heapq", None, Span::default()).unwrap();
    cg.register_import("calendar", None, Span::default()).unwrap();
    let push = module_call("heapq", "heappush", vec![name("h"), module_call("calendar", "prcal", vec![])]);

    let err = cg.gen_expr(&push).unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedSymbol { ref symbol, .. } if symbol == "prcal"));
    // Nothing after the failing argument was written: no append, no sift, no break.
    let out = cg.output();
    assert!(out.ends_with("const heappush_0_item = "), "unexpected tail:\n{}", out);
    assert!(!out.contains("append"));
    assert!(!out.contains("break :heappush_0"));
}

#[test]
fn stdlib_function_read_as_value_is_an_error() {
    let p = Program {
        source: None,
        body: vec![
            import("calendar"),
            assign("f", attr(name("calendar"), "isleap")),
            import("functools"),
            assign("r", module_call("functools", "reduce", vec![name("f"), list(vec![int(1)])])),
        ],
    };
    let errs = generate(&p, CodegenConfig::new().fragment()).unwrap_err();
    assert_eq!(errs.len(), 1);
    match errs.first() {
        Some(CodegenError::Unsupported { construct, .. }) => {
            assert_eq!(construct, "`calendar.isleap` used as a value");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn from_imported_function_read_as_value_is_an_error() {
    let from = Spanned::bare(Stmt::ImportFrom(ImportFromStmt {
        module: "heapq".into(),
        names: vec![ImportItem {
            name: "heappop".into(),
            alias: Some("pop".into()),
        }],
    }));
    let p = Program {
        source: None,
        body: vec![from, assign("g", name("pop"))],
    };
    let errs = generate(&p, CodegenConfig::new().fragment()).unwrap_err();
    assert!(errs.first().unwrap().to_string().contains("`heapq.heappop` used as a value"));
}

#[test]
fn keep_going_reports_every_failure() {
    let bad_from = Spanned::bare(Stmt::ImportFrom(ImportFromStmt {
        module: "bisect".into(),
        names: vec![ImportItem {
            name: "bisect_middle".into(),
            alias: None,
        }],
    }));
    let p = Program {
        source: None,
        body: vec![
            import("numpy"),
            bad_from,
            assign("ok", int(1)),
            import("calendar"),
            expr_stmt(module_call("calendar", "prcal", vec![])),
        ],
    };
    let errs = generate(&p, CodegenConfig::new().with_keep_going(true)).unwrap_err();
    assert_eq!(errs.len(), 3);
    let messages: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
    assert!(messages[0].contains("numpy"));
    assert!(messages[1].contains("bisect.bisect_middle"));
    assert!(messages[2].contains("calendar.prcal"));
}

#[test]
fn stop_at_first_failure_by_default() {
    let p = Program {
        source: None,
        body: vec![import("numpy"), import("tensorflow")],
    };
    let errs = generate(&p, CodegenConfig::new()).unwrap_err();
    assert_eq!(errs.len(), 1);
}

#[test]
fn rebinding_an_import_hides_it() {
    let p = Program {
        source: None,
        body: vec![
            import("calendar"),
            assign("calendar", int(3)),
            assign("x", attr(name("calendar"), "prcal")),
        ],
    };
    // After rebinding, `calendar.prcal` is a plain field access on a local, not a stdlib lookup.
    let out = generate(&p, CodegenConfig::new().fragment()).unwrap();
    assert!(out.contains("const x = calendar.prcal;"));
}
