//! Stdlib call dispatch.
//!
//! Every emulated module exposes one [`ModuleTable`]: a static slice of `(symbol, Shim)` pairs. The tables are plain
//! data; a single generic routine ([`NativeCodegen::dispatch`]) looks the symbol up and either writes a constant,
//! renders a template against the call's arguments, or runs a custom handler.
//!
//! ## Templates
//!
//! A [`Shim::Template`] is Zig text with positional placeholders `$0`..`$9` (the call's positional arguments, each
//! rendered through [`NativeCodegen::gen_expr`]) and `$$` for a literal dollar sign. When the call has fewer than
//! `min_args` positional arguments the template's `default` is written instead and no argument is rendered.
//!
//! ## Resolution
//!
//! Calls reach the dispatcher through the [`ImportMap`]: `import calendar as cal` binds `cal` to the calendar table,
//! `from bisect import insort as ins` binds `ins` to `bisect.insort`. Rebinding the name by assignment drops it.

use std::collections::HashMap;
use std::sync::LazyLock;

use pyshim_core::lang::stdlib::{self as std_modules, StdModuleId};
use pyshim_syntax::ast::{CallArg, Expr, Span, Spanned};

use super::codegen::{CodegenError, CodegenResult, NativeCodegen};
use super::stdlib;

/// A computed handler: reads the call's arguments and writes Zig text through the context.
pub type Handler = fn(&mut NativeCodegen<'_>, &CallArgs<'_>) -> CodegenResult<()>;

/// How one stdlib symbol is emitted.
#[derive(Clone, Copy)]
pub enum Shim {
    /// Fixed text; arguments are ignored.
    Const(&'static str),
    /// Text with `$N` placeholders, or `default` when fewer than `min_args` positional arguments are given.
    Template {
        min_args: usize,
        template: &'static str,
        default: &'static str,
    },
    /// Hand-written emission.
    Custom(Handler),
}

impl Shim {
    /// Short name for listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Shim::Const(_) => "const",
            Shim::Template { .. } => "template",
            Shim::Custom(_) => "computed",
        }
    }
}

impl std::fmt::Debug for Shim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shim::Const(text) => f.debug_tuple("Const").field(text).finish(),
            Shim::Template {
                min_args,
                template,
                default,
            } => f
                .debug_struct("Template")
                .field("min_args", min_args)
                .field("template", template)
                .field("default", default)
                .finish(),
            Shim::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The dispatch table of one emulated module.
#[derive(Debug)]
pub struct ModuleTable {
    pub module: StdModuleId,
    pub entries: &'static [(&'static str, Shim)],
}

static INDEX: LazyLock<HashMap<StdModuleId, HashMap<&'static str, &'static Shim>>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for table in stdlib::TABLES {
        let symbols: HashMap<&'static str, &'static Shim> =
            table.entries.iter().map(|(name, shim)| (*name, shim)).collect();
        index.insert(table.module, symbols);
    }
    tracing::debug!(modules = index.len(), "built stdlib dispatch index");
    index
});

impl ModuleTable {
    /// Find the shim for `symbol` (exact, case-sensitive).
    pub fn lookup(&self, symbol: &str) -> Option<&'static Shim> {
        INDEX.get(&self.module)?.get(symbol).copied()
    }

    /// Symbol names in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The arguments of one call, as handlers see them. Borrowed from the AST for the duration of the call.
#[derive(Debug, Clone)]
pub struct CallArgs<'n> {
    positional: Vec<&'n Spanned<Expr>>,
    named: Vec<(&'n str, &'n Spanned<Expr>)>,
    span: Span,
}

impl<'n> CallArgs<'n> {
    pub fn from_call(args: &'n [CallArg], span: Span) -> Self {
        let mut positional = Vec::new();
        let mut named = Vec::new();
        for arg in args {
            match arg {
                CallArg::Positional(value) => positional.push(value),
                CallArg::Named(name, value) => named.push((name.as_str(), value)),
            }
        }
        Self {
            positional,
            named,
            span,
        }
    }

    /// No arguments (attribute reads).
    pub fn empty(span: Span) -> Self {
        Self {
            positional: Vec::new(),
            named: Vec::new(),
            span,
        }
    }

    /// Positional arguments only.
    pub fn from_slice(args: &'n [Spanned<Expr>]) -> Self {
        let span = match (args.first(), args.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        };
        Self {
            positional: args.iter().collect(),
            named: Vec::new(),
            span,
        }
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'n Spanned<Expr>> {
        self.positional.get(index).copied()
    }

    pub fn named(&self, name: &str) -> Option<&'n Spanned<Expr>> {
        self.named.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// A parameter that may be passed either positionally at `index` or by keyword `name`.
    pub fn arg(&self, index: usize, name: &str) -> Option<&'n Spanned<Expr>> {
        self.get(index).or_else(|| self.named(name))
    }

    pub fn has_named(&self) -> bool {
        !self.named.is_empty()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Names bound to emulated modules and symbols in the current unit.
#[derive(Debug, Default)]
pub struct ImportMap {
    modules: HashMap<String, StdModuleId>,
    symbols: HashMap<String, (StdModuleId, String)>,
}

impl ImportMap {
    pub fn bind_module(&mut self, binding: &str, module: StdModuleId) {
        self.symbols.remove(binding);
        self.modules.insert(binding.to_string(), module);
    }

    pub fn bind_symbol(&mut self, binding: &str, module: StdModuleId, symbol: &str) {
        self.modules.remove(binding);
        self.symbols
            .insert(binding.to_string(), (module, symbol.to_string()));
    }

    pub fn module(&self, binding: &str) -> Option<StdModuleId> {
        self.modules.get(binding).copied()
    }

    pub fn symbol(&self, binding: &str) -> Option<(StdModuleId, &str)> {
        self.symbols
            .get(binding)
            .map(|(module, symbol)| (*module, symbol.as_str()))
    }

    /// Drop whatever `binding` referred to.
    pub fn forget(&mut self, binding: &str) {
        self.modules.remove(binding);
        self.symbols.remove(binding);
    }
}

impl NativeCodegen<'_> {
    /// Record `import module [as alias]`.
    pub fn register_import(&mut self, module: &str, alias: Option<&str>, span: Span) -> CodegenResult<()> {
        let Some(id) = std_modules::from_str(module) else {
            return Err(CodegenError::UnsupportedModule {
                module: module.to_string(),
                span,
            });
        };
        let binding = alias.unwrap_or(module);
        tracing::debug!(module, binding, "registered module import");
        self.imports.bind_module(binding, id);
        Ok(())
    }

    /// Record `from module import name [as alias]`. The symbol must exist in the module's table.
    pub fn register_from_import(
        &mut self,
        module: &str,
        name: &str,
        alias: Option<&str>,
        span: Span,
    ) -> CodegenResult<()> {
        let Some(id) = std_modules::from_str(module) else {
            return Err(CodegenError::UnsupportedModule {
                module: module.to_string(),
                span,
            });
        };
        if stdlib::table_for(id).lookup(name).is_none() {
            return Err(CodegenError::UnsupportedSymbol {
                module: std_modules::as_str(id),
                symbol: name.to_string(),
                span,
            });
        }
        let binding = alias.unwrap_or(name);
        tracing::debug!(module, symbol = name, binding, "registered symbol import");
        self.imports.bind_symbol(binding, id, name);
        Ok(())
    }

    /// Resolve a callee expression to an emulated `(module, symbol)`.
    pub(crate) fn resolve_callee(&self, func: &Spanned<Expr>) -> Option<(StdModuleId, String)> {
        match &func.node {
            Expr::Attribute(base, symbol) => match &base.node {
                Expr::Name(binding) => self.imports.module(binding).map(|m| (m, symbol.clone())),
                _ => None,
            },
            Expr::Name(binding) => self
                .imports
                .symbol(binding)
                .map(|(m, symbol)| (m, symbol.to_string())),
            _ => None,
        }
    }

    /// Look up `module.symbol` and emit it for `args`.
    pub fn dispatch(&mut self, module: StdModuleId, symbol: &str, args: &CallArgs<'_>) -> CodegenResult<()> {
        let table = stdlib::table_for(module);
        let Some(shim) = table.lookup(symbol) else {
            return Err(CodegenError::UnsupportedSymbol {
                module: std_modules::as_str(module),
                symbol: symbol.to_string(),
                span: args.span(),
            });
        };
        tracing::trace!(
            module = std_modules::as_str(module),
            symbol,
            args = args.len(),
            kind = shim.kind(),
            "dispatch stdlib call"
        );
        self.invoke(shim, args)
    }

    /// Emit `module.symbol` read without a call. Only constants have a value; functions cannot be referenced.
    pub fn read_symbol(&mut self, module: StdModuleId, symbol: &str, span: Span) -> CodegenResult<()> {
        let module_name = std_modules::as_str(module);
        match stdlib::table_for(module).lookup(symbol) {
            Some(Shim::Const(text)) => {
                self.emit_text_block(text);
                Ok(())
            }
            Some(_) => Err(CodegenError::unsupported(
                format!("`{}.{}` used as a value", module_name, symbol),
                span,
            )),
            None => Err(CodegenError::UnsupportedSymbol {
                module: module_name,
                symbol: symbol.to_string(),
                span,
            }),
        }
    }

    /// Run one shim against `args`.
    pub fn invoke(&mut self, shim: &Shim, args: &CallArgs<'_>) -> CodegenResult<()> {
        match *shim {
            Shim::Const(text) => {
                self.emit_text_block(text);
                Ok(())
            }
            Shim::Template {
                min_args,
                template,
                default,
            } => {
                if args.len() < min_args {
                    self.emit_text_block(default);
                    Ok(())
                } else {
                    self.render_template(template, args)
                }
            }
            Shim::Custom(handler) => handler(self, args),
        }
    }

    fn render_template(&mut self, template: &str, args: &CallArgs<'_>) -> CodegenResult<()> {
        let mut literal = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('$') => {
                    chars.next();
                    literal.push('$');
                }
                Some(d) if d.is_ascii_digit() => {
                    chars.next();
                    self.emit_text_block(&literal);
                    literal.clear();
                    let index = d as usize - '0' as usize;
                    let Some(arg) = args.get(index) else {
                        return Err(CodegenError::unsupported(
                            format!("template placeholder ${} without an argument", index),
                            args.span(),
                        ));
                    };
                    self.gen_expr(arg)?;
                }
                _ => literal.push('$'),
            }
        }
        self.emit_text_block(&literal);
        Ok(())
    }
}

/// Placeholder indices a template refers to.
pub fn template_placeholders(template: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                out.push(d as usize - '0' as usize);
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_template_renders_arguments_in_order() {
        let shim = Shim::Template {
            min_args: 2,
            template: "runtime.pair($1, $0, $$x)",
            default: "null",
        };
        let args = [name("a"), int(2)];
        let mut cg = NativeCodegen::without_inference();
        cg.invoke(&shim, &CallArgs::from_slice(&args)).unwrap();
        assert_eq!(cg.finish(), "runtime.pair(2, a, $x)");
    }

    #[test]
    fn test_template_default_skips_arguments() {
        let shim = Shim::Template {
            min_args: 2,
            template: "f($0, $1)",
            default: "0",
        };
        // The argument would fail to render; the default path must not touch it.
        let args = [Spanned::bare(Expr::Lambda(vec![], Box::new(name("x"))))];
        let mut cg = NativeCodegen::without_inference();
        cg.invoke(&shim, &CallArgs::from_slice(&args)).unwrap();
        assert_eq!(cg.finish(), "0");
    }

    #[test]
    fn test_placeholder_scan() {
        assert_eq!(template_placeholders("a($0, $1) $$2"), vec![0, 1]);
        assert!(template_placeholders("no args").is_empty());
    }

    #[test]
    fn test_call_args_keyword_fallback() {
        let args = vec![
            CallArg::Positional(name("rows")),
            CallArg::Named("delimiter".into(), str(";")),
        ];
        let call = CallArgs::from_call(&args, Span::new(0, 10));
        assert_eq!(call.len(), 1);
        assert!(call.has_named());
        assert_eq!(call.arg(1, "delimiter"), Some(args[1].value()));
        assert!(call.arg(2, "quotechar").is_none());
    }

    #[test]
    fn test_import_map_rebinding() {
        let mut imports = ImportMap::default();
        imports.bind_module("cal", StdModuleId::Calendar);
        imports.bind_symbol("cal", StdModuleId::Bisect, "bisect");
        assert_eq!(imports.module("cal"), None);
        assert_eq!(imports.symbol("cal"), Some((StdModuleId::Bisect, "bisect")));
        imports.forget("cal");
        assert_eq!(imports.symbol("cal"), None);
    }

    #[test]
    fn test_unknown_symbol_is_reported() {
        let mut cg = NativeCodegen::without_inference();
        let err = cg
            .dispatch(StdModuleId::Calendar, "prcal", &CallArgs::empty(Span::new(4, 9)))
            .unwrap_err();
        match err {
            CodegenError::UnsupportedSymbol { module, symbol, span } => {
                assert_eq!(module, "calendar");
                assert_eq!(symbol, "prcal");
                assert_eq!(span, Span::new(4, 9));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cg.output(), "");
    }
}
