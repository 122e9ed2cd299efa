//! Zig keyword vocabulary (for codegen identifier escaping).

/// Keywords and reserved identifiers in Zig.
///
/// Primitive type names are included: binding a Python variable called `bool` or `type` would shadow them.
pub const ZIG_KEYWORDS: &[&str] = &[
    "addrspace", "align", "allowzero", "and", "anyframe", "anytype", "asm", "async", "await", "break", "callconv",
    "catch", "comptime", "const", "continue", "defer", "else", "enum", "errdefer", "error", "export", "extern", "fn",
    "for", "if", "inline", "linksection", "noalias", "noinline", "nosuspend", "opaque", "or", "orelse", "packed",
    "pub", "resume", "return", "struct", "suspend", "switch", "test", "threadlocal", "try", "union", "unreachable",
    "usingnamespace", "var", "volatile", "while", "bool", "type", "void", "true", "false", "null", "undefined",
    "anyerror", "anyopaque", "noreturn", "isize", "usize", "f16", "f32", "f64", "f80", "f128", "u8", "i8", "u16",
    "i16", "u32", "i32", "u64", "i64", "u128", "i128", "c_int", "c_uint", "c_long", "c_char",
];

/// Check whether an identifier is reserved in Zig.
pub fn is_keyword(name: &str) -> bool {
    ZIG_KEYWORDS.contains(&name)
}
