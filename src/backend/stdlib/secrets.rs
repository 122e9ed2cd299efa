//! `secrets`: cryptographically strong randomness from `std.crypto.random`.
//!
//! The `token_*` functions take an optional byte count; a missing count or an explicit `None` means 32 bytes.

use super::{bind_sequence, body, c, f};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen, is_none_arg};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Secrets,
    entries: &[
        ("token_bytes", f(token_bytes)),
        ("token_hex", f(token_hex)),
        ("token_urlsafe", f(token_urlsafe)),
        ("randbelow", f(randbelow)),
        ("randbits", f(randbits)),
        ("choice", f(choice)),
        ("compare_digest", f(compare_digest)),
        ("SystemRandom", c("std.crypto.random")),
        ("DEFAULT_ENTROPY", c("32")),
    ],
};

const DEFAULT_ENTROPY: &str = "32";

/// Open a block holding `{l}_buf`, filled with `nbytes` random bytes.
fn open_random_buffer(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, base: &str) -> CodegenResult<BlockLabel> {
    let label = cg.emit_unique_block_start(base);
    match args.arg(0, "nbytes") {
        Some(n) if !is_none_arg(n) => cg.emit_block_bind_wrapped(&label, "n", "@as(usize, @intCast(", n, "))")?,
        _ => cg.emit_block_line(&label, &format!("const {{l}}_n: usize = {};", DEFAULT_ENTROPY)),
    }
    body(
        cg,
        &label,
        "const {l}_buf = try allocator.alloc(u8, {l}_n);
        std.crypto.random.bytes({l}_buf);",
    );
    Ok(label)
}

/// `token_bytes(nbytes=None)`
fn token_bytes(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let label = open_random_buffer(cg, args, "token_bytes")?;
    cg.emit_block_yield(&label, &label.local("buf"));
    Ok(())
}

/// `token_hex(nbytes=None)`: two lowercase hex digits per byte.
fn token_hex(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let label = open_random_buffer(cg, args, "token_hex")?;
    body(
        cg,
        &label,
        "const {l}_out = try allocator.alloc(u8, {l}_n * 2);
        const {l}_digits = \"0123456789abcdef\";
        for ({l}_buf, 0..) |{l}_b, {l}_i| {
            {l}_out[{l}_i * 2] = {l}_digits[{l}_b >> 4];
            {l}_out[{l}_i * 2 + 1] = {l}_digits[{l}_b & 0x0f];
        }",
    );
    cg.emit_block_yield(&label, &label.local("out"));
    Ok(())
}

/// `token_urlsafe(nbytes=None)`: unpadded URL-safe base64.
fn token_urlsafe(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let label = open_random_buffer(cg, args, "token_urlsafe")?;
    body(
        cg,
        &label,
        "const {l}_enc = std.base64.url_safe_no_pad.Encoder;
        const {l}_out = try allocator.alloc(u8, {l}_enc.calcSize({l}_n));",
    );
    cg.emit_block_yield(&label, &format!("{}.encode({}, {})", label.local("enc"), label.local("out"), label.local("buf")));
    Ok(())
}

/// `randbelow(n)`: uniform in `[0, n)`.
fn randbelow(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(n) = args.arg(0, "exclusive_upper_bound") else {
        cg.emit("0");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("randbelow");
    cg.emit_block_bind_wrapped(&label, "n", "@as(i64, ", n, ")")?;
    cg.emit_block_line(&label, "if ({l}_n <= 0) return error.ValueError;");
    cg.emit_block_yield(&label, &format!("std.crypto.random.intRangeLessThan(i64, 0, {})", label.local("n")));
    Ok(())
}

/// `randbits(k)`: a non-negative integer with `k` random bits.
fn randbits(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(k) = args.arg(0, "k") else {
        cg.emit("0");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("randbits");
    cg.emit_block_bind_wrapped(&label, "k", "@as(i64, ", k, ")")?;
    body(
        cg,
        &label,
        "if ({l}_k < 0 or {l}_k > 63) return error.ValueError;
        const {l}_mask = (@as(u64, 1) << @intCast({l}_k)) - 1;",
    );
    cg.emit_block_yield(
        &label,
        &format!("@as(i64, @intCast(std.crypto.random.int(u64) & {}))", label.local("mask")),
    );
    Ok(())
}

/// `choice(seq)`
fn choice(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(seq) = args.arg(0, "seq") else {
        cg.emit("null");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("choice");
    bind_sequence(cg, &label, "seq", seq)?;
    cg.emit_block_line(&label, "if ({l}_seq.len == 0) return error.IndexError;");
    cg.emit_block_yield(
        &label,
        &format!("{0}[std.crypto.random.uintLessThan(usize, {0}.len)]", label.local("seq")),
    );
    Ok(())
}

/// `compare_digest(a, b)`: equality that reads every byte regardless of where the first difference is.
fn compare_digest(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let (Some(a), Some(b)) = (args.get(0), args.get(1)) else {
        cg.emit("false");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("compare_digest");
    cg.emit_block_bind(&label, "a", a)?;
    cg.emit_block_bind(&label, "b", b)?;
    body(
        cg,
        &label,
        "if ({l}_a.len != {l}_b.len) break :{l} false;
        var {l}_acc: u8 = 0;
        for ({l}_a, {l}_b) |{l}_x, {l}_y| {l}_acc |= {l}_x ^ {l}_y;",
    );
    cg.emit_block_yield(&label, &format!("{} == 0", label.local("acc")));
    Ok(())
}
