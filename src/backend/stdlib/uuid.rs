//! `uuid`: RFC 4122 identifiers rendered as canonical 36-character strings.

use super::{body, c, f};
use crate::backend::codegen::{BlockLabel, CodegenResult, NativeCodegen};
use crate::backend::dispatch::{CallArgs, ModuleTable};
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Uuid,
    entries: &[
        ("uuid1", f(uuid1)),
        ("uuid3", f(uuid3)),
        ("uuid4", f(uuid4)),
        ("uuid5", f(uuid5)),
        ("UUID", f(parse)),
        ("NAMESPACE_DNS", c("\"6ba7b810-9dad-11d1-80b4-00c04fd430c8\"")),
        ("NAMESPACE_URL", c("\"6ba7b811-9dad-11d1-80b4-00c04fd430c8\"")),
        ("NAMESPACE_OID", c("\"6ba7b812-9dad-11d1-80b4-00c04fd430c8\"")),
        ("NAMESPACE_X500", c("\"6ba7b814-9dad-11d1-80b4-00c04fd430c8\"")),
        ("RESERVED_NCS", c("\"reserved for NCS compatibility\"")),
        ("RFC_4122", c("\"specified in RFC 4122\"")),
        ("RESERVED_MICROSOFT", c("\"reserved for Microsoft compatibility\"")),
        ("RESERVED_FUTURE", c("\"reserved for future definition\"")),
    ],
};

/// Stamp the version nibble and RFC 4122 variant bits into `{l}_bytes`, then yield the hyphenated hex form.
fn emit_format(cg: &mut NativeCodegen<'_>, label: &BlockLabel, version: u8) {
    body(
        cg,
        label,
        &format!(
            "{{l}}_bytes[6] = ({{l}}_bytes[6] & 0x0f) | 0x{version}0;
            {{l}}_bytes[8] = ({{l}}_bytes[8] & 0x3f) | 0x80;
            const {{l}}_hex = std.fmt.bytesToHex({{l}}_bytes, .lower);"
        ),
    );
    cg.emit_block_yield(label, &hyphenated(&label.local("hex")));
}

/// `8-4-4-4-12` grouping of a 32-digit hex array local.
fn hyphenated(hex: &str) -> String {
    format!(
        "try std.fmt.allocPrint(allocator, \"{{s}}-{{s}}-{{s}}-{{s}}-{{s}}\", .{{ {0}[0..8], {0}[8..12], {0}[12..16], {0}[16..20], {0}[20..32] }})",
        hex
    )
}

/// `uuid4()`: 122 random bits.
fn uuid4(cg: &mut NativeCodegen<'_>, _args: &CallArgs<'_>) -> CodegenResult<()> {
    let label = cg.emit_unique_block_start("uuid4");
    body(
        cg,
        &label,
        "var {l}_bytes: [16]u8 = undefined;
        std.crypto.random.bytes(&{l}_bytes);",
    );
    emit_format(cg, &label, 4);
    Ok(())
}

/// `uuid1()`: the timestamp fields come from the wall clock, node and clock sequence are random.
fn uuid1(cg: &mut NativeCodegen<'_>, _args: &CallArgs<'_>) -> CodegenResult<()> {
    let label = cg.emit_unique_block_start("uuid1");
    body(
        cg,
        &label,
        "var {l}_bytes: [16]u8 = undefined;
        std.crypto.random.bytes(&{l}_bytes);
        const {l}_ticks: u64 = @intCast(@divFloor(std.time.nanoTimestamp(), 100) + 0x01b21dd213814000);
        std.mem.writeInt(u32, {l}_bytes[0..4], @truncate({l}_ticks), .big);
        std.mem.writeInt(u16, {l}_bytes[4..6], @truncate({l}_ticks >> 32), .big);
        std.mem.writeInt(u16, {l}_bytes[6..8], @truncate({l}_ticks >> 48), .big);",
    );
    emit_format(cg, &label, 1);
    Ok(())
}

/// Name-based identifiers: hash `namespace ++ name` and keep the first 16 bytes.
fn name_based(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>, base: &str, hasher: &str, version: u8) -> CodegenResult<()> {
    let (Some(namespace), Some(name)) = (args.arg(0, "namespace"), args.arg(1, "name")) else {
        cg.emit("\"\"");
        return Ok(());
    };
    let label = cg.emit_unique_block_start(base);
    cg.emit_block_bind(&label, "ns", namespace)?;
    cg.emit_block_bind(&label, "name", name)?;
    body(
        cg,
        &label,
        &format!(
            "var {{l}}_ns_bytes: [16]u8 = undefined;
            _ = try std.fmt.hexToBytes(&{{l}}_ns_bytes, &runtime.uuid.compact({{l}}_ns));
            var {{l}}_hasher = {hasher}.init(.{{}});
            {{l}}_hasher.update(&{{l}}_ns_bytes);
            {{l}}_hasher.update({{l}}_name);
            var {{l}}_digest: [{hasher}.digest_length]u8 = undefined;
            {{l}}_hasher.final(&{{l}}_digest);
            var {{l}}_bytes: [16]u8 = {{l}}_digest[0..16].*;"
        ),
    );
    emit_format(cg, &label, version);
    Ok(())
}

/// `uuid3(namespace, name)`
fn uuid3(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    name_based(cg, args, "uuid3", "std.crypto.hash.Md5", 3)
}

/// `uuid5(namespace, name)`
fn uuid5(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    name_based(cg, args, "uuid5", "std.crypto.hash.Sha1", 5)
}

/// `UUID(hex)`: accepts 32 hex digits with optional hyphens and braces, returns the canonical lowercase form.
fn parse(cg: &mut NativeCodegen<'_>, args: &CallArgs<'_>) -> CodegenResult<()> {
    let Some(hex) = args.arg(0, "hex") else {
        cg.emit("\"\"");
        return Ok(());
    };
    let label = cg.emit_unique_block_start("uuid");
    cg.emit_block_bind(&label, "src", hex)?;
    body(
        cg,
        &label,
        "var {l}_bytes: [16]u8 = undefined;
        var {l}_digits: [32]u8 = undefined;
        var {l}_n: usize = 0;
        for ({l}_src) |{l}_c| {
            if ({l}_c == '-' or {l}_c == '{' or {l}_c == '}') continue;
            if ({l}_n == 32 or !std.ascii.isHex({l}_c)) return error.ValueError;
            {l}_digits[{l}_n] = std.ascii.toLower({l}_c);
            {l}_n += 1;
        }
        if ({l}_n != 32) return error.ValueError;
        _ = try std.fmt.hexToBytes(&{l}_bytes, &{l}_digits);
        const {l}_hex = std.fmt.bytesToHex({l}_bytes, .lower);",
    );
    cg.emit_block_yield(&label, &hyphenated(&label.local("hex")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyshim_syntax::ast::build::*;

    #[test]
    fn test_uuid4_sets_version_and_variant() {
        let mut cg = NativeCodegen::without_inference();
        uuid4(&mut cg, &CallArgs::from_slice(&[])).unwrap();
        let out = cg.finish();
        assert!(out.contains("uuid4_0_bytes[6] = (uuid4_0_bytes[6] & 0x0f) | 0x40;"));
        assert!(out.contains("uuid4_0_bytes[8] = (uuid4_0_bytes[8] & 0x3f) | 0x80;"));
        assert!(out.contains("uuid4_0_hex[0..8], uuid4_0_hex[8..12]"));
        assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    #[test]
    fn test_uuid5_hashes_with_sha1() {
        let mut cg = NativeCodegen::without_inference();
        let args = [name("ns"), str("example.org")];
        uuid5(&mut cg, &CallArgs::from_slice(&args)).unwrap();
        let out = cg.finish();
        assert!(out.contains("const uuid5_0_name = \"example.org\";"));
        assert!(out.contains("var uuid5_0_hasher = std.crypto.hash.Sha1.init(.{});"));
        assert!(out.contains("| 0x50;"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let mut cg = NativeCodegen::without_inference();
        parse(&mut cg, &CallArgs::from_slice(&[name("s")])).unwrap();
        let out = cg.finish();
        assert!(out.contains("if (uuid_0_n != 32) return error.ValueError;"));
        assert!(out.contains("if (uuid_0_c == '-' or uuid_0_c == '{' or uuid_0_c == '}') continue;"));
    }

    #[test]
    fn test_name_based_default() {
        let mut cg = NativeCodegen::without_inference();
        uuid3(&mut cg, &CallArgs::from_slice(&[name("ns")])).unwrap();
        assert_eq!(cg.labels_allocated(), 0);
        assert_eq!(cg.finish(), "\"\"");
    }
}
