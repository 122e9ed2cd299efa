//! `codecs`: text encodings. Zig strings are UTF-8 bytes, so UTF-8 round trips are the identity.

use super::{c, t};
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Codecs,
    entries: &[
        ("encode", t(1, "$0", "\"\"")),
        ("decode", t(1, "$0", "\"\"")),
        ("lookup", t(1, "runtime.codecs.lookup($0)", "runtime.codecs.utf_8")),
        ("register", c("{}")),
        ("open", t(1, "try runtime.codecs.open(allocator, $0)", "null")),
        ("getencoder", t(1, "runtime.codecs.lookup($0).encode", "null")),
        ("getdecoder", t(1, "runtime.codecs.lookup($0).decode", "null")),
        ("BOM", c("\"\\xff\\xfe\"")),
        ("BOM_UTF8", c("\"\\xef\\xbb\\xbf\"")),
        ("BOM_LE", c("\"\\xff\\xfe\"")),
        ("BOM_BE", c("\"\\xfe\\xff\"")),
        ("BOM_UTF16_LE", c("\"\\xff\\xfe\"")),
        ("BOM_UTF16_BE", c("\"\\xfe\\xff\"")),
        ("BOM_UTF32_LE", c("\"\\xff\\xfe\\x00\\x00\"")),
        ("BOM_UTF32_BE", c("\"\\x00\\x00\\xfe\\xff\"")),
    ],
};
