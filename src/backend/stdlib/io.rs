//! `io`: in-memory streams backed by runtime buffers.

use super::{c, t};
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Io,
    entries: &[
        ("StringIO", t(1, "try runtime.io.StringIO.initWith(allocator, $0)", "try runtime.io.StringIO.init(allocator)")),
        ("BytesIO", t(1, "try runtime.io.BytesIO.initWith(allocator, $0)", "try runtime.io.BytesIO.init(allocator)")),
        ("open", t(1, "try runtime.io.open(allocator, $0)", "null")),
        ("TextIOWrapper", t(1, "$0", "null")),
        ("BufferedReader", t(1, "$0", "null")),
        ("BufferedWriter", t(1, "$0", "null")),
        ("SEEK_SET", c("0")),
        ("SEEK_CUR", c("1")),
        ("SEEK_END", c("2")),
        ("DEFAULT_BUFFER_SIZE", c("8192")),
        ("UnsupportedOperation", c("error.UnsupportedOperation")),
    ],
};
