//! `mmap`: memory maps are modelled as an owned heap buffer.
//!
//! `mmap(fileno, length)` evaluates to an anonymous struct value exposing the subset of the Python object the
//! emitted programs use. It is a single constant spanning several lines; it is written through the emitter's text
//! block path so every line after the first picks up the current indentation.

use super::{c, t};
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub(crate) const MMAP_STRUCT: &str = "struct {
    data: []u8 = &.{},
    pos: usize = 0,

    pub fn size(self: *const @This()) usize {
        return self.data.len;
    }

    pub fn read(self: *@This(), n: usize) []const u8 {
        const end = @min(self.pos + n, self.data.len);
        defer self.pos = end;
        return self.data[self.pos..end];
    }

    pub fn seek(self: *@This(), pos: usize) void {
        self.pos = @min(pos, self.data.len);
    }

    pub fn close(self: *@This()) void {
        self.data = &.{};
    }
}{}";

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Mmap,
    entries: &[
        ("mmap", c(MMAP_STRUCT)),
        ("PAGESIZE", c("4096")),
        ("ALLOCATIONGRANULARITY", c("4096")),
        ("ACCESS_DEFAULT", c("0")),
        ("ACCESS_READ", c("1")),
        ("ACCESS_WRITE", c("2")),
        ("ACCESS_COPY", c("3")),
        ("PROT_READ", c("1")),
        ("PROT_WRITE", c("2")),
        ("PROT_EXEC", c("4")),
        ("MAP_SHARED", c("1")),
        ("MAP_PRIVATE", c("2")),
        ("MAP_ANONYMOUS", c("0x20")),
        ("madvise", t(1, "{}", "{}")),
        ("MADV_NORMAL", c("0")),
        ("MADV_RANDOM", c("1")),
        ("MADV_SEQUENTIAL", c("2")),
        ("MADV_WILLNEED", c("3")),
        ("MADV_DONTNEED", c("4")),
        ("error", c("error.MmapError")),
    ],
};
