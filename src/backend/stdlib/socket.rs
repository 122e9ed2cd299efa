//! `socket`: networking is not emulated.
//!
//! Creating a socket fails with `error.SocketError`. Address-family and socket-type constants carry their Linux
//! values, and byte-order helpers map onto `std.mem`.

use super::{c, t};
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Socket,
    entries: &[
        ("socket", c("error.SocketError")),
        ("create_connection", c("error.SocketError")),
        ("create_server", c("error.SocketError")),
        ("socketpair", c("error.SocketError")),
        ("gethostname", c("try runtime.socket.gethostname(allocator)")),
        ("gethostbyname", t(1, "$0", "\"\"")),
        ("getfqdn", c("try runtime.socket.gethostname(allocator)")),
        ("htons", t(1, "std.mem.nativeToBig(u16, @intCast($0))", "0")),
        ("ntohs", t(1, "std.mem.bigToNative(u16, @intCast($0))", "0")),
        ("htonl", t(1, "std.mem.nativeToBig(u32, @intCast($0))", "0")),
        ("ntohl", t(1, "std.mem.bigToNative(u32, @intCast($0))", "0")),
        ("setdefaulttimeout", c("{}")),
        ("getdefaulttimeout", c("null")),
        ("AF_UNIX", c("1")),
        ("AF_INET", c("2")),
        ("AF_INET6", c("10")),
        ("AF_UNSPEC", c("0")),
        ("SOCK_STREAM", c("1")),
        ("SOCK_DGRAM", c("2")),
        ("SOCK_RAW", c("3")),
        ("SOL_SOCKET", c("1")),
        ("SO_REUSEADDR", c("2")),
        ("SO_KEEPALIVE", c("9")),
        ("IPPROTO_TCP", c("6")),
        ("IPPROTO_UDP", c("17")),
        ("TCP_NODELAY", c("1")),
        ("SHUT_RD", c("0")),
        ("SHUT_WR", c("1")),
        ("SHUT_RDWR", c("2")),
        ("error", c("error.SocketError")),
        ("timeout", c("error.SocketTimeout")),
        ("gaierror", c("error.SocketError")),
        ("herror", c("error.SocketError")),
    ],
};
