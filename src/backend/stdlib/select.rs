//! `select`: readiness polling. Nothing is ever ready.

use super::c;
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Select,
    entries: &[
        ("select", c(".{ &.{}, &.{}, &.{} }")),
        ("poll", c("runtime.select.Poll.init()")),
        ("epoll", c("runtime.select.Poll.init()")),
        ("POLLIN", c("0x001")),
        ("POLLPRI", c("0x002")),
        ("POLLOUT", c("0x004")),
        ("POLLERR", c("0x008")),
        ("POLLHUP", c("0x010")),
        ("POLLNVAL", c("0x020")),
        ("EPOLLIN", c("0x001")),
        ("EPOLLOUT", c("0x004")),
        ("EPOLLERR", c("0x008")),
        ("EPOLLHUP", c("0x010")),
        ("EPOLLET", c("0x80000000")),
        ("error", c("error.SelectError")),
    ],
};
