//! `errno`: Linux error numbers.

use super::c;
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Errno,
    entries: &[
        ("EPERM", c("1")),
        ("ENOENT", c("2")),
        ("ESRCH", c("3")),
        ("EINTR", c("4")),
        ("EIO", c("5")),
        ("ENXIO", c("6")),
        ("E2BIG", c("7")),
        ("ENOEXEC", c("8")),
        ("EBADF", c("9")),
        ("ECHILD", c("10")),
        ("EAGAIN", c("11")),
        ("EWOULDBLOCK", c("11")),
        ("ENOMEM", c("12")),
        ("EACCES", c("13")),
        ("EFAULT", c("14")),
        ("EBUSY", c("16")),
        ("EEXIST", c("17")),
        ("EXDEV", c("18")),
        ("ENODEV", c("19")),
        ("ENOTDIR", c("20")),
        ("EISDIR", c("21")),
        ("EINVAL", c("22")),
        ("ENFILE", c("23")),
        ("EMFILE", c("24")),
        ("ENOTTY", c("25")),
        ("EFBIG", c("27")),
        ("ENOSPC", c("28")),
        ("ESPIPE", c("29")),
        ("EROFS", c("30")),
        ("EMLINK", c("31")),
        ("EPIPE", c("32")),
        ("EDOM", c("33")),
        ("ERANGE", c("34")),
        ("EDEADLK", c("35")),
        ("ENAMETOOLONG", c("36")),
        ("ENOSYS", c("38")),
        ("ENOTEMPTY", c("39")),
        ("ELOOP", c("40")),
        ("ENOTSOCK", c("88")),
        ("EADDRINUSE", c("98")),
        ("EADDRNOTAVAIL", c("99")),
        ("ENETDOWN", c("100")),
        ("ENETUNREACH", c("101")),
        ("ECONNABORTED", c("103")),
        ("ECONNRESET", c("104")),
        ("ENOBUFS", c("105")),
        ("EISCONN", c("106")),
        ("ENOTCONN", c("107")),
        ("ETIMEDOUT", c("110")),
        ("ECONNREFUSED", c("111")),
        ("EHOSTUNREACH", c("113")),
        ("EALREADY", c("114")),
        ("EINPROGRESS", c("115")),
        ("errorcode", c("runtime.errno.errorcode")),
    ],
};
