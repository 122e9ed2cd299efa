//! `ssl`: TLS is not emulated. Contexts are inert values and wrapping a socket fails with `error.SSLError`.

use super::c;
use crate::backend::dispatch::ModuleTable;
use pyshim_core::lang::stdlib::StdModuleId;

pub static TABLE: ModuleTable = ModuleTable {
    module: StdModuleId::Ssl,
    entries: &[
        ("create_default_context", c("runtime.ssl.Context{}")),
        ("SSLContext", c("runtime.ssl.Context{}")),
        ("wrap_socket", c("error.SSLError")),
        ("get_default_verify_paths", c("runtime.ssl.DefaultVerifyPaths{}")),
        ("PROTOCOL_TLS", c("2")),
        ("PROTOCOL_TLS_CLIENT", c("16")),
        ("PROTOCOL_TLS_SERVER", c("17")),
        ("CERT_NONE", c("0")),
        ("CERT_OPTIONAL", c("1")),
        ("CERT_REQUIRED", c("2")),
        ("OP_NO_SSLv2", c("0")),
        ("OP_NO_SSLv3", c("0x02000000")),
        ("OP_NO_COMPRESSION", c("0x00020000")),
        ("HAS_SNI", c("true")),
        ("OPENSSL_VERSION", c("\"none\"")),
        ("SSLError", c("error.SSLError")),
        ("SSLZeroReturnError", c("error.SSLError")),
        ("SSLWantReadError", c("error.SSLError")),
        ("SSLWantWriteError", c("error.SSLError")),
        ("CertificateError", c("error.SSLError")),
    ],
};
