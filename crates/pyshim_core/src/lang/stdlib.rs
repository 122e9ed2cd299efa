//! Emulated standard-library module vocabulary.
//!
//! This module defines the canonical set of CPython standard-library modules the compiler reproduces. Every entry
//! has a dispatch table in the compiler backend; a module missing from this registry is reported as unsupported.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and spelling-exact.
//! - Aliases are the C accelerator modules (`_heapq`, `_csv`, ...) that expose the same functions.
//!
//! ## Examples
//! ```rust
//! use pyshim_core::lang::registry::Emulation;
//! use pyshim_core::lang::stdlib::{self, StdModuleId};
//!
//! assert_eq!(stdlib::from_str("heapq"), Some(StdModuleId::Heapq));
//! assert_eq!(stdlib::info_for(StdModuleId::Socket).emulation, Emulation::Placeholder);
//! assert_eq!(stdlib::from_str("numpy"), None);
//! ```

use super::registry::{Emulation, LangItemInfo};

/// Stable identifier for an emulated stdlib module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StdModuleId {
    Bisect,
    Calendar,
    Codecs,
    Csv,
    Errno,
    Fnmatch,
    Functools,
    Glob,
    Heapq,
    Io,
    Json,
    Mmap,
    Secrets,
    Select,
    Socket,
    Ssl,
    Statistics,
    Uuid,
}

/// Metadata for an emulated stdlib module.
pub type StdModuleInfo = LangItemInfo<StdModuleId>;

/// Registry of all emulated stdlib modules.
pub const STDLIB_MODULES: &[StdModuleInfo] = &[
    info(
        StdModuleId::Bisect,
        "bisect",
        &["_bisect"],
        "Binary search over sorted sequences; searches and insertions are inlined.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Calendar,
        "calendar",
        &[],
        "Leap-year and weekday arithmetic inlined; name tables as constants.",
        Emulation::Mixed,
    ),
    info(
        StdModuleId::Codecs,
        "codecs",
        &["_codecs"],
        "Encoding lookups map to runtime helpers; registry functions are no-ops.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Csv,
        "csv",
        &["_csv"],
        "Reader and writer construction with delimiter handling; dialect registry is a no-op.",
        Emulation::Mixed,
    ),
    info(
        StdModuleId::Errno,
        "errno",
        &[],
        "POSIX error numbers as integer constants.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Fnmatch,
        "fnmatch",
        &[],
        "Shell-style wildcard matching through the runtime glob matcher.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Functools,
        "functools",
        &["_functools"],
        "`reduce` is inlined (type-directed); decorators pass their argument through.",
        Emulation::Mixed,
    ),
    info(
        StdModuleId::Glob,
        "glob",
        &[],
        "Pathname pattern expansion; magic detection and escaping are inlined.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Heapq,
        "heapq",
        &["_heapq"],
        "Binary min-heap operations inlined over runtime lists.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Io,
        "io",
        &["_io"],
        "In-memory streams map to runtime buffers; file objects are placeholders.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Json,
        "json",
        &[],
        "`dumps` chooses a scalar or collection encoder from the inferred type.",
        Emulation::Mixed,
    ),
    info(
        StdModuleId::Mmap,
        "mmap",
        &[],
        "Memory maps are empty placeholder structs.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Secrets,
        "secrets",
        &[],
        "Token generation from the OS CSPRNG and constant-time comparison.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Select,
        "select",
        &[],
        "Readiness polling returns empty sets.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Socket,
        "socket",
        &["_socket"],
        "Socket constants and failing I/O stubs (`error.SocketError`).",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Ssl,
        "ssl",
        &["_ssl"],
        "TLS contexts are placeholders; handshakes fail with `error.SSLError`.",
        Emulation::Placeholder,
    ),
    info(
        StdModuleId::Statistics,
        "statistics",
        &[],
        "Averages, medians, modes and (population) variance inlined.",
        Emulation::Computed,
    ),
    info(
        StdModuleId::Uuid,
        "uuid",
        &[],
        "Random UUID generation and formatting inlined; namespaces as constants.",
        Emulation::Computed,
    ),
];

/// Return the canonical spelling for a module.
pub fn as_str(id: StdModuleId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a module.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: StdModuleId) -> &'static StdModuleInfo {
    STDLIB_MODULES
        .iter()
        .find(|m| m.id == id)
        .expect("stdlib module info missing")
}

/// Resolve a module spelling to its identifier.
///
/// ## Returns
/// - `Some(StdModuleId)` if `name` matches a canonical spelling or alias, `None` otherwise.
pub fn from_str(name: &str) -> Option<StdModuleId> {
    if let Some(m) = STDLIB_MODULES.iter().find(|m| m.canonical == name) {
        return Some(m.id);
    }
    STDLIB_MODULES
        .iter()
        .find(|m| {
            let aliases: &[&str] = m.aliases;
            aliases.contains(&name)
        })
        .map(|m| m.id)
}

const fn info(
    id: StdModuleId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    emulation: Emulation,
) -> StdModuleInfo {
    LangItemInfo {
        id,
        canonical,
        aliases,
        description,
        emulation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("json"), Some(StdModuleId::Json));
        assert_eq!(from_str("JSON"), None);
        assert_eq!(from_str("json "), None);
    }

    #[test]
    fn test_accelerator_aliases_resolve() {
        assert_eq!(from_str("_heapq"), Some(StdModuleId::Heapq));
        assert_eq!(from_str("_bisect"), Some(StdModuleId::Bisect));
        assert_eq!(from_str("_calendar"), None);
        for m in STDLIB_MODULES {
            for alias in m.aliases {
                assert_eq!(from_str(alias), Some(m.id));
                assert!(STDLIB_MODULES.iter().all(|other| other.canonical != *alias));
            }
        }
    }

    #[test]
    fn test_every_id_has_info() {
        for m in STDLIB_MODULES {
            assert_eq!(info_for(m.id).canonical, m.canonical);
            assert_eq!(from_str(m.canonical), Some(m.id));
        }
    }
}
