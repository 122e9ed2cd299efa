//! Shareable metadata for `pyshim_core::lang` registries.
//!
//! These types are `Copy` so registries can live in `const` tables.

/// Describe how faithfully a vocabulary item is reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emulation {
    /// Handlers compute real results (algorithms inlined into the generated code).
    Computed,
    /// Some symbols compute, the rest are placeholders.
    Mixed,
    /// Handlers emit constants, no-ops or runtime stubs only.
    Placeholder,
}

impl Emulation {
    pub fn as_str(self) -> &'static str {
        match self {
            Emulation::Computed => "computed",
            Emulation::Mixed => "mixed",
            Emulation::Placeholder => "placeholder",
        }
    }
}

/// Shared metadata shape for registry items.
///
/// ## Notes
/// - `description` is mandatory to keep CLI listings and docs consistent.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub emulation: Emulation,
}
