//! Code generation configuration

/// Code generation configuration
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Wrap the emitted statements in a `pub fn main() !void` with the std/runtime imports
    pub wrap_main: bool,
    /// Keep emitting after a failed statement and report every failure at the end
    pub keep_going: bool,
    /// Expression bound to `allocator` at container level of the emitted unit
    pub allocator_init: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            wrap_main: true,
            keep_going: false,
            allocator_init: "std.heap.page_allocator".to_string(),
        }
    }
}

impl CodegenConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Emit bare statements without the `main` wrapper
    pub fn fragment(mut self) -> Self {
        self.wrap_main = false;
        self
    }

    /// Collect every statement failure instead of stopping at the first
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn with_allocator_init(mut self, init: impl Into<String>) -> Self {
        self.allocator_init = init.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.indent_width, 4);
        assert!(config.wrap_main);
        assert!(!config.keep_going);
        assert_eq!(config.allocator_init, "std.heap.page_allocator");
    }

    #[test]
    fn test_builder_chain() {
        let config = CodegenConfig::new()
            .with_indent_width(2)
            .fragment()
            .with_keep_going(true)
            .with_allocator_init("gpa.allocator()");
        assert_eq!(config.indent_width, 2);
        assert!(!config.wrap_main);
        assert!(config.keep_going);
        assert_eq!(config.allocator_init, "gpa.allocator()");
    }

    #[test]
    fn test_builder_override() {
        let config = CodegenConfig::new().with_indent_width(2).with_indent_width(8);
        assert_eq!(config.indent_width, 8); // Last value wins
    }
}
