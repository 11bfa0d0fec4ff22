//! Options controlling how raster files are located and read.

/// Default capacity of the buffered readers used for both files.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// How the header path is derived from the grid path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderPathRule {
    /// Replace every occurrence of `.flt` in the path with `.hdr`.
    #[default]
    LiteralReplace,
    /// Replace only a trailing `.flt` extension with `.hdr`.
    ReplaceExtension,
}

/// Options for loading a raster.
///
/// # Example
///
/// ```
/// use flt_raster::{HeaderPathRule, LoadOptions};
///
/// let options = LoadOptions::default()
///     .with_header_path(HeaderPathRule::ReplaceExtension)
///     .with_buffer_capacity(1 << 20);
/// assert_eq!(options.buffer_capacity, 1 << 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadOptions {
    /// Rule for finding the `.hdr` file next to a `.flt` file.
    pub header_path: HeaderPathRule,
    /// Capacity of the buffered readers, in bytes.
    pub buffer_capacity: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header_path: HeaderPathRule::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl LoadOptions {
    /// Use `rule` to derive header paths.
    pub fn with_header_path(self, rule: HeaderPathRule) -> Self {
        Self {
            header_path: rule,
            ..self
        }
    }

    /// Use buffered readers of `capacity` bytes.
    pub fn with_buffer_capacity(self, capacity: usize) -> Self {
        Self {
            buffer_capacity: capacity,
            ..self
        }
    }
}
