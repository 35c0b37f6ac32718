use serde::Deserialize;

const DEFAULT_WRITE_BUFFER_SIZE: usize = 1000;

/// Engine tunables. Deserialized from the embedding layer's configuration
/// file; every field has a default so a bare `Options::default()` engine is
/// usable in tests and tools.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Number of points a `BufferedPointsWriter` accumulates before it
    /// flushes to the engine.
    pub write_buffer_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
        }
    }
}
