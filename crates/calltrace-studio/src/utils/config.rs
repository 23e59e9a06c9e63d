//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default number of hot paths kept in a report
pub const DEFAULT_TOP_PATHS: usize = 20;

/// Upper bound accepted for `--top-paths`
pub const MAX_TOP_PATHS: usize = 1000;

/// Default flamegraph width in pixels
pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;

/// Narrowest flamegraph we agree to draw
pub const MIN_FLAMEGRAPH_WIDTH: usize = 100;

/// Default flamegraph title
pub const DEFAULT_FLAMEGRAPH_TITLE: &str = "Call Profile";

/// Frames narrower than this many pixels are not drawn
pub const DEFAULT_MIN_FRAME_WIDTH: f64 = 0.5;

/// Separator between frames in a collapsed stack
pub const STACK_SEPARATOR: char = ';';
