// Default execution limits for the script interpreter

/// Statements, loop iterations and calls a single run may perform
pub const DEFAULT_MAX_STEPS: u64 = 5_000_000;

/// Wall-clock budget for a single run, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

/// Nested user function calls before `RangeError: Maximum call stack size exceeded`
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Print-style calls a single run may make
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 1_000;

/// Largest array length or string length (in chars) a script may build
pub const DEFAULT_MAX_COLLECTION_LEN: usize = 1_000_000;

/// The deadline and cancel flag are polled once every this many steps
pub const CLOCK_CHECK_INTERVAL: u64 = 256;

/// Stack size of the thread a run executes on
pub const RUNNER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Nested expressions and statements the parser accepts before giving up
/// with `SyntaxError: Maximum nesting depth exceeded`
pub const MAX_PARSE_DEPTH: usize = 256;

/// Nested arrays and objects `JSON.stringify` walks before throwing
/// `RangeError: Maximum call stack size exceeded`
pub const MAX_VALUE_DEPTH: usize = 1_000;
