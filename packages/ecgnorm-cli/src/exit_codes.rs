/// Every file converted
pub const SUCCESS: i32 = 0;

/// A conversion failed
pub const EXECUTION_ERROR: i32 = 1;

/// Bad arguments or an unsupported input format
pub const INPUT_ERROR: i32 = 2;

/// Batch finished with some files converted and some failed
pub const PARTIAL_FAILURE: i32 = 3;
