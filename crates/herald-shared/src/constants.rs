/// Length of generated message ids
pub const MESSAGE_ID_LENGTH: usize = 12;

/// Priority assumed when the publisher does not set one
pub const DEFAULT_PRIORITY: u8 = 3;

/// Default cache file name, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "herald-cache.db";
