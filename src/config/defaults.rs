//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Client identifier sent to the fallback geocoder (required by its usage policy)
pub const DEFAULT_USER_AGENT: &str = "route-planner/0.1.0 (contact: you@example.com)";

/// Per-call timeout for outbound provider requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Most queries handed to the fallback geocoder in one request
pub const DEFAULT_MAX_FALLBACK: usize = 8;

/// Pause between consecutive fallback geocoder calls
pub const DEFAULT_FALLBACK_DELAY_MS: u64 = 1100;

/// Language for fallback labels and the unresolved-query message
pub const DEFAULT_LANGUAGE: &str = "he";

/// OSRM routing profile
pub const DEFAULT_PROFILE: &str = "driving";

/// Environment variable overriding the fallback geocoder's client identifier
pub const USER_AGENT_ENV: &str = "APP_USER_AGENT";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "route-planner";
