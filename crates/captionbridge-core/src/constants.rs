//! Application-wide constants.

/// Default base URL of the video-hosting API.
pub const DEFAULT_API_URL: &str = "https://api.v4.wecandeo.com";

/// Default base URL of the conversion service.
pub const DEFAULT_CONVERSION_API_URL: &str = "https://api2.transloadit.com";

/// Canonical host every conversion status URL is rewritten to.
pub const CONVERSION_CANONICAL_HOST: &str = "api2.transloadit.com";

/// Domain whose subdomains are rewritten to [`CONVERSION_CANONICAL_HOST`].
pub const CONVERSION_SERVICE_DOMAIN: &str = "transloadit.com";

/// Subtitle extensions accepted at acquisition time (lower case, no dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["srt", "vtt", "ass", "ssa", "txt"];

/// Extensions the caption endpoint does not accept directly.
pub const CONVERSION_EXTENSIONS: &[&str] = &["ass", "ssa"];

/// Extension produced by the conversion service.
pub const CONVERSION_TARGET_EXTENSION: &str = "srt";

/// Storage key of the cached language catalog payload.
pub const LANGUAGE_CACHE_KEY: &str = "wecandeo_languages";

/// Storage key of the language catalog fetch timestamp.
pub const LANGUAGE_CACHE_TIMESTAMP_KEY: &str = "wecandeo_languages_timestamp";

/// Freshness window of the cached language catalog.
pub const LANGUAGE_CACHE_TTL_HOURS: i64 = 24;

pub const CONVERSION_POLL_INTERVAL_MS: u64 = 1000;
pub const CONVERSION_MAX_POLLS: u32 = 60;
pub const HTTP_TIMEOUT_SECS: u64 = 60;
