use std::str::FromStr;
use std::time::Duration;

/// Time to live for every cache entry written on a read miss.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// How the services react when the cache itself fails on the read path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheErrorPolicy {
    /// Surface the failure as a retrieval failure.
    #[default]
    Propagate,
    /// Log it and serve from the store as if the key were missing.
    Bypass,
}

impl FromStr for CacheErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(CacheErrorPolicy::Propagate),
            "bypass" => Ok(CacheErrorPolicy::Bypass),
            other => Err(format!("unknown cache error policy: {other}")),
        }
    }
}
