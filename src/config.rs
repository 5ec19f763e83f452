pub const DEFAULT_USER_AGENT: &str = concat!("fetch-bridge/", env!("CARGO_PKG_VERSION"));

/// Browsers stop following after 20 redirects, so the native host does too.
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// Configuration for the native host. The web host has none: the browser owns these settings.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// User agent string sent with every request
    pub user_agent: String,
    /// Maximum number of redirects followed when the redirect mode is `follow`
    pub max_redirects: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}
