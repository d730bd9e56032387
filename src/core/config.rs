use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::models::{SortKey, SortOrder, SortSpec};

pub const DEFAULT_PORT: u16 = 5000;

/// Settings the server is constructed with. Built by the binary from CLI flags
/// and environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Directory listed when a request carries no `path`.
    pub default_path: PathBuf,
    pub default_sort: SortKey,
    pub default_order: SortOrder,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr, default_path: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            default_path: default_path.into(),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.default_sort = key;
        self.default_order = order;
        self
    }

    /// Combines per-request overrides with the configured defaults.
    pub fn sort_spec(&self, key: Option<SortKey>, order: Option<SortOrder>) -> SortSpec {
        SortSpec::new(
            key.unwrap_or(self.default_sort),
            order.unwrap_or(self.default_order),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            default_path: PathBuf::from("."),
            default_sort: SortKey::Name,
            default_order: SortOrder::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_overrides_win_over_defaults() {
        let config = ServerConfig::default().with_sort(SortKey::Size, SortOrder::Desc);

        assert_eq!(
            config.sort_spec(None, None),
            SortSpec::new(SortKey::Size, SortOrder::Desc)
        );
        assert_eq!(
            config.sort_spec(Some(SortKey::Name), None),
            SortSpec::new(SortKey::Name, SortOrder::Desc)
        );
    }

    #[test]
    fn defaults_listen_on_localhost() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.default_path, PathBuf::from("."));
    }
}
