//! Network identity stamped on every core response.

use std::fmt;

const UNKNOWN_HOST: &str = "unknown host name";
const UNKNOWN_IP: &str = "unknown IP address";

/// `host/ip:port` of the running instance, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress(String);

impl ServiceAddress {
    /// Resolves the local host name and the IP of the default-route
    /// interface for `port`.
    ///
    /// An explicit `advertised` address wins over resolution. Lookup failures
    /// fall back to placeholder host and IP names rather than failing startup.
    pub fn resolve(port: u16, advertised: Option<&str>) -> Self {
        if let Some(address) = advertised {
            return Self(address.to_string());
        }

        let host = local_host_name();
        let ip = local_ip();
        Self::from_parts(host.as_deref(), ip.as_deref(), port)
    }

    pub fn from_parts(host: Option<&str>, ip: Option<&str>, port: u16) -> Self {
        Self(format!(
            "{}/{}:{}",
            host.unwrap_or(UNKNOWN_HOST),
            ip.unwrap_or(UNKNOWN_IP),
            port
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn local_host_name() -> Option<String> {
    match hostname::get() {
        Ok(name) => Some(name.to_string_lossy().trim().to_string()).filter(|n| !n.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read host name");
            None
        }
    }
}

fn local_ip() -> Option<String> {
    match local_ip_address::local_ip() {
        Ok(ip) => Some(ip.to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve local IP address");
            None
        }
    }
}
