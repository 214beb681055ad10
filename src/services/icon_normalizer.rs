//! Icon Normalizer.
//!
//! Browser exports still carry favicon URLs from the retired Clearbit logo
//! service. Those are rewritten to the logo.dev image endpoint before the
//! bookmark is stored; every other URL passes through untouched.

use url::Url;

/// Host of the retired favicon service.
pub const DEPRECATED_ICON_HOST: &str = "logo.clearbit.com";
/// Base of the replacement endpoint; the domain is appended as the path.
pub const REPLACEMENT_ICON_BASE: &str = "https://img.logo.dev/";

#[derive(Debug, Clone, Default)]
pub struct IconNormalizer {
    token: Option<String>,
}

impl IconNormalizer {
    /// `token` is embedded as the `token` query parameter of rewritten URLs.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Rewrites `icon` if it points at the retired host.
    ///
    /// Unparseable URLs are returned unchanged.
    pub fn normalize(&self, icon: &str) -> String {
        let parsed = match Url::parse(icon) {
            Ok(u) => u,
            Err(_) => return icon.to_string(),
        };
        if parsed.host_str() != Some(DEPRECATED_ICON_HOST) {
            return icon.to_string();
        }

        let domain = parsed.path().trim_start_matches('/');
        if domain.is_empty() {
            return icon.to_string();
        }

        match &self.token {
            Some(token) => format!("{}{}?token={}", REPLACEMENT_ICON_BASE, domain, token),
            None => format!("{}{}", REPLACEMENT_ICON_BASE, domain),
        }
    }

    pub fn normalize_opt(&self, icon: Option<&str>) -> Option<String> {
        icon.map(|i| self.normalize(i))
    }
}
