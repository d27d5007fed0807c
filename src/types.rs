//! Type-safe platform classification.
//!
//! This module replaces stringly-typed platform checks with a proper Rust enum
//! that provides exhaustive matching. Parsing is exact and case-sensitive on
//! purpose: node attribute snapshots carry `platform_family` values in a fixed
//! lowercase vocabulary, and anything else (including `"Windows"`) must be
//! treated as a foreign platform rather than silently normalized.

use strum::{Display, EnumIter, EnumString};

/// Platform family of a node, as reported in its attribute snapshot.
///
/// Unknown values are captured in [`PlatformFamily::Other`] instead of being
/// rejected, so gating on an unrecognized platform degrades to "does not
/// apply" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PlatformFamily {
    #[strum(serialize = "windows")]
    Windows,
    #[strum(serialize = "debian")]
    Debian,
    #[strum(serialize = "rhel")]
    Rhel,
    #[strum(serialize = "fedora")]
    Fedora,
    #[strum(serialize = "suse")]
    Suse,
    #[strum(serialize = "amazon")]
    Amazon,
    #[strum(serialize = "alpine")]
    Alpine,
    #[strum(serialize = "arch")]
    Arch,
    #[strum(serialize = "gentoo")]
    Gentoo,
    #[strum(serialize = "freebsd")]
    Freebsd,
    #[strum(serialize = "solaris2")]
    Solaris2,
    #[strum(serialize = "mac_os_x")]
    MacOsX,
    /// Any value outside the known vocabulary, preserved verbatim.
    #[strum(default)]
    Other(String),
}

impl PlatformFamily {
    /// Parse a raw `platform_family` value.
    ///
    /// Never fails: unrecognized values become [`PlatformFamily::Other`].
    /// Matching is exact, so `"Windows"` parses to `Other("Windows")` and
    /// does not gate as [`PlatformFamily::Windows`].
    pub fn parse(value: &str) -> Self {
        value
            .parse()
            .unwrap_or_else(|_| Self::Other(value.to_string()))
    }

    /// Check whether this is the Windows platform family.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}
