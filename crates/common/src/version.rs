use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Build metadata captured by a binary's `build.rs`.
///
/// Use [`build_info!`](crate::build_info) from the binary crate so the
/// `env!` lookups resolve against *its* build script, not this library's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub package_version: String,
    pub repo_version: String,
    pub build_profile: String,
    pub build_features: String,
    pub build_timestamp: String,
    pub rust_version: String,
}

impl BuildInfo {
    pub fn new(
        package_version: &str,
        repo_version: &str,
        build_profile: &str,
        build_features: &str,
        build_timestamp: &str,
        rust_version: &str,
    ) -> Self {
        Self {
            package_version: package_version.to_string(),
            repo_version: repo_version.to_string(),
            build_profile: build_profile.to_string(),
            build_features: build_features.to_string(),
            build_timestamp: build_timestamp.to_string(),
            rust_version: rust_version.to_string(),
        }
    }
}

impl Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version: {} ({})\nprofile: {}\nfeatures: {}\nbuilt: {}\nrustc: {}",
            self.package_version,
            self.repo_version,
            self.build_profile,
            self.build_features,
            self.build_timestamp,
            self.rust_version
        )
    }
}

#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo::new(
            env!("CARGO_PKG_VERSION"),
            env!("REPO_VERSION"),
            env!("BUILD_PROFILE"),
            env!("BUILD_FEATURES"),
            env!("BUILD_TIMESTAMP"),
            env!("RUST_VERSION"),
        )
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_lists_every_field() {
        let info = BuildInfo::new("0.1.0", "abc123", "debug", "none", "now", "rustc 1.80");
        let rendered = info.to_string();
        assert!(rendered.contains("0.1.0 (abc123)"));
        assert!(rendered.contains("profile: debug"));
        assert!(rendered.contains("rustc: rustc 1.80"));
    }
}
