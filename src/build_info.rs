//! Build-time information
//!
//! This module provides access to build metadata captured at compile time,
//! including build timestamps, cargo configuration, and compiler version.
//! Git fields are absent when the crate is built outside a repository.

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu, x86_64-apple-darwin)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.75.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");

const GIT_DIRTY: Option<&str> = option_env!("VERGEN_GIT_DIRTY");

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// First seven characters of the commit SHA
pub fn git_sha_short() -> Option<&'static str> {
    // vergen writes a placeholder when git metadata is unavailable
    GIT_SHA
        .filter(|sha| sha.len() >= 7 && sha.chars().all(|c| c.is_ascii_hexdigit()))
        .map(|sha| &sha[..7])
}

/// Whether the working tree had uncommitted changes at build time
pub fn is_git_dirty() -> bool {
    GIT_DIRTY == Some("true")
}

/// Returns a formatted build version string
///
/// Format: `{pkg_version}-{target_triple}-opt{opt_level}`
/// Example: `0.1.0-x86_64-unknown-linux-gnu-opt3`
pub fn version_string() -> String {
    format!("{}-{}-opt{}", PKG_VERSION, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL)
}

/// Returns a detailed build info string
///
/// Includes build timestamp, target, optimization level, and compiler version
pub fn detailed_info() -> String {
    let mut info = format!(
        "Built: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        BUILD_TIMESTAMP, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL, RUSTC_SEMVER, RUSTC_CHANNEL
    );
    if let Some(sha) = git_sha_short() {
        let dirty = if is_git_dirty() { " (dirty)" } else { "" };
        info.push_str(&format!("\nCommit: {sha}{dirty}"));
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_includes_target() {
        let version = version_string();
        assert!(version.starts_with(PKG_VERSION));
        assert!(version.contains(CARGO_TARGET_TRIPLE));
    }
}
