//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `antimatter-core 0.1.0 (abc1234 2026-01-31, release)`
pub fn version_string() -> String {
    format!(
        "{} {} ({} {}, {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE,
        BUILD_PROFILE
    )
}
