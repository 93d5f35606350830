//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `sharenote_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("sharenote_core ping={}", sharenote_core::ping());
    println!("sharenote_core version={}", sharenote_core::core_version());
}
