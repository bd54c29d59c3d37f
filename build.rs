// build.rs

//! Build script for the console kernel
//!
//! This script runs at build time to:
//! - Validate the bare-metal target specification
//! - Generate build information for the boot banner

use serde::Deserialize;
use serde::de::{self, Deserializer};
use std::env;
use std::fs;
use std::path::Path;

const TARGET_SPEC: &str = "x86_64-tiny_console.json";

#[derive(Debug, Deserialize)]
struct TargetSpec {
    #[serde(rename = "llvm-target")]
    llvm_target: String,
    #[serde(rename = "data-layout")]
    data_layout: String,
    arch: String,
    os: String,
    #[serde(
        rename = "target-pointer-width",
        deserialize_with = "deserialize_pointer_width"
    )]
    target_pointer_width: u16,
    #[serde(rename = "disable-redzone")]
    disable_redzone: bool,
    #[serde(rename = "panic-strategy")]
    panic_strategy: String,
}

fn deserialize_pointer_width<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PointerWidthRaw {
        Integer(u64),
        Text(String),
    }

    match PointerWidthRaw::deserialize(deserializer)? {
        PointerWidthRaw::Integer(value) => {
            u16::try_from(value).map_err(|_| de::Error::custom("target-pointer-width out of range"))
        }
        PointerWidthRaw::Text(text) => text.parse::<u16>().map_err(|_| {
            de::Error::custom(format!(
                "target-pointer-width must be numeric, received '{text}'"
            ))
        }),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={TARGET_SPEC}");

    validate_target_spec();
    print_build_info();
}

/// Validate the target specification file
///
/// Ensures the target JSON is well-formed and describes a freestanding
/// x86_64 target with the red zone disabled and abort-on-panic.
fn validate_target_spec() {
    let target_path = Path::new(TARGET_SPEC);

    if !target_path.exists() {
        println!("cargo:warning=Target specification file not found: {TARGET_SPEC}");
        return;
    }

    let content = fs::read_to_string(target_path)
        .unwrap_or_else(|e| panic!("Failed to read target specification: {e}"));

    let spec: TargetSpec = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Target specification is not valid JSON: {e}"));

    assert!(
        !spec.llvm_target.trim().is_empty(),
        "Target specification is missing a valid 'llvm-target' value"
    );

    assert!(
        !spec.data_layout.trim().is_empty(),
        "Target specification is missing a valid 'data-layout' value"
    );

    assert!(
        spec.arch == "x86_64",
        "Target specification has unexpected architecture '{}' (expected 'x86_64')",
        spec.arch
    );

    assert!(
        spec.os == "none",
        "Target specification must be freestanding (os = 'none', found '{}')",
        spec.os
    );

    assert_eq!(
        spec.target_pointer_width, 64,
        "Target specification uses unsupported pointer width {} (expected 64)",
        spec.target_pointer_width
    );

    assert!(
        spec.disable_redzone,
        "Target specification must set 'disable-redzone' to true"
    );

    assert_eq!(
        spec.panic_strategy.as_str(),
        "abort",
        "Target specification must set 'panic-strategy' to 'abort'"
    );
}

/// Export profile and target so the boot banner can show them.
fn print_build_info() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_PROFILE={profile}");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_TARGET={target}");
}
