//! Target triples.
//!
//! Target triples follow the format `<arch>-<vendor>-<os>[-<env>]`:
//!
//! - `x86_64-unknown-linux-gnu` - 64-bit Linux with glibc
//! - `i686-pc-windows-msvc` - 32-bit Windows
//! - `wasm32-unknown-unknown` - standalone WebAssembly

use std::fmt;

use thiserror::Error;

/// Error type for target and profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// Target triple has no registered ABI profile.
    #[error("unsupported target '{triple}'. Supported targets: {}", .supported.join(", "))]
    UnsupportedTarget {
        triple: String,
        supported: Vec<&'static str>,
    },
    /// Invalid target triple format.
    #[error("invalid target triple '{triple}': {reason}")]
    InvalidTripleFormat { triple: String, reason: String },
    /// A custom profile declared an alignment that is not a power of two.
    #[error("invalid alignment {align} for `{subject}`: alignment must be a power of two")]
    InvalidAlignment { subject: &'static str, align: u64 },
    /// A custom profile declared a size that is zero or not a multiple of
    /// its alignment, so array elements could not all be aligned.
    #[error("invalid size {size} for `{subject}`: size must be a non-zero multiple of its alignment {align}")]
    InvalidSize {
        subject: &'static str,
        size: u64,
        align: u64,
    },
}

/// Triples with a built-in ABI profile.
pub const SUPPORTED_TARGETS: &[&str] = &[
    // Linux
    "x86_64-unknown-linux-gnu",
    "aarch64-unknown-linux-gnu",
    "i686-unknown-linux-gnu",
    "armv7-unknown-linux-gnueabihf",
    "powerpc64-unknown-linux-gnu",
    // macOS
    "x86_64-apple-darwin",
    "aarch64-apple-darwin",
    // Windows
    "x86_64-pc-windows-msvc",
    "i686-pc-windows-msvc",
    "x86_64-pc-windows-gnu",
    // WebAssembly
    "wasm32-unknown-unknown",
];

/// Parsed components of a target triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTriple {
    /// CPU architecture (e.g., `x86_64`, `i686`, `wasm32`)
    pub arch: String,
    /// Hardware vendor (e.g., `unknown`, `apple`, `pc`)
    pub vendor: String,
    /// Operating system (e.g., `linux`, `darwin`, `windows`)
    pub os: String,
    /// Environment/ABI (e.g., `gnu`, `msvc`) - optional
    pub env: Option<String>,
}

impl TargetTriple {
    /// Parse a target triple string into components.
    pub fn parse(triple: &str) -> Result<Self, TargetError> {
        let parts: Vec<&str> = triple.split('-').collect();

        if parts.len() < 3 {
            return Err(TargetError::InvalidTripleFormat {
                triple: triple.to_string(),
                reason: "expected at least 3 components: <arch>-<vendor>-<os>".to_string(),
            });
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(TargetError::InvalidTripleFormat {
                triple: triple.to_string(),
                reason: "empty component".to_string(),
            });
        }

        Ok(Self {
            arch: parts[0].to_string(),
            vendor: parts[1].to_string(),
            os: parts[2].to_string(),
            env: parts.get(3).map(|s| (*s).to_string()),
        })
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    pub fn is_wasm(&self) -> bool {
        self.arch == "wasm32" || self.arch == "wasm64"
    }

    /// Whether this triple uses the MSVC toolchain conventions.
    pub fn is_msvc(&self) -> bool {
        self.env.as_deref() == Some("msvc")
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(env) = &self.env {
            write!(f, "-{env}")?;
        }
        Ok(())
    }
}

/// The registered triple describing the compiling host, if any.
pub fn host_triple() -> Option<&'static str> {
    let triple = if cfg!(all(target_arch = "x86_64", target_os = "linux")) {
        "x86_64-unknown-linux-gnu"
    } else if cfg!(all(target_arch = "aarch64", target_os = "linux")) {
        "aarch64-unknown-linux-gnu"
    } else if cfg!(all(target_arch = "x86", target_os = "linux")) {
        "i686-unknown-linux-gnu"
    } else if cfg!(all(target_arch = "arm", target_os = "linux")) {
        "armv7-unknown-linux-gnueabihf"
    } else if cfg!(all(
        target_arch = "powerpc64",
        target_endian = "big",
        target_os = "linux"
    )) {
        "powerpc64-unknown-linux-gnu"
    } else if cfg!(all(target_arch = "x86_64", target_os = "macos")) {
        "x86_64-apple-darwin"
    } else if cfg!(all(target_arch = "aarch64", target_os = "macos")) {
        "aarch64-apple-darwin"
    } else if cfg!(all(target_arch = "x86_64", target_os = "windows", target_env = "msvc")) {
        "x86_64-pc-windows-msvc"
    } else if cfg!(all(target_arch = "x86", target_os = "windows", target_env = "msvc")) {
        "i686-pc-windows-msvc"
    } else if cfg!(all(target_arch = "x86_64", target_os = "windows", target_env = "gnu")) {
        "x86_64-pc-windows-gnu"
    } else if cfg!(target_arch = "wasm32") {
        "wasm32-unknown-unknown"
    } else {
        return None;
    };
    Some(triple)
}
