use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between "find me a backend" and "here are
/// your bytes". Resolver-side kinds (`LoadFailed`, `SymbolMissing`) are
/// normally swallowed by the candidate search and only reach callers as
/// `BackendNotFound`; façade-side kinds surface immediately with no retry.
#[derive(Error, Debug)]
pub enum IcepackError {
    #[error("could not determine shared-library naming scheme for OS `{os}`")]
    SchemeUndetermined { os: String },

    #[error("ICEPACK_LIB override `{path}` does not name a {base} library")]
    InvalidOverride { path: PathBuf, base: String },

    #[error("failed to load backend `{path}`: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("backend `{path}` is missing symbol `{symbol}`")]
    SymbolMissing { path: PathBuf, symbol: &'static str },

    #[error("no usable {base} backend found in any search location")]
    BackendNotFound { base: String },

    #[error("size query failed with native code {code}")]
    SizeQueryFailed { code: i32 },

    #[error("backend reported invalid depacked size {size}")]
    InvalidDepackedSize { size: i32 },

    #[error("compressed unit claims {packed} bytes but input holds only {available}")]
    TruncatedInput { packed: i32, available: usize },

    #[error("depack failed with native code {code}")]
    DecodeFailed { code: i32 },

    #[error("input buffer is empty")]
    EmptyInput,

    #[error("invalid output capacity {capacity}")]
    InvalidCapacity { capacity: i64 },

    #[error("pack failed with native code {code}")]
    EncodeFailed { code: i32 },

    #[error("pack overflowed capacity {capacity} by {excess} bytes")]
    EncodeOverflow { capacity: i32, excess: i32 },
}

pub type Result<T> = std::result::Result<T, IcepackError>;
