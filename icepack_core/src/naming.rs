use crate::error::{IcepackError, Result};

/// Base name of the native library this crate binds.
pub const LIB_BASE: &str = "unice68";

/// Build the platform file name for a library base name, e.g.
/// `libunice68.so` on Linux or `unice68.dll` on Windows.
///
/// This is a fixed table keyed by `std::env::consts::OS` rather than an
/// inference from other libraries' observed filenames: the set of naming
/// conventions is tiny and stable, and a table fails loudly on an OS it
/// has never heard of instead of guessing.
pub fn library_file_name(base: &str) -> Result<String> {
    library_file_name_for(base, std::env::consts::OS)
}

fn library_file_name_for(base: &str, os: &str) -> Result<String> {
    match os {
        "linux" | "android" | "freebsd" | "openbsd" | "netbsd" => Ok(format!("lib{base}.so")),
        "macos" | "ios" => Ok(format!("lib{base}.dylib")),
        "windows" => Ok(format!("{base}.dll")),
        other => Err(IcepackError::SchemeUndetermined {
            os: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes() {
        assert_eq!(library_file_name_for("unice68", "linux").unwrap(), "libunice68.so");
        assert_eq!(library_file_name_for("unice68", "macos").unwrap(), "libunice68.dylib");
        assert_eq!(library_file_name_for("unice68", "windows").unwrap(), "unice68.dll");
    }

    #[test]
    fn unknown_os_is_an_error() {
        let err = library_file_name_for("unice68", "plan9").unwrap_err();
        assert!(matches!(err, IcepackError::SchemeUndetermined { .. }));
    }
}
