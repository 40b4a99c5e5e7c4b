use std::path::Path;

use crate::backend::Backend;
use crate::error::{IcepackError, Result};
use crate::resolver::{self, SearchConfig};

/// Safe pack/depack interface over an ICE! packer backend.
///
/// Construction resolves and binds a backend exactly once; the handle is
/// owned for the façade's whole lifetime and every operation below is
/// only available once construction has succeeded. The façade adds the
/// validation the raw three-function ABI does not give you: size and
/// truncation checks before decoding, capacity and overflow checks after
/// encoding. Either a call returns a complete validated buffer or it
/// returns an error; there is no partial output.
pub struct Icepack {
    backend: Box<dyn Backend>,
}

impl Icepack {
    /// Bind a backend using the conventional search order
    /// (see [`SearchConfig::from_env`]).
    pub fn new() -> Result<Self> {
        Self::with_config(&SearchConfig::from_env())
    }

    /// Bind a specific library file, falling back to the conventional
    /// search order if it does not load.
    pub fn with_library(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = SearchConfig::from_env();
        config.explicit_path = Some(path.as_ref().to_path_buf());
        Self::with_config(&config)
    }

    /// Bind a backend using an explicit search configuration.
    pub fn with_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self::from_backend(Box::new(resolver::resolve(config)?)))
    }

    /// Wrap an already-constructed backend. This is how alternative
    /// (non-native) backends plug in behind the same façade.
    pub fn from_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Identifier of the bound backend, e.g. the resolved library path.
    pub fn backend_origin(&self) -> &str {
        self.backend.origin()
    }

    /// Read the size pair out of a compressed buffer's header without
    /// decoding it: `(depacked_size, packed_size)`, where `packed_size`
    /// is how many leading bytes of `buffer` form the compressed unit.
    pub fn depacked_size(&self, buffer: &[u8]) -> Result<(i32, i32)> {
        let (depacked, packed) = self.backend.size_query(buffer);
        if depacked < 0 {
            return Err(IcepackError::SizeQueryFailed { code: depacked });
        }
        Ok((depacked, packed))
    }

    /// Decompress `src`, returning exactly the depacked payload.
    ///
    /// The header's claimed packed size must not exceed `src.len()`;
    /// a buffer cut short of its own header's claim is rejected as
    /// truncated rather than handed to the decoder.
    pub fn depack(&self, src: &[u8]) -> Result<Vec<u8>> {
        let (depacked, packed) = self.depacked_size(src)?;
        if depacked <= 0 {
            return Err(IcepackError::InvalidDepackedSize { size: depacked });
        }
        match usize::try_from(packed) {
            Ok(p) if p <= src.len() => {}
            _ => {
                return Err(IcepackError::TruncatedInput {
                    packed,
                    available: src.len(),
                })
            }
        }

        let mut dst = vec![0u8; depacked as usize];
        let code = self.backend.decode(&mut dst, src);
        if code != 0 {
            return Err(IcepackError::DecodeFailed { code });
        }
        Ok(dst)
    }

    /// Compress `src` into at most `max_size` bytes.
    ///
    /// With `max_size` of `None` the capacity defaults to
    /// `16 + len * 9 / 8`, a margin over the worst-case expansion of the
    /// ICE! format. If the backend reports needing more room than it was
    /// granted the call fails with `EncodeOverflow` and the output is
    /// discarded; in an unmanaged backend those extra bytes may already
    /// have run past the buffer, so such output is never returned.
    pub fn pack(&self, src: &[u8], max_size: Option<i32>) -> Result<Vec<u8>> {
        if src.is_empty() {
            return Err(IcepackError::EmptyInput);
        }
        // The ABI carries lengths as i32, so both the input length and
        // the output capacity must fit one.
        if i32::try_from(src.len()).is_err() {
            return Err(IcepackError::InvalidCapacity {
                capacity: src.len() as i64,
            });
        }
        let capacity_wide: i64 = match max_size {
            Some(m) => i64::from(m),
            None => 16 + (src.len() as i64 * 9) / 8,
        };
        if capacity_wide <= 0 {
            return Err(IcepackError::InvalidCapacity {
                capacity: capacity_wide,
            });
        }
        let capacity = i32::try_from(capacity_wide).map_err(|_| IcepackError::InvalidCapacity {
            capacity: capacity_wide,
        })?;

        let mut dst = vec![0u8; capacity as usize];
        let written = self.backend.encode(&mut dst, src);
        if written < 0 {
            return Err(IcepackError::EncodeFailed { code: written });
        }
        if written > capacity {
            return Err(IcepackError::EncodeOverflow {
                capacity,
                excess: written - capacity,
            });
        }
        dst.truncate(written as usize);
        Ok(dst)
    }
}
