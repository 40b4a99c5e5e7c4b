use std::ffi::{c_int, c_void};
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use libloading::Library;

use crate::backend::Backend;
use crate::error::{IcepackError, Result};

// int unice68_depacked_size(const void *buffer, int *p_csize);
type SizeQueryFn = unsafe extern "C" fn(*const c_void, *mut c_int) -> c_int;
// int unice68_depacker(void *dst, const void *src);
type DepackFn = unsafe extern "C" fn(*mut c_void, *const c_void) -> c_int;
// int unice68_packer(void *dst, int max, const void *src, int len);
type PackFn = unsafe extern "C" fn(*mut c_void, c_int, *const c_void, c_int) -> c_int;

const SYM_DEPACKED_SIZE: &str = "unice68_depacked_size";
const SYM_DEPACKER: &str = "unice68_depacker";
const SYM_PACKER: &str = "unice68_packer";

/// Function pointers resolved from a loaded library. They stay valid for
/// as long as the `Library` they came from is alive.
struct NativeFns {
    size_query: SizeQueryFn,
    decode: DepackFn,
    encode: PackFn,
}

/// A dynamically loaded unice68 library implementing [`Backend`].
///
/// The entry points are not documented as reentrant, so all three
/// operations are serialized through one mutex; two `NativeBackend`s
/// loaded from the same file are still independent library handles.
pub struct NativeBackend {
    origin: String,
    fns: Mutex<NativeFns>,
    // Declared after `fns` so the function pointers are dropped before
    // the library is unloaded.
    _lib: Library,
}

impl NativeBackend {
    /// Load `path` and bind the three unice68 entry points.
    ///
    /// `path` may be a bare file name, in which case the platform loader
    /// searches its usual library path. A load error or a missing symbol
    /// rejects only this candidate; the resolver moves on to the next.
    pub fn load(path: &Path) -> Result<Self> {
        // SAFETY: loading a shared object runs its initializers. We only
        // ever load candidate codec libraries named by the resolver.
        let lib = unsafe { Library::new(path) }.map_err(|e| IcepackError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let missing = |symbol| IcepackError::SymbolMissing {
            path: path.to_path_buf(),
            symbol,
        };
        // SAFETY: the signatures match the unice68 C prototypes above;
        // a library exporting these names with other signatures is out of
        // contract for any candidate we accept.
        let fns = unsafe {
            NativeFns {
                size_query: *lib
                    .get::<SizeQueryFn>(SYM_DEPACKED_SIZE.as_bytes())
                    .map_err(|_| missing(SYM_DEPACKED_SIZE))?,
                decode: *lib
                    .get::<DepackFn>(SYM_DEPACKER.as_bytes())
                    .map_err(|_| missing(SYM_DEPACKER))?,
                encode: *lib
                    .get::<PackFn>(SYM_PACKER.as_bytes())
                    .map_err(|_| missing(SYM_PACKER))?,
            }
        };

        Ok(Self {
            origin: path.display().to_string(),
            fns: Mutex::new(fns),
            _lib: lib,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NativeFns> {
        // No code panics while holding this lock, but recover anyway
        // rather than unwrap.
        self.fns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Manual impl: the bound function pointers carry no useful state.
impl fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl Backend for NativeBackend {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn size_query(&self, src: &[u8]) -> (i32, i32) {
        let fns = self.lock();
        let mut packed: c_int = 0;
        // SAFETY: src outlives the call; the library only reads the ICE!
        // header from it and writes the packed size through the out-param.
        let depacked =
            unsafe { (fns.size_query)(src.as_ptr() as *const c_void, &mut packed) };
        (depacked, packed)
    }

    fn decode(&self, dst: &mut [u8], src: &[u8]) -> i32 {
        let fns = self.lock();
        // SAFETY: the façade sized dst to the depacked size this same
        // backend reported for src, which is the capacity contract of
        // unice68_depacker.
        unsafe {
            (fns.decode)(
                dst.as_mut_ptr() as *mut c_void,
                src.as_ptr() as *const c_void,
            )
        }
    }

    fn encode(&self, dst: &mut [u8], src: &[u8]) -> i32 {
        let fns = self.lock();
        // SAFETY: dst capacity and src length are passed explicitly; the
        // façade guarantees both fit in an i32 before calling.
        unsafe {
            (fns.encode)(
                dst.as_mut_ptr() as *mut c_void,
                dst.len() as c_int,
                src.as_ptr() as *const c_void,
                src.len() as c_int,
            )
        }
    }
}
