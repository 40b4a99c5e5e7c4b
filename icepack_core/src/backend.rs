/// Core backend abstraction.
///
/// Exactly the three-operation capability set the ICE! packer family
/// exposes: a header size query, a decoder, and an encoder. The canonical
/// implementation is [`crate::native::NativeBackend`], bound to a shared
/// library at runtime; tests substitute an in-process implementation so
/// the façade contract can be exercised without the native library.
///
/// All three operations speak the raw native convention — `i32` result
/// codes, caller-allocated destination buffers — on purpose. Interpreting
/// those codes (negative means failure, overflow detection, size
/// validation) is the façade's job, and keeping it out of the backends
/// means every backend gets the same validation for free.
pub trait Backend: Send {
    /// Where this backend came from, for logging and error reporting.
    /// The resolved library path for native backends.
    fn origin(&self) -> &str;

    /// Query the header of a compressed buffer.
    ///
    /// Returns `(depacked_size, packed_size)`: the decoded payload length
    /// the buffer will produce, and how many leading bytes of `src` form
    /// the valid compressed unit. A negative first value means the header
    /// was malformed.
    fn size_query(&self, src: &[u8]) -> (i32, i32);

    /// Decode `src` into `dst`, which the caller has sized to the exact
    /// depacked length. Returns 0 on success, nonzero on failure.
    fn decode(&self, dst: &mut [u8], src: &[u8]) -> i32;

    /// Encode `src` into `dst`. Returns the number of bytes written on
    /// success, a negative code on failure, or a value greater than
    /// `dst.len()` when the granted capacity was insufficient.
    fn encode(&self, dst: &mut [u8], src: &[u8]) -> i32;
}
