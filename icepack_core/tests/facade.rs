/// Façade-contract tests.
///
/// The native unice68 library is not assumed to be installed on the test
/// host, so these run against an in-process stub backend speaking a
/// trivial length-prefixed framing that honors the same three-function
/// contract: a header carrying (depacked, packed) sizes, a copy-through
/// payload, and an encoder that reports its needed size when the granted
/// capacity is too small.
use icepack_core::{Backend, Icepack, IcepackError};

/// Stub frame: depacked:u32be + packed:u32be + payload (copied verbatim).
const HEADER: usize = 8;

struct FrameBackend;

impl Backend for FrameBackend {
    fn origin(&self) -> &str {
        "frame-stub"
    }

    fn size_query(&self, src: &[u8]) -> (i32, i32) {
        if src.len() < HEADER {
            return (-1, 0);
        }
        let depacked = u32::from_be_bytes(src[0..4].try_into().unwrap()) as i32;
        let packed = u32::from_be_bytes(src[4..8].try_into().unwrap()) as i32;
        (depacked, packed)
    }

    fn decode(&self, dst: &mut [u8], src: &[u8]) -> i32 {
        let (depacked, _) = self.size_query(src);
        if depacked < 0 || dst.len() != depacked as usize {
            return -1;
        }
        if src.len() < HEADER + depacked as usize {
            return -2;
        }
        dst.copy_from_slice(&src[HEADER..HEADER + depacked as usize]);
        0
    }

    fn encode(&self, dst: &mut [u8], src: &[u8]) -> i32 {
        let needed = HEADER + src.len();
        if needed > dst.len() {
            // Reports the full size it wanted, same as a native packer
            // signalling overflow.
            return needed as i32;
        }
        dst[0..4].copy_from_slice(&(src.len() as u32).to_be_bytes());
        dst[4..8].copy_from_slice(&(needed as u32).to_be_bytes());
        dst[HEADER..needed].copy_from_slice(src);
        needed as i32
    }
}

/// Backend whose decoder always fails, for the DecodeFailed path.
struct BrokenDecoder;

impl Backend for BrokenDecoder {
    fn origin(&self) -> &str {
        "broken-decoder"
    }

    fn size_query(&self, src: &[u8]) -> (i32, i32) {
        FrameBackend.size_query(src)
    }

    fn decode(&self, _dst: &mut [u8], _src: &[u8]) -> i32 {
        -7
    }

    fn encode(&self, dst: &mut [u8], src: &[u8]) -> i32 {
        FrameBackend.encode(dst, src)
    }
}

fn facade() -> Icepack {
    Icepack::from_backend(Box::new(FrameBackend))
}

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn round_trip_is_byte_exact() {
    let ice = facade();
    for data in [
        b"x".to_vec(),
        b"Hello!".to_vec(),
        pseudo_random_bytes(64 * 1024, 42),
    ] {
        let packed = ice.pack(&data, None).unwrap();
        assert_eq!(ice.depack(&packed).unwrap(), data);
    }
}

#[test]
fn size_pair_matches_lengths() {
    let ice = facade();
    let data = pseudo_random_bytes(1000, 7);
    let packed = ice.pack(&data, None).unwrap();
    let (depacked, csize) = ice.depacked_size(&packed).unwrap();
    assert_eq!(depacked as usize, data.len());
    assert_eq!(csize as usize, packed.len());
}

#[test]
fn empty_input_is_rejected() {
    let err = facade().pack(b"", None).unwrap_err();
    assert!(matches!(err, IcepackError::EmptyInput));
}

#[test]
fn truncated_input_never_yields_partial_output() {
    let ice = facade();
    let packed = ice.pack(b"some payload worth protecting", None).unwrap();
    let err = ice.depack(&packed[..packed.len() - 1]).unwrap_err();
    assert!(matches!(
        err,
        IcepackError::TruncatedInput { .. } | IcepackError::DecodeFailed { .. }
    ));
}

#[test]
fn overflow_is_fatal_not_truncated() {
    let err = facade().pack(b"far too big for one byte", Some(1)).unwrap_err();
    match err {
        IcepackError::EncodeOverflow { capacity, excess } => {
            assert_eq!(capacity, 1);
            assert!(excess > 0);
        }
        other => panic!("expected EncodeOverflow, got {other}"),
    }
}

#[test]
fn non_positive_capacity_is_rejected() {
    let ice = facade();
    for capacity in [0, -1, -100] {
        let err = ice.pack(b"data", Some(capacity)).unwrap_err();
        assert!(matches!(err, IcepackError::InvalidCapacity { .. }));
    }
}

#[test]
fn malformed_header_fails_size_query() {
    let err = facade().depacked_size(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, IcepackError::SizeQueryFailed { code } if code < 0));
}

#[test]
fn zero_depacked_size_is_rejected_before_decoding() {
    // A header claiming a zero-length payload is never handed to the
    // decoder; there is no such thing as a valid empty depack.
    let mut frame = Vec::new();
    frame.extend_from_slice(&0u32.to_be_bytes());
    frame.extend_from_slice(&(HEADER as u32).to_be_bytes());
    let err = facade().depack(&frame).unwrap_err();
    assert!(matches!(err, IcepackError::InvalidDepackedSize { size: 0 }));
}

#[test]
fn negative_packed_size_is_treated_as_truncation() {
    // A packed size that comes back negative cannot index the caller's
    // buffer and is rejected the same way an over-long claim is.
    let mut frame = Vec::new();
    frame.extend_from_slice(&5u32.to_be_bytes());
    frame.extend_from_slice(&u32::MAX.to_be_bytes());
    frame.extend_from_slice(b"hello");
    let err = facade().depack(&frame).unwrap_err();
    assert!(matches!(err, IcepackError::TruncatedInput { packed: -1, .. }));
}

#[test]
fn decoder_failure_surfaces_with_native_code() {
    let ice = facade();
    let packed = ice.pack(b"Hello!", None).unwrap();
    let broken = Icepack::from_backend(Box::new(BrokenDecoder));
    let err = broken.depack(&packed).unwrap_err();
    assert!(matches!(err, IcepackError::DecodeFailed { code: -7 }));
}

#[test]
fn hello_scenario() {
    let ice = facade();
    let packed = ice.pack(b"Hello!", None).unwrap();
    let (depacked, csize) = ice.depacked_size(&packed).unwrap();
    assert_eq!(depacked, 6);
    assert_eq!(csize as usize, packed.len());
    assert_eq!(ice.depack(&packed).unwrap(), b"Hello!");
}
