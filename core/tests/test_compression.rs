mod common;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;
    use vzip_core::compression::{
        create_compressor, read_capped, BoundedBuffer, CodecOptions, CompressionError, Compressor,
        DeflateCompressor, StreamFormat,
    };

    use crate::common::{frame, inflate, inflate_raw, noise};

    fn compress(input: &[u8], options: CodecOptions, cap: usize) -> Result<Vec<u8>, CompressionError> {
        let mut c = DeflateCompressor::new(options)?;
        let mut out = BoundedBuffer::with_capacity(cap);
        let n = c.compress_into(input, &mut out)?;
        assert_eq!(n, out.len());
        Ok(out.as_slice().to_vec())
    }

    // ------------------------------------------------------------
    // BoundedBuffer
    // ------------------------------------------------------------
    #[test]
    fn fill_short_source() {
        let mut buf = BoundedBuffer::with_capacity(16);
        let outcome = buf.fill_from(&mut Cursor::new(b"abc".to_vec())).unwrap();
        assert_eq!(outcome.len, 3);
        assert!(!outcome.truncated);
        assert_eq!(buf.as_slice(), b"abc");
    }

    #[test]
    fn fill_exact_capacity_is_not_truncated() {
        let mut buf = BoundedBuffer::with_capacity(8);
        let outcome = buf.fill_from(&mut Cursor::new(vec![7u8; 8])).unwrap();
        assert_eq!(outcome.len, 8);
        assert!(!outcome.truncated);
    }

    #[test]
    fn fill_one_over_capacity_is_truncated() {
        let mut buf = BoundedBuffer::with_capacity(8);
        let src: Vec<u8> = (0..9).collect();
        let outcome = buf.fill_from(&mut Cursor::new(src)).unwrap();
        assert_eq!(outcome.len, 8);
        assert!(outcome.truncated);
        assert_eq!(buf.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn refill_resets_length() {
        let mut buf = BoundedBuffer::with_capacity(8);
        buf.fill_from(&mut Cursor::new(vec![1u8; 8])).unwrap();
        buf.fill_from(&mut Cursor::new(vec![2u8; 3])).unwrap();
        assert_eq!(buf.as_slice(), &[2, 2, 2]);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn read_capped_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = BoundedBuffer::with_capacity(8);
        let err = read_capped(&dir.path().join("nope.ppm"), &mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    // ------------------------------------------------------------
    // Deflate
    // ------------------------------------------------------------
    #[test]
    fn zlib_roundtrip() {
        let input = frame(64 * 1024, 10);
        let out = compress(&input, CodecOptions::default(), 64 * 1024).unwrap();
        assert!(out.len() < input.len());
        assert_eq!(inflate(&out), input);
    }

    #[test]
    fn raw_roundtrip() {
        let input = frame(10_000, 200);
        let options = CodecOptions { level: 9, format: StreamFormat::Raw };
        let out = compress(&input, options, 16 * 1024).unwrap();
        assert_eq!(inflate_raw(&out), input);
    }

    #[test]
    fn zlib_stream_starts_with_best_compression_header() {
        let out = compress(b"frame", CodecOptions::default(), 64).unwrap();
        // CMF 0x78, FLG level bits 11 (maximum compression)
        assert_eq!(out[0], 0x78);
        assert_eq!(out[1] >> 6, 3);
    }

    #[test]
    fn incompressible_input_overflows_same_size_output() {
        let input = noise(1024, 7);
        let err = compress(&input, CodecOptions::default(), 1024).unwrap_err();
        assert!(matches!(err, CompressionError::OutputOverflow { capacity: 1024 }));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let options = CodecOptions { level: 10, format: StreamFormat::Zlib };
        assert!(matches!(DeflateCompressor::new(options), Err(CompressionError::InvalidLevel(10))));
    }

    #[test]
    fn reused_compressor_is_deterministic() {
        let a = frame(5000, 1);
        let b = noise(300, 3);

        let mut shared = create_compressor(CodecOptions::default()).unwrap();
        let mut out = BoundedBuffer::with_capacity(8192);
        shared.compress_into(&a, &mut out).unwrap();
        shared.compress_into(&b, &mut out).unwrap();
        let second = out.as_slice().to_vec();

        let fresh = compress(&b, CodecOptions::default(), 8192).unwrap();
        assert_eq!(second, fresh);
        assert_eq!(shared.name(), "deflate");
    }

    proptest! {
        #[test]
        fn any_input_inflates_back(input in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let out = compress(&input, CodecOptions::default(), 8192).unwrap();
            prop_assert_eq!(inflate(&out), input);
        }
    }
}
