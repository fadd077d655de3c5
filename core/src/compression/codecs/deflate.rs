//! Deflate via flate2, one `Finish` pass into a fixed-size output buffer.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::compression::types::{CodecOptions, CompressionError, Compressor, StreamFormat};
use crate::compression::BoundedBuffer;

pub struct DeflateCompressor {
    inner: Compress,
    options: CodecOptions,
}

impl DeflateCompressor {
    pub fn new(options: CodecOptions) -> Result<Self, CompressionError> {
        options.validate()?;
        let zlib_header = options.format == StreamFormat::Zlib;
        Ok(Self {
            inner: Compress::new(Compression::new(options.level), zlib_header),
            options,
        })
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }
}

impl Compressor for DeflateCompressor {
    fn compress_into(&mut self, input: &[u8], out: &mut BoundedBuffer) -> Result<usize, CompressionError> {
        // Every frame is its own stream
        self.inner.reset();
        out.clear();

        let capacity = out.capacity();
        let dst = out.storage_mut();

        // Finish until end-of-stream; the backend may return early with
        // room left, so keep feeding the remaining input and output.
        loop {
            let consumed = self.inner.total_in() as usize;
            let written = self.inner.total_out() as usize;

            let status = self
                .inner
                .compress(&input[consumed..], &mut dst[written..], FlushCompress::Finish)
                .map_err(|e| CompressionError::CodecProcessFailed {
                    codec: self.name(),
                    msg: e.to_string(),
                })?;

            let now_written = self.inner.total_out() as usize;
            match status {
                Status::StreamEnd => {
                    out.set_len(now_written);
                    return Ok(now_written);
                }
                Status::Ok | Status::BufError => {
                    let progressed = now_written > written || self.inner.total_in() as usize > consumed;
                    if now_written >= capacity || !progressed {
                        return Err(CompressionError::OutputOverflow { capacity });
                    }
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "deflate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_still_produces_a_stream() {
        let mut c = DeflateCompressor::new(CodecOptions::default()).unwrap();
        let mut out = BoundedBuffer::with_capacity(64);
        let n = c.compress_into(&[], &mut out).unwrap();
        assert!(n > 0);
        assert_eq!(out.len(), n);
    }

    #[test]
    fn tiny_output_overflows() {
        let mut c = DeflateCompressor::new(CodecOptions::default()).unwrap();
        let mut out = BoundedBuffer::with_capacity(4);
        let input: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        assert!(matches!(
            c.compress_into(&input, &mut out),
            Err(CompressionError::OutputOverflow { capacity: 4 })
        ));
    }
}
