//! Trait abstraction for the byte-oriented link to enable testing

use std::io;

/// Blocking byte-stream capability over the physical link
///
/// The capture core never configures baud rate, parity, or connection
/// lifecycle; it only pulls bytes. Any transport (serial, socket, file)
/// can implement this.
pub trait ByteSource {
    /// Read at least one byte into `buf`, blocking until data is available.
    ///
    /// Returns the number of bytes read. `Ok(0)` means the link closed and
    /// is the external stop signal for the capture loop.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Any `io::Read` file works as a replay source (e.g. a previously captured
/// log piped back through the decoder).
impl ByteSource for std::fs::File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Mock source that replays a byte script in fixed-size chunks
    ///
    /// `chunk_size` of 1 exercises the terminator-split-across-reads case.
    pub struct ScriptedSource {
        data: Vec<u8>,
        pos: usize,
        chunk_size: usize,
        pub fail_after: Option<usize>,
    }

    impl ScriptedSource {
        pub fn new(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
            assert!(chunk_size > 0, "chunk_size must be at least 1");
            Self {
                data: data.into(),
                pos: 0,
                chunk_size,
                fail_after: None,
            }
        }

        /// Make the source return an I/O error once `n` bytes were read
        pub fn failing_after(mut self, n: usize) -> Self {
            self.fail_after = Some(n);
            self
        }
    }

    impl ByteSource for ScriptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(limit) = self.fail_after {
                if self.pos >= limit {
                    return Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "mock link failure",
                    ));
                }
            }

            if self.pos >= self.data.len() {
                return Ok(0); // link closed
            }

            let end = (self.pos + self.chunk_size).min(self.data.len());
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_scripted_source_chunking() {
        let mut source = ScriptedSource::new(b"abcde".to_vec(), 2);
        let mut buf = [0u8; 8];

        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"cd");
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        assert_eq!(&buf[..1], b"e");
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_scripted_source_failure() {
        let mut source = ScriptedSource::new(b"abcd".to_vec(), 2).failing_after(2);
        let mut buf = [0u8; 8];

        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert!(source.read(&mut buf).is_err());
    }
}
