//! StreamSource: line cursor over any byte reader.

use std::io::{self, BufRead, BufReader, Cursor, Read};

use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use super::LineSource;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Decodes a byte stream into lines, one line of look-ahead deep.
///
/// The encoding comes from the byte order mark (UTF-8 / UTF-16LE / UTF-16BE);
/// without one the stream is read as UTF-8 with malformed sequences
/// replaced. Look-ahead makes [`at_end`](LineSource::at_end) exact and
/// infallible; an error hit while prefetching is reported by the following
/// [`read_line`](LineSource::read_line).
pub struct StreamSource<R: Read> {
    reader: BufReader<DecodeReaderBytes<BufReader<R>, Vec<u8>>>,
    encoding: &'static Encoding,
    scratch: Vec<u8>,
    pending: Option<String>,
    deferred: Option<io::Error>,
}

impl<R: Read> StreamSource<R> {
    /// Sniff the encoding and prefetch the first line.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut raw = BufReader::new(inner);
        let encoding = Encoding::for_bom(raw.fill_buf()?)
            .map(|(encoding, _)| encoding)
            .unwrap_or(UTF_8);

        let decoder = DecodeReaderBytesBuilder::new()
            .bom_sniffing(true)
            .build(raw);

        let mut source = StreamSource {
            reader: BufReader::new(decoder),
            encoding,
            scratch: Vec::new(),
            pending: None,
            deferred: None,
        };
        source.pending = source
            .fetch()?
            .map(|line| match line.strip_prefix(BYTE_ORDER_MARK) {
                Some(rest) => rest.to_string(),
                None => line,
            });

        tracing::debug!(encoding = encoding.name(), "stream source ready");
        Ok(source)
    }

    fn fetch(&mut self) -> io::Result<Option<String>> {
        self.scratch.clear();
        if self.reader.read_until(b'\n', &mut self.scratch)? == 0 {
            return Ok(None);
        }
        if self.scratch.last() == Some(&b'\n') {
            self.scratch.pop();
        }
        if self.scratch.last() == Some(&b'\r') {
            self.scratch.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.scratch).into_owned()))
    }
}

impl StreamSource<Cursor<Vec<u8>>> {
    /// In-memory source over `text`.
    pub fn from_text(text: &str) -> io::Result<Self> {
        Self::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: Read + Send> LineSource for StreamSource<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let Some(line) = self.pending.take() else {
            return Ok(None);
        };
        match self.fetch() {
            Ok(next) => self.pending = next,
            Err(err) => self.deferred = Some(err),
        }
        Ok(Some(line))
    }

    fn at_end(&self) -> bool {
        self.pending.is_none() && self.deferred.is_none()
    }

    fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl<R: Read> std::fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("encoding", &self.encoding.name())
            .field("pending", &self.pending)
            .field("deferred", &self.deferred)
            .finish()
    }
}
