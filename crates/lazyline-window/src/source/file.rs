//! Opening files, transparently inflating gzip.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::StreamSource;

/// Boxed reader produced by [`open_file`].
pub type FileReader = Box<dyn Read + Send>;

/// Open `path` as a line source.
///
/// Files with a `.gz` extension (any case) are decompressed on the fly.
/// A corrupt gzip header surfaces here as an `io::Error`, since the first
/// line is prefetched.
pub fn open_file(path: &Path) -> io::Result<StreamSource<FileReader>> {
    let file = File::open(path)?;
    let reader: FileReader = if is_gzip_path(path) {
        tracing::debug!("opening {} through gzip decoder", path.display());
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    StreamSource::new(reader)
}

/// Returns `true` when `path` carries a `.gz` extension.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
