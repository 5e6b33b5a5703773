//! Line sources: decoded, line-split byte streams consumed by the window.
//!
//! The window only ever asks for "next line or end" and "are we at the end";
//! file handling, gzip inflation and encoding detection live here.

mod file;
mod stream;

pub use file::*;
pub use stream::*;

use std::io;

use encoding_rs::Encoding;

/// An exclusively-owned, forward-only cursor over lines.
///
/// Dropping the source releases whatever it reads from.
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` once exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// `true` once no further line can be returned.
    fn at_end(&self) -> bool;

    /// Text encoding the stream is being decoded with.
    fn encoding(&self) -> &'static Encoding;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }

    fn at_end(&self) -> bool {
        (**self).at_end()
    }

    fn encoding(&self) -> &'static Encoding {
        (**self).encoding()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
