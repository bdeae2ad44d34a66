use std::io::{self, Write};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

/// Log writer that clears the progress bar while a line goes out, then redraws it.
pub struct Suspended<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> Suspended<M> {
    pub fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for Suspended<M> {
    type Writer = SuspendedWriter<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWriter {
            bar: &self.bar,
            inner: self.inner.make_writer(),
        }
    }
}

pub struct SuspendedWriter<'a, W> {
    bar: &'a ProgressBar,
    inner: W,
}

impl<W: Write> Write for SuspendedWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write(buf))
    }

    // One suspend per log line rather than per partial write.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.flush())
    }
}
