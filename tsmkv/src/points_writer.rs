use models::Point;

use crate::error::{Error, Result};

/// The ability to write points into a storage engine.
pub trait PointsWriter {
    fn write_points(&self, points: &[Point]) -> Result<()>;
}

/// Accumulates points and forwards them to the underlying writer in batches
/// of up to `size`.
///
/// A write larger than the remaining buffer space flushes what is buffered;
/// a large write against an empty buffer goes straight through to avoid the
/// copy. The first write error poisons the writer: it is returned once
/// as-is and reported by every later call.
pub struct BufferedPointsWriter<W: PointsWriter> {
    writer: W,
    buf: Vec<Point>,
    size: usize,
    failed: Option<String>,
}

impl<W: PointsWriter> BufferedPointsWriter<W> {
    pub fn new(size: usize, writer: W) -> Self {
        let size = size.max(1);
        Self {
            writer,
            buf: Vec::with_capacity(size),
            size,
            failed: None,
        }
    }

    /// Unused buffer slots.
    pub fn available(&self) -> usize {
        self.size - self.buf.len()
    }

    /// Points currently held in the buffer.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn write_points(&mut self, mut points: &[Point]) -> Result<()> {
        while points.len() > self.available() && self.failed.is_none() {
            if self.buf.is_empty() {
                return self.forward(points);
            }
            let n = self.available().min(points.len());
            self.buf.extend_from_slice(&points[..n]);
            self.flush()?;
            points = &points[n..];
        }
        if let Some(reason) = &self.failed {
            return Err(Error::Internal {
                reason: reason.clone(),
            });
        }
        self.buf.extend_from_slice(points);
        Ok(())
    }

    /// Writes any buffered points to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(reason) = &self.failed {
            return Err(Error::Internal {
                reason: reason.clone(),
            });
        }
        if self.buf.is_empty() {
            return Ok(());
        }
        match self.writer.write_points(&self.buf) {
            Ok(()) => {
                self.buf.clear();
                Ok(())
            }
            Err(e) => {
                self.failed = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn forward(&mut self, points: &[Point]) -> Result<()> {
        match self.writer.write_points(points) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.failed = Some(e.to_string());
                Err(e)
            }
        }
    }
}
