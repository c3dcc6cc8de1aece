//! Output helpers for the formatting engine.

use core::fmt;

use crate::strftime::write::Write;
use crate::Error;

/// Wrapper struct for converting an ASCII buffer to uppercase.
#[derive(Debug)]
pub(crate) struct Upper<'a>(&'a str);

impl<'a> Upper<'a> {
    /// Construct a new `Upper` wrapper.
    pub(crate) fn new(s: &'a str) -> Self {
        Self(s)
    }
}

impl fmt::Display for Upper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in self.0.chars() {
            fmt::Write::write_char(f, x.to_ascii_uppercase())?;
        }
        Ok(())
    }
}

/// Wrapper struct for converting an ASCII buffer to lowercase.
#[derive(Debug)]
pub(crate) struct Lower<'a>(&'a str);

impl<'a> Lower<'a> {
    /// Construct a new `Lower` wrapper.
    pub(crate) fn new(s: &'a str) -> Self {
        Self(s)
    }
}

impl fmt::Display for Lower<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in self.0.chars() {
            fmt::Write::write_char(f, x.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// A `SizeLimiter` limits the maximum amount a writer can write.
pub(crate) struct SizeLimiter<'a> {
    /// Inner writer.
    inner: &'a mut dyn Write,
    /// Size limit.
    size_limit: usize,
    /// Current write count.
    count: usize,
}

impl<'a> SizeLimiter<'a> {
    /// Construct a new `SizeLimiter`.
    pub(crate) fn new(inner: &'a mut dyn Write, size_limit: usize) -> Self {
        Self {
            inner,
            size_limit,
            count: 0,
        }
    }
}

impl Write for SizeLimiter<'_> {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        if self.count == self.size_limit {
            return Err(Error::FormattedStringTooLarge);
        }

        let write_limit = data.len().min(self.size_limit - self.count);
        let written = self.inner.write(&data[..write_limit])?;
        self.count += written;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limiter_truncates() {
        let mut buf = [0u8; 16];
        let mut cursor = &mut buf[..];
        let mut limiter = SizeLimiter::new(&mut cursor, 4);

        assert_eq!(limiter.write(b"abcdef"), Ok(4));
        assert_eq!(
            limiter.write(b"g"),
            Err(Error::FormattedStringTooLarge)
        );
        assert_eq!(&buf[..4], b"abcd");
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_case_wrappers() {
        use alloc::format;

        assert_eq!(format!("{}", Upper::new("Cet")), "CET");
        assert_eq!(format!("{}", Lower::new("CET")), "cet");
    }
}
