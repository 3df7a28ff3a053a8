//! Capacity-checked string buffer
//!
//! Every rendering step writes through [`BoundedString`], which checks the
//! remaining capacity before each append and silently truncates at a UTF-8
//! character boundary once the limit is reached.

use std::fmt;

#[derive(Debug, Clone)]
pub struct BoundedString {
    buf: String,
    capacity: usize,
    truncated: bool,
}

impl BoundedString {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity.min(4096)),
            capacity,
            truncated: false,
        }
    }

    /// Bytes still available before truncation kicks in
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether any content has been cut off
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append `s`, keeping as much of it as fits.
    ///
    /// Returns `true` when `s` was appended in full. After the first
    /// truncation all further appends are discarded.
    pub fn push_str(&mut self, s: &str) -> bool {
        if self.truncated {
            return s.is_empty();
        }

        let remaining = self.remaining();
        if s.len() <= remaining {
            self.buf.push_str(s);
            return true;
        }

        let mut cut = remaining;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        self.truncated = true;
        false
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for BoundedString {
    // Truncation is not an error for callers formatting into the buffer.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// Truncate an owned string to at most `capacity` bytes on a char boundary
pub fn truncate_to_capacity(mut s: String, capacity: usize) -> String {
    if s.len() > capacity {
        let mut cut = capacity;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_push_within_capacity() {
        let mut buf = BoundedString::new(8);
        assert!(buf.push_str("abc"));
        assert!(buf.push_str("def"));
        assert_eq!(buf.remaining(), 2);
        assert!(!buf.is_truncated());
        assert_eq!(buf.into_string(), "abcdef");
    }

    #[test]
    fn test_truncates_and_stops() {
        let mut buf = BoundedString::new(5);
        assert!(!buf.push_str("hello world"));
        assert!(buf.is_truncated());
        assert!(!buf.push_str("x"));
        assert_eq!(buf.into_string(), "hello");
    }

    #[test]
    fn test_respects_char_boundaries() {
        let mut buf = BoundedString::new(4);
        // 'é' is two bytes; the cut must not split it
        buf.push_str("abcé");
        assert_eq!(buf.into_string(), "abc");
    }

    #[test]
    fn test_fmt_write_truncates_silently() {
        let mut buf = BoundedString::new(6);
        write!(buf, "value={}", 12345).unwrap();
        assert!(buf.is_truncated());
        assert_eq!(buf.into_string(), "value=");
    }

    #[test]
    fn test_truncate_to_capacity() {
        assert_eq!(truncate_to_capacity("short".to_string(), 10), "short");
        assert_eq!(truncate_to_capacity("ééé".to_string(), 3), "é");
        assert_eq!(truncate_to_capacity("abc".to_string(), 0), "");
    }
}
