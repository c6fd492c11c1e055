// Copyright (c) 2024 Mike Tsao

/// Bytes of a frame that was generated but didn't fit in the caller's buffer.
/// Capacity is fixed at construction and never grows.
#[derive(Debug)]
pub(crate) struct Leftover {
    bytes: Box<[u8]>,
    start: usize,
    end: usize,
}
impl Leftover {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Copies as many held bytes as fit into the front of `buffer`, and returns
    /// how many were copied.
    pub(crate) fn drain_into(&mut self, buffer: &mut [u8]) -> usize {
        let n = self.len().min(buffer.len());
        buffer[..n].copy_from_slice(&self.bytes[self.start..self.start + n]);
        self.start += n;
        if self.is_empty() {
            self.start = 0;
            self.end = 0;
        }
        n
    }

    /// Holds `bytes` for later. Only valid when nothing is currently held.
    pub(crate) fn stash(&mut self, bytes: &[u8]) {
        debug_assert!(self.is_empty());
        debug_assert!(bytes.len() < self.bytes.len());
        self.bytes[..bytes.len()].copy_from_slice(bytes);
        self.start = 0;
        self.end = bytes.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_pieces() {
        let mut leftover = Leftover::new(8);
        assert!(leftover.is_empty());
        leftover.stash(&[1, 2, 3, 4, 5]);
        assert_eq!(leftover.len(), 5);

        let mut buffer = [0u8; 2];
        assert_eq!(leftover.drain_into(&mut buffer), 2);
        assert_eq!(buffer, [1, 2]);
        assert_eq!(leftover.len(), 3);

        let mut buffer = [0u8; 10];
        assert_eq!(leftover.drain_into(&mut buffer), 3);
        assert_eq!(buffer[..3], [3, 4, 5]);
        assert!(leftover.is_empty());

        assert_eq!(leftover.drain_into(&mut buffer), 0);
    }

    #[test]
    fn empty_buffer_takes_nothing() {
        let mut leftover = Leftover::new(4);
        leftover.stash(&[9, 9, 9]);
        assert_eq!(leftover.drain_into(&mut []), 0);
        assert_eq!(leftover.len(), 3);
    }
}
