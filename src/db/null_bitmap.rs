/// A growable bitmap marking which slots of a column hold NULL.
///
/// A set bit means the slot is null. Slots past the tracked length read as
/// valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullBitmap {
    bytes: Vec<u8>,
    len: usize,
}

impl NullBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(slots: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(slots.div_ceil(8)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends one slot.
    pub fn push(&mut self, is_null: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        let index = self.len;
        self.len += 1;
        if is_null {
            self.set_null(index);
        }
    }

    /// Grows or shrinks to `len` slots; new slots take `is_null`.
    pub fn resize(&mut self, len: usize, is_null: bool) {
        if len <= self.len {
            self.truncate(len);
            return;
        }
        for _ in self.len..len {
            self.push(is_null);
        }
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.bytes.truncate(len.div_ceil(8));
        // Clear stale bits in the last partial byte so later pushes start clean.
        let rem = len % 8;
        if rem != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= (1u8 << rem) - 1;
            }
        }
        self.len = len;
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.len = 0;
    }

    pub fn set_null(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        let byte_idx = index / 8;
        let bit_idx = index % 8;
        self.bytes[byte_idx] |= 1 << bit_idx;
    }

    pub fn set_valid(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        let byte_idx = index / 8;
        let bit_idx = index % 8;
        self.bytes[byte_idx] &= !(1 << bit_idx);
    }

    pub fn is_null(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let byte_idx = index / 8;
        let bit_idx = index % 8;
        (self.bytes[byte_idx] & (1 << bit_idx)) != 0
    }

    /// Number of null slots.
    pub fn count_nulls(&self) -> usize {
        self.bytes.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut bitmap = NullBitmap::new();
        bitmap.push(false);
        bitmap.push(true);
        bitmap.push(false);

        assert_eq!(bitmap.len(), 3);
        assert!(!bitmap.is_null(0));
        assert!(bitmap.is_null(1));
        assert!(!bitmap.is_null(2));
        assert!(!bitmap.is_null(99));
        assert_eq!(bitmap.count_nulls(), 1);
    }

    #[test]
    fn test_spans_multiple_bytes() {
        let mut bitmap = NullBitmap::with_capacity(20);
        for i in 0..20 {
            bitmap.push(i % 3 == 0);
        }

        assert_eq!(bitmap.count_nulls(), 7);
        assert!(bitmap.is_null(18));
        assert!(!bitmap.is_null(19));
    }

    #[test]
    fn test_set_valid_and_null() {
        let mut bitmap = NullBitmap::new();
        bitmap.resize(10, true);
        bitmap.set_valid(9);
        bitmap.set_valid(0);

        assert_eq!(bitmap.count_nulls(), 8);
        assert!(!bitmap.is_null(9));

        bitmap.set_null(9);
        assert!(bitmap.is_null(9));
    }

    #[test]
    fn test_truncate_clears_stale_bits() {
        let mut bitmap = NullBitmap::new();
        bitmap.resize(6, true);
        bitmap.truncate(2);
        bitmap.push(false);

        assert_eq!(bitmap.len(), 3);
        assert!(!bitmap.is_null(2));
        assert_eq!(bitmap.count_nulls(), 2);
    }

    #[test]
    fn test_clear() {
        let mut bitmap = NullBitmap::new();
        bitmap.resize(12, true);
        bitmap.clear();

        assert!(bitmap.is_empty());
        assert_eq!(bitmap.count_nulls(), 0);
    }
}
