use serde::{Deserialize, Serialize};

/// Validity bitmap for a column: bit `i` set means row `i` is NULL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NullBitmap {
    data: Vec<u64>,
    len: usize,
}

impl NullBitmap {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.div_ceil(64)),
            len: 0,
        }
    }

    pub fn new_valid(len: usize) -> Self {
        Self {
            data: vec![0; len.div_ceil(64)],
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        if index >= self.len {
            return true;
        }
        (self.data[index / 64] >> (index % 64)) & 1 == 1
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        !self.is_null(index)
    }

    pub fn push(&mut self, is_null: bool) {
        let word = self.len / 64;
        if word >= self.data.len() {
            self.data.push(0);
        }
        if is_null {
            self.data[word] |= 1 << (self.len % 64);
        }
        self.len += 1;
    }

    pub fn extend(&mut self, other: &NullBitmap) {
        for i in 0..other.len {
            self.push(other.is_null(i));
        }
    }

    pub fn count_null(&self) -> usize {
        let full_words = self.len / 64;
        let remaining_bits = self.len % 64;
        let mut count: usize = self.data[..full_words]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        if remaining_bits > 0 {
            let mask = (1u64 << remaining_bits) - 1;
            count += (self.data[full_words] & mask).count_ones() as usize;
        }
        count
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.len = 0;
    }
}
