/// A packed bitmap.
///
/// Used as the validity mask for arrays, and as the storage for boolean values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    len: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn with_capacity(cap: usize) -> Self {
        Bitmap {
            len: 0,
            data: Vec::with_capacity(cap.div_ceil(8)),
        }
    }

    pub fn new_with_all_true(len: usize) -> Self {
        let mut data = vec![u8::MAX; len.div_ceil(8)];
        // Keep trailing bits unset so equality only depends on the logical
        // bits.
        let rem = len % 8;
        if rem != 0 {
            if let Some(last) = data.last_mut() {
                *last = (1 << rem) - 1;
            }
        }
        Bitmap { len, data }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes allocated for this bitmap.
    pub fn capacity_bytes(&self) -> usize {
        self.data.capacity()
    }

    pub fn push(&mut self, val: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        if val {
            let idx = self.len;
            self.data[idx / 8] |= 1 << (idx % 8);
        }
        self.len += 1;
    }

    /// Get the value at `idx`.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn value(&self, idx: usize) -> bool {
        let len = self.len;
        assert!(idx < len, "index {idx} out of bounds (len {len})");
        self.data[idx / 8] & (1 << (idx % 8)) != 0
    }

    pub fn count_trues(&self) -> usize {
        // Trailing bits are always unset.
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_all_true(&self) -> bool {
        self.count_trues() == self.len
    }

    pub fn iter(&self) -> BitmapIter<'_> {
        BitmapIter {
            idx: 0,
            bitmap: self,
        }
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut bitmap = Bitmap::with_capacity(iter.size_hint().0);
        for v in iter {
            bitmap.push(v);
        }
        bitmap
    }
}

#[derive(Debug)]
pub struct BitmapIter<'a> {
    idx: usize,
    bitmap: &'a Bitmap,
}

impl Iterator for BitmapIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.bitmap.len() {
            return None;
        }
        let v = self.bitmap.value(self.idx);
        self.idx += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.bitmap.len() - self.idx;
        (rem, Some(rem))
    }
}
