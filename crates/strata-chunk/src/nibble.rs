use strata_world::COLUMN_VOLUME;

/// Four bits per block, two blocks per byte, low nibble first.
#[derive(Clone, PartialEq, Eq)]
pub struct NibbleArray {
    data: Box<[u8]>,
}

impl NibbleArray {
    pub fn new() -> Self {
        Self {
            data: vec![0; COLUMN_VOLUME / 2].into_boxed_slice(),
        }
    }

    /// Wraps packed bytes; `None` when the length is not half a column.
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        (data.len() == COLUMN_VOLUME / 2).then(|| Self {
            data: data.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        let b = self.data[idx >> 1];
        if idx & 1 == 0 { b & 0x0F } else { b >> 4 }
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: u8) {
        let v = value & 0x0F;
        let b = &mut self.data[idx >> 1];
        *b = if idx & 1 == 0 {
            (*b & 0xF0) | v
        } else {
            (*b & 0x0F) | (v << 4)
        };
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for NibbleArray {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NibbleArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NibbleArray")
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_do_not_clobber() {
        let mut n = NibbleArray::new();
        n.set(10, 0xA);
        n.set(11, 0x5);
        n.set(12, 0x1F);
        assert_eq!(n.get(10), 0xA);
        assert_eq!(n.get(11), 0x5);
        assert_eq!(n.get(12), 0xF);
        assert_eq!(n.as_bytes()[5], 0x5A);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(NibbleArray::from_bytes(vec![0; 3]).is_none());
        assert!(NibbleArray::from_bytes(vec![0; COLUMN_VOLUME / 2]).is_some());
    }
}
