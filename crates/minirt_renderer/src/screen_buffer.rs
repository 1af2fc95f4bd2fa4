/// Per-pixel storage, row-major with `y = 0` the top row.
#[derive(Clone, Debug)]
pub struct ScreenBuffer<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> ScreenBuffer<T> {
    /// Create a buffer filled with `value`.
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the value at (x, y), `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        self.offset(x, y).map(|i| self.data[i])
    }

    /// Set the value at (x, y). Returns false outside the buffer.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Overwrite every cell with `value`.
    pub fn clear(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut buffer = ScreenBuffer::new(4, 3, 0u32);
        assert!(buffer.set(3, 2, 7));
        assert_eq!(buffer.get(3, 2), Some(7));
        assert_eq!(buffer.get(0, 0), Some(0));
        // Row-major: (3, 2) is the last cell
        assert_eq!(buffer.as_slice()[11], 7);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buffer = ScreenBuffer::new(4, 3, 1.0f32);
        assert_eq!(buffer.get(4, 0), None);
        assert_eq!(buffer.get(0, 3), None);
        assert!(!buffer.set(4, 0, 2.0));
        assert!(buffer.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_clear() {
        let mut buffer = ScreenBuffer::new(2, 2, 0.0f32);
        buffer.set(1, 1, 3.0);
        buffer.clear(f32::MAX);
        assert!(buffer.as_slice().iter().all(|&v| v == f32::MAX));
        assert_eq!((buffer.width(), buffer.height()), (2, 2));
    }
}
