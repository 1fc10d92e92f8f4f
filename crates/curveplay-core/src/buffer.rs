//! Fixed-capacity double-ended buffer of curve control points.
//!
//! Pushing at either end of a full buffer evicts the point at the opposite
//! end, so the buffer behaves as a window sliding over an endless curve.

use crate::vector::Point2D;

/// Which end of the buffer a new point enters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEnd {
    Head,
    Tail,
}

#[derive(Debug, Clone)]
pub struct CurveBuffer {
    slots: Vec<Point2D>,
    head: usize,
    len: usize,
}

impl CurveBuffer {
    /// A buffer holding at most `capacity` points (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Point2D::ZERO; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % self.capacity()
    }

    pub fn get(&self, index: usize) -> Option<Point2D> {
        (index < self.len).then(|| self.slots[self.physical(index)])
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Point2D> {
        if index < self.len {
            let slot = self.physical(index);
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    /// Append at the tail, evicting the head when full. Returns the evicted point.
    pub fn push_back(&mut self, point: Point2D) -> Option<Point2D> {
        let capacity = self.capacity();
        if self.len == capacity {
            let evicted = self.slots[self.head];
            self.slots[self.head] = point;
            self.head = (self.head + 1) % capacity;
            Some(evicted)
        } else {
            let slot = self.physical(self.len);
            self.slots[slot] = point;
            self.len += 1;
            None
        }
    }

    /// Prepend at the head, evicting the tail when full. Returns the evicted point.
    pub fn push_front(&mut self, point: Point2D) -> Option<Point2D> {
        let capacity = self.capacity();
        self.head = (self.head + capacity - 1) % capacity;
        let evicted = if self.len == capacity {
            Some(self.slots[self.head])
        } else {
            self.len += 1;
            None
        };
        self.slots[self.head] = point;
        evicted
    }

    pub fn push(&mut self, end: BufferEnd, point: Point2D) -> Option<Point2D> {
        match end {
            BufferEnd::Head => self.push_front(point),
            BufferEnd::Tail => self.push_back(point),
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        (0..self.len).map(move |i| self.slots[self.physical(i)])
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Point2D> + '_ {
        let capacity = self.capacity();
        let (head, len) = (self.head, self.len);
        let (wrapped, front) = self.slots.split_at_mut(head);
        let front_len = len.min(capacity - head);
        front[..front_len]
            .iter_mut()
            .chain(wrapped[..len - front_len].iter_mut())
    }

    pub fn to_vec(&self) -> Vec<Point2D> {
        self.iter().collect()
    }

    /// Lay points out left to right: slot `i` gets `x = x_start + i * spacing`
    pub fn layout_x(&mut self, x_start: f64, spacing: f64) {
        for (i, point) in self.iter_mut().enumerate() {
            point.x = x_start + i as f64 * spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ys(buffer: &CurveBuffer) -> Vec<f64> {
        buffer.iter().map(|p| p.y).collect()
    }

    fn p(y: f64) -> Point2D {
        Point2D::new(0.0, y)
    }

    #[test]
    fn test_push_back_evicts_head() {
        let mut buffer = CurveBuffer::with_capacity(3);
        for y in [1.0, 2.0, 3.0] {
            assert_eq!(buffer.push_back(p(y)), None);
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.push_back(p(4.0)), Some(p(1.0)));
        assert_eq!(ys(&buffer), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_push_front_evicts_tail() {
        let mut buffer = CurveBuffer::with_capacity(3);
        for y in [1.0, 2.0, 3.0] {
            buffer.push_back(p(y));
        }
        assert_eq!(buffer.push_front(p(0.0)), Some(p(3.0)));
        assert_eq!(ys(&buffer), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_alternating_ends_keep_order() {
        let mut buffer = CurveBuffer::with_capacity(4);
        for y in [1.0, 2.0, 3.0, 4.0] {
            buffer.push_back(p(y));
        }
        buffer.push_back(p(5.0));
        buffer.push_back(p(6.0));
        buffer.push_front(p(2.5));
        assert_eq!(ys(&buffer), vec![2.5, 3.0, 4.0, 5.0]);
        buffer.push_back(p(7.0));
        assert_eq!(ys(&buffer), vec![3.0, 4.0, 5.0, 7.0]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_push_front_into_partial_buffer() {
        let mut buffer = CurveBuffer::with_capacity(4);
        buffer.push_back(p(1.0));
        buffer.push_front(p(0.0));
        assert_eq!(ys(&buffer), vec![0.0, 1.0]);
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn test_layout_and_iter_mut_after_wrap() {
        let mut buffer = CurveBuffer::with_capacity(3);
        for y in [1.0, 2.0, 3.0, 4.0, 5.0] {
            buffer.push_back(p(y));
        }
        buffer.layout_x(10.0, 5.0);
        let xs: Vec<f64> = buffer.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10.0, 15.0, 20.0]);
        assert_eq!(ys(&buffer), vec![3.0, 4.0, 5.0]);

        buffer.get_mut(1).unwrap().y = 9.0;
        assert_eq!(ys(&buffer), vec![3.0, 9.0, 5.0]);
    }
}
