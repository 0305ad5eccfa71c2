/// Pixel rectangle of one chip within its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Window positions over a `width` x `height` source, column by column.
///
/// Windows start at `(0, 0)` and only full windows are produced; trailing
/// pixels that do not fit a whole window are dropped.
#[derive(Debug, Clone)]
pub struct ChipWindows {
    size: (u32, u32),
    stride: (u32, u32),
    columns: u32,
    rows: u32,
    next: u64,
}

fn steps(extent: u32, size: u32, stride: u32) -> u32 {
    if stride == 0 || size == 0 || extent < size {
        0
    } else {
        (extent - size) / stride + 1
    }
}

impl ChipWindows {
    pub fn new(width: u32, height: u32, size: (u32, u32), stride: (u32, u32)) -> Self {
        Self {
            size,
            stride,
            columns: steps(width, size.0, stride.0),
            rows: steps(height, size.1, stride.1),
            next: 0,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

impl Iterator for ChipWindows {
    type Item = ChipWindow;

    fn next(&mut self) -> Option<ChipWindow> {
        if self.next >= self.total() {
            return None;
        }
        let rows = u64::from(self.rows);
        let column = (self.next / rows) as u32;
        let row = (self.next % rows) as u32;
        self.next += 1;
        Some(ChipWindow {
            x: column * self.stride.0,
            y: row * self.stride.1,
            width: self.size.0,
            height: self.size.1,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total() - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChipWindows {}
