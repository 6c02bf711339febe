use std::num::NonZeroUsize;
use std::ops::Range;

/// A contiguous run of records that fills one data page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

impl Page {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_last(&self) -> bool {
        self.number == self.total
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range()]
    }
}

pub fn page_count(len: usize, capacity: NonZeroUsize) -> usize {
    len.div_ceil(capacity.get())
}

/// Split `len` records into pages of `capacity`; only the last page may be short.
/// No records means no pages.
pub fn paginate(len: usize, capacity: NonZeroUsize) -> Vec<Page> {
    let total = page_count(len, capacity);
    (0..total)
        .map(|i| {
            let start = i * capacity.get();
            Page {
                number: i + 1,
                total,
                start,
                end: (start + capacity.get()).min(len),
            }
        })
        .collect()
}
