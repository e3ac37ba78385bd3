//! # Buffer
//!
//! An ordered sequence of optional `Row` slots (spec.md §3, §4.2),
//! grounded on the original implementation's `struct buf` /
//! `buf_resize` / `buf_shift_down` / `buf_shift_up` / `buf_char_insert` /
//! `buf_char_remove`. A slot beyond the logical line count may still be
//! physically present but always empty (`None`); this lets a freshly
//! split or whitespace-only line carry no row allocation, and lets
//! `shift_up`/`shift_down` move line ownership by swapping `Option`s
//! rather than copying row contents.

use crate::config::round_up_to;
use crate::row::Row;

#[derive(Debug)]
pub struct Buffer {
    slots: Vec<Option<Row>>,
    len: usize,
}

impl Buffer {
    /// Create a fresh buffer with `cap` slots, all empty, `len == 1` (the
    /// cursor always has a line to sit on).
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        let mut slots = Vec::with_capacity(cap);
        slots.resize_with(cap, || None);
        Self { slots, len: 1 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cap(&self) -> usize {
        self.slots.len()
    }

    pub fn row(&self, line: usize) -> Option<&Row> {
        self.slots.get(line).and_then(|s| s.as_ref())
    }

    pub fn row_mut(&mut self, line: usize) -> Option<&mut Row> {
        self.slots.get_mut(line).and_then(|s| s.as_mut())
    }

    /// 0 if the slot is empty, else the row's byte length.
    pub fn row_len(&self, line: usize) -> usize {
        self.row(line).map_or(0, Row::len)
    }

    /// 0 if the slot is empty, else the row's visual length.
    pub fn visual_row_len(&self, line: usize, tab_width: usize) -> usize {
        self.row(line).map_or(0, |r| r.visual_len(tab_width))
    }

    /// Resize the slot array to exactly `new_cap` slots. Shrinking first
    /// drops every row at indices `[new_cap, cap)` and clamps `len` to
    /// the index past the last remaining non-empty slot (spec.md §9 open
    /// question (a): NOT `new_cap - 1`, which would be an off-by-one).
    pub fn resize(&mut self, new_cap: usize) {
        let new_cap = new_cap.max(1);
        if new_cap == self.slots.len() {
            return;
        }
        if new_cap < self.slots.len() {
            self.slots.truncate(new_cap);
            if self.len > new_cap {
                self.len = new_cap;
            }
            while self.len > 0 && self.slots[self.len - 1].is_none() {
                self.len -= 1;
            }
        } else {
            self.slots.resize_with(new_cap, || None);
        }
    }

    /// Insert `c` into line `line` at byte offset `index`, allocating the
    /// line (and growing the slot array) if necessary.
    pub fn char_insert(
        &mut self,
        line: usize,
        c: u8,
        index: usize,
        buf_grow: usize,
        initial_row_size: usize,
        row_grow: usize,
    ) {
        if line >= self.slots.len() {
            let mut new_cap = line;
            if new_cap % buf_grow == 0 {
                new_cap += 1;
            }
            self.resize(round_up_to(new_cap, buf_grow));
        }
        if line >= self.len {
            self.len = line + 1;
        }
        match &mut self.slots[line] {
            Some(row) => row.insert_char(c, index, row_grow),
            slot @ None => {
                let mut row = Row::with_capacity(initial_row_size);
                row.insert_char(c, 0, row_grow);
                *slot = Some(row);
            }
        }
    }

    /// Remove the byte at `index` from line `line`. A no-op if the line
    /// is out of range or empty.
    pub fn char_remove(&mut self, line: usize, index: usize) {
        if let Some(Some(row)) = self.slots.get_mut(line) {
            row.remove_char(index);
        }
    }

    /// Set the slot at `line` directly, growing the slot array if
    /// necessary to make room for it.
    pub fn set_row(&mut self, line: usize, row: Option<Row>, buf_grow: usize) {
        if line >= self.slots.len() {
            let mut new_cap = line;
            if new_cap % buf_grow == 0 {
                new_cap += 1;
            }
            self.resize(round_up_to(new_cap, buf_grow));
        }
        if line >= self.len {
            self.len = line + 1;
        }
        self.slots[line] = row;
    }

    /// Shift every slot starting at `from` (inclusive) down by one,
    /// growing the slot array by `grow` slots first if there isn't room.
    /// The newly freed slot at `from` is left as whatever it was before
    /// (callers immediately overwrite it with `set_row`).
    pub fn shift_down(&mut self, from: usize, grow: usize) {
        if self.len + 1 > self.slots.len() {
            self.resize(self.slots.len() + grow);
        }
        self.slots.insert(from, None);
        self.slots.truncate(self.slots.len() - 1); // preserve slot count
        self.len += 1;
    }

    /// Shift every slot starting at `from` (inclusive) up by one; the
    /// slot at `from - 1` is overwritten and the last logical slot becomes
    /// empty. `from == 0` behaves as `from == 1`.
    pub fn shift_up(&mut self, from: usize) {
        let from = from.max(1);
        if from > self.len {
            return;
        }
        self.slots.remove(from - 1);
        self.slots.push(None);
        self.len = self.len.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_has_len_one() {
        let buf = Buffer::with_capacity(32);
        assert_eq!(buf.len(), 1);
        assert!(buf.row(0).is_none());
    }

    #[test]
    fn char_insert_creates_row_and_grows_len() {
        let mut buf = Buffer::with_capacity(4);
        buf.char_insert(2, b'x', 0, 16, 128, 64);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.row(2).unwrap().bytes(), b"x");
        assert!(buf.row(0).is_none());
        assert!(buf.row(1).is_none());
    }

    #[test]
    fn char_insert_grows_slots_past_capacity() {
        let mut buf = Buffer::with_capacity(4);
        buf.char_insert(10, b'x', 0, 16, 128, 64);
        assert!(buf.cap() >= 11);
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn shift_down_then_shift_up_restores_len_and_other_slots() {
        let mut buf = Buffer::with_capacity(8);
        buf.char_insert(0, b'a', 0, 16, 128, 64);
        buf.char_insert(1, b'b', 0, 16, 128, 64);
        let len_before = buf.len();
        buf.shift_down(1, 16);
        buf.set_row(1, Some(Row::from_bytes(b"new".to_vec())), 16);
        buf.shift_up(2);
        assert_eq!(buf.len(), len_before);
        assert_eq!(buf.row(0).unwrap().bytes(), b"a");
        assert_eq!(buf.row(1).unwrap().bytes(), b"b");
    }

    #[test]
    fn shift_up_from_zero_behaves_like_from_one() {
        let mut buf = Buffer::with_capacity(4);
        buf.char_insert(0, b'a', 0, 16, 128, 64);
        buf.char_insert(1, b'b', 0, 16, 128, 64);
        let mut buf2 = Buffer::with_capacity(4);
        buf2.char_insert(0, b'a', 0, 16, 128, 64);
        buf2.char_insert(1, b'b', 0, 16, 128, 64);

        buf.shift_up(0);
        buf2.shift_up(1);
        assert_eq!(buf.len(), buf2.len());
        assert_eq!(buf.row(0).map(Row::bytes), buf2.row(0).map(Row::bytes));
    }

    #[test]
    fn resize_shrink_clamps_len_to_last_nonempty_slot_plus_one() {
        let mut buf = Buffer::with_capacity(8);
        buf.char_insert(0, b'a', 0, 16, 128, 64);
        buf.char_insert(2, b'c', 0, 16, 128, 64);
        // len is 3 (rows 0, 1 empty, 2 present); shrink cap to 2, dropping
        // row 2, so the last non-empty slot is row 0 => len should become 1.
        buf.resize(2);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.row(0).unwrap().bytes(), b"a");
    }

    #[test]
    fn char_remove_on_missing_row_is_noop() {
        let mut buf = Buffer::with_capacity(4);
        buf.char_remove(0, 0);
        assert_eq!(buf.len(), 1);
    }
}
