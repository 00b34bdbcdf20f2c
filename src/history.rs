// history.rs

use std::io::Write;

use crate::util::{format_decimal, DECIMAL_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    ordinal: u64,
    text: String,
}

impl HistoryEntry {
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The most recent commands, each tagged with an ordinal that counts every
/// insertion since startup.
///
/// Ordinal `n` always lives in slot `(n - 1) % capacity`, so eviction is just
/// overwriting that slot. The retained ordinals are exactly
/// `(total - min(total, capacity), total]`.
pub struct HistoryLog {
    slots: Vec<Option<HistoryEntry>>,
    total: u64,
    max_text: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize, max_line: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            total: 0,
            max_text: max_line.saturating_sub(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.total.min(self.slots.len() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Entries ever recorded, evicted ones included.
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    fn oldest_ordinal(&self) -> u64 {
        self.total - self.len() as u64 + 1
    }

    fn slot_of(&self, ordinal: u64) -> usize {
        ((ordinal - 1) % self.slots.len() as u64) as usize
    }

    /// Appends `text` under the next ordinal, evicting the oldest entry when
    /// full. Empty text is ignored and yields `None`.
    pub fn record(&mut self, text: &str) -> Option<u64> {
        if text.is_empty() {
            return None;
        }
        let mut end = text.len().min(self.max_text);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let text = &text[..end];

        let ordinal = self.total + 1;
        let slot = self.slot_of(ordinal);
        match &mut self.slots[slot] {
            Some(entry) => {
                tracing::debug!(evicted = entry.ordinal, ordinal, "history full, overwriting oldest entry");
                entry.ordinal = ordinal;
                entry.text.clear();
                entry.text.push_str(text);
            }
            empty => {
                *empty = Some(HistoryEntry {
                    ordinal,
                    text: text.to_owned(),
                });
            }
        }
        self.total = ordinal;
        Some(ordinal)
    }

    /// The entry with `ordinal`, or `None` when it was never recorded or is
    /// too old to be retained.
    pub fn lookup(&self, ordinal: u64) -> Option<&HistoryEntry> {
        if self.is_empty() || ordinal < self.oldest_ordinal() || ordinal > self.total {
            return None;
        }
        self.slots[self.slot_of(ordinal)].as_ref()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.lookup(self.total)
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        (self.oldest_ordinal()..=self.total).filter_map(move |n| self.lookup(n))
    }

    /// Writes every retained entry as `<ordinal>\t<text>\n`, oldest first.
    ///
    /// Only plain `write_all` calls on borrowed bytes; the ordinal is rendered
    /// into a stack buffer. Safe to run from the interrupt path.
    pub fn dump<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        let mut digits = [0u8; DECIMAL_WIDTH];
        for entry in self.iter() {
            out.write_all(format_decimal(entry.ordinal, &mut digits))?;
            out.write_all(b"\t")?;
            out.write_all(entry.text.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}
