//! Symbol frequency tables for codec training.
//!
//! A [`Symbols`] table accumulates `(symbol, frequency)` entries in the
//! order symbols are first seen. That order is significant: it breaks
//! frequency ties during tree construction, so two tables built from the
//! same input sequence always train to bit-identical codebooks.
//!
//! Tables may reserve one [`Coded::Escape`] entry. The escape receives a
//! real codeword like any other symbol and marks out-of-vocabulary values,
//! which travel as a raw fixed-width literal right after it.

use std::collections::HashMap;
use std::hash::Hash;

/// A slot in a trained alphabet: either a real symbol or the reserved
/// escape marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coded<S> {
    /// A symbol observed in (or added to) the training table
    Known(S),
    /// The reserved slot for out-of-vocabulary symbols
    Escape,
}

impl<S> Coded<S> {
    /// Check whether this slot is the escape marker.
    pub fn is_escape(&self) -> bool {
        matches!(self, Coded::Escape)
    }

    /// Return the underlying symbol, if this slot holds one.
    pub fn known(&self) -> Option<&S> {
        match self {
            Coded::Known(symbol) => Some(symbol),
            Coded::Escape => None,
        }
    }
}

/// Fixed-width raw representation of a symbol, used for escape literals.
///
/// An escaped symbol is written as the escape codeword followed by its raw
/// value in exactly `BIT_WIDTH` bits, so encoder and decoder agree on the
/// literal width without per-stream negotiation.
pub trait Literal: Sized {
    /// Width of the raw literal in bits
    const BIT_WIDTH: usize;

    /// Return the raw value written after an escape codeword.
    fn to_raw(&self) -> u64;

    /// Rebuild a symbol from a raw literal.
    ///
    /// Returns `None` if the raw value does not map to a valid symbol,
    /// e.g. a surrogate code point for `char`.
    fn from_raw(raw: u64) -> Option<Self>;
}

impl Literal for u8 {
    const BIT_WIDTH: usize = 8;

    fn to_raw(&self) -> u64 {
        u64::from(*self)
    }

    fn from_raw(raw: u64) -> Option<Self> {
        u8::try_from(raw).ok()
    }
}

impl Literal for u16 {
    const BIT_WIDTH: usize = 16;

    fn to_raw(&self) -> u64 {
        u64::from(*self)
    }

    fn from_raw(raw: u64) -> Option<Self> {
        u16::try_from(raw).ok()
    }
}

impl Literal for u32 {
    const BIT_WIDTH: usize = 32;

    fn to_raw(&self) -> u64 {
        u64::from(*self)
    }

    fn from_raw(raw: u64) -> Option<Self> {
        u32::try_from(raw).ok()
    }
}

impl Literal for u64 {
    const BIT_WIDTH: usize = 64;

    fn to_raw(&self) -> u64 {
        *self
    }

    fn from_raw(raw: u64) -> Option<Self> {
        Some(raw)
    }
}

impl Literal for char {
    const BIT_WIDTH: usize = 32;

    fn to_raw(&self) -> u64 {
        u64::from(u32::from(*self))
    }

    fn from_raw(raw: u64) -> Option<Self> {
        u32::try_from(raw).ok().and_then(char::from_u32)
    }
}

/// An insertion-ordered symbol frequency table.
///
/// # Invariants
/// - `entries` holds each symbol exactly once, in first-seen order
/// - `index` maps every symbol to its position in `entries`
#[derive(Debug, Clone)]
pub struct Symbols<S> {
    /// (symbol, frequency) pairs in first-seen order
    entries: Vec<(Coded<S>, u64)>,
    /// Position of each symbol in entries
    index: HashMap<Coded<S>, usize>,
}

impl<S: Eq + Hash + Clone> Symbols<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Count one occurrence of `symbol`.
    pub fn tally(&mut self, symbol: S) {
        self.add(Coded::Known(symbol), 1);
    }

    /// Add `count` occurrences of `symbol`, merging with any existing entry.
    pub fn add(&mut self, symbol: Coded<S>, count: u64) {
        if let Some(&position) = self.index.get(&symbol) {
            let frequency = &mut self.entries[position].1;
            *frequency = frequency.saturating_add(count);
        } else {
            self.index.insert(symbol.clone(), self.entries.len());
            self.entries.push((symbol, count));
        }
    }

    /// Reserve an escape entry with a synthetic frequency of 1.
    ///
    /// Does nothing if an escape entry already exists, so an explicit
    /// escape frequency (e.g. from a persisted table) is never clobbered.
    pub fn reserve_escape(&mut self) {
        if !self.has_escape() {
            self.add(Coded::Escape, 1);
        }
    }

    /// Check whether the table contains an escape entry.
    pub fn has_escape(&self) -> bool {
        self.index.contains_key(&Coded::Escape)
    }

    /// Return the frequency recorded for `symbol`, or 0 if absent.
    pub fn frequency(&self, symbol: &Coded<S>) -> u64 {
        self.index
            .get(symbol)
            .map_or(0, |&position| self.entries[position].1)
    }

    /// Return the number of entries, escape included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &(Coded<S>, u64)> {
        self.entries.iter()
    }

    /// Remove every known symbol seen fewer than `min_occurrences` times.
    ///
    /// The escape entry is kept regardless of its frequency; dropped
    /// symbols become escapable instead of coded.
    pub fn retain_min_count(&mut self, min_occurrences: u64) {
        self.entries
            .retain(|(symbol, count)| symbol.is_escape() || *count >= min_occurrences);
        self.reindex();
    }

    /// Remove the least frequent known symbol and fold its frequency into
    /// the escape entry.
    ///
    /// Frequency ties go to the earliest-seen symbol. The escape entry is
    /// never removed. Returns the dropped symbol, or `None` if the table
    /// holds no known symbols.
    pub fn drop_least_frequent(&mut self) -> Option<Coded<S>> {
        let mut least: Option<usize> = None;
        for (position, (symbol, count)) in self.entries.iter().enumerate() {
            if symbol.is_escape() {
                continue;
            }
            match least {
                Some(best) if self.entries[best].1 <= *count => {}
                _ => least = Some(position),
            }
        }

        let (dropped, count) = self.entries.remove(least?);
        self.reindex();

        if let Some(&escape_at) = self.index.get(&Coded::Escape) {
            let frequency = &mut self.entries[escape_at].1;
            *frequency = frequency.saturating_add(count);
        }

        Some(dropped)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, (symbol, _)) in self.entries.iter().enumerate() {
            self.index.insert(symbol.clone(), position);
        }
    }
}

impl<S: Eq + Hash + Clone> Default for Symbols<S> {
    fn default() -> Self {
        Self::new()
    }
}
