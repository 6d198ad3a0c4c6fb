//! Named bit fields over packed integers, declared as textual diagrams.
//!
//! A diagram is a string that depicts the layout of a packed value, one
//! character per bit, read most-significant-bit first. Each distinct letter
//! names a field spanning its contiguous run; `'?'` marks a bit that belongs
//! to no field. Whitespace is ignored, so diagrams can be grouped for
//! readability.
//!
//! # Example
//! ```
//! use bitpress_core::diagram::BitDiagram;
//!
//! let color = BitDiagram::parse("AAAAAAAA RRRRRRRR GGGGGGGG BBBBBBBB").unwrap();
//! let red = color.field('R').unwrap();
//!
//! let argb = 0xFFFF80FFu64;
//! assert_eq!(red.extract_int(argb), 0xFF);
//! assert_eq!(red.set(argb, 0x80), 0xFF8080FF);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::{DiagramError, Error, Result};

/// A named, fixed-width slice of a packed integer.
///
/// Obtained from [`BitDiagram::field`]. Immutable; the same field can
/// extract from and set into any number of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// The letter naming this field in the diagram
    letter: char,
    /// Bit offset of the field's first (leftmost) bit, counted from the
    /// most significant end of the diagram
    offset: u32,
    /// Field width in bits
    width: u32,
    /// Right-shift distance from the least significant end
    shift: u32,
    /// Mask covering the field's bits within the packed value
    mask: u64,
}

impl BitField {
    /// Return the letter naming this field.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Return the offset of the field's leftmost bit from the most
    /// significant end of the diagram.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Return the field width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Return the mask covering this field's bits.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Extract this field from `value` as an unsigned integer.
    pub fn extract_int(&self, value: u64) -> u64 {
        (value & self.mask) >> self.shift
    }

    /// Extract this field from `value` as a boolean.
    ///
    /// # Errors
    /// Returns `DiagramError::WrongWidth` if the field is not exactly
    /// 1 bit wide.
    pub fn extract_bool(&self, value: u64) -> Result<bool> {
        if self.width != 1 {
            return Err(DiagramError::WrongWidth {
                letter: self.letter,
                width: self.width,
            }
            .into());
        }
        Ok(self.extract_int(value) == 1)
    }

    /// Return `value` with this field replaced by `field_value`.
    ///
    /// All other bits of `value` are untouched. A `field_value` wider than
    /// the field is masked to the field width, not rejected.
    pub fn set(&self, value: u64, field_value: u64) -> u64 {
        (value & !self.mask) | ((field_value << self.shift) & self.mask)
    }
}

/// A parsed bit layout mapping letters to [`BitField`]s.
///
/// Read-only after parsing; not tied to any particular value. One diagram
/// is reused to extract and set fields on many packed integers.
///
/// # Invariants
/// - `total_width` equals the stripped pattern length, at most 64
/// - every distinct letter maps to exactly one contiguous field
#[derive(Debug, Clone)]
pub struct BitDiagram {
    /// The pattern with whitespace removed
    pattern: String,
    /// Total layout width in bits
    total_width: u32,
    /// Fields keyed by their diagram letter
    fields: HashMap<char, BitField>,
}

impl BitDiagram {
    /// Parse a diagram pattern into its fields.
    ///
    /// Whitespace is stripped before parsing. The remaining characters each
    /// occupy one bit, leftmost character first (most significant). `'?'`
    /// marks a bit with no field.
    ///
    /// # Errors
    /// Returns `DiagramError::InvalidPattern` if the pattern is empty,
    /// wider than 64 bits, contains `'0'` or `'1'`, or has a letter whose
    /// occurrences do not form one contiguous run (e.g. "ABAB").
    pub fn parse(pattern: &str) -> Result<Self> {
        let stripped: String = pattern.chars().filter(|c| !c.is_whitespace()).collect();

        let total_width = stripped.chars().count();
        if total_width == 0 {
            return Err(invalid(pattern, "pattern is empty"));
        }
        if total_width > 64 {
            return Err(invalid(pattern, "pattern exceeds 64 bits"));
        }
        let total_width = total_width as u32;

        // Track (first index, last index, occurrences) per letter. A '?'
        // occupies a bit position but never forms a field, so it splits
        // any letter run it interrupts.
        let mut runs: HashMap<char, (u32, u32, u32)> = HashMap::new();
        for (index, letter) in stripped.chars().enumerate() {
            let index = index as u32;
            match letter {
                '?' => continue,
                '0' | '1' => {
                    return Err(invalid(pattern, "'0' and '1' are reserved for literal bits"));
                }
                _ => {
                    runs.entry(letter)
                        .and_modify(|(_, last, count)| {
                            *last = index;
                            *count += 1;
                        })
                        .or_insert((index, index, 1));
                }
            }
        }

        let mut fields = HashMap::with_capacity(runs.len());
        for (letter, (first, last, count)) in runs {
            if last - first + 1 != count {
                return Err(invalid(pattern, "field letters must form contiguous runs"));
            }
            let width = count;
            let offset = first;
            let shift = total_width - offset - width;
            let mask = low_bits(width) << shift;
            fields.insert(
                letter,
                BitField {
                    letter,
                    offset,
                    width,
                    shift,
                    mask,
                },
            );
        }

        Ok(Self {
            pattern: stripped,
            total_width,
            fields,
        })
    }

    /// Look up the field named by `letter`.
    ///
    /// # Errors
    /// Returns `DiagramError::UnknownField` if no field uses that letter.
    pub fn field(&self, letter: char) -> Result<&BitField> {
        self.fields.get(&letter).ok_or_else(|| {
            DiagramError::UnknownField {
                letter,
                pattern: self.pattern.clone(),
            }
            .into()
        })
    }

    /// Return the stripped pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Return the total layout width in bits.
    pub fn total_width(&self) -> u32 {
        self.total_width
    }

    /// Return the number of named fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for BitDiagram {
    /// Formats the pattern regrouped into bytes, e.g. "AAAAAAAA RRRRRRRR".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, letter) in self.pattern.chars().enumerate() {
            if index > 0 && index % 8 == 0 {
                write!(f, " ")?;
            }
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// A mask of the low `width` bits.
fn low_bits(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn invalid(pattern: &str, reason: &'static str) -> Error {
    DiagramError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    }
    .into()
}
