//! Truth tables in their gate-level source encoding.
//!
//! A table is a sequence of rows; each row holds one [`LogicValue`] per input
//! plus the output value. The output value of the first row decides whether
//! the table enumerates the on-set or the off-set of the function. An empty
//! table encodes constant zero (and counts as an on-set encoding).

use crate::logic::LogicValue;
use serde::{Deserialize, Serialize};

/// Structural problems with a truth table, detected by [`TruthTable::validate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TruthTableError {
    /// A row does not have `num_inputs + 1` cells.
    #[error("truth table row {row} has {found} cells, expected {expected}")]
    WrongRowWidth {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells found in the row.
        found: usize,
        /// Expected number of cells (`num_inputs + 1`).
        expected: usize,
    },
    /// Rows mix on-set and off-set output values.
    #[error("truth table mixes output values: row {row} disagrees with row 0")]
    MixedOutputValues {
        /// Zero-based index of the first row whose output disagrees.
        row: usize,
    },
    /// An input cell or output cell holds a value the encoding does not allow
    /// (`Unknown` anywhere, or `DontCare` in the output column).
    #[error("truth table row {row} holds an invalid cell value")]
    InvalidCell {
        /// Zero-based index of the offending row.
        row: usize,
    },
}

/// A truth table in source encoding: rows of input values plus an output value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTable {
    rows: Vec<Vec<LogicValue>>,
}

impl TruthTable {
    /// Creates an empty truth table (constant zero, on-set encoded).
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a truth table from rows. Each row must be `num_inputs + 1`
    /// values wide; this is checked by [`validate`](Self::validate), not here.
    pub fn from_rows(rows: Vec<Vec<LogicValue>>) -> Self {
        Self { rows }
    }

    /// Creates the single-cell table holding a latch initial value.
    pub fn latch_initial(value: LogicValue) -> Self {
        Self {
            rows: vec![vec![value]],
        }
    }

    /// Returns the rows of the table.
    pub fn rows(&self) -> &[Vec<LogicValue>] {
        &self.rows
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Checks that every row is `num_inputs + 1` cells wide, that no cell is
    /// `Unknown` and no output cell is `DontCare`, and that all rows agree on
    /// the output value. Tables with mixed output values are rejected rather
    /// than given an arbitrary meaning.
    pub fn validate(&self, num_inputs: usize) -> Result<(), TruthTableError> {
        let expected = num_inputs + 1;
        let mut first_output = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(TruthTableError::WrongRowWidth {
                    row: i,
                    found: row.len(),
                    expected,
                });
            }
            let output = row[num_inputs];
            if output == LogicValue::DontCare || row.contains(&LogicValue::Unknown) {
                return Err(TruthTableError::InvalidCell { row: i });
            }
            match first_output {
                None => first_output = Some(output),
                Some(o) if o != output => {
                    return Err(TruthTableError::MixedOutputValues { row: i })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Returns `true` if the table enumerates the on-set of its function.
    ///
    /// Decided by the output value of the first row; an empty table encodes
    /// constant zero and is treated as on-set.
    pub fn is_on_set(&self) -> bool {
        match self.rows.first() {
            Some(row) => *row.last().unwrap_or(&LogicValue::True) == LogicValue::True,
            None => true,
        }
    }

    /// Expands the table to a full LUT mask of length `2^num_inputs`.
    ///
    /// `mask[i]` is the function value for the input assignment whose bit `k`
    /// is `(i >> k) & 1` (input 0 is the least significant bit). `DontCare`
    /// input cells match both values; off-set tables are complemented.
    pub fn lut_mask(&self, num_inputs: usize) -> Vec<bool> {
        let on_set = self.is_on_set();
        // Off-set tables list where the function is 0, so the default flips.
        let mut mask = vec![!on_set; 1usize << num_inputs];
        for row in &self.rows {
            for (i, slot) in mask.iter_mut().enumerate() {
                let matches = (0..num_inputs).all(|k| match row[k] {
                    LogicValue::True => (i >> k) & 1 == 1,
                    LogicValue::False => (i >> k) & 1 == 0,
                    _ => true,
                });
                if matches {
                    *slot = on_set;
                }
            }
        }
        mask
    }

    /// Returns `true` for the single-row identity tables `1 1` and `0 0`.
    pub fn is_identity_buffer(&self) -> bool {
        if self.rows.len() != 1 {
            return false;
        }
        let row = &self.rows[0];
        row == &[LogicValue::True, LogicValue::True]
            || row == &[LogicValue::False, LogicValue::False]
    }

    /// Returns the constant value encoded by a zero-input table.
    ///
    /// An empty table is constant zero; a table whose single row is a lone
    /// output value yields that value. Returns `None` for tables that take
    /// inputs.
    pub fn constant_value(&self) -> Option<LogicValue> {
        if self.rows.is_empty() {
            return Some(LogicValue::False);
        }
        if self.rows.len() == 1 && self.rows[0].len() == 1 {
            return Some(self.rows[0][0]);
        }
        None
    }

    /// Returns the latch initial value held by a 1×1 table.
    pub fn latch_init(&self) -> Option<LogicValue> {
        if self.rows.len() == 1 && self.rows[0].len() == 1 {
            Some(self.rows[0][0])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::LogicValue::{DontCare, False, True, Unknown};

    #[test]
    fn empty_is_constant_zero() {
        let t = TruthTable::new();
        assert!(t.is_empty());
        assert!(t.is_on_set());
        assert_eq!(t.constant_value(), Some(False));
        assert_eq!(t.lut_mask(0), vec![false]);
    }

    #[test]
    fn constant_one() {
        let t = TruthTable::from_rows(vec![vec![True]]);
        assert_eq!(t.constant_value(), Some(True));
        assert_eq!(t.lut_mask(0), vec![true]);
    }

    #[test]
    fn identity_buffer_on_set() {
        let t = TruthTable::from_rows(vec![vec![True, True]]);
        assert!(t.is_identity_buffer());
        assert!(t.is_on_set());
        assert_eq!(t.lut_mask(1), vec![false, true]);
    }

    #[test]
    fn identity_buffer_off_set() {
        let t = TruthTable::from_rows(vec![vec![False, False]]);
        assert!(t.is_identity_buffer());
        assert!(!t.is_on_set());
        // Off-set: f = 0 exactly when the input is 0.
        assert_eq!(t.lut_mask(1), vec![false, true]);
    }

    #[test]
    fn inverter_is_not_buffer() {
        let t = TruthTable::from_rows(vec![vec![False, True]]);
        assert!(!t.is_identity_buffer());
        assert_eq!(t.lut_mask(1), vec![true, false]);
    }

    #[test]
    fn two_input_and() {
        let t = TruthTable::from_rows(vec![vec![True, True, True]]);
        assert_eq!(t.lut_mask(2), vec![false, false, false, true]);
    }

    #[test]
    fn dont_care_expands() {
        // f = in1 (in0 is don't care).
        let t = TruthTable::from_rows(vec![vec![DontCare, True, True]]);
        assert_eq!(t.lut_mask(2), vec![false, false, true, true]);
    }

    #[test]
    fn off_set_two_input() {
        // Off-set rows list where f = 0: here only at 00, so f = OR.
        let t = TruthTable::from_rows(vec![vec![False, False, False]]);
        assert_eq!(t.lut_mask(2), vec![false, true, true, true]);
    }

    #[test]
    fn validate_accepts_well_formed() {
        let t = TruthTable::from_rows(vec![
            vec![True, DontCare, True],
            vec![DontCare, True, True],
        ]);
        assert!(t.validate(2).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_width() {
        let t = TruthTable::from_rows(vec![vec![True, True]]);
        assert_eq!(
            t.validate(2),
            Err(TruthTableError::WrongRowWidth {
                row: 0,
                found: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn validate_rejects_mixed_outputs() {
        let t = TruthTable::from_rows(vec![vec![True, True], vec![False, False]]);
        assert_eq!(
            t.validate(1),
            Err(TruthTableError::MixedOutputValues { row: 1 })
        );
    }

    #[test]
    fn validate_rejects_unknown_cells() {
        let t = TruthTable::from_rows(vec![vec![Unknown, True]]);
        assert_eq!(t.validate(1), Err(TruthTableError::InvalidCell { row: 0 }));
    }

    #[test]
    fn validate_rejects_dont_care_output() {
        let t = TruthTable::from_rows(vec![vec![True, DontCare]]);
        assert_eq!(t.validate(1), Err(TruthTableError::InvalidCell { row: 0 }));
    }

    #[test]
    fn latch_initial_roundtrip() {
        let t = TruthTable::latch_initial(DontCare);
        assert_eq!(t.latch_init(), Some(DontCare));
        assert_eq!(t.latch_init().unwrap().latch_init_code(), 2);
    }

    #[test]
    fn latch_init_rejects_wide_tables() {
        let t = TruthTable::from_rows(vec![vec![True, True]]);
        assert_eq!(t.latch_init(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let t = TruthTable::from_rows(vec![vec![True, DontCare, True]]);
        let json = serde_json::to_string(&t).unwrap();
        let back: TruthTable = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
