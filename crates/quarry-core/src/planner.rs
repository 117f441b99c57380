//! Range partitioning of a table scan into parallel splits.
//!
//! Given the `(min, max)` of the split column from the bounding query and
//! a requested split count, [`plan`] computes the contiguous sub-ranges
//! whose predicates are bound into the import query, one per worker.

use quarry_types::column::ColumnType;
use quarry_types::error::{SourceError, ValidationFailure};

/// One contiguous sub-range of the split column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRange {
    pub lower: i64,
    pub upper: i64,
    /// The last partition closes the interval so `max` itself is read.
    pub inclusive_upper: bool,
}

impl SplitRange {
    /// Render the range as a boolean predicate over the split column.
    #[must_use]
    pub fn predicate(&self, column: &str) -> String {
        let cmp = if self.inclusive_upper { "<=" } else { "<" };
        format!(
            "( {column} >= {lower} ) AND ( {column} {cmp} {upper} )",
            lower = self.lower,
            upper = self.upper
        )
    }
}

/// Outcome of split planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitPlan {
    /// One unpartitioned scan; no bounding query or split column involved.
    Single,
    /// Split count left to the execution collaborator: hand over the raw
    /// bounds and let it choose.
    Deferred { min: i64, max: i64 },
    /// Fully planned contiguous ranges, one per worker.
    Ranges(Vec<SplitRange>),
}

/// Partition `[min, max]` into `requested` roughly equal-width ranges.
///
/// `requested = Some(1)` waives partitioning entirely. `None` defers the
/// choice downstream. For `N > 1` every range uses a `>=` lower and `<`
/// upper bound except the last, which is inclusive. A degenerate
/// `min == max` range still yields N partitions; the trailing ones are
/// empty, which is expected and not an error.
///
/// # Errors
///
/// Returns [`SourceError::Configuration`] when `requested` is zero or the
/// split column is not integral.
pub fn plan(
    min: i64,
    max: i64,
    requested: Option<u32>,
    split_column: &ColumnType,
) -> Result<SplitPlan, SourceError> {
    match requested {
        Some(0) => Err(SourceError::Configuration(vec![ValidationFailure::new(
            "Invalid value for numSplits '0'. Must be at least 1.",
            None,
        )])),
        Some(1) => Ok(SplitPlan::Single),
        None => {
            require_integral(split_column)?;
            Ok(SplitPlan::Deferred { min, max })
        }
        Some(n) => {
            require_integral(split_column)?;
            Ok(SplitPlan::Ranges(ranges(min, max, n)))
        }
    }
}

fn require_integral(split_column: &ColumnType) -> Result<(), SourceError> {
    if split_column.is_integral() {
        return Ok(());
    }
    Err(SourceError::Configuration(vec![ValidationFailure::new(
        format!(
            "Split-By Field '{}' must be of an integral type to generate splits.",
            split_column.name
        ),
        Some("Use an integer column, or set numSplits to 1."),
    )]))
}

fn ranges(min: i64, max: i64, count: u32) -> Vec<SplitRange> {
    // i128 intermediates keep `span * i` from overflowing for extreme
    // bounds.
    let span = i128::from(max) - i128::from(min);
    let count_wide = i128::from(count);

    let bound = |i: u32| -> i64 {
        let offset = span * i128::from(i) / count_wide;
        // offset is within [0, span], so the sum fits back in i64.
        #[allow(clippy::cast_possible_truncation)]
        let value = (i128::from(min) + offset) as i64;
        value
    };

    (0..count)
        .map(|i| {
            let last = i == count - 1;
            SplitRange {
                lower: bound(i),
                upper: if last { max } else { bound(i + 1) },
                inclusive_upper: last,
            }
        })
        .collect()
}
