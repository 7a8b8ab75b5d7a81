//! Statistics record and its line format
//!
//! One line per emission: 14 plain decimal integers separated by commas and
//! terminated by `\n`. Field order is fixed and consumers parse it
//! positionally, so it must not change.
//!
//! ```text
//! timestamp,available,smallest,largest,alloc_count,alloc_time,free_count,
//! free_time,active_tasks,fragmentation,alloc_ok,free_ok,min_ever_free,free_blocks
//! ```

use core::fmt;
use core::str::FromStr;

use super::counters::AllocatorCounters;
use super::snapshot::HeapSnapshot;

/// Number of fields in one record line
pub const FIELD_COUNT: usize = 14;

/// Upper bound on one formatted line, newline included
///
/// 14 fields of at most 20 digits each, 13 separators and the newline.
pub const MAX_LINE_LEN: usize = FIELD_COUNT * 20 + FIELD_COUNT;

/// One emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsRecord {
    pub timestamp_ms: u64,
    pub available_bytes: usize,
    pub smallest_free_block: usize,
    pub largest_free_block: usize,
    pub alloc_count: u32,
    pub alloc_time_total_us: u64,
    pub free_count: u32,
    pub free_time_total_us: u64,
    pub active_tasks: u32,
    pub internal_fragmentation: usize,
    pub allocator_alloc_successes: usize,
    pub allocator_free_successes: usize,
    pub minimum_ever_free: usize,
    pub free_block_count: usize,
}

/// Line parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordParseError {
    /// Line did not split into [`FIELD_COUNT`] fields
    FieldCount { found: usize },
    /// Field at `index` is not a non-negative decimal integer
    InvalidField { index: usize },
}

impl fmt::Display for RecordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordParseError::FieldCount { found } => {
                write!(f, "Expected {} fields, found {}", FIELD_COUNT, found)
            }
            RecordParseError::InvalidField { index } => {
                write!(f, "Field {} is not a decimal integer", index)
            }
        }
    }
}

impl StatsRecord {
    /// Assemble a record from its three sources
    pub fn new(
        timestamp_ms: u64,
        snapshot: &HeapSnapshot,
        counters: &AllocatorCounters,
        active_tasks: u32,
    ) -> Self {
        Self {
            timestamp_ms,
            available_bytes: snapshot.available_bytes,
            smallest_free_block: snapshot.smallest_free_block,
            largest_free_block: snapshot.largest_free_block,
            alloc_count: counters.alloc_count,
            alloc_time_total_us: counters.alloc_time_total_us,
            free_count: counters.free_count,
            free_time_total_us: counters.free_time_total_us,
            active_tasks,
            internal_fragmentation: snapshot.internal_fragmentation,
            allocator_alloc_successes: snapshot.successful_allocations,
            allocator_free_successes: snapshot.successful_frees,
            minimum_ever_free: snapshot.minimum_ever_free,
            free_block_count: snapshot.free_block_count,
        }
    }

    /// Write the record followed by a newline
    pub fn write_line<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}", self)?;
        out.write_char('\n')
    }

    /// Parse one line as produced by [`write_line`](Self::write_line)
    ///
    /// A single trailing `\n` (or `\r\n`) is accepted.
    ///
    /// # Errors
    ///
    /// - [`RecordParseError::FieldCount`] if the line does not hold exactly 14 fields
    /// - [`RecordParseError::InvalidField`] if a field is not a non-negative integer
    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        let line = line.trim_end_matches('\n').trim_end_matches('\r');

        let found = line.split(',').count();
        if found != FIELD_COUNT {
            return Err(RecordParseError::FieldCount { found });
        }

        let mut fields = line.split(',').enumerate();
        let mut next = || fields.next().ok_or(RecordParseError::FieldCount { found });

        Ok(Self {
            timestamp_ms: parse_field(next()?)?,
            available_bytes: parse_field(next()?)?,
            smallest_free_block: parse_field(next()?)?,
            largest_free_block: parse_field(next()?)?,
            alloc_count: parse_field(next()?)?,
            alloc_time_total_us: parse_field(next()?)?,
            free_count: parse_field(next()?)?,
            free_time_total_us: parse_field(next()?)?,
            active_tasks: parse_field(next()?)?,
            internal_fragmentation: parse_field(next()?)?,
            allocator_alloc_successes: parse_field(next()?)?,
            allocator_free_successes: parse_field(next()?)?,
            minimum_ever_free: parse_field(next()?)?,
            free_block_count: parse_field(next()?)?,
        })
    }

    /// Heap usage as a percentage of `total_heap` bytes
    ///
    /// Returns 0.0 for an empty heap.
    pub fn heap_usage_percent(&self, total_heap: usize) -> f32 {
        if total_heap == 0 {
            return 0.0;
        }
        let used = total_heap.saturating_sub(self.available_bytes);
        (used as f32 / total_heap as f32) * 100.0
    }

    /// Allocator-side successes plus frees
    pub fn operations(&self) -> usize {
        self.allocator_alloc_successes
            .saturating_add(self.allocator_free_successes)
    }
}

fn parse_field<T: FromStr>((index, raw): (usize, &str)) -> Result<T, RecordParseError> {
    // Reject signs and whitespace so only plain decimal digits round-trip
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecordParseError::InvalidField { index });
    }
    raw.parse()
        .map_err(|_| RecordParseError::InvalidField { index })
}

impl fmt::Display for StatsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.timestamp_ms,
            self.available_bytes,
            self.smallest_free_block,
            self.largest_free_block,
            self.alloc_count,
            self.alloc_time_total_us,
            self.free_count,
            self.free_time_total_us,
            self.active_tasks,
            self.internal_fragmentation,
            self.allocator_alloc_successes,
            self.allocator_free_successes,
            self.minimum_ever_free,
            self.free_block_count,
        )
    }
}
