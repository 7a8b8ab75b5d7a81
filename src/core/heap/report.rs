//! Startup heap report
//!
//! Six headline figures of the instrumented heap, logged once at boot before
//! any control task runs. The report goes to the log, never to the record
//! stream, so consumers of the stream only ever see record lines.

use pico_heapscope_core::stats::HeapSnapshot;

/// Number of lines in the report
pub const REPORT_LINES: usize = 6;

/// Labelled report lines as `(label, value, unit)`
///
/// Order: free size, minimum ever free, successful allocations, successful
/// frees, smallest free block, largest free block.
pub fn report_lines(snapshot: &HeapSnapshot) -> [(&'static str, usize, &'static str); REPORT_LINES] {
    [
        ("Heap Free Size", snapshot.available_bytes, " bytes"),
        ("Heap Minimum Ever Free Size", snapshot.minimum_ever_free, " bytes"),
        ("Number of successful allocations", snapshot.successful_allocations, ""),
        ("Number of successful frees", snapshot.successful_frees, ""),
        ("Size of smallest free block", snapshot.smallest_free_block, " bytes"),
        ("Size of largest free block", snapshot.largest_free_block, " bytes"),
    ]
}

/// Log the startup report for `snapshot`
pub fn log_startup_report(snapshot: &HeapSnapshot) {
    for (label, value, unit) in report_lines(snapshot) {
        crate::log_info!("{}: {}{}", label, value, unit);
    }
}
