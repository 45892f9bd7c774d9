//! Process exit status for a finished run.

use nudger::RunSummary;

/// Some mapped reviewers were not notified and `--fail-on-undelivered` is set.
pub const UNDELIVERED: u8 = 2;

/// The run was interrupted with Ctrl-C (128 + SIGINT).
pub const INTERRUPTED: u8 = 130;

/// Chooses the exit status for a run that produced a summary.
///
/// An interrupted run never exits successfully, since every recipient still
/// pending at the time was recorded as cancelled.
#[must_use]
pub fn for_run(summary: &RunSummary, fail_on_undelivered: bool, interrupted: bool) -> u8 {
    if interrupted {
        return INTERRUPTED;
    }
    if fail_on_undelivered && summary.failed() > 0 {
        return UNDELIVERED;
    }
    0
}
