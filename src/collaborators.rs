// SPDX-License-Identifier: AGPL-3.0-or-later
//! Boundary traits for the surrounding service this crate is not part of:
//! the HTTP API, job store, task queue, and live-progress channel. None of
//! these are implemented here — they exist only so a caller embedding this
//! crate in such a service has a documented seam to implement against.

use crate::DesolidifyError;
use crate::settings::ParamMap;

/// A unique handle for one perforation run, as assigned by whatever job
/// store is tracking it.
pub type JobId = String;

/// Persists job records and their terminal results. The HTTP layer this
/// crate does not implement would read job status through this trait;
/// the perforation engine itself never touches it.
pub trait JobStore {
    fn create_job(&mut self, params: &ParamMap) -> Result<JobId, DesolidifyError>;
    fn mark_running(&mut self, job: &JobId) -> Result<(), DesolidifyError>;
    fn mark_succeeded(&mut self, job: &JobId, output_path: &str) -> Result<(), DesolidifyError>;
    fn mark_failed(&mut self, job: &JobId, error: &DesolidifyError) -> Result<(), DesolidifyError>;
}

/// Dispatches queued perforation work to a worker pool. Out of scope for
/// this crate, which only perforates a single mesh synchronously per call.
pub trait PerforationQueue {
    fn enqueue(&mut self, job: JobId, params: ParamMap, input_path: String);
}
