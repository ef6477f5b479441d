//! Chronological ordering of draw requests.
use crate::DrawRequest;

/// Orders draw requests by effective date before they are evaluated.
///
/// The sort is stable: requests sharing a date keep their input order, there
/// is no secondary key. [`Allocator::run`](crate::Allocator::run) is the only
/// caller in a processing run.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawSequencer;

impl DrawSequencer {
    pub fn order(mut requests: Vec<DrawRequest>) -> Vec<DrawRequest> {
        requests.sort_by_key(|request| request.effective_date);
        requests
    }
}
