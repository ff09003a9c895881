/// Identifier of one extraction request; later requests compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Stale-result guard for superseded extractions.
///
/// In-flight work is never aborted; results of anything but the latest request are dropped
/// when they arrive.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request id, superseding every earlier one.
    pub fn begin(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest != 0 && id.0 == self.latest
    }

    /// Pass `result` through only if `id` is still the latest request.
    pub fn accept<T>(&self, id: RequestId, result: T) -> Option<T> {
        if self.is_current(id) {
            Some(result)
        } else {
            tracing::debug!(request = id.0, latest = self.latest, "dropping stale result");
            None
        }
    }
}
