use std::cell::RefCell;
use std::fmt::Debug;

mod marker;
pub use marker::TimestampMarker;

mod section;
pub use section::{ProfilingSampler, ProfilingScope};

mod queryset;
pub use queryset::QuerySet;

pub const MAX_QUERIES: u32 = wgpu::QUERY_SET_MAX_QUERIES;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MarkerKind {
    Begin,
    End,
}

/// GPU timestamps written at the begin and end of every profiling sample.
#[derive(Debug)]
pub struct Profiler {
    /// 64-bit number indicating the GPU-timestamp where all previous commands have finished executing
    pub(crate) timestamp: Option<QuerySet>,
    /// The amount of nanoseconds each tick of a timestamp query represents
    pub timestamp_period: f32,
    markers: RefCell<Vec<(String, MarkerKind)>>,
}

impl Profiler {
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        // Timestamp period is multiplied by the time span to get the duration in nanoseconds
        let timestamp_period = queue.get_timestamp_period();

        // QuerySet availability is based on device's feature support.
        // If you want to opt in or out of a query set then do so in the feature set.
        let timestamp = device
            .features()
            .contains(wgpu::Features::TIMESTAMP_QUERY)
            .then(|| QuerySet::new_timestamp(device, MAX_QUERIES));

        Self {
            timestamp,
            timestamp_period,
            markers: RefCell::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.timestamp.is_some()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn query_count(&self) -> u32 {
        self.markers.borrow().len() as u32
    }

    pub(crate) fn begin_sample(&self, label: &str, encoder: &mut wgpu::CommandEncoder) {
        self.mark(label, MarkerKind::Begin, encoder);
    }

    pub(crate) fn end_sample(&self, label: &str, encoder: &mut wgpu::CommandEncoder) {
        self.mark(label, MarkerKind::End, encoder);
    }

    fn mark(&self, label: &str, kind: MarkerKind, encoder: &mut wgpu::CommandEncoder) {
        if let Some(ts_qs) = &self.timestamp {
            let index = self.query_count();
            if index >= MAX_QUERIES {
                return;
            }
            self.markers.borrow_mut().push((label.to_string(), kind));
            encoder.write_timestamp(ts_qs, index);
        }
    }

    /// Must be called before `timestamp_report()`
    pub fn resolve(&self, encoder: &mut wgpu::CommandEncoder) {
        if let Some(timestamp) = &self.timestamp {
            timestamp.resolve(self.query_count(), encoder);
        }
    }

    /// Pairs every begin marker with its end marker and reports the time between them.
    pub fn timestamp_report(&self, device: &wgpu::Device) -> Vec<TimestampMarker> {
        let mut ret = vec![];
        if let Some(timestamp) = &self.timestamp {
            if let Ok(val) = timestamp.get(device, self.query_count()) {
                let markers = self.markers.borrow();
                let mut open: Vec<(&str, usize)> = Vec::new();
                for (i, (label, kind)) in markers.iter().enumerate() {
                    match kind {
                        MarkerKind::Begin => open.push((label.as_str(), i)),
                        MarkerKind::End => {
                            if let Some((begin_label, start)) = open.pop() {
                                let duration = self.ts_to_millis(val[i].saturating_sub(val[start]));
                                ret.push(TimestampMarker {
                                    label: begin_label.to_string(),
                                    duration,
                                });
                            }
                        }
                    }
                }
            }
        };
        ret
    }

    pub fn clear(&self) {
        self.markers.borrow_mut().clear();
    }

    #[allow(clippy::cast_precision_loss)]
    fn ts_to_millis(&self, ts: u64) -> f32 {
        ts as f32 * self.timestamp_period / 1_000_000.0
    }
}
