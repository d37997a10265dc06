/// Duration of one profiling sample, in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampMarker {
    pub label: String,
    pub duration: f32,
}
