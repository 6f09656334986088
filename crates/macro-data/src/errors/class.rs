/// Classification for how a failure is surfaced to a view.
///
/// # Behavior Summary
///
/// | Class | Error message shown? | Prior data kept? |
/// |-------|----------------------|------------------|
/// | `Transport` | Yes | No (source has no data) |
/// | `Decode` | No (neutral placeholder) | No (source has no data) |
/// | `Cancelled` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Network error, timeout, rate limit or non-2xx status.
    /// The whole source failed and the view shows its message.
    Transport,

    /// The payload had an unexpected shape.
    /// Treated exactly like "no data available".
    Decode,

    /// The request was aborted because its consumer went away.
    /// Never recorded as an error and never overwrites state.
    Cancelled,
}
