use snafu::prelude::*;

/// Errors of the [`Ws2811Driver::write`](crate::Ws2811Driver) call family.
///
/// All of these are detected before interrupts are suspended; a
/// transmission that starts always runs to completion.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum WriteError {
    /// A lane's color buffer holds fewer colors than the transmission asks for.
    #[snafu(display("lane {lane} holds {len} colors, but {count} were requested"))]
    BufferTooShort {
        /// Index of the offending lane.
        lane: usize,
        /// Number of colors in that lane's buffer.
        len: usize,
        /// Number of colors requested.
        count: usize,
    },
}
