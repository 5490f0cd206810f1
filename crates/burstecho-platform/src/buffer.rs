//! Input latch and output double buffer shared with the DMA streams.

/// One held input sample plus two halves of `BLOCK` output samples.
///
/// The DMA engine plays one half while the processor fills the other; the
/// half-transfer interrupt frees offset `0`, transfer-complete frees offset
/// `BLOCK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBuffer<const BLOCK: usize> {
    input: i32,
    output: [[i32; BLOCK]; 2],
}

impl<const BLOCK: usize> DoubleBuffer<BLOCK> {
    /// Creates a silent buffer.
    pub const fn new() -> Self {
        Self {
            input: 0,
            output: [[0; BLOCK]; 2],
        }
    }

    /// Latches the next input sample.
    #[inline]
    pub fn set_input(&mut self, sample: i32) {
        self.input = sample;
    }

    /// The latched input sample.
    #[inline]
    pub const fn input(&self) -> i32 {
        self.input
    }

    /// Both halves as one `2 * BLOCK` slice.
    #[inline]
    pub fn output(&self) -> &[i32] {
        self.output.as_flattened()
    }

    /// Mutable view of both halves.
    #[inline]
    pub fn output_mut(&mut self) -> &mut [i32] {
        self.output.as_flattened_mut()
    }

    /// The half starting at `write_position` (`0` or `BLOCK`).
    pub fn half(&self, write_position: usize) -> &[i32] {
        let end = write_position.saturating_add(BLOCK);
        self.output().get(write_position..end).unwrap_or(&[])
    }

    /// Samples per half.
    pub const fn block_size(&self) -> usize {
        BLOCK
    }

    /// Zeroes input and output.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl<const BLOCK: usize> Default for DoubleBuffer<BLOCK> {
    fn default() -> Self {
        Self::new()
    }
}
