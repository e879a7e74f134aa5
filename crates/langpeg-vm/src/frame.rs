//! Call frame arena for rule invocation (`Call`/`Return`): a cactus stack
//! where frames are appended but never removed during execution — "pop"
//! only moves the current pointer — so a checkpoint can restore an older
//! frame pointer without invalidating frames still referenced elsewhere.
//! Dead frames above the active high-water mark are reclaimed by `prune`
//! after a `Return` makes them unreachable.

/// One call frame: where to resume on `Return`.
#[derive(Clone, Copy, Debug)]
struct Frame {
    return_pc: u32,
    parent: Option<u32>,
    /// Set for the synthetic frame `Throw` pushes when dispatching into a
    /// recovery rule, so `Return` knows to close the pending `Error`
    /// capture rather than just jumping back.
    is_recovery: bool,
}

#[derive(Debug, Default)]
pub struct FrameArena {
    frames: Vec<Frame>,
    current: Option<u32>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new frame, returning its index (the checkpoint's
    /// `frame_index` if a `Choice` frame is pushed immediately after).
    pub fn push(&mut self, return_pc: u32) -> u32 {
        self.push_impl(return_pc, false)
    }

    /// Push a synthetic recovery frame for a `Throw` dispatch.
    pub fn push_recovery(&mut self, return_pc: u32) -> u32 {
        self.push_impl(return_pc, true)
    }

    fn push_impl(&mut self, return_pc: u32, is_recovery: bool) -> u32 {
        let idx = self.frames.len() as u32;
        self.frames.push(Frame {
            return_pc,
            parent: self.current,
            is_recovery,
        });
        self.current = Some(idx);
        idx
    }

    /// Pop the current frame, returning its `(return_pc, is_recovery)`.
    /// Returns `None` if no call frame is active (the caller should fail:
    /// `Return` with no matching `Call`).
    pub fn pop(&mut self) -> Option<(u32, bool)> {
        let idx = self.current?;
        let frame = self.frames[idx as usize];
        self.current = frame.parent;
        Some((frame.return_pc, frame.is_recovery))
    }

    /// Restore the current pointer, as a backtrack frame's `frame_index`
    /// dictates.
    pub fn restore(&mut self, frame_index: Option<u32>) {
        self.current = frame_index;
    }

    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn depth(&self) -> u32 {
        let mut depth = 0;
        let mut idx = self.current;
        while let Some(i) = idx {
            depth += 1;
            idx = self.frames[i as usize].parent;
        }
        depth
    }

    /// Drop frames beyond whichever is higher: the current frame, or the
    /// highest frame any live checkpoint still references.
    pub fn prune(&mut self, max_referenced: Option<u32>) {
        let keep = match (self.current, max_referenced) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if let Some(high_water) = keep {
            self.frames.truncate(high_water as usize + 1);
        } else {
            self.frames.clear();
        }
    }
}
