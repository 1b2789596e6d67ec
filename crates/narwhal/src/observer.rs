use narwhal_core::geom::Vector;

/// What a frame did, reported to a [`FrameObserver`] around the world step.
///
/// `before_step` sees the recenter offset; repulsion and drawing counts are filled in for
/// `after_step`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub tick: u64,
    pub vertex_count: usize,
    pub recenter_offset: Option<Vector>,
    pub total_repulsion: f64,
    pub labels_drawn: usize,
    pub edges_drawn: usize,
}

/// Hooks around each world step.
pub trait FrameObserver {
    fn before_step(&mut self, _frame: &FrameStats) {}
    fn after_step(&mut self, _frame: &FrameStats) {}
}

impl<O: FrameObserver + ?Sized> FrameObserver for &mut O {
    fn before_step(&mut self, frame: &FrameStats) {
        (**self).before_step(frame);
    }

    fn after_step(&mut self, frame: &FrameStats) {
        (**self).after_step(frame);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {}

/// Emits one `debug` event per hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FrameObserver for TracingObserver {
    fn before_step(&mut self, frame: &FrameStats) {
        let (dx, dy) = frame
            .recenter_offset
            .map(|v| (v.x, v.y))
            .unwrap_or((0.0, 0.0));
        tracing::debug!(
            tick = frame.tick,
            vertices = frame.vertex_count,
            dx,
            dy,
            "before step"
        );
    }

    fn after_step(&mut self, frame: &FrameStats) {
        tracing::debug!(
            tick = frame.tick,
            vertices = frame.vertex_count,
            repulsion = frame.total_repulsion,
            labels = frame.labels_drawn,
            edges = frame.edges_drawn,
            "after step"
        );
    }
}
