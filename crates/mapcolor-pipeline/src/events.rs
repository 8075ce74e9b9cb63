//! Structured observability hook.
//!
//! The pipeline never prints or logs on its own. Stages that have
//! something worth reporting emit a [`PipelineEvent`] to an
//! [`Observer`] supplied by the caller; the bench CLI forwards these to
//! `tracing`, tests count them, and everyone else passes
//! [`NoopObserver`].

/// An event emitted while building zones or coloring a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent<'a, V> {
    /// A vertex received its final color.
    VertexColored {
        /// The vertex that was colored.
        vertex: &'a V,
        /// The color index assigned.
        color: usize,
        /// Number of distinct colors already present among its neighbors.
        adjacent_colors: usize,
    },
    /// Zone identification finished.
    ZonesIdentified {
        /// Number of zones found.
        count: usize,
    },
    /// Two zones were found to face each other across a border band.
    ///
    /// Emitted once per zone pair.
    ZonesAdjacent {
        /// Lower-numbered zone.
        a: usize,
        /// Higher-numbered zone.
        b: usize,
    },
    /// Post-coloring validation found two adjacent vertices sharing a color.
    ImproperEdge {
        /// One endpoint.
        a: &'a V,
        /// The other endpoint.
        b: &'a V,
        /// The shared color.
        color: usize,
    },
}

/// Receives [`PipelineEvent`]s.
///
/// Implemented for every `FnMut(&PipelineEvent<'_, V>)` closure.
pub trait Observer<V> {
    /// Handle one event.
    fn on_event(&mut self, event: &PipelineEvent<'_, V>);
}

impl<V, F> Observer<V> for F
where
    F: FnMut(&PipelineEvent<'_, V>),
{
    fn on_event(&mut self, event: &PipelineEvent<'_, V>) {
        self(event);
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<V> Observer<V> for NoopObserver {
    fn on_event(&mut self, _event: &PipelineEvent<'_, V>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_observers() {
        let mut seen = 0usize;
        {
            let mut observer = |event: &PipelineEvent<'_, u32>| {
                if let PipelineEvent::ZonesIdentified { count } = event {
                    seen += count;
                }
            };
            observer.on_event(&PipelineEvent::ZonesIdentified { count: 3 });
            observer.on_event(&PipelineEvent::ZonesAdjacent { a: 0, b: 1 });
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn noop_observer_accepts_anything() {
        let v = 5u32;
        let mut observer = NoopObserver;
        Observer::<u32>::on_event(
            &mut observer,
            &PipelineEvent::VertexColored {
                vertex: &v,
                color: 0,
                adjacent_colors: 0,
            },
        );
    }
}
