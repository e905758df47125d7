use crate::foundation::core::ElementId;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::record::backend::{AudioGraph, MediaBackend};

/// Holds at most one audio graph and reuses it while the target element stays the same.
#[derive(Default)]
pub struct AudioGraphSlot {
    graph: Option<Box<dyn AudioGraph>>,
}

impl std::fmt::Debug for AudioGraphSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioGraphSlot")
            .field("bound_element", &self.bound_element())
            .finish()
    }
}

impl AudioGraphSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_element(&self) -> Option<ElementId> {
        self.graph.as_ref().map(|g| g.element())
    }

    /// Graph bound to `element`, creating it (and tearing down a graph bound elsewhere) if needed.
    pub fn acquire<B: MediaBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        element: ElementId,
    ) -> AvatarResult<&mut dyn AudioGraph> {
        if self.bound_element() == Some(element) {
            tracing::debug!(%element, "reusing audio graph");
        } else {
            self.release();
            tracing::info!(%element, "creating audio graph");
            self.graph = Some(backend.create_audio_graph(element)?);
        }
        let graph: &mut dyn AudioGraph = self
            .graph
            .as_deref_mut()
            .ok_or_else(|| AvatarError::recording("audio graph unavailable"))?;
        Ok(graph)
    }

    /// Disconnect and close the held graph, if any.
    pub fn release(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            tracing::info!(element = %graph.element(), "closing audio graph");
            graph.disconnect();
            graph.close();
        }
    }
}
