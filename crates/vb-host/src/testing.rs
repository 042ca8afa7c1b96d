//! Shared test doubles for the host crate

use std::sync::Arc;

use parking_lot::Mutex;
use vb_core::{EmbedFactory, FnEmbedFactory, RenderConfig, VisualizationEmbed};
use vb_data::Dataset;

struct RecordingEmbed {
    pushes: Arc<Mutex<Vec<Dataset>>>,
}

impl VisualizationEmbed for RecordingEmbed {
    fn update_data(&self, dataset: &Dataset) {
        self.pushes.lock().push(dataset.clone());
    }
}

/// An embed factory whose embeds record every wholesale replace
pub(crate) fn recording_embed_factory() -> (Arc<dyn EmbedFactory>, Arc<Mutex<Vec<Dataset>>>) {
    let pushes: Arc<Mutex<Vec<Dataset>>> = Arc::new(Mutex::new(Vec::new()));
    let embed_pushes = pushes.clone();
    let factory = Arc::new(FnEmbedFactory(move |_config: &RenderConfig| {
        Box::new(RecordingEmbed {
            pushes: embed_pushes.clone(),
        }) as Box<dyn VisualizationEmbed>
    }));
    (factory, pushes)
}
