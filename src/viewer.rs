//! Viewer lifecycle: `Uninitialized -> Loading -> Ready(mode) -> Disposed`.
//!
//! A viewer exclusively owns its view-state, navigation, renderer and physics; the document
//! itself is shared read-only.

use std::sync::Arc;

use glam::Vec2;

use crate::{
    analysis::analyzer::{Analyzer, LayerAnalysis},
    assets::store::RasterStore,
    config::StudioConfig,
    document::{
        model::{LayerId, ProcessedDocument, ProcessedLayer},
        snapshot::{DocumentSnapshot, SnapshotSink},
        view_state::ViewState,
    },
    extract::{
        pipeline::{ExtractionNotice, ExtractionOutput},
        request::{RequestId, RequestTracker},
    },
    foundation::{
        core::Size,
        error::{HolocardError, HolocardResult},
    },
    navigation::{
        engine::{NavigationEngine, PointerResponse, hit_test_document},
        input::{OrientationSample, PointerEvent, WheelEvent},
    },
    render2d::{
        frame::FrameRGBA,
        renderer::{Renderer2d, ViewMode},
    },
    scene3d::scene::{InteractionSample, Scene3d, build_scene_in_view},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerMode {
    #[default]
    Inspect,
    Frame,
    Build,
    #[serde(rename = "3d")]
    ThreeD,
}

impl ViewerMode {
    /// The 2D render mode, or `None` for the 3D view.
    pub fn view_mode(self) -> Option<ViewMode> {
        match self {
            Self::Inspect => Some(ViewMode::Inspect),
            Self::Frame => Some(ViewMode::Frame),
            Self::Build => Some(ViewMode::Build),
            Self::ThreeD => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Loading { request: RequestId },
    Ready { mode: ViewerMode },
    Disposed,
}

#[derive(Debug)]
struct Loaded {
    document: Arc<ProcessedDocument>,
    analysis: Vec<LayerAnalysis>,
    rasters: Arc<RasterStore>,
    view: ViewState,
    scene: Option<Scene3d>,
}

/// One mounted document viewer.
#[derive(Debug)]
pub struct Viewer {
    config: StudioConfig,
    state: ViewerState,
    requests: RequestTracker,
    analyzer: Analyzer,
    navigation: NavigationEngine,
    renderer: Renderer2d,
    loaded: Option<Loaded>,
    notice: Option<ExtractionNotice>,
    interaction: InteractionSample,
}

impl Viewer {
    pub fn new(
        config: StudioConfig,
        viewport_width: u32,
        viewport_height: u32,
    ) -> HolocardResult<Self> {
        config.validate()?;
        let renderer = Renderer2d::new(config.render.clone(), viewport_width, viewport_height)?;
        let viewport = Size::new(f64::from(viewport_width), f64::from(viewport_height));
        Ok(Self {
            analyzer: Analyzer::new(config.analysis.clone()),
            navigation: NavigationEngine::new(config.navigation.clone(), viewport, Size::ZERO),
            renderer,
            state: ViewerState::Uninitialized,
            requests: RequestTracker::new(),
            loaded: None,
            notice: None,
            interaction: InteractionSample::Pointer { x: 0.0, y: 0.0 },
            config,
        })
    }

    /// Replace the analyzer, e.g. to plug in a different classifier.
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn mode(&self) -> Option<ViewerMode> {
        match self.state {
            ViewerState::Ready { mode } => Some(mode),
            _ => None,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Start (or supersede) a load. Any in-flight result keyed by an older id will be dropped.
    pub fn begin_loading(&mut self) -> HolocardResult<RequestId> {
        self.ensure_alive()?;
        let request = self.requests.begin();
        tracing::debug!(request = request.0, from = ?self.state, "viewer loading");
        self.state = ViewerState::Loading { request };
        Ok(request)
    }

    /// Deliver an extraction result. Returns `false` if `request` was superseded.
    pub fn finish_loading(
        &mut self,
        request: RequestId,
        output: ExtractionOutput,
    ) -> HolocardResult<bool> {
        self.ensure_alive()?;
        let Some(output) = self.requests.accept(request, output) else {
            return Ok(false);
        };
        if !matches!(self.state, ViewerState::Loading { .. }) {
            return Err(HolocardError::lifecycle(format!(
                "finish_loading without a pending load (state {:?})",
                self.state
            )));
        }

        let ExtractionOutput {
            document,
            rasters,
            notice,
            ..
        } = output;
        let analysis = self.analyzer.analyze(&document.layers);
        let view = ViewState::new(&document);

        self.navigation.set_content(Size::new(
            f64::from(document.width),
            f64::from(document.height),
        ));
        self.navigation.fit_to_screen();

        self.loaded = Some(Loaded {
            document: Arc::new(document),
            analysis,
            rasters: Arc::new(rasters),
            view,
            scene: None,
        });
        self.notice = notice;
        self.state = ViewerState::Ready {
            mode: ViewerMode::Inspect,
        };
        tracing::debug!(request = request.0, "viewer ready");
        Ok(true)
    }

    pub fn set_mode(&mut self, mode: ViewerMode) -> HolocardResult<()> {
        self.ready_mode()?;
        if mode == ViewerMode::ThreeD {
            self.ensure_scene()?;
        }
        tracing::debug!(?mode, "viewer mode");
        self.state = ViewerState::Ready { mode };
        Ok(())
    }

    pub fn document(&self) -> Option<&Arc<ProcessedDocument>> {
        self.loaded.as_ref().map(|l| &l.document)
    }

    pub fn analysis(&self) -> &[LayerAnalysis] {
        self.loaded
            .as_ref()
            .map(|l| l.analysis.as_slice())
            .unwrap_or(&[])
    }

    pub fn view_state(&self) -> Option<&ViewState> {
        self.loaded.as_ref().map(|l| &l.view)
    }

    /// The decode-failure notice of the current document, if any.
    pub fn notice(&self) -> Option<&ExtractionNotice> {
        self.notice.as_ref()
    }

    pub fn navigation(&self) -> &NavigationEngine {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> HolocardResult<&mut NavigationEngine> {
        self.ensure_alive()?;
        Ok(&mut self.navigation)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> HolocardResult<()> {
        self.ensure_alive()?;
        self.renderer.resize(width, height)?;
        self.navigation
            .set_viewport(Size::new(f64::from(width), f64::from(height)));
        Ok(())
    }

    pub fn select(&mut self, id: Option<LayerId>) -> HolocardResult<()> {
        self.ready_mode()?;
        let loaded = self.loaded_mut()?;
        loaded.view.select(&loaded.document, id);
        Ok(())
    }

    pub fn toggle_hidden(&mut self, id: &LayerId) -> HolocardResult<bool> {
        self.ready_mode()?;
        let loaded = self.loaded_mut()?;
        let Some(layer) = loaded.document.layer(id) else {
            return Err(HolocardError::validation(format!("unknown layer '{id}'")));
        };
        let hidden = loaded.view.toggle_hidden(id);
        let visible = loaded.view.is_effectively_visible(layer);
        if let Some(scene) = loaded.scene.as_mut() {
            scene.set_visible(id, visible);
        }
        Ok(hidden)
    }

    /// Reorder the effective stack. A live 3D scene is rebuilt so depth follows the new order.
    pub fn move_layer(&mut self, id: &LayerId, to_index: usize) -> HolocardResult<()> {
        let mode = self.ready_mode()?;
        let loaded = self.loaded_mut()?;
        loaded.view.move_layer(id, to_index)?;
        loaded.scene = None;
        if mode == ViewerMode::ThreeD {
            self.ensure_scene()?;
        }
        Ok(())
    }

    /// 2D modes: drag-pan, click-select and hover. 3D mode: pointer becomes the tilt input.
    pub fn handle_pointer(&mut self, ev: &PointerEvent) -> HolocardResult<()> {
        let mode = self.ready_mode()?;
        if mode == ViewerMode::ThreeD {
            let vp = self.navigation.viewport();
            self.interaction = InteractionSample::from_pointer(ev.x, ev.y, vp.width, vp.height);
            return Ok(());
        }

        let response = self.navigation.handle_pointer(ev);
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(());
        };
        match response {
            PointerResponse::Click { document } => {
                let hit = hit_test_document(&loaded.document, &loaded.view, document);
                loaded.view.select(&loaded.document, hit);
            }
            PointerResponse::Hover { document } => {
                let hit = hit_test_document(&loaded.document, &loaded.view, document);
                loaded.view.set_hovered(hit);
            }
            PointerResponse::Panned | PointerResponse::Ignored => {}
        }
        Ok(())
    }

    /// Returns whether the wheel event was consumed as a zoom.
    pub fn handle_wheel(&mut self, ev: &WheelEvent) -> HolocardResult<bool> {
        let mode = self.ready_mode()?;
        if mode == ViewerMode::ThreeD {
            return Ok(false);
        }
        Ok(self.navigation.handle_wheel(ev))
    }

    pub fn handle_orientation(&mut self, sample: OrientationSample) -> HolocardResult<()> {
        self.ready_mode()?;
        self.interaction = InteractionSample::Orientation(sample);
        Ok(())
    }

    pub fn render_2d(&mut self) -> HolocardResult<FrameRGBA> {
        let mode = self.ready_mode()?;
        let view_mode = mode
            .view_mode()
            .ok_or_else(|| HolocardError::lifecycle("no 2D frame in 3D mode"))?;
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| HolocardError::lifecycle("no document loaded"))?;
        let transform = self.navigation.transform();
        self.renderer.render(
            &loaded.document,
            &loaded.analysis,
            &transform,
            &loaded.view,
            view_mode,
            loaded.rasters.as_ref(),
        )
    }

    pub fn scene_mut(&mut self) -> HolocardResult<&mut Scene3d> {
        if self.ready_mode()? != ViewerMode::ThreeD {
            return Err(HolocardError::lifecycle("3D scene is only live in 3D mode"));
        }
        self.loaded_mut()?
            .scene
            .as_mut()
            .ok_or_else(|| HolocardError::lifecycle("3D scene not built"))
    }

    /// Advance physics and shader time by `dt` seconds using the latest interaction input.
    pub fn simulate(&mut self, dt: f32) -> HolocardResult<()> {
        let sample = self.interaction;
        let scene = self.scene_mut()?;
        scene.simulate(sample, dt);
        scene.tick(dt);
        Ok(())
    }

    /// Latest normalized interaction offset fed to the 3D scene.
    pub fn interaction_offset(&self) -> Vec2 {
        self.interaction.offset()
    }

    /// Hand the document and view-state to the injected save function.
    pub fn save(&self, sink: &mut dyn SnapshotSink) -> HolocardResult<()> {
        self.ready_mode()?;
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| HolocardError::lifecycle("no document loaded"))?;
        sink.save(&DocumentSnapshot::capture(&loaded.document, &loaded.view))
    }

    /// Tear down physics and view-state. Terminal; safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.state != ViewerState::Disposed {
            tracing::debug!(from = ?self.state, "viewer disposed");
        }
        self.loaded = None;
        self.notice = None;
        self.state = ViewerState::Disposed;
    }

    /// Build the 3D scene from the current view if it is not live yet.
    fn ensure_scene(&mut self) -> HolocardResult<()> {
        let physics = self.config.physics.clone();
        let loaded = self
            .loaded
            .as_mut()
            .ok_or_else(|| HolocardError::lifecycle("no document loaded"))?;
        if loaded.scene.is_none() {
            // Depth is an ordinal of the effective stack, so analyze in that order.
            let ordered: Vec<ProcessedLayer> = loaded
                .view
                .paint_order(&loaded.document)
                .into_iter()
                .map(|(_, layer)| layer.clone())
                .collect();
            let analysis = self.analyzer.analyze(&ordered);
            loaded.scene = Some(build_scene_in_view(
                &loaded.document,
                &loaded.view,
                &analysis,
                physics,
            ));
        }
        Ok(())
    }

    fn ensure_alive(&self) -> HolocardResult<()> {
        if self.state == ViewerState::Disposed {
            return Err(HolocardError::lifecycle("viewer is disposed"));
        }
        Ok(())
    }

    fn ready_mode(&self) -> HolocardResult<ViewerMode> {
        match self.state {
            ViewerState::Ready { mode } => Ok(mode),
            other => Err(HolocardError::lifecycle(format!(
                "viewer is not ready (state {other:?})"
            ))),
        }
    }

    fn loaded_mut(&mut self) -> HolocardResult<&mut Loaded> {
        self.loaded
            .as_mut()
            .ok_or_else(|| HolocardError::lifecycle("no document loaded"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/viewer.rs"]
mod tests;
