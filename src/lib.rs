//! Holocard ingests layered design files and serves them three ways.
//!
//! - Extract a layered file into a [`ProcessedDocument`] with per-layer rasters
//! - Analyze layers into semantic categories, depth and animation hints
//! - Inspect the result on a zoomable 2D canvas ([`Renderer2d`]) or as a depth-mapped
//!   [`Scene3d`] driven by pointer or device tilt
//!
//! A [`Viewer`] ties these together behind one lifecycle.
#![forbid(unsafe_code)]

mod foundation;

pub mod analysis;
pub mod assets;
pub mod config;
pub mod document;
pub mod extract;
pub mod navigation;
pub mod render2d;
pub mod scene3d;
pub mod viewer;

pub use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{HolocardError, HolocardResult};

pub use crate::analysis::analyzer::{AnimationKind, Analyzer, Importance, LayerAnalysis, analyze};
pub use crate::analysis::classify::{KeywordClassifier, LayerClassifier};
pub use crate::assets::decode::decode_image;
pub use crate::assets::raster::Raster;
pub use crate::assets::store::{AssetKey, RasterSource, RasterStore};
pub use crate::config::{
    AnalysisConfig, ExtractionConfig, NavigationConfig, PhysicsConfig, RenderConfig, StudioConfig,
};
pub use crate::document::model::{
    BlendMode, DocumentId, LayerBounds, LayerId, LayerImageRef, ProcessedDocument, ProcessedLayer,
    SemanticType,
};
pub use crate::document::snapshot::{DocumentSnapshot, InMemorySnapshotSink, SnapshotSink};
pub use crate::document::view_state::ViewState;
pub use crate::extract::archive::ArchiveSink;
pub use crate::extract::decoder::{DecodedDocument, DecodedLayer, LayeredDecoder};
pub use crate::extract::pipeline::{
    ExtractionNotice, ExtractionOutput, Extractor, LayerImage, extract,
};
pub use crate::extract::psd::PsdDecoder;
pub use crate::extract::request::{RequestId, RequestTracker};
pub use crate::navigation::engine::{NavigationEngine, PointerResponse};
pub use crate::navigation::input::{
    Modifiers, OrientationSample, PointerButton, PointerEvent, PointerKind, WheelEvent,
};
pub use crate::navigation::transform::ViewTransform;
pub use crate::render2d::frame::FrameRGBA;
pub use crate::render2d::renderer::{Renderer2d, ViewMode, emphasis};
pub use crate::scene3d::holo::HoloShader;
pub use crate::scene3d::lighting::LightingRig;
pub use crate::scene3d::material::PbrMaterial;
pub use crate::scene3d::physics::PhysicsWorld;
pub use crate::scene3d::scene::{
    InteractionSample, LayerPlane, Scene3d, build_scene, build_scene_in_view, build_scene_with,
};
pub use crate::viewer::{Viewer, ViewerMode, ViewerState};
