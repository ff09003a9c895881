use std::sync::Arc;

use crate::{
    analysis::classify::{KeywordClassifier, LayerClassifier},
    config::AnalysisConfig,
    document::model::{LayerId, LayerKind, ProcessedLayer, SemanticType},
};

/// Importance tier derived from bounding-box area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Primary,
    Secondary,
    Decorative,
}

/// Suggested animation affordance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Glow,
    Fade,
    Float,
    Scale,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SemanticInfo {
    pub category: SemanticType,
    pub importance: Importance,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpatialInfo {
    /// Position in paint order, 0 = bottom.
    pub stack_index: usize,
    /// Z-offset used by 3D reconstruction; ordinal, not measured depth.
    pub depth: f64,
    pub parallax_factor: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationInfo {
    pub potential: Vec<AnimationKind>,
}

/// Computed, 1:1 companion of a [`ProcessedLayer`]. Never stored on the layer itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerAnalysis {
    pub layer_id: LayerId,
    pub semantic: SemanticInfo,
    pub spatial: SpatialInfo,
    pub animation: AnimationInfo,
}

/// Pure layer analyzer: same layers in, same analysis out.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    classifier: Arc<dyn LayerClassifier>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            classifier: Arc::new(KeywordClassifier),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn LayerClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// One analysis per input layer, in input order.
    #[tracing::instrument(skip_all, fields(layers = layers.len()))]
    pub fn analyze(&self, layers: &[ProcessedLayer]) -> Vec<LayerAnalysis> {
        layers
            .iter()
            .enumerate()
            .map(|(stack_index, layer)| self.analyze_one(stack_index, layer))
            .collect()
    }

    fn analyze_one(&self, stack_index: usize, layer: &ProcessedLayer) -> LayerAnalysis {
        let category = self.classifier.classify(&layer.name, &layer.bounds);
        let importance = self.importance(layer.bounds.area());
        let depth = stack_index as f64 * self.config.depth_unit;

        LayerAnalysis {
            layer_id: layer.id.clone(),
            semantic: SemanticInfo {
                category,
                importance,
            },
            spatial: SpatialInfo {
                stack_index,
                depth,
                parallax_factor: depth * self.config.parallax_scale,
            },
            animation: AnimationInfo {
                potential: animation_potential(category.kind()),
            },
        }
    }

    pub fn importance(&self, area_px: u64) -> Importance {
        let area = area_px as f64;
        if area > self.config.primary_area_px {
            Importance::Primary
        } else if area > self.config.secondary_area_px {
            Importance::Secondary
        } else {
            Importance::Decorative
        }
    }
}

pub fn animation_potential(kind: LayerKind) -> Vec<AnimationKind> {
    match kind {
        LayerKind::Text => vec![AnimationKind::Glow, AnimationKind::Fade],
        LayerKind::Image => vec![AnimationKind::Float, AnimationKind::Scale],
    }
}

/// Analyze with default thresholds and the keyword classifier.
pub fn analyze(layers: &[ProcessedLayer]) -> Vec<LayerAnalysis> {
    Analyzer::default().analyze(layers)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/analyzer.rs"]
mod tests;
