use crate::{
    config::NavigationConfig,
    document::{
        model::{LayerId, ProcessedDocument},
        view_state::ViewState,
    },
    foundation::core::{Point, Size, Vec2},
    navigation::{
        input::{PointerButton, PointerEvent, PointerKind, WheelEvent},
        transform::ViewTransform,
    },
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    /// Primary button held, not yet past the click slop.
    Pressed { origin: Point, last: Point },
    Panning { last: Point },
}

/// What a pointer event amounted to, for the owning viewer to act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerResponse {
    Ignored,
    /// The transform changed.
    Panned,
    /// Press and release without a drag; resolve with [`NavigationEngine::hit_test`].
    Click { document: Point },
    /// Pointer moved with no button held.
    Hover { document: Point },
}

/// Zoom/pan state plus screen/document mapping for one 2D viewer.
///
/// Knows nothing about what is drawn; the same engine drives inspect, frame and build views.
#[derive(Clone, Debug)]
pub struct NavigationEngine {
    config: NavigationConfig,
    transform: ViewTransform,
    viewport: Size,
    content: Size,
    drag: DragState,
}

impl NavigationEngine {
    /// Start at 100% with `content` centred in `viewport`.
    ///
    /// Out-of-range limits are repaired with [`NavigationConfig::sanitized`].
    pub fn new(config: NavigationConfig, viewport: Size, content: Size) -> Self {
        let mut engine = Self {
            config: config.sanitized(),
            transform: ViewTransform::identity(),
            viewport,
            content,
            drag: DragState::Idle,
        };
        engine.reset();
        engine
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn content(&self) -> Size {
        self.content
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.clamp_pan();
    }

    pub fn set_content(&mut self, content: Size) {
        self.content = content;
        self.clamp_pan();
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, DragState::Idle)
    }

    pub fn zoom_in(&mut self) {
        self.zoom_about(self.transform.scale * self.config.zoom_step, self.viewport_center());
    }

    pub fn zoom_out(&mut self) {
        self.zoom_about(self.transform.scale / self.config.zoom_step, self.viewport_center());
    }

    /// Set an absolute zoom, anchored on the viewport centre.
    pub fn set_zoom(&mut self, scale: f64) {
        self.zoom_about(scale, self.viewport_center());
    }

    /// Zoom so the document point under `anchor` (screen) stays put, then re-clamp the pan.
    pub fn zoom_about(&mut self, scale: f64, anchor: Point) {
        if !scale.is_finite() {
            return;
        }
        let target = self.clamp_zoom(scale);
        let doc = self.transform.screen_to_document(anchor);
        self.transform.scale = target;
        self.transform.translate = Vec2::new(anchor.x - doc.x * target, anchor.y - doc.y * target);
        self.clamp_pan();
    }

    /// Back to 100%, centred.
    pub fn reset(&mut self) {
        self.transform.scale = self.clamp_zoom(1.0);
        self.center();
    }

    /// Shrink to fit the viewport (never enlarge past 100%) and centre.
    pub fn fit_to_screen(&mut self) {
        let (cw, ch) = (self.content.width, self.content.height);
        let fit = if cw > 0.0 && ch > 0.0 {
            (self.viewport.width / cw)
                .min(self.viewport.height / ch)
                .min(1.0)
        } else {
            1.0
        };
        self.transform.scale = self.clamp_zoom(fit).min(1.0);
        self.center();
    }

    /// Pan by a document-space delta; the resulting screen shift is `delta * scale`.
    pub fn pan_by(&mut self, document_delta: Vec2) {
        self.transform.translate += document_delta * self.transform.scale;
        self.clamp_pan();
    }

    /// Pan by a screen-space drag delta at the current zoom.
    pub fn pan_by_screen(&mut self, screen_delta: Vec2) {
        self.pan_by(screen_delta / self.transform.scale);
    }

    pub fn screen_to_document(&self, p: Point) -> Point {
        self.transform.screen_to_document(p)
    }

    pub fn document_to_screen(&self, p: Point) -> Point {
        self.transform.document_to_screen(p)
    }

    /// Top-most effectively-visible layer under the screen point.
    pub fn hit_test(
        &self,
        doc: &ProcessedDocument,
        view: &ViewState,
        screen: Point,
    ) -> Option<LayerId> {
        hit_test_document(doc, view, self.screen_to_document(screen))
    }

    /// Drive press/drag/release. Only the primary button pans.
    pub fn handle_pointer(&mut self, ev: &PointerEvent) -> PointerResponse {
        let p = Point::new(ev.x, ev.y);
        match ev.kind {
            PointerKind::Down => {
                if ev.button != PointerButton::Primary {
                    return PointerResponse::Ignored;
                }
                self.drag = DragState::Pressed { origin: p, last: p };
                PointerResponse::Ignored
            }
            PointerKind::Move => match self.drag {
                DragState::Idle => PointerResponse::Hover {
                    document: self.screen_to_document(p),
                },
                DragState::Pressed { origin, last } => {
                    if (p - origin).hypot() <= self.config.click_slop {
                        self.drag = DragState::Pressed { origin, last: p };
                        return PointerResponse::Ignored;
                    }
                    self.drag = DragState::Panning { last: p };
                    self.pan_by_screen(p - last);
                    PointerResponse::Panned
                }
                DragState::Panning { last } => {
                    self.drag = DragState::Panning { last: p };
                    self.pan_by_screen(p - last);
                    PointerResponse::Panned
                }
            },
            PointerKind::Up => {
                if ev.button != PointerButton::Primary {
                    return PointerResponse::Ignored;
                }
                let was = std::mem::replace(&mut self.drag, DragState::Idle);
                match was {
                    DragState::Pressed { .. } => PointerResponse::Click {
                        document: self.screen_to_document(p),
                    },
                    DragState::Panning { .. } => PointerResponse::Panned,
                    DragState::Idle => PointerResponse::Ignored,
                }
            }
        }
    }

    /// Cursor-anchored wheel zoom. Returns `false` (event not consumed) without ctrl/cmd so the
    /// host can scroll normally.
    pub fn handle_wheel(&mut self, ev: &WheelEvent) -> bool {
        if !ev.modifiers.zoom_chord() || ev.delta_y == 0.0 {
            return false;
        }
        let factor = if ev.delta_y < 0.0 {
            self.config.wheel_zoom_in
        } else {
            self.config.wheel_zoom_out
        };
        self.zoom_about(self.transform.scale * factor, Point::new(ev.x, ev.y));
        true
    }

    fn clamp_zoom(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_zoom, self.config.max_zoom)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn center(&mut self) {
        let s = self.transform.scale;
        self.transform.translate = Vec2::new(
            (self.viewport.width - self.content.width * s) / 2.0,
            (self.viewport.height - self.content.height * s) / 2.0,
        );
        self.clamp_pan();
    }

    /// Keep the content within `pan_margin` of the workspace edges on both axes.
    fn clamp_pan(&mut self) {
        let s = self.transform.scale;
        let m = self.config.pan_margin;
        let axis = |t: f64, viewport: f64, content: f64| {
            let slack = viewport - content * s;
            let lo = slack.min(0.0) - m;
            let hi = slack.max(0.0) + m;
            t.clamp(lo, hi)
        };
        self.transform.translate = Vec2::new(
            axis(self.transform.translate.x, self.viewport.width, self.content.width),
            axis(self.transform.translate.y, self.viewport.height, self.content.height),
        );
    }
}

/// Reverse paint order scan in document coordinates; hidden layers never match.
pub fn hit_test_document(doc: &ProcessedDocument, view: &ViewState, p: Point) -> Option<LayerId> {
    view.paint_order(doc)
        .into_iter()
        .rev()
        .find(|(_, layer)| view.is_effectively_visible(layer) && layer.bounds.contains(p))
        .map(|(_, layer)| layer.id.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/engine.rs"]
mod tests;
