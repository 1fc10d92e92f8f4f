//! Vertical slider with a quantized value.
//!
//! The slider's handle is a separate [`Circle`](super::Circle) registered
//! just before the slider itself. Dragging the handle is routed back here
//! through [`SliderBox::drag_child`], which snaps the position to the
//! nearest step.

use crate::canvas::{draw_rect_outline, Canvas, TextAnchor, BORDER_COLOUR, NORMAL_COLOUR};
use crate::interpolate::CurveKind;
use crate::vector::Point2D;
use crate::{Error, Result};

use super::{Rect, WidgetId};

/// Slack allowed when deciding whether a remainder reaches half a step.
/// Without it decimal halves such as 0.05 on a 0.1 grid round down because
/// of binary representation error.
const QUANTIZE_EPSILON: f64 = 1e-9;

/// Engine parameter a slider drives when its value changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderBinding {
    ScrollPeriod,
    ScrollDirection,
    TickRate,
}

/// Value-changed notification produced by a slider with a binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderChange {
    pub binding: SliderBinding,
    pub value: f64,
}

/// Construction parameters for a [`SliderBox`]
#[derive(Debug, Clone)]
pub struct SliderSpec {
    pub rect: Rect,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    /// Curve kinds for which the slider is shown; `None` means always
    pub curve_kinds: Option<Vec<CurveKind>>,
    pub binding: Option<SliderBinding>,
}

impl SliderSpec {
    pub fn new(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            rect: Rect::new(x, y, SliderBox::DEFAULT_WIDTH, SliderBox::DEFAULT_HEIGHT),
            label: label.into(),
            min: 0.0,
            max: 1.0,
            step: 0.1,
            value: 0.0,
            curve_kinds: None,
            binding: None,
        }
    }

    pub fn range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn only_for(mut self, kinds: &[CurveKind]) -> Self {
        self.curve_kinds = Some(kinds.to_vec());
        self
    }

    pub fn bound_to(mut self, binding: SliderBinding) -> Self {
        self.binding = Some(binding);
        self
    }
}

/// Snap `fraction` to the nearest multiple of `step_fraction`, rounding
/// halves up, and keep the result within `[0, 1]`
pub fn quantize_fraction(fraction: f64, step_fraction: f64) -> f64 {
    let divisor = (fraction / step_fraction).floor();
    let modulo = fraction - divisor * step_fraction;

    let mut steps = divisor;
    if modulo >= step_fraction / 2.0 - QUANTIZE_EPSILON {
        steps += 1.0;
    }

    let max_steps = (1.0 / step_fraction + QUANTIZE_EPSILON).floor();
    steps.clamp(0.0, max_steps) * step_fraction
}

#[derive(Debug, Clone)]
pub struct SliderBox {
    pub rect: Rect,
    pub label: String,
    min: f64,
    max: f64,
    step: f64,
    fraction: f64,
    curve_kinds: Option<Vec<CurveKind>>,
    binding: Option<SliderBinding>,
    handle: WidgetId,
    x_track: f64,
    y0_track: f64,
    y1_track: f64,
}

impl SliderBox {
    pub const DEFAULT_WIDTH: f64 = 40.0;
    pub const DEFAULT_HEIGHT: f64 = 100.0;
    pub const HANDLE_RADIUS: f64 = 4.0;
    const Y_MARGIN: f64 = 20.0;

    /// Build the slider. The initial value is not applied; callers follow up
    /// with [`set_value`](Self::set_value) once the handle exists.
    pub fn new(spec: SliderSpec, handle: WidgetId) -> Result<Self> {
        let SliderSpec {
            rect,
            label,
            min,
            max,
            step,
            curve_kinds,
            binding,
            ..
        } = spec;

        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(Error::InvalidConfiguration(format!(
                "slider '{}' needs min < max, got min={} max={}",
                label, min, max
            )));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "slider '{}' needs a positive step, got {}",
                label, step
            )));
        }
        if rect.height <= 2.0 * Self::Y_MARGIN {
            return Err(Error::InvalidConfiguration(format!(
                "slider '{}' is too short for a track ({} units)",
                label, rect.height
            )));
        }

        Ok(Self {
            x_track: rect.x + rect.width / 2.0,
            y0_track: rect.y + Self::Y_MARGIN,
            y1_track: rect.y + rect.height - Self::Y_MARGIN,
            rect,
            label,
            min,
            max,
            step,
            fraction: 0.0,
            curve_kinds,
            binding,
            handle,
        })
    }

    pub fn handle(&self) -> WidgetId {
        self.handle
    }

    pub fn binding(&self) -> Option<SliderBinding> {
        self.binding
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn step_fraction(&self) -> f64 {
        self.step / (self.max - self.min)
    }

    pub fn value(&self) -> f64 {
        self.min + self.fraction * (self.max - self.min)
    }

    /// Where the handle starts before any value is set
    pub fn handle_origin(&self) -> Point2D {
        Point2D::new(self.x_track, self.y0_track)
    }

    pub fn track_height(&self) -> f64 {
        self.y1_track - self.y0_track
    }

    pub fn y_position(&self, fraction: f64) -> f64 {
        self.y0_track + fraction * self.track_height()
    }

    /// Current handle height for the stored fraction
    pub fn handle_y(&self) -> f64 {
        self.y_position(self.fraction)
    }

    pub fn set_value(&mut self, value: f64) -> Option<SliderChange> {
        let value = value.clamp(self.min, self.max);
        let fraction = (value - self.min) / (self.max - self.min);
        self.set_value_fraction(fraction)
    }

    pub fn set_value_fraction(&mut self, fraction: f64) -> Option<SliderChange> {
        self.fraction = quantize_fraction(fraction, self.step_fraction());
        self.binding.map(|binding| SliderChange {
            binding,
            value: self.value(),
        })
    }

    /// Handle dragged to height `y`
    pub fn drag_child(&mut self, y: f64) -> Option<SliderChange> {
        let y = y.clamp(self.y0_track, self.y1_track);
        self.set_value_fraction((y - self.y0_track) / self.track_height())
    }

    pub fn within(&self, x: f64, y: f64) -> bool {
        self.rect.contains(x, y)
    }

    pub fn drawable(&self, curve_kind: CurveKind) -> bool {
        self.curve_kinds
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&curve_kind))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let Rect { x, y, width, height } = self.rect;
        draw_rect_outline(canvas, x, y, width, height, NORMAL_COLOUR);

        canvas.draw_line(
            Point2D::new(self.x_track, self.y0_track),
            Point2D::new(self.x_track, self.y1_track),
            BORDER_COLOUR,
        );

        // One notch per step
        let step_fraction = self.step_fraction();
        let notches = (1.0 / step_fraction + 1e-5).floor() as usize;
        for i in 0..=notches {
            let ny = self.y_position(i as f64 * step_fraction);
            canvas.draw_line(
                Point2D::new(self.x_track - 1.0, ny),
                Point2D::new(self.x_track + 2.0, ny),
                BORDER_COLOUR,
            );
        }

        let cx = x + width / 2.0;
        let half_margin = Self::Y_MARGIN / 2.0;
        canvas.draw_text(&self.label, Point2D::new(cx, y + height + half_margin), TextAnchor::Middle);
        canvas.draw_text(
            &format!("{:?}", self.max),
            Point2D::new(cx, y + height - half_margin),
            TextAnchor::Middle,
        );
        canvas.draw_text(
            &format!("{:?}", self.min),
            Point2D::new(cx, y + half_margin),
            TextAnchor::Middle,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;

    const EPS: f64 = 1e-9;

    fn slider(min: f64, max: f64, step: f64) -> SliderBox {
        let spec = SliderSpec::new(5.0, 5.0, "Test").range(min, max, step);
        SliderBox::new(spec, WidgetId::from_index(0)).unwrap()
    }

    #[test]
    fn test_half_step_rounds_up() {
        let mut a = slider(-1.0, 1.0, 0.1);
        a.set_value(0.05);
        let mut b = slider(-1.0, 1.0, 0.1);
        b.set_value(0.1);

        assert_eq!(a.fraction(), b.fraction());
        assert!((a.value() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_below_half_step_rounds_down() {
        let mut s = slider(-1.0, 1.0, 0.1);
        s.set_value(0.04);
        assert!((s.value() - 0.0).abs() < EPS);
    }

    #[test]
    fn test_quantization_idempotent() {
        let mut s = slider(1.0, 5.0, 0.25);
        for i in 0..=50 {
            s.set_value_fraction(i as f64 / 50.0);
            let once = s.fraction();
            s.set_value_fraction(once);
            assert_eq!(s.fraction(), once, "not idempotent for input {}", i);
        }
    }

    #[test]
    fn test_value_clamped_to_range() {
        let mut s = slider(0.0, 60.0, 5.0);
        s.set_value(1000.0);
        assert!((s.fraction() - 1.0).abs() < EPS);
        assert!((s.value() - 60.0).abs() < EPS);
        s.set_value(-4.0);
        assert_eq!(s.fraction(), 0.0);
    }

    #[test]
    fn test_uneven_step_never_exceeds_one() {
        let mut s = slider(0.0, 1.0, 0.3);
        s.set_value(1.0);
        assert!(s.fraction() <= 1.0);
        assert!((s.value() - 0.9).abs() < EPS);
    }

    #[test]
    fn test_drag_child_maps_track_to_fraction() {
        let mut s = slider(-1.0, 1.0, 1.0);
        // Track runs from y=25 to y=85
        s.drag_child(-100.0);
        assert_eq!(s.fraction(), 0.0);
        s.drag_child(1000.0);
        assert!((s.value() - 1.0).abs() < EPS);
        s.drag_child(56.0);
        assert!((s.value() - 0.0).abs() < EPS);
        assert!((s.handle_y() - 55.0).abs() < EPS);
    }

    #[test]
    fn test_binding_reports_dequantized_value() {
        let spec = SliderSpec::new(0.0, 0.0, "Speed")
            .range(1.0, 5.0, 0.25)
            .bound_to(SliderBinding::ScrollPeriod);
        let mut s = SliderBox::new(spec, WidgetId::from_index(0)).unwrap();
        let change = s.set_value(3.1).unwrap();
        assert_eq!(change.binding, SliderBinding::ScrollPeriod);
        assert!((change.value - 3.0).abs() < EPS);
    }

    #[test]
    fn test_unbound_slider_reports_nothing() {
        let mut s = slider(-1.0, 1.0, 0.1);
        assert!(s.set_value(0.5).is_none());
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let spec = SliderSpec::new(0.0, 0.0, "Broken").range(2.0, 2.0, 0.1);
        let err = SliderBox::new(spec, WidgetId::from_index(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let spec = SliderSpec::new(0.0, 0.0, "Broken").range(0.0, 1.0, 0.0);
        assert!(SliderBox::new(spec, WidgetId::from_index(0)).is_err());
    }

    #[test]
    fn test_visibility_follows_curve_kind() {
        let spec = SliderSpec::new(0.0, 0.0, "Tension")
            .range(-1.0, 1.0, 0.1)
            .only_for(&[CurveKind::Hermite]);
        let s = SliderBox::new(spec, WidgetId::from_index(0)).unwrap();
        assert!(s.drawable(CurveKind::Hermite));
        assert!(!s.drawable(CurveKind::Linear));
        assert!(slider(0.0, 1.0, 0.5).drawable(CurveKind::Linear));
    }

    #[test]
    fn test_draw_emits_notches_and_labels() {
        let s = slider(-1.0, 1.0, 1.0);
        let mut list = DrawList::new();
        s.draw(&mut list);
        // 4 border lines + track + 3 notches
        assert_eq!(list.lines().count(), 8);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Test", "1.0", "-1.0"]);
    }
}
