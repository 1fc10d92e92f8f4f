//! Widget model: hit-testing, the press/drag/release gesture protocol and
//! parent/child drag delegation.
//!
//! Widgets live in a [`WidgetRegistry`] and are addressed by [`WidgetId`].
//! A slider's handle is registered as its own circle that knows its parent's
//! id; the parent owns the child's position.
//!
//! Hit-testing walks the registry in registration order and the first widget
//! whose bounds contain the point wins. There is no other z-order, so
//! overlapping widgets (a handle sitting on its slider's track) rely on the
//! child being registered first.

mod button;
mod circle;
mod label;
mod slider;

pub use button::{Button, ButtonAction};
pub use circle::Circle;
pub use label::Label;
pub use slider::{quantize_fraction, SliderBinding, SliderBox, SliderChange, SliderSpec};

use crate::canvas::Canvas;
use crate::interpolate::CurveKind;
use crate::Result;

/// Index of a widget in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Axis-aligned rectangle; containment excludes the boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.x + self.width && y > self.y && y < self.y + self.height
    }
}

/// Legal vertical range for dragging parentless widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBand {
    pub min_y: f64,
    pub max_y: f64,
}

impl DragBand {
    pub fn new(min_y: f64, max_y: f64) -> Self {
        Self { min_y, max_y }
    }

    pub fn clamp(&self, y: f64) -> f64 {
        y.clamp(self.min_y, self.max_y)
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Something the engine has to act on after a gesture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    Clicked(ButtonAction),
    SliderChanged(SliderChange),
    /// A control point handle bound to a curve buffer slot moved
    PointMoved { slot: usize, y: f64 },
}

#[derive(Debug, Clone)]
pub enum Widget {
    Circle(Circle),
    Label(Label),
    Button(Button),
    Slider(SliderBox),
}

impl Widget {
    pub fn within(&self, x: f64, y: f64) -> bool {
        match self {
            Widget::Circle(c) => c.within(x, y),
            Widget::Label(_) => false,
            Widget::Button(b) => b.within(x, y),
            Widget::Slider(s) => s.within(x, y),
        }
    }

    pub fn parent(&self) -> Option<WidgetId> {
        match self {
            Widget::Circle(c) => c.parent(),
            _ => None,
        }
    }

    /// Visibility ignoring any parent
    fn self_drawable(&self, curve_kind: CurveKind) -> bool {
        match self {
            Widget::Slider(s) => s.drawable(curve_kind),
            _ => true,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match self {
            Widget::Circle(c) => c.draw(canvas),
            Widget::Label(l) => l.draw(canvas),
            Widget::Button(b) => b.draw(canvas),
            Widget::Slider(s) => s.draw(canvas),
        }
    }
}

/// Owns every widget; registration order is hit-test and draw order
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn register(&mut self, widget: Widget) -> WidgetId {
        self.widgets.push(widget);
        WidgetId(self.widgets.len() - 1)
    }

    /// Register a slider and its handle, handle first, then apply the
    /// initial value. Nothing is registered if the slider parameters are invalid.
    pub fn add_slider(&mut self, spec: SliderSpec) -> Result<WidgetId> {
        let handle_id = WidgetId(self.widgets.len());
        let slider_id = WidgetId(handle_id.0 + 1);
        let initial = spec.value;

        let slider = SliderBox::new(spec, handle_id)?;
        let origin = slider.handle_origin();
        let handle = Circle::child_of(slider_id, origin.x, origin.y, SliderBox::HANDLE_RADIUS);

        self.widgets.push(Widget::Circle(handle));
        self.widgets.push(Widget::Slider(slider));
        self.set_slider_value(slider_id, initial);
        Ok(slider_id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget)> + '_ {
        self.widgets.iter().enumerate().map(|(i, w)| (WidgetId(i), w))
    }

    pub fn circle(&self, id: WidgetId) -> Option<&Circle> {
        match self.get(id) {
            Some(Widget::Circle(c)) => Some(c),
            _ => None,
        }
    }

    pub fn circle_mut(&mut self, id: WidgetId) -> Option<&mut Circle> {
        match self.get_mut(id) {
            Some(Widget::Circle(c)) => Some(c),
            _ => None,
        }
    }

    pub fn slider(&self, id: WidgetId) -> Option<&SliderBox> {
        match self.get(id) {
            Some(Widget::Slider(s)) => Some(s),
            _ => None,
        }
    }

    pub fn label_mut(&mut self, id: WidgetId) -> Option<&mut Label> {
        match self.get_mut(id) {
            Some(Widget::Label(l)) => Some(l),
            _ => None,
        }
    }

    /// First widget, in registration order, containing the point
    pub fn find_at(&self, x: f64, y: f64) -> Option<WidgetId> {
        self.widgets
            .iter()
            .position(|w| w.within(x, y))
            .map(WidgetId)
    }

    /// Like [`find_at`](Self::find_at) but skips widgets hidden for `curve_kind`
    pub fn find_visible_at(&self, x: f64, y: f64, curve_kind: CurveKind) -> Option<WidgetId> {
        self.iter()
            .find(|(id, w)| w.within(x, y) && self.drawable(*id, curve_kind))
            .map(|(id, _)| id)
    }

    /// Whether the widget should be drawn; children defer to their parent
    pub fn drawable(&self, id: WidgetId, curve_kind: CurveKind) -> bool {
        match self.get(id) {
            Some(widget) => match widget.parent() {
                Some(parent) => self.drawable(parent, curve_kind),
                None => widget.self_drawable(curve_kind),
            },
            None => false,
        }
    }

    pub fn press(&mut self, id: WidgetId) {
        match self.get_mut(id) {
            Some(Widget::Circle(c)) => c.press(),
            Some(Widget::Button(b)) => b.press(),
            _ => {}
        }
    }

    pub fn release(&mut self, id: WidgetId, x: f64, y: f64) -> Option<WidgetEvent> {
        match self.get_mut(id) {
            Some(Widget::Circle(c)) => {
                c.release();
                None
            }
            Some(Widget::Button(b)) => b.release(x, y).map(WidgetEvent::Clicked),
            _ => None,
        }
    }

    /// Drag a widget. Parented widgets forward to their parent; others move
    /// themselves within `band`.
    pub fn drag(&mut self, id: WidgetId, x: f64, y: f64, band: DragBand) -> Option<WidgetEvent> {
        if let Some(parent) = self.get(id).and_then(Widget::parent) {
            return self.drag_child(parent, id, x, y);
        }

        match self.get_mut(id) {
            Some(Widget::Circle(c)) => {
                let y = c.drag_to(y, band);
                c.slot().map(|slot| WidgetEvent::PointMoved { slot, y })
            }
            _ => None,
        }
    }

    /// Parent-side handling of a child drag
    pub fn drag_child(&mut self, parent: WidgetId, child: WidgetId, _x: f64, y: f64) -> Option<WidgetEvent> {
        let change = match self.get_mut(parent) {
            Some(Widget::Slider(s)) if s.handle() == child => s.drag_child(y),
            _ => return None,
        };
        self.sync_handle(parent);
        change.map(WidgetEvent::SliderChanged)
    }

    pub fn set_slider_value(&mut self, id: WidgetId, value: f64) -> Option<SliderChange> {
        let change = match self.get_mut(id) {
            Some(Widget::Slider(s)) => s.set_value(value),
            _ => return None,
        };
        self.sync_handle(id);
        change
    }

    /// Current value of a slider, 0 for anything else
    pub fn slider_value(&self, id: WidgetId) -> f64 {
        self.slider(id).map_or(0.0, SliderBox::value)
    }

    /// Move a slider's handle to match its fraction
    fn sync_handle(&mut self, slider: WidgetId) {
        let Some((handle, y)) = self.slider(slider).map(|s| (s.handle(), s.handle_y())) else {
            return;
        };
        if let Some(circle) = self.circle_mut(handle) {
            circle.centre.y = y;
        }
    }

    /// Draw every visible widget in registration order
    pub fn draw(&self, canvas: &mut dyn Canvas, curve_kind: CurveKind) {
        for (id, widget) in self.iter() {
            if self.drawable(id, curve_kind) {
                widget.draw(canvas);
            }
        }
    }
}
