//! Engine state and the callbacks a host drives it through.
//!
//! The [`Engine`] owns the control points, the widgets and the scroll clock.
//! A host (the terminal front end, or a test) forwards resize, draw, key,
//! pointer and timer events; the engine never reaches out to the host except
//! through its [`Scheduler`] and the [`Canvas`] handed to [`Engine::on_draw`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::buffer::CurveBuffer;
use crate::canvas::{Canvas, NORMAL_COLOUR};
use crate::clip::Viewport;
use crate::clock::ScrollClock;
use crate::config::{AppConfig, CurveConfig, CurveMode, SlidersConfig};
use crate::interpolate::{CurveKind, HermiteParams};
use crate::render::{render_curve, CurveStyle};
use crate::vector::Point2D;
use crate::widget::{
    Button, ButtonAction, Circle, DragBand, Label, Rect, SliderBinding, SliderChange, SliderSpec,
    Widget, WidgetEvent, WidgetId, WidgetRegistry,
};
use crate::Result;

/// Tick rates at or below this magnitude stop the timer
const MIN_TICK_RATE: f64 = 1e-5;

/// Radius of a draggable fixed-mode control point. Larger than a slider
/// handle so a press anywhere in the terminal cell under the point hits it.
pub const POINT_HANDLE_RADIUS: f64 = 10.0;

/// Periodic timer owned by the engine
pub trait Scheduler {
    /// Fire every `interval`, replacing any previous schedule
    fn schedule_interval(&mut self, interval: Duration);

    fn unschedule(&mut self);
}

/// Keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Widget ids the engine needs to reach after layout
#[derive(Debug, Clone, Default)]
struct Layout {
    curve_label: Option<WidgetId>,
    tension: Option<WidgetId>,
    bias: Option<WidgetId>,
    speed: Option<WidgetId>,
    direction: Option<WidgetId>,
    updates: Option<WidgetId>,
    /// Fixed mode: handle for each buffer slot
    point_handles: Vec<WidgetId>,
}

/// Slider-backed parameters carried across a relayout
#[derive(Debug, Clone, Copy)]
struct Params {
    tension: f64,
    bias: f64,
    period: f64,
    direction: f64,
    tick_rate: f64,
}

pub struct Engine<S: Scheduler> {
    scheduler: S,
    curve: CurveConfig,
    slider_ranges: SlidersConfig,
    mode: CurveMode,
    curve_kind: CurveKind,
    widgets: WidgetRegistry,
    layout: Layout,
    buffer: CurveBuffer,
    clock: ScrollClock,
    rng: StdRng,
    width: f64,
    height: f64,
    viewport: Viewport,
    section_width: f64,
    band: DragBand,
    selected: Option<WidgetId>,
    tick_rate: f64,
}

impl<S: Scheduler> Engine<S> {
    pub fn new(config: &AppConfig, width: f64, height: f64, scheduler: S) -> Result<Self> {
        config.validate()?;
        let curve = config.curve.clone();

        let rng = match config.general.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let clock = ScrollClock::new(
            curve.scroll_period_secs,
            curve.scroll_direction,
            curve.subdivisions,
            curve.display_sections,
        )?;
        let capacity = match curve.mode {
            CurveMode::Scrolling => curve.curve_points(),
            CurveMode::Fixed => curve.fixed_points,
        };

        let mut engine = Self {
            scheduler,
            mode: curve.mode,
            curve_kind: curve.initial_kind(),
            slider_ranges: config.sliders.clone(),
            widgets: WidgetRegistry::new(),
            layout: Layout::default(),
            buffer: CurveBuffer::with_capacity(capacity),
            clock,
            rng,
            width: 0.0,
            height: 0.0,
            viewport: Viewport::new(0.0, 0.0),
            section_width: 0.0,
            band: DragBand::new(0.0, 0.0),
            selected: None,
            tick_rate: 0.0,
            curve,
        };
        engine.set_geometry(width, height);

        for _ in 0..capacity {
            let y = engine.random_y();
            engine.buffer.push_back(Point2D::new(0.0, y));
        }
        engine.layout_points();

        let params = Params {
            tension: engine.curve.tension,
            bias: engine.curve.bias,
            period: engine.curve.scroll_period_secs,
            direction: engine.curve.scroll_direction,
            tick_rate: engine.curve.tick_rate,
        };
        engine.build_widgets(params)?;

        let shown = engine.hermite_params();
        for (name, wanted, got) in [
            ("tension", params.tension, shown.tension),
            ("bias", params.bias, shown.bias),
        ] {
            if (wanted - got).abs() > 1e-9 {
                warn!("Configured {} {} adjusted to {} by its slider", name, wanted, got);
            }
        }

        info!(
            "Engine started in {} mode with {} curve, {} points",
            engine.mode,
            engine.curve_kind,
            engine.buffer.len()
        );
        Ok(engine)
    }

    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    pub fn curve_kind(&self) -> CurveKind {
        self.curve_kind
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn buffer(&self) -> &CurveBuffer {
        &self.buffer
    }

    pub fn clock(&self) -> &ScrollClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selected
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn band(&self) -> DragBand {
        self.band
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn hermite_params(&self) -> HermiteParams {
        let value = |id: Option<WidgetId>| id.map_or(0.0, |id| self.widgets.slider_value(id));
        HermiteParams {
            tension: value(self.layout.tension),
            bias: value(self.layout.bias),
        }
    }

    /// Slider driving `binding`, if this mode has one
    pub fn slider_for(&self, binding: SliderBinding) -> Option<WidgetId> {
        match binding {
            SliderBinding::ScrollPeriod => self.layout.speed,
            SliderBinding::ScrollDirection => self.layout.direction,
            SliderBinding::TickRate => self.layout.updates,
        }
    }

    pub fn tension_slider(&self) -> Option<WidgetId> {
        self.layout.tension
    }

    pub fn bias_slider(&self) -> Option<WidgetId> {
        self.layout.bias
    }

    /// Fixed mode: the handle mirroring buffer slot `slot`
    pub fn point_handle(&self, slot: usize) -> Option<WidgetId> {
        self.layout.point_handles.get(slot).copied()
    }

    fn set_geometry(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        match self.mode {
            CurveMode::Scrolling => {
                let x0 = self.curve.x_margin;
                let x1 = (self.width - self.curve.x_margin).max(x0);
                self.viewport = Viewport::new(x0, x1);
                self.section_width = (x1 - x0) / self.curve.display_sections as f64;
                self.band = DragBand::new(self.curve.y_margin, self.curve.y_margin + self.curve.height);
            }
            CurveMode::Fixed => {
                self.viewport = Viewport::new(0.0, self.width);
                self.section_width = self.width / (self.buffer.capacity() + 1) as f64;
                let mid = self.height / 2.0;
                let border = self.curve.fixed_border;
                self.band = DragBand::new(border.min(mid), (self.height - border).max(mid));
            }
        }
    }

    fn random_y(&mut self) -> f64 {
        self.rng.gen_range(self.band.min_y..=self.band.max_y)
    }

    /// Recompute every point's x from its slot and the scroll phase
    fn layout_points(&mut self) {
        match self.mode {
            CurveMode::Scrolling => {
                let w = self.section_width;
                let x_start = self.viewport.x0 - w * (1.0 + self.clock.step_fraction());
                self.buffer.layout_x(x_start, w);
            }
            CurveMode::Fixed => {
                let w = self.section_width;
                self.buffer.layout_x(w, w);
            }
        }
    }

    fn current_params(&self) -> Params {
        let HermiteParams { tension, bias } = self.hermite_params();
        Params {
            tension,
            bias,
            period: self.clock.period(),
            direction: self.clock.direction(),
            tick_rate: self.tick_rate,
        }
    }

    /// Register every widget for the current size, in hit-test order
    fn build_widgets(&mut self, params: Params) -> Result<()> {
        let mut widgets = WidgetRegistry::new();
        let mut layout = Layout::default();
        let (w, h) = (self.width, self.height);

        // Control point handles come first so they win over anything they overlap
        if self.mode == CurveMode::Fixed {
            for (slot, p) in self.buffer.iter().enumerate() {
                let circle = Circle::for_slot(slot, p.x, p.y, POINT_HANDLE_RADIUS);
                layout.point_handles.push(widgets.register(Widget::Circle(circle)));
            }
        }

        layout.curve_label = Some(widgets.register(Widget::Label(Label::new(
            w / 2.0,
            h - 15.0,
            format!("Curve: {}", self.curve_kind.label()),
        ))));

        let b1x = ((w - 225.0) / 2.0).floor();
        widgets.register(Widget::Button(Button::new(
            Rect::new(b1x, 5.0, 100.0, Button::DEFAULT_HEIGHT),
            "Randomise",
            ButtonAction::Randomise,
        )));
        widgets.register(Widget::Button(Button::new(
            Rect::new(b1x + 105.0, 5.0, 120.0, Button::DEFAULT_HEIGHT),
            "Change Curve Type",
            ButtonAction::NextCurveType,
        )));

        let ranges = self.slider_ranges.clone();
        let hermite_only = [CurveKind::Hermite];
        layout.tension = Some(widgets.add_slider(
            SliderSpec::new(5.0, 5.0, "Tension")
                .range(ranges.tension.min, ranges.tension.max, ranges.tension.step)
                .value(params.tension)
                .only_for(&hermite_only),
        )?);
        layout.bias = Some(widgets.add_slider(
            SliderSpec::new(5.0, 130.0, "Bias")
                .range(ranges.bias.min, ranges.bias.max, ranges.bias.step)
                .value(params.bias)
                .only_for(&hermite_only),
        )?);

        if self.mode == CurveMode::Scrolling {
            let x = w - 45.0;
            layout.speed = Some(widgets.add_slider(
                SliderSpec::new(x, 5.0, "Speed")
                    .range(ranges.speed.min, ranges.speed.max, ranges.speed.step)
                    .value(params.period)
                    .bound_to(SliderBinding::ScrollPeriod),
            )?);
            layout.direction = Some(widgets.add_slider(
                SliderSpec::new(x, 130.0, "Direction")
                    .range(ranges.direction.min, ranges.direction.max, ranges.direction.step)
                    .value(params.direction)
                    .bound_to(SliderBinding::ScrollDirection),
            )?);
            layout.updates = Some(widgets.add_slider(
                SliderSpec::new(x, 255.0, "Updates")
                    .range(ranges.updates.min, ranges.updates.max, ranges.updates.step)
                    .value(params.tick_rate)
                    .bound_to(SliderBinding::TickRate),
            )?);
        }

        self.widgets = widgets;
        self.layout = layout;
        self.sync_from_sliders(params);
        Ok(())
    }

    /// Make the clock and timer match what the sliders show
    fn sync_from_sliders(&mut self, params: Params) {
        match self.layout.speed {
            Some(id) => self.set_period(self.widgets.slider_value(id)),
            None => self.set_period(params.period),
        }
        match self.layout.direction {
            Some(id) => self.clock.set_direction(self.widgets.slider_value(id)),
            None => self.clock.set_direction(params.direction),
        }
        match self.layout.updates {
            Some(id) => self.set_tick_rate(self.widgets.slider_value(id)),
            None => self.set_tick_rate(params.tick_rate),
        }
    }

    fn set_period(&mut self, period: f64) {
        if let Err(e) = self.clock.set_period(period) {
            warn!("Ignoring scroll period: {}", e);
        }
    }

    /// Reschedule the scroll timer. Fixed mode never ticks.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.tick_rate = rate;
        self.scheduler.unschedule();
        if self.mode == CurveMode::Fixed {
            return;
        }
        if rate.abs() > MIN_TICK_RATE {
            let interval = Duration::from_secs_f64(1.0 / rate.abs());
            self.scheduler.schedule_interval(interval);
            info!("Scroll timer scheduled every {:?}", interval);
        } else {
            info!("Scroll timer stopped");
        }
    }

    /// Re-roll every control point's height within the band
    pub fn randomise(&mut self) {
        let ys: Vec<f64> = (0..self.buffer.len()).map(|_| self.random_y()).collect();
        for (point, y) in self.buffer.iter_mut().zip(ys) {
            point.y = y;
        }
        self.sync_point_handles();
        debug!("Randomised {} control points", self.buffer.len());
    }

    pub fn next_curve_kind(&mut self) {
        self.curve_kind = self.curve_kind.next();
        if let Some(label) = self.layout.curve_label.and_then(|id| self.widgets.label_mut(id)) {
            label.set_text(format!("Curve: {}", self.curve_kind.label()));
        }
        info!("Curve kind changed to {}", self.curve_kind);
    }

    /// Fixed mode: move each handle onto its buffer point
    fn sync_point_handles(&mut self) {
        for (slot, id) in self.layout.point_handles.iter().enumerate() {
            if let (Some(point), Some(circle)) = (self.buffer.get(slot), self.widgets.circle_mut(*id)) {
                circle.centre = point;
            }
        }
    }

    /// Advance the scroll by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if self.mode != CurveMode::Scrolling {
            return;
        }
        if let Some(end) = self.clock.tick(dt) {
            let y = self.random_y();
            self.buffer.push(end, Point2D::new(0.0, y));
            debug!("Section boundary crossed, new point at {:?} (y = {:.1})", end, y);
        }
        self.layout_points();
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        let params = self.current_params();
        self.set_geometry(width, height);

        if self.mode == CurveMode::Fixed {
            let band = self.band;
            for point in self.buffer.iter_mut() {
                point.y = band.clamp(point.y);
            }
        }
        self.layout_points();

        if self.selected.take().is_some() {
            debug!("Resize cancelled the active gesture");
        }
        if let Err(e) = self.build_widgets(params) {
            warn!("Failed to lay out widgets after resize: {}", e);
        }
        debug!("Resized to {}x{}", self.width, self.height);
    }

    /// Curve first, widgets on top
    pub fn on_draw(&self, canvas: &mut dyn Canvas) {
        let style = CurveStyle::new(self.curve_kind, self.curve.subdivisions)
            .with_hermite(self.hermite_params());
        let points = self.buffer.to_vec();
        let sections = points.len().saturating_sub(1);
        render_curve(canvas, &points, sections, style, self.viewport, NORMAL_COLOUR);
        self.widgets.draw(canvas, self.curve_kind);
    }

    pub fn on_key_press(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Escape | Key::Char('q') => return KeyOutcome::Quit,
            Key::Char('r') => self.randomise(),
            Key::Char('c') | Key::Tab => self.next_curve_kind(),
            _ => {}
        }
        KeyOutcome::Continue
    }

    pub fn on_mouse_press(&mut self, x: f64, y: f64, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let Some(id) = self.widgets.find_visible_at(x, y, self.curve_kind) else {
            return;
        };

        // A press on a slider's track selects its handle; the value only
        // follows a subsequent drag
        let id = self.widgets.slider(id).map_or(id, |s| s.handle());
        self.widgets.press(id);
        self.selected = Some(id);
        debug!("Pressed widget {:?} at ({:.1}, {:.1})", id, x, y);
    }

    pub fn on_mouse_drag(&mut self, x: f64, y: f64, _dx: f64, _dy: f64, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let Some(id) = self.selected else {
            return;
        };
        if let Some(event) = self.widgets.drag(id, x, y, self.band) {
            self.apply(event);
        }
    }

    pub fn on_mouse_release(&mut self, x: f64, y: f64, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let Some(id) = self.selected.take() else {
            return;
        };
        if let Some(event) = self.widgets.release(id, x, y) {
            self.apply(event);
        }
        debug!("Released widget {:?}", id);
    }

    fn apply(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Clicked(ButtonAction::Randomise) => self.randomise(),
            WidgetEvent::Clicked(ButtonAction::NextCurveType) => self.next_curve_kind(),
            WidgetEvent::SliderChanged(change) => self.apply_slider_change(change),
            WidgetEvent::PointMoved { slot, y } => {
                if let Some(point) = self.buffer.get_mut(slot) {
                    point.y = y;
                }
            }
        }
    }

    fn apply_slider_change(&mut self, change: SliderChange) {
        match change.binding {
            SliderBinding::ScrollPeriod => {
                self.set_period(change.value);
                debug!("Scroll period set to {:.2}s", self.clock.period());
            }
            SliderBinding::ScrollDirection => {
                self.clock.set_direction(change.value);
                debug!("Scroll direction set to {}", self.clock.direction());
            }
            SliderBinding::TickRate => {
                if (change.value - self.tick_rate).abs() > MIN_TICK_RATE {
                    self.set_tick_rate(change.value);
                }
            }
        }
    }
}
