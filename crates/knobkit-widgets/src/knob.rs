//! The knob widget facade.
//!
//! `Knob` owns everything one dial needs: value model, interaction state,
//! layout, offscreen buffer, brushes and observers. Hosts feed it events and
//! call [`Knob::paint`] when they repaint.

use kurbo::Size;
use knobkit_core::{
    ApproxTextMeasure, EventResponse, FocusEvent, Interaction, InteractionPhase, Key, KeyEvent,
    KnobBrushes, KnobConfiguration, KnobState, Layout, Observers, PointerEvent, SubscriptionId,
    TextMeasure, ValueModel,
};
use knobkit_render::{KnobRenderer, OffscreenBuffer, RenderContext, Renderer, Surface};

/// Side length of a freshly created knob.
pub const DEFAULT_SIZE: f64 = 150.0;

/// Size- and colour-dependent paint resources, released on dispose.
struct Resources {
    buffer: OffscreenBuffer,
    brushes: KnobBrushes,
}

/// A rotary dial.
pub struct Knob {
    model: ValueModel,
    interaction: Interaction,
    size: Size,
    layout: Layout,
    resources: Option<Resources>,
    renderer: KnobRenderer,
    measure: Box<dyn TextMeasure>,
    observers: Observers<Knob>,
    needs_redraw: bool,
}

impl Default for Knob {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Knob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Knob")
            .field("value", &self.model.value())
            .field("phase", &self.interaction.phase())
            .field("size", &self.size)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Knob {
    /// A default knob measuring labels with [`ApproxTextMeasure`].
    pub fn new() -> Self {
        Self::with_measure(Box::new(ApproxTextMeasure::default()))
    }

    /// A default knob measuring labels with `measure`.
    pub fn with_measure(measure: Box<dyn TextMeasure>) -> Self {
        Self::with_config(KnobConfiguration::default(), measure)
    }

    /// A knob starting from `config`, value at its minimum.
    pub fn with_config(config: KnobConfiguration, measure: Box<dyn TextMeasure>) -> Self {
        let model = ValueModel::with_config(config);
        let size = Size::new(DEFAULT_SIZE, DEFAULT_SIZE);
        let layout = Layout::compute(model.config(), size, measure.as_ref());
        let resources = Resources {
            buffer: OffscreenBuffer::new(size),
            brushes: KnobBrushes::new(model.config(), layout.face),
        };
        let mut knob = Self {
            model,
            interaction: Interaction::new(),
            size,
            layout,
            resources: Some(resources),
            renderer: KnobRenderer::new(),
            measure,
            observers: Observers::new(),
            needs_redraw: true,
        };
        // Construction is not a change anyone could have observed
        knob.model.take_pending();
        knob
    }

    // --- queries ---------------------------------------------------------

    pub fn config(&self) -> &KnobConfiguration {
        self.model.config()
    }

    pub fn value(&self) -> i32 {
        self.model.value()
    }

    pub fn state(&self) -> KnobState {
        KnobState {
            value: self.model.value(),
            focused: self.interaction.is_focused(),
            rotating: self.interaction.is_rotating(),
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.interaction.phase()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether something changed since the last paint.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn is_disposed(&self) -> bool {
        self.resources.is_none()
    }

    /// The frame painted last, if the knob is still alive.
    pub fn frame(&self) -> Option<&OffscreenBuffer> {
        self.resources.as_ref().map(|r| &r.buffer)
    }

    /// Whether the host should deliver `key` to the knob instead of using it
    /// for focus navigation.
    pub fn wants_key(&self, key: &Key) -> bool {
        key.is_arrow()
    }

    // --- configuration ---------------------------------------------------

    /// Set the value through the non-clamping path.
    pub fn set_value(&mut self, value: i32) {
        self.model.set_value(value);
        self.apply_configuration_change();
    }

    /// Set the value through the clamping path.
    pub fn set_proper_value(&mut self, value: i64) {
        self.model.set_proper_value(value);
        self.apply_configuration_change();
    }

    /// Change configuration through the model's setters, then apply.
    ///
    /// ```ignore
    /// knob.configure(|m| {
    ///     m.set_maximum(255);
    ///     m.set_show_small_scale(true);
    /// });
    /// ```
    pub fn configure<R>(&mut self, f: impl FnOnce(&mut ValueModel) -> R) -> R {
        let result = f(&mut self.model);
        self.apply_configuration_change();
        result
    }

    /// Raw access to the model. Changes take effect on the next
    /// [`Knob::apply_configuration_change`].
    pub fn value_model_mut(&mut self) -> &mut ValueModel {
        &mut self.model
    }

    /// Drain the model's pending invalidation: relayout, schedule a redraw
    /// and notify observers once per accepted value write.
    pub fn apply_configuration_change(&mut self) {
        let pending = self.model.take_pending();
        if pending.is_empty() {
            return;
        }
        if pending.relayout {
            self.relayout();
        }
        if pending.redraw {
            self.needs_redraw = true;
        }
        for _ in 0..pending.value_changes {
            self.notify();
        }
    }

    /// Resize. The height always follows the width.
    pub fn resize(&mut self, size: Size) {
        let side = size.width.max(0.0);
        self.size = Size::new(side, side);
        log::debug!("Knob resized to {side}x{side}");
        self.relayout();
        self.needs_redraw = true;
    }

    /// Recompute the layout if the last measurement fell back to the
    /// approximate measurer. Returns whether a relayout happened.
    pub fn refresh_layout(&mut self) -> bool {
        if self.layout.measured {
            return false;
        }
        self.relayout();
        self.needs_redraw = true;
        true
    }

    fn relayout(&mut self) {
        self.layout = Layout::compute(self.model.config(), self.size, self.measure.as_ref());
        if let Some(resources) = self.resources.as_mut() {
            resources.buffer = OffscreenBuffer::new(self.size);
            resources.brushes = KnobBrushes::new(self.model.config(), self.layout.face);
        }
    }

    // --- events ----------------------------------------------------------

    /// Handle a pointer event in widget-local coordinates.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> EventResponse {
        let response =
            self.interaction
                .handle_pointer_event(event, &mut self.model, &self.layout);
        self.apply_configuration_change();
        response
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) -> EventResponse {
        let response = self.interaction.handle_key_event(event, &mut self.model);
        self.apply_configuration_change();
        response
    }

    pub fn handle_focus_event(&mut self, event: FocusEvent) {
        self.interaction.handle_focus_event(event, &mut self.model);
        self.apply_configuration_change();
    }

    // --- observers -------------------------------------------------------

    /// Call `callback` after every accepted value write.
    pub fn subscribe(&mut self, callback: impl FnMut(&Knob) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self) {
        let mut observers = std::mem::take(&mut self.observers);
        observers.emit(self);
        self.observers = observers;
    }

    // --- painting --------------------------------------------------------

    /// Paint a complete frame offscreen and blit it onto `surface`.
    ///
    /// Faults are logged; the knob stays usable.
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        let Some(Resources { buffer, brushes }) = self.resources.as_mut() else {
            log::debug!("Ignoring paint request for a disposed knob");
            return;
        };
        let ctx = RenderContext::new(
            self.model.config(),
            &self.layout,
            brushes,
            self.measure.as_ref(),
        )
        .with_value(self.model.value())
        .with_focus(self.interaction.is_focused());
        self.renderer.build_frame(&ctx, buffer);
        if let Err(e) = surface.blit(buffer) {
            log::warn!("Failed to blit knob frame: {e}");
        }
        self.needs_redraw = false;
    }

    /// Release the offscreen buffer, brushes and observers.
    pub fn dispose(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("Knob disposed");
        }
        self.observers.clear();
        self.needs_redraw = false;
    }
}
