use tessera_core::events::{ListenerId, Listeners};
use tessera_core::input::MouseButton;
use tessera_core::math::{Rect, Vec2};

use crate::component::{Component, Update, UpdateCtx};

/// Pointer event raised by a [`Trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    /// The cursor moved into the area this frame.
    Enter,
    /// The cursor left the area this frame.
    Exit,
    /// The cursor is inside the area. Raised every frame, after `Enter`.
    Hover,
    /// A button went down while the cursor was inside.
    Click(MouseButton),
}

/// Listener signature for [`Trigger`] events.
pub type TriggerListener = dyn FnMut(&mut UpdateCtx<'_>, TriggerEvent);

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Rectangular pointer hit-area.
///
/// `bounds` is relative to the owner's world position; rotation and scale
/// are ignored. Input is polled once per update. While the window is
/// unfocused the cursor counts as outside and clicks are ignored.
#[derive(Debug)]
pub struct Trigger {
    pub bounds: Rect,
    listeners: Listeners<TriggerListener>,
    hovering: bool,
    held: [bool; 3],
}

impl Trigger {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            listeners: Listeners::new(),
            hovering: false,
            held: [false; 3],
        }
    }

    /// A trigger covering `size`, centered on the owner.
    pub fn centered(size: Vec2) -> Self {
        Self::new(Rect::centered(Vec2::ZERO, size))
    }

    /// Register a listener. Listeners run in registration order.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&mut UpdateCtx<'_>, TriggerEvent) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    fn poll(&mut self, ctx: &UpdateCtx<'_>) -> Vec<TriggerEvent> {
        let input = ctx.input();
        let origin = ctx.scene().global_position(ctx.owner()).unwrap_or(Vec2::ZERO);
        let focused = input.focused();
        let inside = focused && self.bounds.translated(origin).contains(input.cursor_world());

        let mut events = Vec::new();
        match (self.hovering, inside) {
            (false, true) => events.push(TriggerEvent::Enter),
            (true, false) => events.push(TriggerEvent::Exit),
            _ => {}
        }
        if inside {
            events.push(TriggerEvent::Hover);
        }
        for (held, button) in self.held.iter_mut().zip(BUTTONS) {
            let down = focused && input.mouse_down(button);
            if inside && down && !*held {
                events.push(TriggerEvent::Click(button));
            }
            *held = down;
        }
        self.hovering = inside;
        events
    }
}

impl Component for Trigger {
    fn type_name(&self) -> &'static str {
        "Trigger"
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        Some(self)
    }
}

impl Update for Trigger {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        for event in self.poll(ctx) {
            for listener in self.listeners.iter_mut() {
                listener(&mut *ctx, event);
            }
        }
    }
}
