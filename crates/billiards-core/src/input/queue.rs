use glam::Vec2;

/// Input event types the simulation understands.
/// Pointer coordinates are in world units (table origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The charge button was pressed at (x, y).
    PointerDown { x: f32, y: f32 },
    /// The charge button was released at (x, y).
    PointerUp { x: f32, y: f32 },
    /// The pointer moved to (x, y).
    PointerMove { x: f32, y: f32 },
}

impl InputEvent {
    /// Pointer position carried by the event.
    pub fn pos(&self) -> Vec2 {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y } => Vec2::new(x, y),
        }
    }
}

/// A queue of input events.
/// The host pushes events as they arrive; the runner drains them once the
/// tick that consumed them has run.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
