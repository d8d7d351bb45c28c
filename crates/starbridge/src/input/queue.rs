use glam::Vec2;

/// Space bar; tosses every live star.
pub const KEY_SPACE: u32 = 32;

/// Keypoint indices in a 21-point hand skeleton.
pub const THUMB_TIP: usize = 4;
pub const INDEX_FINGER_TIP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Click or touch at canvas coordinates.
    PointerDown { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    /// Thumb tip and index fingertip of the tracked hand.
    HandPose { a: Vec2, b: Vec2 },
    HandLost,
}

impl InputEvent {
    /// Read thumb and index tips out of a flat `[x0, y0, x1, y1, ...]` array.
    /// `None` when the array is too short or not made of whole pairs.
    pub fn from_keypoints(flat: &[f32]) -> Option<Self> {
        let points: &[Vec2] = bytemuck::try_cast_slice(flat).ok()?;
        Some(InputEvent::HandPose {
            a: *points.get(THUMB_TIP)?,
            b: *points.get(INDEX_FINGER_TIP)?,
        })
    }

    /// Browsers only let audio start from a click or key press.
    pub fn is_user_gesture(&self) -> bool {
        matches!(self, InputEvent::PointerDown { .. } | InputEvent::KeyDown { .. })
    }
}

/// Events pushed by page handlers between frames, consumed in arrival order
/// by the next processed frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
