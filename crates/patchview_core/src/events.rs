//! Pointer events forwarded by the host

use crate::geometry::Point;

/// Mouse button identifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Map a host button index (0 = left, 1 = middle, 2 = right)
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other),
        }
    }
}

/// What happened to the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Press,
    Drag,
    Release,
    Move,
}

/// A single pointer event in host coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    pub button: MouseButton,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            button,
        }
    }

    pub fn press(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Press, x, y, MouseButton::Left)
    }

    pub fn drag(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Drag, x, y, MouseButton::Left)
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Release, x, y, MouseButton::Left)
    }

    /// Moves carry no button
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y, MouseButton::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_from_index() {
        assert_eq!(MouseButton::from_index(0), MouseButton::Left);
        assert_eq!(MouseButton::from_index(2), MouseButton::Right);
        assert_eq!(MouseButton::from_index(7), MouseButton::Other(7));
    }

    #[test]
    fn test_constructors() {
        let ev = PointerEvent::drag(3.0, 4.0);
        assert_eq!(ev.kind, PointerEventKind::Drag);
        assert_eq!(ev.position, Point::new(3.0, 4.0));
    }
}
