//! Per-region double buffer.
//!
//! State machine:
//!
//! ```text
//! {front: -, back: -} --enqueue(X)--> {front: -, back: X}
//! {front: -, back: X} --refresh-----> {front: X, back: -}   => Promoted(X)
//! {front: X, back: -} --refresh-----> {front: X, back: -}   => Current(X)
//! {front: -, back: -} --refresh-----> unchanged             => Blank
//! ```
//!
//! Visibility is a separate flag; it never touches the stored content.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<T> {
    front: Option<T>,
    back: Option<T>,
    visible: bool,
}

/// What a refresh should put on screen.
#[derive(Debug, PartialEq, Eq)]
pub enum Refresh<'a, T> {
    /// New content was promoted from back to front.
    Promoted(&'a T),
    /// No new content; the current front is drawn again.
    Current(&'a T),
    /// Nothing has ever been queued: blank the area.
    Blank,
}

impl<'a, T> Refresh<'a, T> {
    pub fn content(&self) -> Option<&'a T> {
        match self {
            Refresh::Promoted(c) | Refresh::Current(c) => Some(c),
            Refresh::Blank => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Refresh::Promoted(_) => "promoted",
            Refresh::Current(_) => "current",
            Refresh::Blank => "blank",
        }
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Buffer<T> {
    pub fn new() -> Self {
        Self {
            front: None,
            back: None,
            visible: true,
        }
    }

    /// Queue content for the next refresh. Replaces anything already queued.
    pub fn enqueue(&mut self, content: T) {
        self.back = Some(content);
    }

    pub fn refresh(&mut self) -> Refresh<'_, T> {
        if let Some(back) = self.back.take() {
            return Refresh::Promoted(self.front.insert(back));
        }
        match self.front.as_ref() {
            Some(front) => Refresh::Current(front),
            None => Refresh::Blank,
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.front.as_ref()
    }

    pub fn back(&self) -> Option<&T> {
        self.back.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.back.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Flip visibility, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}
