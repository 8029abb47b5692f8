//! Ordered focus ring over region names.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusRing {
    names: Vec<String>,
    current: Option<usize>,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` if absent. The first name added takes focus.
    pub fn add(&mut self, name: &str) {
        if self.position(name).is_none() {
            self.names.push(name.to_string());
        }
        if self.current.is_none() {
            self.current = Some(0);
        }
    }

    pub fn remove(&mut self, name: &str) {
        let Some(idx) = self.position(name) else {
            return;
        };
        self.names.remove(idx);
        self.current = match self.current {
            _ if self.names.is_empty() => None,
            Some(cur) if cur > idx => Some(cur - 1),
            Some(cur) => Some(cur.min(self.names.len() - 1)),
            None => None,
        };
    }

    pub fn focus(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.current = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current
            .and_then(|idx| self.names.get(idx))
            .map(String::as_str)
    }

    pub fn is_focused(&self, name: &str) -> bool {
        self.current() == Some(name)
    }

    /// Advance with wrap-around.
    pub fn next(&mut self) -> Option<&str> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<&str> {
        self.step(self.names.len().saturating_sub(1))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.current = None;
    }

    fn step(&mut self, by: usize) -> Option<&str> {
        let len = self.names.len();
        if len == 0 {
            return None;
        }
        let next = (self.current.unwrap_or(0) + by) % len;
        self.current = Some(next);
        self.current()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
