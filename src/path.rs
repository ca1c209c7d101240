//! Path tracker: a live JSONPath mirroring the scope stack.
//!
//! A small `Vec`-backed stack, in the same idiom this crate uses for
//! `ScopeStack`.

/// One path-stack frame, parallel to a container scope frame.
pub(crate) enum PathFrame {
    /// Next index to be rendered for this array level.
    Array(u64),
    /// Last name read at this object level; `None` before any name has
    /// been read since entering the object.
    Object(Option<String>),
}

pub(crate) struct PathStack {
    frames: Vec<PathFrame>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub(crate) fn push_array(&mut self) {
        self.frames.push(PathFrame::Array(0));
    }

    pub(crate) fn push_object(&mut self) {
        self.frames.push(PathFrame::Object(None));
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Records the name just read at the innermost object level.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        if let Some(PathFrame::Object(slot)) = self.frames.last_mut() {
            *slot = Some(name.into());
        }
    }

    /// Records the `null` placeholder used when a name is consumed
    /// without being read back to the caller (`skip_value` over an
    /// object entry).
    pub(crate) fn set_skipped_name(&mut self) {
        self.set_name("null");
    }

    /// Bumps the innermost array level's counter. Called only after a
    /// value has been *fully* consumed, never on peek.
    pub(crate) fn increment_array_counter(&mut self) {
        if let Some(PathFrame::Array(n)) = self.frames.last_mut() {
            *n += 1;
        }
    }

    pub(crate) fn path(&self) -> String {
        self.render(false)
    }

    /// The path as it appeared immediately before the most recent
    /// value-advancing step: the innermost array counter (if the
    /// innermost frame is an array) is rendered one lower; object names
    /// are never rolled back.
    pub(crate) fn previous_path(&self) -> String {
        self.render(true)
    }

    fn render(&self, previous: bool) -> String {
        let mut out = String::from("$");
        let last = self.frames.len().checked_sub(1);
        for (i, frame) in self.frames.iter().enumerate() {
            match frame {
                PathFrame::Array(n) => {
                    let shown = if previous && Some(i) == last {
                        n.saturating_sub(1)
                    } else {
                        *n
                    };
                    out.push('[');
                    out.push_str(&shown.to_string());
                    out.push(']');
                }
                PathFrame::Object(name) => {
                    out.push('.');
                    if let Some(name) = name {
                        out.push_str(name);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_dollar() {
        assert_eq!(PathStack::new().path(), "$");
    }

    #[test]
    fn array_counter_renders_and_increments() {
        let mut p = PathStack::new();
        p.push_array();
        assert_eq!(p.path(), "$[0]");
        p.increment_array_counter();
        assert_eq!(p.path(), "$[1]");
    }

    #[test]
    fn object_without_name_renders_dot() {
        let mut p = PathStack::new();
        p.push_object();
        assert_eq!(p.path(), "$.");
        p.set_name("a");
        assert_eq!(p.path(), "$.a");
    }

    #[test]
    fn skipped_name_renders_null() {
        let mut p = PathStack::new();
        p.push_object();
        p.set_skipped_name();
        assert_eq!(p.path(), "$.null");
    }

    #[test]
    fn previous_path_rolls_back_only_innermost_array() {
        let mut p = PathStack::new();
        p.push_object();
        p.set_name("a");
        p.push_array();
        p.increment_array_counter();
        p.increment_array_counter();
        assert_eq!(p.path(), "$.a[2]");
        assert_eq!(p.previous_path(), "$.a[1]");
    }

    #[test]
    fn deeply_nested_array_path() {
        let mut p = PathStack::new();
        for _ in 0..40 {
            p.push_array();
        }
        let expected = format!("${}", "[0]".repeat(40));
        assert_eq!(p.path(), expected);
    }

    #[test]
    fn scenario_one_path_walk() {
        // {"a":[2,true,false,null,"b",{"c":"d"},[3]]}
        let mut p = PathStack::new();
        assert_eq!(p.path(), "$");
        p.push_object();
        assert_eq!(p.path(), "$.");
        p.set_name("a");
        assert_eq!(p.path(), "$.a");
        p.push_array();
        assert_eq!(p.path(), "$.a[0]");
        p.increment_array_counter(); // 2
        assert_eq!(p.path(), "$.a[1]");
        p.increment_array_counter(); // true
        assert_eq!(p.path(), "$.a[2]");
        p.increment_array_counter(); // false
        assert_eq!(p.path(), "$.a[3]");
        p.increment_array_counter(); // null
        assert_eq!(p.path(), "$.a[4]");
        p.increment_array_counter(); // "b"
        assert_eq!(p.path(), "$.a[5]");
        p.push_object();
        assert_eq!(p.path(), "$.a[5].");
        p.set_name("c");
        assert_eq!(p.path(), "$.a[5].c");
        p.pop(); // end inner object
        p.increment_array_counter(); // {"c":"d"} consumed
        assert_eq!(p.path(), "$.a[6]");
        p.push_array();
        assert_eq!(p.path(), "$.a[6][0]");
        p.increment_array_counter(); // 3
        assert_eq!(p.path(), "$.a[6][1]");
        p.pop(); // end inner array
        p.increment_array_counter(); // [3] consumed
        assert_eq!(p.path(), "$.a[7]");
        p.pop(); // end outer array
        assert_eq!(p.path(), "$.a");
        p.pop(); // end outer object
        assert_eq!(p.path(), "$");
    }
}
