/// The URL field. Stores whatever the user typed, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlInput {
    value: String,
}

impl UrlInput {
    pub const fn new() -> Self {
        Self {
            value: String::new(),
        }
    }

    pub fn current_value(&self) -> &str {
        &self.value
    }

    pub fn on_change(&mut self, new_value: impl Into<String>) {
        self.value = new_value.into();
    }

    pub fn push_char(&mut self, c: char) {
        let mut next = self.value.clone();
        next.push(c);
        self.on_change(next);
    }

    pub fn backspace(&mut self) {
        let mut next = self.value.clone();
        next.pop();
        self.on_change(next);
    }

    pub fn paste(&mut self, text: &str) {
        // Pasted links often carry a trailing newline
        let cleaned: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        self.on_change(format!("{}{cleaned}", self.value));
    }

    pub fn clear(&mut self) {
        self.on_change(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_values_verbatim() {
        let mut input = UrlInput::new();
        assert_eq!(input.current_value(), "");

        input.on_change("  https://youtu.be/abc ");
        assert_eq!(input.current_value(), "  https://youtu.be/abc ");

        input.on_change("");
        assert_eq!(input.current_value(), "");
    }

    #[test]
    fn editing_helpers() {
        let mut input = UrlInput::new();
        for c in "https://youtu.be/ab".chars() {
            input.push_char(c);
        }
        input.backspace();
        assert_eq!(input.current_value(), "https://youtu.be/a");

        input.paste("bc\n");
        assert_eq!(input.current_value(), "https://youtu.be/abc");

        input.clear();
        assert_eq!(input.current_value(), "");

        input.backspace();
        assert_eq!(input.current_value(), "");
    }
}
