//! Output emitter for rendered modules.

/// Sink for rendered text.
///
/// The renderer writes fragments, newlines and indentation; implementations
/// decide where the text goes.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (4 spaces per level).
    fn emit_indent(&mut self, level: usize);

    /// Emit one indented line.
    fn emit_line(&mut self, level: usize, text: &str) {
        if !text.is_empty() {
            self.emit_indent(level);
            self.emit(text);
        }
        self.emit_newline();
    }
}

/// In-memory emitter.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// The rendered text.
    pub fn output(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop trailing blank lines and end with exactly one newline.
    pub fn finish_lines(&mut self) {
        while self.buffer.ends_with("\n\n") || self.buffer.ends_with(" \n") {
            self.buffer.pop();
        }
        if !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * 4 {
            self.buffer.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_are_indented_by_four() {
        let mut emitter = StringEmitter::new();
        emitter.emit_line(0, "pub mod expr {");
        emitter.emit_line(1, "use super::*;");
        emitter.emit_line(1, "");
        emitter.emit_line(0, "}");
        assert_eq!(emitter.output(), "pub mod expr {\n    use super::*;\n\n}\n");
    }

    #[test]
    fn finish_lines_leaves_one_trailing_newline() {
        let mut emitter = StringEmitter::with_capacity(16);
        emitter.emit("enum A {}");
        emitter.emit_newline();
        emitter.emit_newline();
        emitter.emit_newline();
        emitter.finish_lines();
        assert_eq!(emitter.as_str(), "enum A {}\n");

        let mut bare = StringEmitter::new();
        bare.emit("x");
        bare.finish_lines();
        assert_eq!(bare.output(), "x\n");
    }
}
