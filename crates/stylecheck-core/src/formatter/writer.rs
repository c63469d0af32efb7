//! Line-oriented output buffer.

use crate::parser::ast::Comment;

/// Builds formatted output one line at a time.
///
/// The current line stays open so that commas, terminators and trailing
/// comments can be appended to it. A line ending in a `--` comment is closed
/// for appends: anything pushed afterwards starts a new line.
#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    indent: usize,
    line_comment_open: bool,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new line at `indent` columns.
    pub fn line(&mut self, indent: usize, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(&" ".repeat(indent));
        self.out.push_str(text);
        self.indent = indent;
        self.line_comment_open = false;
    }

    /// Append to the current line.
    pub fn push(&mut self, text: &str) {
        if self.line_comment_open {
            let indent = self.indent;
            self.line(indent, text.trim_start());
        } else {
            self.out.push_str(text);
        }
    }

    /// Emit `count` empty lines.
    pub fn blank_lines(&mut self, count: usize) {
        if self.out.is_empty() {
            return;
        }
        for _ in 0..count {
            self.out.push('\n');
        }
    }

    /// Comments that precede an anchor, one per line.
    pub fn leading(&mut self, indent: usize, comments: &[Comment]) {
        for comment in comments {
            self.line(indent, &comment.text);
            self.line_comment_open = comment.is_line_comment();
        }
    }

    /// Comments that follow an anchor on its line.
    pub fn trailing(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.push(" ");
            self.push(&comment.text);
            self.line_comment_open = comment.is_line_comment();
        }
    }

    /// Mark the current line as ending in a line comment.
    pub fn close_line(&mut self) {
        self.line_comment_open = true;
    }

    /// Statement terminator, on its own line if the current one ends in a
    /// line comment.
    pub fn terminator(&mut self) {
        if self.line_comment_open {
            self.line(0, ";");
        } else {
            self.out.push(';');
        }
    }

    /// The output with exactly one trailing newline, or empty.
    pub fn finish(mut self) -> String {
        if self.out.is_empty() {
            return self.out;
        }
        self.out.push('\n');
        self.out
    }
}
