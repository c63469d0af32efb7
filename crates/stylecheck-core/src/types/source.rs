//! Byte offset to line/column conversion.

/// Precomputed line start offsets for a source document.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index + 1),
        );
        Self { line_starts }
    }

    /// Number of lines (a trailing newline opens an empty final line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a 1-based line number.
    pub fn line(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line.saturating_sub(1).min(self.line_starts.len() - 1)]
    }

    /// Convert a byte offset into a 1-based (line, column) pair.
    ///
    /// Columns count characters, not bytes.
    pub fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(source.len());
        let line = self.line(offset);
        let start = self.line_start(line);
        let column = source[start..offset].chars().count() + 1;
        (line, column)
    }

    /// Cursor resolving positions of offsets visited in ascending order.
    pub fn cursor<'a>(&'a self, source: &'a str) -> PositionCursor<'a> {
        PositionCursor {
            index: self,
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Text of the given 1-based line, without its line terminator.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        let start = self.line_start(line);
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(source.len());
        source[start..end].trim_end_matches('\r')
    }
}

/// Incremental [`LineIndex::line_col`].
///
/// Each call only counts the characters between the previous offset and the
/// new one, so a run over ascending offsets costs time proportional to the
/// source length. Going backwards restarts from the line start.
#[derive(Debug, Clone)]
pub struct PositionCursor<'a> {
    index: &'a LineIndex,
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl PositionCursor<'_> {
    /// 1-based (line, column) of `offset`; columns count characters.
    pub fn position(&mut self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self.index.line(offset);
        if line != self.line || offset < self.offset {
            self.line = line;
            self.offset = self.index.line_start(line);
            self.column = 1;
        }
        self.column += self.source[self.offset..offset].chars().count();
        self.offset = offset;
        (self.line, self.column)
    }
}
