//! Output capture for script runs
//!
//! The interpreter never writes to a global stream. Every print-style call is
//! handed to the [`OutputSink`] injected for that run; [`CaptureSink`] is the
//! default implementation and simply records the lines in order.

/// Destination for the lines a script prints
pub trait OutputSink {
    /// Record one print-style call; `line` is the space-joined argument text
    fn write_line(&mut self, line: &str);
}

impl<F: FnMut(&str)> OutputSink for F {
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}

/// Records printed lines for one run
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Vec<String>,
}

impl CaptureSink {
    pub fn new() -> Self {
        CaptureSink { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputSink for CaptureSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_preserves_order() {
        let mut sink = CaptureSink::new();
        sink.write_line("first");
        sink.write_line("");
        sink.write_line("third");
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.into_lines(), ["first", "", "third"]);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |line: &str| seen.push(line.to_uppercase());
            sink.write_line("hi");
        }
        assert_eq!(seen, ["HI"]);
    }
}
