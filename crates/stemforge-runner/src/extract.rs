use crate::error::PackerError;

/// Consumer for the tool's output lines, fed incrementally as they arrive.
pub trait LineSink {
    fn line(&mut self, line: &str);
}

/// Strategy for pulling a result value out of a single output line.
///
/// The tool reports some results only as free text in its output stream;
/// alternate marker formats plug in here without touching the runner.
pub trait OutputExtractor {
    /// Returns the extracted value when `line` matches, `None` otherwise.
    fn extract(&self, line: &str) -> Option<String>;
}

/// Matches any line containing a marker token and yields the trimmed
/// remainder of the line after it.
///
/// Matching is by containment, not full-line equality: machine-readable
/// output wraps the marker in comma-separated framing that varies between
/// tool versions.
pub struct MarkerExtractor {
    marker: String,
}

impl MarkerExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl OutputExtractor for MarkerExtractor {
    fn extract(&self, line: &str) -> Option<String> {
        let at = line.find(&self.marker)?;
        let value = line[at + self.marker.len()..].trim();
        (!value.is_empty()).then(|| value.to_owned())
    }
}

/// Sink that only echoes lines to the log, for builds whose result is not
/// carried in the output stream.
pub struct Echo;

impl LineSink for Echo {
    fn line(&mut self, line: &str) {
        tracing::info!(target: "packer", "{line}");
    }
}

/// Sink that echoes every line to the log and retains the first extractor
/// match. Later matches are ignored; the tool emits the result once.
pub struct Capture<X: OutputExtractor> {
    extractor: X,
    value: Option<String>,
}

impl<X: OutputExtractor> Capture<X> {
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            value: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Capture<MarkerExtractor> {
    /// Consume the capture, failing when no line matched the marker.
    ///
    /// A clean exit without the marker is a protocol mismatch, not a
    /// success: output content never implies anything on its own.
    pub fn into_value(self) -> Result<String, PackerError> {
        let marker = self.extractor.marker().to_owned();
        self.value.ok_or(PackerError::ResultNotFound { marker })
    }
}

impl<X: OutputExtractor> LineSink for Capture<X> {
    fn line(&mut self, line: &str) {
        tracing::info!(target: "packer", "{line}");
        if self.value.is_none() {
            self.value = self.extractor.extract(line);
        }
    }
}
