use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A problem found in a `.ks` file. The parser collects these next to the
/// tree it builds, so an error never stops the rest of the file from parsing.
/// An empty range at offset 0 marks a problem with the whole file, such as an
/// exhausted arena.
#[salsa::accumulator]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    /// Renders the message above the source line it points at.
    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label(self.label()))
                .fold(true),
        );
        renderer.render(message)
    }

    fn label(&self) -> &'static str {
        if self.range.is_empty() { "reported here" } else { "found here" }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.range, self.message)
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    #[test]
    fn plain_rendering_points_at_the_range() {
        let text = "def foo(a b) a\n";
        let diagnostic = Diagnostic::error(
            "Expected ')' or ',' in prototype",
            TextRange::at(TextSize::new(10), TextSize::new(1)),
        );

        let rendered = diagnostic.render(&Renderer::plain(), "test.ks", text).to_string();
        assert!(rendered.contains("error: Expected ')' or ',' in prototype"), "{rendered}");
        assert!(rendered.contains("test.ks:1:11"), "{rendered}");
        assert!(rendered.contains("found here"), "{rendered}");
    }

    #[test]
    fn display_is_range_then_message() {
        let diagnostic = Diagnostic::error("Unknown token!", TextRange::at(4.into(), 1.into()));
        assert_eq!(diagnostic.to_string(), "4..5: Unknown token!");
    }
}
