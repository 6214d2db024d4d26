// src/editor.rs
use std::collections::BTreeSet;

/// The editor operations the orchestrator relies on. Both must be safe to call
/// with no document loaded.
pub trait EditorSurface {
    /// Remove the error marker from every line that has one.
    fn clear_all_line_highlights(&mut self);

    /// Mark the line at `zero_based_index`. Indices past the end of the
    /// document are ignored.
    fn highlight_line(&mut self, zero_based_index: usize);
}

/// Makes the editor show exactly the desired highlight: the 1-based
/// `line_number` if present, otherwise nothing.
///
/// Holds no state of its own; it is always given the complete desired set.
pub fn apply_highlight<E: EditorSurface + ?Sized>(editor: &mut E, line_number: Option<u32>) {
    editor.clear_all_line_highlights();
    if let Some(index) = line_number.and_then(|line| line.checked_sub(1)) {
        editor.highlight_line(index as usize);
    }
}

/// Plain in-memory editor buffer used by the terminal front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferEditor {
    lines: Vec<String>,
    highlighted: BTreeSet<usize>,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    /// Replaces the document. Existing highlights are kept as-is; the next
    /// highlight sync decides what stays.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
        let len = self.lines.len();
        self.highlighted.retain(|&i| i < len);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Zero-based indices of currently highlighted lines.
    pub fn highlighted_lines(&self) -> Vec<usize> {
        self.highlighted.iter().copied().collect()
    }

    /// Numbered listing with `>>` in front of highlighted lines.
    pub fn render(&self) -> String {
        let width = self.lines.len().max(1).to_string().len();
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let marker = if self.highlighted.contains(&i) { ">>" } else { "  " };
                format!("{} {:>width$} | {}", marker, i + 1, line, width = width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl EditorSurface for BufferEditor {
    fn clear_all_line_highlights(&mut self) {
        self.highlighted.clear();
    }

    fn highlight_line(&mut self, zero_based_index: usize) {
        if zero_based_index < self.lines.len() {
            self.highlighted.insert(zero_based_index);
        } else {
            log::debug!(
                "Ignoring highlight for line index {} (document has {} lines)",
                zero_based_index,
                self.lines.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "a = np.array([1, 2])\nb = np.array([3, 4])\nc = np.add(a, b)";

    #[test]
    fn highlights_one_based_line() {
        let mut editor = BufferEditor::with_text(CODE);
        apply_highlight(&mut editor, Some(3));
        assert_eq!(editor.highlighted_lines(), vec![2]);
    }

    #[test]
    fn consecutive_applies_leave_at_most_one_line() {
        let mut editor = BufferEditor::with_text(CODE);
        apply_highlight(&mut editor, Some(1));
        apply_highlight(&mut editor, Some(2));
        assert_eq!(editor.highlighted_lines(), vec![1]);

        apply_highlight(&mut editor, None);
        assert!(editor.highlighted_lines().is_empty());
    }

    #[test]
    fn clearing_unmarked_or_empty_editor_is_noop() {
        let mut editor = BufferEditor::new();
        apply_highlight(&mut editor, None);
        apply_highlight(&mut editor, Some(4));
        assert!(editor.highlighted_lines().is_empty());
    }

    #[test]
    fn out_of_range_and_zero_lines_do_not_render() {
        let mut editor = BufferEditor::with_text(CODE);
        apply_highlight(&mut editor, Some(2));
        apply_highlight(&mut editor, Some(40));
        assert!(editor.highlighted_lines().is_empty());

        apply_highlight(&mut editor, Some(0));
        assert!(editor.highlighted_lines().is_empty());
    }

    #[test]
    fn render_marks_highlighted_line() {
        let mut editor = BufferEditor::with_text(CODE);
        apply_highlight(&mut editor, Some(2));
        let rendered = editor.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   1 |"));
        assert!(lines[1].starts_with(">> 2 | b = np.array"));
    }

    #[test]
    fn shrinking_document_drops_stale_highlights() {
        let mut editor = BufferEditor::with_text(CODE);
        apply_highlight(&mut editor, Some(3));
        editor.set_text("x = 1");
        assert!(editor.highlighted_lines().is_empty());
        assert_eq!(editor.line_count(), 1);
    }
}
