//! Column definitions for the grid.

/// One column of the grid.
///
/// Columns are addressed everywhere by their `field` identifier; event
/// payloads and menu targets carry the field string, never a reference to
/// this struct.
#[derive(Debug, Clone)]
pub struct Column {
    /// Unique field identifier within one grid instance.
    pub field: String,
    /// Header caption; falls back to the field identifier when unset.
    pub header_text: Option<String>,
    /// Whether the column is currently rendered.
    pub visible: bool,
    /// Whether the column chooser submenu lists this column.
    pub show_in_chooser: bool,
    /// Per-column sorting opt-out.
    pub allow_sorting: bool,
    /// Per-column grouping opt-out.
    pub allow_grouping: bool,
    /// Fixed width; `None` means auto-fit.
    pub width: Option<f32>,
}

impl Column {
    /// A visible, chooser-listed column with sorting and grouping allowed.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_text: None,
            visible: true,
            show_in_chooser: true,
            allow_sorting: true,
            allow_grouping: true,
            width: None,
        }
    }

    pub fn with_header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn without_chooser(mut self) -> Self {
        self.show_in_chooser = false;
        self
    }

    /// The caption shown in the header and in chooser entries.
    pub fn caption(&self) -> &str {
        self.header_text.as_deref().unwrap_or(&self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_falls_back_to_field() {
        let plain = Column::new("EmployeeID");
        assert_eq!(plain.caption(), "EmployeeID");

        let titled = Column::new("EmployeeID").with_header_text("Employee");
        assert_eq!(titled.caption(), "Employee");
    }
}
