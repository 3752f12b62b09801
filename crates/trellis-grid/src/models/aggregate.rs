//! Footer aggregate configuration.
//!
//! Aggregate computation itself happens in the external data collaborator;
//! the grid only carries the configuration and hands it to the footer
//! renderer so the footer pass knows which summary cells to emit.

/// The summary an aggregate column requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Sum,
    Average,
    Min,
    Max,
    Count,
    TrueCount,
    FalseCount,
    Custom,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
            Self::TrueCount => "truecount",
            Self::FalseCount => "falsecount",
            Self::Custom => "custom",
        }
    }
}

/// One aggregate cell of a footer row.
#[derive(Debug, Clone)]
pub struct AggregateColumn {
    /// The data field to aggregate.
    pub field: String,
    /// The column the result is displayed in; defaults to `field`.
    pub column_name: Option<String>,
    pub kind: AggregateKind,
    /// Footer caption override.
    pub footer_text: Option<String>,
}

impl AggregateColumn {
    pub fn new(field: impl Into<String>, kind: AggregateKind) -> Self {
        Self {
            field: field.into(),
            column_name: None,
            kind,
            footer_text: None,
        }
    }

    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    /// The column this cell lands in.
    pub fn target_column(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.field)
    }

    /// Caption emitted into the footer cell.
    pub fn caption(&self) -> String {
        match &self.footer_text {
            Some(text) => text.clone(),
            None => format!("{}({})", self.kind.as_str(), self.field),
        }
    }
}

/// One footer row of aggregate cells.
#[derive(Debug, Clone, Default)]
pub struct AggregateRow {
    pub columns: Vec<AggregateColumn>,
}

impl AggregateRow {
    pub fn new(columns: Vec<AggregateColumn>) -> Self {
        Self { columns }
    }
}
