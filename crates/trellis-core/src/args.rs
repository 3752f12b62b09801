//! Shared event payload passed through the notification bus.

use crate::module::ModuleKind;

/// The kind of data operation an action requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Searching,
    Sorting,
    Filtering,
    Grouping,
    Ungrouping,
    Refresh,
}

impl RequestType {
    /// Stable string key used in payloads and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::Sorting => "sorting",
            Self::Filtering => "filtering",
            Self::Grouping => "grouping",
            Self::Ungrouping => "ungrouping",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a payload describes the start or the completion of an action.
///
/// Begin semantics travel inside the `modelChanged` payload rather than as
/// a separate event; this field carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Begin,
    Complete,
}

/// The mutable payload shared by publisher and handlers during one dispatch.
///
/// Publishing is fire-and-forget: nothing is returned to the publisher
/// except mutations handlers make to this struct. The `disabled` and
/// `cancel` fields exist for exactly that write-back pattern, used with
/// [`NotifyBus::request`](crate::NotifyBus::request).
#[derive(Debug, Clone, Default)]
pub struct NotifyArgs {
    /// The data operation this payload belongs to.
    pub request_type: Option<RequestType>,
    /// Begin/complete marker for action lifecycle payloads.
    pub phase: Option<ActionPhase>,
    /// The module this payload addresses or originates from.
    pub module: Option<ModuleKind>,
    /// Active search key, for searching payloads.
    pub search_string: Option<String>,
    /// Target column, referenced by field identifier, never by capture.
    pub column_field: Option<String>,
    /// Menu or dialog item identifier.
    pub item_id: Option<String>,
    /// Written by listeners to veto a cancelable operation.
    pub cancel: bool,
    /// Enable flag for `uiUpdate` payloads.
    pub enable: bool,
    /// Written by listeners answering a disabled-state query.
    pub disabled: bool,
}

impl NotifyArgs {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload addressed to one module.
    pub fn for_module(module: ModuleKind) -> Self {
        Self {
            module: Some(module),
            ..Self::default()
        }
    }

    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = Some(request_type);
        self
    }

    pub fn with_phase(mut self, phase: ActionPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_search_string(mut self, key: impl Into<String>) -> Self {
        self.search_string = Some(key.into());
        self
    }

    pub fn with_column_field(mut self, field: impl Into<String>) -> Self {
        self.column_field = Some(field.into());
        self
    }

    pub fn with_item_id(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }
}
