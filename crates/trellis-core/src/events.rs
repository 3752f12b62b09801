//! Event names published on the notification bus.
//!
//! These string constants are the stable wire contract between the host
//! widget and its optional modules. Modules subscribe by name; nothing in
//! the core enumerates or validates the set, so hosts may introduce their
//! own names alongside these.

/// Raised once at the start of the initial render, before the default
/// renderers are registered. Modules that substitute renderers must react
/// here to win the first-write race in the renderer factory.
pub const INITIAL_LOAD: &str = "initialLoad";

/// Raised once after the default renderers are registered.
pub const INITIAL_END: &str = "initialEnd";

/// Raised after each header render pass.
pub const HEADER_REFRESHED: &str = "headerRefreshed";

/// Raised when a module is enabled or disabled at runtime and the UI needs
/// to be rebuilt for it. The payload carries the module and the enable flag.
pub const UI_UPDATE: &str = "uiUpdate";

/// Raised once when the host widget is torn down, before the destroyed flag
/// is set, so modules can still unsubscribe.
pub const DESTROY: &str = "destroy";

/// A settings section owned by a module changed on the host. The payload
/// names the owning module.
pub const IN_BOUND_MODEL_CHANGED: &str = "inBoundModelChanged";

/// A data re-bind is starting. Carries the request type and the action
/// phase (begin semantics travel inside this event's payload).
pub const MODEL_CHANGED: &str = "modelChanged";

/// An action finished end-to-end. Cross-cutting concerns (spinners,
/// announcements) subscribe here instead of to action-specific names.
pub const ACTION_COMPLETE: &str = "actionComplete";

/// A pending action was cancelled; modules reset their settings field.
pub const CANCEL_BEGIN: &str = "cancelBegin";

/// Informational: an action was deferred because a batch edit is open.
pub const PREVENT_BATCH: &str = "preventBatch";

/// The batch edit closed; deferred commands are replayed after this fires.
pub const BATCH_END: &str = "batchEnd";

/// The data collaborator finished binding the current request.
pub const DATA_BOUND: &str = "dataBound";

/// The column menu is opening for a target column. Dispatched through
/// [`NotifyBus::request`](crate::NotifyBus::request) so listeners can write
/// `cancel` back into the payload.
pub const COLUMN_MENU_OPEN: &str = "columnMenuOpen";

/// A column menu item was selected. Carries the resolved target column.
pub const COLUMN_MENU_CLICK: &str = "columnMenuClick";

/// A filter editor should open for the payload's column.
pub const FILTER_OPEN: &str = "filterOpen";

/// The external filter dialog finished construction.
pub const FILTER_DIALOG_CREATED: &str = "filterDialogCreated";

/// A search data bind completed; the search module republishes this as
/// [`ACTION_COMPLETE`].
pub const SEARCH_COMPLETE: &str = "searchComplete";

/// Generic double-click, republished by modules that own the raw UI wiring.
pub const DBLCLICK: &str = "dblclick";

/// Raw double-click input on the header, before any module claims it.
pub const HEADER_DBLCLICK: &str = "headerDblClick";
