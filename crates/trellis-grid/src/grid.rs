//! The grid host widget.
//!
//! The host owns the coordination pieces (bus, locator, renderer factory,
//! capability registry) and raises the lifecycle events modules react to.
//! It performs no feature logic itself: sorting, grouping, filtering and
//! searching semantics live in optional modules or external collaborators;
//! the host only keeps the settings sections, the single-in-flight data
//! bind guard, and the batch deferral queue they coordinate through.
//!
//! # Lifecycle
//!
//! [`Grid::initial_render`] publishes `initialLoad` (renderer substitution
//! window), registers the default renderers, publishes `initialEnd`, runs
//! the first render pass, and requests the initial data bind. The external
//! data collaborator answers every bind with [`Grid::data_bound`].
//! [`Grid::destroy`] publishes `destroy`, flags the instance, and clears
//! bus, locator and modules; it is idempotent.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use trellis_core::{
    ActionModule, ActionPhase, CapabilityRegistry, HandlerId, ModuleKind, NotifyArgs, NotifyBus,
    RenderTarget, RendererFactory, RequestType, Result, ServiceLocator, events,
};

use crate::actions::{ColumnMenu, ColumnMenuEntry, Freeze, Search};
use crate::models::{
    AggregateRow, Column, FilterDescriptor, FilterMode, FilterSettings, GroupSettings,
    SearchSettings, SortDescriptor, SortDirection, SortSettings,
};
use crate::render::{ContentRender, FooterRender, HeaderRender, RenderContext, Renderer};
use crate::services::{Localization, names};

const TARGET: &str = "trellis_grid::grid";

/// A deferred action captured while a batch edit holds the grid.
///
/// An explicit command object (operation plus arguments) rather than a
/// captured closure, so the queue is inspectable and replayed verbatim on
/// `batchEnd`.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCommand {
    Search { key: String },
    Sort { field: String, direction: SortDirection },
    ClearSort,
    Group { field: String },
    Ungroup { field: String },
    Filter { field: String, value: String },
}

/// Counters exposed for tests and diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridStats {
    /// Full data re-binds requested.
    pub data_binds: u64,
    /// Light refresh passes (no re-bind).
    pub refreshes: u64,
    /// Render passes executed.
    pub render_passes: u64,
}

/// Configuration for one grid instance.
///
/// Immutable input to [`Grid::new`]; feature modules are opted in through
/// the explicit `inject` list and constructed in list order, which is also
/// what decides who wins the renderer-factory race.
pub struct GridConfig {
    id: String,
    columns: Vec<Column>,
    inject: Vec<ModuleKind>,
    allow_sorting: bool,
    allow_grouping: bool,
    allow_filtering: bool,
    filter_mode: FilterMode,
    frozen_columns: usize,
    frozen_rows: usize,
    column_menu_items: Option<Vec<ColumnMenuEntry>>,
    aggregates: Vec<AggregateRow>,
    locale_overrides: HashMap<String, String>,
}

impl GridConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: Vec::new(),
            inject: Vec::new(),
            allow_sorting: false,
            allow_grouping: false,
            allow_filtering: false,
            filter_mode: FilterMode::default(),
            frozen_columns: 0,
            frozen_rows: 0,
            column_menu_items: None,
            aggregates: Vec::new(),
            locale_overrides: HashMap::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Opt a module in. Order matters: modules construct in list order.
    pub fn inject(mut self, kind: ModuleKind) -> Self {
        self.inject.push(kind);
        self
    }

    pub fn allow_sorting(mut self, allow: bool) -> Self {
        self.allow_sorting = allow;
        self
    }

    pub fn allow_grouping(mut self, allow: bool) -> Self {
        self.allow_grouping = allow;
        self
    }

    pub fn allow_filtering(mut self, allow: bool) -> Self {
        self.allow_filtering = allow;
        self
    }

    pub fn filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    pub fn frozen_columns(mut self, count: usize) -> Self {
        self.frozen_columns = count;
        self
    }

    pub fn frozen_rows(mut self, count: usize) -> Self {
        self.frozen_rows = count;
        self
    }

    /// Replace the default column menu item list.
    pub fn column_menu_items(mut self, items: Vec<ColumnMenuEntry>) -> Self {
        self.column_menu_items = Some(items);
        self
    }

    pub fn with_aggregate_row(mut self, row: AggregateRow) -> Self {
        self.aggregates.push(row);
        self
    }

    /// Override one localized text constant for this instance.
    pub fn locale_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.locale_overrides.insert(key.into(), text.into());
        self
    }

    pub fn build(self) -> Result<Grid> {
        Grid::new(self)
    }
}

pub(crate) struct GridShared {
    id: String,
    bus: NotifyBus,
    locator: ServiceLocator,
    capabilities: CapabilityRegistry,
    factory: Arc<RendererFactory<dyn Renderer>>,
    destroyed: AtomicBool,
    batch_open: AtomicBool,
    /// The single in-flight data bind, if any.
    in_flight: Mutex<Option<RequestType>>,
    pending: Mutex<Vec<PendingCommand>>,
    columns: RwLock<Vec<Column>>,
    search: RwLock<SearchSettings>,
    sort: RwLock<SortSettings>,
    group: RwLock<GroupSettings>,
    filter: RwLock<FilterSettings>,
    aggregates: RwLock<Vec<AggregateRow>>,
    allow_sorting: AtomicBool,
    allow_grouping: AtomicBool,
    allow_filtering: AtomicBool,
    frozen_columns: usize,
    frozen_rows: usize,
    column_menu_items: Option<Vec<ColumnMenuEntry>>,
    modules: Mutex<Vec<Arc<dyn ActionModule>>>,
    stats: Mutex<GridStats>,
}

/// Cheap shared handle to one grid instance.
///
/// Clones share state. Modules hold [`GridWeak`] instead, so closures kept
/// alive by the bus never keep the widget alive.
#[derive(Clone)]
pub struct Grid {
    shared: Arc<GridShared>,
}

/// Weak counterpart of [`Grid`] for bus-owned closures.
#[derive(Clone)]
pub struct GridWeak {
    shared: Weak<GridShared>,
}

impl GridWeak {
    pub fn upgrade(&self) -> Option<Grid> {
        self.shared.upgrade().map(|shared| Grid { shared })
    }
}

impl Grid {
    /// Construct a grid: register the per-instance services, then construct
    /// the injected modules in order.
    pub fn new(config: GridConfig) -> Result<Self> {
        let factory: Arc<RendererFactory<dyn Renderer>> = Arc::new(RendererFactory::new());
        let shared = Arc::new(GridShared {
            id: config.id,
            bus: NotifyBus::new(),
            locator: ServiceLocator::new(),
            capabilities: CapabilityRegistry::new(),
            factory: factory.clone(),
            destroyed: AtomicBool::new(false),
            batch_open: AtomicBool::new(false),
            in_flight: Mutex::new(None),
            pending: Mutex::new(Vec::new()),
            columns: RwLock::new(config.columns),
            search: RwLock::new(SearchSettings::default()),
            sort: RwLock::new(SortSettings::default()),
            group: RwLock::new(GroupSettings::default()),
            filter: RwLock::new(FilterSettings {
                mode: config.filter_mode,
                columns: Vec::new(),
            }),
            aggregates: RwLock::new(config.aggregates),
            allow_sorting: AtomicBool::new(config.allow_sorting),
            allow_grouping: AtomicBool::new(config.allow_grouping),
            allow_filtering: AtomicBool::new(config.allow_filtering),
            frozen_columns: config.frozen_columns,
            frozen_rows: config.frozen_rows,
            column_menu_items: config.column_menu_items,
            modules: Mutex::new(Vec::new()),
            stats: Mutex::new(GridStats::default()),
        });
        let grid = Grid { shared };

        grid.shared.locator.register(
            names::LOCALIZATION,
            Arc::new(Localization::new(config.locale_overrides)),
        )?;
        grid.shared
            .locator
            .register(names::RENDERER_FACTORY, factory)?;

        for kind in config.inject {
            grid.shared.capabilities.register(kind);
            if grid.module(kind).is_some() {
                continue;
            }
            let module: Option<Arc<dyn ActionModule>> = match kind {
                ModuleKind::Search => Some(Search::construct(&grid)),
                ModuleKind::ColumnMenu => Some(ColumnMenu::construct(&grid)),
                ModuleKind::Freeze => Some(Freeze::construct(&grid)),
                // Capability-only injections: the feature's domain logic is
                // an external collaborator, but its presence must still be
                // discoverable at event time.
                _ => None,
            };
            if let Some(module) = module {
                grid.shared.modules.lock().push(module);
            }
        }
        tracing::debug!(target: TARGET, id = %grid.shared.id, "grid constructed");
        Ok(grid)
    }

    pub fn downgrade(&self) -> GridWeak {
        GridWeak {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    // ------------------------------------------------------------------
    // Notification bus facade. Every touchpoint consults the destroyed
    // flag before (un)registering or dispatching.
    // ------------------------------------------------------------------

    /// Subscribe to a bus event. Returns `None` once destroyed.
    pub fn on<F>(&self, event: &'static str, handler: F) -> Option<HandlerId>
    where
        F: Fn(&mut NotifyArgs) + Send + Sync + 'static,
    {
        if self.is_destroyed() {
            return None;
        }
        Some(self.shared.bus.subscribe(event, handler))
    }

    /// Unsubscribe from a bus event.
    pub fn off(&self, event: &str, id: HandlerId) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.shared.bus.unsubscribe(event, id)
    }

    /// Publish a bus event.
    pub fn notify(&self, event: &str, args: &mut NotifyArgs) {
        if self.is_destroyed() {
            return;
        }
        self.shared.bus.publish(event, args);
    }

    /// Publish and return the payload with handler-written results.
    pub fn request(&self, event: &str, args: NotifyArgs) -> NotifyArgs {
        if self.is_destroyed() {
            return args;
        }
        self.shared.bus.request(event, args)
    }

    // ------------------------------------------------------------------
    // Shared coordination state.
    // ------------------------------------------------------------------

    pub fn locator(&self) -> &ServiceLocator {
        &self.shared.locator
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.shared.capabilities
    }

    pub fn renderer_factory(&self) -> &RendererFactory<dyn Renderer> {
        &self.shared.factory
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.load(Ordering::SeqCst)
    }

    /// Whether actions must defer instead of requesting a data bind: a
    /// batch edit is open or a bind is already in flight.
    pub fn is_action_prevented(&self) -> bool {
        self.shared.batch_open.load(Ordering::SeqCst) || self.shared.in_flight.lock().is_some()
    }

    /// The module of `kind`, if it was injected with a concrete
    /// implementation.
    pub fn module(&self, kind: ModuleKind) -> Option<Arc<dyn ActionModule>> {
        self.shared
            .modules
            .lock()
            .iter()
            .find(|module| module.module_kind() == kind)
            .cloned()
    }

    fn typed_module<T: Send + Sync + 'static>(&self, kind: ModuleKind) -> Option<Arc<T>> {
        self.module(kind)?.as_any_arc().downcast::<T>().ok()
    }

    /// Typed handle to the column menu module.
    pub fn column_menu(&self) -> Option<Arc<ColumnMenu>> {
        self.typed_module(ModuleKind::ColumnMenu)
    }

    pub fn stats(&self) -> GridStats {
        *self.shared.stats.lock()
    }

    // ------------------------------------------------------------------
    // Columns and settings sections.
    // ------------------------------------------------------------------

    pub fn columns(&self) -> Vec<Column> {
        self.shared.columns.read().clone()
    }

    /// Resolve a column by its field identifier.
    pub fn column(&self, field: &str) -> Option<Column> {
        self.shared
            .columns
            .read()
            .iter()
            .find(|column| column.field == field)
            .cloned()
    }

    pub fn sort_settings(&self) -> SortSettings {
        self.shared.sort.read().clone()
    }

    pub fn group_settings(&self) -> GroupSettings {
        self.shared.group.read().clone()
    }

    pub fn filter_settings(&self) -> FilterSettings {
        self.shared.filter.read().clone()
    }

    pub fn search_key(&self) -> String {
        self.shared.search.read().key.clone()
    }

    pub fn allow_sorting(&self) -> bool {
        self.shared.allow_sorting.load(Ordering::SeqCst)
    }

    pub fn allow_grouping(&self) -> bool {
        self.shared.allow_grouping.load(Ordering::SeqCst)
    }

    pub fn allow_filtering(&self) -> bool {
        self.shared.allow_filtering.load(Ordering::SeqCst)
    }

    pub fn set_allow_sorting(&self, allow: bool) {
        self.shared.allow_sorting.store(allow, Ordering::SeqCst);
        self.raise_ui_update(ModuleKind::Sort, allow);
    }

    pub fn set_allow_grouping(&self, allow: bool) {
        self.shared.allow_grouping.store(allow, Ordering::SeqCst);
        self.raise_ui_update(ModuleKind::Group, allow);
    }

    pub fn set_allow_filtering(&self, allow: bool) {
        self.shared.allow_filtering.store(allow, Ordering::SeqCst);
        self.raise_ui_update(ModuleKind::Filter, allow);
    }

    fn raise_ui_update(&self, module: ModuleKind, enable: bool) {
        let mut args = NotifyArgs::for_module(module).with_enable(enable);
        self.notify(events::UI_UPDATE, &mut args);
    }

    pub fn frozen_columns(&self) -> usize {
        self.shared.frozen_columns
    }

    pub fn frozen_rows(&self) -> usize {
        self.shared.frozen_rows
    }

    pub(crate) fn column_menu_entries(&self) -> Option<Vec<ColumnMenuEntry>> {
        self.shared.column_menu_items.clone()
    }

    // ------------------------------------------------------------------
    // Lifecycle.
    // ------------------------------------------------------------------

    /// Run the initial render sequence.
    ///
    /// `initialLoad` fires before the default renderers register, which is
    /// the window a substitution module (freeze) uses to win the factory's
    /// first-write race. Ends by requesting the initial data bind; the
    /// data collaborator must answer with [`data_bound`](Self::data_bound).
    pub fn initial_render(&self) -> Result<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.notify(events::INITIAL_LOAD, &mut NotifyArgs::new());

        let factory = &self.shared.factory;
        factory.add_renderer(RenderTarget::Header, Arc::new(HeaderRender));
        factory.add_renderer(RenderTarget::Content, Arc::new(ContentRender));
        factory.add_renderer(RenderTarget::Footer, Arc::new(FooterRender));

        self.notify(events::INITIAL_END, &mut NotifyArgs::new());
        self.render()?;
        self.data_bind(RequestType::Refresh);
        Ok(())
    }

    /// Run one render pass over all targets.
    ///
    /// Aborts with `RendererNotRegistered` if a target has no renderer;
    /// that is a fatal configuration error, not a recoverable state.
    pub fn render(&self) -> Result<RenderContext> {
        let mut ctx = RenderContext {
            columns: self.columns(),
            frozen_columns: self.shared.frozen_columns,
            frozen_rows: self.shared.frozen_rows,
            aggregates: self.shared.aggregates.read().clone(),
            ops: Vec::new(),
        };
        if self.is_destroyed() {
            return Ok(ctx);
        }
        for target in RenderTarget::ALL {
            let renderer = self.shared.factory.get_renderer(target)?;
            renderer.render(&mut ctx)?;
            if target == RenderTarget::Header {
                self.notify(events::HEADER_REFRESHED, &mut NotifyArgs::new());
            }
        }
        self.shared.stats.lock().render_passes += 1;
        Ok(ctx)
    }

    /// Light path: re-render without a data bind.
    pub fn refresh(&self) -> Result<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.shared.stats.lock().refreshes += 1;
        tracing::debug!(target: TARGET, id = %self.shared.id, "refresh");
        self.render()?;
        Ok(())
    }

    /// Request a full data re-bind.
    ///
    /// Only one bind may be in flight per instance; a second request is
    /// rejected and returns `false`. Modules are expected to consult
    /// [`is_action_prevented`](Self::is_action_prevented) and defer first,
    /// so a rejection here indicates a contract violation.
    pub fn data_bind(&self, request_type: RequestType) -> bool {
        if self.is_destroyed() {
            return false;
        }
        {
            let mut in_flight = self.shared.in_flight.lock();
            if let Some(current) = *in_flight {
                tracing::warn!(
                    target: TARGET,
                    id = %self.shared.id,
                    current = %current,
                    requested = %request_type,
                    "bind rejected, one already in flight"
                );
                return false;
            }
            *in_flight = Some(request_type);
        }
        self.shared.stats.lock().data_binds += 1;

        let mut args = NotifyArgs::new()
            .with_request_type(request_type)
            .with_phase(ActionPhase::Begin);
        if request_type == RequestType::Searching {
            args.search_string = Some(self.search_key());
        }
        self.notify(events::MODEL_CHANGED, &mut args);
        true
    }

    /// Completion callback for the external data collaborator.
    ///
    /// Publishes `dataBound`, then the completion event for the finished
    /// request: `searchComplete` for searches (the search module
    /// republishes it as `actionComplete`), `actionComplete` otherwise.
    pub fn data_bound(&self) {
        if self.is_destroyed() {
            return;
        }
        let Some(request_type) = self.shared.in_flight.lock().take() else {
            return;
        };
        self.notify(
            events::DATA_BOUND,
            &mut NotifyArgs::new().with_request_type(request_type),
        );
        match request_type {
            RequestType::Searching => self.notify(
                events::SEARCH_COMPLETE,
                &mut NotifyArgs::new().with_request_type(request_type),
            ),
            _ => self.notify(
                events::ACTION_COMPLETE,
                &mut NotifyArgs::new()
                    .with_request_type(request_type)
                    .with_phase(ActionPhase::Complete),
            ),
        }
        // A finished bind may unblock commands deferred while it ran.
        self.drain_pending();
    }

    /// Cancel the pending request of `request_type`, if any.
    ///
    /// Clears the in-flight guard and publishes `cancelBegin`; the owning
    /// module resets its settings field, so no partial result survives.
    pub fn cancel_action(&self, request_type: RequestType) {
        if self.is_destroyed() {
            return;
        }
        {
            let mut in_flight = self.shared.in_flight.lock();
            if *in_flight == Some(request_type) {
                *in_flight = None;
            }
        }
        self.notify(
            events::CANCEL_BEGIN,
            &mut NotifyArgs::new().with_request_type(request_type),
        );
    }

    // ------------------------------------------------------------------
    // Batch edits and deferred commands.
    // ------------------------------------------------------------------

    /// Open the action-prevention window of a batch edit.
    pub fn begin_batch(&self) {
        if self.is_destroyed() {
            return;
        }
        self.shared.batch_open.store(true, Ordering::SeqCst);
    }

    /// Close the batch window, publish `batchEnd`, and replay the deferred
    /// commands in the order they were queued.
    pub fn end_batch(&self) {
        if self.is_destroyed() {
            return;
        }
        if !self.shared.batch_open.swap(false, Ordering::SeqCst) {
            return;
        }
        self.notify(events::BATCH_END, &mut NotifyArgs::new());
        self.drain_pending();
    }

    /// Replay queued commands in order until the queue empties or a replay
    /// starts a bind; [`data_bound`](Self::data_bound) resumes the rest.
    fn drain_pending(&self) {
        loop {
            if self.shared.batch_open.load(Ordering::SeqCst)
                || self.shared.in_flight.lock().is_some()
            {
                return;
            }
            let command = {
                let mut pending = self.shared.pending.lock();
                if pending.is_empty() {
                    None
                } else {
                    Some(pending.remove(0))
                }
            };
            let Some(command) = command else {
                return;
            };
            tracing::debug!(target: TARGET, id = %self.shared.id, ?command, "replaying deferred command");
            self.replay(command);
        }
    }

    /// Queue a command to replay when the batch closes.
    pub fn defer_command(&self, command: PendingCommand) {
        self.shared.pending.lock().push(command);
    }

    /// Number of queued deferred commands.
    pub fn pending_commands(&self) -> usize {
        self.shared.pending.lock().len()
    }

    fn replay(&self, command: PendingCommand) {
        match command {
            PendingCommand::Search { key } => self.search(&key),
            PendingCommand::Sort { field, direction } => self.sort_column(&field, direction),
            PendingCommand::ClearSort => self.clear_sort(),
            PendingCommand::Group { field } => self.group_column(&field),
            PendingCommand::Ungroup { field } => self.ungroup_column(&field),
            PendingCommand::Filter { field, value } => self.filter_by(&field, &value),
        }
    }

    // ------------------------------------------------------------------
    // Actions. The grid owns only the settings bookkeeping; semantics
    // live in modules or external collaborators.
    // ------------------------------------------------------------------

    /// Search grid records by key. Delegates to the search module.
    pub fn search(&self, key: &str) {
        match self.typed_module::<Search>(ModuleKind::Search) {
            Some(module) => module.search(key),
            None => {
                tracing::warn!(target: TARGET, id = %self.shared.id, "search module not injected")
            }
        }
    }

    pub(crate) fn set_search_key(&self, key: &str) {
        self.shared.search.write().key = key.to_owned();
        let mut args = NotifyArgs::for_module(ModuleKind::Search).with_search_string(key);
        self.notify(events::IN_BOUND_MODEL_CHANGED, &mut args);
    }

    /// Clear the search key without raising a model change.
    pub(crate) fn reset_search_key(&self) {
        self.shared.search.write().key.clear();
    }

    /// Sort by one column, replacing the current sort descriptors.
    pub fn sort_column(&self, field: &str, direction: SortDirection) {
        if self.is_destroyed() || !self.guard_column(field) {
            return;
        }
        if !self.allow_sorting() {
            tracing::warn!(target: TARGET, field, "sorting is not allowed");
            return;
        }
        if self.is_action_prevented() {
            self.defer_command(PendingCommand::Sort {
                field: field.to_owned(),
                direction,
            });
            self.notify(
                events::PREVENT_BATCH,
                &mut NotifyArgs::new().with_request_type(RequestType::Sorting),
            );
            return;
        }
        self.shared.sort.write().columns = vec![SortDescriptor {
            field: field.to_owned(),
            direction,
        }];
        self.data_bind(RequestType::Sorting);
    }

    /// Remove every sort descriptor.
    pub fn clear_sort(&self) {
        if self.is_destroyed() {
            return;
        }
        if self.is_action_prevented() {
            self.defer_command(PendingCommand::ClearSort);
            return;
        }
        self.shared.sort.write().columns.clear();
        self.data_bind(RequestType::Sorting);
    }

    /// Group by a column. No-op if the column is already grouped.
    pub fn group_column(&self, field: &str) {
        if self.is_destroyed() || !self.guard_column(field) {
            return;
        }
        if !self.allow_grouping() {
            tracing::warn!(target: TARGET, field, "grouping is not allowed");
            return;
        }
        if self.is_action_prevented() {
            self.defer_command(PendingCommand::Group {
                field: field.to_owned(),
            });
            self.notify(
                events::PREVENT_BATCH,
                &mut NotifyArgs::new().with_request_type(RequestType::Grouping),
            );
            return;
        }
        {
            let mut group = self.shared.group.write();
            if group.is_grouped(field) {
                return;
            }
            group.columns.push(field.to_owned());
        }
        self.data_bind(RequestType::Grouping);
    }

    /// Remove a column from the grouped set.
    pub fn ungroup_column(&self, field: &str) {
        if self.is_destroyed() || !self.guard_column(field) {
            return;
        }
        if self.is_action_prevented() {
            self.defer_command(PendingCommand::Ungroup {
                field: field.to_owned(),
            });
            return;
        }
        let removed = {
            let mut group = self.shared.group.write();
            let before = group.columns.len();
            group.columns.retain(|grouped| grouped != field);
            group.columns.len() != before
        };
        if removed {
            self.data_bind(RequestType::Ungrouping);
        }
    }

    /// Replace the filter predicate for one column.
    pub fn filter_by(&self, field: &str, value: &str) {
        if self.is_destroyed() || !self.guard_column(field) {
            return;
        }
        if !self.allow_filtering() {
            tracing::warn!(target: TARGET, field, "filtering is not allowed");
            return;
        }
        if self.is_action_prevented() {
            self.defer_command(PendingCommand::Filter {
                field: field.to_owned(),
                value: value.to_owned(),
            });
            return;
        }
        {
            let mut filter = self.shared.filter.write();
            filter.columns.retain(|descriptor| descriptor.field != field);
            filter.columns.push(FilterDescriptor {
                field: field.to_owned(),
                value: value.to_owned(),
            });
        }
        self.data_bind(RequestType::Filtering);
    }

    /// Reset column widths to auto, for one column or for all.
    pub fn auto_fit_columns(&self, field: Option<&str>) -> Result<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        {
            let mut columns = self.shared.columns.write();
            for column in columns.iter_mut() {
                if field.is_none_or(|f| f == column.field) {
                    column.width = None;
                }
            }
        }
        self.refresh()
    }

    /// Make columns visible by field.
    pub fn show_columns(&self, fields: &[&str]) -> Result<()> {
        self.set_columns_visible(fields, true)
    }

    /// Hide columns by field.
    pub fn hide_columns(&self, fields: &[&str]) -> Result<()> {
        self.set_columns_visible(fields, false)
    }

    fn set_columns_visible(&self, fields: &[&str], visible: bool) -> Result<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        {
            let mut columns = self.shared.columns.write();
            for column in columns.iter_mut() {
                if fields.contains(&column.field.as_str()) {
                    column.visible = visible;
                }
            }
        }
        self.refresh()
    }

    /// Ask the external filter UI to open its editor for a column.
    pub fn open_filter_dialog(&self, field: &str, item_id: &str) {
        let mut args = NotifyArgs::new()
            .with_column_field(field)
            .with_item_id(item_id);
        self.notify(events::FILTER_OPEN, &mut args);
    }

    fn guard_column(&self, field: &str) -> bool {
        if self.column(field).is_some() {
            true
        } else {
            tracing::warn!(target: TARGET, field, "unknown column");
            false
        }
    }

    // ------------------------------------------------------------------
    // Teardown.
    // ------------------------------------------------------------------

    /// Tear the instance down.
    ///
    /// Publishes `destroy` first, while the bus still works, so modules can
    /// unsubscribe; then flags the instance and clears bus, locator,
    /// capability set and module list. Safe to call repeatedly.
    pub fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        tracing::debug!(target: TARGET, id = %self.shared.id, "destroying grid");
        self.shared.bus.publish(events::DESTROY, &mut NotifyArgs::new());
        self.shared.destroyed.store(true, Ordering::SeqCst);
        self.shared.modules.lock().clear();
        self.shared.bus.clear();
        self.shared.locator.clear();
        self.shared.capabilities.clear();
        self.shared.pending.lock().clear();
    }
}

static_assertions::assert_impl_all!(Grid: Send, Sync);
