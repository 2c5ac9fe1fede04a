//! The editor session: every piece of mutable editor state in one place.
//!
//! A session only exists once the initial component listing and layout
//! load have completed, so no handler can observe a half-loaded scene.
//! Host capabilities are passed into each call instead of being owned.

use crate::component::{Component, ComponentCatalog, ComponentId, RecommendedSize};
use crate::config::EditorConfig;
use crate::editor::{
    AlignAction, GestureOutcome, LayoutEditor, Surface, align, auto_place, place_at,
};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{GridRect, clamp};
use crate::host::{Host, WindowHandle};
use crate::input::{MouseButton, PointerEvent};
use crate::mode::{EditMode, ModeController, ToggleOutcome};
use crate::panel::{
    ContextMenu, GalleryAction, GalleryPanel, MenuItem, SettingsInit, SettingsMessage,
    SettingsPanel,
};
use crate::persistence::PersistenceBridge;
use crate::scene::{Scene, Widget, WidgetConfig, WidgetId};
use crate::selection::Selection;
use crate::snap::{snap_down, snap_size};
use crate::window_shape::{OverlayState, ShapeSynchronizer, WindowShape, compute_shape};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Messages for the host and for widget content, drained by the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Push a config to a widget's content (`config-updated`).
    ConfigUpdated {
        widget_id: WidgetId,
        config: WidgetConfig,
    },
    /// Show the settings surface (`init-settings`).
    InitSettings {
        widget_id: WidgetId,
        init: SettingsInit,
    },
    CloseSettings {
        widget_id: WidgetId,
    },
    ModeChanged {
        mode: EditMode,
    },
}

/// Messages sent by widget content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "kebab-case")]
pub enum WidgetMessage {
    SaveSettings(WidgetConfig),
}

/// How a widget should be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetStatus {
    Ready { url: Option<String> },
    /// The component is gone; draw an error placeholder.
    Missing,
}

/// Render description of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub id: WidgetId,
    pub component_id: ComponentId,
    /// Provisional rectangle while a gesture moves it, else the committed one.
    pub rect: Rect,
    pub status: WidgetStatus,
    pub selected: bool,
}

/// Editor session bound to one widget window.
pub struct EditorSession {
    scene: Scene,
    catalog: ComponentCatalog,
    selection: Selection,
    editor: LayoutEditor,
    mode: ModeController,
    gallery: GalleryPanel,
    context_menu: Option<ContextMenu>,
    settings: Option<SettingsPanel>,
    shape: ShapeSynchronizer,
    persistence: PersistenceBridge,
    display: GridRect,
    config: EditorConfig,
    outbox: Vec<SessionEvent>,
    reported_missing: HashSet<ComponentId>,
}

impl EditorSession {
    /// Load components and layout from the host, insert pending default
    /// widgets and push the initial window shape.
    pub async fn load(host: &dyn Host, display: GridRect, config: EditorConfig) -> Self {
        let catalog = match host.list_components().await {
            Ok(listing) => ComponentCatalog::from_listing(listing),
            Err(e) => {
                log::warn!("Component listing failed, no components available: {}", e);
                ComponentCatalog::new()
            }
        };
        let mut persistence = PersistenceBridge::new();
        let scene = persistence.load(host).await;
        let mut session = Self::from_parts(scene, catalog, display, config, persistence);
        log::info!(
            "Session loaded: {} widgets, {} components",
            session.scene.len(),
            session.catalog.len()
        );
        session.materialize_defaults(host);
        session.sync_shape(host);
        session
    }

    fn from_parts(
        scene: Scene,
        catalog: ComponentCatalog,
        display: GridRect,
        config: EditorConfig,
        persistence: PersistenceBridge,
    ) -> Self {
        Self {
            scene,
            catalog,
            selection: Selection::new(),
            editor: LayoutEditor::new(config.clone()),
            mode: ModeController::new(),
            gallery: GalleryPanel::new(),
            context_menu: None,
            settings: None,
            shape: ShapeSynchronizer::new(),
            persistence,
            display,
            config,
            outbox: Vec::new(),
            reported_missing: HashSet::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn editor(&self) -> &LayoutEditor {
        &self.editor
    }

    pub fn mode(&self) -> EditMode {
        self.mode.mode()
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    pub fn gallery(&self) -> &GalleryPanel {
        &self.gallery
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn settings_panel(&self) -> Option<&SettingsPanel> {
        self.settings.as_ref()
    }

    pub fn display(&self) -> GridRect {
        self.display
    }

    pub fn persistence(&self) -> &PersistenceBridge {
        &self.persistence
    }

    /// Shape last pushed to the host.
    pub fn current_shape(&self) -> Option<&WindowShape> {
        self.shape.current()
    }

    /// Take the pending outbound messages.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    // --- Window shape ---

    pub fn overlays(&self) -> OverlayState {
        OverlayState {
            edit_mode: self.is_editing(),
            settings_panel: self.settings.as_ref().map(|p| p.rect),
            context_menu: self.context_menu.as_ref().map(|m| m.rect),
        }
    }

    /// Recompute the shape from committed state and push it if it changed.
    pub fn sync_shape(&mut self, host: &dyn Host) -> bool {
        let shape = compute_shape(&self.scene, &self.overlays(), self.display);
        self.shape.sync(host, shape)
    }

    /// Persist, then resync the shape.
    fn commit(&mut self, host: &dyn Host, what: &str) {
        log::info!("Commit: {}", what);
        self.selection.retain_existing(&self.scene);
        self.prune_overlays();
        if self.persistence.save(host, &self.scene).is_err() {
            log::debug!("Layout kept in memory until the next successful save");
        }
        self.sync_shape(host);
    }

    /// Retry a save that failed earlier.
    pub fn flush(&mut self, host: &dyn Host) -> EditorResult<bool> {
        self.persistence.flush(host, &self.scene)
    }

    /// Close popups whose widget no longer exists.
    fn prune_overlays(&mut self) {
        if let Some(menu) = &self.context_menu {
            if !self.scene.contains(&menu.target) {
                self.context_menu = None;
            }
        }
        let orphaned = self
            .settings
            .as_ref()
            .is_some_and(|panel| !self.scene.contains(&panel.widget_id));
        if orphaned {
            self.close_settings_panel(false);
        }
    }

    fn surface(&self) -> Surface {
        Surface {
            display: self.display,
            pitch: self.scene.pitch(),
            gallery: self.gallery_rect(),
        }
    }

    /// Gallery surface, only present while editing.
    pub fn gallery_rect(&self) -> Option<GridRect> {
        self.is_editing()
            .then(|| self.gallery.rect(self.display, self.config.gallery_height))
    }

    /// The alignment toolbar, shown under a multi-selection while editing.
    pub fn alignment_toolbar(&mut self) -> Option<GridRect> {
        if !self.is_editing() || self.editor.is_marquee_active() {
            return None;
        }
        let anchor = self.selection.toolbar_anchor(&self.scene)?;
        let width = self.config.toolbar_width;
        Some(GridRect::new(
            (anchor.x - width as f64 / 2.0).round() as i32,
            anchor.y.round() as i32,
            width,
            self.config.toolbar_height,
        ))
    }

    fn toolbar_action_at(&mut self, point: Point) -> Option<AlignAction> {
        let toolbar = self.alignment_toolbar()?;
        if !toolbar.contains_point(point) {
            return None;
        }
        let slot = toolbar.w as f64 / AlignAction::ALL.len() as f64;
        let index = ((point.x - toolbar.x as f64) / slot) as usize;
        AlignAction::ALL.get(index).copied()
    }

    // --- Pointer input ---

    pub fn handle_pointer(&mut self, host: &dyn Host, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                if let Some(menu) = &self.context_menu {
                    if menu.contains(position) {
                        if button == MouseButton::Left {
                            if let Some(item) = menu.item_at(position) {
                                self.activate_menu_item(host, item);
                            }
                        }
                        return;
                    }
                    self.dismiss_context_menu(host);
                }

                if button == MouseButton::Right {
                    let target = self.scene.widget_at_point(position).map(|w| w.id.clone());
                    if let Some(id) = target {
                        if let Err(e) = self.open_context_menu(host, &id, position) {
                            log::warn!("{}", e);
                        }
                    }
                    return;
                }
                if button != MouseButton::Left || !self.is_editing() {
                    return;
                }
                if self.settings.as_ref().is_some_and(|p| p.rect.contains_point(position)) {
                    return;
                }
                if self.gallery_rect().is_some_and(|r| r.contains_point(position)) {
                    return;
                }
                if let Some(action) = self.toolbar_action_at(position) {
                    self.align_selection(host, action);
                    return;
                }
                self.editor
                    .pointer_down(position, modifiers, &self.scene, &mut self.selection);
            }
            PointerEvent::Move { position } => {
                let surface = self.surface();
                self.editor.pointer_move(position, &self.scene, &surface);
            }
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left || self.editor.is_idle() {
                    return;
                }
                let surface = self.surface();
                match self
                    .editor
                    .pointer_up(position, &mut self.scene, &mut self.selection, &surface)
                {
                    Ok(outcome) => self.after_gesture(host, outcome),
                    Err(e) => log::warn!("Gesture reverted: {}", e),
                }
            }
        }
    }

    fn after_gesture(&mut self, host: &dyn Host, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::Moved(ids) => self.commit(host, &format!("moved {} widget(s)", ids.len())),
            GestureOutcome::Resized(id) => self.commit(host, &format!("resized {}", id)),
            GestureOutcome::Removed(ids) => {
                self.commit(host, &format!("removed {} widget(s) by drop", ids.len()))
            }
            GestureOutcome::Unchanged | GestureOutcome::SelectionChanged => {}
        }
    }

    /// Render descriptions of all widgets in paint order.
    ///
    /// Widgets whose component is gone come back as [`WidgetStatus::Missing`]
    /// with their geometry intact.
    pub fn widget_views(&mut self) -> Vec<WidgetView> {
        let mut views = Vec::with_capacity(self.scene.len());
        for widget in self.scene.widgets() {
            let status = match self.catalog.resolve(&widget.component_id) {
                Some(component) => WidgetStatus::Ready {
                    url: component.locator().map(str::to_string),
                },
                None => {
                    if self.reported_missing.insert(widget.component_id.clone()) {
                        log::warn!("Component missing: {}", widget.component_id);
                    }
                    WidgetStatus::Missing
                }
            };
            views.push(WidgetView {
                id: widget.id.clone(),
                component_id: widget.component_id.clone(),
                rect: self.editor.visual_rect(widget),
                status,
                selected: self.selection.contains(&widget.id),
            });
        }
        views
    }

    // --- Edit mode ---

    /// Flip between view and edit mode, deferring while content loads.
    pub fn toggle_edit_mode(&mut self, host: &dyn Host) -> ToggleOutcome {
        let outcome = self.mode.request_toggle();
        if let ToggleOutcome::Switched(mode) = outcome {
            self.apply_mode(host, mode);
        }
        outcome
    }

    pub fn set_edit_mode(&mut self, host: &dyn Host, mode: EditMode) {
        if self.mode.set_mode(mode) {
            self.apply_mode(host, mode);
        }
    }

    /// Widget content started or finished loading.
    pub fn set_content_loading(&mut self, host: &dyn Host, loading: bool) {
        if let Some(mode) = self.mode.set_content_loading(loading) {
            log::info!("Applying deferred edit mode toggle");
            self.apply_mode(host, mode);
        }
    }

    fn apply_mode(&mut self, host: &dyn Host, mode: EditMode) {
        match mode {
            EditMode::Edit => {
                log::info!("Entering edit mode");
                self.gallery.reset();
                self.context_menu = None;
            }
            EditMode::View => {
                log::info!("Leaving edit mode");
                self.editor.cancel();
                self.close_settings_panel(true);
                self.context_menu = None;
                self.selection.clear();
            }
        }
        self.outbox.push(SessionEvent::ModeChanged { mode });
        self.sync_shape(host);
    }

    /// Focus left the widget window. Outside edit mode this counts as a
    /// click elsewhere and closes any popup.
    pub fn focus_lost(&mut self, host: &dyn Host) {
        if self.is_editing() {
            return;
        }
        let had_menu = self.context_menu.take().is_some();
        let had_settings = self.close_settings_panel(true);
        if had_menu || had_settings {
            self.sync_shape(host);
        }
    }

    // --- Context menu ---

    pub fn open_context_menu(
        &mut self,
        host: &dyn Host,
        id: &WidgetId,
        position: Point,
    ) -> EditorResult<()> {
        if !self.scene.contains(id) {
            return Err(EditorError::WidgetNotFound(id.clone()));
        }
        self.editor.cancel();
        self.context_menu = Some(ContextMenu::open(
            id.clone(),
            position,
            self.mode(),
            self.display,
            &self.config,
        ));
        self.sync_shape(host);
        Ok(())
    }

    pub fn dismiss_context_menu(&mut self, host: &dyn Host) -> bool {
        if self.context_menu.take().is_none() {
            return false;
        }
        self.sync_shape(host);
        true
    }

    /// Run a menu entry and close the menu.
    pub fn activate_menu_item(&mut self, host: &dyn Host, item: MenuItem) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };
        let target = menu.target;
        let result = match item {
            MenuItem::Separator => Ok(()),
            MenuItem::EnterEditMode => {
                self.set_edit_mode(host, EditMode::Edit);
                Ok(())
            }
            MenuItem::Settings => {
                self.set_edit_mode(host, EditMode::Edit);
                self.open_settings(host, &target)
            }
            MenuItem::ResetSize => self.reset_widget_size(host, &target),
            MenuItem::Remove => self.remove_widget(host, &target),
        };
        if let Err(e) = result {
            log::warn!("Menu action {:?} failed: {}", item, e);
        }
        self.sync_shape(host);
    }

    // --- Scene edits ---

    fn default_size(&self, component: &Component) -> RecommendedSize {
        component.size_or(self.config.default_component_size)
    }

    /// Click-to-add: auto-place a new widget for `component_id`.
    pub fn add_component(&mut self, host: &dyn Host, component_id: &str) -> EditorResult<WidgetId> {
        let component = self
            .catalog
            .resolve(component_id)
            .ok_or_else(|| EditorError::ComponentNotFound(component_id.to_string()))?;
        let size = self.default_size(component);
        let component_id = component.id.clone();
        let rect = auto_place(
            &self.scene,
            size.width,
            size.height,
            self.display,
            self.scene.pitch(),
            self.config.gallery_height,
        );
        let id = self.scene.add_widget(Widget::new(component_id, rect));
        self.commit(host, &format!("added {}", id));
        Ok(id)
    }

    /// Drop-to-add: place at the drop point if free, else auto-place.
    pub fn drop_component(
        &mut self,
        host: &dyn Host,
        component_id: &str,
        point: Point,
    ) -> EditorResult<WidgetId> {
        let component = self
            .catalog
            .resolve(component_id)
            .ok_or_else(|| EditorError::ComponentNotFound(component_id.to_string()))?;
        let size = self.default_size(component);
        let component_id = component.id.clone();
        let pitch = self.scene.pitch();
        let rect = place_at(&self.scene, point, size.width, size.height, self.display, pitch)
            .unwrap_or_else(|| {
                auto_place(
                    &self.scene,
                    size.width,
                    size.height,
                    self.display,
                    pitch,
                    self.config.gallery_height,
                )
            });
        let id = self.scene.add_widget(Widget::new(component_id, rect));
        self.commit(host, &format!("dropped {}", id));
        Ok(id)
    }

    /// Insert one widget for every `autoInsert` component not seen before.
    fn materialize_defaults(&mut self, host: &dyn Host) -> usize {
        let pending: Vec<(ComponentId, RecommendedSize)> = self
            .catalog
            .iter()
            .filter(|c| c.auto_insert && !self.scene.is_default_processed(&c.id))
            .map(|c| (c.id.clone(), self.default_size(c)))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let pitch = self.scene.pitch();
        for (component_id, size) in &pending {
            let rect = auto_place(
                &self.scene,
                size.width,
                size.height,
                self.display,
                pitch,
                self.config.gallery_height,
            );
            self.scene.add_widget(Widget::new(component_id.clone(), rect));
            self.scene.mark_default_processed(component_id.clone());
            log::info!("Inserted default widget for {}", component_id);
        }
        self.commit(host, "default widgets");
        pending.len()
    }

    /// Swap in a fresh component listing.
    pub fn replace_catalog(&mut self, host: &dyn Host, listing: Vec<Component>) {
        self.catalog = ComponentCatalog::from_listing(listing);
        let catalog = &self.catalog;
        self.reported_missing.retain(|id| !catalog.contains(id));
        self.materialize_defaults(host);
    }

    /// Re-query the host for components.
    pub async fn refresh_catalog(&mut self, host: &dyn Host) {
        match host.list_components().await {
            Ok(listing) => self.replace_catalog(host, listing),
            Err(e) => log::warn!("Component listing failed, keeping current catalog: {}", e),
        }
    }

    pub fn remove_widget(&mut self, host: &dyn Host, id: &WidgetId) -> EditorResult<()> {
        self.scene
            .remove_widget(id)
            .ok_or_else(|| EditorError::WidgetNotFound(id.clone()))?;
        self.selection.remove(id);
        self.commit(host, &format!("removed {}", id));
        Ok(())
    }

    /// Restore the component's recommended size, snapped and kept on screen.
    pub fn reset_widget_size(&mut self, host: &dyn Host, id: &WidgetId) -> EditorResult<()> {
        let widget = self
            .scene
            .get(id)
            .ok_or_else(|| EditorError::WidgetNotFound(id.clone()))?;
        let component = self
            .catalog
            .resolve(&widget.component_id)
            .ok_or_else(|| EditorError::ComponentNotFound(widget.component_id.clone()))?;
        let size = self.default_size(component);
        let pitch = self.scene.pitch();
        let rect = widget.rect();
        let max_w = snap_down(self.display.right() - rect.x, pitch).max(pitch);
        let max_h = snap_down(self.display.bottom() - rect.y, pitch).max(pitch);
        let resized = rect.with_size(
            snap_size(size.width as f64, pitch).min(max_w),
            snap_size(size.height as f64, pitch).min(max_h),
        );

        if let Some(widget) = self.scene.get_mut(id) {
            widget.set_rect(resized);
        }
        self.selection.geometry_changed();
        self.commit(host, &format!("reset size of {}", id));
        Ok(())
    }

    /// Apply a toolbar action to the selection. Returns how many widgets
    /// were aligned.
    pub fn align_selection(&mut self, host: &dyn Host, action: AlignAction) -> usize {
        let aligned = align(&mut self.scene, &self.selection, action);
        if aligned.is_empty() {
            return 0;
        }
        self.selection.geometry_changed();
        self.commit(host, &format!("align {:?}", action));
        aligned.len()
    }

    pub fn set_grid_pitch(&mut self, host: &dyn Host, pitch: i32) {
        let before = self.scene.pitch();
        self.scene.set_grid_pitch(pitch);
        if self.scene.pitch() != before {
            self.commit(host, &format!("grid pitch {}", self.scene.pitch()));
        }
    }

    /// The display the widget window covers changed size or position.
    pub fn set_display_bounds(&mut self, host: &dyn Host, display: GridRect) {
        if self.display == display {
            return;
        }
        log::info!("Display bounds {}x{} at {},{}", display.w, display.h, display.x, display.y);
        self.display = display;
        self.editor.cancel();
        if let Some(menu) = &mut self.context_menu {
            menu.rect = clamp(menu.rect, display);
        }
        if let Some(panel) = &mut self.settings {
            panel.rect = clamp(panel.rect, display);
        }
        self.sync_shape(host);
    }

    pub fn gallery_action(&mut self, host: &dyn Host, action: GalleryAction) -> EditorResult<()> {
        let Some(action) = self.gallery.apply(action) else {
            return Ok(());
        };
        match action {
            GalleryAction::AddComponent { component_id } => {
                self.add_component(host, &component_id)?;
            }
            GalleryAction::SetGridPitch { pitch } => self.set_grid_pitch(host, pitch),
            GalleryAction::ExitEditMode => self.set_edit_mode(host, EditMode::View),
            other => log::debug!("Gallery action not handled: {:?}", other),
        }
        Ok(())
    }

    // --- Settings panel and widget channel ---

    pub fn open_settings(&mut self, host: &dyn Host, id: &WidgetId) -> EditorResult<()> {
        let widget = self
            .scene
            .get(id)
            .ok_or_else(|| EditorError::WidgetNotFound(id.clone()))?;
        let schema = self
            .catalog
            .resolve(&widget.component_id)
            .and_then(|c| c.config_schema.clone());
        let init = SettingsInit {
            component_id: widget.component_id.clone(),
            config: widget.config.clone(),
            schema,
        };
        let panel = SettingsPanel::open(
            id.clone(),
            widget.rect(),
            widget.config.clone(),
            self.display,
            &self.config,
        );

        self.close_settings_panel(true);
        self.settings = Some(panel);
        self.outbox.push(SessionEvent::InitSettings {
            widget_id: id.clone(),
            init,
        });
        self.sync_shape(host);
        Ok(())
    }

    /// Close the settings panel, restoring the widget's pre-open config.
    pub fn close_settings(&mut self, host: &dyn Host) -> bool {
        let closed = self.close_settings_panel(true);
        if closed {
            self.sync_shape(host);
        }
        closed
    }

    fn close_settings_panel(&mut self, restore: bool) -> bool {
        let Some(panel) = self.settings.take() else {
            return false;
        };
        if restore && self.scene.contains(&panel.widget_id) {
            self.outbox.push(SessionEvent::ConfigUpdated {
                widget_id: panel.widget_id.clone(),
                config: panel.original_config,
            });
        }
        self.outbox.push(SessionEvent::CloseSettings {
            widget_id: panel.widget_id,
        });
        true
    }

    pub fn handle_settings_message(
        &mut self,
        host: &dyn Host,
        message: SettingsMessage,
    ) -> EditorResult<()> {
        let Some(widget_id) = self.settings.as_ref().map(|p| p.widget_id.clone()) else {
            log::debug!("Settings message without an open panel");
            return Ok(());
        };
        match message {
            SettingsMessage::SettingsChanged(config) => {
                self.outbox.push(SessionEvent::ConfigUpdated { widget_id, config });
            }
            SettingsMessage::SaveSettings(config) => {
                let widget = self
                    .scene
                    .get_mut(&widget_id)
                    .ok_or_else(|| EditorError::WidgetNotFound(widget_id.clone()))?;
                widget.config = config.clone();
                self.outbox.push(SessionEvent::ConfigUpdated {
                    widget_id: widget_id.clone(),
                    config,
                });
                self.close_settings_panel(false);
                self.commit(host, &format!("settings of {}", widget_id));
            }
            SettingsMessage::CancelSettings => {
                self.close_settings(host);
            }
        }
        Ok(())
    }

    /// Widget content is ready: hand it its stored config.
    pub fn widget_ready(&mut self, id: &WidgetId) -> EditorResult<()> {
        let widget = self
            .scene
            .get(id)
            .ok_or_else(|| EditorError::WidgetNotFound(id.clone()))?;
        self.outbox.push(SessionEvent::ConfigUpdated {
            widget_id: id.clone(),
            config: widget.config.clone(),
        });
        Ok(())
    }

    pub fn handle_widget_message(
        &mut self,
        host: &dyn Host,
        id: &WidgetId,
        message: WidgetMessage,
    ) -> EditorResult<()> {
        match message {
            WidgetMessage::SaveSettings(config) => {
                let widget = self
                    .scene
                    .get_mut(id)
                    .ok_or_else(|| EditorError::WidgetNotFound(id.clone()))?;
                widget.config = config;
                self.commit(host, &format!("config of {}", id));
            }
        }
        Ok(())
    }

    // --- Other host capabilities ---

    pub fn attach_window(&self, host: &dyn Host, window: WindowHandle) -> EditorResult<()> {
        host.attach_to_desktop_background(window).map_err(|e| {
            log::error!("Failed to pin window to the desktop: {}", e);
            EditorError::CapabilityUnavailable(e.to_string())
        })
    }

    pub fn open_path(&self, host: &dyn Host, path: &Path) -> EditorResult<()> {
        host.open_external_path(path).map_err(|e| {
            log::error!("Failed to open {}: {}", path.display(), e);
            EditorError::CapabilityUnavailable(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::input::Modifiers;
    use serde_json::json;

    const DISPLAY: GridRect = GridRect::new(0, 0, 1000, 800);

    fn components() -> Vec<Component> {
        vec![
            Component::new("clock", "Clock").with_url("clock.html").with_size(200, 100),
            Component::new("notes", "Notes").with_url("notes.html"),
        ]
    }

    fn session_with(host: &MemoryHost) -> EditorSession {
        pollster::block_on(EditorSession::load(host, DISPLAY, EditorConfig::default()))
    }

    fn config(value: serde_json::Value) -> WidgetConfig {
        match value {
            serde_json::Value::Object(map) => map,
            _ => WidgetConfig::new(),
        }
    }

    fn down(x: f64, y: f64, button: MouseButton) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_unavailable_host_gives_empty_session() {
        let host = MemoryHost::unavailable();
        let session = session_with(&host);
        assert!(session.catalog().is_empty());
        assert!(session.scene().is_empty());
        assert_eq!(session.current_shape(), Some(&WindowShape::Regions(vec![])));
        assert_eq!(host.ignore_mouse_calls(), vec![true]);
    }

    #[test]
    fn test_default_widgets_inserted_once() {
        let host = MemoryHost::with_components(vec![
            Component::new("clock", "Clock").with_auto_insert(true),
        ]);
        let mut session = session_with(&host);
        assert_eq!(session.scene().len(), 1);
        assert!(session.scene().is_default_processed("clock"));
        assert_eq!(host.save_count(), 1);

        let id = session.scene().widgets().next().unwrap().id.clone();
        session.remove_widget(&host, &id).unwrap();

        let reloaded = session_with(&host);
        assert!(reloaded.scene().is_empty());
    }

    #[test]
    fn test_edit_mode_claims_window_and_leaving_clears() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        session.add_component(&host, "clock").unwrap();

        session.toggle_edit_mode(&host);
        assert_eq!(host.last_shape(), Some(WindowShape::WholeWindow));

        let id = session.scene().widgets().next().unwrap().id.clone();
        let rect = session.scene().rect_of(&id).unwrap();
        session.handle_pointer(&host, down(rect.x as f64 + 5.0, rect.y as f64 + 5.0, MouseButton::Left));
        assert!(session.selection().contains(&id));

        session.toggle_edit_mode(&host);
        assert!(session.selection().is_empty());
        assert!(session.editor().is_idle());
        assert_eq!(host.last_shape(), Some(WindowShape::Regions(vec![rect])));
    }

    #[test]
    fn test_context_menu_opens_and_dismisses() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        let rect = session.scene().rect_of(&id).unwrap();

        session.handle_pointer(&host, down(rect.x as f64 + 10.0, rect.y as f64 + 10.0, MouseButton::Right));
        let menu = session.context_menu().unwrap().rect;
        assert!(matches!(host.last_shape(), Some(WindowShape::Regions(r)) if r.contains(&menu)));

        session.handle_pointer(&host, down(5.0, 5.0, MouseButton::Left));
        assert!(session.context_menu().is_none());
        assert_eq!(host.last_shape(), Some(WindowShape::Regions(vec![rect])));
    }

    #[test]
    fn test_entering_edit_mode_dismisses_view_menu() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        session.open_context_menu(&host, &id, Point::new(10.0, 10.0)).unwrap();
        assert!(session.context_menu().is_some());

        session.toggle_edit_mode(&host);
        assert!(session.is_editing());
        assert!(session.context_menu().is_none());
        assert_eq!(host.last_shape(), Some(WindowShape::WholeWindow));
    }

    #[test]
    fn test_menu_settings_enters_edit_mode() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        session.open_context_menu(&host, &id, Point::new(10.0, 10.0)).unwrap();
        session.drain_events();

        session.activate_menu_item(&host, MenuItem::Settings);
        assert!(session.is_editing());
        assert_eq!(session.settings_panel().map(|p| p.widget_id.clone()), Some(id.clone()));
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::InitSettings { widget_id, .. } if widget_id == &id)));
    }

    #[test]
    fn test_focus_lost_closes_popups_in_view_mode() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        session.open_context_menu(&host, &id, Point::new(10.0, 10.0)).unwrap();
        let pushes = host.region_pushes().len();

        session.focus_lost(&host);
        assert!(session.context_menu().is_none());
        assert_eq!(host.region_pushes().len(), pushes + 1);
    }

    #[test]
    fn test_settings_preview_save_and_cancel() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        let saves = host.save_count();

        session.open_settings(&host, &id).unwrap();
        session
            .handle_settings_message(&host, SettingsMessage::SettingsChanged(config(json!({ "tz": "UTC" }))))
            .unwrap();
        assert_eq!(host.save_count(), saves);
        session.handle_settings_message(&host, SettingsMessage::CancelSettings).unwrap();
        assert!(session.settings_panel().is_none());
        assert!(session.scene().get(&id).unwrap().config.is_empty());

        session.open_settings(&host, &id).unwrap();
        session
            .handle_settings_message(&host, SettingsMessage::SaveSettings(config(json!({ "tz": "CET" }))))
            .unwrap();
        assert_eq!(host.save_count(), saves + 1);
        assert_eq!(session.scene().get(&id).unwrap().config["tz"], "CET");
        assert!(session.settings_panel().is_none());
    }

    #[test]
    fn test_widget_channel() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "notes").unwrap();
        session.drain_events();

        session
            .handle_widget_message(&host, &id, WidgetMessage::SaveSettings(config(json!({ "text": "hi" }))))
            .unwrap();
        session.widget_ready(&id).unwrap();
        let events = session.drain_events();
        assert_eq!(
            events,
            vec![SessionEvent::ConfigUpdated {
                widget_id: id.clone(),
                config: config(json!({ "text": "hi" })),
            }]
        );
        assert_eq!(host.last_saved().unwrap().get(&id).unwrap().config["text"], "hi");
    }

    #[test]
    fn test_unknown_component() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let result = session.add_component(&host, "radio");
        assert!(matches!(result, Err(EditorError::ComponentNotFound(_))));
        assert!(session.scene().is_empty());
    }

    #[test]
    fn test_reset_size() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "clock").unwrap();
        session.toggle_edit_mode(&host);

        let rect = session.scene().rect_of(&id).unwrap();
        let handle = Point::new(rect.right() as f64 - 2.0, rect.bottom() as f64 - 2.0);
        let released = handle + kurbo::Vec2::new(0.0, 100.0);
        session.handle_pointer(&host, down(handle.x, handle.y, MouseButton::Left));
        session.handle_pointer(&host, PointerEvent::Move { position: released });
        session.handle_pointer(&host, PointerEvent::Up { position: released, button: MouseButton::Left });
        assert_eq!(session.scene().rect_of(&id).unwrap().h, 200);

        session.reset_widget_size(&host, &id).unwrap();
        assert_eq!(session.scene().rect_of(&id).unwrap().with_origin(0, 0), GridRect::new(0, 0, 200, 100));
    }

    #[test]
    fn test_grid_pitch_persisted() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        session
            .gallery_action(&host, GalleryAction::SetGridPitch { pitch: 40 })
            .unwrap();
        assert_eq!(host.last_saved().map(|s| s.pitch()), Some(40));

        session.set_grid_pitch(&host, 40);
        assert_eq!(host.save_count(), 1);
    }

    #[test]
    fn test_deferred_toggle() {
        let host = MemoryHost::new();
        let mut session = session_with(&host);
        session.set_content_loading(&host, true);
        assert_eq!(session.toggle_edit_mode(&host), ToggleOutcome::Deferred);
        assert!(!session.is_editing());
        session.set_content_loading(&host, false);
        assert!(session.is_editing());
    }

    #[test]
    fn test_toolbar_click_aligns() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let a = session.add_component(&host, "clock").unwrap();
        let b = session.add_component(&host, "clock").unwrap();
        if let Some(widget) = session.scene.get_mut(&b) {
            widget.set_rect(GridRect::new(300, 300, 200, 100));
        }
        session.toggle_edit_mode(&host);
        session.selection.add(a.clone());
        session.selection.add(b.clone());

        let toolbar = session.alignment_toolbar().unwrap();
        assert_eq!(toolbar, GridRect::new(475, 410, 300, 36));
        // First slot is "left".
        session.handle_pointer(
            &host,
            down(toolbar.x as f64 + 5.0, toolbar.y as f64 + 5.0, MouseButton::Left),
        );
        assert_eq!(session.scene().rect_of(&a).unwrap().x, 300);
        assert_eq!(session.scene().rect_of(&b).unwrap().x, 300);
    }

    fn seeded_host() -> MemoryHost {
        let mut scene = Scene::new();
        let mut a = Widget::new("clock", GridRect::new(100, 100, 100, 100));
        a.id = WidgetId::from("a");
        let mut b = Widget::new("notes", GridRect::new(300, 100, 100, 100));
        b.id = WidgetId::from("b");
        scene.add_widget(a);
        scene.add_widget(b);
        MemoryHost::with_components(components()).with_config(scene)
    }

    fn drag(session: &mut EditorSession, host: &MemoryHost, from: Point, to: Point) {
        session.handle_pointer(host, down(from.x, from.y, MouseButton::Left));
        session.handle_pointer(host, PointerEvent::Move { position: to });
        session.handle_pointer(host, PointerEvent::Up { position: to, button: MouseButton::Left });
    }

    #[test]
    fn test_auto_place_default_size() {
        let host = MemoryHost::with_components(components());
        let mut session = session_with(&host);
        let id = session.add_component(&host, "notes").unwrap();
        assert_eq!(session.scene().rect_of(&id), Some(GridRect::new(650, 50, 300, 200)));
    }

    #[test]
    fn test_drag_commit_saves_then_shapes() {
        let host = seeded_host();
        let mut session = session_with(&host);
        session.toggle_edit_mode(&host);
        drag(&mut session, &host, Point::new(110.0, 110.0), Point::new(110.0, 260.0));

        let a = WidgetId::from("a");
        assert_eq!(session.scene().rect_of(&a), Some(GridRect::new(100, 250, 100, 100)));
        assert_eq!(host.save_count(), 1);
        assert_eq!(host.last_saved().unwrap().rect_of(&a), Some(GridRect::new(100, 250, 100, 100)));
        assert!(session.editor().is_idle());
    }

    #[test]
    fn test_rejected_drag_saves_nothing() {
        let host = seeded_host();
        let mut session = session_with(&host);
        session.toggle_edit_mode(&host);
        drag(&mut session, &host, Point::new(110.0, 110.0), Point::new(320.0, 110.0));

        assert_eq!(session.scene().rect_of(&WidgetId::from("a")), Some(GridRect::new(100, 100, 100, 100)));
        assert_eq!(host.save_count(), 0);
    }

    #[test]
    fn test_small_drag_is_a_click() {
        let host = seeded_host();
        let mut session = session_with(&host);
        session.toggle_edit_mode(&host);
        drag(&mut session, &host, Point::new(110.0, 110.0), Point::new(112.0, 111.0));

        assert_eq!(host.save_count(), 0);
        assert!(session.selection().contains(&WidgetId::from("a")));
    }

    #[test]
    fn test_view_mode_ignores_left_press() {
        let host = seeded_host();
        let mut session = session_with(&host);
        session.handle_pointer(&host, down(110.0, 110.0, MouseButton::Left));
        assert!(session.editor().is_idle());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_missing_component_placeholder() {
        let mut scene = Scene::new();
        let id = scene.add_widget(Widget::new("gone", GridRect::new(0, 0, 100, 100)));
        let host = MemoryHost::with_components(components()).with_config(scene);
        let mut session = session_with(&host);

        let views = session.widget_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, id);
        assert_eq!(views[0].status, WidgetStatus::Missing);
        assert_eq!(views[0].rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(session.current_shape(), Some(&WindowShape::Regions(vec![GridRect::new(0, 0, 100, 100)])));
    }

    #[test]
    fn test_shape_sync_idempotent() {
        let host = seeded_host();
        let mut session = session_with(&host);
        let pushes = host.region_pushes().len();
        assert!(!session.sync_shape(&host));
        assert_eq!(host.region_pushes().len(), pushes);
    }

    #[test]
    fn test_attach_window() {
        let host = MemoryHost::new();
        let session = session_with(&host);
        session.attach_window(&host, WindowHandle(7)).unwrap();
        assert_eq!(host.attached_windows(), vec![WindowHandle(7)]);
    }
}
