use super::*;
use crate::core::{Extent, FeatureStyle, GeometryClass};

/// Werkzeug-Umgebung mit 1 Karteneinheit pro Pixel.
struct Fixture {
    source: VectorSource,
    styles: StyleTable,
    selection: SelectionState,
    history: UndoRedo,
    view: MapView,
    options: EditorOptions,
    extensions: Extensions,
    events: Vec<EditEvent>,
    controller: InteractionController,
}

impl Fixture {
    fn new() -> Self {
        Self::with_extensions(Extensions::default())
    }

    fn with_extensions(extensions: Extensions) -> Self {
        let mut view = MapView::new(10.0);
        view.set_resolution(1.0);
        Self {
            source: VectorSource::new(),
            styles: StyleTable::new(),
            selection: SelectionState::new(),
            history: UndoRedo::with_snapshot_stack(50),
            view,
            options: EditorOptions::default(),
            extensions,
            events: Vec::new(),
            controller: InteractionController::new(),
        }
    }

    fn add(&mut self, geometry: Geometry) -> FeatureId {
        let class = geometry.class();
        let id = self.source.add(geometry);
        self.styles.assign_default(id, class);
        id
    }

    fn add_line(&mut self, a: (f64, f64), b: (f64, f64)) -> FeatureId {
        self.add(Geometry::LineString(vec![
            DVec2::new(a.0, a.1),
            DVec2::new(b.0, b.1),
        ]))
    }

    fn send(&mut self, event: InputEvent) {
        let mut ctx = ToolContext {
            source: &mut self.source,
            styles: &mut self.styles,
            selection: &mut self.selection,
            history: &mut self.history,
            view: &self.view,
            options: &self.options,
            extensions: &self.extensions,
            events: &mut self.events,
        };
        self.controller.handle_event(&mut ctx, &event);
    }

    fn set_tool(&mut self, tool: EditorTool) -> bool {
        let mut ctx = ToolContext {
            source: &mut self.source,
            styles: &mut self.styles,
            selection: &mut self.selection,
            history: &mut self.history,
            view: &self.view,
            options: &self.options,
            extensions: &self.extensions,
            events: &mut self.events,
        };
        self.controller.set_tool(&mut ctx, tool)
    }

    /// Klick wie vom Host geliefert: Down, Up, Click.
    fn click_with(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        let pos = DVec2::new(x, y);
        self.send(InputEvent::PointerDown { pos, modifiers });
        self.send(InputEvent::PointerUp { pos, modifiers });
        self.send(InputEvent::Click { pos, modifiers });
    }

    fn click(&mut self, x: f64, y: f64) {
        self.click_with(x, y, Modifiers::default());
    }

    fn double_click(&mut self, x: f64, y: f64) {
        self.click(x, y);
        self.send(InputEvent::DoubleClick {
            pos: DVec2::new(x, y),
            modifiers: Modifiers::default(),
        });
    }

    /// Ziehen über Zwischenpunkte, ohne abschließenden Klick.
    fn drag(&mut self, path: &[(f64, f64)], modifiers: Modifiers) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        self.send(InputEvent::PointerDown {
            pos: DVec2::new(first.0, first.1),
            modifiers,
        });
        let mut last = *first;
        for p in rest {
            self.send(InputEvent::PointerMove {
                pos: DVec2::new(p.0, p.1),
                modifiers,
            });
            last = *p;
        }
        self.send(InputEvent::PointerUp {
            pos: DVec2::new(last.0, last.1),
            modifiers,
        });
    }

    fn attachment_count(&self, kind: AttachmentKind) -> usize {
        self.controller.attachments().borrow().count(kind)
    }

    fn undo(&mut self) {
        let current = Snapshot::capture(&self.source, &self.styles);
        if let Some(prev) = self.history.undo(current) {
            prev.restore(&mut self.source, &mut self.styles);
        }
    }

    fn last_added(&self) -> Option<FeatureId> {
        self.events.iter().rev().find_map(|e| match e {
            EditEvent::FeatureAdded(id) => Some(*id),
            _ => None,
        })
    }
}

// ── Select ───────────────────────────────────────────────────────

#[test]
fn shift_click_extends_selection_and_tool_switch_clears_it() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    let b = fx.add_line((0.0, 50.0), (100.0, 50.0));

    fx.click(50.0, 1.0);
    assert_eq!(fx.selection.to_vec(), vec![a]);

    fx.click_with(50.0, 49.0, Modifiers::SHIFT);
    assert_eq!(fx.selection.to_vec(), vec![a, b]);
    assert!(fx.source.get(b).is_some_and(|f| f.properties.selected));

    fx.events.clear();
    assert!(fx.set_tool(EditorTool::DrawLine));
    assert!(fx.selection.is_empty());
    assert!(fx.source.iter().all(|f| !f.properties.selected));
    assert!(fx.events.contains(&EditEvent::SelectionChanged));
}

#[test]
fn shift_click_on_selected_feature_deselects_it() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.click(50.0, 0.0);
    fx.click_with(50.0, 0.0, Modifiers::SHIFT);
    assert!(!fx.selection.contains(a));
}

#[test]
fn click_on_empty_map_clears_selection() {
    let mut fx = Fixture::new();
    fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.click(50.0, 0.0);
    assert_eq!(fx.selection.len(), 1);
    fx.click(50.0, 500.0);
    assert!(fx.selection.is_empty());
}

#[test]
fn same_tool_is_no_change() {
    let mut fx = Fixture::new();
    assert!(!fx.set_tool(EditorTool::Select));
    assert!(fx.set_tool(EditorTool::Delete));
    assert!(!fx.set_tool(EditorTool::Delete));
}

#[test]
fn escape_returns_to_select_and_discards_sketch() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawPolygon);
    fx.click(0.0, 0.0);
    fx.click(10.0, 0.0);
    assert!(fx.controller.has_pending_input());

    fx.send(InputEvent::key(Key::Escape));
    assert_eq!(fx.controller.active_tool(), EditorTool::Select);
    assert!(!fx.controller.has_pending_input());
    assert!(fx.source.is_empty());
}

#[test]
fn attachments_follow_active_mode_without_leaks() {
    let mut fx = Fixture::new();
    assert_eq!(fx.controller.attachments().borrow().len(), 5);
    assert_eq!(fx.attachment_count(AttachmentKind::Keyboard), 1);
    assert_eq!(fx.attachment_count(AttachmentKind::DragBox), 1);

    fx.set_tool(EditorTool::DrawLine);
    assert_eq!(fx.controller.attachments().borrow().len(), 2);
    assert_eq!(fx.attachment_count(AttachmentKind::Draw), 1);
    assert_eq!(fx.attachment_count(AttachmentKind::Select), 0);

    fx.set_tool(EditorTool::Offset);
    assert_eq!(fx.attachment_count(AttachmentKind::Offset), 1);
    assert_eq!(fx.attachment_count(AttachmentKind::Transform), 1);
    assert_eq!(fx.attachment_count(AttachmentKind::Draw), 0);

    for tool in EditorTool::ALL {
        fx.set_tool(tool);
    }
    fx.set_tool(EditorTool::Select);
    assert_eq!(fx.controller.attachments().borrow().len(), 5);
}

#[test]
fn move_handle_exists_only_for_single_selection() {
    let mut fx = Fixture::new();
    fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.add_line((0.0, 50.0), (100.0, 50.0));

    fx.click(50.0, 0.0);
    assert_eq!(fx.attachment_count(AttachmentKind::Translate), 1);

    fx.click_with(50.0, 50.0, Modifiers::SHIFT);
    assert_eq!(fx.attachment_count(AttachmentKind::Translate), 0);

    fx.click(50.0, 50.0);
    assert_eq!(fx.attachment_count(AttachmentKind::Translate), 1);

    fx.set_tool(EditorTool::Delete);
    assert_eq!(fx.attachment_count(AttachmentKind::Translate), 0);
}

#[test]
fn move_handle_translates_feature_in_one_undo_step() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.click(20.0, 0.0);

    fx.events.clear();
    fx.drag(&[(50.0, 0.0), (60.0, 10.0), (70.0, 20.0)], Modifiers::default());
    let moved = fx.source.get(a).map(|f| f.geometry.vertices());
    assert_eq!(
        moved,
        Some(vec![DVec2::new(20.0, 20.0), DVec2::new(120.0, 20.0)])
    );
    assert!(fx.events.contains(&EditEvent::GeometryChanged(a)));

    fx.undo();
    assert_eq!(
        fx.source.get(a).map(|f| f.geometry.vertices()),
        Some(vec![DVec2::ZERO, DVec2::new(100.0, 0.0)])
    );
    assert!(!fx.history.can_undo());
}

#[test]
fn vertex_drag_modifies_selected_feature() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.click(50.0, 0.0);

    fx.drag(&[(0.0, 0.0), (-5.0, 2.0), (-10.0, 5.0)], Modifiers::default());
    let vertices = fx.source.get(a).map(|f| f.geometry.vertices());
    assert_eq!(
        vertices,
        Some(vec![DVec2::new(-10.0, 5.0), DVec2::new(100.0, 0.0)])
    );
    assert!(fx.history.can_undo());
    fx.undo();
    assert!(!fx.history.can_undo());
}

#[test]
fn vertices_of_unselected_features_are_not_grabbed() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.drag(&[(0.0, 0.0), (-10.0, 5.0)], Modifiers::default());
    assert_eq!(
        fx.source.get(a).map(|f| f.geometry.vertices()[0]),
        Some(DVec2::ZERO)
    );
    assert!(!fx.history.can_undo());
}

#[test]
fn box_select_extends_existing_selection() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    let b = fx.add_line((0.0, 50.0), (100.0, 50.0));
    let c = fx.add_line((0.0, 200.0), (100.0, 200.0));
    fx.click(50.0, 0.0);

    fx.drag(&[(-10.0, 40.0), (110.0, 60.0)], Modifiers::SHIFT);
    assert_eq!(fx.selection.to_vec(), vec![a, b]);
    assert!(!fx.selection.contains(c));
}

#[test]
fn hover_follows_pointer_in_select_mode() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.send(InputEvent::PointerMove {
        pos: DVec2::new(50.0, 2.0),
        modifiers: Modifiers::default(),
    });
    assert!(fx.source.get(a).is_some_and(|f| f.properties.hovered));
    fx.send(InputEvent::PointerMove {
        pos: DVec2::new(50.0, 80.0),
        modifiers: Modifiers::default(),
    });
    assert!(fx.source.iter().all(|f| !f.properties.hovered));
}

// ── Zeichnen ─────────────────────────────────────────────────────

#[test]
fn draw_line_adds_feature_with_default_style() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawLine);
    fx.click(0.0, 0.0);
    fx.click(10.0, 0.0);
    fx.double_click(20.0, 10.0);

    let id = fx.last_added().expect("Feature erwartet");
    let geometry = fx.source.get(id).map(|f| f.geometry.as_ref().clone());
    assert_eq!(
        geometry,
        Some(Geometry::LineString(vec![
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            DVec2::new(20.0, 10.0),
        ]))
    );
    assert_eq!(fx.styles.get(id), Some(&FeatureStyle::default_line()));
    assert!(fx.history.can_undo());
}

#[test]
fn polygon_is_finished_with_enter() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawPolygon);
    fx.click(0.0, 0.0);
    fx.click(10.0, 0.0);
    fx.click(10.0, 10.0);
    fx.send(InputEvent::key(Key::Backspace));
    fx.click(0.0, 10.0);
    fx.send(InputEvent::key(Key::Enter));

    let id = fx.last_added().expect("Polygon erwartet");
    let feature = fx.source.get(id).expect("Feature vorhanden");
    assert!(feature.geometry.is_area());
    assert_eq!(feature.geometry.vertices().len(), 3);
    assert_eq!(fx.styles.get(id), Some(&FeatureStyle::default_polygon()));
}

#[test]
fn rectangle_finishes_on_second_click() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawRectangle);
    fx.click(0.0, 0.0);
    fx.click(20.0, 10.0);
    let id = fx.last_added().expect("Rechteck erwartet");
    let extent = fx.source.get(id).and_then(|f| f.geometry.extent());
    assert_eq!(
        extent,
        Some(Extent::from_corners(DVec2::ZERO, DVec2::new(20.0, 10.0)))
    );
    assert!(!fx.controller.has_pending_input());
}

#[test]
fn bezier_stores_control_points_and_drops_preview() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawBezier);
    fx.click(0.0, 0.0);
    assert_eq!(fx.attachment_count(AttachmentKind::PreviewOverlay), 1);
    fx.click(10.0, 10.0);
    fx.double_click(20.0, 0.0);

    let id = fx.last_added().expect("Kurve erwartet");
    let feature = fx.source.get(id).expect("Feature vorhanden");
    assert!(feature.properties.is_spline);
    assert_eq!(feature.spline_options(), fx.options.bezier_spline);
    assert_eq!(feature.geometry.vertices().len(), 3);
    assert_eq!(fx.attachment_count(AttachmentKind::PreviewOverlay), 0);
}

#[test]
fn bezier_preview_is_removed_on_tool_switch() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawBezier);
    fx.click(0.0, 0.0);
    fx.click(10.0, 10.0);
    assert!(!fx
        .controller
        .overlays(&fx.source, &fx.view)
        .is_empty());

    fx.set_tool(EditorTool::Select);
    assert_eq!(fx.attachment_count(AttachmentKind::PreviewOverlay), 0);
    assert!(fx.source.is_empty());
}

// ── Offset ───────────────────────────────────────────────────────

#[test]
fn offset_creates_parallel_copy_with_copied_style() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    let mut style = FeatureStyle::default_line();
    style.layers[0].stroke_width = 7.0;
    fx.styles.set(a, &style);

    fx.set_tool(EditorTool::Offset);
    fx.drag(&[(50.0, 0.0), (50.0, 10.0)], Modifiers::default());

    let copy = fx.last_added().expect("Kopie erwartet");
    assert_ne!(copy, a);
    let vertices = fx.source.get(copy).map(|f| f.geometry.vertices());
    let vertices = vertices.expect("Feature vorhanden");
    assert!(vertices.iter().all(|p| (p.y - 10.0).abs() < 1e-9));
    assert_eq!(fx.styles.get(copy), Some(&style));
    assert_eq!(fx.source.len(), 2);
}

#[test]
fn offset_without_extension_is_noop() {
    let mut fx = Fixture::with_extensions(Extensions::none());
    fx.add_line((0.0, 0.0), (100.0, 0.0));
    let square = fx.add(Geometry::rectangle(
        DVec2::new(0.0, 100.0),
        DVec2::new(10.0, 110.0),
    ));

    fx.set_tool(EditorTool::Offset);
    fx.drag(&[(50.0, 0.0), (50.0, 10.0)], Modifiers::default());
    fx.drag(&[(10.0, 105.0), (15.0, 105.0)], Modifiers::default());

    assert_eq!(fx.source.len(), 2);
    assert_eq!(
        fx.source.get(square).and_then(|f| f.geometry.extent()),
        Some(Extent::from_corners(
            DVec2::new(0.0, 100.0),
            DVec2::new(10.0, 110.0)
        ))
    );
    assert!(!fx.history.can_undo());
}

#[test]
fn offset_scales_area_about_center() {
    let mut fx = Fixture::new();
    let square = fx.add(Geometry::rectangle(DVec2::ZERO, DVec2::new(10.0, 10.0)));
    fx.set_tool(EditorTool::Offset);

    fx.drag(&[(10.0, 5.0), (15.0, 5.0)], Modifiers::default());
    assert_eq!(
        fx.source.get(square).and_then(|f| f.geometry.extent()),
        Some(Extent::from_corners(
            DVec2::new(-5.0, -5.0),
            DVec2::new(15.0, 15.0)
        ))
    );

    fx.undo();
    assert_eq!(
        fx.source.get(square).and_then(|f| f.geometry.extent()),
        Some(Extent::from_corners(DVec2::ZERO, DVec2::new(10.0, 10.0)))
    );
}

#[test]
fn offset_with_shift_stretches_one_axis() {
    let mut fx = Fixture::new();
    let square = fx.add(Geometry::rectangle(DVec2::ZERO, DVec2::new(10.0, 10.0)));
    fx.set_tool(EditorTool::Offset);

    fx.drag(&[(10.0, 5.0), (15.0, 5.0)], Modifiers::SHIFT);
    assert_eq!(
        fx.source.get(square).and_then(|f| f.geometry.extent()),
        Some(Extent::from_corners(
            DVec2::new(-5.0, 0.0),
            DVec2::new(15.0, 10.0)
        ))
    );
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_removes_feature_and_style() {
    let mut fx = Fixture::new();
    let a = fx.add_line((0.0, 0.0), (100.0, 0.0));
    let b = fx.add_line((0.0, 50.0), (100.0, 50.0));
    fx.set_tool(EditorTool::Delete);

    fx.send(InputEvent::PointerMove {
        pos: DVec2::new(50.0, 1.0),
        modifiers: Modifiers::default(),
    });
    assert!(fx.source.get(a).is_some_and(|f| !f.properties.hovered));
    let overlays = fx.controller.overlays(&fx.source, &fx.view);
    assert_eq!(overlays.len(), 1);
    assert_eq!(
        overlays[0].stroke.as_ref().map(|s| s.color),
        Some(Rgba::new(255, 0, 0, 0.7))
    );

    fx.click(50.0, 1.0);
    assert!(!fx.source.contains(a));
    assert!(fx.styles.get(a).is_none());
    assert!(fx.source.contains(b));
    assert!(fx.events.contains(&EditEvent::FeatureRemoved(a)));

    fx.undo();
    assert!(fx.source.contains(a));
    assert_eq!(fx.styles.get(a), Some(&FeatureStyle::default_line()));
}

#[test]
fn leaving_delete_mode_clears_hover() {
    let mut fx = Fixture::new();
    fx.add_line((0.0, 0.0), (100.0, 0.0));
    fx.set_tool(EditorTool::Delete);
    fx.send(InputEvent::PointerMove {
        pos: DVec2::new(50.0, 0.0),
        modifiers: Modifiers::default(),
    });
    fx.send(InputEvent::key(Key::Escape));
    assert!(fx.source.iter().all(|f| !f.properties.hovered));
    assert_eq!(fx.controller.active_tool(), EditorTool::Select);
}

#[test]
fn tool_names_round_trip() {
    for tool in EditorTool::ALL {
        assert_eq!(EditorTool::from_name(tool.name()), Some(tool));
    }
    assert_eq!(EditorTool::from_name("lasso"), None);
}

#[test]
fn geometry_class_of_drawn_circle_is_area() {
    let mut fx = Fixture::new();
    fx.set_tool(EditorTool::DrawCircle);
    fx.click(0.0, 0.0);
    fx.click(3.0, 4.0);
    let id = fx.last_added().expect("Kreis erwartet");
    assert_eq!(
        fx.source.get(id).map(|f| f.geometry.class()),
        Some(GeometryClass::Area)
    );
}
