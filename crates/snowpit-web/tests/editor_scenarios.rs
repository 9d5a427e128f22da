//! Browser-host scenarios for `ProfileEditor`: pointer lifecycles, the
//! description row buttons, the feature form, pit header edits and blink.

use std::time::Duration;

use pretty_assertions::assert_eq;
use snowpit_core::caaml::GrainShape;
use snowpit_core::{HandHardness, Hardness, Point, ProfileConfig};
use snowpit_layout::{DepthReference, LayerFeatures, LayerId};
use snowpit_web::{
    AlertLevel, CaptureCommand, DrawCommand, FormOutcome, HandleStroke, NodeId, PointerButton,
    ProfileEditor, RecordingForm, RecordingSink, handle_rects,
};

fn editor() -> (ProfileEditor<RecordingForm>, RecordingSink) {
    let mut editor =
        ProfileEditor::new(ProfileConfig::default(), RecordingForm::default()).expect("config");
    let mut sink = RecordingSink::new();
    editor.mount(&mut sink);
    sink.take();
    (editor, sink)
}

fn id_at(editor: &ProfileEditor<RecordingForm>, index: usize) -> LayerId {
    editor.profile().layers().layer(index).expect("layer").id()
}

fn description(commands: &[DrawCommand], layer: LayerId) -> Option<Vec<String>> {
    commands.iter().rev().find_map(|command| match command {
        DrawCommand::Text {
            id: NodeId::Description(id),
            lines,
            ..
        } if *id == layer => Some(lines.clone()),
        _ => None,
    })
}

#[test]
fn mount_draws_three_handles() {
    let mut editor =
        ProfileEditor::new(ProfileConfig::default(), RecordingForm::default()).expect("config");
    let mut sink = RecordingSink::new();
    let stats = editor.mount(&mut sink);
    assert_eq!(stats.layers_drawn, 3);
    let handles = handle_rects(sink.commands());
    let ys: Vec<f64> = handles.iter().map(|(_, rect)| rect.center().y).collect();
    assert_eq!(ys, vec![40.0, 100.0, 160.0]);
}

#[test]
fn full_drag_lifecycle_commits_depth_and_hardness() {
    let (mut editor, mut sink) = editor();
    let id = id_at(&editor, 1);
    let handle = editor.profile().layer(id).expect("layer").handle();

    let down = editor
        .pointer_down(id, 7, PointerButton::Primary, handle, &mut sink)
        .expect("down");
    assert_eq!(
        down.capture_command,
        Some(CaptureCommand::Acquire { pointer_id: 7 })
    );
    editor.capture_acquired(7);
    editor
        .pointer_move(7, Point::new(handle.x + 65.0, handle.y + 30.0), &mut sink)
        .expect("move");
    let up = editor
        .pointer_up(7, PointerButton::Primary, Point::new(0.0, 0.0), &mut sink)
        .expect("up");
    assert_eq!(
        up.capture_command,
        Some(CaptureCommand::Release { pointer_id: 7 })
    );

    let layer = editor.profile().layer(id).expect("layer");
    assert_eq!(layer.depth(), 30.0);
    // 105 px falls in the fourth 20 px band.
    assert_eq!(layer.hardness(), Hardness::Code(HandHardness::FourFingerMinus));
    assert_eq!(layer.handle(), Point::new(110.0, 130.0));
    assert_eq!(
        description(sink.commands(), id),
        Some(vec!["30 cm 4F-".to_owned()])
    );
    assert!(editor.drain_alerts().is_empty());
}

#[test]
fn insert_below_without_room_raises_alert() {
    let (mut editor, mut sink) = editor();
    assert!(editor.set_pit_depth(41.0, &mut sink).expect("pit depth"));
    sink.take();

    let bottom = id_at(&editor, 2);
    let inserted = editor.insert_below(bottom, &mut sink).expect("no invariant broken");
    assert_eq!(inserted, None);
    assert!(sink.commands().is_empty());
    assert_eq!(editor.profile().len(), 3);

    let alerts = editor.drain_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert!(alerts[0].message.contains("no room"), "{}", alerts[0].message);
}

#[test]
fn repeated_rejections_fold_while_pending_and_show_again_after_drain() {
    let (mut editor, mut sink) = editor();
    for _ in 0..3 {
        assert!(!editor.set_pit_depth(900.0, &mut sink).expect("no invariant"));
    }
    assert_eq!(editor.drain_alerts().len(), 1);
    assert_eq!(editor.alert_stats().deduplicated, 2);

    // No host time passes between the two rejections.
    assert!(!editor.set_pit_depth(900.0, &mut sink).expect("no invariant"));
    assert_eq!(editor.drain_alerts().len(), 1);
}

#[test]
fn every_dismissed_rejection_is_raised_again() {
    let (mut editor, mut sink) = editor();
    assert!(editor.set_pit_depth(41.0, &mut sink).expect("pit depth"));
    let bottom = id_at(&editor, 2);

    assert_eq!(editor.insert_below(bottom, &mut sink).expect("no invariant"), None);
    assert_eq!(editor.drain_alerts().len(), 1);
    editor.tick(Duration::from_millis(500), &mut sink);
    assert_eq!(editor.insert_below(bottom, &mut sink).expect("no invariant"), None);
    let alerts = editor.drain_alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("no room"), "{}", alerts[0].message);
}

#[test]
fn rejected_pit_depth_leaves_active_drag_alone() {
    let (mut editor, mut sink) = editor();
    let id = id_at(&editor, 1);
    let handle = editor.profile().layer(id).expect("layer").handle();
    editor
        .pointer_down(id, 3, PointerButton::Primary, handle, &mut sink)
        .expect("down");
    let drag_before = editor.profile().drag_state();
    sink.take();

    assert!(!editor.set_pit_depth(9999.0, &mut sink).expect("no invariant"));
    assert_eq!(editor.pointer().active_pointer_id(), Some(3));
    assert_eq!(editor.profile().drag_state(), drag_before);
    assert_eq!(editor.profile().layer(id).expect("layer").hardness(), Hardness::Untouched);
    assert_eq!(editor.profile().boundaries().pit_depth(), 200.0);
    assert!(sink.commands().is_empty());
    assert_eq!(editor.drain_alerts().len(), 1);
}

#[test]
fn insert_buttons_redraw_every_row() {
    let (mut editor, mut sink) = editor();
    let top = id_at(&editor, 0);
    let new_id = editor
        .insert_above(top, &mut sink)
        .expect("no invariant")
        .expect("accepted");
    assert_eq!(editor.profile().layers().depths(), vec![0.0, 1.0, 20.0, 40.0]);
    assert_eq!(editor.profile().index_of(new_id), Ok(0));
    assert_eq!(handle_rects(sink.commands()).len(), 4);
    assert_eq!(editor.scene().drawn_layers().len(), 4);
}

#[test]
fn form_save_updates_description_and_delete_removes_layer() {
    let (mut editor, mut sink) = editor();
    let id = id_at(&editor, 1);
    editor.edit(id).expect("edit");
    assert_eq!(editor.editing(), Some(id));
    assert_eq!(editor.form().opened, vec![(id, LayerFeatures::default())]);

    let invalid = LayerFeatures {
        grain_subshape: Some("FCxr".into()),
        ..LayerFeatures::default()
    };
    editor
        .form_closed(id, FormOutcome::Save(invalid), &mut sink)
        .expect("no invariant");
    assert_eq!(editor.drain_alerts().len(), 1);
    assert!(sink.commands().is_empty());

    let features = LayerFeatures {
        grain_shape: Some(GrainShape::Fc),
        grain_subshape: Some("FCxr".into()),
        grain_size_min_mm: Some(1.0),
        grain_size_max_mm: Some(2.0),
        ..LayerFeatures::default()
    };
    editor
        .form_closed(id, FormOutcome::Save(features), &mut sink)
        .expect("no invariant");
    assert_eq!(editor.editing(), None);
    assert_eq!(
        description(sink.commands(), id),
        Some(vec!["20 cm".to_owned(), "FCxr 1-2mm".to_owned()])
    );

    sink.take();
    editor
        .form_closed(id, FormOutcome::Delete, &mut sink)
        .expect("no invariant");
    assert_eq!(editor.profile().len(), 2);
    assert!(
        sink.commands()
            .contains(&DrawCommand::Remove { id: NodeId::Handle(id) })
    );
}

#[test]
fn stale_layer_raises_error_alert() {
    let (mut editor, mut sink) = editor();
    let id = id_at(&editor, 2);
    assert!(editor.delete(id, &mut sink).expect("delete"));
    assert!(editor.insert_below(id, &mut sink).is_err());
    let alerts = editor.drain_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Error);
}

#[test]
fn pit_change_during_drag_cancels_pointer() {
    let (mut editor, mut sink) = editor();
    let id = id_at(&editor, 2);
    let handle = editor.profile().layer(id).expect("layer").handle();
    editor
        .pointer_down(id, 3, PointerButton::Primary, handle, &mut sink)
        .expect("down");
    assert!(editor.set_pit_depth(30.0, &mut sink).expect("pit depth"));
    assert_eq!(editor.pointer().active_pointer_id(), None);
    assert_eq!(editor.profile().layers().depths(), vec![0.0, 20.0, 30.0]);
    let layer = editor.profile().layer(id).expect("layer");
    assert_eq!(layer.hardness(), Hardness::Code(HandHardness::FistMinus));
}

#[test]
fn known_total_depth_relabels_rows_from_ground() {
    let (mut editor, mut sink) = editor();
    assert!(editor.set_total_snow_depth(200.0, &mut sink).expect("total"));
    let top = id_at(&editor, 0);
    assert_eq!(description(sink.commands(), top), Some(vec!["200 cm".to_owned()]));

    sink.take();
    assert!(
        editor
            .set_depth_reference(DepthReference::Surface, &mut sink)
            .expect("reference")
    );
    assert_eq!(description(sink.commands(), top), Some(vec!["0 cm".to_owned()]));
}

#[test]
fn untouched_handles_blink_until_pressed() {
    let (mut editor, mut sink) = editor();
    editor.tick(Duration::from_millis(499), &mut sink);
    assert!(sink.commands().is_empty());
    editor.tick(Duration::from_millis(1), &mut sink);
    let strokes: Vec<HandleStroke> = sink
        .take()
        .into_iter()
        .filter_map(|command| match command {
            DrawCommand::Stroke { stroke, .. } => Some(stroke),
            _ => None,
        })
        .collect();
    assert_eq!(strokes, vec![HandleStroke::BlinkOn; 3]);

    let id = id_at(&editor, 0);
    let handle = editor.profile().layer(id).expect("layer").handle();
    editor
        .pointer_down(id, 1, PointerButton::Primary, handle, &mut sink)
        .expect("down");
    editor
        .pointer_up(1, PointerButton::Primary, handle, &mut sink)
        .expect("up");
    sink.take();

    editor.tick(Duration::from_millis(500), &mut sink);
    assert_eq!(sink.commands().len(), 2);
    assert!(
        !sink
            .commands()
            .iter()
            .any(|command| command.id() == NodeId::Handle(id))
    );
}
