//! End-to-end editing scenarios on the stock editor configuration
//! (600 px tall graph, 200 cm pit, layers at 0, 20 and 40 cm).

use std::sync::{Arc, Mutex};

use snowpit_core::{Point, ProfileConfig};
use snowpit_layout::{
    DepthReference, InvariantError, LayerChange, LayerId, Profile, ProfileError, ValidationError,
};
use tracing_subscriber::layer::SubscriberExt;

fn profile() -> Profile {
    Profile::new(ProfileConfig::default()).expect("default config")
}

fn id_at(profile: &Profile, index: usize) -> LayerId {
    profile.layers().layer(index).expect("in range").id()
}

#[derive(Clone, Default)]
struct LevelCapture {
    events: Arc<Mutex<Vec<tracing::Level>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LevelCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        self.events.lock().unwrap().push(*event.metadata().level());
    }
}

fn capture_levels<F: FnOnce()>(f: F) -> Vec<tracing::Level> {
    let capture = LevelCapture::default();
    let events = Arc::clone(&capture.events);
    let subscriber = tracing_subscriber::registry().with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let levels = events.lock().unwrap().clone();
    levels
}

#[test]
fn drag_between_neighbors_and_clamp_above_next() {
    let mut profile = profile();
    let transform = profile.transform().clone();
    let id = id_at(&profile, 1);
    let handle = profile.layer(id).unwrap().handle();

    profile.press_handle(id, 1, handle).unwrap();
    profile
        .drag_handle(1, Point::new(handle.x, transform.depth_to_y(30.0)))
        .unwrap();
    let depth = profile.layer(id).unwrap().depth();
    assert!(depth > 0.0 && depth < 40.0);
    assert!((depth - 30.0).abs() < 1e-9);

    profile
        .drag_handle(1, Point::new(handle.x, transform.depth_to_y(50.0)))
        .unwrap();
    profile.release_handle(1).unwrap();

    let one_px_of_depth = 1.0 / transform.px_per_cm();
    let depth = profile.layer(id).unwrap().depth();
    assert!(
        (depth - (40.0 - one_px_of_depth)).abs() < 1e-9,
        "clamped to {depth}"
    );
    assert_eq!(profile.index_of(id), Ok(1));
}

#[test]
fn bottom_layer_clamps_to_pit_bottom() {
    let mut profile = profile();
    let id = id_at(&profile, 2);
    let handle = profile.layer(id).unwrap().handle();
    profile.press_handle(id, 1, handle).unwrap();
    profile
        .drag_handle(1, Point::new(handle.x, 10_000.0))
        .unwrap();
    profile.release_handle(1).unwrap();
    assert_eq!(profile.layer(id).unwrap().depth(), 200.0);
}

#[test]
fn insert_below_bottom_without_room_fails() {
    let mut profile = profile();
    profile.set_pit_depth(41.0).unwrap();
    profile.drain_changes();

    let err = profile.insert_below(2).unwrap_err();
    assert_eq!(
        err,
        ProfileError::Validation(ValidationError::NoRoomToInsert {
            index: 2,
            pit_depth: 41.0
        })
    );
    assert_eq!(profile.len(), 3);
    assert_eq!(profile.layers().depths(), vec![0.0, 20.0, 40.0]);
    assert!(profile.drain_changes().is_empty());
}

#[test]
fn known_total_depth_switches_to_ground() {
    let mut profile = profile();
    let before = profile.layers().depths();
    profile.set_total_snow_depth(200.0).unwrap();

    let boundaries = profile.boundaries();
    assert_eq!(boundaries.depth_reference(), DepthReference::Ground);
    assert!(boundaries.is_reference_selector_visible());
    assert_eq!(profile.layers().depths(), before);
    let shown: Vec<f64> = profile.summary().iter().map(|s| s.display_depth).collect();
    assert_eq!(shown, vec![200.0, 180.0, 160.0]);
}

#[test]
fn shrinking_pit_clamps_and_keeps_tie_order() {
    let mut profile = profile();
    let at_30 = profile.insert_below(1).unwrap();
    let at_40 = id_at(&profile, 3);
    assert_eq!(profile.layer(at_30).unwrap().depth(), 30.0);

    profile.set_pit_depth(30.0).unwrap();
    assert_eq!(profile.layers().depths(), vec![0.0, 20.0, 30.0, 30.0]);
    assert_eq!(profile.index_of(at_30), Ok(2));
    assert_eq!(profile.index_of(at_40), Ok(3));

    let changes = profile.drain_changes();
    assert!(changes.grid);
    assert!(changes.layers.contains(&LayerChange::Updated { id: at_40 }));
    assert!(changes.has_structural_change());
}

#[test]
fn pit_depth_outside_limits_is_rejected() {
    let mut profile = profile();
    for bad in [5.0, 501.0, f64::NAN] {
        let err = profile.set_pit_depth(bad).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Validation(ValidationError::PitDepthOutOfRange { .. })
        ));
    }
    profile.set_total_snow_depth(250.0).unwrap();
    assert!(matches!(
        profile.set_pit_depth(260.0),
        Err(ProfileError::Validation(ValidationError::PitDepthAboveTotal { .. }))
    ));
    assert_eq!(profile.boundaries().pit_depth(), 200.0);
}

#[test]
fn crowded_insert_cascades_push_down() {
    let mut profile = profile();
    let at_40 = id_at(&profile, 2);
    // Halving the gap below layer 1 until it is tighter than two increments
    // forces the later inserts to push the layers below it down.
    for _ in 0..6 {
        profile.insert_below(1).unwrap();
    }
    let depths = profile.layers().depths();
    assert_eq!(depths.len(), 9);
    assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
    assert_eq!(&depths[..3], &[0.0, 20.0, 21.0625]);
    assert_eq!(&depths[5..8], &[24.5, 26.0, 30.0]);
    assert_eq!(profile.layer(at_40).unwrap().depth(), 40.0);
}

#[test]
fn stale_id_logs_error() {
    let mut profile = profile();
    let id = id_at(&profile, 2);
    profile.delete_layer(2).unwrap();

    let levels = capture_levels(|| {
        let err = profile.set_features(id, Default::default()).unwrap_err();
        assert_eq!(err, ProfileError::Invariant(InvariantError::LayerNotFound { id }));
    });
    assert!(levels.contains(&tracing::Level::ERROR), "{levels:?}");
}

#[test]
fn rejection_logs_warning() {
    let mut profile = profile();
    let levels = capture_levels(|| {
        profile.set_depth_reference(DepthReference::Ground).unwrap_err();
    });
    assert_eq!(levels, vec![tracing::Level::WARN]);
}

#[test]
fn summary_serializes_hardness_codes() {
    let mut profile = profile();
    let id = id_at(&profile, 1);
    let handle = profile.layer(id).unwrap().handle();
    profile.press_handle(id, 1, handle).unwrap();
    profile.release_handle(1).unwrap();

    let json = serde_json::to_value(profile.summary()).unwrap();
    assert_eq!(json[0]["hardness"], serde_json::json!({ "kind": "untouched" }));
    assert_eq!(
        json[1]["hardness"],
        serde_json::json!({ "kind": "code", "code": "F-" })
    );
    assert_eq!(json[1]["id"], serde_json::json!(id.get()));
    assert_eq!(json[1]["touched"], serde_json::json!(true));
}
