#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use snowpit_core::{Point, ProfileConfig};
use snowpit_layout::{DepthReference, Profile, ProfileError};

#[derive(Debug, Arbitrary)]
enum Op {
    Press { index: u8, pointer_id: u8 },
    Move { pointer_id: u8, x: i16, y: i16 },
    Release { pointer_id: u8 },
    FinishDrag,
    InsertAbove(u8),
    InsertBelow(u8),
    Delete(u8),
    PushDown(u8),
    PitDepth(u16),
    TotalDepth(i16),
    Ground(bool),
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut profile) = Profile::new(ProfileConfig::default()) else {
        return;
    };

    for op in ops.iter().take(256) {
        let before = profile.summary();
        let before_boundaries = *profile.boundaries();
        match apply(&mut profile, op) {
            Ok(()) => {}
            Err(ProfileError::Validation(_)) => {
                assert_eq!(profile.summary(), before, "{op:?} rejected but mutated");
                assert_eq!(*profile.boundaries(), before_boundaries);
            }
            Err(ProfileError::Invariant(err)) => panic!("{op:?} broke an invariant: {err}"),
        }

        // Post-conditions that must always hold.
        let depths = profile.layers().depths();
        let pit_depth = profile.boundaries().pit_depth();
        assert!(!depths.is_empty(), "profile lost its last layer");
        assert_eq!(depths[0], 0.0, "top layer left the surface");
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
        assert!(depths.iter().all(|&d| (0.0..=pit_depth).contains(&d)));
        profile.drain_changes();
    }
});

fn index(profile: &Profile, raw: u8) -> usize {
    usize::from(raw) % profile.len()
}

fn apply(profile: &mut Profile, op: &Op) -> Result<(), ProfileError> {
    match *op {
        Op::Press { index: raw, pointer_id } => {
            let layer = profile.layers().layer(index(profile, raw))?;
            let (id, handle) = (layer.id(), layer.handle());
            profile.press_handle(id, u32::from(pointer_id), handle).map(drop)
        }
        Op::Move { pointer_id, x, y } => profile
            .drag_handle(u32::from(pointer_id), Point::new(f64::from(x), f64::from(y)))
            .map(drop),
        Op::Release { pointer_id } => profile.release_handle(u32::from(pointer_id)).map(drop),
        Op::FinishDrag => profile.finish_drag().map(drop),
        Op::InsertAbove(raw) => profile.insert_above(index(profile, raw)).map(drop),
        Op::InsertBelow(raw) => profile.insert_below(index(profile, raw)).map(drop),
        Op::Delete(raw) => profile.delete_layer(index(profile, raw)).map(drop),
        Op::PushDown(raw) => {
            // Only insert-above pushes the surface layer.
            let index = index(profile, raw).max(1);
            if index >= profile.len() {
                return Ok(());
            }
            profile.push_down(index).map(drop)
        }
        Op::PitDepth(depth) => profile.set_pit_depth(f64::from(depth)),
        Op::TotalDepth(depth) => profile.set_total_snow_depth(f64::from(depth)),
        Op::Ground(ground) => profile.set_depth_reference(if ground {
            DepthReference::Ground
        } else {
            DepthReference::Surface
        }),
    }
}
