#![forbid(unsafe_code)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use snowpit_core::{Point, ProfileConfig};
use snowpit_web::{PointerButton, ProfileEditor, RecordingForm, RecordingSink};
use std::hint::black_box;

fn mounted() -> (ProfileEditor<RecordingForm>, RecordingSink) {
    let mut editor = ProfileEditor::new(ProfileConfig::default(), RecordingForm::default())
        .expect("default config should be valid");
    let mut sink = RecordingSink::new();
    editor.mount(&mut sink);
    sink.take();
    (editor, sink)
}

fn bench_handle_pointer_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle/web_pointer/lifecycle");

    for moves in [32_u32, 120] {
        group.bench_function(format!("down_ack_move_{moves}_up"), |b| {
            b.iter_batched(
                mounted,
                |(mut editor, mut sink)| {
                    let layer = editor.profile().layers().layer(1).expect("layer 1");
                    let (id, handle) = (layer.id(), layer.handle());

                    let down = editor
                        .pointer_down(id, 11, PointerButton::Primary, handle, &mut sink)
                        .expect("down");
                    black_box(down.capture_command);
                    black_box(editor.capture_acquired(11).log.phase);

                    for step in 0..moves {
                        let x = handle.x + f64::from(step % 17) * 20.0;
                        let y = handle.y + f64::from(step % 40) - 20.0;
                        let dispatch = editor
                            .pointer_move(11, Point::new(x, y), &mut sink)
                            .expect("move");
                        black_box(dispatch.transition.map(|t| t.transition_id));
                    }

                    let up = editor
                        .pointer_up(11, PointerButton::Primary, handle, &mut sink)
                        .expect("up");
                    black_box(up.ended_drag());
                    black_box(sink.take().len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_blink_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle/web_pointer/blink");
    group.bench_function("tick_16ms", |b| {
        let (mut editor, mut sink) = mounted();
        b.iter(|| {
            editor.tick(std::time::Duration::from_millis(16), &mut sink);
            black_box(sink.take().len())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_handle_pointer_lifecycle, bench_blink_tick);
criterion_main!(benches);
