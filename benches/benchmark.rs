use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use std::rc::Rc;
use std::time::Duration;
use wave_studio::audio::NullBackend;
use wave_studio::render::{AutoScale, CombinedRenderer, CombinedTrace, DisplayList, TimeWindow};
use wave_studio::transport::ManualClock;
use wave_studio::{StudioConfig, WaveCollection, WaveKind};

fn collection(count: usize) -> WaveCollection {
    let mut collection = WaveCollection::new(
        &StudioConfig::default(),
        Default::default(),
        Rc::new(ManualClock::new(0.0)),
        Box::new(NullBackend),
    );
    for i in 0..count {
        let wave = collection.add();
        wave.set_frequency(20.0 + 37.0 * i as f64);
        wave.set_wave_type(WaveKind::ALL[i % WaveKind::ALL.len()]);
    }
    collection
}

fn benchmark_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sampling_mode(SamplingMode::Flat);

    for count in [6, 32] {
        let collection = collection(count);
        let window = TimeWindow::new(50, 20.0);

        group.bench_function(format!("combined_trace_{}", count), |b| {
            b.iter(|| {
                CombinedTrace::compute(
                    black_box(collection.waves()),
                    black_box(&window),
                    1920.0,
                    260.0,
                    0.5,
                    &AutoScale::default(),
                )
            })
        });
    }

    let collection = collection(6);
    let window = collection.window();
    let mut list = DisplayList::new(1920.0, 300.0);
    let mut renderer = CombinedRenderer::new(20.0, 0.5, AutoScale::default());

    group.bench_function("combined_redraw_cached", |b| {
        b.iter(|| renderer.draw(&mut list, collection.waves(), &window, black_box(Some(0.25))))
    });

    group.finish();
}

fn custom_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
        .configure_from_args()
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets = benchmark_functions
}
criterion_main!(benches);
