use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wave_studio::audio::NullBackend;
use wave_studio::render::{Color, DisplayList};
use wave_studio::transport::ManualClock;
use wave_studio::{Studio, StudioConfig, WaveEvent, WaveKind};

fn studio(clock: &ManualClock) -> Studio {
    Studio::new(
        StudioConfig::default(),
        Rc::new(clock.clone()),
        Box::new(NullBackend),
    )
}

fn sample_times(count: usize, duration: f64) -> impl Iterator<Item = f64> {
    (0..=count).map(move |i| i as f64 / count as f64 * duration)
}

#[test]
fn test_opposite_phases_cancel_out() {
    let clock = ManualClock::new(0.0);
    let mut studio = studio(&clock);
    studio.populate(2);

    for (id, phase) in [(1, 0.0), (2, PI)] {
        let wave = studio.collection_mut().get_mut(id).unwrap();
        wave.set_frequency(100.0);
        wave.set_amplitude(100.0);
        wave.set_wave_type(WaveKind::Sine);
        wave.set_phase_shift(phase);
    }

    for t in sample_times(1000, 0.5) {
        assert!(studio.collection().combined_value_at(t).abs() < 1e-9);
    }

    let mut list = DisplayList::new(800.0, 300.0);
    studio.frame();
    studio.draw_combined(&mut list, None);
    let trace = studio.combined().trace().unwrap();
    assert_eq!(trace.scale, 1.0);
    assert!(list.texts().contains(&"1.0 px/unit"));
}

#[test]
fn test_square_wave_quarter_points() {
    let clock = ManualClock::new(0.0);
    let mut studio = studio(&clock);
    studio.populate(1);

    let wave = studio.collection_mut().get_mut(1).unwrap();
    wave.set_frequency(20.0);
    wave.set_amplitude(50.0);
    wave.set_wave_type(WaveKind::Square);

    let wave = studio.collection().get(1).unwrap();
    assert_eq!(wave.value_at(0.0), 0.0);
    assert_eq!(wave.value_at(1.0 / 80.0), 0.5);
    assert_eq!(wave.value_at(3.0 / 80.0), -0.5);
}

#[test]
fn test_remove_middle_wave() {
    let clock = ManualClock::new(0.0);
    let mut studio = studio(&clock);
    studio.populate(3);

    let removed: Vec<f64> = sample_times(200, 0.1)
        .map(|t| studio.collection().get(2).unwrap().value_at(t))
        .collect();
    let before: Vec<f64> = sample_times(200, 0.1)
        .map(|t| studio.collection().combined_value_at(t))
        .collect();

    studio.collection_mut().remove(2);
    studio.frame();

    assert_eq!(studio.collection().len(), 2);
    assert_eq!(studio.collection().ids(), vec![1, 3]);
    assert_eq!(studio.renderer_ids(), vec![1, 3]);

    for (i, t) in sample_times(200, 0.1).enumerate() {
        let after = studio.collection().combined_value_at(t);
        assert!((after - (before[i] - removed[i])).abs() < 1e-9);
    }
}

#[test]
fn test_toggle_drops_wave_from_sum() {
    let clock = ManualClock::new(0.0);
    let mut studio = studio(&clock);
    studio.populate(4);
    studio.collection_mut().get_mut(3).unwrap().set_wave_type(WaveKind::Triangle);

    let times: Vec<f64> = sample_times(300, 0.5).collect();
    let before: Vec<f64> = times
        .iter()
        .map(|&t| studio.collection().combined_value_at(t))
        .collect();
    let toggled: Vec<f64> = times
        .iter()
        .map(|&t| studio.collection().get(3).unwrap().value_at(t))
        .collect();

    studio.collection_mut().get_mut(3).unwrap().toggle_active();

    for (i, &t) in times.iter().enumerate() {
        let after = studio.collection().combined_value_at(t);
        assert!((after - (before[i] - toggled[i])).abs() < 1e-9);
    }
}

#[test]
fn test_every_change_is_announced_once() {
    let clock = ManualClock::new(0.0);
    let mut studio = studio(&clock);
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    studio
        .bus()
        .subscribe(move |event: &WaveEvent| sink.borrow_mut().push(event.name()));

    studio.populate(1);
    let wave = studio.collection_mut().get_mut(1).unwrap();
    wave.set_frequency(300.0);
    wave.set_wave_type(WaveKind::Sawtooth);
    wave.toggle_active();
    studio.collection_mut().broadcast_visible_cycles(4);
    studio.collection_mut().remove(1);
    studio.collection_mut().remove(1);

    assert_eq!(
        *names.borrow(),
        vec![
            "wave-added",
            "wave-property-changed",
            "wave-property-changed",
            "wave-toggled",
            "wave-property-changed",
            "display-changed",
            "wave-removed",
        ]
    );
}

#[test]
fn test_play_stop_and_redraw_cancellation() {
    let clock = ManualClock::new(100.0);
    let mut studio = studio(&clock);
    studio.populate(2);

    studio.collection_mut().play();
    let origin = studio.collection().playback_start_time();
    clock.advance(1.0);
    studio.collection_mut().play();
    assert_eq!(studio.collection().playback_start_time(), origin);
    assert_eq!(studio.frame(), Some(1.0));

    let mut list = DisplayList::new(400.0, 100.0);
    assert!(studio.draw_wave(1, &mut list, studio.collection().frame_elapsed()));
    assert_eq!(list.strokes_with(Color::CURSOR).len(), 1);

    studio.collection_mut().stop();
    studio.collection_mut().stop();
    assert!(!studio.collection().is_playing());
    assert_eq!(studio.collection().playback_start_time(), None);

    clock.advance(1.0);
    let elapsed = studio.frame();
    assert_eq!(elapsed, None);
    assert!(studio.draw_wave(1, &mut list, elapsed));
    assert!(list.strokes_with(Color::CURSOR).is_empty());
}
