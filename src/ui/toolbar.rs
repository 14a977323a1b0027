use crate::collection::WaveCollection;
use egui::{Slider, Ui};

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    AddWave,
    Play,
    Stop,
    SetAllActive(bool),
    VisibleCycles(u32),
    BaseFrequency(f64),
    MasterVolume(f64),
}

/// Global controls. Returns what the user asked for this frame; nothing is
/// changed until [`apply`] runs.
pub fn render(ui: &mut Ui, collection: &WaveCollection) -> Vec<ToolbarAction> {
    let mut actions = vec![];
    let limits = *collection.limits();

    ui.horizontal(|ui| {
        if ui.button("Add Wave").clicked() {
            actions.push(ToolbarAction::AddWave);
        }

        if collection.is_playing() {
            if ui.button("⏹ Stop").clicked() {
                actions.push(ToolbarAction::Stop);
            }
        } else if ui.button("▶ Play").clicked() {
            actions.push(ToolbarAction::Play);
        }

        if ui.button("All Active").clicked() {
            actions.push(ToolbarAction::SetAllActive(true));
        }
        if ui.button("All Inactive").clicked() {
            actions.push(ToolbarAction::SetAllActive(false));
        }

        ui.separator();

        let mut cycles = collection.visible_cycles();
        if ui
            .add(Slider::new(&mut cycles, 1..=limits.max_visible_cycles).text("Cycles"))
            .changed()
        {
            actions.push(ToolbarAction::VisibleCycles(cycles));
        }

        let mut base = collection.base_frequency();
        if ui
            .add(
                Slider::new(&mut base, limits.min_frequency..=limits.max_frequency)
                    .logarithmic(true)
                    .suffix(" Hz")
                    .text("Base"),
            )
            .changed()
        {
            actions.push(ToolbarAction::BaseFrequency(base));
        }

        let mut volume = collection.master_volume();
        if ui
            .add(Slider::new(&mut volume, 0.0..=100.0).suffix("%").text("Volume"))
            .changed()
        {
            actions.push(ToolbarAction::MasterVolume(volume));
        }
    });

    actions
}

pub fn apply(collection: &mut WaveCollection, action: ToolbarAction) {
    match action {
        ToolbarAction::AddWave => {
            collection.add();
        }
        ToolbarAction::Play => collection.play(),
        ToolbarAction::Stop => collection.stop(),
        ToolbarAction::SetAllActive(active) => collection.set_active_for_all(active),
        ToolbarAction::VisibleCycles(cycles) => collection.broadcast_visible_cycles(cycles),
        ToolbarAction::BaseFrequency(frequency) => collection.broadcast_base_frequency(frequency),
        ToolbarAction::MasterVolume(volume) => collection.set_master_volume(volume),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullBackend;
    use crate::config::StudioConfig;
    use crate::events::EventBus;
    use crate::transport::ManualClock;
    use std::rc::Rc;

    fn collection() -> WaveCollection {
        WaveCollection::new(
            &StudioConfig::default(),
            EventBus::new(),
            Rc::new(ManualClock::new(0.0)),
            Box::new(NullBackend),
        )
    }

    #[test]
    fn test_apply_actions() {
        let mut collection = collection();
        apply(&mut collection, ToolbarAction::AddWave);
        apply(&mut collection, ToolbarAction::AddWave);
        assert_eq!(collection.ids(), vec![1, 2]);

        apply(&mut collection, ToolbarAction::SetAllActive(false));
        assert_eq!(collection.active_waves().count(), 0);

        apply(&mut collection, ToolbarAction::VisibleCycles(500));
        assert_eq!(collection.visible_cycles(), 50);
        assert!(collection.waves().iter().all(|wave| wave.visible_cycles() == 50));

        apply(&mut collection, ToolbarAction::BaseFrequency(5.0));
        assert_eq!(collection.base_frequency(), 20.0);

        apply(&mut collection, ToolbarAction::Play);
        assert!(collection.is_playing());
        apply(&mut collection, ToolbarAction::Stop);
        assert!(!collection.is_playing());
    }
}
