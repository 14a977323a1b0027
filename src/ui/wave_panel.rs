use crate::collection::WaveCollection;
use crate::render::fit_viewport;
use crate::studio::Studio;
use crate::ui::painter_surface::{to_color32, PainterSurface};
use crate::wave::formula::format_number;
use crate::wave::kind::WaveKind;
use crate::wave::{coerce_amplitude, coerce_frequency, coerce_phase, Wave, WaveId};
use egui::{Color32, ComboBox, Sense, Slider, TextEdit, Ui};

/// Share of the window height given to each wave canvas.
const CANVAS_SHARE: f32 = 0.125;
const BACKGROUND: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x1e);

/// Text edits arrive raw and are coerced when applied. Slider values are
/// clamped by the wave setters.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveAction {
    Frequency(String),
    Amplitude(String),
    SetFrequency(f64),
    SetAmplitude(f64),
    Phase(String),
    WaveType(WaveKind),
    Toggle,
    Remove,
}

/// One row of the wave list: canvas on the left, controls on the right.
#[derive(Debug, Clone)]
pub struct WavePanel {
    wave_id: WaveId,
    frequency: String,
    amplitude: String,
    phase: String,
}

impl WavePanel {
    pub fn wave_id(&self) -> WaveId {
        self.wave_id
    }

    /// Resets the text fields to the values the wave actually holds.
    pub fn refresh(&mut self, wave: &Wave) {
        self.frequency = format_number(wave.frequency());
        self.amplitude = format_number(wave.amplitude());
        self.phase = format_number(wave.phase_shift());
    }

    pub fn render(
        &mut self,
        ui: &mut Ui,
        studio: &Studio,
        elapsed: Option<f64>,
    ) -> Vec<WaveAction> {
        let mut actions = vec![];
        let Some(wave) = studio.collection().get(self.wave_id) else {
            return actions;
        };

        ui.horizontal(|ui| {
            let controls_width = 260.0;
            let (width, height) = fit_viewport(
                ui.available_width() - controls_width,
                ui.ctx().screen_rect().height() * CANVAS_SHARE,
                None,
            );
            let (response, painter) =
                ui.allocate_painter(egui::vec2(width as f32, height as f32), Sense::hover());
            let mut surface = PainterSurface::new(&painter, response.rect, BACKGROUND);
            studio.draw_wave(self.wave_id, &mut surface, elapsed);

            ui.vertical(|ui| {
                let color = studio
                    .renderer(self.wave_id)
                    .map(|renderer| to_color32(renderer.color()))
                    .unwrap_or(Color32::GRAY);
                ui.colored_label(color, wave.formula().display());

                ui.horizontal(|ui| {
                    let limits = wave.limits();
                    let mut frequency = wave.frequency();
                    let range = limits.min_frequency..=limits.max_frequency;
                    let slider = Slider::new(&mut frequency, range)
                        .logarithmic(true)
                        .show_value(false);
                    if ui.add(slider).changed() {
                        actions.push(WaveAction::SetFrequency(frequency));
                    }

                    let mut amplitude = wave.amplitude();
                    let slider = Slider::new(&mut amplitude, 0.0..=100.0).show_value(false);
                    if ui.add(slider).changed() {
                        actions.push(WaveAction::SetAmplitude(amplitude));
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Freq");
                    if text_field(ui, &mut self.frequency) {
                        actions.push(WaveAction::Frequency(self.frequency.clone()));
                    }
                    ui.label("Amp");
                    if text_field(ui, &mut self.amplitude) {
                        actions.push(WaveAction::Amplitude(self.amplitude.clone()));
                    }
                    ui.label("Phase");
                    if text_field(ui, &mut self.phase) {
                        actions.push(WaveAction::Phase(self.phase.clone()));
                    }
                });

                ui.horizontal(|ui| {
                    let mut kind = wave.wave_type();
                    ComboBox::from_id_source(("wave_type", self.wave_id))
                        .selected_text(kind.label())
                        .show_ui(ui, |ui| {
                            for option in WaveKind::ALL {
                                ui.selectable_value(&mut kind, option, option.label());
                            }
                        });
                    if kind != wave.wave_type() {
                        actions.push(WaveAction::WaveType(kind));
                    }

                    let mut active = wave.is_active();
                    if ui.checkbox(&mut active, "Active").changed() {
                        actions.push(WaveAction::Toggle);
                    }

                    if ui.button("Remove").clicked() {
                        actions.push(WaveAction::Remove);
                    }
                });
            });
        });

        actions
    }

    pub fn new(wave: &Wave) -> Self {
        let mut panel = WavePanel {
            wave_id: wave.id(),
            frequency: String::new(),
            amplitude: String::new(),
            phase: String::new(),
        };
        panel.refresh(wave);
        panel
    }
}

fn text_field(ui: &mut Ui, text: &mut String) -> bool {
    let response = ui.add(TextEdit::singleline(text).desired_width(56.0));
    response.lost_focus()
}

/// Applies `action` to wave `id`. Unknown ids are ignored.
pub fn apply(collection: &mut WaveCollection, id: WaveId, action: WaveAction) {
    if action == WaveAction::Remove {
        collection.remove(id);
        return;
    }

    let Some(wave) = collection.get_mut(id) else {
        return;
    };
    let limits = *wave.limits();
    match action {
        WaveAction::Frequency(raw) => wave.set_frequency(coerce_frequency(&raw, &limits)),
        WaveAction::Amplitude(raw) => wave.set_amplitude(coerce_amplitude(&raw, &limits)),
        WaveAction::SetFrequency(frequency) => wave.set_frequency(frequency),
        WaveAction::SetAmplitude(amplitude) => wave.set_amplitude(amplitude),
        WaveAction::Phase(raw) => wave.set_phase_shift(coerce_phase(&raw, &limits)),
        WaveAction::WaveType(kind) => wave.set_wave_type(kind),
        WaveAction::Toggle => wave.toggle_active(),
        WaveAction::Remove => {}
    }
}
