use eframe::Frame;
use egui::{CentralPanel, Color32, ScrollArea, Sense, TopBottomPanel};
use simple_logger::SimpleLogger;
use std::collections::BTreeMap;
use std::rc::Rc;
use wave_studio::audio::{AudioBackend, DeviceBackend, NullBackend};
use wave_studio::render::fit_viewport;
use wave_studio::transport::MonotonicClock;
use wave_studio::ui::{toolbar, wave_panel, PainterSurface, WavePanel};
use wave_studio::{Studio, StudioConfig, WaveId};

const COMBINED_ASPECT: f32 = 4.0;

struct App {
    studio: Studio,
    panels: BTreeMap<WaveId, WavePanel>,
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let elapsed = self.studio.frame();
        self.sync_panels();

        let mut toolbar_actions = vec![];
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar_actions = toolbar::render(ui, self.studio.collection());
        });

        let mut wave_actions = vec![];
        CentralPanel::default().show(ctx, |ui| {
            let max_width = ui.available_width();
            let (width, height) = fit_viewport(max_width, max_width / 2.0, Some(COMBINED_ASPECT));
            let (response, painter) =
                ui.allocate_painter(egui::vec2(width as f32, height as f32), Sense::hover());
            let mut surface =
                PainterSurface::new(&painter, response.rect, Color32::from_gray(0x12));
            self.studio.draw_combined(&mut surface, elapsed);

            ui.separator();

            ScrollArea::vertical().show(ui, |ui| {
                for panel in self.panels.values_mut() {
                    for action in panel.render(ui, &self.studio, elapsed) {
                        wave_actions.push((panel.wave_id(), action));
                    }
                    ui.separator();
                }
            });
        });

        // Edits land after this frame was painted, so another pass shows them.
        let changed = !toolbar_actions.is_empty() || !wave_actions.is_empty();
        for action in toolbar_actions {
            toolbar::apply(self.studio.collection_mut(), action);
        }
        for (id, action) in wave_actions {
            wave_panel::apply(self.studio.collection_mut(), id, action);
            let wave = self.studio.collection().get(id);
            if let (Some(panel), Some(wave)) = (self.panels.get_mut(&id), wave) {
                panel.refresh(wave);
            }
        }

        if changed || self.studio.collection().is_playing() {
            ctx.request_repaint();
        }
    }
}

impl App {
    fn sync_panels(&mut self) {
        let collection = self.studio.collection();
        self.panels.retain(|id, _| collection.get(*id).is_some());
        for wave in collection.waves() {
            self.panels
                .entry(wave.id())
                .or_insert_with(|| WavePanel::new(wave));
        }
    }

    fn new(config: StudioConfig) -> Self {
        let backend: Box<dyn AudioBackend> = match DeviceBackend::open(config.sample_rate) {
            Ok(device) => {
                log::info!("Sound output at {} Hz", device.sample_rate());
                Box::new(device)
            }
            Err(err) => {
                log::warn!("{err}, continuing without sound");
                Box::new(NullBackend)
            }
        };
        let initial_waves = config.initial_waves;

        let mut studio = Studio::new(config, Rc::new(MonotonicClock::new()), backend);
        studio.populate(initial_waves);

        let mut app = App {
            studio,
            panels: BTreeMap::new(),
        };
        app.sync_panels();
        app
    }
}

fn main() -> Result<(), eframe::Error> {
    let config = StudioConfig::load_or_default();
    let level = config.level_filter().unwrap_or(log::LevelFilter::Info);

    SimpleLogger::new().with_level(level).init().unwrap();

    log::info!(
        "Starting with {} waves, {} cycles at {} Hz",
        config.initial_waves,
        config.visible_cycles,
        config.base_frequency
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1250.0, 750.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Wave Studio",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(config)))),
    )
}
