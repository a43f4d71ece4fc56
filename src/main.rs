//! Patch Envelope Editor (Demo).
//!
//! Zeigt drei Envelope-Anzeigen, die an einen gemeinsamen Parameter-Store
//! gebunden sind. Breakpoints lassen sich per Maus ziehen; die Slider im
//! Seitenpanel schreiben in denselben Store.

use eframe::egui;
use indexmap::IndexSet;
use envelope_engine::{DragToken, ParameterModel, ParameterStore, WidgetId};
use patch_envelope_editor::{presets, ui, EnvelopeViewOptions, EnvelopeWidget};

fn main() -> Result<(), eframe::Error> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<(), eframe::Error> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Patch Envelope Editor v{} startet...",
            env!("CARGO_PKG_VERSION")
        );

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([960.0, 640.0])
                .with_title("Patch Envelope Editor"),
            renderer: eframe::Renderer::Glow,
            multisampling: 4,
            ..Default::default()
        };

        eframe::run_native(
            "Patch Envelope Editor",
            options,
            Box::new(|_cc| {
                let app = EditorApp::new()?;
                Ok(Box::new(app))
            }),
        )
    }
}

/// Haupt-Anwendungsstruktur
struct EditorApp {
    store: ParameterStore,
    widgets: Vec<(&'static str, EnvelopeWidget)>,
    token: DragToken,
    options: EnvelopeViewOptions,
}

impl EditorApp {
    fn new() -> anyhow::Result<Self> {
        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = EnvelopeViewOptions::config_path();
        let options = EnvelopeViewOptions::load_from_file(&config_path);

        let mut store = presets::demo_store();
        let mut widgets = Vec::new();
        for (i, preset) in presets::all()?.into_iter().enumerate() {
            let mut widget = EnvelopeWidget::new(
                WidgetId(i as u64 + 1),
                preset.spec,
                preset.variant,
                options.curve_samples,
            );
            widget.attach(&mut store);
            widgets.push((preset.title, widget));
        }
        log::info!("{} Envelopes geladen", widgets.len());

        Ok(Self {
            store,
            widgets,
            token: DragToken::new(),
            options,
        })
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_parameter_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            for (title, widget) in &mut self.widgets {
                ui.label(*title);
                ui::show_envelope(ui, widget, &mut self.store, &mut self.token, &self.options);
                ui.add_space(8.0);
            }
        });

        self.maybe_request_repaint(ctx);
    }
}

impl EditorApp {
    /// Slider für alle Keys; Änderungen laufen über den Store zu den Listenern.
    fn render_parameter_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("parameters")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Parameter");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let keys: IndexSet<String> = self
                        .widgets
                        .iter()
                        .flat_map(|(_, w)| w.spec().referenced_keys())
                        .collect();
                    for key in keys {
                        let (Some(min), Some(max)) = (self.store.min(&key), self.store.max(&key))
                        else {
                            continue;
                        };
                        let mut value = self.store.get(&key, min);
                        if ui
                            .add(egui::Slider::new(&mut value, min..=max).text(key.as_str()))
                            .changed()
                        {
                            self.store.set(&key, value);
                        }
                    }
                });
            });
    }

    fn maybe_request_repaint(&self, ctx: &egui::Context) {
        let dirty = self
            .widgets
            .iter()
            .fold(false, |any, (_, w)| w.take_dirty() || any);
        if dirty || self.token.owner().is_some() {
            ctx.request_repaint();
        }
    }
}
