use std::collections::VecDeque;

use egui::{Align, CentralPanel, ComboBox, Key, Layout, RichText, SidePanel, TopBottomPanel};

use crate::{
    logger::Record,
    widgets::{LogWindow, Wheel, WheelState},
    SETTINGS_KEY,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Winner {
    pub value: String,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistState {
    pub pixels_per_point: f32,
    pub last_winner: Option<Winner>,
    pub spins: usize,
}

impl Default for PersistState {
    fn default() -> Self {
        Self {
            pixels_per_point: Self::DEFAULT_PIXELS_PER_POINT,
            last_winner: None,
            spins: 0,
        }
    }
}

impl PersistState {
    pub const DEFAULT_PIXELS_PER_POINT: f32 = 1.0;

    pub fn load(storage: &dyn eframe::Storage) -> Option<Self> {
        storage
            .get_string(SETTINGS_KEY)
            .as_deref()
            .map(serde_json::from_str::<Self>)
            .transpose()
            .map_err(|err| log::warn!("ignoring stored settings: {err}"))
            .ok()
            .flatten()
    }
}

pub struct App {
    wheel: WheelState,
    winners: flume::Receiver<Winner>,
    history: VecDeque<Winner>,
    logs: LogWindow,
    log_records: Option<flume::Receiver<Record>>,
    show_logs: bool,
    persist: PersistState,
}

impl App {
    const HISTORY: usize = 20;

    fn dpi_range() -> impl Iterator<Item = f32> {
        std::iter::successors(Some(1.0_f32), |a| Some(a + 0.1)).take(11)
    }

    pub fn new(
        wheel: WheelState,
        log_records: Option<flume::Receiver<Record>>,
        persist: PersistState,
    ) -> Self {
        let (tx, winners) = flume::unbounded();
        let wheel = wheel.on_spin_end(move |value, index| {
            let _ = tx.send(Winner {
                value: value.to_string(),
                index,
            });
        });

        let history = persist.last_winner.iter().cloned().collect();

        Self {
            wheel,
            winners,
            history,
            logs: LogWindow::default(),
            log_records,
            show_logs: false,
            persist,
        }
    }

    pub const fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn wheel_mut(&mut self) -> &mut WheelState {
        &mut self.wheel
    }

    pub const fn persist(&self) -> &PersistState {
        &self.persist
    }

    /// Newest first.
    pub fn history(&self) -> impl Iterator<Item = &Winner> + '_ {
        self.history.iter().rev()
    }

    fn poll(&mut self) {
        if let Some(records) = &self.log_records {
            self.logs.drain_from(records);
        }

        for winner in self.winners.try_iter() {
            log::info!("winner: {} (#{})", winner.value, winner.index);
            self.persist.spins += 1;
            self.persist.last_winner.replace(winner.clone());

            while self.history.len() >= Self::HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(winner);
        }
    }

    fn try_handle_key_press(&mut self, ctx: &egui::Context) {
        if ctx.input().key_pressed(Key::F12) {
            self.show_logs = !self.show_logs;
        }
        if ctx.input().key_pressed(Key::Escape) {
            self.wheel.interrupt();
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.toggle_value(&mut self.show_logs, "logs");

                let before = self.persist.pixels_per_point;
                ComboBox::from_id_source("pixels_per_point")
                    .width(50.0)
                    .selected_text(format!("{before:.1}"))
                    .show_ui(ui, |ui| {
                        for n in Self::dpi_range() {
                            ui.selectable_value(
                                &mut self.persist.pixels_per_point,
                                n,
                                format!("{n:.1}"),
                            );
                        }
                    });
                if self.persist.pixels_per_point != before {
                    ctx.set_pixels_per_point(self.persist.pixels_per_point);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(format!("spins: {}", self.persist.spins));
                });
            });
        });
    }

    fn side_bar(&mut self, ctx: &egui::Context) {
        SidePanel::right("history")
            .resizable(false)
            .default_width(140.0)
            .show(ctx, |ui| {
                ui.heading("winners");
                ui.separator();
                for (i, winner) in self.history().enumerate() {
                    let text = RichText::new(&winner.value);
                    ui.label(if i == 0 { text.strong() } else { text.weak() });
                }
            });
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.poll();
        self.try_handle_key_press(ctx);

        self.top_bar(ctx);
        self.side_bar(ctx);

        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                Wheel::new(&mut self.wheel).display(ui);

                match &self.wheel.session().winner_value {
                    _ if self.wheel.is_spinning() => ui.heading("spinning..."),
                    Some(value) => ui.heading(format!("winner: {value}")),
                    None => ui.heading("flick the wheel"),
                };
            });
        });

        self.logs.display(&mut self.show_logs, ctx);

        // pick up a winner that settled during this frame
        self.poll();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.show(ctx)
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(&self.persist) {
            Ok(json) => storage.set_string(SETTINGS_KEY, json),
            Err(err) => log::error!("cannot save settings: {err}"),
        }
    }

    fn persist_native_window(&self) -> bool {
        true
    }
}
