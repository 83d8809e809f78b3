use crate::PaletteApp;

/// Central area: canvas toggle plus the log of triggered actions.
pub fn canvas_panel(app: &mut PaletteApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("CoolBox");

        ui.horizontal(|ui| {
            if app.has_canvas() {
                if ui.button("Close canvas").clicked() {
                    app.close_canvas();
                }
            } else if ui.button("Open canvas").clicked() {
                app.open_canvas();
            }

            match app.dock().canvas() {
                Some(canvas) => ui.label(format!("Canvas #{}", canvas.0)),
                None => ui.weak("No canvas, palette disabled"),
            };
        });

        ui.separator();

        ui.horizontal(|ui| {
            ui.strong("Activity");
            if ui
                .add_enabled(!app.activity().is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                app.activity().clear();
            }
        });

        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in app.activity().entries() {
                    ui.monospace(entry);
                }
            });
    });
}
