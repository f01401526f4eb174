fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Codeshare",
        native_options,
        Box::new(|cc| Ok(Box::new(codeshare_frontend::CodeshareApp::new(cc)))),
    )
}
