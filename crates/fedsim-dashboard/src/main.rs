use dioxus::prelude::*;

mod app;
mod components;

/// Console CSS (loaded from assets/style.css at compile time)
const STYLE_CSS: &str = include_str!("../assets/style.css");

fn main() {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    // Launch Dioxus desktop app with custom CSS
    LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title("FedSim Console")
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1280.0, 840.0)),
                )
                .with_custom_head(format!(r#"<style>{}</style>"#, STYLE_CSS)),
        )
        .launch(app::App);
}
