mod app;
mod backend;
mod config;
mod model;
mod ui;
mod util;
mod window;

const APP_ID: &str = "com.system-dashboard.linux";
const CSS: &str = include_str!("../style/style.css");

fn main() {
    env_logger::init();

    let app = app::DashboardApp::new();
    std::process::exit(app.run());
}
