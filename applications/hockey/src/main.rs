use airhockey_framework::{application::Application, logging};
use engine_hockey::{assets::DirectoryStore, RendererBuilder};
use log::info;

fn main() -> Result<(), winit::error::EventLoopError> {
    logging::init_logger();
    info!("starting air hockey");

    let assets = DirectoryStore::new("engines/hockey/assets");
    let application = Application::new("Air Hockey".into(), RendererBuilder::new(assets));
    application.run()
}
