use gallery_frontend::App;

fn main() {
    console_error_panic_hook::set_once();
    gallery_frontend::logging::init(tracing::Level::INFO);
    yew::Renderer::<App>::new().render();
}
