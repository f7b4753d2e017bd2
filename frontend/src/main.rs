use finance_binder::settings::load_settings;

fn main() {
    console_error_panic_hook::set_once();

    let settings = load_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.level()));

    if let Err(err) = finance_binder::dom::start(settings) {
        log::error!("dashboard setup failed: {}", err);
    }
}
