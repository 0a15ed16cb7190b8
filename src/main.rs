//! Headless building selection and filter controller.

use towerview::core;

fn main() {
    core::platform::init_panic_handling();
    let cli_args = core::platform::get_cli_args();
    match core::run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
