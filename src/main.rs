//! rSetup main entrypoint.

use rsetup::run;
use rsetup::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
