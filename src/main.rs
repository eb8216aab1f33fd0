//! feedback-portal main entrypoint.

use feedback_portal::run;
use feedback_portal::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
