use std::process;

fn main() {
    match oxsh::run_shell() {
        Ok(code) => process::exit(code),
        Err(e) => {
            // Cooked mode is already restored by the guard's drop; report
            // the diagnostic and abort non-zero.
            eprintln!("oxsh: {}", e);
            process::exit(1);
        }
    }
}
