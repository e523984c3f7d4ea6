use std::process::ExitCode;

mod runtime;

fn main() -> ExitCode {
    match runtime::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("m3usync: {e}");
            ExitCode::FAILURE
        }
    }
}
