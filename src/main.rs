use std::process::ExitCode;

fn main() -> ExitCode {
    match riskscope_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("riskscope: {e}");
            ExitCode::FAILURE
        }
    }
}
