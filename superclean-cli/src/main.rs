use std::process::ExitCode;

fn main() -> ExitCode {
    match superclean_cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Failure: {err:#}");
            ExitCode::from(1)
        }
    }
}
