use std::process::ExitCode;

use curlflags_cli::{command, logging, run};

fn main() -> ExitCode {
    let matches = command().get_matches();
    let silent = matches.get_flag("silent");
    logging::init(matches.get_flag("verbose"), silent);

    match run(&matches) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            if !silent {
                eprintln!("curlflags: {err}");
                if let Some(hint) = err.hint() {
                    eprintln!("curlflags: {hint}");
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}
