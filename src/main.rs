// src/main.rs

use ifchanged::errors::IfChangedError;
use ifchanged::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = match cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version keep clap's own output and exit code.
            if !err.use_stderr() {
                err.exit();
            }
            let _ = err.print();
            std::process::exit(1);
        }
    };

    match run_main(args).await {
        Ok(()) => {}
        Err(IfChangedError::Usage(usage)) => {
            eprintln!("{usage}");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("ifchanged error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main(args: cli::CliArgs) -> ifchanged::errors::Result<()> {
    // Validate positionals before anything else is set up.
    args.watch_spec()?;
    logging::init_logging(args.log_level)?;
    run(args).await
}
