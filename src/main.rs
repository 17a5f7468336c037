// Serial Logger - Serial port terminal and line logger
use clap::Parser;
use serial_logger::cli::{execute, Args, ConsoleWriter, OutputWriter};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute(args).await {
        let _ = ConsoleWriter::new().write_error(&e.to_string());
        std::process::exit(1);
    }
}
