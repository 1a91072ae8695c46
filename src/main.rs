fn main() {
    trustroots::logging::init();
    if let Err(e) = trustroots::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
