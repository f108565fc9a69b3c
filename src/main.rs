fn main() {
    if let Err(err) = wayfarer::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
