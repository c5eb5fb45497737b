fn main() {
    if let Err(e) = catalog_crawl::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
