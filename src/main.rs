//! Catalog EDA - command line entry point

fn main() {
    if let Err(err) = catalog_eda::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
