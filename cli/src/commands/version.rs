//! Version command

/// Run the version command.
pub fn run() {
    println!("k-installer {}", env!("CARGO_PKG_VERSION"));
}
