mod access;
mod app;
mod config;
mod library;
mod logging;
mod runtime;
mod store;
mod ui;
mod watch;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
