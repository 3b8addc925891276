fn main() {
    railsmith::app::cli::run();
}
