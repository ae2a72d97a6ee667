fn main() -> anyhow::Result<()> {
    record_history::cli::run()
}
