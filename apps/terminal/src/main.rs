fn main() -> anyhow::Result<()> {
    vocab_drill::run()
}
