fn main() -> anyhow::Result<()> {
    freecell::run()
}
