fn main() -> anyhow::Result<()> {
    formula_vm::run()
}
