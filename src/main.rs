use rshell::Interpreter;

fn main() -> anyhow::Result<()> {
    Interpreter::default().repl()
}
