use chess_rules::console::ConsoleHandler;

fn main() -> anyhow::Result<()> {
    let mut console = ConsoleHandler::new();
    console.run()
}
