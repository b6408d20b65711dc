use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use structural_map::shell::{Session, ShellConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = ShellConfig::default();
    let mut session = Session::new(&config);

    // start reading lines
    let mut rl = rl_editor(&config)?;
    loop {
        // get user input
        let input = match rl.readline(&config.prompt) {
            Ok(input) => input,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                log::warn!("readline failed: {err}");
                return Err(err.into());
            },
        };
        if is_exit(&input) {
            break;
        }

        match session.eval_line(&input) {
            Ok(output) if output.is_empty() => (),
            Ok(output) => println!("{output}"),
            Err(err) => println!("Error: {err}"),
        }
    }

    Ok(())
}

fn is_exit(input: &str) -> bool {
    matches!(input.trim(), "exit" | "quit")
}

fn rl_editor(config: &ShellConfig) -> Result<Editor<(), DefaultHistory>> {
    Ok(rustyline::DefaultEditor::with_config(
        config.editor_config(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_ignores_surrounding_whitespace() {
        assert!(is_exit("exit"));
        assert!(is_exit("  quit \t"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit("size"));
    }
}
