//! Console front end: prompt, read a line, answer, repeat

use crate::bots::Bot;
use crate::error::Result;
use parlor_agent::RunConfig;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Answer a single question and return
    pub once: bool,
}

/// `exit` or `quit`, in any case
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Run the prompt loop until EOF, `exit` or `quit`
///
/// Blank lines are skipped. Returns the number of questions answered.
pub async fn run_console<R, W>(
    bot: &Bot,
    config: &RunConfig,
    mut input: R,
    mut output: W,
    options: ConsoleOptions,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut answered = 0;
    let mut line = String::new();

    loop {
        write!(output, "{}", bot.prompt())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("Console input closed");
            writeln!(output)?;
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        let answer = bot.respond(question, config).await?;
        writeln!(output, "{}", answer)?;
        answered += 1;

        if options.once {
            break;
        }
    }

    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("Exit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(""));
    }
}
