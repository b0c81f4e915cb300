use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::usecases::prompts::OperatorConsole;

/// Console on the process stdin/stdout.
///
/// Menu choices are read as a single key-press when stdin is a terminal and
/// as the first character of a line otherwise, so scripted input works.
#[derive(Debug, Default)]
pub struct StdConsole;

impl OperatorConsole for StdConsole {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return self.prompt_line(prompt);
        }

        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret.trim().to_owned())),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }

    fn read_choice(&mut self, prompt: &str) -> io::Result<Option<char>> {
        print!("{prompt}");
        io::stdout().flush()?;

        if !io::stdin().is_terminal() {
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                return Ok(None);
            }
            return Ok(Some(line.trim().chars().next().unwrap_or('\n')));
        }

        let key = read_single_key()?;
        // Raw mode swallows the echo; repeat the key so the transcript reads naturally.
        match key {
            Some(ch) if !ch.is_control() => println!("{ch}"),
            _ => println!(),
        }
        Ok(key)
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_single_key() -> io::Result<Option<char>> {
    let _raw = RawModeGuard::enable()?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return Ok(None),
            KeyCode::Char(ch) => return Ok(Some(ch)),
            KeyCode::Enter => return Ok(Some('\n')),
            KeyCode::Esc => return Ok(Some('\u{1b}')),
            _ => {}
        }
    }
}
