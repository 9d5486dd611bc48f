use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

// The only interactive surface of the transaction. Kept behind a trait so
// non-interactive callers and tests can substitute a strategy.
pub trait RemoteChooser {
    fn choose_remote(&self, out: &mut dyn Write, remotes: &[String]) -> Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalChooser;

impl RemoteChooser for TerminalChooser {
    fn choose_remote(&self, out: &mut dyn Write, remotes: &[String]) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        choose_remote_from(out, &mut input, remotes)
    }
}

// Non-interactive strategy: take the first candidate. Used for -y runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRemoteChooser;

impl RemoteChooser for FirstRemoteChooser {
    fn choose_remote(&self, _out: &mut dyn Write, remotes: &[String]) -> Result<Option<String>> {
        Ok(remotes.first().cloned())
    }
}

pub(crate) fn choose_remote_from(
    out: &mut dyn Write,
    input: &mut dyn BufRead,
    remotes: &[String],
) -> Result<Option<String>> {
    if let [only] = remotes {
        let confirmed = yes_no_prompt(
            out,
            input,
            &format!("Found in remote {only}, do you want to install it?"),
        )?;
        return Ok(confirmed.then(|| only.clone()));
    }

    writeln!(out, "Found in several remotes:")?;
    for (index, remote) in remotes.iter().enumerate() {
        writeln!(out, "{}) {remote}", index + 1)?;
    }
    let chosen = number_prompt(
        out,
        input,
        remotes.len(),
        "Which do you want to install (0 to abort)?",
    )?;

    Ok(match chosen {
        0 => None,
        index => remotes.get(index - 1).cloned(),
    })
}

fn yes_no_prompt(out: &mut dyn Write, input: &mut dyn BufRead, question: &str) -> Result<bool> {
    loop {
        write!(out, "{question} [y/n]: ")?;
        out.flush()?;

        let Some(answer) = read_answer(input)? else {
            return Ok(false);
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {}
        }
    }
}

fn number_prompt(
    out: &mut dyn Write,
    input: &mut dyn BufRead,
    max: usize,
    question: &str,
) -> Result<usize> {
    loop {
        write!(out, "{question} [0-{max}]: ")?;
        out.flush()?;

        let Some(answer) = read_answer(input)? else {
            return Ok(0);
        };
        if let Ok(number) = answer.parse::<usize>() {
            if number <= max {
                return Ok(number);
            }
        }
    }
}

fn read_answer(input: &mut dyn BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read prompt answer")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
