use std::io::{self, BufRead, Write};

/// Interactive questions asked while resolving presets.
///
/// Both calls block until the user answers.
pub trait Prompt {
    /// Pick one entry of `choices` and return it.
    fn choose(&mut self, message: &str, choices: &[String]) -> io::Result<String>;

    /// Ask for a non-empty line of text.
    fn text(&mut self, message: &str) -> io::Result<String>;
}

/// Line-based prompt on a terminal (or any reader/writer pair).
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "? {question}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for Terminal<R, W> {
    fn choose(&mut self, message: &str, choices: &[String]) -> io::Result<String> {
        if choices.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "nothing to choose from"));
        }

        writeln!(self.output, "? {message}")?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {choice}", i + 1)?;
        }

        loop {
            let answer = self.ask(&format!("Answer [1-{}]", choices.len()))?;

            // Accept either the list number or the name itself.
            let picked = match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => Some(&choices[n - 1]),
                _ => choices.iter().find(|c| **c == answer),
            };

            match picked {
                Some(choice) => return Ok(choice.clone()),
                None => writeln!(self.output, "  please pick one of the listed presets")?,
            }
        }
    }

    fn text(&mut self, message: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "  a value is required")?;
        }
    }
}
