use std::io::{self, BufRead, Write};

/// Line-based prompt/answer I/O over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line, trimmed of spaces, tabs and carriage
    /// returns. End of input is an `UnexpectedEof` error.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(trim_input(&line).to_string())
    }

    /// Prompt until a whole line parses as an integer.
    pub fn read_int(&mut self, prompt: &str) -> io::Result<i64> {
        loop {
            let line = self.read_line(prompt)?;
            match line.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Invalid input.")?,
            }
        }
    }

    pub fn say(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

fn trim_input(line: &str) -> &str {
    line.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}
